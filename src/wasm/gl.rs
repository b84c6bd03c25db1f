use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3};
use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlRenderbuffer, WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::geometry::Mesh;

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&format!("shader compile failed: {info}")))
    }
}

/// Linked program plus the locations of the uniforms it was asked for.
pub struct Program {
    program: WebGlProgram,
    uniforms: HashMap<&'static str, WebGlUniformLocation>,
}

impl Program {
    pub fn new(
        gl: &GL,
        label: &str,
        vertex: &str,
        fragment: &str,
        uniforms: &[&'static str],
    ) -> Result<Self, JsValue> {
        let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile(gl, GL::FRAGMENT_SHADER, fragment)?;
        let program = gl.create_program().ok_or("unable to create program")?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        if !gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            return Err(JsValue::from_str(&format!("{label}: link failed: {info}")));
        }

        let mut locations = HashMap::new();
        for &name in uniforms {
            match gl.get_uniform_location(&program, name) {
                Some(loc) => {
                    locations.insert(name, loc);
                }
                // Unused uniforms are stripped by the driver.
                None => log::debug!("{label}: uniform {name} not active"),
            }
        }

        Ok(Self {
            program,
            uniforms: locations,
        })
    }

    pub fn bind(&self, gl: &GL) {
        gl.use_program(Some(&self.program));
    }

    pub fn set_f32(&self, gl: &GL, name: &str, value: f32) {
        gl.uniform1f(self.uniforms.get(name), value);
    }

    pub fn set_i32(&self, gl: &GL, name: &str, value: i32) {
        gl.uniform1i(self.uniforms.get(name), value);
    }

    pub fn set_vec2(&self, gl: &GL, name: &str, value: Vec2) {
        gl.uniform2f(self.uniforms.get(name), value.x, value.y);
    }

    pub fn set_vec3(&self, gl: &GL, name: &str, value: Vec3) {
        gl.uniform3f(self.uniforms.get(name), value.x, value.y, value.z);
    }

    pub fn set_mat4(&self, gl: &GL, name: &str, value: &Mat4) {
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.get(name), false, &value.to_cols_array());
    }
}

fn attribute(gl: &GL, location: u32, size: i32, data: &[f32]) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl.create_buffer().ok_or("unable to create buffer")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let array = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

/// GPU copy of a [`Mesh`]: positions at location 0, uvs at location 1.
pub struct MeshBuffers {
    vao: WebGlVertexArrayObject,
    count: i32,
    indexed: bool,
    _buffers: Vec<WebGlBuffer>,
}

impl MeshBuffers {
    pub fn upload(gl: &GL, mesh: &Mesh) -> Result<Self, JsValue> {
        let vao = gl.create_vertex_array().ok_or("unable to create vertex array")?;
        gl.bind_vertex_array(Some(&vao));

        let mut buffers = vec![attribute(gl, 0, 3, &mesh.positions)?];
        if !mesh.uvs.is_empty() {
            buffers.push(attribute(gl, 1, 2, &mesh.uvs)?);
        }

        let indexed = !mesh.indices.is_empty();
        if indexed {
            let ibo = gl.create_buffer().ok_or("unable to create index buffer")?;
            gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&ibo));
            let array = js_sys::Uint16Array::from(mesh.indices.as_slice());
            gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &array, GL::STATIC_DRAW);
            buffers.push(ibo);
        }
        gl.bind_vertex_array(None);

        let count = if indexed {
            mesh.indices.len()
        } else {
            mesh.vertex_count()
        };
        Ok(Self {
            vao,
            count: count as i32,
            indexed,
            _buffers: buffers,
        })
    }

    pub fn draw(&self, gl: &GL, mode: u32) {
        gl.bind_vertex_array(Some(&self.vao));
        if self.indexed {
            gl.draw_elements_with_i32(mode, self.count, GL::UNSIGNED_SHORT, 0);
        } else {
            gl.draw_arrays(mode, 0, self.count);
        }
    }
}

/// Offscreen color texture with an optional depth attachment.
pub struct RenderTarget {
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    depth: Option<WebGlRenderbuffer>,
    width: i32,
    height: i32,
}

impl RenderTarget {
    pub fn new(gl: &GL, width: i32, height: i32, with_depth: bool) -> Result<Self, JsValue> {
        let framebuffer = gl.create_framebuffer().ok_or("unable to create framebuffer")?;
        let texture = gl.create_texture().ok_or("unable to create texture")?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        for (pname, value) in [
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, pname, value as i32);
        }
        let depth = if with_depth {
            Some(gl.create_renderbuffer().ok_or("unable to create renderbuffer")?)
        } else {
            None
        };

        let mut target = Self {
            framebuffer,
            texture,
            depth,
            width: 0,
            height: 0,
        };
        target.resize(gl, width, height)?;

        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&target.framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&target.texture),
            0,
        );
        if let Some(rb) = &target.depth {
            gl.framebuffer_renderbuffer(GL::FRAMEBUFFER, GL::DEPTH_ATTACHMENT, GL::RENDERBUFFER, Some(rb));
        }
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(JsValue::from_str(&format!("framebuffer incomplete: 0x{status:x}")));
        }
        Ok(target)
    }

    /// Reallocates storage; attachments stay valid.
    pub fn resize(&mut self, gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            width,
            height,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        )?;
        if let Some(rb) = &self.depth {
            gl.bind_renderbuffer(GL::RENDERBUFFER, Some(rb));
            gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT24, width, height);
            gl.bind_renderbuffer(GL::RENDERBUFFER, None);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.width, self.height);
    }

    pub fn texture(&self) -> &WebGlTexture {
        &self.texture
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}
