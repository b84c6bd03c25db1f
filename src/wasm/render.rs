use glam::{Mat4, Vec2, Vec3};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlTexture, WebGlVertexArrayObject};

use super::gl::{MeshBuffers, Program, RenderTarget};
use super::shaders;
use crate::camera::{ring_model, Camera};
use crate::config::SceneConfig;
use crate::geometry::{ring_mesh, sphere_mesh, star_field, Mesh};
use crate::visual::VisualizationState;

const HOLE_RADIUS: f32 = 2.4;
const HOLE_OFFSET_Z: f32 = 0.1;

/// WebGL2 pipeline: scene → distortion → bloom → invert.
pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    camera: Camera,
    config: SceneConfig,

    ring_program: Program,
    solid_program: Program,
    star_program: Program,
    distortion: Program,
    bright: Program,
    blur: Program,
    composite: Program,
    invert: Program,

    rings: Vec<MeshBuffers>,
    hole: MeshBuffers,
    stars: MeshBuffers,
    fullscreen: WebGlVertexArrayObject,

    scene: RenderTarget,
    distorted: RenderTarget,
    bloom_a: RenderTarget,
    bloom_b: RenderTarget,
    composed: RenderTarget,
}

impl Renderer {
    pub fn new(
        canvas: HtmlCanvasElement,
        config: &SceneConfig,
        visual: &VisualizationState,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, JsValue> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or("WebGL2 not supported")?
            .dyn_into()?;

        let ring_program = Program::new(
            &gl,
            "ring",
            shaders::RING_VS,
            shaders::RING_FS,
            &["uViewProjection", "uModel", "uTime", "uSeed"],
        )?;
        let solid_program = Program::new(
            &gl,
            "solid",
            shaders::SOLID_VS,
            shaders::SOLID_FS,
            &["uViewProjection", "uModel", "uColor"],
        )?;
        let star_program = Program::new(
            &gl,
            "stars",
            shaders::STAR_VS,
            shaders::STAR_FS,
            &["uView", "uProjection", "uSize", "uScale"],
        )?;
        let fullscreen_pass = |label, fs, uniforms: &[&'static str]| {
            Program::new(&gl, label, shaders::FULLSCREEN_VS, fs, uniforms)
        };
        let distortion = fullscreen_pass(
            "distortion",
            shaders::DISTORTION_FS,
            &["tDiffuse", "uStrength", "uTime"],
        )?;
        let bright = fullscreen_pass("bright", shaders::BRIGHT_FS, &["tDiffuse", "uThreshold"])?;
        let blur = fullscreen_pass("blur", shaders::BLUR_FS, &["tDiffuse", "uDirection"])?;
        let composite = fullscreen_pass(
            "composite",
            shaders::COMPOSITE_FS,
            &["tDiffuse", "tBloom", "uStrength"],
        )?;
        let invert = fullscreen_pass("invert", shaders::INVERT_FS, &["tDiffuse", "uIntensity"])?;

        for program in [&distortion, &bright, &blur, &invert] {
            program.bind(&gl);
            program.set_i32(&gl, "tDiffuse", 0);
        }
        composite.bind(&gl);
        composite.set_i32(&gl, "tDiffuse", 0);
        composite.set_i32(&gl, "tBloom", 1);

        let rings = visual
            .rings()
            .iter()
            .map(|r| MeshBuffers::upload(&gl, &ring_mesh(r.inner_radius, r.outer_radius, r.segments)))
            .collect::<Result<Vec<_>, _>>()?;
        let hole = MeshBuffers::upload(&gl, &sphere_mesh(HOLE_RADIUS, 32, 32))?;
        let stars = MeshBuffers::upload(
            &gl,
            &Mesh {
                positions: star_field(config.star_count, config.star_extent, rng),
                ..Mesh::default()
            },
        )?;
        let fullscreen = gl
            .create_vertex_array()
            .ok_or("unable to create vertex array")?;

        let (w, h) = (canvas.width().max(1) as i32, canvas.height().max(1) as i32);
        let scene = RenderTarget::new(&gl, w, h, true)?;
        let distorted = RenderTarget::new(&gl, w, h, false)?;
        let bloom_a = RenderTarget::new(&gl, w / 2, h / 2, false)?;
        let bloom_b = RenderTarget::new(&gl, w / 2, h / 2, false)?;
        let composed = RenderTarget::new(&gl, w, h, false)?;

        log::info!("renderer ready: {} rings, {} stars", rings.len(), config.star_count);

        Ok(Self {
            gl,
            canvas,
            camera: Camera::from(&config.camera),
            config: config.clone(),
            ring_program,
            solid_program,
            star_program,
            distortion,
            bright,
            blur,
            composite,
            invert,
            rings,
            hole,
            stars,
            fullscreen,
            scene,
            distorted,
            bloom_a,
            bloom_b,
            composed,
        })
    }

    /// Matches the drawing buffer and every render target to a CSS viewport.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Result<(), JsValue> {
        let ratio = pixel_ratio.clamp(1.0, self.config.max_pixel_ratio.max(1.0));
        let w = (css_width * ratio).round().max(1.0) as i32;
        let h = (css_height * ratio).round().max(1.0) as i32;
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);

        let gl = &self.gl;
        self.scene.resize(gl, w, h)?;
        self.distorted.resize(gl, w, h)?;
        self.bloom_a.resize(gl, w / 2, h / 2)?;
        self.bloom_b.resize(gl, w / 2, h / 2)?;
        self.composed.resize(gl, w, h)?;
        log::debug!("resized to {w}x{h} (ratio {ratio})");
        Ok(())
    }

    pub fn render(&self, visual: &VisualizationState) {
        self.draw_scene(visual);
        self.post_process(visual);
    }

    fn draw_scene(&self, visual: &VisualizationState) {
        let gl = &self.gl;
        let size = self.scene.size();
        let projection = self.camera.projection(size.x / size.y);
        let view = self.camera.view();
        let view_projection = projection * view;

        self.scene.bind(gl);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(true);
        gl.disable(GL::BLEND);

        self.star_program.bind(gl);
        self.star_program.set_mat4(gl, "uView", &view);
        self.star_program.set_mat4(gl, "uProjection", &projection);
        self.star_program.set_f32(gl, "uSize", self.config.star_size);
        self.star_program.set_f32(gl, "uScale", size.y * 0.5);
        self.stars.draw(gl, GL::POINTS);

        self.solid_program.bind(gl);
        self.solid_program.set_mat4(gl, "uViewProjection", &view_projection);
        self.solid_program.set_mat4(
            gl,
            "uModel",
            &Mat4::from_translation(Vec3::new(0.0, 0.0, HOLE_OFFSET_Z)),
        );
        self.solid_program.set_vec3(gl, "uColor", Vec3::ZERO);
        self.hole.draw(gl, GL::TRIANGLES);

        // Rings are translucent and double-sided: blend, test depth, don't write it.
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.depth_mask(false);
        self.ring_program.bind(gl);
        self.ring_program.set_mat4(gl, "uViewProjection", &view_projection);
        for (ring, mesh) in visual.rings().iter().zip(&self.rings) {
            self.ring_program.set_mat4(gl, "uModel", &ring_model(ring.rotation));
            self.ring_program.set_f32(gl, "uTime", ring.shader_time);
            self.ring_program.set_f32(gl, "uSeed", ring.seed);
            mesh.draw(gl, GL::TRIANGLES);
        }

        gl.depth_mask(true);
        gl.disable(GL::BLEND);
        gl.disable(GL::DEPTH_TEST);
    }

    fn post_process(&self, visual: &VisualizationState) {
        let gl = &self.gl;
        let bloom = &self.config.bloom;
        gl.bind_vertex_array(Some(&self.fullscreen));

        self.distortion.bind(gl);
        self.distortion.set_f32(gl, "uStrength", self.config.distortion_strength);
        self.distortion.set_f32(gl, "uTime", visual.distortion_time());
        self.pass(&[self.scene.texture()], Some(&self.distorted));

        self.bright.bind(gl);
        self.bright.set_f32(gl, "uThreshold", bloom.threshold);
        self.pass(&[self.distorted.texture()], Some(&self.bloom_a));

        let texel = Vec2::ONE / self.bloom_a.size();
        let spread = 1.0 + bloom.radius * 3.0;
        self.blur.bind(gl);
        self.blur.set_vec2(gl, "uDirection", Vec2::new(texel.x * spread, 0.0));
        self.pass(&[self.bloom_a.texture()], Some(&self.bloom_b));
        self.blur.set_vec2(gl, "uDirection", Vec2::new(0.0, texel.y * spread));
        self.pass(&[self.bloom_b.texture()], Some(&self.bloom_a));

        self.composite.bind(gl);
        self.composite.set_f32(gl, "uStrength", bloom.strength);
        self.pass(
            &[self.distorted.texture(), self.bloom_a.texture()],
            Some(&self.composed),
        );

        self.invert.bind(gl);
        self.invert.set_f32(gl, "uIntensity", visual.intensity());
        self.pass(&[self.composed.texture()], None);
    }

    /// Draws the bound program over `target`, or the canvas when `None`.
    fn pass(&self, inputs: &[&WebGlTexture], target: Option<&RenderTarget>) {
        let gl = &self.gl;
        match target {
            Some(t) => t.bind(gl),
            None => {
                gl.bind_framebuffer(GL::FRAMEBUFFER, None);
                gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
            }
        }
        for (unit, texture) in inputs.iter().enumerate() {
            gl.active_texture(GL::TEXTURE0 + unit as u32);
            gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        }
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.active_texture(GL::TEXTURE0);
    }
}
