//! Static meshes for the background scene.

use std::f32::consts::PI;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Flat xyz triples.
    pub positions: Vec<f32>,
    /// uv pairs, empty when the mesh is untextured.
    pub uvs: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Flat annulus in the XY plane. `uv.x` runs from the inner to the outer
/// edge, `uv.y` once around the ring.
pub fn ring_mesh(inner: f32, outer: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let row = segments + 1;
    let mut mesh = Mesh::default();

    for edge in 0..2u32 {
        let radius = if edge == 0 { inner } else { outer };
        for i in 0..row {
            let t = i as f32 / segments as f32;
            let angle = t * 2.0 * PI;
            mesh.positions.extend_from_slice(&[radius * angle.cos(), radius * angle.sin(), 0.0]);
            mesh.uvs.extend_from_slice(&[edge as f32, t]);
        }
    }

    for i in 0..segments {
        let a = i as u16;
        let b = (i + row) as u16;
        let c = b + 1;
        let d = a + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
    mesh
}

pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = Mesh::default();

    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let theta = v * PI;
        for x in 0..=ws {
            let u = x as f32 / ws as f32;
            let phi = u * 2.0 * PI;
            mesh.positions.extend_from_slice(&[
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }

    let row = ws + 1;
    for y in 0..hs {
        for x in 0..ws {
            let a = (y * row + x + 1) as u16;
            let b = (y * row + x) as u16;
            let c = ((y + 1) * row + x) as u16;
            let d = ((y + 1) * row + x + 1) as u16;
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if y != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// `count` points scattered uniformly through a cube of side `extent`
/// centred on the origin.
pub fn star_field(count: usize, extent: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
    (0..count * 3).map(|_| (rng.f32() - 0.5) * extent).collect()
}
