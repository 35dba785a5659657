//! Triangle meshes and the generators that build them.

pub mod extrude;
pub mod primitives;
pub mod shape;
pub mod triangulate;

use glam::{Mat3, Quat, Vec3};

pub use extrude::{extrude, ExtrudeOptions};
pub use shape::{Path, Shape};

/// Indexed triangle mesh. `normals` is parallel to `positions`.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Appends a triangle with its own three vertices and a shared face normal.
    pub fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[a, b, c]);
        self.normals.extend_from_slice(&[normal; 3]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Moves the mesh so its bounding box is centred on the origin.
    pub fn center(&mut self) {
        if let Some((lo, hi)) = self.bounding_box() {
            let offset = (lo + hi) * 0.5;
            for p in &mut self.positions {
                *p -= offset;
            }
        }
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate(Quat::from_rotation_x(angle));
    }

    pub fn rotate(&mut self, rotation: Quat) {
        let normal_matrix = Mat3::from_quat(rotation);
        for p in &mut self.positions {
            *p = rotation * *p;
        }
        for n in &mut self.normals {
            *n = (normal_matrix * *n).normalize_or_zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_moves_bbox_to_origin() {
        let mut mesh = MeshData::default();
        mesh.push_flat_triangle(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(1.0, 5.0, 1.0),
        );
        mesh.center();
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo + hi).length() < 1e-6);
    }

    #[test]
    fn rotate_x_half_turn_flips_y() {
        let mut mesh = MeshData::default();
        mesh.push_flat_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        mesh.rotate_x(std::f32::consts::PI);
        assert!((mesh.positions[2].y + 1.0).abs() < 1e-5);
        assert!((mesh.normals[0].z + 1.0).abs() < 1e-5);
    }
}
