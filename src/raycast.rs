//! Pointer picking: screen position to world ray, ray against mesh.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::PerspectiveCamera;
use crate::geometry::MeshData;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Client-space rectangle of the canvas, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Normalised device coordinates of a client-space point: x right, y up, both in `[-1, 1]`.
pub fn pointer_to_ndc(client_x: f64, client_y: f64, rect: ClientRect) -> Vec2 {
    let x = ((client_x - rect.left) / rect.width) * 2.0 - 1.0;
    let y = -(((client_y - rect.top) / rect.height) * 2.0 - 1.0);
    Vec2::new(x as f32, y as f32)
}

impl Ray {
    pub fn from_camera(ndc: Vec2, camera: &PerspectiveCamera) -> Self {
        let inverse = camera.view_projection().inverse();
        let point = inverse.project_point3(ndc.extend(0.5));
        Self {
            origin: camera.position,
            direction: (point - camera.position).normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the triangle along the ray, front faces only.
    fn hit_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let normal = edge1.cross(edge2);
        let det = -self.direction.dot(normal);
        // Back faces and edge-on triangles.
        if det <= 1e-12 {
            return None;
        }
        let to_origin = self.origin - a;
        let q = to_origin.cross(self.direction);
        let u = edge2.dot(q) / det;
        let v = -edge1.dot(q) / det;
        if u < 0.0 || v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = to_origin.dot(normal) / det;
        (t >= 0.0).then_some(t)
    }

    /// Nearest front-facing hit on `mesh` placed by `model`, in world space.
    pub fn intersect_mesh(&self, mesh: &MeshData, model: Mat4) -> Option<Vec3> {
        mesh.triangles()
            .filter_map(|[a, b, c]| {
                let a = model.transform_point3(a);
                let b = model.transform_point3(b);
                let c = model.transform_point3(c);
                self.hit_triangle(a, b, c)
            })
            .min_by(|x, y| x.total_cmp(y))
            .map(|t| self.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_quad() -> MeshData {
        let mut mesh = MeshData::default();
        let (a, b, c, d) = (
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        );
        mesh.push_flat_triangle(a, b, c);
        mesh.push_flat_triangle(a, c, d);
        mesh
    }

    #[test]
    fn ndc_corners() {
        let rect = ClientRect {
            left: 10.0,
            top: 20.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(pointer_to_ndc(10.0, 20.0, rect), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(210.0, 120.0, rect), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(110.0, 70.0, rect), Vec2::ZERO);
    }

    #[test]
    fn hits_front_face_only() {
        let mesh = facing_quad();
        let towards = Ray {
            origin: Vec3::new(0.2, 0.1, 5.0),
            direction: Vec3::NEG_Z,
        };
        let hit = towards.intersect_mesh(&mesh, Mat4::IDENTITY).unwrap();
        assert!((hit - Vec3::new(0.2, 0.1, 0.0)).length() < 1e-5);

        let behind = Ray {
            origin: Vec3::new(0.2, 0.1, -5.0),
            direction: Vec3::Z,
        };
        assert!(behind.intersect_mesh(&mesh, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn model_matrix_moves_the_target() {
        let mesh = facing_quad();
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let moved = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        assert!(ray.intersect_mesh(&mesh, moved).is_none());
        assert_eq!(ray.at(7.0), Vec3::new(0.0, 0.0, -2.0));
    }
}
