//! Extrusion of 2D shapes into bevelled solids.
//!
//! The solid is built as a stack of layers: the front bevel rings, the
//! straight `steps` rings spanning `0..depth`, then the back bevel rings.
//! Caps close the first and last layer; walls join consecutive layers.
//! Every triangle gets its own vertices so normals are per face.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use super::shape::{signed_area, Shape};
use super::triangulate::triangulate;
use super::MeshData;

const EPSILON: f32 = 1e-10;

#[derive(Clone, Copy, Debug)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub steps: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
    /// Samples per curve segment when extruding a [`Path`](super::Path).
    pub curve_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            steps: 1,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_segments: 3,
            curve_segments: 12,
        }
    }
}

/// Direction to move `pt` so both adjacent edges shift outward by one unit.
/// Outward is the left side, which holds for clockwise outlines and
/// counter-clockwise holes.
fn bevel_vec(pt: Vec2, prev: Vec2, next: Vec2) -> Vec2 {
    let v_prev = pt - prev;
    let v_next = next - pt;
    let v_prev_len_sq = v_prev.length_squared();
    let collinear = v_prev.perp_dot(v_next);

    let (trans, shrink_by) = if collinear.abs() > EPSILON {
        let v_prev_len = v_prev_len_sq.sqrt();
        let v_next_len = v_next.length();
        let prev_shift = prev + Vec2::new(-v_prev.y, v_prev.x) / v_prev_len;
        let next_shift = next + Vec2::new(-v_next.y, v_next.x) / v_next_len;
        let sf = ((next_shift.x - prev_shift.x) * v_next.y - (next_shift.y - prev_shift.y) * v_next.x)
            / (v_prev.x * v_next.y - v_prev.y * v_next.x);
        let trans = prev_shift + v_prev * sf - pt;
        let len_sq = trans.length_squared();
        if len_sq <= 2.0 {
            return trans;
        }
        (trans, (len_sq / 2.0).sqrt())
    } else {
        let same_direction = if v_prev.x > EPSILON {
            v_next.x > EPSILON
        } else if v_prev.x < -EPSILON {
            v_next.x < -EPSILON
        } else {
            v_prev.y.signum() == v_next.y.signum()
        };
        if same_direction {
            (Vec2::new(-v_prev.y, v_prev.x), v_prev_len_sq.sqrt())
        } else {
            (v_prev, (v_prev_len_sq / 2.0).sqrt())
        }
    };
    if shrink_by <= EPSILON {
        Vec2::ZERO
    } else {
        trans / shrink_by
    }
}

fn ring_moves(ring: &[Vec2]) -> Vec<Vec2> {
    let n = ring.len();
    (0..n)
        .map(|i| bevel_vec(ring[i], ring[(i + n - 1) % n], ring[(i + 1) % n]))
        .collect()
}

fn push_oriented(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3, outward: Vec3) {
    let n = (b - a).cross(c - a);
    if n.length_squared() <= EPSILON * EPSILON {
        return;
    }
    if n.dot(outward) >= 0.0 {
        mesh.push_flat_triangle(a, b, c);
    } else {
        mesh.push_flat_triangle(a, c, b);
    }
}

/// (z, bevel offset) for each layer, front to back.
fn layers(options: &ExtrudeOptions) -> Vec<(f32, f32)> {
    let steps = options.steps.max(1);
    let bevel_segments = if options.bevel_enabled {
        options.bevel_segments.max(1)
    } else {
        0
    };
    let mut out = Vec::with_capacity((bevel_segments * 2 + steps + 1) as usize);
    let bevel_ring = |b: u32| {
        let t = b as f32 / bevel_segments as f32;
        (
            options.bevel_thickness * (t * FRAC_PI_2).cos(),
            options.bevel_size * (t * FRAC_PI_2).sin(),
        )
    };
    for b in 0..bevel_segments {
        let (z, bs) = bevel_ring(b);
        out.push((-z, bs));
    }
    let straight = if options.bevel_enabled { options.bevel_size } else { 0.0 };
    for s in 0..=steps {
        out.push((options.depth * s as f32 / steps as f32, straight));
    }
    for b in (0..bevel_segments).rev() {
        let (z, bs) = bevel_ring(b);
        out.push((options.depth + z, bs));
    }
    out
}

fn extrude_shape(mesh: &mut MeshData, shape: &Shape, options: &ExtrudeOptions) {
    if shape.outline.len() < 3 {
        return;
    }
    let mut outline = shape.outline.clone();
    if signed_area(&outline) > 0.0 {
        outline.reverse();
    }
    let holes: Vec<Vec<Vec2>> = shape
        .holes
        .iter()
        .filter(|h| h.len() >= 3)
        .map(|h| {
            let mut h = h.clone();
            if signed_area(&h) < 0.0 {
                h.reverse();
            }
            h
        })
        .collect();

    let faces = triangulate(&outline, &holes);

    let mut points = outline.clone();
    let mut moves = ring_moves(&outline);
    let mut rings = vec![0..outline.len()];
    for hole in &holes {
        let start = points.len();
        points.extend_from_slice(hole);
        moves.extend(ring_moves(hole));
        rings.push(start..points.len());
    }

    let layers = layers(options);
    let at = |layer: usize, i: usize| {
        let (z, bs) = layers[layer];
        let p = points[i] + moves[i] * bs;
        Vec3::new(p.x, p.y, z)
    };

    let last = layers.len() - 1;
    for face in &faces {
        push_oriented(mesh, at(0, face[0]), at(0, face[1]), at(0, face[2]), Vec3::NEG_Z);
        push_oriented(mesh, at(last, face[0]), at(last, face[1]), at(last, face[2]), Vec3::Z);
    }

    for ring in rings {
        let len = ring.len();
        for j in 0..len {
            let k = ring.start + (j + len - 1) % len;
            let j = ring.start + j;
            let edge = points[j] - points[k];
            if edge.length_squared() <= EPSILON {
                continue;
            }
            let outward = Vec3::new(-edge.y, edge.x, 0.0);
            for layer in 0..last {
                let a = at(layer, k);
                let b = at(layer, j);
                let c = at(layer + 1, j);
                let d = at(layer + 1, k);
                push_oriented(mesh, a, b, d, outward);
                push_oriented(mesh, b, c, d, outward);
            }
        }
    }
}

pub fn extrude(shapes: &[Shape], options: &ExtrudeOptions) -> MeshData {
    let mut mesh = MeshData::default();
    for shape in shapes {
        extrude_shape(&mut mesh, shape, options);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Shape {
        Shape {
            outline: vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
            holes: Vec::new(),
        }
    }

    #[test]
    fn plain_box_without_bevel() {
        let options = ExtrudeOptions {
            depth: 2.0,
            bevel_enabled: false,
            ..Default::default()
        };
        let mesh = extrude(&[unit_square()], &options);
        // 2 caps x 2 triangles + 4 walls x 2 triangles.
        assert_eq!(mesh.triangle_count(), 12);
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo.z - 0.0).abs() < 1e-6 && (hi.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn normals_point_away_from_centre() {
        let options = ExtrudeOptions {
            depth: 1.0,
            bevel_enabled: false,
            ..Default::default()
        };
        let mesh = extrude(&[unit_square()], &options);
        let centre = Vec3::new(0.5, 0.5, 0.5);
        for (tri, normal) in mesh.triangles().zip(mesh.normals.chunks(3).map(|n| n[0])) {
            let mid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(normal.dot(mid - centre) > 0.0, "inward face at {mid:?}");
        }
    }

    #[test]
    fn bevel_grows_outline_and_thickness() {
        let options = ExtrudeOptions {
            depth: 1.0,
            bevel_enabled: true,
            bevel_size: 0.1,
            bevel_thickness: 0.2,
            bevel_segments: 3,
            ..Default::default()
        };
        let mesh = extrude(&[unit_square()], &options);
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo.x + 0.1).abs() < 1e-4, "lo.x = {}", lo.x);
        assert!((hi.x - 1.1).abs() < 1e-4, "hi.x = {}", hi.x);
        assert!((lo.z + 0.2).abs() < 1e-5);
        assert!((hi.z - 1.2).abs() < 1e-5);
    }
}
