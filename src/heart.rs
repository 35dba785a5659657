//! The heart outline and the bevelled solids made from it.

use std::f32::consts::PI;

use crate::config::HeartConfig;
use crate::geometry::{extrude, ExtrudeOptions, MeshData, Path};

/// Heart outline: four cubic curves, tip at the bottom, notch at (0, 0.25).
pub fn heart_path() -> Path {
    let mut path = Path::new();
    path.move_to(0.0, 0.25)
        .bezier_curve_to(0.0, 0.25, -0.55, -0.1, -0.55, -0.52)
        .bezier_curve_to(-0.55, -0.95, -0.08, -1.2, 0.0, -0.88)
        .bezier_curve_to(0.08, -1.2, 0.55, -0.95, 0.55, -0.52)
        .bezier_curve_to(0.55, -0.1, 0.0, 0.25, 0.0, 0.25);
    path
}

/// Extrudes the heart, centres it and flips it upright.
pub fn heart_mesh(options: &ExtrudeOptions) -> MeshData {
    let shape = heart_path().to_shape(options.curve_segments);
    let mut mesh = extrude(&[shape], options);
    mesh.center();
    mesh.rotate_x(PI);
    mesh
}

pub fn main_heart_options(config: &HeartConfig) -> ExtrudeOptions {
    ExtrudeOptions {
        depth: config.depth,
        steps: 1,
        bevel_enabled: true,
        bevel_segments: config.bevel_segments,
        bevel_size: config.bevel_size,
        bevel_thickness: config.bevel_thickness,
        curve_segments: 12,
    }
}

pub fn mini_heart_options() -> ExtrudeOptions {
    ExtrudeOptions {
        depth: 0.18,
        steps: 1,
        bevel_enabled: true,
        bevel_segments: 4,
        bevel_size: 0.04,
        bevel_thickness: 0.04,
        curve_segments: 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shape::signed_area;

    #[test]
    fn outline_is_closed_without_duplicate_end() {
        let shape = heart_path().to_shape(12);
        assert_eq!(shape.outline.len(), 48);
        assert!(shape.holes.is_empty());
        assert!(signed_area(&shape.outline).abs() > 0.3);
    }

    #[test]
    fn flipped_heart_points_tip_down() {
        let mesh = heart_mesh(&main_heart_options(&HeartConfig::default()));
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo + hi).length() < 1e-4);
        // After the flip the notch is on top: the lowest vertex sits on the axis.
        let lowest = mesh
            .positions
            .iter()
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap();
        assert!(lowest.x.abs() < 0.2, "tip at x = {}", lowest.x);
        assert!(mesh.triangle_count() > 500);
    }
}
