//! Surface and light parameters consumed by the renderer.

use glam::Vec3;

use crate::color::Color;

/// Metal/rough lit surface.
#[derive(Clone, Copy, Debug)]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
}

impl StandardMaterial {
    pub fn emissive_radiance(&self) -> Color {
        self.emissive.scaled(self.emissive_intensity)
    }
}

/// Unlit, translucent, additively blended surface.
#[derive(Clone, Copy, Debug)]
pub struct GlowMaterial {
    pub color: Color,
    pub opacity: f32,
}

/// Additive point sprites with per-vertex colour.
#[derive(Clone, Copy, Debug)]
pub struct PointsMaterial {
    pub size: f32,
    pub opacity: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Point light with inverse-power falloff and a smooth cut-off at `distance`.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
    pub position: Vec3,
}

impl PointLight {
    pub fn new(hex: u32, intensity: f32, distance: f32, decay: f32, position: Vec3) -> Self {
        Self {
            color: Color::from_hex(hex),
            intensity,
            distance,
            decay,
            position,
        }
    }

    pub fn radiance(&self) -> Color {
        self.color.scaled(self.intensity)
    }
}
