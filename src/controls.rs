//! Orbit camera controls: drag to rotate around the target, wheel or pinch
//! to dolly. Panning is not supported.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;
use crate::config::ControlsConfig;

const POLAR_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y.
    phi: f32,
    /// Azimuth around +Y, measured from +Z.
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let ring = self.phi.sin() * self.radius;
        Vec3::new(ring * self.theta.sin(), self.phi.cos() * self.radius, ring * self.theta.cos())
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    enable_damping: bool,
    damping_factor: f32,
    min_distance: f32,
    max_distance: f32,
    min_polar_angle: f32,
    max_polar_angle: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            target: Vec3::from(config.target),
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    /// Queues a rotation for a pointer drag of `dx`, `dy` pixels. Dragging
    /// across the full viewport height turns the camera once around.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.delta_theta -= TAU * dx / viewport_height * self.rotate_speed;
        self.delta_phi -= TAU * dy / viewport_height * self.rotate_speed;
    }

    fn zoom_scale(&self, delta: f32) -> f32 {
        0.95f32.powf(self.zoom_speed * (delta * 0.01).abs())
    }

    /// Wheel input: negative `delta_y` moves closer.
    pub fn dolly(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.scale *= self.zoom_scale(delta_y);
        } else if delta_y > 0.0 {
            self.scale /= self.zoom_scale(delta_y);
        }
    }

    /// Two-finger pinch: fingers moving apart move closer.
    pub fn pinch(&mut self, previous_distance: f32, distance: f32) {
        if previous_distance <= 0.0 || distance <= 0.0 {
            return;
        }
        self.scale /= (distance / previous_distance).powf(self.zoom_speed);
    }

    /// Applies queued input to `camera` and keeps it aimed at the target.
    /// With damping on, queued rotation bleeds off over the following frames.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if self.enable_damping {
            spherical.theta += self.delta_theta * self.damping_factor;
            spherical.phi += self.delta_phi * self.damping_factor;
        } else {
            spherical.theta += self.delta_theta;
            spherical.phi += self.delta_phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }
}

/// Camera gesture derived from pointer motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    None,
    /// One pointer dragged by this many pixels.
    Rotate { dx: f32, dy: f32 },
    /// Two pointers whose distance changed from `from` to `to` pixels.
    Pinch { from: f32, to: f32 },
}

/// Tracks up to two active pointers and turns their motion into gestures.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: Vec<(i32, Vec2)>,
}

impl PointerTracker {
    pub fn press(&mut self, id: i32, at: Vec2) {
        if self.pointers.len() < 2 && !self.pointers.iter().any(|(p, _)| *p == id) {
            self.pointers.push((id, at));
        }
    }

    pub fn release(&mut self, id: i32) {
        self.pointers.retain(|(p, _)| *p != id);
    }

    pub fn moved(&mut self, id: i32, at: Vec2) -> Gesture {
        let Some(index) = self.pointers.iter().position(|(p, _)| *p == id) else {
            return Gesture::None;
        };
        let previous = self.pointers[index].1;
        if self.pointers.len() == 2 {
            let other = self.pointers[1 - index].1;
            self.pointers[index].1 = at;
            Gesture::Pinch {
                from: previous.distance(other),
                to: at.distance(other),
            }
        } else {
            self.pointers[index].1 = at;
            let delta = at - previous;
            Gesture::Rotate {
                dx: delta.x,
                dy: delta.y,
            }
        }
    }
}

impl OrbitControls {
    pub fn apply(&mut self, gesture: Gesture, viewport_height: f32) {
        match gesture {
            Gesture::None => {}
            Gesture::Rotate { dx, dy } => self.rotate(dx, dy, viewport_height),
            Gesture::Pinch { from, to } => self.pinch(from, to),
        }
    }
}
