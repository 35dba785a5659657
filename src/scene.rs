//! The whole scene: built once, then animated by [`Scene::update`] every
//! frame and poked by the reveal / more / pointer actions.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::camera::PerspectiveCamera;
use crate::clock::FrameTime;
use crate::color::Color;
use crate::config::SceneConfig;
use crate::controls::OrbitControls;
use crate::font::{text_mesh, Font, TextOptions};
use crate::geometry::primitives::{sphere, torus};
use crate::geometry::MeshData;
use crate::heart::{heart_mesh, main_heart_options, mini_heart_options};
use crate::material::{AmbientLight, GlowMaterial, PointLight, PointsMaterial, StandardMaterial};
use crate::mini_hearts::MiniHeartField;
use crate::raycast::Ray;
use crate::reveal::MessageCycle;
use crate::sparks::SparkPool;
use crate::stars::Starfield;
use crate::transform::Transform;

/// Offset from the heart centre where button bursts start.
const BURST_LIFT: Vec3 = Vec3::new(0.0, 0.2, 0.0);

pub struct Ring {
    pub mesh: MeshData,
    pub transform: Transform,
    pub material: GlowMaterial,
}

pub struct TextPiece {
    pub mesh: MeshData,
    pub transform: Transform,
}

/// 3D title and subtitle sharing one material, floating as a group.
pub struct TextBlock {
    pub group: Transform,
    pub pieces: Vec<TextPiece>,
    pub material: StandardMaterial,
    pub visible: bool,
    /// Bumped whenever `pieces` changes so GPU copies can be refreshed.
    pub generation: u32,
}

/// What the page should show after a reveal.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealOutcome {
    pub lines: Vec<String>,
    pub footer: String,
    pub reveal_label: String,
    pub first_reveal: bool,
}

pub struct Scene {
    config: SceneConfig,
    rng: SmallRng,
    messages: MessageCycle,
    revealed: bool,

    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,

    pub ambient: AmbientLight,
    pub key_light: PointLight,
    pub rim_light: PointLight,
    pub sparkle_light: PointLight,

    pub heart_mesh: MeshData,
    pub heart: Transform,
    pub heart_material: StandardMaterial,

    pub halo_mesh: MeshData,
    pub halo: Transform,
    pub halo_material: GlowMaterial,

    pub rings: [Ring; 2],

    pub mini_heart_mesh: MeshData,
    pub mini_hearts: MiniHeartField,
    pub mini_heart_material: StandardMaterial,

    pub stars: Starfield,

    pub sparks: SparkPool,
    pub spark_material: PointsMaterial,

    pub text: TextBlock,
}

impl Scene {
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);

        let controls = OrbitControls::new(&config.controls);
        let camera = PerspectiveCamera::new(&config.camera, controls.target);

        let heart_position = Vec3::new(0.0, config.heart.base_height, 0.0);
        let heart = Transform::at(heart_position).with_uniform_scale(config.heart.scale);

        let ring_material = GlowMaterial {
            color: Color::from_hex(0xff9bd1),
            opacity: 0.35,
        };
        let rings = [
            Ring {
                mesh: torus(2.4, 0.03, 12, 64),
                transform: Transform::at(Vec3::new(0.0, 1.0, 0.0))
                    .with_rotation(Vec3::new(PI / 2.3, 0.0, 0.0)),
                material: ring_material,
            },
            Ring {
                mesh: torus(1.9, 0.025, 12, 64),
                transform: Transform::at(Vec3::new(0.0, 1.25, 0.0))
                    .with_rotation(Vec3::new(PI / 1.9, 0.0, 0.0)),
                material: ring_material,
            },
        ];

        let mut mini_hearts = MiniHeartField::new(&config.mini_hearts);
        mini_hearts.spawn(config.mini_hearts.initial, &mut rng);

        let stars = Starfield::generate(&config.stars, &mut rng);
        let sparks = SparkPool::new(&config.sparks);

        let text = TextBlock {
            group: Transform::at(Vec3::new(0.0, 0.25, 0.0)),
            pieces: Vec::new(),
            material: StandardMaterial {
                color: Color::from_hex(0xf6f3ff),
                roughness: 0.25,
                metalness: 0.15,
                emissive: Color::from_hex(0x0b0720),
                emissive_intensity: 0.8,
            },
            visible: config.text.visible_before_reveal,
            generation: 0,
        };

        Self {
            messages: MessageCycle::new(config.messages.sets.clone()),
            revealed: false,

            camera,
            controls,

            ambient: AmbientLight {
                color: Color::WHITE,
                intensity: 0.35,
            },
            key_light: PointLight::new(0xff5cab, 65.0, 45.0, 2.0, Vec3::new(3.2, 2.8, 3.4)),
            rim_light: PointLight::new(0x7c3aed, 55.0, 45.0, 2.0, Vec3::new(-4.0, 1.8, -2.0)),
            sparkle_light: PointLight::new(0x22d3ee, 18.0, 18.0, 2.0, Vec3::new(0.0, 2.2, 2.2)),

            heart_mesh: heart_mesh(&main_heart_options(&config.heart)),
            heart,
            heart_material: StandardMaterial {
                color: Color::from_hex(0xff4da6),
                roughness: 0.18,
                metalness: 0.55,
                emissive: Color::from_hex(0x280013),
                emissive_intensity: 0.8,
            },

            halo_mesh: sphere(1.35, 48, 48),
            halo: Transform::at(heart_position),
            halo_material: GlowMaterial {
                color: Color::from_hex(0xff4da6),
                opacity: 0.08,
            },

            rings,

            mini_heart_mesh: heart_mesh(&mini_heart_options()),
            mini_hearts,
            mini_heart_material: StandardMaterial {
                color: Color::WHITE,
                roughness: 0.3,
                metalness: 0.35,
                emissive: Color::from_hex(0x18081b),
                emissive_intensity: 0.5,
            },

            stars,

            sparks,
            spark_material: PointsMaterial {
                size: config.sparks.size,
                opacity: 0.95,
                size_attenuation: true,
            },

            text,

            rng,
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn point_lights(&self) -> [&PointLight; 3] {
        [&self.key_light, &self.rim_light, &self.sparkle_light]
    }

    /// Matches the camera projection to the viewport; see [`PerspectiveCamera::set_viewport`].
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.camera.set_viewport(width, height)
    }

    /// Advances every animated property to time `frame.elapsed`.
    pub fn update(&mut self, frame: FrameTime) {
        let t = frame.elapsed;
        let dt = frame.delta;

        self.heart.rotation.y = t * 0.55;
        self.heart.rotation.z = (t * 0.9).sin() * 0.05;
        self.heart.position.y = self.config.heart.base_height + (t * 1.15).sin() * 0.08;
        self.halo.position = self.heart.position;
        self.halo.set_uniform_scale(1.0 + ((t * 1.2).sin() * 0.04 + 0.04));
        self.heart_material.emissive_intensity = 0.75 + (t * 2.2).sin() * 0.1;

        self.rings[0].transform.rotation.y = t * 0.25;
        self.rings[1].transform.rotation.y = -t * 0.18;
        self.rings[0].material.opacity = 0.25 + (t * 1.6).sin() * 0.12;
        self.rings[1].material.opacity = 0.22 + (t * 1.3).cos() * 0.1;

        self.key_light.intensity = 58.0 + (t * 1.1).sin() * 10.0;
        self.rim_light.intensity = 46.0 + (t * 1.3 + 1.2).sin() * 9.0;
        self.sparkle_light.intensity = 12.0 + (t * 1.9 + 0.5).sin() * 7.0;

        self.stars.animate(t);

        self.text.group.rotation.y = (t * 0.35).sin() * 0.18;
        self.text.group.position.y = 0.22 + (t * 0.75).sin() * 0.08;

        self.mini_hearts.tick(dt, &mut self.rng);

        self.sparks.tick(dt);
        self.spark_material.opacity = self.sparks.opacity();

        self.controls.update(&mut self.camera);
    }

    pub fn burst_origin(&self) -> Vec3 {
        self.heart.position + BURST_LIFT
    }

    /// Hands out the next message set, shows the 3D text on the first call
    /// and fires a burst from the heart.
    pub fn reveal(&mut self) -> RevealOutcome {
        let lines = self.messages.next_set().to_vec();
        let first_reveal = !self.revealed;
        if first_reveal {
            self.revealed = true;
            self.text.visible = true;
        }
        let origin = self.burst_origin();
        self.sparks
            .burst(origin, self.config.sparks.reveal_power, &mut self.rng);
        RevealOutcome {
            lines,
            footer: self.config.messages.footer.clone(),
            reveal_label: self.config.messages.reveal_again_label.clone(),
            first_reveal,
        }
    }

    /// Extra mini hearts plus a stronger burst; returns how many hearts were added.
    pub fn more(&mut self) -> usize {
        let added = self
            .mini_hearts
            .spawn(self.config.mini_hearts.per_click, &mut self.rng);
        let origin = self.burst_origin();
        self.sparks
            .burst(origin, self.config.sparks.more_power, &mut self.rng);
        added
    }

    /// World point under the pointer: the hit on the heart, or a point a
    /// fixed distance along the pointer ray.
    pub fn pointer_target(&self, ndc: Vec2) -> Vec3 {
        let ray = Ray::from_camera(ndc, &self.camera);
        ray.intersect_mesh(&self.heart_mesh, self.heart.matrix())
            .unwrap_or_else(|| ray.at(self.config.sparks.miss_distance))
    }

    pub fn pointer_burst(&mut self, ndc: Vec2) -> Vec3 {
        let target = self.pointer_target(ndc);
        self.sparks
            .burst(target, self.config.sparks.pointer_power, &mut self.rng);
        target
    }

    /// Builds the title and subtitle meshes from a freshly loaded font.
    pub fn attach_font(&mut self, font: &Font) {
        let title = text_mesh(
            font,
            &self.config.text.title,
            &TextOptions {
                size: 0.55,
                height: 0.12,
                curve_segments: 10,
                bevel_enabled: true,
                bevel_thickness: 0.025,
                bevel_size: 0.02,
                bevel_segments: 5,
            },
        );
        let subtitle = text_mesh(
            font,
            &self.config.text.subtitle,
            &TextOptions {
                size: 0.22,
                height: 0.06,
                curve_segments: 10,
                bevel_enabled: true,
                bevel_thickness: 0.015,
                bevel_size: 0.01,
                bevel_segments: 4,
            },
        );
        self.text.pieces = [
            (title, Vec3::new(0.0, 3.15, 0.82)),
            (subtitle, Vec3::new(0.0, 2.55, 0.72)),
        ]
        .into_iter()
        .filter(|(mesh, _)| !mesh.is_empty())
        .map(|(mesh, position)| TextPiece {
            mesh,
            transform: Transform::at(position),
        })
        .collect();
        self.text.generation = self.text.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scene() -> Scene {
        let mut config = SceneConfig::default();
        config.stars.count = 64;
        Scene::new(config, 1)
    }

    #[test]
    fn update_follows_the_heart_with_the_halo() {
        let mut scene = small_scene();
        scene.update(FrameTime {
            elapsed: 2.0,
            delta: 0.016,
        });
        assert_eq!(scene.halo.position, scene.heart.position);
        assert!((scene.heart.rotation.y - 1.1).abs() < 1e-6);
        let key = 58.0 + (2.2f32).sin() * 10.0;
        assert!((scene.key_light.intensity - key).abs() < 1e-4);
    }

    #[test]
    fn reveal_marks_first_only_once() {
        let mut scene = small_scene();
        scene.text.visible = false;
        let first = scene.reveal();
        assert!(first.first_reveal);
        assert!(scene.text.visible);
        assert!(!scene.reveal().first_reveal);
        assert!(scene.sparks.active_count() > 0);
    }

    #[test]
    fn clicking_the_heart_bursts_on_its_surface() {
        let mut scene = small_scene();
        scene.resize(800.0, 600.0);
        let heart_ndc = scene
            .camera
            .view_projection()
            .project_point3(scene.heart.position)
            .truncate();
        let target = scene.pointer_burst(heart_ndc);
        // The surface sits between the camera and the heart centre.
        assert!(target.z > 0.0 && target.z < 2.0, "hit at {target:?}");
        assert!(scene.sparks.active_count() > 0);
    }

    #[test]
    fn clicking_empty_space_uses_the_miss_distance() {
        let scene = small_scene();
        let target = scene.pointer_target(Vec2::new(0.95, 0.95));
        assert!((target.distance(scene.camera.position) - 7.0).abs() < 1e-3);
    }
}
