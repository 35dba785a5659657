//! Runtime scene configuration loaded from `scene.toml`.
//!
//! Every section carries `#[serde(default)]`, so a minimal TOML file can
//! override just the values you care about and the rest fall back to the
//! defaults below. The browser front end fetches `scene.toml` next to
//! `index.html`; when that fails it logs a warning and runs with
//! [`SceneConfig::default`].

use serde::Deserialize;

use crate::error::{SceneError, SceneResult};

pub const DEFAULT_FONT_URL: &str =
    "https://unpkg.com/three@0.160.0/examples/fonts/helvetiker_regular.typeface.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub renderer: RendererConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub heart: HeartConfig,
    pub sparks: SparkConfig,
    pub mini_hearts: MiniHeartConfig,
    pub stars: StarConfig,
    pub text: TextConfig,
    pub messages: MessageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub max_pixel_ratio: f64,
    pub exposure: f32,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl RendererConfig {
    /// Device pixel ratio limited to `max_pixel_ratio`. Ratios below 1 pass through.
    pub fn pixel_ratio(&self, device: f64) -> f64 {
        device.min(self.max_pixel_ratio)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            exposure: 1.1,
            log_level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 50.0,
            near: 0.1,
            far: 120.0,
            position: [0.0, 1.2, 8.5],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub target: [f32; 3],
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            target: [0.0, 0.8, 0.0],
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 4.2,
            max_distance: 13.0,
            min_polar_angle: 0.25,
            max_polar_angle: std::f32::consts::PI * 0.72,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    pub scale: f32,
    pub base_height: f32,
    pub depth: f32,
    pub bevel_segments: u32,
    pub bevel_size: f32,
    pub bevel_thickness: f32,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            scale: 2.1,
            base_height: 1.05,
            depth: 0.55,
            bevel_segments: 8,
            bevel_size: 0.12,
            bevel_thickness: 0.12,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    pub max_sparks: usize,
    /// Upper bound of slots filled by one burst; `None` fills every free slot.
    pub per_burst: Option<usize>,
    pub gravity: f32,
    pub damping: f32,
    pub size: f32,
    pub reveal_power: f32,
    pub more_power: f32,
    pub pointer_power: f32,
    /// Distance along the pointer ray used when the heart is missed.
    pub miss_distance: f32,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            max_sparks: 1400,
            per_burst: None,
            gravity: 2.35,
            damping: 0.985,
            size: 0.06,
            reveal_power: 1.4,
            more_power: 1.6,
            pointer_power: 1.0,
            miss_distance: 7.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MiniHeartConfig {
    pub cap: usize,
    pub initial: usize,
    pub per_click: usize,
    pub ceiling: f32,
}

impl Default for MiniHeartConfig {
    fn default() -> Self {
        Self {
            cap: 160,
            initial: 42,
            per_click: 24,
            ceiling: 3.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    pub radius: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 3200,
            radius: 22.0,
            size: 0.04,
            opacity: 0.85,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub font_url: String,
    pub title: String,
    pub subtitle: String,
    /// Whether the 3D text shows before the first reveal.
    pub visible_before_reveal: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_url: DEFAULT_FONT_URL.into(),
            title: "Lina".into(),
            subtitle: "Je t'aime • Tu me manques".into(),
            visible_before_reveal: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub sets: Vec<Vec<String>>,
    pub footer: String,
    pub reveal_again_label: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        let sets = [
            [
                "Je t'aime ma p'tite choquette de tout mon cœur.",
                "Tu me manques à chaque instant.",
                "Pour toujours et à jamais ❤️",
            ],
            [
                "Tu es ma lumière.",
                "Chaque jour je pense à toi.",
                "Rien n'est plus doux que nous deux.",
            ],
            [
                "Ton sourire est mon soleil.",
                "Tes mots sont ma musique.",
                "Mon cœur bat pour toi.",
            ],
        ];
        Self {
            sets: sets
                .iter()
                .map(|set| set.iter().map(|line| line.to_string()).collect())
                .collect(),
            footer: "Lina, tu es tout pour moi.".into(),
            reveal_again_label: "Révéler encore".into(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(src: &str) -> SceneResult<Self> {
        let config: SceneConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SceneResult<()> {
        self.check_finite()?;
        if self.renderer.max_pixel_ratio <= 0.0 {
            return Err(SceneError::ConfigValue {
                name: "renderer.max_pixel_ratio",
                reason: "must be greater than zero",
            });
        }
        if self.sparks.max_sparks == 0 {
            return Err(SceneError::ConfigValue {
                name: "sparks.max_sparks",
                reason: "must be greater than zero",
            });
        }
        if self.mini_hearts.initial > self.mini_hearts.cap {
            return Err(SceneError::ConfigValue {
                name: "mini_hearts.initial",
                reason: "must not exceed mini_hearts.cap",
            });
        }
        if self.messages.sets.is_empty() || self.messages.sets.iter().any(|s| s.is_empty()) {
            return Err(SceneError::ConfigValue {
                name: "messages.sets",
                reason: "needs at least one non-empty message set",
            });
        }
        if self.controls.min_distance > self.controls.max_distance {
            return Err(SceneError::ConfigValue {
                name: "controls.min_distance",
                reason: "must not exceed controls.max_distance",
            });
        }
        if self.controls.min_polar_angle > self.controls.max_polar_angle {
            return Err(SceneError::ConfigValue {
                name: "controls.min_polar_angle",
                reason: "must not exceed controls.max_polar_angle",
            });
        }
        Ok(())
    }

    /// TOML accepts `nan` and `inf`; none of the scene parameters make sense with them.
    fn check_finite(&self) -> SceneResult<()> {
        let r = &self.renderer;
        let c = &self.camera;
        let o = &self.controls;
        let h = &self.heart;
        let s = &self.sparks;
        let st = &self.stars;
        let groups: [(&'static str, &[f32]); 9] = [
            ("renderer", &[r.max_pixel_ratio as f32, r.exposure]),
            ("camera", &[c.fov_deg, c.near, c.far]),
            ("camera.position", &c.position),
            ("controls.target", &o.target),
            (
                "controls",
                &[
                    o.damping_factor,
                    o.min_distance,
                    o.max_distance,
                    o.min_polar_angle,
                    o.max_polar_angle,
                    o.rotate_speed,
                    o.zoom_speed,
                ],
            ),
            (
                "heart",
                &[h.scale, h.base_height, h.depth, h.bevel_size, h.bevel_thickness],
            ),
            (
                "sparks",
                &[
                    s.gravity,
                    s.damping,
                    s.size,
                    s.reveal_power,
                    s.more_power,
                    s.pointer_power,
                    s.miss_distance,
                ],
            ),
            ("mini_hearts.ceiling", &[self.mini_hearts.ceiling]),
            ("stars", &[st.radius, st.size, st.opacity]),
        ];
        for (name, values) in groups {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(SceneError::ConfigValue {
                    name,
                    reason: "must only contain finite numbers",
                });
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::Level {
        match self.renderer.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped_but_never_raised() {
        let renderer = RendererConfig::default();
        assert_eq!(renderer.pixel_ratio(3.0), 2.0);
        assert_eq!(renderer.pixel_ratio(1.5), 1.5);
        assert_eq!(renderer.pixel_ratio(0.75), 0.75);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config.sparks.max_sparks, 1400);
        assert_eq!(config.mini_hearts.cap, 160);
        assert_eq!(config.messages.sets.len(), 3);
        assert_eq!(config.text.title, "Lina");
    }

    #[test]
    fn partial_section_overrides_only_named_keys() {
        let config = SceneConfig::from_toml_str(
            r#"
            [sparks]
            max_sparks = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.sparks.max_sparks, 64);
        assert!((config.sparks.gravity - 2.35).abs() < 1e-6);
    }

    #[test]
    fn rejects_empty_message_sets() {
        let err = SceneConfig::from_toml_str(
            r#"
            [messages]
            sets = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::ConfigValue { name: "messages.sets", .. }));
    }

    #[test]
    fn rejects_initial_over_cap() {
        let err = SceneConfig::from_toml_str(
            r#"
            [mini_hearts]
            cap = 10
            initial = 11
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::ConfigValue { .. }));
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let mut config = SceneConfig::default();
        config.renderer.log_level = "chatty".into();
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
