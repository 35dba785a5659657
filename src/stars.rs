use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::color::Color;
use crate::config::StarConfig;
use crate::transform::Transform;

/// Background point cloud filling a squashed ball around the heart.
pub struct Starfield {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub transform: Transform,
    pub size: f32,
    pub opacity: f32,
}

impl Starfield {
    pub fn generate<R: Rng>(config: &StarConfig, rng: &mut R) -> Self {
        let pink = Color::from_hex(0xff4da6);
        let violet = Color::from_hex(0xa855f7);
        let cyan = Color::from_hex(0x22d3ee);

        let mut positions = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            // cbrt keeps the density uniform through the volume.
            let r = config.radius * rng.gen::<f32>().cbrt();
            let theta = rng.gen::<f32>() * TAU;
            let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();
            positions.push(Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.cos() * 0.65 + 0.8,
                r * phi.sin() * theta.sin(),
            ));

            let pick = rng.gen::<f32>();
            let base = if pick < 0.45 {
                pink
            } else if pick < 0.8 {
                violet
            } else {
                cyan
            };
            let jittered = base.offset_hsl(
                (rng.gen::<f32>() - 0.5) * 0.03,
                0.0,
                (rng.gen::<f32>() - 0.5) * 0.06,
            );
            colors.push(jittered.to_vec3());
        }

        Self {
            positions,
            colors,
            transform: Transform::default(),
            size: config.size,
            opacity: config.opacity,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Slow drift: steady yaw plus a faint pitch wobble.
    pub fn animate(&mut self, t: f32) {
        self.transform.rotation.y = t * 0.02;
        self.transform.rotation.x = (t * 0.05).sin() * 0.02;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn stars_stay_inside_the_squashed_ball() {
        let mut rng = SmallRng::seed_from_u64(42);
        let stars = Starfield::generate(&StarConfig::default(), &mut rng);
        assert_eq!(stars.len(), 3200);
        for p in &stars.positions {
            let horizontal = (p.x * p.x + p.z * p.z).sqrt();
            assert!(horizontal <= 22.0 + 1e-3);
            assert!((p.y - 0.8).abs() <= 22.0 * 0.65 + 1e-3);
        }
        assert_eq!(stars.colors.len(), stars.positions.len());
    }

    #[test]
    fn colours_jitter_around_the_three_base_hues() {
        let mut rng = SmallRng::seed_from_u64(7);
        let stars = Starfield::generate(&StarConfig::default(), &mut rng);
        let bases = [0xff4da6, 0xa855f7, 0x22d3ee].map(|hex| Color::from_hex(hex).hsl());
        let mut seen = [0usize; 3];
        for c in &stars.colors {
            let (h, _, l) = Color::rgb(c.x, c.y, c.z).hsl();
            let matched = bases.iter().position(|&(bh, _, bl)| {
                let dh = (h - bh).abs();
                let dh = dh.min(1.0 - dh);
                dh <= 0.015 + 2e-3 && (l - bl).abs() <= 0.03 + 2e-3
            });
            let Some(index) = matched else {
                panic!("star colour {c:?} (h {h}, l {l}) is off every base hue");
            };
            seen[index] += 1;
        }
        // 45% / 35% / 20% split.
        let n = stars.len() as f32;
        for (count, share) in seen.iter().zip([0.45, 0.35, 0.2]) {
            assert!((*count as f32 / n - share).abs() < 0.05, "{seen:?}");
        }
    }
}
