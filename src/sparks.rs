//! Spark bursts: a fixed-capacity particle pool.
//!
//! State lives in flat, slot-indexed arrays that are uploaded to the GPU as
//! is. A slot is free while its lifetime is `<= 0`; bursts scan linearly for
//! free slots and never grow the pool.

use glam::Vec3;
use rand::Rng;

use crate::color::Color;
use crate::config::SparkConfig;

pub const SPARK_PALETTE: [u32; 4] = [0xff4da6, 0xa855f7, 0x22d3ee, 0xff9bd1];

/// Fade-in reference: the pool reaches full opacity at this many live sparks.
const FULL_OPACITY_COUNT: f32 = 180.0;

pub struct SparkPool {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    lifetimes: Vec<f32>,
    colors: Vec<Vec3>,
    palette: Vec<Color>,
    per_burst: usize,
    gravity: f32,
    damping: f32,
}

impl SparkPool {
    pub fn new(config: &SparkConfig) -> Self {
        let capacity = config.max_sparks;
        Self {
            positions: vec![Vec3::ZERO; capacity],
            velocities: vec![Vec3::ZERO; capacity],
            lifetimes: vec![0.0; capacity],
            colors: vec![Vec3::ZERO; capacity],
            palette: SPARK_PALETTE.iter().map(|&hex| Color::from_hex(hex)).collect(),
            per_burst: config.per_burst.unwrap_or(capacity),
            gravity: config.gravity,
            damping: config.damping,
        }
    }

    pub fn capacity(&self) -> usize {
        self.lifetimes.len()
    }

    pub fn is_free(&self, slot: usize) -> bool {
        self.lifetimes[slot] <= 0.0
    }

    pub fn lifetime(&self, slot: usize) -> f32 {
        self.lifetimes[slot]
    }

    pub fn position(&self, slot: usize) -> Vec3 {
        self.positions[slot]
    }

    pub fn velocity(&self, slot: usize) -> Vec3 {
        self.velocities[slot]
    }

    /// Fills free slots with sparks flying out of `origin`; returns how many
    /// slots were used.
    pub fn burst<R: Rng>(&mut self, origin: Vec3, power: f32, rng: &mut R) -> usize {
        let mut spawned = 0;
        for slot in 0..self.capacity() {
            if spawned >= self.per_burst {
                break;
            }
            if !self.is_free(slot) {
                continue;
            }
            let dir = loop {
                let v = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                if let Some(d) = v.try_normalize() {
                    break d;
                }
            };
            let speed = (0.9 + rng.gen::<f32>() * 1.8) * power;
            self.positions[slot] = origin;
            self.velocities[slot] = dir * speed + Vec3::new(0.0, 0.6 * power, 0.0);
            self.lifetimes[slot] = 0.9 + rng.gen::<f32>() * 0.9;
            let color = self.palette[rng.gen_range(0..self.palette.len())];
            self.colors[slot] = color.to_vec3();
            spawned += 1;
        }
        spawned
    }

    /// Advances every live spark by `dt` seconds: gravity, motion, damping.
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let damping = self.damping;
        for slot in 0..self.capacity() {
            let life = self.lifetimes[slot];
            if life <= 0.0 {
                continue;
            }
            self.lifetimes[slot] = life - dt;
            let vel = &mut self.velocities[slot];
            vel.y -= self.gravity * dt;
            self.positions[slot] += *vel * dt;
            *vel *= damping;
        }
    }

    pub fn active_count(&self) -> usize {
        self.lifetimes.iter().filter(|&&life| life > 0.0).count()
    }

    /// Material opacity: dim when few sparks are alive, full from 180 on.
    pub fn opacity(&self) -> f32 {
        0.25 + (self.active_count() as f32 / FULL_OPACITY_COUNT).min(1.0) * 0.75
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Slot colours with expired slots blacked out, ready for additive drawing.
    pub fn visible_colors(&self, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(
            self.colors
                .iter()
                .zip(&self.lifetimes)
                .map(|(&c, &life)| if life > 0.0 { c } else { Vec3::ZERO }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn pool(max: usize) -> SparkPool {
        SparkPool::new(&SparkConfig {
            max_sparks: max,
            ..Default::default()
        })
    }

    #[test]
    fn burst_fills_every_free_slot() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut sparks = pool(32);
        assert_eq!(sparks.burst(Vec3::ZERO, 1.0, &mut rng), 32);
        assert_eq!(sparks.burst(Vec3::ZERO, 1.0, &mut rng), 0);
        assert_eq!(sparks.active_count(), 32);
    }

    #[test]
    fn per_burst_limits_slots() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut sparks = SparkPool::new(&SparkConfig {
            max_sparks: 32,
            per_burst: Some(10),
            ..Default::default()
        });
        assert_eq!(sparks.burst(Vec3::ONE, 1.0, &mut rng), 10);
        assert_eq!(sparks.position(3), Vec3::ONE);
        assert!(sparks.is_free(10));
    }

    #[test]
    fn gravity_pulls_down() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut sparks = pool(1);
        sparks.burst(Vec3::ZERO, 1.0, &mut rng);
        let before = sparks.velocity(0).y;
        sparks.tick(0.016);
        assert!(sparks.velocity(0).y < before);
    }

    #[test]
    fn opacity_ramps_with_population() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sparks = pool(400);
        assert!((sparks.opacity() - 0.25).abs() < 1e-6);
        sparks.burst(Vec3::ZERO, 1.0, &mut rng);
        assert!((sparks.opacity() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn expired_slots_render_black() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut sparks = pool(4);
        sparks.burst(Vec3::ZERO, 1.0, &mut rng);
        for _ in 0..200 {
            sparks.tick(0.033);
        }
        let mut colors = Vec::new();
        sparks.visible_colors(&mut colors);
        assert!(colors.iter().all(|c| *c == Vec3::ZERO));
    }
}
