//! Small hearts drifting upward around the scene.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::color::Color;
use crate::config::MiniHeartConfig;
use crate::transform::Transform;

pub const MINI_HEART_PALETTE: [u32; 4] = [0xff4da6, 0xa855f7, 0xff9bd1, 0x22d3ee];

#[derive(Clone, Debug)]
pub struct MiniHeart {
    pub transform: Transform,
    pub color: Color,
    /// Rise speed in units per second.
    pub rise: f32,
    /// Spin rate per axis in radians per second.
    pub spin: Vec3,
}

impl MiniHeart {
    fn random<R: Rng>(rng: &mut R) -> Self {
        let color = Color::from_hex(MINI_HEART_PALETTE[rng.gen_range(0..MINI_HEART_PALETTE.len())]);
        let radius = 3.0 + rng.gen::<f32>() * 5.0;
        let angle = rng.gen::<f32>() * TAU;
        let position = Vec3::new(
            angle.cos() * radius,
            0.6 + rng.gen::<f32>() * 2.6,
            angle.sin() * radius * 0.6,
        );
        let scale = 0.14 + rng.gen::<f32>() * 0.18;
        Self {
            transform: Transform::at(position).with_uniform_scale(scale),
            color,
            rise: 0.12 + rng.gen::<f32>() * 0.25,
            spin: Vec3::new(
                rng.gen::<f32>() * 0.2,
                rng.gen::<f32>() * 0.4,
                rng.gen::<f32>() * 0.2,
            ),
        }
    }
}

pub struct MiniHeartField {
    hearts: Vec<MiniHeart>,
    cap: usize,
    ceiling: f32,
}

impl MiniHeartField {
    pub fn new(config: &MiniHeartConfig) -> Self {
        Self {
            hearts: Vec::with_capacity(config.cap),
            cap: config.cap,
            ceiling: config.ceiling,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.hearts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty()
    }

    pub fn hearts(&self) -> &[MiniHeart] {
        &self.hearts
    }

    /// Adds up to `count` hearts without going over the cap; returns how many were added.
    pub fn spawn<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let room = self.cap.saturating_sub(self.hearts.len());
        let to_make = room.min(count);
        for _ in 0..to_make {
            self.hearts.push(MiniHeart::random(rng));
        }
        to_make
    }

    /// Rises and spins every heart; hearts above the ceiling drop back near the floor.
    pub fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        for heart in &mut self.hearts {
            let t = &mut heart.transform;
            t.position.y += heart.rise * dt;
            t.rotation += heart.spin * dt;
            if t.position.y > self.ceiling {
                t.position.y = 0.4 + rng.gen::<f32>() * 0.6;
                t.position.x += (rng.gen::<f32>() - 0.5) * 1.5;
                t.position.z += (rng.gen::<f32>() - 0.5) * 1.5;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_stops_at_cap() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut field = MiniHeartField::new(&MiniHeartConfig::default());
        assert_eq!(field.spawn(42, &mut rng), 42);
        assert_eq!(field.spawn(200, &mut rng), 118);
        assert_eq!(field.spawn(1, &mut rng), 0);
        assert_eq!(field.len(), 160);
    }

    #[test]
    fn hearts_spawn_in_the_ring() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut field = MiniHeartField::new(&MiniHeartConfig::default());
        field.spawn(50, &mut rng);
        for heart in field.hearts() {
            let p = heart.transform.position;
            assert!((0.6..=3.2).contains(&p.y));
            assert!(p.x.abs() <= 8.0 && p.z.abs() <= 4.8);
            let s = heart.transform.scale.x;
            assert!((0.14..=0.32).contains(&s));
        }
    }

    #[test]
    fn risen_hearts_recycle_low() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut field = MiniHeartField::new(&MiniHeartConfig::default());
        field.spawn(10, &mut rng);
        for _ in 0..2000 {
            field.tick(0.033, &mut rng);
            assert!(field.hearts().iter().all(|h| h.transform.position.y <= 3.6));
        }
    }
}
