use rand::rngs::SmallRng;
use rand::SeedableRng;

use heart_wasm::clock::FrameTime;
use heart_wasm::config::MiniHeartConfig;
use heart_wasm::mini_hearts::MiniHeartField;
use heart_wasm::{Scene, SceneConfig};

#[test]
fn population_never_exceeds_cap() {
    let mut rng = SmallRng::seed_from_u64(21);
    let config = MiniHeartConfig::default();
    let mut field = MiniHeartField::new(&config);
    for round in 0..50 {
        field.spawn(round % 37, &mut rng);
        field.tick(0.033, &mut rng);
        assert!(field.len() <= config.cap);
    }
    assert_eq!(field.len(), config.cap);
}

#[test]
fn hearts_stay_below_ceiling_after_each_tick() {
    let mut rng = SmallRng::seed_from_u64(8);
    let config = MiniHeartConfig::default();
    let mut field = MiniHeartField::new(&config);
    field.spawn(config.initial, &mut rng);
    for _ in 0..2000 {
        field.tick(0.033, &mut rng);
        assert!(field
            .hearts()
            .iter()
            .all(|h| h.transform.position.y <= config.ceiling));
    }
}

#[test]
fn more_button_adds_until_full() {
    let mut config = SceneConfig::default();
    config.stars.count = 16;
    let mut scene = Scene::new(config, 12);
    assert_eq!(scene.mini_hearts.len(), 42);
    let added: Vec<usize> = (0..7).map(|_| scene.more()).collect();
    assert_eq!(added, vec![24, 24, 24, 24, 22, 0, 0]);
    scene.update(FrameTime {
        elapsed: 1.0,
        delta: 0.016,
    });
    assert_eq!(scene.mini_hearts.len(), 160);
}
