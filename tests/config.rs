use heart_wasm::{SceneConfig, SceneError};

#[test]
fn shipped_scene_toml_is_valid() {
    let config = SceneConfig::from_toml_str(include_str!("../static/scene.toml")).unwrap();
    let defaults = SceneConfig::default();
    assert_eq!(config.sparks.max_sparks, defaults.sparks.max_sparks);
    assert_eq!(config.mini_hearts.cap, defaults.mini_hearts.cap);
    assert_eq!(config.text.subtitle, defaults.text.subtitle);
    assert_eq!(config.log_level(), log::Level::Info);
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = SceneConfig::from_toml_str("[sparks\nmax_sparks = 1").unwrap_err();
    assert!(matches!(err, SceneError::Config(_)));
}

#[test]
fn initial_hearts_above_cap_are_rejected() {
    let err = SceneConfig::from_toml_str("[mini_hearts]\ncap = 10\ninitial = 11").unwrap_err();
    match err {
        SceneError::ConfigValue { name, .. } => assert_eq!(name, "mini_hearts.initial"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_non_finite_values() {
    for (src, field) in [
        ("[controls]\nmin_polar_angle = nan\n", "controls"),
        ("[controls]\nmax_distance = nan\n", "controls"),
        ("[camera]\nposition = [0.0, inf, 8.5]\n", "camera.position"),
        ("[sparks]\ngravity = -inf\n", "sparks"),
        ("[renderer]\nmax_pixel_ratio = nan\n", "renderer"),
    ] {
        match SceneConfig::from_toml_str(src) {
            Err(SceneError::ConfigValue { name, .. }) => assert_eq!(name, field, "{src}"),
            Err(other) => panic!("{src}: unexpected error {other}"),
            Ok(_) => panic!("{src}: accepted"),
        }
    }
}

#[test]
fn validated_config_survives_a_frame() {
    use heart_wasm::clock::FrameTime;
    use heart_wasm::Scene;

    let mut config = SceneConfig::from_toml_str("[controls]\nmin_polar_angle = 0.5\n").unwrap();
    config.stars.count = 8;
    let mut scene = Scene::new(config, 4);
    scene.update(FrameTime {
        elapsed: 0.5,
        delta: 0.016,
    });
    assert!(scene.camera.position.is_finite());
}

#[test]
fn non_positive_pixel_ratio_cap_is_rejected() {
    let err = SceneConfig::from_toml_str("[renderer]\nmax_pixel_ratio = 0.0\n").unwrap_err();
    assert!(matches!(
        err,
        SceneError::ConfigValue { name: "renderer.max_pixel_ratio", .. }
    ));
}
