use heart_wasm::{Scene, SceneConfig};

fn scene() -> Scene {
    let mut config = SceneConfig::default();
    config.stars.count = 16;
    Scene::new(config, 3)
}

#[test]
fn resize_sets_aspect_to_width_over_height() {
    let mut scene = scene();
    for (w, h) in [(1920.0, 1080.0), (1080.0, 1920.0), (333.0, 777.0), (1.0, 1.0)] {
        assert!(scene.resize(w, h));
        assert_eq!(scene.camera.aspect, (w / h) as f32);
    }
}

#[test]
fn zero_sized_viewport_keeps_previous_aspect() {
    let mut scene = scene();
    assert!(scene.resize(800.0, 400.0));
    assert!(!scene.resize(0.0, 400.0));
    assert!(!scene.resize(800.0, 0.0));
    assert_eq!(scene.camera.aspect, 2.0);
}

#[test]
fn projection_keeps_vertical_field_of_view_across_aspects() {
    let mut scene = scene();
    scene.resize(1920.0, 1080.0);
    let wide = scene.camera.projection_matrix();
    scene.resize(1080.0, 1920.0);
    let tall = scene.camera.projection_matrix();
    assert_eq!(wide.y_axis.y, tall.y_axis.y);
    assert!(wide.x_axis.x < tall.x_axis.x);
}
