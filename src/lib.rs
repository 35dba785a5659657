#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Animated 3D heart scene for a browser canvas.
//!
//! Everything outside `wasm` is plain Rust and runs (and is tested) on the
//! host; the `wasm` module wires it to the DOM and WebGL2.

pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod font;
pub mod geometry;
pub mod heart;
pub mod material;
pub mod mini_hearts;
pub mod raycast;
pub mod reveal;
pub mod scene;
pub mod sparks;
pub mod stars;
pub mod transform;

pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use scene::Scene;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    mod app;
    mod dom;
    mod input;
    mod loader;
    mod render;
    mod shaders;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // The config may raise verbosity later; start wide and narrow to the default.
        console_log::init_with_level(log::Level::Trace).ok();
        log::set_max_level(log::LevelFilter::Info);
        log::info!("heart scene starting");

        let page = dom::Page::locate()?;
        spawn_local(async move {
            if let Err(e) = app::run(page).await {
                log::error!("scene init failed: {e}");
            }
        });
        Ok(())
    }
}
