//! Fetching the runtime config and the typeface font.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::font::Font;

pub const CONFIG_URL: &str = "scene.toml";

async fn fetch_text(window: &Window, url: &str) -> SceneResult<String> {
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()
        .map_err(|_| SceneError::Js(format!("fetch {url}: not a Response")))?;
    if !response.ok() {
        return Err(SceneError::Js(format!(
            "fetch {url}: HTTP {}",
            response.status()
        )));
    }
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| SceneError::Js(format!("fetch {url}: body is not text")))
}

/// `scene.toml` next to the page, or the defaults when it is missing or invalid.
pub async fn load_config(window: &Window) -> SceneConfig {
    let loaded = match fetch_text(window, CONFIG_URL).await {
        Ok(src) => SceneConfig::from_toml_str(&src),
        Err(e) => Err(e),
    };
    match loaded {
        Ok(config) => {
            log::info!("loaded {CONFIG_URL}");
            config
        }
        Err(e) => {
            log::warn!("using default scene config: {e}");
            SceneConfig::default()
        }
    }
}

pub async fn load_font(window: &Window, url: &str) -> SceneResult<Font> {
    let src = fetch_text(window, url).await?;
    let font = Font::from_json(&src)?;
    log::info!("font {:?} loaded ({} glyphs)", font.family_name, font.glyphs.len());
    Ok(font)
}
