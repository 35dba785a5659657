//! Error types shared by the scene core and the browser front end.
//!
//! Core modules return [`SceneResult`]; the wasm entry points convert into
//! `JsValue` at the boundary so `#[wasm_bindgen]` functions keep their
//! `Result<(), JsValue>` signatures.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SceneError {
    /// `scene.toml` could not be parsed.
    #[error("invalid scene config: {0}")]
    Config(#[from] toml::de::Error),

    /// A config value parsed fine but is outside the range the scene can use.
    #[error("config value `{name}` is invalid: {reason}")]
    ConfigValue {
        name: &'static str,
        reason: &'static str,
    },

    /// The typeface JSON could not be parsed.
    #[error("invalid typeface font: {0}")]
    Font(#[from] serde_json::Error),

    #[error("DOM: {0}")]
    Dom(String),

    #[error("WebGL: {0}")]
    WebGl(String),

    /// A JS exception surfaced through `JsValue`.
    #[error("JS error: {0}")]
    Js(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

impl SceneError {
    pub fn dom(msg: impl Into<String>) -> Self {
        SceneError::Dom(msg.into())
    }

    pub fn webgl(msg: impl Into<String>) -> Self {
        SceneError::WebGl(msg.into())
    }
}

impl From<JsValue> for SceneError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        SceneError::Js(msg)
    }
}

impl From<SceneError> for JsValue {
    fn from(err: SceneError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_value_message_names_the_key() {
        let err = SceneError::ConfigValue {
            name: "sparks.max_sparks",
            reason: "must be greater than zero",
        };
        assert_eq!(
            err.to_string(),
            "config value `sparks.max_sparks` is invalid: must be greater than zero"
        );
    }

    #[test]
    fn toml_errors_convert() {
        let parse: Result<toml::Value, _> = toml::from_str("not = [valid");
        let err: SceneError = parse.unwrap_err().into();
        assert!(matches!(err, SceneError::Config(_)));
    }
}
