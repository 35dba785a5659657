//! Handles to the page elements the scene talks to.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, Window};

use crate::error::{SceneError, SceneResult};
use crate::raycast::ClientRect;
use crate::scene::RevealOutcome;

#[derive(Clone)]
pub struct Page {
    pub window: Window,
    pub canvas: HtmlCanvasElement,
    pub reveal_button: HtmlButtonElement,
    pub more_button: HtmlButtonElement,
    pub message: HtmlElement,
    pub footer: HtmlElement,
}

fn element<T: JsCast>(document: &Document, id: &str) -> SceneResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SceneError::dom(format!("#{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| SceneError::dom(format!("#{id} has the wrong element type")))
}

impl Page {
    pub fn locate() -> SceneResult<Self> {
        let window = web_sys::window().ok_or_else(|| SceneError::dom("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| SceneError::dom("no document"))?;
        Ok(Self {
            canvas: element(&document, "c")?,
            reveal_button: element(&document, "reveal")?,
            more_button: element(&document, "more")?,
            message: element(&document, "message")?,
            footer: element(&document, "footer")?,
            window,
        })
    }

    pub fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    pub fn canvas_rect(&self) -> ClientRect {
        let rect = self.canvas.get_bounding_client_rect();
        ClientRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// CSS size of the canvas.
    pub fn canvas_client_size(&self) -> (f64, f64) {
        (
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
        )
    }

    pub fn set_message(&self, text: &str) {
        self.message.set_text_content(Some(text));
    }

    pub fn apply_reveal(&self, outcome: &RevealOutcome) {
        self.set_message("");
        self.footer.set_text_content(Some(&outcome.footer));
        self.reveal_button
            .set_text_content(Some(&outcome.reveal_label));
        self.reveal_button.set_disabled(false);
        self.more_button.set_disabled(false);
    }
}
