//! DOM event listeners: pointer bursts and orbiting on the canvas, wheel
//! zoom, window resize and the two buttons.

use glam::Vec2;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, PointerEvent, WheelEvent};

use super::app::Shared;
use crate::error::SceneResult;

fn listen<E>(target: &EventTarget, name: &str, handler: impl FnMut(E) + 'static) -> SceneResult<()>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn client_point(event: &PointerEvent) -> Vec2 {
    Vec2::new(event.client_x() as f32, event.client_y() as f32)
}

pub fn attach(app: &Shared) -> SceneResult<()> {
    let (window, canvas, reveal, more) = {
        let app = app.borrow();
        (
            app.page.window.clone(),
            app.page.canvas.clone(),
            app.page.reveal_button.clone(),
            app.page.more_button.clone(),
        )
    };

    {
        let app = app.clone();
        listen(&window, "resize", move |_: Event| app.borrow_mut().resize())?;
    }
    {
        let app = app.clone();
        listen(&reveal, "click", move |_: Event| app.borrow_mut().reveal())?;
    }
    {
        let app = app.clone();
        listen(&more, "click", move |_: Event| app.borrow_mut().more())?;
    }

    {
        let app = app.clone();
        let target = canvas.clone();
        listen(&canvas, "pointerdown", move |e: PointerEvent| {
            if let Err(err) = target.set_pointer_capture(e.pointer_id()) {
                log::debug!("pointer capture refused: {err:?}");
            }
            let mut app = app.borrow_mut();
            app.pointer_burst(e.client_x() as f64, e.client_y() as f64);
            app.pointers.press(e.pointer_id(), client_point(&e));
        })?;
    }
    {
        let app = app.clone();
        listen(&canvas, "pointermove", move |e: PointerEvent| {
            let mut app = app.borrow_mut();
            let gesture = app.pointers.moved(e.pointer_id(), client_point(&e));
            let height = app.viewport_height();
            app.scene.controls.apply(gesture, height);
        })?;
    }
    for name in ["pointerup", "pointercancel"] {
        let app = app.clone();
        listen(&canvas, name, move |e: PointerEvent| {
            app.borrow_mut().pointers.release(e.pointer_id());
        })?;
    }
    {
        let app = app.clone();
        listen(&canvas, "wheel", move |e: WheelEvent| {
            e.prevent_default();
            app.borrow_mut().scene.controls.dolly(e.delta_y() as f32);
        })?;
    }

    Ok(())
}
