//! Wires the scene, renderer and page together and drives the frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::dom::Page;
use super::input;
use super::loader;
use super::render::Renderer;
use crate::clock::Clock;
use crate::controls::PointerTracker;
use crate::error::SceneResult;
use crate::raycast::pointer_to_ndc;
use crate::reveal::Typewriter;
use crate::scene::Scene;

pub struct App {
    pub page: Page,
    pub scene: Scene,
    renderer: Renderer,
    clock: Clock,
    typewriter: Option<Typewriter>,
    pub pointers: PointerTracker,
}

pub type Shared = Rc<RefCell<App>>;

impl App {
    /// Sizes the drawing buffer to the canvas CSS size times the capped pixel ratio.
    pub fn resize(&mut self) {
        let (width, height) = self.page.canvas_client_size();
        let ratio = self
            .scene
            .config()
            .renderer
            .pixel_ratio(self.page.device_pixel_ratio());
        let buffer_width = (width * ratio).round() as u32;
        let buffer_height = (height * ratio).round() as u32;
        self.page.canvas.set_width(buffer_width);
        self.page.canvas.set_height(buffer_height);
        self.renderer.set_size(buffer_width, buffer_height);
        if !self.scene.resize(width, height) {
            log::debug!("ignoring resize to {width}x{height}");
        }
    }

    pub fn reveal(&mut self) {
        let outcome = self.scene.reveal();
        if outcome.first_reveal {
            log::info!("message revealed");
        }
        self.page.apply_reveal(&outcome);
        let mut typewriter = Typewriter::new(&outcome.lines);
        self.page.set_message(typewriter.tick());
        self.typewriter = Some(typewriter);
    }

    pub fn more(&mut self) {
        let added = self.scene.more();
        log::debug!("{added} mini hearts added");
    }

    pub fn pointer_burst(&mut self, client_x: f64, client_y: f64) {
        let ndc = pointer_to_ndc(client_x, client_y, self.page.canvas_rect());
        let at = self.scene.pointer_burst(ndc);
        log::trace!("burst at {at:?}");
    }

    pub fn viewport_height(&self) -> f32 {
        self.page.canvas_client_size().1 as f32
    }

    fn frame(&mut self, now_ms: f64) -> SceneResult<()> {
        let time = self.clock.tick(now_ms);
        self.scene.update(time);

        let mut done = false;
        if let Some(typewriter) = self.typewriter.as_mut() {
            self.page.set_message(typewriter.tick());
            done = typewriter.is_done();
        }
        if done {
            self.typewriter = None;
        }

        self.renderer.render(&self.scene)
    }
}

pub async fn run(page: Page) -> SceneResult<()> {
    let config = loader::load_config(&page.window).await;
    log::set_max_level(config.log_level().to_level_filter());

    let font_url = config.text.font_url.clone();
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let scene = Scene::new(config, seed);
    let renderer = Renderer::new(&page.canvas, &scene)?;
    let window = page.window.clone();

    let app: Shared = Rc::new(RefCell::new(App {
        clock: Clock::new(page.now_ms()),
        page,
        scene,
        renderer,
        typewriter: None,
        pointers: PointerTracker::default(),
    }));
    app.borrow_mut().resize();

    input::attach(&app)?;
    start_animation_loop(app.clone())?;
    log::info!("scene running");

    match loader::load_font(&window, &font_url).await {
        Ok(font) => app.borrow_mut().scene.attach_font(&font),
        Err(e) => log::warn!("continuing without 3D text: {e}"),
    }
    Ok(())
}

fn start_animation_loop(app: Shared) -> SceneResult<()> {
    let window = app.borrow().page.window.clone();
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let w = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        if let Err(e) = app.borrow_mut().frame(now) {
            log::error!("frame failed: {e}");
        }
        if let Some(cb) = f.borrow().as_ref() {
            if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}
