// Wires the particle field to the page: pointer moves spawn particles, and a
// requestAnimationFrame loop advances and redraws them until stopped.

use crate::config::{FieldConfig, RemovalPolicy};
use crate::error::{OverlayError, Result};
use crate::field::ParticleField;
use crate::overlay;
use crate::surface::{CanvasSurface, Surface};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlCanvasElement, MouseEvent, Window};

struct Scene {
    field: ParticleField,
    surface: CanvasSurface,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Starts the overlay on the current page. `max_live` caps the number of
/// live particles; leave it out for the uncapped landing page behaviour.
/// `splice_in_place` switches to the single-pass removal where the particle
/// after a removed one sits that frame out.
#[wasm_bindgen]
pub fn start_overlay(
    max_live: Option<u32>,
    splice_in_place: Option<bool>,
) -> std::result::Result<OverlayHandle, JsValue> {
    let window = overlay::window()?;
    let policy = if splice_in_place.unwrap_or(false) {
        RemovalPolicy::SpliceInPlace
    } else {
        RemovalPolicy::Compact
    };
    let config = FieldConfig::default()
        .with_max_live(max_live.map(|n| n as usize))
        .with_removal_policy(policy);
    Ok(OverlayHandle::start_with(window, config)?)
}

#[wasm_bindgen]
pub struct OverlayHandle {
    window: Window,
    scene: Rc<RefCell<Scene>>,
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<Option<i32>>>,
    on_frame: FrameCallback,
    on_pointer_move: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl OverlayHandle {
    pub fn start_with(window: Window, config: FieldConfig) -> Result<OverlayHandle> {
        let field = ParticleField::new(config)?;
        let surface = overlay::create_overlay(&window)?;
        let (width, height) = surface.size();
        let scene = Rc::new(RefCell::new(Scene { field, surface }));

        let pointer_scene = scene.clone();
        let on_pointer_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            pointer_scene
                .borrow_mut()
                .field
                .spawn(event.client_x() as f64, event.client_y() as f64);
        }) as Box<dyn FnMut(MouseEvent)>);
        let listener: &js_sys::Function = on_pointer_move.as_ref().unchecked_ref();
        if let Err(err) = window.add_event_listener_with_callback("mousemove", listener) {
            if let Err(detach_err) = scene.borrow_mut().surface.detach() {
                console::error_1(&JsValue::from(detach_err));
            }
            return Err(OverlayError::dom(err));
        }

        let mut handle = OverlayHandle {
            window,
            scene,
            running: Rc::new(Cell::new(true)),
            frame_id: Rc::new(Cell::new(None)),
            on_frame: Rc::new(RefCell::new(None)),
            on_pointer_move: Some(on_pointer_move),
        };
        if let Err(err) = handle.start_frame_loop() {
            handle.stop();
            return Err(err);
        }

        console::log_1(&format!("particle overlay started ({}x{})", width, height).into());
        Ok(handle)
    }

    pub fn canvas(&self) -> HtmlCanvasElement {
        self.scene.borrow().surface.canvas().clone()
    }

    fn start_frame_loop(&mut self) -> Result<()> {
        let window = self.window.clone();
        let scene = self.scene.clone();
        let running = self.running.clone();
        let frame_id = self.frame_id.clone();
        let next_frame = self.on_frame.clone();

        let on_frame = Closure::wrap(Box::new(move || {
            frame_id.set(None);
            if !running.get() {
                return;
            }
            {
                #[cfg(feature = "frame-timing")]
                let _timer = crate::Timer::new("ParticleField::advance_and_render");
                let mut scene = scene.borrow_mut();
                let Scene { field, surface } = &mut *scene;
                if let Err(err) = field.advance_and_render(surface) {
                    running.set(false);
                    console::error_1(&JsValue::from(err));
                    return;
                }
            }
            if let Err(err) = request_frame(&window, &next_frame, &frame_id) {
                running.set(false);
                console::error_1(&JsValue::from(err));
            }
        }) as Box<dyn FnMut()>);
        *self.on_frame.borrow_mut() = Some(on_frame);

        request_frame(&self.window, &self.on_frame, &self.frame_id)
    }
}

fn request_frame(
    window: &Window,
    on_frame: &FrameCallback,
    frame_id: &Cell<Option<i32>>,
) -> Result<()> {
    if let Some(callback) = on_frame.borrow().as_ref() {
        let id = window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(OverlayError::dom)?;
        frame_id.set(Some(id));
    }
    Ok(())
}

#[wasm_bindgen]
impl OverlayHandle {
    /// Stops the frame loop, detaches the pointer listener and removes the
    /// canvas from the page. Safe to call more than once.
    pub fn stop(&mut self) {
        let was_running = self.running.replace(false);
        if let Some(id) = self.frame_id.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                console::error_1(&err);
            }
        }
        if let Some(on_pointer_move) = self.on_pointer_move.take() {
            let listener: &js_sys::Function = on_pointer_move.as_ref().unchecked_ref();
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback("mousemove", listener)
            {
                console::error_1(&err);
            }
        }
        // The frame closure holds a handle to its own slot; dropping it here
        // breaks that cycle.
        self.on_frame.borrow_mut().take();
        if let Err(err) = self.scene.borrow_mut().surface.detach() {
            console::error_1(&JsValue::from(err));
        }
        if was_running {
            console::log_1(&"particle overlay stopped".into());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn live_count(&self) -> usize {
        self.scene.borrow().field.len()
    }

    /// Spawns a burst as if the pointer had moved to `(x, y)`
    pub fn spawn_at(&self, x: f64, y: f64) -> usize {
        self.scene.borrow_mut().field.spawn(x, y)
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
