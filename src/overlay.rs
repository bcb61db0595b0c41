// Builds the full-viewport canvas the particles are drawn on: fixed during
// scroll and stacked behind the page content.

use crate::error::{OverlayError, Result};
use crate::surface::CanvasSurface;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

const OVERLAY_STYLE: [(&str, &str); 4] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("z-index", "-1"),
];

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(OverlayError::NoWindow)
}

// Viewport size in CSS pixels, as reported by innerWidth/innerHeight
pub fn viewport_size(window: &Window) -> Result<(u32, u32)> {
    let width = window.inner_width().map_err(OverlayError::dom)?;
    let height = window.inner_height().map_err(OverlayError::dom)?;
    Ok((
        width.as_f64().unwrap_or(0.0) as u32,
        height.as_f64().unwrap_or(0.0) as u32,
    ))
}

/// Creates the overlay canvas, attaches it to `document.body` and returns a
/// surface bound to its 2d context.
pub fn create_overlay(window: &Window) -> Result<CanvasSurface> {
    let document = window.document().ok_or(OverlayError::NoDocument)?;
    let body = document.body().ok_or(OverlayError::NoBody)?;

    let canvas = document
        .create_element("canvas")
        .map_err(OverlayError::dom)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| OverlayError::dom(element.into()))?;
    body.append_child(&canvas).map_err(OverlayError::dom)?;

    let style = canvas.style();
    for (property, value) in OVERLAY_STYLE.iter() {
        style
            .set_property(property, value)
            .map_err(OverlayError::dom)?;
    }

    let (width, height) = viewport_size(window)?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")
        .map_err(OverlayError::dom)?
        .ok_or(OverlayError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| OverlayError::NoContext)?;

    Ok(CanvasSurface::new(canvas, context))
}
