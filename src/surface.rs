// Drawing sink for the particle field, plus the 2d canvas implementation of it.

use crate::color::Color;
use crate::error::{OverlayError, Result};
use std::collections::HashMap;
use std::f64::consts::PI;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    /// Wipe the whole drawing area
    fn clear(&mut self) -> Result<()>;

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<()>;

    fn size(&self) -> (u32, u32);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    // Fill styles keyed by packed RRGGBBAA, built the first time a color is drawn
    fill_styles: HashMap<u32, String>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, context: CanvasRenderingContext2d) -> Self {
        CanvasSurface {
            canvas,
            context,
            fill_styles: HashMap::new(),
        }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    // Wipe the last frame and take the canvas out of the page
    pub fn detach(&mut self) -> Result<()> {
        self.clear()?;
        self.canvas.remove();
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) -> Result<()> {
        self.context.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        Ok(())
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<()> {
        let style = self
            .fill_styles
            .entry(color.to_u32())
            .or_insert_with(|| color.to_css());
        self.context.begin_path();
        self.context
            .arc(x, y, radius, 0.0, PI * 2.0)
            .map_err(OverlayError::dom)?;
        self.context.set_fill_style_str(style);
        self.context.fill();
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}
