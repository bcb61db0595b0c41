mod utils;

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod overlay;
pub mod particle;
pub mod surface;

use wasm_bindgen::prelude::*;
use web_sys::console;

pub use color::{Color, DEFAULT_PALETTE};
pub use config::{FieldConfig, RemovalPolicy};
pub use driver::{start_overlay, OverlayHandle};
pub use error::{OverlayError, Result};
pub use field::ParticleField;
pub use particle::Particle;
pub use surface::{CanvasSurface, Surface};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

// Console time/timeEnd pair, ended when the guard drops
pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}
