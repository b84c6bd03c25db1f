//! Stopwatch with an animated black hole background.
//!
//! The timer state machine and the visualization driver are plain Rust and
//! build on every target; the page glue and the WebGL2 renderer are only
//! compiled for wasm32.

pub mod camera;
pub mod config;
pub mod format;
pub mod geometry;
pub mod schedule;
pub mod timer;
pub mod visual;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod app;
    mod audio;
    mod gl;
    mod render;
    mod shaders;
    pub mod ui;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        // Browser test pages carry no stopwatch markup.
        let Some(canvas) = document.get_element_by_id("bg-canvas") else {
            log::warn!("#bg-canvas not found, stopwatch not started");
            return Ok(());
        };
        let canvas = canvas.dyn_into::<web_sys::HtmlCanvasElement>()?;

        app::start(window, document, canvas)
    }
}
