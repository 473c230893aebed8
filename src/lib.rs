//! # Pattern Machine
//!
//! A generative visualizer that tiles a short glyph motif across a rotated,
//! scaled square covering the window.
//!
//! ## Features
//! - Random pattern generation from named character packs
//! - One-click randomization of colors, sizes, spacing, rotation and font
//! - Decorated render modes: per-glyph tilts (spicy), spinning glyphs with
//!   audio (satisfy) and periodic recoloring (colorize)
//! - A bounded history of committed patterns with thumbnail previews
//! - Shareable links carrying the whole config in the URL fragment
//!
//! The core (layout, randomizer, history, codec, timers) is toolkit
//! independent; [`ui`] draws it with egui.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod constants;
pub mod controller;
pub mod error;
pub mod history;
pub mod layout;
pub mod pattern;
pub mod random;
pub mod randomizer;
pub mod share;
pub mod surface;
pub mod timers;
pub mod types;
pub mod ui;

// Re-export the types most callers need
pub use controller::Controller;
pub use error::{Error, Result};
pub use history::HistoryStore;
pub use types::*;
pub use ui::PatternApp;

/// Runs the pattern machine in a native window.
///
/// `link` is an optional shareable URL (or bare fragment) to open instead of
/// the startup presentation.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     pattern_machine::run_app(std::env::args().nth(1))
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app(link: Option<String>) -> std::result::Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Pattern Machine",
        options,
        Box::new(|cc| Ok(Box::new(PatternApp::new(cc, link)))),
    )
}

/// Starts the app on the page canvas with the given element id.
///
/// The shared link, if any, is read from the page's own URL fragment.
#[cfg(target_arch = "wasm32")]
pub async fn run_web(canvas_id: &str) -> std::result::Result<(), eframe::wasm_bindgen::JsValue> {
    use eframe::wasm_bindgen::JsCast;

    let canvas = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(canvas_id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or_else(|| {
            eframe::wasm_bindgen::JsValue::from_str(&format!("no canvas with id {canvas_id}"))
        })?;

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(PatternApp::new(cc, None)))),
        )
        .await
}
