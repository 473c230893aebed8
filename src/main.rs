#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Optional shareable link to open instead of the presentation
    let link = std::env::args().nth(1);
    pattern_machine::run_app(link)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Route log output to the browser console
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = pattern_machine::run_web("the_canvas_id").await {
            log::error!("Failed to start pattern machine: {err:?}");
        }
    });
}
