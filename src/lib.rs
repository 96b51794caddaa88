// ============================================================================
// CATALOG ADMIN - Product catalog management SPA
// ============================================================================
// Strict MVVM:
// - Views: functions that render DOM (no logic)
// - ViewModels: per-page state + UI logic
// - Query: cached, deduplicated fetching with tag invalidation
// - Services: API communication only
// - State: Rc<RefCell> state management
// - Models: wire-format structures shared with the backend
// ============================================================================

mod app;
mod config;
mod dom;
mod models;
mod query;
mod services;
mod state;
mod utils;
mod viewmodels;
mod views;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;

// Global App instance
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.enable_logging {
        wasm_logger::init(Config::default());
    }
    log::info!("🚀 Catalog Admin - {} ({})", CONFIG.api_base_url, CONFIG.environment);

    let app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Full re-render of the app (invoked from the state change batcher)
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(ref app) = *app_cell.borrow() {
            if let Err(e) = app.render() {
                log::error!("❌ Render failed: {:?}", e);
            }
        }
    });
}
