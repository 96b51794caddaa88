// ============================================================================
// APP - Render loop
// ============================================================================
// Full re-render on state changes: view subscriptions are dropped first so
// responses for torn-down views never land, then the DOM under #app is
// rebuilt from the current route.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, get_element_by_id, set_inner_html};
use crate::state::AppState;
use crate::views::render_app;

/// Coalesces a burst of state changes into a single render per tick.
#[derive(Clone)]
struct RenderScheduler {
    pending: Rc<Cell<bool>>,
}

impl RenderScheduler {
    fn new() -> Self {
        Self {
            pending: Rc::new(Cell::new(false)),
        }
    }

    /// Returns true when the caller should arm a timeout; false while one
    /// is already armed for this tick
    fn try_schedule(&self) -> bool {
        if self.pending.get() {
            return false;
        }
        self.pending.set(true);
        true
    }

    fn complete(&self) {
        self.pending.set(false);
    }
}

pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();

        // Batch state changes into one render per tick
        let scheduler = RenderScheduler::new();
        state.subscribe_to_changes(move || {
            use gloo_timers::callback::Timeout;
            if !scheduler.try_schedule() {
                return;
            }
            let scheduler = scheduler.clone();
            Timeout::new(0, move || {
                scheduler.complete();
                crate::rerender_app();
            })
            .forget();
        });

        Ok(Self { state, root })
    }

    pub fn render(&self) -> Result<(), JsValue> {
        log::info!("🔄 Rendering app for route {:?}", self.state.route());

        // Detach before the old DOM goes away
        self.state.drop_view_subscriptions();

        set_inner_html(&self.root, "");
        let view = render_app(&self.state)?;
        append_child(&self.root, &view)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_changes_arms_a_single_render() {
        let scheduler = RenderScheduler::new();
        assert!(scheduler.try_schedule());
        assert!(!scheduler.try_schedule());
        assert!(!scheduler.try_schedule());
    }

    #[test]
    fn scheduler_rearms_after_the_render_runs() {
        let scheduler = RenderScheduler::new();
        assert!(scheduler.try_schedule());
        scheduler.complete();
        assert!(scheduler.try_schedule());
    }
}
