// ============================================================================
// STATE - Reactive state holders
// ============================================================================

pub mod app_state;
pub mod reactivity;
pub mod session_state;

pub use app_state::{AppState, Route, SubscriptionSlot};
pub use reactivity::ReactiveState;
pub use session_state::SessionState;
