// ============================================================================
// UTILS - Small shared helpers
// ============================================================================

pub mod debounce;

pub use debounce::Debouncer;
