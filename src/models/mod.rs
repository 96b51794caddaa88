// ============================================================================
// MODELS - Wire types shared with the catalog backend
// ============================================================================

pub mod auth;
pub mod category;
pub mod product;

pub use auth::*;
pub use category::*;
pub use product::*;
