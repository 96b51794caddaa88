// ============================================================================
// SERVICES - Stateless HTTP access to the catalog backend
// ============================================================================

pub mod api_client;
pub mod error;

pub use api_client::{ApiClient, ProductQueryArgs};
pub use error::ApiError;
