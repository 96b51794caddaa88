// ============================================================================
// QUERY - Cached, deduplicated data fetching with tag invalidation
// ============================================================================
// Wraps the stateless API client: identical in-flight requests share one
// network call, successful mutations invalidate tagged queries, and every
// active subscriber refetches automatically.
// ============================================================================

pub mod client;
pub mod key;

pub use client::{QueryClient, QueryState, QuerySubscription, ResourceTag};
pub use key::QueryKey;
