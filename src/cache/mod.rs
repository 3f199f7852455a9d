//! Cache Module
//!
//! Short-lived in-memory cache for idempotent GET responses, keyed by
//! request signature with fixed TTL expiry.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Signature};
pub use stats::CacheStats;
pub use store::ResponseCache;

// == Public Constants ==
/// Default time-to-live for cached responses (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;
