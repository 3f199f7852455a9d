//! n8n API Client
//!
//! Outbound request pipeline: executor, retry policy and the dispatch layer
//! that ties them to the response cache.

mod dispatch;
mod executor;
mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::N8nClient;
pub use executor::{ApiRequest, HttpExecutor, RequestExecutor};
pub use retry::{RetryDecision, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
