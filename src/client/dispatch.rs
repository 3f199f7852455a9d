//! Dispatch Layer
//!
//! The one entry point every operation calls through. Combines the response
//! cache, the retry policy and the request executor.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, ResponseCache};
use crate::client::{ApiRequest, HttpExecutor, RequestExecutor, RetryPolicy};
use crate::config::Config;
use crate::error::{ConfigError, Result};

// == N8n Client ==
/// Shared handle to the n8n API.
///
/// Cheap to clone; all clones share the connection pool and the cache.
/// Dropping the last clone closes pooled connections.
#[derive(Clone)]
pub struct N8nClient {
    executor: Arc<dyn RequestExecutor>,
    cache: Arc<RwLock<ResponseCache>>,
    retry: RetryPolicy,
    api_url: String,
}

impl N8nClient {
    /// Creates the reqwest-backed client described by `config`.
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let executor = HttpExecutor::new(config)?;
        Ok(Self::with_executor(
            Arc::new(executor),
            config.ttl(),
            RetryPolicy::new(config.max_attempts()),
            config.api_url.clone(),
        ))
    }

    /// Assembles a client around any executor.
    pub fn with_executor(
        executor: Arc<dyn RequestExecutor>,
        ttl: Duration,
        retry: RetryPolicy,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            cache: Arc::new(RwLock::new(ResponseCache::new(ttl))),
            retry,
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Call ==
    /// Performs `request`, serving cacheable GETs from the cache when fresh.
    ///
    /// A cache hit touches neither the network nor the retry policy.
    /// Successful cacheable GETs are stored; failures never are. The cache
    /// lock is not held across the network call, so concurrent misses on
    /// the same signature may each fetch, and the last write wins.
    pub async fn call(&self, request: ApiRequest) -> Result<Value> {
        let signature = request.cache_signature();

        if let Some(signature) = &signature {
            // get() evicts expired entries, so it needs the write lock
            if let Some(hit) = self.cache.write().await.get(signature) {
                debug!("Cache hit: {}", signature);
                return Ok(hit);
            }
        }

        let value = self
            .retry
            .run(|attempt| {
                debug!(
                    "{} {} (attempt {}/{})",
                    request.method,
                    request.path,
                    attempt,
                    self.retry.max_attempts()
                );
                self.executor.execute(&request)
            })
            .await?;

        if let Some(signature) = signature {
            self.cache.write().await.put(signature, value.clone());
        }

        Ok(value)
    }
}

impl std::fmt::Debug for N8nClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("N8nClient")
            .field("api_url", &self.api_url)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedExecutor;
    use crate::error::ClientError;
    use serde_json::json;
    use tokio::time::Instant;

    const TTL: Duration = Duration::from_secs(300);

    fn client(executor: &Arc<ScriptedExecutor>) -> N8nClient {
        N8nClient::with_executor(executor.clone(), TTL, RetryPolicy::default(), "http://n8n.test")
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_errors_then_success() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Err(ClientError::Network("refused".into())),
            Err(ClientError::Network("refused".into())),
            Ok(json!({"data": []})),
        ]));
        let client = client(&executor);

        let start = Instant::now();
        let result = client.call(ApiRequest::get("/workflows")).await;

        assert_eq!(result, Ok(json!({"data": []})));
        assert_eq!(executor.calls(), 3);

        let times = executor.call_times();
        assert!(times[1] - times[0] >= Duration::from_secs(2));
        assert!(times[2] - times[1] >= Duration::from_secs(4));
        assert!(times[2] - times[1] <= Duration::from_secs(10));
        assert!(start.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_upstream_status_not_retried() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Err(ClientError::upstream(500, "boom")),
            Ok(json!({"data": []})),
        ]));
        let client = client(&executor);

        let result = client.call(ApiRequest::get("/workflows")).await;

        assert!(matches!(
            result,
            Err(ClientError::UpstreamStatus { status: 500, .. })
        ));
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_error_not_retried() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Err(ClientError::Unknown(
            "invalid JSON".into(),
        ))]));
        let client = client(&executor);

        let result = client.call(ApiRequest::get("/workflows")).await;

        assert_eq!(result, Err(ClientError::Unknown("invalid JSON".into())));
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_cacheable_get_hits_network_once() {
        let executor = Arc::new(ScriptedExecutor::repeating(json!({"data": [1]})));
        let client = client(&executor);

        let first = client.call(ApiRequest::get("/workflows").cacheable()).await;
        let second = client.call(ApiRequest::get("/workflows").cacheable()).await;

        assert_eq!(first, second);
        assert_eq!(executor.calls(), 1);

        let stats = client.cache_stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expires_after_ttl() {
        let executor = Arc::new(ScriptedExecutor::repeating(json!({"data": []})));
        let client = client(&executor);

        client.call(ApiRequest::get("/workflows").cacheable()).await.unwrap();
        tokio::time::advance(TTL).await;
        client.call(ApiRequest::get("/workflows").cacheable()).await.unwrap();

        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_cacheable_calls_always_hit_network() {
        let executor = Arc::new(ScriptedExecutor::repeating(json!({"data": {}})));
        let client = client(&executor);

        client.call(ApiRequest::get("/executions/1")).await.unwrap();
        client.call(ApiRequest::get("/executions/1")).await.unwrap();
        client
            .call(ApiRequest::post("/workflows/1/execute").cacheable())
            .await
            .unwrap();
        client
            .call(ApiRequest::post("/workflows/1/execute").cacheable())
            .await
            .unwrap();

        assert_eq!(executor.calls(), 4);
        assert_eq!(client.cache_stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Err(ClientError::upstream(404, "missing")),
            Ok(json!({"data": {"id": "1"}})),
        ]));
        let client = client(&executor);

        assert!(client.call(ApiRequest::get("/workflows/1").cacheable()).await.is_err());
        assert_eq!(
            client.call(ApiRequest::get("/workflows/1").cacheable()).await,
            Ok(json!({"data": {"id": "1"}}))
        );
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn test_query_params_share_cache_entry() {
        let executor = Arc::new(ScriptedExecutor::repeating(json!({"data": ["first"]})));
        let client = client(&executor);

        client
            .call(ApiRequest::get("/executions").query("limit", 5).cacheable())
            .await
            .unwrap();
        client
            .call(ApiRequest::get("/executions").query("limit", 50).cacheable())
            .await
            .unwrap();

        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_cacheable_reads() {
        let executor = Arc::new(ScriptedExecutor::repeating(json!({"data": []})));
        let client = client(&executor);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move {
                    let path = format!("/workflows/{}", i % 2);
                    client.call(ApiRequest::get(path).cacheable()).await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        let stats = client.cache_stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.hits + stats.misses, 8);
    }
}
