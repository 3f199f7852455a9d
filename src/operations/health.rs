//! Upstream health check.

use tokio::time::Instant;
use tracing::{info, warn};

use super::data_list;
use crate::client::{ApiRequest, N8nClient};
use crate::models::HealthReport;

/// Checks n8n by listing workflows, bypassing the cache.
///
/// Never fails: any error is reported as an unhealthy result.
pub async fn health_check(client: &N8nClient) -> HealthReport {
    let started = Instant::now();

    match client.call(ApiRequest::get("/workflows")).await {
        Ok(envelope) => {
            let elapsed = started.elapsed().as_secs_f64();
            let response_time = (elapsed * 1000.0).round() / 1000.0;
            let total = data_list(&envelope).len();
            info!("n8n healthy: {} workflows in {:.3}s", total, response_time);
            HealthReport::healthy(client.api_url(), response_time, total)
        }
        Err(err) => {
            warn!("n8n health check failed: {}", err);
            HealthReport::unhealthy(err.to_string())
        }
    }
}
