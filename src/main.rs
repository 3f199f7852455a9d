//! n8n MCP - Tool-calling bridge to the n8n REST API
//!
//! Serves the n8n tools over MCP stdio (default) or plain HTTP.

use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use n8n_mcp::api::create_router;
use n8n_mcp::config::log_directive;
use n8n_mcp::sanitize::sanitize_url;
use n8n_mcp::{mcp, AppState, Config, N8nClient, Transport};

/// Main entry point for the n8n MCP server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber (stderr, `RUST_LOG` or `LOG_LEVEL`)
/// 2. Load configuration from the environment and `.env`
/// 3. Create the n8n client (connection pool, cache, retry policy)
/// 4. Serve MCP over stdio, or the HTTP API with graceful shutdown
/// 5. Release the client once the transport stops
#[tokio::main]
async fn main() -> ExitCode {
    // .env may carry LOG_LEVEL, so load it before the subscriber
    dotenvy::dotenv().ok();

    // stdout belongs to the stdio transport
    let log_level = std::env::var("LOG_LEVEL").ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directive(log_level.as_deref()).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting n8n MCP server");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Configuration loaded: api_url={}, timeout={}ms, cache_ttl={}s, max_retries={}, max_response_size={}, transport={:?}",
        sanitize_url(&config.api_url),
        config.request_timeout_ms,
        config.cache_ttl,
        config.max_retries,
        config.max_response_size,
        config.transport
    );

    let client = match N8nClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create n8n client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match config.transport {
        Transport::Stdio => mcp::serve_stdio(client).await,
        Transport::Http => serve_http(client, config.server_port).await,
    };

    // Each transport owns the client; by now it has been dropped
    info!("n8n client closed");

    match outcome {
        Ok(()) => {
            info!("Server shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the HTTP API until Ctrl+C or SIGTERM.
async fn serve_http(client: N8nClient, port: u16) -> anyhow::Result<()> {
    let app = create_router(AppState::new(client));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
