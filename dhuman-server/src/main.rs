//! dhuman-server binary: load configuration, install logging, serve HTTP.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dhuman_core::DhumanConfig;
use dhuman_core::config::GeneralConfig;
use dhuman_server::DialogueService;
use dhuman_server::api::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DhumanConfig::load().context("failed to load configuration")?;
    init_tracing(&config.general);

    let dialogue = Arc::new(DialogueService::from_config(&config));
    let remote = dialogue.is_remote_enabled();
    let state = AppState::new(dialogue, config.server.max_input_chars);
    let app = api::app(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, remote, "dhuman server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("dhuman server stopped");
    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level applies to our crates.
fn init_tracing(general: &GeneralConfig) {
    let level = &general.log_level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dhuman_server={level},dhuman_llm={level},dhuman_core={level},tower_http=info"
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
