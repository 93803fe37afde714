// Main entry point - Dependency injection, refresh loop and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_state::DashboardState;
use crate::application::refresh_scheduler::RefreshScheduler;
use crate::application::telemetry_source::TelemetrySource;
use crate::infrastructure::broadcast_presenter::BroadcastPresenter;
use crate::infrastructure::config::{load_dashboard_config, DashboardConfig, SourceKind};
use crate::infrastructure::http_source::HttpTelemetrySource;
use crate::infrastructure::synthetic_source::SyntheticSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, health_check, select_tab, stream_dashboard};

fn build_source(config: &DashboardConfig) -> anyhow::Result<Arc<dyn TelemetrySource>> {
    match (config.source.kind, config.source.url.as_ref()) {
        (SourceKind::Http, Some(url)) => {
            tracing::info!("Polling walker telemetry from {}", url);
            let timeout = Duration::from_millis(config.source.timeout_ms);
            Ok(Arc::new(HttpTelemetrySource::new(url.clone(), timeout)?))
        }
        (SourceKind::Http, None) => anyhow::bail!("http telemetry source configured without a url"),
        (SourceKind::Synthetic, _) => {
            tracing::info!("Using synthetic walker telemetry");
            Ok(Arc::new(SyntheticSource::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let addr = config.bind_addr()?;

    // Infrastructure
    let source = build_source(&config)?;
    let presenter = Arc::new(BroadcastPresenter::new());

    // Application
    let state = Arc::new(DashboardState::new());
    let dashboard_service = DashboardService::new(state, presenter.clone());
    let scheduler = RefreshScheduler::new(source, dashboard_service.clone(), &config).spawn();

    let app_state = Arc::new(AppState {
        dashboard_service,
        presenter,
        scheduler_phase: scheduler.subscribe_phase(),
    });

    // Presentation
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/dashboard/tab/:tab", put(select_tab))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    tracing::info!("Starting walker dashboard on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tokio::select! {
        result = axum::serve(listener, router).into_future() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown requested");
        }
    }

    let stats = scheduler.stop().await?;
    tracing::info!(
        "Dashboard stopped ({} cycles, {} acquisition failures)",
        stats.cycles,
        stats.failures
    );

    Ok(())
}
