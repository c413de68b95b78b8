mod business_logic;
mod errors;
mod handlers;
mod models;
mod services;
mod state;

use axum::{routing::get, Router};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::business_logic::config::{MonitorConfig, PatternConfig};
use crate::services::analysis_state::AnalysisStateInner;
use crate::services::coinbase::CoinbaseClient;
use crate::services::monitor::MonitorService;
use crate::services::notifier::TracingNotifier;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::analysis::get_analysis,
        handlers::analysis::get_window,
        handlers::analysis::get_alerts,
        handlers::analysis::get_analysis_stream
    ),
    components(schemas(
        models::health::HealthResponse,
        models::analysis::AnalysisSnapshot,
        models::analysis::WindowResponse,
        models::analysis::AlertLogResponse,
        models::alert::Alert,
        models::alert::AlertKind,
        models::alert::Direction,
        models::sample::Sample,
        errors::ErrorResponse
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let monitor_config = MonitorConfig::from_env();
    let _log_guard = init_tracing(&monitor_config.log_dir);
    let pattern_config = PatternConfig::from_env();
    tracing::info!("Pattern config: {:?}", pattern_config);

    let analysis_state = AnalysisStateInner::new(&monitor_config.product);
    let bind_addr = monitor_config.bind_addr.clone();
    let poll_interval = monitor_config.poll_interval;

    let client = CoinbaseClient::new(monitor_config.request_timeout)?;

    // Start pattern monitoring in background
    let mut monitor = MonitorService::new(
        monitor_config,
        &pattern_config,
        client,
        Box::new(TracingNotifier),
        analysis_state.clone(),
    );
    tokio::spawn(async move {
        tracing::info!("Starting pattern detection warmup...");
        if let Err(e) = monitor.warmup().await {
            tracing::error!("Warmup failed: {:#}", e);
            return;
        }

        tracing::info!("Pattern detection active, polling every {:?}", poll_interval);
        monitor.run().await;
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/analysis", get(handlers::analysis::get_analysis))
        .route("/analysis/window", get(handlers::analysis::get_window))
        .route("/analysis/alerts", get(handlers::analysis::get_alerts))
        .route("/analysis/stream", get(handlers::analysis::get_analysis_stream))
        .with_state(AppState { analysis_state })
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Console plus daily rolling file output; keep the guard alive to flush
fn init_tracing(log_dir: &str) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "patternwatch.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patternwatch=info,tower_http=debug".into()),
        )
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    guard
}
