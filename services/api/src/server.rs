use crate::cli::ServeArgs;
use crate::infra::{AppState, ScoringState};
use crate::routes::lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };
    let scoring = Arc::new(ScoringState::from_config(&config));

    let app = lead_routes(scoring)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        gemini_configured = config.gemini.api_key.is_some(),
        output_path = %config.scoring.output_path.display(),
        "lead intent scorer ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
