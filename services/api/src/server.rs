use crate::cli::ServeArgs;
use crate::infra::{build_advisor, AppState, PlanStore};
use crate::routes::with_service_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use money_pilot::config::AppConfig;
use money_pilot::error::AppError;
use money_pilot::planning::PlanningService;
use money_pilot::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.server.host = args.host.unwrap_or(config.server.host);
    config.server.port = args.port.unwrap_or(config.server.port);

    telemetry::init(&config.telemetry)?;

    let ready = Arc::new(AtomicBool::new(false));
    let app = build_app(&config, ready.clone())?;

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    ready.store(true, Ordering::Release);
    info!(
        environment = ?config.environment,
        %addr,
        plan_store = if config.storage.data_dir.is_some() { "files" } else { "memory" },
        advisory = config.advisory.is_enabled(),
        "money pilot api listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Wires storage, advice and metrics into the full router. `ready` stays false until bind.
fn build_app(config: &AppConfig, ready: Arc<AtomicBool>) -> Result<Router, AppError> {
    let store = PlanStore::from_config(&config.storage)?;
    let planning = Arc::new(PlanningService::new(Arc::new(store)));
    let (metrics_layer, metrics) = PrometheusMetricLayer::pair();

    let state = AppState {
        readiness: ready,
        metrics: Arc::new(metrics),
        planning: planning.clone(),
        advisor: build_advisor(&config.advisory),
    };

    Ok(with_service_routes(planning)
        .layer(Extension(state))
        .layer(metrics_layer))
}
