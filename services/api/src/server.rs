use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_credit_routes;
use agri_credit::config::AppConfig;
use agri_credit::error::AppError;
use agri_credit::telemetry;
use agri_credit::workflows::credit::FinancialEngine;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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
    if let Some(dir) = args.data_dir.take() {
        config.data.data_dir = dir;
    }

    telemetry::init(&config.telemetry)?;

    // no scoring without a dataset: construction failures end the process here
    let engine = Arc::new(FinancialEngine::from_config(&config.data)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_credit_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, data_dir = %config.data.data_dir.display(), "credit risk engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
