use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use post_purchase_rules::config::AppConfig;
use post_purchase_rules::error::AppError;
use post_purchase_rules::telemetry;
use post_purchase_rules::workflows::orders::BatchRunner;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let runner = Arc::new(BatchRunner::new(config.rules.clone()));

    let app = with_recommendation_routes(runner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_window = config.rules.default_window.minutes(),
        conservative = config.rules.conservative,
        "post-purchase rules service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
