use crate::cli::ServeArgs;
use crate::infra::{AppState, Portal};
use crate::routes::with_portal_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use school_portal::config::AppConfig;
use school_portal::error::AppError;
use school_portal::http::AdminGate;
use school_portal::telemetry;
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

    let portal = Portal::in_memory(&config.portal);
    let gate = AdminGate::new(config.admin.clone());

    let app = with_portal_routes(&portal, gate)
        .layer(DefaultBodyLimit::max(config.portal.max_upload_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        public_url = %config.portal.public_url,
        max_unit_load = config.portal.max_unit_load,
        "school portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
