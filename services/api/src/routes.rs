use crate::infra::{AppState, Portal};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use school_portal::http::{admin_router, files_router, AdminGate};
use school_portal::workflows::academics::academics_router;
use school_portal::workflows::admissions::admissions_router;
use school_portal::workflows::courses::courses_router;
use school_portal::workflows::fees::fees_router;
use school_portal::workflows::students::students_router;
use serde_json::json;

/// Merge every workflow router with the operational endpoints.
///
/// The caller still has to layer `Extension(AppState)` for `/ready` and `/metrics`.
pub(crate) fn with_portal_routes(portal: &Portal, gate: AdminGate) -> Router {
    Router::new()
        .merge(admin_router(gate.clone()))
        .merge(academics_router(portal.academics.clone()))
        .merge(admissions_router(portal.admissions.clone()))
        .merge(students_router(portal.students.clone()))
        .merge(courses_router(portal.courses.clone()))
        .merge(fees_router(portal.fees.clone()))
        .merge(files_router(portal.blobs.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(gate))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
