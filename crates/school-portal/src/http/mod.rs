//! HTTP plumbing shared by the workflow routers: JSON error bodies, the administrator gate,
//! multipart form reading, and the document download route.

mod auth;
mod files;
mod multipart;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::{BlobError, RepositoryError};

pub use auth::{admin_router, AdminGate, AdminLogin, AdminRejection, AdminSession, AdminToken};
pub use files::files_router;
pub use multipart::{read_form, MultipartForm, MultipartRejection};

/// Render `{"error": message}` with the given status. Server-side failures are logged.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %message, "request failed");
    }
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::Conflict(_) | RepositoryError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn blob_status(error: &BlobError) -> StatusCode {
    match error {
        BlobError::Empty(_) | BlobError::InvalidBucket(_) => StatusCode::BAD_REQUEST,
        BlobError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UniqueKey;

    #[test]
    fn repository_errors_map_to_http_statuses() {
        assert_eq!(
            repository_status(&RepositoryError::Conflict(UniqueKey::ApplicantEmail)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            repository_status(&RepositoryError::InvalidTransition {
                from: "accepted",
                to: "rejected"
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            repository_status(&RepositoryError::NotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            repository_status(&RepositoryError::Unavailable("offline".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn error_response_wraps_message_in_json() {
        let response = error_response(StatusCode::BAD_REQUEST, "email is required");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload, json!({ "error": "email is required" }));
    }
}
