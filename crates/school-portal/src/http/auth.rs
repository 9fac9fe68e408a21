use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::config::AdminConfig;
use crate::workflows::admissions::domain::ReviewerId;
use crate::workflows::admissions::intake::normalize_email;

/// Checks administrator credentials and bearer tokens against the configured account.
///
/// Installed on the application router as an `Extension` layer so `AdminSession` can find it.
#[derive(Debug, Clone)]
pub struct AdminGate {
    config: Arc<AdminConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminToken {
    pub token: String,
    pub reviewer: ReviewerId,
}

impl AdminGate {
    pub fn new(config: AdminConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn token(&self) -> &str {
        &self.config.token
    }

    pub fn login(&self, login: &AdminLogin) -> Option<AdminToken> {
        let email_matches = normalize_email(&login.email) == normalize_email(&self.config.email);
        if !email_matches || login.password != self.config.password {
            return None;
        }
        Some(AdminToken {
            token: self.config.token.clone(),
            reviewer: self.reviewer(),
        })
    }

    /// Resolve a bearer token to the reviewer it was issued for.
    pub fn authorize(&self, token: &str) -> Option<ReviewerId> {
        (!token.is_empty() && token == self.config.token).then(|| self.reviewer())
    }

    fn reviewer(&self) -> ReviewerId {
        ReviewerId(self.config.reviewer.clone())
    }
}

/// Proof that the request carried a valid administrator token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub reviewer: ReviewerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRejection {
    MissingGate,
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            AdminRejection::MissingGate => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "administrator gate is not configured",
            ),
            AdminRejection::MissingToken => {
                error_response(StatusCode::UNAUTHORIZED, "administrator token required")
            }
            AdminRejection::InvalidToken => {
                error_response(StatusCode::UNAUTHORIZED, "invalid administrator token")
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let gate = parts
            .extensions
            .get::<AdminGate>()
            .cloned()
            .ok_or(AdminRejection::MissingGate)?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AdminRejection::MissingToken)?;

        gate.authorize(token)
            .map(|reviewer| AdminSession { reviewer })
            .ok_or(AdminRejection::InvalidToken)
    }
}

/// `POST /api/admin/session` exchanges the administrator credentials for a bearer token.
pub fn admin_router(gate: AdminGate) -> Router {
    Router::new()
        .route("/api/admin/session", post(login_handler))
        .with_state(gate.clone())
        .layer(Extension(gate))
}

async fn login_handler(State(gate): State<AdminGate>, Json(login): Json<AdminLogin>) -> Response {
    match gate.login(&login) {
        Some(token) => {
            tracing::info!(reviewer = %token.reviewer, "administrator signed in");
            Json(token).into_response()
        }
        None => error_response(StatusCode::UNAUTHORIZED, "invalid credentials"),
    }
}
