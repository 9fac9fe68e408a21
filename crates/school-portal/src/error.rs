use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::academics::AcademicsServiceError;
use crate::workflows::admissions::AdmissionServiceError;
use crate::workflows::courses::CourseServiceError;
use crate::workflows::fees::FeeServiceError;
use crate::workflows::students::StudentServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Academics(AcademicsServiceError),
    Admissions(AdmissionServiceError),
    Students(StudentServiceError),
    Courses(CourseServiceError),
    Fees(FeeServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Academics(err) => write!(f, "academics error: {}", err),
            AppError::Admissions(err) => write!(f, "admissions error: {}", err),
            AppError::Students(err) => write!(f, "students error: {}", err),
            AppError::Courses(err) => write!(f, "courses error: {}", err),
            AppError::Fees(err) => write!(f, "fees error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Academics(err) => Some(err),
            AppError::Admissions(err) => Some(err),
            AppError::Students(err) => Some(err),
            AppError::Courses(err) => Some(err),
            AppError::Fees(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Academics(err) => err.into_response(),
            AppError::Admissions(err) => err.into_response(),
            AppError::Students(err) => err.into_response(),
            AppError::Courses(err) => err.into_response(),
            AppError::Fees(err) => err.into_response(),
            other => {
                let body = Json(json!({ "error": other.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<AcademicsServiceError> for AppError {
    fn from(value: AcademicsServiceError) -> Self {
        Self::Academics(value)
    }
}

impl From<AdmissionServiceError> for AppError {
    fn from(value: AdmissionServiceError) -> Self {
        Self::Admissions(value)
    }
}

impl From<StudentServiceError> for AppError {
    fn from(value: StudentServiceError) -> Self {
        Self::Students(value)
    }
}

impl From<CourseServiceError> for AppError {
    fn from(value: CourseServiceError) -> Self {
        Self::Courses(value)
    }
}

impl From<FeeServiceError> for AppError {
    fn from(value: FeeServiceError) -> Self {
        Self::Fees(value)
    }
}
