use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use super::domain::{Student, StudentCredentials};
use super::repository::StudentRepository;
use crate::http::{error_response, repository_status};
use crate::ids::StudentId;
use crate::store::RepositoryError;
use crate::workflows::admissions::intake::normalize_email;

/// Read side of the student records plus the portal login check.
pub struct StudentService<S> {
    store: Arc<S>,
}

impl<S> StudentService<S>
where
    S: StudentRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn get(&self, id: &StudentId) -> Result<Student, StudentServiceError> {
        self.store
            .fetch_student(id)?
            .ok_or(StudentServiceError::NotFound)
    }

    pub fn list(&self) -> Result<Vec<Student>, StudentServiceError> {
        Ok(self.store.list_students()?)
    }

    /// Match the email and printed student number against the stored record.
    pub fn login(&self, credentials: &StudentCredentials) -> Result<Student, StudentServiceError> {
        let email = normalize_email(&credentials.email);
        let number = credentials.student_id.trim();

        let student = self
            .store
            .student_by_email(&email)?
            .filter(|student| student.student_number.0 == number)
            .ok_or(StudentServiceError::InvalidCredentials)?;

        info!(student = %student.id, "student signed in");
        Ok(student)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StudentServiceError {
    #[error("student not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl StudentServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            StudentServiceError::NotFound | StudentServiceError::InvalidCredentials => {
                StatusCode::NOT_FOUND
            }
            StudentServiceError::Repository(err) => repository_status(err),
        }
    }
}

impl IntoResponse for StudentServiceError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}
