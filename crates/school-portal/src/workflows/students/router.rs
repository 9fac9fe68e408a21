use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::domain::{Student, StudentCredentials};
use super::repository::StudentRepository;
use super::service::{StudentService, StudentServiceError};
use crate::http::AdminSession;
use crate::ids::StudentId;

pub fn students_router<S>(service: Arc<StudentService<S>>) -> Router
where
    S: StudentRepository + 'static,
{
    Router::new()
        .route("/api/students/login", post(login_handler::<S>))
        .route("/api/students/:student_id", get(get_student_handler::<S>))
        .route("/api/admissions/students", get(list_students_handler::<S>))
        .with_state(service)
}

pub(crate) async fn login_handler<S>(
    State(service): State<Arc<StudentService<S>>>,
    Json(credentials): Json<StudentCredentials>,
) -> Result<Json<Student>, StudentServiceError>
where
    S: StudentRepository + 'static,
{
    service.login(&credentials).map(Json)
}

pub(crate) async fn get_student_handler<S>(
    State(service): State<Arc<StudentService<S>>>,
    Path(student_id): Path<StudentId>,
) -> Result<Json<Student>, StudentServiceError>
where
    S: StudentRepository + 'static,
{
    service.get(&student_id).map(Json)
}

pub(crate) async fn list_students_handler<S>(
    _admin: AdminSession,
    State(service): State<Arc<StudentService<S>>>,
) -> Result<Json<Vec<Student>>, StudentServiceError>
where
    S: StudentRepository + 'static,
{
    service.list().map(Json)
}
