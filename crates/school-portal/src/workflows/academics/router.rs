use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use super::domain::{Department, Faculty, FacultyDepartments, NewDepartment, NewUnit};
use super::repository::AcademicRepository;
use super::service::{AcademicsService, AcademicsServiceError};
use crate::http::AdminSession;
use crate::ids::FacultyId;

type Shared<R> = State<Arc<AcademicsService<R>>>;

/// Router exposing the faculty and department catalog.
pub fn academics_router<R>(service: Arc<AcademicsService<R>>) -> Router
where
    R: AcademicRepository + 'static,
{
    Router::new()
        .route(
            "/api/faculties",
            post(create_faculty_handler::<R>).get(list_faculties_handler::<R>),
        )
        .route(
            "/api/faculties/:faculty_id/departments",
            post(add_department_handler::<R>).get(faculty_departments_handler::<R>),
        )
        .route(
            "/api/departments",
            post(create_department_handler::<R>).get(list_departments_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_faculty_handler<R>(
    _admin: AdminSession,
    State(service): Shared<R>,
    Json(request): Json<NewUnit>,
) -> Result<(StatusCode, Json<Faculty>), AcademicsServiceError>
where
    R: AcademicRepository + 'static,
{
    let faculty = service.create_faculty(request)?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

pub(crate) async fn list_faculties_handler<R>(
    State(service): Shared<R>,
) -> Result<Json<Vec<Faculty>>, AcademicsServiceError>
where
    R: AcademicRepository + 'static,
{
    service.list_faculties().map(Json)
}

pub(crate) async fn add_department_handler<R>(
    _admin: AdminSession,
    State(service): Shared<R>,
    Path(faculty_id): Path<FacultyId>,
    Json(request): Json<NewUnit>,
) -> Result<(StatusCode, Json<Department>), AcademicsServiceError>
where
    R: AcademicRepository + 'static,
{
    let department = service.add_department(&faculty_id, request)?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub(crate) async fn faculty_departments_handler<R>(
    State(service): Shared<R>,
    Path(faculty_id): Path<FacultyId>,
) -> Result<Json<FacultyDepartments>, AcademicsServiceError>
where
    R: AcademicRepository + 'static,
{
    service.faculty_departments(&faculty_id).map(Json)
}

pub(crate) async fn create_department_handler<R>(
    _admin: AdminSession,
    State(service): Shared<R>,
    Json(request): Json<NewDepartment>,
) -> Result<(StatusCode, Json<Department>), AcademicsServiceError>
where
    R: AcademicRepository + 'static,
{
    let department = service.create_department(request)?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub(crate) async fn list_departments_handler<R>(
    State(service): Shared<R>,
) -> Result<Json<Vec<Department>>, AcademicsServiceError>
where
    R: AcademicRepository + 'static,
{
    service.list_departments().map(Json)
}
