use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use super::domain::{Course, CourseFilter, CourseSelection, NewCourse};
use super::repository::CourseRepository;
use super::service::{CourseService, CourseServiceError};
use crate::http::AdminSession;
use crate::ids::{DepartmentId, StudentId};
use crate::workflows::academics::AcademicRepository;
use crate::workflows::students::{Student, StudentRepository};

type Shared<S> = State<Arc<CourseService<S>>>;

pub fn courses_router<S>(service: Arc<CourseService<S>>) -> Router
where
    S: CourseRepository + StudentRepository + AcademicRepository + 'static,
{
    Router::new()
        .route("/api/courses", post(create_course_handler::<S>))
        .route(
            "/api/courses/department/:department_id",
            get(department_courses_handler::<S>),
        )
        .route(
            "/api/students/register-courses/:student_id",
            put(register_courses_handler::<S>),
        )
        .route(
            "/api/students/courses/:student_id",
            get(registered_courses_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn create_course_handler<S>(
    _admin: AdminSession,
    State(service): Shared<S>,
    Json(request): Json<NewCourse>,
) -> Result<(StatusCode, Json<Course>), CourseServiceError>
where
    S: CourseRepository + StudentRepository + AcademicRepository + 'static,
{
    let course = service.create_course(request)?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(crate) async fn department_courses_handler<S>(
    State(service): Shared<S>,
    Path(department_id): Path<DepartmentId>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Course>>, CourseServiceError>
where
    S: CourseRepository + StudentRepository + AcademicRepository + 'static,
{
    service
        .courses_for_department(&department_id, filter)
        .map(Json)
}

pub(crate) async fn register_courses_handler<S>(
    State(service): Shared<S>,
    Path(student_id): Path<StudentId>,
    Json(selection): Json<CourseSelection>,
) -> Result<Json<Student>, CourseServiceError>
where
    S: CourseRepository + StudentRepository + AcademicRepository + 'static,
{
    service
        .register_courses(&student_id, selection.course_ids)
        .map(Json)
}

pub(crate) async fn registered_courses_handler<S>(
    State(service): Shared<S>,
    Path(student_id): Path<StudentId>,
) -> Result<Json<Vec<Course>>, CourseServiceError>
where
    S: CourseRepository + StudentRepository + AcademicRepository + 'static,
{
    service.registered_courses(&student_id).map(Json)
}
