use std::collections::BTreeSet;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::info;

use super::domain::{Course, CourseFilter, NewCourse, MAX_COURSE_UNIT, MIN_COURSE_UNIT};
use super::repository::CourseRepository;
use crate::http::{error_response, repository_status};
use crate::ids::{CourseId, DepartmentId, StudentId};
use crate::store::{RepositoryError, UniqueKey};
use crate::workflows::academics::AcademicRepository;
use crate::workflows::students::{Student, StudentRepository};

/// Course catalog and per-student course registration.
pub struct CourseService<S> {
    store: Arc<S>,
    max_unit_load: u16,
}

impl<S> CourseService<S>
where
    S: CourseRepository + StudentRepository + AcademicRepository + 'static,
{
    pub fn new(store: Arc<S>, max_unit_load: u16) -> Self {
        Self {
            store,
            max_unit_load,
        }
    }

    pub fn max_unit_load(&self) -> u16 {
        self.max_unit_load
    }

    pub fn create_course(&self, request: NewCourse) -> Result<Course, CourseServiceError> {
        let title = request.title.trim();
        let code = request.code.trim().to_ascii_uppercase();
        if title.is_empty() {
            return Err(CourseServiceError::Validation("title is required".to_string()));
        }
        if code.is_empty() {
            return Err(CourseServiceError::Validation("code is required".to_string()));
        }
        if !(MIN_COURSE_UNIT..=MAX_COURSE_UNIT).contains(&request.unit) {
            return Err(CourseServiceError::Validation(format!(
                "unit must be between {MIN_COURSE_UNIT} and {MAX_COURSE_UNIT}"
            )));
        }
        if self.store.fetch_department(&request.department)?.is_none() {
            return Err(CourseServiceError::DepartmentNotFound);
        }

        let course = Course {
            id: CourseId::new(),
            title: title.to_string(),
            code,
            department: request.department,
            semester: request.semester,
            level: request.level,
            unit: request.unit,
            students: BTreeSet::new(),
            created_at: Utc::now(),
        };

        match self.store.insert_course(course) {
            Ok(course) => {
                info!(course = %course.id, code = %course.code, "course created");
                Ok(course)
            }
            Err(RepositoryError::Conflict(UniqueKey::CourseCode)) => {
                Err(CourseServiceError::DuplicateCode)
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn courses_for_department(
        &self,
        department: &DepartmentId,
        filter: CourseFilter,
    ) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.store.courses_for_department(department, filter)?)
    }

    /// Replace the student's selection with `course_ids`.
    ///
    /// Every course is resolved and the unit load checked before anything is written. The
    /// student then joins each selected course and leaves any course dropped from the old list.
    pub fn register_courses(
        &self,
        student_id: &StudentId,
        course_ids: Vec<CourseId>,
    ) -> Result<Student, CourseServiceError> {
        let student = self
            .store
            .fetch_student(student_id)?
            .ok_or(CourseServiceError::StudentNotFound)?;

        let mut seen = BTreeSet::new();
        let selection: Vec<CourseId> = course_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        let mut requested: u32 = 0;
        for id in &selection {
            let course = self
                .store
                .fetch_course(id)?
                .ok_or(CourseServiceError::CourseNotFound(*id))?;
            requested += u32::from(course.unit);
        }
        if requested > u32::from(self.max_unit_load) {
            return Err(CourseServiceError::UnitLoadExceeded {
                max: self.max_unit_load,
                requested,
            });
        }

        let dropped: Vec<CourseId> = student
            .courses
            .iter()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();

        let updated = self
            .store
            .set_student_courses(&student.id, selection.clone())?;
        for id in &selection {
            self.store.enroll_student(id, &student.id)?;
        }
        for id in &dropped {
            match self.store.withdraw_student(id, &student.id) {
                Ok(()) | Err(RepositoryError::NotFound) => {}
                Err(other) => return Err(other.into()),
            }
        }

        info!(
            student = %student.id,
            courses = selection.len(),
            units = requested,
            dropped = dropped.len(),
            "courses registered"
        );
        Ok(updated)
    }

    pub fn registered_courses(&self, student_id: &StudentId) -> Result<Vec<Course>, CourseServiceError> {
        let student = self
            .store
            .fetch_student(student_id)?
            .ok_or(CourseServiceError::StudentNotFound)?;

        let mut courses = Vec::with_capacity(student.courses.len());
        for id in &student.courses {
            if let Some(course) = self.store.fetch_course(id)? {
                courses.push(course);
            }
        }
        Ok(courses)
    }
}

/// Error raised by the course service.
#[derive(Debug, thiserror::Error)]
pub enum CourseServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("a course with this code already exists")]
    DuplicateCode,
    #[error("department not found")]
    DepartmentNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("selected courses total {requested} units, above the limit of {max}")]
    UnitLoadExceeded { max: u16, requested: u32 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CourseServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            CourseServiceError::Validation(_) | CourseServiceError::UnitLoadExceeded { .. } => {
                StatusCode::BAD_REQUEST
            }
            CourseServiceError::DuplicateCode => StatusCode::CONFLICT,
            CourseServiceError::DepartmentNotFound
            | CourseServiceError::StudentNotFound
            | CourseServiceError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            CourseServiceError::Repository(err) => repository_status(err),
        }
    }
}

impl IntoResponse for CourseServiceError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}
