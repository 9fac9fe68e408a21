use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::info;

use super::domain::{
    normalize_unit, Department, Faculty, FacultyDepartments, NewDepartment, NewUnit,
};
use super::repository::AcademicRepository;
use crate::http::{error_response, repository_status};
use crate::ids::{DepartmentId, FacultyId};
use crate::store::RepositoryError;

/// Maintains faculties and the departments grouped under them.
pub struct AcademicsService<R> {
    repository: Arc<R>,
}

impl<R> AcademicsService<R>
where
    R: AcademicRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create_faculty(&self, request: NewUnit) -> Result<Faculty, AcademicsServiceError> {
        let (name, code) = normalize_unit(&request.name, &request.code)
            .map_err(AcademicsServiceError::MissingField)?;

        let faculty = self.repository.insert_faculty(Faculty {
            id: FacultyId::new(),
            name,
            code,
            departments: Vec::new(),
            created_at: Utc::now(),
        })?;
        info!(faculty = %faculty.id, code = %faculty.code, "faculty created");
        Ok(faculty)
    }

    pub fn list_faculties(&self) -> Result<Vec<Faculty>, AcademicsServiceError> {
        Ok(self.repository.list_faculties()?)
    }

    /// Create a department under an existing faculty.
    pub fn add_department(
        &self,
        faculty: &FacultyId,
        request: NewUnit,
    ) -> Result<Department, AcademicsServiceError> {
        self.create_department(NewDepartment {
            name: request.name,
            code: request.code,
            faculty: Some(*faculty),
        })
    }

    pub fn create_department(
        &self,
        request: NewDepartment,
    ) -> Result<Department, AcademicsServiceError> {
        let (name, code) = normalize_unit(&request.name, &request.code)
            .map_err(AcademicsServiceError::MissingField)?;

        let department = Department {
            id: DepartmentId::new(),
            name,
            code,
            faculty: request.faculty,
            created_at: Utc::now(),
        };

        let stored = match self.repository.insert_department(department) {
            Ok(stored) => stored,
            Err(RepositoryError::NotFound) => return Err(AcademicsServiceError::FacultyNotFound),
            Err(other) => return Err(other.into()),
        };
        info!(department = %stored.id, code = %stored.code, "department created");
        Ok(stored)
    }

    pub fn list_departments(&self) -> Result<Vec<Department>, AcademicsServiceError> {
        Ok(self.repository.list_departments()?)
    }

    pub fn faculty_departments(
        &self,
        faculty_id: &FacultyId,
    ) -> Result<FacultyDepartments, AcademicsServiceError> {
        let faculty = self
            .repository
            .fetch_faculty(faculty_id)?
            .ok_or(AcademicsServiceError::FacultyNotFound)?;

        let mut departments = Vec::with_capacity(faculty.departments.len());
        for id in &faculty.departments {
            if let Some(department) = self.repository.fetch_department(id)? {
                departments.push(department);
            }
        }

        Ok(FacultyDepartments {
            faculty: faculty.name,
            departments,
        })
    }
}

/// Error raised by the academics service.
#[derive(Debug, thiserror::Error)]
pub enum AcademicsServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("faculty not found")]
    FacultyNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AcademicsServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            AcademicsServiceError::MissingField(_) => StatusCode::BAD_REQUEST,
            AcademicsServiceError::FacultyNotFound => StatusCode::NOT_FOUND,
            AcademicsServiceError::Repository(err) => repository_status(err),
        }
    }
}

impl IntoResponse for AcademicsServiceError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}
