use super::domain::{Department, Faculty};
use crate::ids::{DepartmentId, FacultyId};
use crate::store::RepositoryError;

/// Storage for the faculty/department hierarchy.
pub trait AcademicRepository: Send + Sync {
    /// Fails with `Conflict(FacultyCode)` when the code is taken.
    fn insert_faculty(&self, faculty: Faculty) -> Result<Faculty, RepositoryError>;
    fn fetch_faculty(&self, id: &FacultyId) -> Result<Option<Faculty>, RepositoryError>;
    fn list_faculties(&self) -> Result<Vec<Faculty>, RepositoryError>;
    /// Insert the department and append it to its faculty in the same write.
    ///
    /// Fails with `NotFound` when the named faculty does not exist and with
    /// `Conflict(DepartmentCode)` when the code is taken.
    fn insert_department(&self, department: Department) -> Result<Department, RepositoryError>;
    fn fetch_department(&self, id: &DepartmentId) -> Result<Option<Department>, RepositoryError>;
    fn list_departments(&self) -> Result<Vec<Department>, RepositoryError>;
}
