use super::domain::{Course, CourseFilter};
use crate::ids::{CourseId, DepartmentId, StudentId};
use crate::store::RepositoryError;

/// Storage for the course catalog and its enrollment sets.
pub trait CourseRepository: Send + Sync {
    /// Fails with `Conflict(CourseCode)` when the code is taken.
    fn insert_course(&self, course: Course) -> Result<Course, RepositoryError>;
    fn fetch_course(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError>;
    fn courses_for_department(
        &self,
        department: &DepartmentId,
        filter: CourseFilter,
    ) -> Result<Vec<Course>, RepositoryError>;
    /// Add the student to the course's enrollment set. Adding twice is a no-op.
    fn enroll_student(&self, course: &CourseId, student: &StudentId) -> Result<(), RepositoryError>;
    fn withdraw_student(
        &self,
        course: &CourseId,
        student: &StudentId,
    ) -> Result<(), RepositoryError>;
}
