use super::domain::Student;
use crate::ids::{ApplicantId, CourseId, PaymentId, StudentId};
use crate::store::RepositoryError;

/// Storage abstraction for enrolled students.
pub trait StudentRepository: Send + Sync {
    /// Fails with `Conflict` on the applicant, email, or student-number unique keys, checked
    /// in that order.
    fn insert_student(&self, student: Student) -> Result<Student, RepositoryError>;
    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    fn student_for_applicant(&self, id: &ApplicantId) -> Result<Option<Student>, RepositoryError>;
    fn student_by_email(&self, email: &str) -> Result<Option<Student>, RepositoryError>;
    /// All students, most recently enrolled first.
    fn list_students(&self) -> Result<Vec<Student>, RepositoryError>;
    fn remove_student(&self, id: &StudentId) -> Result<(), RepositoryError>;
    /// Replace the student's course list.
    fn set_student_courses(
        &self,
        id: &StudentId,
        courses: Vec<CourseId>,
    ) -> Result<Student, RepositoryError>;
    fn push_student_payment(
        &self,
        id: &StudentId,
        payment: PaymentId,
    ) -> Result<Student, RepositoryError>;
}
