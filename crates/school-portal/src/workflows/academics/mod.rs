//! Faculties and departments referenced by applicants, students, and courses.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Department, Faculty, FacultyDepartments, NewDepartment, NewUnit, Semester};
pub use repository::AcademicRepository;
pub use router::academics_router;
pub use service::{AcademicsService, AcademicsServiceError};
