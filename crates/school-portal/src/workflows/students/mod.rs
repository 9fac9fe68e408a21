//! Enrolled students: records created by the admissions workflow and later mutated by course
//! registration and fee payment.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    RandomStudentNumbers, Student, StudentCredentials, StudentNumber, StudentNumberIssuer,
    StudentStatus,
};
pub use repository::StudentRepository;
pub use router::students_router;
pub use service::{StudentService, StudentServiceError};
