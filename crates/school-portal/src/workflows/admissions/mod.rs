//! Admission intake and review.
//!
//! Applicants submit a multipart form with up to three documents. Administrators then accept
//! or reject the application; acceptance creates the student record through a compensating
//! saga so that at most one student ever exists per applicant.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantReview, ApplicationDocuments, ApplicationForm, ApplicationStatus,
    DocumentKind, Gender, JambResult, OLevelGrade, OLevelResult, PersonalDetails, ReviewerId,
};
pub use intake::{IntakeGuard, IntakeViolation, ValidatedApplication};
pub use repository::ApplicantRepository;
pub use router::admissions_router;
pub use service::{AdmissionService, AdmissionServiceError, MAX_STUDENT_NUMBER_ATTEMPTS};
