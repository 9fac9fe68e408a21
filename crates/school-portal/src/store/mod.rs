//! Persistence boundary: the shared repository error, the blob store, and the in-memory record
//! store backing every workflow repository.

pub mod blob;
pub mod memory;

use std::fmt;

pub use blob::{buckets, BlobError, BlobRef, BlobStore, BlobUpload, InMemoryBlobStore, StoredBlob};
pub use memory::InMemoryRecordStore;

/// Unique constraints enforced by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    ApplicantEmail,
    StudentEmail,
    StudentNumber,
    StudentApplicant,
    FacultyCode,
    DepartmentCode,
    CourseCode,
    /// (title, session, semester) of a fee.
    FeeSchedule,
    /// At most one pending or verified payment per (student, fee).
    ActivePayment,
}

impl UniqueKey {
    pub const fn label(self) -> &'static str {
        match self {
            UniqueKey::ApplicantEmail => "applicant email",
            UniqueKey::StudentEmail => "student email",
            UniqueKey::StudentNumber => "student number",
            UniqueKey::StudentApplicant => "student for applicant",
            UniqueKey::FacultyCode => "faculty code",
            UniqueKey::DepartmentCode => "department code",
            UniqueKey::CourseCode => "course code",
            UniqueKey::FeeSchedule => "fee title/session/semester",
            UniqueKey::ActivePayment => "active payment",
        }
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists ({0})")]
    Conflict(UniqueKey),
    #[error("record not found")]
    NotFound,
    /// A conditional write found the record in a state it may not leave.
    #[error("cannot move record from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub(crate) fn poisoned() -> Self {
        RepositoryError::Unavailable("record store lock poisoned".to_string())
    }
}
