use super::domain::{Applicant, ApplicantReview};
use crate::ids::ApplicantId;
use crate::store::RepositoryError;

/// Storage abstraction for admission applications.
pub trait ApplicantRepository: Send + Sync {
    /// Fails with `Conflict(ApplicantEmail)` when the email is already registered.
    fn insert_applicant(&self, applicant: Applicant) -> Result<Applicant, RepositoryError>;
    fn fetch_applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    /// Lookup by normalized (trimmed, lowercase) email.
    fn applicant_by_email(&self, email: &str) -> Result<Option<Applicant>, RepositoryError>;
    /// All applicants, most recently submitted first.
    fn list_applicants(&self) -> Result<Vec<Applicant>, RepositoryError>;
    /// Apply a review if the stored status permits the transition.
    ///
    /// Repeating the stored decision leaves the record untouched and returns it. Any other
    /// disallowed move fails with `InvalidTransition`.
    fn review_applicant(
        &self,
        id: &ApplicantId,
        review: ApplicantReview,
    ) -> Result<Applicant, RepositoryError>;
}
