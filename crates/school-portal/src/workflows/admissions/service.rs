use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Datelike, Utc};
use tracing::{info, warn};

use super::domain::{
    Applicant, ApplicantReview, ApplicationDocuments, ApplicationForm, ApplicationStatus,
    DocumentKind, JambResult, OLevelResult, ReviewerId,
};
use super::intake::{normalize_email, IntakeGuard, IntakeViolation};
use super::repository::ApplicantRepository;
use crate::http::{blob_status, error_response, repository_status};
use crate::ids::ApplicantId;
use crate::store::{BlobError, BlobRef, BlobStore, RepositoryError, UniqueKey};
use crate::workflows::academics::AcademicRepository;
use crate::workflows::students::{
    RandomStudentNumbers, Student, StudentNumberIssuer, StudentRepository,
};

/// Upper bound on fresh student numbers tried for one approval.
pub const MAX_STUDENT_NUMBER_ATTEMPTS: usize = 8;

/// Service composing intake validation, document storage, and the approval saga.
pub struct AdmissionService<S, B> {
    guard: IntakeGuard,
    store: Arc<S>,
    blobs: Arc<B>,
    numbers: Arc<dyn StudentNumberIssuer>,
}

enum Enrollment {
    Created(Student),
    Existing(Student),
}

impl<S, B> AdmissionService<S, B>
where
    S: ApplicantRepository + StudentRepository + AcademicRepository + 'static,
    B: BlobStore + 'static,
{
    pub fn new(store: Arc<S>, blobs: Arc<B>) -> Self {
        Self {
            guard: IntakeGuard::default(),
            store,
            blobs,
            numbers: Arc::new(RandomStudentNumbers),
        }
    }

    pub fn with_number_issuer(mut self, numbers: Arc<dyn StudentNumberIssuer>) -> Self {
        self.numbers = numbers;
        self
    }

    /// Validate the form, store its documents, and persist a pending applicant.
    pub fn submit(
        &self,
        form: ApplicationForm,
        documents: ApplicationDocuments,
    ) -> Result<Applicant, AdmissionServiceError> {
        let application = self.guard.validate(form, Utc::now().date_naive())?;

        let department = self
            .store
            .fetch_department(&application.department)?
            .ok_or(IntakeViolation::UnknownDepartment(application.department))?;

        let email = application.personal.email.clone();
        if self.store.applicant_by_email(&email)?.is_some() {
            return Err(AdmissionServiceError::DuplicateEmail(email));
        }

        let uploaded = self.upload_documents(documents)?;
        let document = |kind: DocumentKind| {
            uploaded
                .iter()
                .find(|(slot, _)| *slot == kind)
                .map(|(_, reference)| reference.clone())
        };

        let applicant = Applicant {
            id: ApplicantId::new(),
            personal: application.personal,
            intended_course: application.intended_course,
            faculty: department.faculty,
            department: department.id,
            passport: document(DocumentKind::Passport),
            jamb: JambResult {
                reg_number: application.jamb_reg_number,
                score: application.jamb_score,
                result_file: document(DocumentKind::JambResult),
            },
            olevel: OLevelResult {
                exam_number: application.olevel_exam_number,
                subjects: application.olevel_subjects,
                result_file: document(DocumentKind::OLevelResult),
            },
            application_status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
        };

        match self.store.insert_applicant(applicant) {
            Ok(stored) => {
                info!(
                    applicant = %stored.id,
                    department = %stored.department,
                    documents = uploaded.len(),
                    "admission application received"
                );
                Ok(stored)
            }
            Err(err) => {
                self.discard_documents(&uploaded);
                match err {
                    RepositoryError::Conflict(UniqueKey::ApplicantEmail) => {
                        Err(AdmissionServiceError::DuplicateEmail(email))
                    }
                    other => Err(other.into()),
                }
            }
        }
    }

    pub fn check_status(&self, email: &str) -> Result<Applicant, AdmissionServiceError> {
        self.store
            .applicant_by_email(&normalize_email(email))?
            .ok_or(AdmissionServiceError::ApplicantNotFound)
    }

    pub fn list_applicants(&self) -> Result<Vec<Applicant>, AdmissionServiceError> {
        Ok(self.store.list_applicants()?)
    }

    /// Accept the applicant and create their student record.
    ///
    /// The student is inserted before the review is written so that the unique keys settle
    /// concurrent approvals. A failed review write removes the inserted student again.
    pub fn approve(
        &self,
        id: &ApplicantId,
        reviewer: &ReviewerId,
    ) -> Result<Student, AdmissionServiceError> {
        let applicant = self
            .store
            .fetch_applicant(id)?
            .ok_or(AdmissionServiceError::ApplicantNotFound)?;

        if let Some(existing) = self.store.student_for_applicant(id)? {
            return self.confirm_acceptance(id, reviewer, existing);
        }
        if !applicant
            .application_status
            .permits(ApplicationStatus::Accepted)
        {
            return Err(AdmissionServiceError::InvalidTransition {
                from: applicant.application_status.label(),
                to: ApplicationStatus::Accepted.label(),
            });
        }

        let now = Utc::now();
        let student = match self.enroll(&applicant, now)? {
            Enrollment::Created(student) => student,
            Enrollment::Existing(student) => {
                return self.confirm_acceptance(id, reviewer, student)
            }
        };

        let review = ApplicantReview {
            status: ApplicationStatus::Accepted,
            reviewed_at: now,
            reviewed_by: Some(reviewer.clone()),
        };
        if let Err(err) = self.store.review_applicant(id, review) {
            warn!(applicant = %id, student = %student.id, error = %err, "review failed, removing student");
            if let Err(cleanup) = self.store.remove_student(&student.id) {
                warn!(student = %student.id, error = %cleanup, "student compensation failed");
            }
            return Err(AdmissionServiceError::from_review(err));
        }

        info!(
            applicant = %id,
            student = %student.id,
            number = %student.student_number,
            reviewer = %reviewer,
            "applicant approved"
        );
        Ok(student)
    }

    pub fn reject(
        &self,
        id: &ApplicantId,
        reviewer: &ReviewerId,
    ) -> Result<Applicant, AdmissionServiceError> {
        let review = ApplicantReview {
            status: ApplicationStatus::Rejected,
            reviewed_at: Utc::now(),
            reviewed_by: Some(reviewer.clone()),
        };
        let applicant = self
            .store
            .review_applicant(id, review)
            .map_err(AdmissionServiceError::from_review)?;
        info!(applicant = %id, reviewer = %reviewer, "applicant rejected");
        Ok(applicant)
    }

    /// Hand back a student created by an earlier or concurrent approval once the acceptance is
    /// recorded. Writing the same review twice is a no-op in the store.
    fn confirm_acceptance(
        &self,
        id: &ApplicantId,
        reviewer: &ReviewerId,
        student: Student,
    ) -> Result<Student, AdmissionServiceError> {
        let review = ApplicantReview {
            status: ApplicationStatus::Accepted,
            reviewed_at: Utc::now(),
            reviewed_by: Some(reviewer.clone()),
        };
        self.store
            .review_applicant(id, review)
            .map_err(AdmissionServiceError::from_review)?;
        Ok(student)
    }

    fn enroll(
        &self,
        applicant: &Applicant,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, AdmissionServiceError> {
        for attempt in 1..=MAX_STUDENT_NUMBER_ATTEMPTS {
            let number = self.numbers.issue(now.year());
            match self
                .store
                .insert_student(Student::from_applicant(applicant, number.clone(), now))
            {
                Ok(student) => return Ok(Enrollment::Created(student)),
                Err(RepositoryError::Conflict(UniqueKey::StudentNumber)) => {
                    warn!(%number, attempt, "student number taken, drawing another");
                }
                Err(RepositoryError::Conflict(UniqueKey::StudentApplicant)) => {
                    let winner = self
                        .store
                        .student_for_applicant(&applicant.id)?
                        .ok_or(RepositoryError::NotFound)?;
                    return Ok(Enrollment::Existing(winner));
                }
                Err(RepositoryError::Conflict(UniqueKey::StudentEmail)) => {
                    return Err(AdmissionServiceError::DuplicateEmail(
                        applicant.personal.email.clone(),
                    ));
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(AdmissionServiceError::StudentNumbersExhausted(
            MAX_STUDENT_NUMBER_ATTEMPTS,
        ))
    }

    fn upload_documents(
        &self,
        documents: ApplicationDocuments,
    ) -> Result<Vec<(DocumentKind, BlobRef)>, AdmissionServiceError> {
        let mut uploaded = Vec::new();
        for (kind, upload) in documents.into_slots() {
            let Some(upload) = upload else {
                continue;
            };
            match self.blobs.put(kind.bucket(), upload) {
                Ok(reference) => uploaded.push((kind, reference)),
                Err(err) => {
                    self.discard_documents(&uploaded);
                    return Err(err.into());
                }
            }
        }
        Ok(uploaded)
    }

    fn discard_documents(&self, uploaded: &[(DocumentKind, BlobRef)]) {
        for (kind, reference) in uploaded {
            if let Err(err) = self.blobs.remove(kind.bucket(), &reference.id) {
                warn!(bucket = kind.bucket(), id = %reference.id, error = %err, "orphaned upload");
            }
        }
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Validation(#[from] IntakeViolation),
    #[error("an application with email {0} already exists")]
    DuplicateEmail(String),
    #[error("applicant not found")]
    ApplicantNotFound,
    #[error("application cannot move from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("no free student number after {0} attempts")]
    StudentNumbersExhausted(usize),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl AdmissionServiceError {
    fn from_review(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AdmissionServiceError::ApplicantNotFound,
            RepositoryError::InvalidTransition { from, to } => {
                AdmissionServiceError::InvalidTransition { from, to }
            }
            other => AdmissionServiceError::Repository(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AdmissionServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            AdmissionServiceError::DuplicateEmail(_)
            | AdmissionServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AdmissionServiceError::ApplicantNotFound => StatusCode::NOT_FOUND,
            AdmissionServiceError::StudentNumbersExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            AdmissionServiceError::Repository(err) => repository_status(err),
            AdmissionServiceError::Blob(err) => blob_status(err),
        }
    }
}

impl IntoResponse for AdmissionServiceError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}
