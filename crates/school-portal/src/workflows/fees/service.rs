use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    valid_session, Fee, NewFee, PaidStudent, Payment, PaymentDecision, PaymentStatus,
    PaymentSubmission,
};
use super::repository::{FeeRepository, PaymentRepository};
use super::roster::render_roster;
use crate::http::{blob_status, error_response, repository_status};
use crate::ids::{FeeId, PaymentId, StudentId};
use crate::store::{buckets, BlobError, BlobRef, BlobStore, RepositoryError, UniqueKey};
use crate::workflows::students::{Student, StudentRepository};

/// Fee catalog plus the payment submission and verification lifecycle.
pub struct FeeService<S, B> {
    store: Arc<S>,
    blobs: Arc<B>,
}

impl<S, B> FeeService<S, B>
where
    S: FeeRepository + PaymentRepository + StudentRepository + 'static,
    B: BlobStore + 'static,
{
    pub fn new(store: Arc<S>, blobs: Arc<B>) -> Self {
        Self { store, blobs }
    }

    pub fn create_fee(&self, request: NewFee) -> Result<Fee, FeeServiceError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(FeeServiceError::Validation("title is required".to_string()));
        }
        let session = request.session.trim();
        if !valid_session(session) {
            return Err(FeeServiceError::Validation(format!(
                "session must look like 2024/2025 (found '{session}')"
            )));
        }
        let amount = u64::try_from(request.amount)
            .ok()
            .filter(|amount| *amount > 0)
            .ok_or_else(|| FeeServiceError::Validation("amount must be positive".to_string()))?;

        let fee = Fee {
            id: FeeId::new(),
            title: title.to_string(),
            session: session.to_string(),
            semester: request.semester,
            amount,
            created_at: Utc::now(),
        };

        match self.store.insert_fee(fee) {
            Ok(fee) => {
                info!(fee = %fee.id, title = %fee.title, session = %fee.session, "fee created");
                Ok(fee)
            }
            Err(RepositoryError::Conflict(UniqueKey::FeeSchedule)) => {
                Err(FeeServiceError::DuplicateFee)
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn list_fees(&self) -> Result<Vec<Fee>, FeeServiceError> {
        Ok(self.store.list_fees()?)
    }

    /// Record a pending payment for `student` with the uploaded receipt.
    pub fn pay(
        &self,
        student_id: &StudentId,
        submission: PaymentSubmission,
    ) -> Result<Payment, FeeServiceError> {
        let raw_fee = submission
            .fee_id
            .ok_or_else(|| FeeServiceError::Validation("feeId is required".to_string()))?;
        let fee_id = raw_fee.parse::<FeeId>().map_err(|_| {
            FeeServiceError::Validation(format!("feeId '{raw_fee}' is not a valid id"))
        })?;
        let receipt = submission
            .receipt
            .ok_or_else(|| FeeServiceError::Validation("receipt file is required".to_string()))?;

        let student = self.student(student_id)?;
        let fee = self.fee(&fee_id)?;

        if self.store.active_payment(&student.id, &fee.id)?.is_some() {
            return Err(FeeServiceError::DuplicatePayment);
        }

        let receipt = self.blobs.put(buckets::RECEIPTS, receipt)?;
        let payment = Payment {
            id: PaymentId::new(),
            student: student.id,
            fee: fee.id,
            receipt: Some(receipt.clone()),
            amount: fee.amount,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            reviewed_at: None,
        };

        let payment = match self.store.insert_payment(payment) {
            Ok(payment) => payment,
            Err(err) => {
                self.discard_receipt(&receipt);
                return Err(match err {
                    RepositoryError::Conflict(UniqueKey::ActivePayment) => {
                        FeeServiceError::DuplicatePayment
                    }
                    other => other.into(),
                });
            }
        };

        if let Err(err) = self.store.push_student_payment(&student.id, payment.id) {
            warn!(payment = %payment.id, error = %err, "linking payment failed, discarding it");
            if let Err(cleanup) = self.store.discard_payment(&payment.id) {
                warn!(payment = %payment.id, error = %cleanup, "payment compensation failed");
            }
            self.discard_receipt(&receipt);
            return Err(err.into());
        }

        info!(
            payment = %payment.id,
            student = %student.id,
            fee = %fee.id,
            amount = payment.amount,
            "payment submitted"
        );
        Ok(payment)
    }

    /// Settle a pending payment. `status` must be `verified` or `rejected`.
    pub fn verify(&self, payment_id: &PaymentId, status: &str) -> Result<Payment, FeeServiceError> {
        let decision = status.parse::<PaymentDecision>().map_err(|found| {
            FeeServiceError::Validation(format!(
                "status must be verified or rejected (found '{found}')"
            ))
        })?;
        self.settle(payment_id, decision)
    }

    /// Verify the pending payment `student` made for `fee`.
    pub fn approve_fee_payment(
        &self,
        student_id: &StudentId,
        fee_id: &FeeId,
    ) -> Result<Payment, FeeServiceError> {
        let student = self.student(student_id)?;
        let fee = self.fee(fee_id)?;
        let payment = self
            .store
            .active_payment(&student.id, &fee.id)?
            .ok_or(FeeServiceError::PaymentNotFound)?;
        if payment.status != PaymentStatus::Pending {
            return Err(FeeServiceError::PaymentAlreadySettled(payment.status));
        }
        self.settle(&payment.id, PaymentDecision::Verified)
    }

    pub fn paid_students(&self, fee_id: &FeeId) -> Result<Vec<PaidStudent>, FeeServiceError> {
        let fee = self.fee(fee_id)?;
        let mut paid = Vec::new();
        for payment in self.store.payments_for_fee(&fee.id)? {
            if !payment.status.is_active() {
                continue;
            }
            if let Some(student) = self.store.fetch_student(&payment.student)? {
                paid.push(PaidStudent { student, payment });
            }
        }
        Ok(paid)
    }

    pub fn unpaid_students(&self, fee_id: &FeeId) -> Result<Vec<Student>, FeeServiceError> {
        let fee = self.fee(fee_id)?;
        let paid: HashSet<StudentId> = self
            .store
            .payments_for_fee(&fee.id)?
            .into_iter()
            .filter(|payment| payment.status.is_active())
            .map(|payment| payment.student)
            .collect();

        Ok(self
            .store
            .list_students()?
            .into_iter()
            .filter(|student| !paid.contains(&student.id))
            .collect())
    }

    pub fn list_payments(&self) -> Result<Vec<Payment>, FeeServiceError> {
        Ok(self.store.list_payments()?)
    }

    pub fn student_payments(&self, student_id: &StudentId) -> Result<Vec<Payment>, FeeServiceError> {
        let student = self.student(student_id)?;
        Ok(self.store.payments_for_student(&student.id)?)
    }

    /// CSV export of every student and their standing for one fee.
    pub fn roster(&self, fee_id: &FeeId) -> Result<String, FeeServiceError> {
        let fee = self.fee(fee_id)?;
        let students = self.store.list_students()?;
        let payments = self.store.payments_for_fee(&fee.id)?;
        Ok(render_roster(&fee, &students, &payments)?)
    }

    fn settle(
        &self,
        payment_id: &PaymentId,
        decision: PaymentDecision,
    ) -> Result<Payment, FeeServiceError> {
        match self.store.settle_payment(payment_id, decision, Utc::now()) {
            Ok(payment) => {
                info!(payment = %payment.id, status = payment.status.label(), "payment settled");
                Ok(payment)
            }
            Err(RepositoryError::NotFound) => Err(FeeServiceError::PaymentNotFound),
            Err(RepositoryError::InvalidTransition { .. }) => {
                let current = self
                    .store
                    .fetch_payment(payment_id)?
                    .ok_or(FeeServiceError::PaymentNotFound)?;
                Err(FeeServiceError::PaymentAlreadySettled(current.status))
            }
            Err(other) => Err(other.into()),
        }
    }

    fn student(&self, id: &StudentId) -> Result<Student, FeeServiceError> {
        self.store
            .fetch_student(id)?
            .ok_or(FeeServiceError::StudentNotFound)
    }

    fn fee(&self, id: &FeeId) -> Result<Fee, FeeServiceError> {
        self.store.fetch_fee(id)?.ok_or(FeeServiceError::FeeNotFound)
    }

    fn discard_receipt(&self, receipt: &BlobRef) {
        if let Err(err) = self.blobs.remove(buckets::RECEIPTS, &receipt.id) {
            warn!(id = %receipt.id, error = %err, "orphaned receipt");
        }
    }
}

/// Error raised by the fee service.
#[derive(Debug, thiserror::Error)]
pub enum FeeServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("a fee with this title already exists for the session and semester")]
    DuplicateFee,
    #[error("this fee already has a pending or verified payment")]
    DuplicatePayment,
    #[error("payment is already {}", .0.label())]
    PaymentAlreadySettled(PaymentStatus),
    #[error("fee not found")]
    FeeNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("roster export failed: {0}")]
    Roster(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl FeeServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            FeeServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            FeeServiceError::DuplicateFee
            | FeeServiceError::DuplicatePayment
            | FeeServiceError::PaymentAlreadySettled(_) => StatusCode::CONFLICT,
            FeeServiceError::FeeNotFound
            | FeeServiceError::StudentNotFound
            | FeeServiceError::PaymentNotFound => StatusCode::NOT_FOUND,
            FeeServiceError::Roster(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FeeServiceError::Repository(err) => repository_status(err),
            FeeServiceError::Blob(err) => blob_status(err),
        }
    }
}

impl IntoResponse for FeeServiceError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}
