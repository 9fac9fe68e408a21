use chrono::{DateTime, Utc};

use super::domain::{Fee, Payment, PaymentDecision};
use crate::ids::{FeeId, PaymentId, StudentId};
use crate::store::RepositoryError;

/// Storage for the fee catalog.
pub trait FeeRepository: Send + Sync {
    /// Fails with `Conflict(FeeSchedule)` when (title, session, semester) already exists.
    fn insert_fee(&self, fee: Fee) -> Result<Fee, RepositoryError>;
    fn fetch_fee(&self, id: &FeeId) -> Result<Option<Fee>, RepositoryError>;
    /// All fees, newest first.
    fn list_fees(&self) -> Result<Vec<Fee>, RepositoryError>;
}

/// Storage for payments and the active-payment index.
pub trait PaymentRepository: Send + Sync {
    /// Insert a pending payment. The active-payment check and the write happen atomically;
    /// a second active payment for the same (student, fee) fails with `Conflict(ActivePayment)`.
    fn insert_payment(&self, payment: Payment) -> Result<Payment, RepositoryError>;
    fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError>;
    /// Newest first.
    fn list_payments(&self) -> Result<Vec<Payment>, RepositoryError>;
    fn payments_for_student(&self, student: &StudentId) -> Result<Vec<Payment>, RepositoryError>;
    fn payments_for_fee(&self, fee: &FeeId) -> Result<Vec<Payment>, RepositoryError>;
    /// Move a pending payment to its final state. Any other current state fails with
    /// `InvalidTransition`; a rejection releases the active-payment slot.
    fn settle_payment(
        &self,
        id: &PaymentId,
        decision: PaymentDecision,
        at: DateTime<Utc>,
    ) -> Result<Payment, RepositoryError>;
    /// The pending or verified payment currently holding the (student, fee) slot.
    fn active_payment(
        &self,
        student: &StudentId,
        fee: &FeeId,
    ) -> Result<Option<Payment>, RepositoryError>;
    /// Drop a payment entirely, releasing its slot. Used to undo a half-finished `pay`.
    fn discard_payment(&self, id: &PaymentId) -> Result<(), RepositoryError>;
}
