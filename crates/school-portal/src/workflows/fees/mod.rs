//! Fee catalog and the payment lifecycle.
//!
//! Payments are separate records referencing a student and a fee. The record store keeps an
//! index of active (pending or verified) payments so a student can hold at most one per fee.

pub mod domain;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    valid_session, Fee, NewFee, PaidStudent, Payment, PaymentDecision, PaymentStatus,
    PaymentSubmission, VerifyRequest,
};
pub use repository::{FeeRepository, PaymentRepository};
pub use roster::render_roster;
pub use router::fees_router;
pub use service::{FeeService, FeeServiceError};
