use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::MultipartForm;
use crate::ids::{FeeId, PaymentId, StudentId};
use crate::store::{BlobRef, BlobUpload};
use crate::workflows::academics::Semester;
use crate::workflows::students::Student;

/// Catalog entry for a payable amount. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: FeeId,
    pub title: String,
    pub session: String,
    pub semester: Semester,
    /// Whole naira.
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFee {
    pub title: String,
    pub session: String,
    pub semester: Semester,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        }
    }

    /// Pending and verified payments occupy the (student, fee) slot.
    pub const fn is_active(self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Verified)
    }
}

/// Outcome an administrator may record against a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDecision {
    Verified,
    Rejected,
}

impl PaymentDecision {
    pub const fn status(self) -> PaymentStatus {
        match self {
            PaymentDecision::Verified => PaymentStatus::Verified,
            PaymentDecision::Rejected => PaymentStatus::Rejected,
        }
    }
}

impl FromStr for PaymentDecision {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "verified" => Ok(PaymentDecision::Verified),
            "rejected" => Ok(PaymentDecision::Rejected),
            other => Err(other.to_string()),
        }
    }
}

/// A student's claim, with receipt, of having paid a fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub student: StudentId,
    pub fee: FeeId,
    pub receipt: Option<BlobRef>,
    pub amount: u64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Body of the verification request; the status stays a string so bad values become 400s.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyRequest {
    pub status: String,
}

/// Multipart fields of a payment submission, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentSubmission {
    pub fee_id: Option<String>,
    pub receipt: Option<BlobUpload>,
}

impl PaymentSubmission {
    pub fn from_form(mut form: MultipartForm) -> Self {
        let fee_id = ["feeId", "fee_id", "fee"]
            .iter()
            .find_map(|name| form.fields.remove(*name))
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        let receipt = form.files.remove("receipt");
        Self { fee_id, receipt }
    }
}

/// A student holding an active payment for a fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidStudent {
    pub student: Student,
    pub payment: Payment,
}

/// Check the `YYYY/YYYY` academic session format where the second year follows the first.
pub fn valid_session(raw: &str) -> bool {
    let Some((first, second)) = raw.split_once('/') else {
        return false;
    };
    let digits = |part: &str| part.len() == 4 && part.chars().all(|c| c.is_ascii_digit());
    if !digits(first) || !digits(second) {
        return false;
    }
    match (first.parse::<u32>(), second.parse::<u32>()) {
        (Ok(first), Ok(second)) => second == first + 1,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_must_span_consecutive_years() {
        assert!(valid_session("2024/2025"));
        assert!(!valid_session("2024/2026"));
        assert!(!valid_session("2025/2024"));
        assert!(!valid_session("24/25"));
        assert!(!valid_session("2024-2025"));
    }

    #[test]
    fn only_pending_and_verified_are_active() {
        assert!(PaymentStatus::Pending.is_active());
        assert!(PaymentStatus::Verified.is_active());
        assert!(!PaymentStatus::Rejected.is_active());
    }

    #[test]
    fn decisions_parse_case_insensitively() {
        assert_eq!(
            " Verified ".parse::<PaymentDecision>(),
            Ok(PaymentDecision::Verified)
        );
        assert_eq!(
            "REJECTED".parse::<PaymentDecision>(),
            Ok(PaymentDecision::Rejected)
        );
        assert_eq!(
            "pending".parse::<PaymentDecision>(),
            Err("pending".to_string())
        );
    }
}
