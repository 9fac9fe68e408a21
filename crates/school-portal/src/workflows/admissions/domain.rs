use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ApplicantId, DepartmentId, FacultyId};
use crate::store::{buckets, BlobRef, BlobUpload};

/// Identity of the administrator who reviewed an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewerId(pub String);

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review state of an admission application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Pending applications may be accepted or rejected; a decision can be repeated but not flipped.
    pub const fn permits(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Accepted)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
                | (ApplicationStatus::Accepted, ApplicationStatus::Accepted)
                | (ApplicationStatus::Rejected, ApplicationStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(other.to_string()),
        }
    }
}

/// Identity fields shared by applicants and the students created from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub address: String,
}

impl PersonalDetails {
    pub fn full_name(&self) -> String {
        match &self.other_name {
            Some(other) => format!("{} {} {}", self.first_name, other, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OLevelGrade {
    pub subject: String,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JambResult {
    pub reg_number: String,
    pub score: u16,
    pub result_file: Option<BlobRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OLevelResult {
    pub exam_number: String,
    pub subjects: Vec<OLevelGrade>,
    pub result_file: Option<BlobRef>,
}

/// Stored admission application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: ApplicantId,
    #[serde(flatten)]
    pub personal: PersonalDetails,
    pub intended_course: String,
    pub faculty: Option<FacultyId>,
    pub department: DepartmentId,
    pub passport: Option<BlobRef>,
    pub jamb: JambResult,
    pub olevel: OLevelResult,
    pub application_status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<ReviewerId>,
}

/// Decision written onto an applicant by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantReview {
    pub status: ApplicationStatus,
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_by: Option<ReviewerId>,
}

/// Raw text fields of the admission form, exactly as the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub intended_course: Option<String>,
    pub department: Option<String>,
    pub jamb_reg_number: Option<String>,
    pub jamb_score: Option<String>,
    pub olevel_exam_number: Option<String>,
    /// JSON array of `{subject, grade}` objects.
    pub olevel_subjects: Option<String>,
}

impl ApplicationForm {
    /// Build the form from multipart text fields. Accepts the camelCase names the web form
    /// posts as well as snake_case equivalents.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        let mut take = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| fields.remove(*name))
                .filter(|value| !value.trim().is_empty())
        };

        Self {
            first_name: take(&["firstName", "first_name"]),
            last_name: take(&["lastName", "last_name"]),
            other_name: take(&["otherName", "other_name"]),
            email: take(&["email"]),
            phone: take(&["phone"]),
            gender: take(&["gender"]),
            date_of_birth: take(&["dob", "dateOfBirth", "date_of_birth"]),
            address: take(&["address"]),
            intended_course: take(&["intendedCourse", "intended_course"]),
            department: take(&["department"]),
            jamb_reg_number: take(&["jambRegNumber", "jamb_reg_number"]),
            jamb_score: take(&["jambScore", "jamb_score"]),
            olevel_exam_number: take(&["oLevelExamNumber", "olevel_exam_number"]),
            olevel_subjects: take(&["oLevelSubjects", "olevel_subjects"]),
        }
    }
}

/// Upload slot on the admission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Passport,
    JambResult,
    OLevelResult,
}

impl DocumentKind {
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "passport" => Some(DocumentKind::Passport),
            "jamb" | "jambResult" | "jamb_result" => Some(DocumentKind::JambResult),
            "olevel" | "oLevelResult" | "olevel_result" => Some(DocumentKind::OLevelResult),
            _ => None,
        }
    }

    pub const fn bucket(self) -> &'static str {
        match self {
            DocumentKind::Passport => buckets::PASSPORTS,
            DocumentKind::JambResult => buckets::JAMB_RESULTS,
            DocumentKind::OLevelResult => buckets::OLEVEL_RESULTS,
        }
    }
}

/// Files attached to an admission form. Every slot is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDocuments {
    pub passport: Option<BlobUpload>,
    pub jamb_result: Option<BlobUpload>,
    pub olevel_result: Option<BlobUpload>,
}

impl ApplicationDocuments {
    /// Sort multipart files into their slots; unknown field names are ignored.
    pub fn from_files(files: BTreeMap<String, BlobUpload>) -> Self {
        let mut documents = Self::default();
        for (name, upload) in files {
            match DocumentKind::from_field(&name) {
                Some(kind) => *documents.slot_mut(kind) = Some(upload),
                None => tracing::debug!(field = %name, "ignoring unexpected upload field"),
            }
        }
        documents
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut Option<BlobUpload> {
        match kind {
            DocumentKind::Passport => &mut self.passport,
            DocumentKind::JambResult => &mut self.jamb_result,
            DocumentKind::OLevelResult => &mut self.olevel_result,
        }
    }

    pub(crate) fn into_slots(self) -> [(DocumentKind, Option<BlobUpload>); 3] {
        [
            (DocumentKind::Passport, self.passport),
            (DocumentKind::JambResult, self.jamb_result),
            (DocumentKind::OLevelResult, self.olevel_result),
        ]
    }
}
