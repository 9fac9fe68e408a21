use chrono::NaiveDate;

use super::domain::{ApplicationForm, Gender, OLevelGrade, PersonalDetails};
use crate::ids::DepartmentId;

/// Validation errors raised while turning a form into an application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("date of birth must be formatted YYYY-MM-DD (found '{0}')")]
    InvalidDateOfBirth(String),
    #[error("date of birth must be in the past")]
    FutureDateOfBirth,
    #[error("gender must be male, female, or other (found '{0}')")]
    InvalidGender(String),
    #[error("JAMB score must be a whole number between 0 and {max} (found '{found}')")]
    InvalidJambScore { max: u16, found: String },
    #[error("O-Level subjects could not be parsed: {0}")]
    MalformedSubjects(String),
    #[error("every O-Level subject needs a subject name and a grade")]
    IncompleteSubject,
    #[error("department reference '{0}' is not a valid id")]
    InvalidDepartment(String),
    #[error("department {0} does not exist")]
    UnknownDepartment(DepartmentId),
}

const DEFAULT_MAX_JAMB_SCORE: u16 = 400;

/// Form contents after every field has been checked and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedApplication {
    pub personal: PersonalDetails,
    pub intended_course: String,
    pub department: DepartmentId,
    pub jamb_reg_number: String,
    pub jamb_score: u16,
    pub olevel_exam_number: String,
    pub olevel_subjects: Vec<OLevelGrade>,
}

/// Guard responsible for producing `ValidatedApplication` instances.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    max_jamb_score: u16,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self {
            max_jamb_score: DEFAULT_MAX_JAMB_SCORE,
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, IntakeViolation> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .ok_or(IntakeViolation::MissingField(field))
}

/// Lowercase and trim an address so lookups and the unique index agree.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

impl IntakeGuard {
    /// Check a submitted form. `today` bounds the date of birth.
    pub fn validate(
        &self,
        form: ApplicationForm,
        today: NaiveDate,
    ) -> Result<ValidatedApplication, IntakeViolation> {
        let first_name = required(form.first_name, "first name")?;
        let last_name = required(form.last_name, "last name")?;
        let other_name = form
            .other_name
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty());

        let email = normalize_email(&required(form.email, "email")?);
        if !plausible_email(&email) {
            return Err(IntakeViolation::InvalidEmail(email));
        }

        let phone = required(form.phone, "phone")?;
        let gender_raw = required(form.gender, "gender")?;
        let gender = gender_raw
            .parse::<Gender>()
            .map_err(IntakeViolation::InvalidGender)?;

        let dob_raw = required(form.date_of_birth, "date of birth")?;
        let date_of_birth = NaiveDate::parse_from_str(&dob_raw, "%Y-%m-%d")
            .map_err(|_| IntakeViolation::InvalidDateOfBirth(dob_raw.clone()))?;
        if date_of_birth >= today {
            return Err(IntakeViolation::FutureDateOfBirth);
        }

        let address = required(form.address, "address")?;
        let intended_course = required(form.intended_course, "intended course")?;

        let department_raw = required(form.department, "department")?;
        let department = department_raw
            .parse::<DepartmentId>()
            .map_err(|_| IntakeViolation::InvalidDepartment(department_raw.clone()))?;

        let jamb_reg_number = required(form.jamb_reg_number, "JAMB registration number")?;
        let score_raw = required(form.jamb_score, "JAMB score")?;
        let jamb_score = score_raw
            .parse::<u16>()
            .ok()
            .filter(|score| *score <= self.max_jamb_score)
            .ok_or_else(|| IntakeViolation::InvalidJambScore {
                max: self.max_jamb_score,
                found: score_raw.clone(),
            })?;

        let olevel_exam_number = required(form.olevel_exam_number, "O-Level exam number")?;
        let olevel_subjects = match form.olevel_subjects {
            Some(raw) => parse_subjects(&raw)?,
            None => Vec::new(),
        };

        Ok(ValidatedApplication {
            personal: PersonalDetails {
                first_name,
                last_name,
                other_name,
                email,
                phone,
                gender,
                date_of_birth,
                address,
            },
            intended_course,
            department,
            jamb_reg_number,
            jamb_score,
            olevel_exam_number,
            olevel_subjects,
        })
    }
}

fn parse_subjects(raw: &str) -> Result<Vec<OLevelGrade>, IntakeViolation> {
    let parsed: Vec<OLevelGrade> = serde_json::from_str(raw)
        .map_err(|err| IntakeViolation::MalformedSubjects(err.to_string()))?;

    parsed
        .into_iter()
        .map(|entry| {
            let subject = entry.subject.trim().to_string();
            let grade = entry.grade.trim().to_ascii_uppercase();
            if subject.is_empty() || grade.is_empty() {
                Err(IntakeViolation::IncompleteSubject)
            } else {
                Ok(OLevelGrade { subject, grade })
            }
        })
        .collect()
}
