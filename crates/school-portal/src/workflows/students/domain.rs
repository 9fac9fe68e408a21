use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ids::{ApplicantId, CourseId, DepartmentId, FacultyId, PaymentId, StudentId};
use crate::store::BlobRef;
use crate::workflows::admissions::domain::{Applicant, JambResult, OLevelResult, PersonalDetails};

/// Printed student number, `STU/<year>/<serial>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentNumber(pub String);

impl StudentNumber {
    pub fn new(year: i32, serial: u16) -> Self {
        Self(format!("STU/{year}/{serial:04}"))
    }

    /// Split the number back into its year and serial, if it has the expected shape.
    pub fn parts(&self) -> Option<(i32, u16)> {
        let mut segments = self.0.split('/');
        let prefix = segments.next()?;
        let year = segments.next()?;
        let serial = segments.next()?;
        if prefix != "STU" || segments.next().is_some() {
            return None;
        }
        if year.len() != 4 || serial.len() != 4 {
            return None;
        }
        if !year.chars().chain(serial.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some((year.parse().ok()?, serial.parse().ok()?))
    }
}

impl fmt::Display for StudentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of student numbers for newly approved applicants.
pub trait StudentNumberIssuer: Send + Sync {
    fn issue(&self, year: i32) -> StudentNumber;
}

/// Draws a serial uniformly from 1000..=9999.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStudentNumbers;

impl StudentNumberIssuer for RandomStudentNumbers {
    fn issue(&self, year: i32) -> StudentNumber {
        let serial = rand::thread_rng().gen_range(1000..=9999);
        StudentNumber::new(year, serial)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Graduated,
    Inactive,
}

/// Enrolled student, created once from an accepted applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    #[serde(rename = "studentId")]
    pub student_number: StudentNumber,
    pub applicant_id: ApplicantId,
    #[serde(flatten)]
    pub personal: PersonalDetails,
    pub intended_course: String,
    pub faculty: Option<FacultyId>,
    pub department: DepartmentId,
    pub passport: Option<BlobRef>,
    pub jamb: JambResult,
    pub olevel: OLevelResult,
    pub status: StudentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub courses: Vec<CourseId>,
    pub payments: Vec<PaymentId>,
}

impl Student {
    /// Copy identity and documents from the applicant into a fresh, active student.
    pub fn from_applicant(
        applicant: &Applicant,
        student_number: StudentNumber,
        enrolled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StudentId::new(),
            student_number,
            applicant_id: applicant.id,
            personal: applicant.personal.clone(),
            intended_course: applicant.intended_course.clone(),
            faculty: applicant.faculty,
            department: applicant.department,
            passport: applicant.passport.clone(),
            jamb: applicant.jamb.clone(),
            olevel: applicant.olevel.clone(),
            status: StudentStatus::Active,
            enrolled_at,
            courses: Vec::new(),
            payments: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        self.personal.full_name()
    }
}

/// Body of the student login request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCredentials {
    pub email: String,
    #[serde(alias = "studentNumber")]
    pub student_id: String,
}
