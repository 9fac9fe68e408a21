use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::config::AdminConfig;
use crate::http::AdminGate;
use crate::ids::{ApplicantId, CourseId, DepartmentId, FacultyId, PaymentId, StudentId};
use crate::store::{BlobUpload, InMemoryBlobStore, InMemoryRecordStore, RepositoryError};
use crate::workflows::academics::{AcademicRepository, Department, Faculty};
use crate::workflows::admissions::{
    AdmissionService, Applicant, ApplicantRepository, ApplicantReview, ApplicationDocuments,
    ApplicationForm,
};
use crate::workflows::students::{Student, StudentNumber, StudentNumberIssuer, StudentRepository};

pub(super) const ADMIN_TOKEN: &str = "test-admin-token";

pub(super) fn admin_gate() -> AdminGate {
    AdminGate::new(AdminConfig {
        email: "admin@demo.com".to_string(),
        password: "admin".to_string(),
        token: ADMIN_TOKEN.to_string(),
        reviewer: "registrar".to_string(),
    })
}

/// Record store seeded with one faculty and one department.
pub(super) fn seeded_store() -> (Arc<InMemoryRecordStore>, Department) {
    let store = Arc::new(InMemoryRecordStore::new());
    let faculty = store
        .insert_faculty(Faculty {
            id: FacultyId::new(),
            name: "Science".to_string(),
            code: "SCI".to_string(),
            departments: Vec::new(),
            created_at: Utc::now(),
        })
        .expect("faculty stored");
    let department = store
        .insert_department(Department {
            id: DepartmentId::new(),
            name: "Computer Science".to_string(),
            code: "CSC".to_string(),
            faculty: Some(faculty.id),
            created_at: Utc::now(),
        })
        .expect("department stored");
    (store, department)
}

pub(super) fn form(department: &Department, email: &str) -> ApplicationForm {
    ApplicationForm {
        first_name: Some("Chiamaka".to_string()),
        last_name: Some("Eze".to_string()),
        other_name: None,
        email: Some(email.to_string()),
        phone: Some("08031234567".to_string()),
        gender: Some("female".to_string()),
        date_of_birth: Some("2006-05-17".to_string()),
        address: Some("4 Ogui Road, Enugu".to_string()),
        intended_course: Some("Computer Science".to_string()),
        department: Some(department.id.to_string()),
        jamb_reg_number: Some("JAMB2025-0099".to_string()),
        jamb_score: Some("287".to_string()),
        olevel_exam_number: Some("WAEC-4410021".to_string()),
        olevel_subjects: Some(
            r#"[{"subject":"Mathematics","grade":"a1"},{"subject":"English","grade":"B2"}]"#
                .to_string(),
        ),
    }
}

pub(super) fn upload(name: &str) -> BlobUpload {
    BlobUpload {
        file_name: name.to_string(),
        content_type: None,
        bytes: b"scanned document".to_vec(),
    }
}

pub(super) fn documents() -> ApplicationDocuments {
    ApplicationDocuments {
        passport: Some(upload("passport.jpg")),
        jamb_result: Some(upload("jamb.pdf")),
        olevel_result: Some(upload("waec.pdf")),
    }
}

pub(super) type Service = AdmissionService<InMemoryRecordStore, InMemoryBlobStore>;

pub(super) fn build_service() -> (
    Service,
    Arc<InMemoryRecordStore>,
    Arc<InMemoryBlobStore>,
    Department,
) {
    let (store, department) = seeded_store();
    let blobs = Arc::new(InMemoryBlobStore::new("http://portal.test"));
    let service = AdmissionService::new(store.clone(), blobs.clone());
    (service, store, blobs, department)
}

/// Issues the queued serials in order, then repeats the last one.
pub(super) struct ScriptedNumbers {
    serials: Mutex<VecDeque<u16>>,
    last: u16,
}

impl ScriptedNumbers {
    pub(super) fn new(serials: &[u16]) -> Self {
        Self {
            serials: Mutex::new(serials.iter().copied().collect()),
            last: serials.last().copied().unwrap_or(1000),
        }
    }
}

impl StudentNumberIssuer for ScriptedNumbers {
    fn issue(&self, year: i32) -> StudentNumber {
        let serial = self
            .serials
            .lock()
            .expect("serial mutex poisoned")
            .pop_front()
            .unwrap_or(self.last);
        StudentNumber::new(year, serial)
    }
}

/// Delegates to the in-memory store but fails every review write.
pub(super) struct ReviewOutageStore {
    pub(super) inner: InMemoryRecordStore,
}

impl AcademicRepository for ReviewOutageStore {
    fn insert_faculty(&self, faculty: Faculty) -> Result<Faculty, RepositoryError> {
        self.inner.insert_faculty(faculty)
    }

    fn fetch_faculty(&self, id: &FacultyId) -> Result<Option<Faculty>, RepositoryError> {
        self.inner.fetch_faculty(id)
    }

    fn list_faculties(&self) -> Result<Vec<Faculty>, RepositoryError> {
        self.inner.list_faculties()
    }

    fn insert_department(&self, department: Department) -> Result<Department, RepositoryError> {
        self.inner.insert_department(department)
    }

    fn fetch_department(&self, id: &DepartmentId) -> Result<Option<Department>, RepositoryError> {
        self.inner.fetch_department(id)
    }

    fn list_departments(&self) -> Result<Vec<Department>, RepositoryError> {
        self.inner.list_departments()
    }
}

impl ApplicantRepository for ReviewOutageStore {
    fn insert_applicant(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        self.inner.insert_applicant(applicant)
    }

    fn fetch_applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        self.inner.fetch_applicant(id)
    }

    fn applicant_by_email(&self, email: &str) -> Result<Option<Applicant>, RepositoryError> {
        self.inner.applicant_by_email(email)
    }

    fn list_applicants(&self) -> Result<Vec<Applicant>, RepositoryError> {
        self.inner.list_applicants()
    }

    fn review_applicant(
        &self,
        _id: &ApplicantId,
        _review: ApplicantReview,
    ) -> Result<Applicant, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl StudentRepository for ReviewOutageStore {
    fn insert_student(&self, student: Student) -> Result<Student, RepositoryError> {
        self.inner.insert_student(student)
    }

    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        self.inner.fetch_student(id)
    }

    fn student_for_applicant(&self, id: &ApplicantId) -> Result<Option<Student>, RepositoryError> {
        self.inner.student_for_applicant(id)
    }

    fn student_by_email(&self, email: &str) -> Result<Option<Student>, RepositoryError> {
        self.inner.student_by_email(email)
    }

    fn list_students(&self) -> Result<Vec<Student>, RepositoryError> {
        self.inner.list_students()
    }

    fn remove_student(&self, id: &StudentId) -> Result<(), RepositoryError> {
        self.inner.remove_student(id)
    }

    fn set_student_courses(
        &self,
        id: &StudentId,
        courses: Vec<CourseId>,
    ) -> Result<Student, RepositoryError> {
        self.inner.set_student_courses(id, courses)
    }

    fn push_student_payment(
        &self,
        id: &StudentId,
        payment: PaymentId,
    ) -> Result<Student, RepositoryError> {
        self.inner.push_student_payment(id, payment)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
}

pub(super) const BOUNDARY: &str = "portal-test-boundary";

/// Hand-assembled multipart body with text fields and `(field, file name, bytes)` files.
pub(super) fn multipart_body(fields: &[(&str, String)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn form_fields(department: &Department, email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("firstName", "Chiamaka".to_string()),
        ("lastName", "Eze".to_string()),
        ("email", email.to_string()),
        ("phone", "08031234567".to_string()),
        ("gender", "female".to_string()),
        ("dob", "2006-05-17".to_string()),
        ("address", "4 Ogui Road, Enugu".to_string()),
        ("intendedCourse", "Computer Science".to_string()),
        ("department", department.id.to_string()),
        ("jambRegNumber", "JAMB2025-0099".to_string()),
        ("jambScore", "287".to_string()),
        ("oLevelExamNumber", "WAEC-4410021".to_string()),
        (
            "oLevelSubjects",
            r#"[{"subject":"Mathematics","grade":"A1"}]"#.to_string(),
        ),
    ]
}
