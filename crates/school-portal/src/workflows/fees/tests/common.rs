use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::config::AdminConfig;
use crate::http::AdminGate;
use crate::ids::{ApplicantId, DepartmentId};
use crate::store::{BlobUpload, InMemoryBlobStore, InMemoryRecordStore};
use crate::workflows::academics::Semester;
use crate::workflows::admissions::{
    Applicant, ApplicationStatus, Gender, JambResult, OLevelResult, PersonalDetails,
};
use crate::workflows::fees::{Fee, FeeService, NewFee, PaymentSubmission};
use crate::workflows::students::{Student, StudentNumber, StudentRepository};

pub(super) const ADMIN_TOKEN: &str = "bursary-token";

pub(super) fn admin_gate() -> AdminGate {
    AdminGate::new(AdminConfig {
        email: "bursar@demo.com".to_string(),
        password: "bursar".to_string(),
        token: ADMIN_TOKEN.to_string(),
        reviewer: "bursary".to_string(),
    })
}

pub(super) type Service = FeeService<InMemoryRecordStore, InMemoryBlobStore>;

pub(super) struct Bursary {
    pub(super) service: Arc<Service>,
    pub(super) store: Arc<InMemoryRecordStore>,
    pub(super) blobs: Arc<InMemoryBlobStore>,
    pub(super) tuition: Fee,
    pub(super) paying: Student,
    pub(super) other: Student,
}

/// Two enrolled students and one tuition fee.
pub(super) fn bursary() -> Bursary {
    let store = Arc::new(InMemoryRecordStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new("http://portal.test"));
    let service = Arc::new(FeeService::new(store.clone(), blobs.clone()));

    let department = DepartmentId::new();
    let paying = store
        .insert_student(enrolled("Tunde", "tunde@example.com", department, 2101))
        .expect("student stored");
    let other = store
        .insert_student(enrolled("Ngozi", "ngozi@example.com", department, 2102))
        .expect("student stored");
    let tuition = service.create_fee(tuition()).expect("fee created");

    Bursary {
        service,
        store,
        blobs,
        tuition,
        paying,
        other,
    }
}

pub(super) fn tuition() -> NewFee {
    NewFee {
        title: "Tuition".to_string(),
        session: "2025/2026".to_string(),
        semester: Semester::Harmattan,
        amount: 150_000,
    }
}

fn enrolled(first_name: &str, email: &str, department: DepartmentId, serial: u16) -> Student {
    let applicant = Applicant {
        id: ApplicantId::new(),
        personal: PersonalDetails {
            first_name: first_name.to_string(),
            last_name: "Okafor".to_string(),
            other_name: None,
            email: email.to_string(),
            phone: "08095550000".to_string(),
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(2004, 1, 20).expect("valid date"),
            address: "2 Aba Road, Port Harcourt".to_string(),
        },
        intended_course: "Accounting".to_string(),
        faculty: None,
        department,
        passport: None,
        jamb: JambResult {
            reg_number: format!("JAMB-{serial}"),
            score: 230,
            result_file: None,
        },
        olevel: OLevelResult {
            exam_number: format!("NECO-{serial}"),
            subjects: Vec::new(),
            result_file: None,
        },
        application_status: ApplicationStatus::Accepted,
        submitted_at: Utc::now(),
        reviewed_at: Some(Utc::now()),
        reviewed_by: None,
    };
    Student::from_applicant(&applicant, StudentNumber::new(2025, serial), Utc::now())
}

pub(super) fn receipt() -> BlobUpload {
    BlobUpload {
        file_name: "teller.png".to_string(),
        content_type: None,
        bytes: b"bank teller scan".to_vec(),
    }
}

pub(super) fn submission(fee: &Fee) -> PaymentSubmission {
    PaymentSubmission {
        fee_id: Some(fee.id.to_string()),
        receipt: Some(receipt()),
    }
}
