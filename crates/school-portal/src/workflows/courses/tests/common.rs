use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::config::AdminConfig;
use crate::http::AdminGate;
use crate::ids::{ApplicantId, DepartmentId};
use crate::store::InMemoryRecordStore;
use crate::workflows::academics::{AcademicRepository, Department, Semester};
use crate::workflows::admissions::{
    Applicant, ApplicationStatus, Gender, JambResult, OLevelResult, PersonalDetails,
};
use crate::workflows::courses::{Course, CourseService, Level, NewCourse};
use crate::workflows::students::{Student, StudentNumber, StudentRepository};

pub(super) const ADMIN_TOKEN: &str = "course-admin-token";
pub(super) const MAX_UNITS: u16 = 24;

pub(super) fn admin_gate() -> AdminGate {
    AdminGate::new(AdminConfig {
        email: "admin@demo.com".to_string(),
        password: "admin".to_string(),
        token: ADMIN_TOKEN.to_string(),
        reviewer: "registrar".to_string(),
    })
}

pub(super) struct Fixture {
    pub(super) service: Arc<CourseService<InMemoryRecordStore>>,
    pub(super) store: Arc<InMemoryRecordStore>,
    pub(super) department: Department,
    pub(super) student: Student,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(InMemoryRecordStore::new());
    let department = store
        .insert_department(Department {
            id: DepartmentId::new(),
            name: "Computer Science".to_string(),
            code: "CSC".to_string(),
            faculty: None,
            created_at: Utc::now(),
        })
        .expect("department stored");
    let student = store
        .insert_student(student_in(&department, "kemi@example.com", 1201))
        .expect("student stored");
    let service = Arc::new(CourseService::new(store.clone(), MAX_UNITS));
    Fixture {
        service,
        store,
        department,
        student,
    }
}

pub(super) fn student_in(department: &Department, email: &str, serial: u16) -> Student {
    let applicant = Applicant {
        id: ApplicantId::new(),
        personal: PersonalDetails {
            first_name: "Kemi".to_string(),
            last_name: "Adeyemi".to_string(),
            other_name: None,
            email: email.to_string(),
            phone: "08021112222".to_string(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(2005, 9, 2).expect("valid date"),
            address: "7 Ring Road, Ibadan".to_string(),
        },
        intended_course: "Computer Science".to_string(),
        faculty: None,
        department: department.id,
        passport: None,
        jamb: JambResult {
            reg_number: "JAMB-7781".to_string(),
            score: 251,
            result_file: None,
        },
        olevel: OLevelResult {
            exam_number: "WAEC-7781".to_string(),
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

pub(super) fn new_course(department: &Department, code: &str, unit: u8) -> NewCourse {
    NewCourse {
        title: format!("Course {code}"),
        code: code.to_string(),
        department: department.id,
        semester: Semester::Harmattan,
        level: Level::L100,
        unit,
    }
}

pub(super) fn course(fixture: &Fixture, code: &str, unit: u8) -> Course {
    fixture
        .service
        .create_course(new_course(&fixture.department, code, unit))
        .expect("course created")
}
