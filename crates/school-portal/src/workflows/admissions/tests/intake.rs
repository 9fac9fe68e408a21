use chrono::NaiveDate;

use super::common::*;
use crate::workflows::admissions::{Gender, IntakeGuard, IntakeViolation, OLevelGrade};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
}

#[test]
fn valid_form_is_normalized() {
    let (_, department) = seeded_store();
    let mut form = form(&department, "  Chiamaka.Eze@Example.COM ");
    form.other_name = Some("   ".to_string());

    let application = IntakeGuard::default()
        .validate(form, today())
        .expect("form is valid");

    assert_eq!(application.personal.email, "chiamaka.eze@example.com");
    assert_eq!(application.personal.other_name, None);
    assert_eq!(application.personal.gender, Gender::Female);
    assert_eq!(application.department, department.id);
    assert_eq!(application.jamb_score, 287);
    assert_eq!(
        application.olevel_subjects,
        vec![
            OLevelGrade {
                subject: "Mathematics".to_string(),
                grade: "A1".to_string(),
            },
            OLevelGrade {
                subject: "English".to_string(),
                grade: "B2".to_string(),
            },
        ]
    );
}

#[test]
fn missing_required_fields_are_named() {
    let (_, department) = seeded_store();
    let mut form = form(&department, "a@example.com");
    form.phone = None;

    assert_eq!(
        IntakeGuard::default().validate(form, today()),
        Err(IntakeViolation::MissingField("phone"))
    );
}

#[test]
fn malformed_email_is_rejected() {
    let (_, department) = seeded_store();
    let result = IntakeGuard::default().validate(form(&department, "not-an-email"), today());
    assert!(matches!(result, Err(IntakeViolation::InvalidEmail(_))));
}

#[test]
fn date_of_birth_must_parse_and_be_in_the_past() {
    let (_, department) = seeded_store();
    let guard = IntakeGuard::default();

    let mut garbled = form(&department, "a@example.com");
    garbled.date_of_birth = Some("17/05/2006".to_string());
    assert!(matches!(
        guard.validate(garbled, today()),
        Err(IntakeViolation::InvalidDateOfBirth(_))
    ));

    let mut future = form(&department, "a@example.com");
    future.date_of_birth = Some("2030-01-01".to_string());
    assert_eq!(
        guard.validate(future, today()),
        Err(IntakeViolation::FutureDateOfBirth)
    );
}

#[test]
fn jamb_score_is_bounded() {
    let (_, department) = seeded_store();
    let guard = IntakeGuard::default();

    for raw in ["401", "-3", "two hundred"] {
        let mut form = form(&department, "a@example.com");
        form.jamb_score = Some(raw.to_string());
        assert!(
            matches!(
                guard.validate(form, today()),
                Err(IntakeViolation::InvalidJambScore { max: 400, .. })
            ),
            "{raw} should be rejected"
        );
    }

    let mut edge = form(&department, "a@example.com");
    edge.jamb_score = Some("400".to_string());
    assert!(guard.validate(edge, today()).is_ok());
}

#[test]
fn olevel_subjects_must_be_valid_json() {
    let (_, department) = seeded_store();
    let guard = IntakeGuard::default();

    let mut malformed = form(&department, "a@example.com");
    malformed.olevel_subjects = Some("Mathematics: A1".to_string());
    assert!(matches!(
        guard.validate(malformed, today()),
        Err(IntakeViolation::MalformedSubjects(_))
    ));

    let mut blank_grade = form(&department, "a@example.com");
    blank_grade.olevel_subjects = Some(r#"[{"subject":"Physics","grade":" "}]"#.to_string());
    assert_eq!(
        guard.validate(blank_grade, today()),
        Err(IntakeViolation::IncompleteSubject)
    );
}

#[test]
fn department_reference_must_be_an_id() {
    let (_, department) = seeded_store();
    let mut form = form(&department, "a@example.com");
    form.department = Some("computer-science".to_string());
    assert_eq!(
        IntakeGuard::default().validate(form, today()),
        Err(IntakeViolation::InvalidDepartment(
            "computer-science".to_string()
        ))
    );
}
