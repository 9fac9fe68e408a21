use crate::infra::Portal;
use clap::Args;
use school_portal::config::PortalConfig;
use school_portal::error::AppError;
use school_portal::store::BlobUpload;
use school_portal::workflows::academics::{NewUnit, Semester};
use school_portal::workflows::admissions::{
    ApplicationDocuments, ApplicationForm, ReviewerId,
};
use school_portal::workflows::courses::{CourseFilter, Level, NewCourse};
use school_portal::workflows::fees::{NewFee, PaymentSubmission};

const APPLICANTS: [(&str, &str, &str); 3] = [
    ("Amaka", "Obi", "amaka.obi@example.com"),
    ("Tobi", "Adewale", "tobi.adewale@example.com"),
    ("Musa", "Ibrahim", "musa.ibrahim@example.com"),
];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Academic session the demo fee is billed for
    #[arg(long, default_value = "2025/2026")]
    pub(crate) session: String,
    /// Reject the last applicant instead of admitting them
    #[arg(long)]
    pub(crate) reject_last: bool,
    /// Skip printing the CSV roster at the end
    #[arg(long)]
    pub(crate) skip_roster: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        session,
        reject_last,
        skip_roster,
    } = args;

    let portal = Portal::in_memory(&PortalConfig::default());
    let registrar = ReviewerId("registrar".to_string());

    println!("School portal demo");
    let faculty = portal.academics.create_faculty(NewUnit {
        name: "Science".to_string(),
        code: "SCI".to_string(),
    })?;
    let department = portal.academics.add_department(
        &faculty.id,
        NewUnit {
            name: "Computer Science".to_string(),
            code: "CSC".to_string(),
        },
    )?;
    println!(
        "- Catalog: faculty {} with department {} ({})",
        faculty.name, department.name, department.code
    );

    let mut students = Vec::new();
    for (index, (first_name, last_name, email)) in APPLICANTS.iter().enumerate() {
        let applicant = portal.admissions.submit(
            demo_form(first_name, last_name, email, &department.id.to_string()),
            demo_documents(),
        )?;
        println!(
            "- Application from {} -> {}",
            applicant.personal.full_name(),
            applicant.application_status.label()
        );

        if reject_last && index + 1 == APPLICANTS.len() {
            let rejected = portal.admissions.reject(&applicant.id, &registrar)?;
            println!("  Rejected ({})", rejected.application_status.label());
            continue;
        }

        let student = portal.admissions.approve(&applicant.id, &registrar)?;
        println!(
            "  Admitted as {} (student record {})",
            student.student_number, student.id
        );
        students.push(student);
    }
    println!("- Documents stored: {}", portal.blobs.len());

    let mut course_ids = Vec::new();
    for (code, title, unit) in [
        ("CSC101", "Introduction to Computing", 3),
        ("MTH101", "Elementary Mathematics", 4),
        ("GST101", "Use of English", 2),
    ] {
        let course = portal.courses.create_course(NewCourse {
            title: title.to_string(),
            code: code.to_string(),
            department: department.id,
            semester: Semester::Harmattan,
            level: Level::L100,
            unit,
        })?;
        course_ids.push(course.id);
    }
    println!(
        "\nCourse registration (unit ceiling {})",
        portal.courses.max_unit_load()
    );
    for student in &students {
        let registered = portal
            .courses
            .register_courses(&student.id, course_ids.clone())?;
        println!(
            "- {} registered {} courses",
            registered.student_number,
            registered.courses.len()
        );
    }
    let offered = portal
        .courses
        .courses_for_department(&department.id, CourseFilter::default())?;
    for course in &offered {
        println!(
            "  {} {} ({} units): {} enrolled",
            course.code,
            course.title,
            course.unit,
            course.students.len()
        );
    }

    let fee = portal.fees.create_fee(NewFee {
        title: "School Fees".to_string(),
        session,
        semester: Semester::Harmattan,
        amount: 120_000,
    })?;
    println!(
        "\nFee {} for {} {}: NGN {}",
        fee.title, fee.session, fee.semester, fee.amount
    );

    if let Some(first) = students.first() {
        let payment = portal.fees.pay(&first.id, demo_payment(&fee.id.to_string()))?;
        let payment = portal.fees.verify(&payment.id, "verified")?;
        println!(
            "- {} paid, payment {}",
            first.student_number,
            payment.status.label()
        );
    }
    if let Some(second) = students.get(1) {
        let payment = portal.fees.pay(&second.id, demo_payment(&fee.id.to_string()))?;
        println!(
            "- {} submitted a receipt, payment {}",
            second.student_number,
            payment.status.label()
        );
    }

    let paid = portal.fees.paid_students(&fee.id)?;
    let unpaid = portal.fees.unpaid_students(&fee.id)?;
    println!("- {} paid | {} unpaid", paid.len(), unpaid.len());

    if !skip_roster {
        println!("\nRoster export");
        print!("{}", portal.fees.roster(&fee.id)?);
    }

    Ok(())
}

fn demo_form(first_name: &str, last_name: &str, email: &str, department: &str) -> ApplicationForm {
    ApplicationForm {
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        other_name: None,
        email: Some(email.to_string()),
        phone: Some("08030001234".to_string()),
        gender: Some("other".to_string()),
        date_of_birth: Some("2006-04-01".to_string()),
        address: Some("1 University Road, Nsukka".to_string()),
        intended_course: Some("Computer Science".to_string()),
        department: Some(department.to_string()),
        jamb_reg_number: Some(format!("JAMB-{}", first_name.to_ascii_uppercase())),
        jamb_score: Some("255".to_string()),
        olevel_exam_number: Some(format!("WAEC-{}", last_name.to_ascii_uppercase())),
        olevel_subjects: Some(
            r#"[{"subject":"Mathematics","grade":"B2"},{"subject":"English Language","grade":"C4"}]"#
                .to_string(),
        ),
    }
}

fn demo_documents() -> ApplicationDocuments {
    ApplicationDocuments {
        passport: Some(BlobUpload {
            file_name: "passport.jpg".to_string(),
            content_type: None,
            bytes: b"demo passport photo".to_vec(),
        }),
        jamb_result: None,
        olevel_result: None,
    }
}

fn demo_payment(fee_id: &str) -> PaymentSubmission {
    PaymentSubmission {
        fee_id: Some(fee_id.to_string()),
        receipt: Some(BlobUpload {
            file_name: "receipt.pdf".to_string(),
            content_type: None,
            bytes: b"demo bank receipt".to_vec(),
        }),
    }
}
