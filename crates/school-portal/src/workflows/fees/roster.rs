use std::collections::HashMap;

use serde::Serialize;

use super::domain::{Fee, Payment};
use crate::ids::StudentId;
use crate::workflows::students::Student;

const ROSTER_HEADERS: [&str; 6] = [
    "Student Number",
    "Name",
    "Department",
    "Fee",
    "Status",
    "Paid At",
];

#[derive(Debug, Serialize)]
struct RosterRow<'a> {
    student_number: &'a str,
    name: String,
    department: String,
    fee: &'a str,
    status: &'static str,
    paid_at: String,
}

/// Render one CSV row per student with their payment state for `fee`.
///
/// Only active payments count; a student whose sole payment was rejected is listed as unpaid.
pub fn render_roster(
    fee: &Fee,
    students: &[Student],
    payments: &[Payment],
) -> Result<String, csv::Error> {
    let active: HashMap<StudentId, &Payment> = payments
        .iter()
        .filter(|payment| payment.fee == fee.id && payment.status.is_active())
        .map(|payment| (payment.student, payment))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(ROSTER_HEADERS)?;
    for student in students {
        let payment = active.get(&student.id);
        writer.serialize(RosterRow {
            student_number: &student.student_number.0,
            name: student.full_name(),
            department: student.department.to_string(),
            fee: &fee.title,
            status: payment.map_or("unpaid", |payment| payment.status.label()),
            paid_at: payment
                .map(|payment| payment.created_at.to_rfc3339())
                .unwrap_or_default(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}
