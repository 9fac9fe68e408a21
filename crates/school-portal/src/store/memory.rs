use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::{RepositoryError, UniqueKey};
use crate::ids::{ApplicantId, CourseId, DepartmentId, FacultyId, FeeId, PaymentId, StudentId};
use crate::workflows::academics::{AcademicRepository, Department, Faculty, Semester};
use crate::workflows::admissions::{Applicant, ApplicantRepository, ApplicantReview};
use crate::workflows::courses::{Course, CourseFilter, CourseRepository};
use crate::workflows::fees::{
    Fee, FeeRepository, Payment, PaymentDecision, PaymentRepository, PaymentStatus,
};
use crate::workflows::students::{Student, StudentNumber, StudentRepository};

/// Record paired with its insertion sequence so listings can be ordered newest first.
#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    record: T,
}

#[derive(Debug)]
struct Table<K, T> {
    rows: HashMap<K, Row<T>>,
}

impl<K, T> Default for Table<K, T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, T: Clone> Table<K, T> {
    fn get(&self, key: &K) -> Option<T> {
        self.rows.get(key).map(|row| row.record.clone())
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut T> {
        self.rows.get_mut(key).map(|row| &mut row.record)
    }

    fn insert(&mut self, seq: u64, key: K, record: T) {
        self.rows.insert(key, Row { seq, record });
    }

    fn remove(&mut self, key: &K) -> Option<T> {
        self.rows.remove(key).map(|row| row.record)
    }

    fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Records matching `keep`, newest first.
    fn newest_first(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<&Row<T>> = self.rows.values().filter(|row| keep(&row.record)).collect();
        rows.sort_by(|a, b| b.seq.cmp(&a.seq));
        rows.into_iter().map(|row| row.record.clone()).collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    seq: u64,
    faculties: Table<FacultyId, Faculty>,
    departments: Table<DepartmentId, Department>,
    applicants: Table<ApplicantId, Applicant>,
    students: Table<StudentId, Student>,
    courses: Table<CourseId, Course>,
    fees: Table<FeeId, Fee>,
    payments: Table<PaymentId, Payment>,
    faculty_codes: HashMap<String, FacultyId>,
    department_codes: HashMap<String, DepartmentId>,
    applicant_emails: HashMap<String, ApplicantId>,
    student_emails: HashMap<String, StudentId>,
    student_numbers: HashMap<StudentNumber, StudentId>,
    student_applicants: HashMap<ApplicantId, StudentId>,
    course_codes: HashMap<String, CourseId>,
    fee_schedules: HashMap<(String, String, Semester), FeeId>,
    active_payments: HashMap<(StudentId, FeeId), PaymentId>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn fee_key(fee: &Fee) -> (String, String, Semester) {
    (
        fee.title.trim().to_lowercase(),
        fee.session.trim().to_string(),
        fee.semester,
    )
}

/// Process-local record store backing every workflow repository.
///
/// All tables share one mutex, so each unique-key check or conditional transition is atomic
/// with the write it guards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(
        &self,
        op: impl FnOnce(&mut Tables) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut tables = self.tables.lock().map_err(|_| RepositoryError::poisoned())?;
        op(&mut *tables)
    }
}

impl AcademicRepository for InMemoryRecordStore {
    fn insert_faculty(&self, faculty: Faculty) -> Result<Faculty, RepositoryError> {
        self.with(|tables| {
            if tables.faculty_codes.contains_key(&faculty.code) {
                return Err(RepositoryError::Conflict(UniqueKey::FacultyCode));
            }
            let seq = tables.next_seq();
            tables.faculty_codes.insert(faculty.code.clone(), faculty.id);
            tables.faculties.insert(seq, faculty.id, faculty.clone());
            Ok(faculty)
        })
    }

    fn fetch_faculty(&self, id: &FacultyId) -> Result<Option<Faculty>, RepositoryError> {
        self.with(|tables| Ok(tables.faculties.get(id)))
    }

    fn list_faculties(&self) -> Result<Vec<Faculty>, RepositoryError> {
        self.with(|tables| Ok(tables.faculties.newest_first(|_| true)))
    }

    fn insert_department(&self, department: Department) -> Result<Department, RepositoryError> {
        self.with(|tables| {
            if let Some(faculty) = &department.faculty {
                if !tables.faculties.contains(faculty) {
                    return Err(RepositoryError::NotFound);
                }
            }
            if tables.department_codes.contains_key(&department.code) {
                return Err(RepositoryError::Conflict(UniqueKey::DepartmentCode));
            }

            let seq = tables.next_seq();
            tables
                .department_codes
                .insert(department.code.clone(), department.id);
            tables
                .departments
                .insert(seq, department.id, department.clone());
            if let Some(faculty) = department
                .faculty
                .and_then(|id| tables.faculties.get_mut(&id))
            {
                faculty.departments.push(department.id);
            }
            Ok(department)
        })
    }

    fn fetch_department(&self, id: &DepartmentId) -> Result<Option<Department>, RepositoryError> {
        self.with(|tables| Ok(tables.departments.get(id)))
    }

    fn list_departments(&self) -> Result<Vec<Department>, RepositoryError> {
        self.with(|tables| Ok(tables.departments.newest_first(|_| true)))
    }
}

impl ApplicantRepository for InMemoryRecordStore {
    fn insert_applicant(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        self.with(|tables| {
            let email = email_key(&applicant.personal.email);
            if tables.applicant_emails.contains_key(&email) {
                return Err(RepositoryError::Conflict(UniqueKey::ApplicantEmail));
            }
            let seq = tables.next_seq();
            tables.applicant_emails.insert(email, applicant.id);
            tables.applicants.insert(seq, applicant.id, applicant.clone());
            Ok(applicant)
        })
    }

    fn fetch_applicant(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        self.with(|tables| Ok(tables.applicants.get(id)))
    }

    fn applicant_by_email(&self, email: &str) -> Result<Option<Applicant>, RepositoryError> {
        self.with(|tables| {
            Ok(tables
                .applicant_emails
                .get(&email_key(email))
                .and_then(|id| tables.applicants.get(id)))
        })
    }

    fn list_applicants(&self) -> Result<Vec<Applicant>, RepositoryError> {
        self.with(|tables| Ok(tables.applicants.newest_first(|_| true)))
    }

    fn review_applicant(
        &self,
        id: &ApplicantId,
        review: ApplicantReview,
    ) -> Result<Applicant, RepositoryError> {
        self.with(|tables| {
            let applicant = tables
                .applicants
                .get_mut(id)
                .ok_or(RepositoryError::NotFound)?;
            let current = applicant.application_status;
            if current == review.status {
                return Ok(applicant.clone());
            }
            if !current.permits(review.status) {
                return Err(RepositoryError::InvalidTransition {
                    from: current.label(),
                    to: review.status.label(),
                });
            }
            applicant.application_status = review.status;
            applicant.reviewed_at = Some(review.reviewed_at);
            applicant.reviewed_by = review.reviewed_by;
            Ok(applicant.clone())
        })
    }
}

impl StudentRepository for InMemoryRecordStore {
    fn insert_student(&self, student: Student) -> Result<Student, RepositoryError> {
        self.with(|tables| {
            let email = email_key(&student.personal.email);
            if tables.student_applicants.contains_key(&student.applicant_id) {
                return Err(RepositoryError::Conflict(UniqueKey::StudentApplicant));
            }
            if tables.student_emails.contains_key(&email) {
                return Err(RepositoryError::Conflict(UniqueKey::StudentEmail));
            }
            if tables.student_numbers.contains_key(&student.student_number) {
                return Err(RepositoryError::Conflict(UniqueKey::StudentNumber));
            }

            let seq = tables.next_seq();
            tables
                .student_applicants
                .insert(student.applicant_id, student.id);
            tables.student_emails.insert(email, student.id);
            tables
                .student_numbers
                .insert(student.student_number.clone(), student.id);
            tables.students.insert(seq, student.id, student.clone());
            Ok(student)
        })
    }

    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        self.with(|tables| Ok(tables.students.get(id)))
    }

    fn student_for_applicant(&self, id: &ApplicantId) -> Result<Option<Student>, RepositoryError> {
        self.with(|tables| {
            Ok(tables
                .student_applicants
                .get(id)
                .and_then(|student| tables.students.get(student)))
        })
    }

    fn student_by_email(&self, email: &str) -> Result<Option<Student>, RepositoryError> {
        self.with(|tables| {
            Ok(tables
                .student_emails
                .get(&email_key(email))
                .and_then(|id| tables.students.get(id)))
        })
    }

    fn list_students(&self) -> Result<Vec<Student>, RepositoryError> {
        self.with(|tables| Ok(tables.students.newest_first(|_| true)))
    }

    fn remove_student(&self, id: &StudentId) -> Result<(), RepositoryError> {
        self.with(|tables| {
            let student = tables.students.remove(id).ok_or(RepositoryError::NotFound)?;
            tables.student_applicants.remove(&student.applicant_id);
            tables
                .student_emails
                .remove(&email_key(&student.personal.email));
            tables.student_numbers.remove(&student.student_number);
            Ok(())
        })
    }

    fn set_student_courses(
        &self,
        id: &StudentId,
        courses: Vec<CourseId>,
    ) -> Result<Student, RepositoryError> {
        self.with(|tables| {
            let student = tables.students.get_mut(id).ok_or(RepositoryError::NotFound)?;
            student.courses = courses;
            Ok(student.clone())
        })
    }

    fn push_student_payment(
        &self,
        id: &StudentId,
        payment: PaymentId,
    ) -> Result<Student, RepositoryError> {
        self.with(|tables| {
            let student = tables.students.get_mut(id).ok_or(RepositoryError::NotFound)?;
            if !student.payments.contains(&payment) {
                student.payments.push(payment);
            }
            Ok(student.clone())
        })
    }
}

impl CourseRepository for InMemoryRecordStore {
    fn insert_course(&self, course: Course) -> Result<Course, RepositoryError> {
        self.with(|tables| {
            if tables.course_codes.contains_key(&course.code) {
                return Err(RepositoryError::Conflict(UniqueKey::CourseCode));
            }
            let seq = tables.next_seq();
            tables.course_codes.insert(course.code.clone(), course.id);
            tables.courses.insert(seq, course.id, course.clone());
            Ok(course)
        })
    }

    fn fetch_course(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        self.with(|tables| Ok(tables.courses.get(id)))
    }

    fn courses_for_department(
        &self,
        department: &DepartmentId,
        filter: CourseFilter,
    ) -> Result<Vec<Course>, RepositoryError> {
        self.with(|tables| {
            let mut courses = tables
                .courses
                .newest_first(|course| course.department == *department && filter.matches(course));
            courses.sort_by(|a, b| a.code.cmp(&b.code));
            Ok(courses)
        })
    }

    fn enroll_student(&self, course: &CourseId, student: &StudentId) -> Result<(), RepositoryError> {
        self.with(|tables| {
            let course = tables.courses.get_mut(course).ok_or(RepositoryError::NotFound)?;
            course.students.insert(*student);
            Ok(())
        })
    }

    fn withdraw_student(
        &self,
        course: &CourseId,
        student: &StudentId,
    ) -> Result<(), RepositoryError> {
        self.with(|tables| {
            let course = tables.courses.get_mut(course).ok_or(RepositoryError::NotFound)?;
            course.students.remove(student);
            Ok(())
        })
    }
}

impl FeeRepository for InMemoryRecordStore {
    fn insert_fee(&self, fee: Fee) -> Result<Fee, RepositoryError> {
        self.with(|tables| {
            let key = fee_key(&fee);
            if tables.fee_schedules.contains_key(&key) {
                return Err(RepositoryError::Conflict(UniqueKey::FeeSchedule));
            }
            let seq = tables.next_seq();
            tables.fee_schedules.insert(key, fee.id);
            tables.fees.insert(seq, fee.id, fee.clone());
            Ok(fee)
        })
    }

    fn fetch_fee(&self, id: &FeeId) -> Result<Option<Fee>, RepositoryError> {
        self.with(|tables| Ok(tables.fees.get(id)))
    }

    fn list_fees(&self) -> Result<Vec<Fee>, RepositoryError> {
        self.with(|tables| Ok(tables.fees.newest_first(|_| true)))
    }
}

impl PaymentRepository for InMemoryRecordStore {
    fn insert_payment(&self, payment: Payment) -> Result<Payment, RepositoryError> {
        self.with(|tables| {
            let slot = (payment.student, payment.fee);
            if payment.status.is_active() {
                if tables.active_payments.contains_key(&slot) {
                    return Err(RepositoryError::Conflict(UniqueKey::ActivePayment));
                }
                tables.active_payments.insert(slot, payment.id);
            }
            let seq = tables.next_seq();
            tables.payments.insert(seq, payment.id, payment.clone());
            Ok(payment)
        })
    }

    fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError> {
        self.with(|tables| Ok(tables.payments.get(id)))
    }

    fn list_payments(&self) -> Result<Vec<Payment>, RepositoryError> {
        self.with(|tables| Ok(tables.payments.newest_first(|_| true)))
    }

    fn payments_for_student(&self, student: &StudentId) -> Result<Vec<Payment>, RepositoryError> {
        self.with(|tables| {
            Ok(tables
                .payments
                .newest_first(|payment| payment.student == *student))
        })
    }

    fn payments_for_fee(&self, fee: &FeeId) -> Result<Vec<Payment>, RepositoryError> {
        self.with(|tables| Ok(tables.payments.newest_first(|payment| payment.fee == *fee)))
    }

    fn settle_payment(
        &self,
        id: &PaymentId,
        decision: PaymentDecision,
        at: DateTime<Utc>,
    ) -> Result<Payment, RepositoryError> {
        self.with(|tables| {
            let payment = tables.payments.get_mut(id).ok_or(RepositoryError::NotFound)?;
            if payment.status != PaymentStatus::Pending {
                return Err(RepositoryError::InvalidTransition {
                    from: payment.status.label(),
                    to: decision.status().label(),
                });
            }
            payment.status = decision.status();
            payment.reviewed_at = Some(at);
            let settled = payment.clone();

            if !settled.status.is_active() {
                let slot = (settled.student, settled.fee);
                if tables.active_payments.get(&slot) == Some(&settled.id) {
                    tables.active_payments.remove(&slot);
                }
            }
            Ok(settled)
        })
    }

    fn active_payment(
        &self,
        student: &StudentId,
        fee: &FeeId,
    ) -> Result<Option<Payment>, RepositoryError> {
        self.with(|tables| {
            Ok(tables
                .active_payments
                .get(&(*student, *fee))
                .and_then(|id| tables.payments.get(id)))
        })
    }

    fn discard_payment(&self, id: &PaymentId) -> Result<(), RepositoryError> {
        self.with(|tables| {
            let payment = tables.payments.remove(id).ok_or(RepositoryError::NotFound)?;
            let slot = (payment.student, payment.fee);
            if tables.active_payments.get(&slot) == Some(&payment.id) {
                tables.active_payments.remove(&slot);
            }
            Ok(())
        })
    }
}
