pub mod academics;
pub mod admissions;
pub mod courses;
pub mod fees;
pub mod students;
