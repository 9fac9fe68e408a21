//! Course catalog and student course registration.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Course, CourseFilter, CourseSelection, Level, NewCourse, MAX_COURSE_UNIT, MIN_COURSE_UNIT,
};
pub use repository::CourseRepository;
pub use router::courses_router;
pub use service::{CourseService, CourseServiceError};
