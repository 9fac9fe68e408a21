use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, DepartmentId, StudentId};
use crate::workflows::academics::Semester;

pub const MIN_COURSE_UNIT: u8 = 1;
pub const MAX_COURSE_UNIT: u8 = 12;

/// Year of study a course is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "100")]
    L100,
    #[serde(rename = "200")]
    L200,
    #[serde(rename = "300")]
    L300,
    #[serde(rename = "400")]
    L400,
}

impl Level {
    pub const fn label(self) -> &'static str {
        match self {
            Level::L100 => "100",
            Level::L200 => "200",
            Level::L300 => "300",
            Level::L400 => "400",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub code: String,
    pub department: DepartmentId,
    pub semester: Semester,
    pub level: Level,
    pub unit: u8,
    /// Enrolled students. A set, so re-registration never duplicates an entry.
    pub students: BTreeSet<StudentId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub code: String,
    pub department: DepartmentId,
    pub semester: Semester,
    pub level: Level,
    pub unit: u8,
}

/// Optional filters of the department course listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CourseFilter {
    pub level: Option<Level>,
    pub semester: Option<Semester>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        self.level.map_or(true, |level| course.level == level)
            && self.semester.map_or(true, |semester| course.semester == semester)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSelection {
    pub course_ids: Vec<CourseId>,
}
