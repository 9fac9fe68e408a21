use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DepartmentId, FacultyId};

/// Teaching half-year used by both the fee catalog and course catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Semester {
    Harmattan,
    Rain,
}

impl Semester {
    pub const fn label(self) -> &'static str {
        match self {
            Semester::Harmattan => "Harmattan",
            Semester::Rain => "Rain",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Semester {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "harmattan" | "first" => Ok(Semester::Harmattan),
            "rain" | "second" => Ok(Semester::Rain),
            other => Err(format!("unknown semester '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub code: String,
    pub departments: Vec<DepartmentId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
    pub faculty: Option<FacultyId>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a faculty or a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUnit {
    pub name: String,
    pub code: String,
}

/// Standalone department creation, optionally attached to a faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub faculty: Option<FacultyId>,
}

/// Departments of one faculty, as returned by the faculty lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDepartments {
    pub faculty: String,
    pub departments: Vec<Department>,
}

/// Trim the name and uppercase the code, rejecting blanks.
pub(crate) fn normalize_unit(name: &str, code: &str) -> Result<(String, String), &'static str> {
    let name = name.trim();
    let code = code.trim();
    if name.is_empty() {
        return Err("name");
    }
    if code.is_empty() {
        return Err("code");
    }
    Ok((name.to_string(), code.to_ascii_uppercase()))
}
