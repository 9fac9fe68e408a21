//! Record identifiers shared across the portal workflows.
//!
//! Every record is keyed by a random UUID, serialized as its hyphenated string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(raw.trim()).map(Self)
            }
        }
    };
}

record_id!(
    /// Faculty (school) grouping several departments.
    FacultyId
);
record_id!(DepartmentId);
record_id!(
    /// Admission application submitted through the public form.
    ApplicantId
);
record_id!(
    /// Storage key of an enrolled student. Distinct from the printed student number.
    StudentId
);
record_id!(FeeId);
record_id!(PaymentId);
record_id!(CourseId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_their_string_form() {
        let id = StudentId::new();
        let parsed: StudentId = id.to_string().parse().expect("uuid parses");
        assert_eq!(parsed, id);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = FeeId::new();
        let json = serde_json::to_value(id).expect("serializes");
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!("not-a-uuid".parse::<CourseId>().is_err());
    }
}
