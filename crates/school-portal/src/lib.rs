//! School admission and student management: applicant intake and review, student records,
//! course registration, and the fee payment lifecycle, exposed as axum routers over pluggable
//! record and blob stores.

pub mod config;
pub mod error;
pub mod http;
pub mod ids;
pub mod store;
pub mod telemetry;
pub mod workflows;
