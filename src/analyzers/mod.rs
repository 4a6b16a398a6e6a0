//! Ranking and report assembly.
//!
//! Validated readings are ranked against each other (percentile plus a
//! kernel density curve), sorted into best/worst lists, colored by severity
//! and assembled into a [`types::Dashboard`].

pub mod dashboard;
pub mod kde;
pub mod rank;
pub mod severity;
pub mod types;
