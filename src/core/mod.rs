//! Core data-joining logic
//!
//! - [`join`] - left join over typed rows and untyped records
//! - [`assemble`] - enrollment/class/course assembly on top of the join

pub mod assemble;
pub mod join;

pub use assemble::{assemble_enrollments, EnrollmentAssembler, RosterSnapshot};
pub use join::{join_records, left_join};
