//! Domain models and types.
//!
//! This module contains the roster record types, identifiers and the error
//! hierarchy shared by every layer of the crate.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SourcedId`])
//! - **Roster records** ([`Enrollment`], [`Class`], [`Course`], [`User`])
//! - **The joined output shape** ([`JoinedEnrollment`])
//! - **Error types** ([`RosterError`], [`OneRosterError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RosterError>`]:
//!
//! ```rust,no_run
//! use oneroster::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = oneroster::config::load_config("oneroster.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod roster;

// Re-export commonly used types for convenience
pub use errors::{OneRosterError, RosterError};
pub use ids::SourcedId;
pub use result::Result;
pub use roster::{
    decode_records, Class, Course, Enrollment, JoinedClass, JoinedCourse, JoinedEnrollment,
    JoinedUser, Record, Reference, User,
};
