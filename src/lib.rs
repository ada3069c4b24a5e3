//! # OneRoster roster client
//!
//! Client library for the OneRoster education-data REST API: authenticates
//! against a provider, depaginates roster collections (users, classes,
//! courses, enrollments) and joins enrollments with their classes and
//! courses client-side.
//!
//! ## Architecture
//!
//! - [`domain`] - Roster records, identifiers and error types
//! - [`core`] - Left join and enrollment assembly
//! - [`adapters`] - OneRoster HTTP client and authentication
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oneroster::adapters::oneroster::OneRosterClient;
//! use oneroster::config::load_config;
//! use oneroster::core::EnrollmentAssembler;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("oneroster.toml")?;
//!     let client = OneRosterClient::connect(config.provider).await?;
//!
//!     let enrollments = EnrollmentAssembler::new(client)
//!         .get_enrollments_joined()
//!         .await?;
//!
//!     for enrollment in &enrollments {
//!         println!(
//!             "{:?} -> {:?}",
//!             enrollment.sourced_id,
//!             enrollment.class.course.title
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Joining
//!
//! The join itself is independent of HTTP and works on any records:
//!
//! ```rust
//! use oneroster::core::join_records;
//! use serde_json::json;
//!
//! let classes = vec![json!({"sourcedId": "C1", "courseSourcedId": "CR1"})
//!     .as_object()
//!     .cloned()
//!     .unwrap()];
//! let courses = vec![json!({"sourcedId": "CR1", "title": "Math 101"})
//!     .as_object()
//!     .cloned()
//!     .unwrap()];
//!
//! let joined = join_records(&classes, &courses, "courseSourcedId", "sourcedId", "course_");
//! assert_eq!(joined[0]["course_title"], "Math 101");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
