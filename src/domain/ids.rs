//! Roster identifier types
//!
//! OneRoster entities are identified by a `sourcedId`. The newtype keeps
//! identifiers from being confused with other strings (titles, codes).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OneRoster `sourcedId` newtype wrapper
///
/// # Examples
///
/// ```
/// use oneroster::domain::ids::SourcedId;
/// use std::str::FromStr;
///
/// let id = SourcedId::from_str("enr-0001").unwrap();
/// assert_eq!(id.as_str(), "enr-0001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourcedId(String);

impl SourcedId {
    /// Creates a new SourcedId, rejecting blank identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("sourcedId cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SourcedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SourcedId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SourcedId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourcedId> for String {
    fn from(id: SourcedId) -> Self {
        id.0
    }
}

impl AsRef<str> for SourcedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
