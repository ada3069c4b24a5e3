//! Roster record types
//!
//! Typed views of the OneRoster resources this crate works with. Real-world
//! feeds omit attributes freely, so almost everything is optional; the only
//! hard requirement is the `sourcedId` of a top-level record.
//!
//! [`Record`] is the untyped wire shape returned by the resource fetcher and
//! consumed by the record-level join.

use super::ids::SourcedId;
use super::{Result, RosterError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Untyped roster record: field name to JSON value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// GUID reference to another roster entity (`{"sourcedId": ..., "href": ..., "type": ...}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub sourced_id: SourcedId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
}

impl Reference {
    /// Create a bare reference carrying only the identifier
    pub fn new(sourced_id: SourcedId) -> Self {
        Self {
            sourced_id,
            href: None,
            ref_type: None,
        }
    }
}

/// A OneRoster user (student, teacher, administrator, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub sourced_id: SourcedId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_last_modified: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub orgs: Vec<Reference>,
}

/// Membership of a user in a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub sourced_id: SourcedId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_last_modified: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// String (`"true"`/`"false"`) in v1.1 feeds, boolean in v1.2
    #[serde(default)]
    pub primary: Option<serde_json::Value>,
    #[serde(default)]
    pub user: Option<Reference>,
    #[serde(default)]
    pub class: Option<Reference>,
    #[serde(default)]
    pub school: Option<Reference>,
    #[serde(default)]
    pub begin_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A class (section) taught at a school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub sourced_id: SourcedId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_last_modified: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "classCode")]
    pub code: Option<String>,
    #[serde(default, rename = "type", alias = "classType")]
    pub class_type: Option<String>,
    #[serde(default)]
    pub grades: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub terms: Vec<Reference>,
    #[serde(default)]
    pub school: Option<Reference>,
    #[serde(default)]
    pub course: Option<Reference>,
}

/// A course offered by an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub sourced_id: SourcedId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_last_modified: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "courseCode")]
    pub code: Option<String>,
    #[serde(default)]
    pub org: Option<Reference>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Enrollment with its class and the class's course embedded
///
/// Produced by the enrollment assembler. Fields that could not be resolved
/// are `None` and left out of the serialized JSON; the `user`, `class` and
/// `class.course` objects are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedEnrollment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourced_id: Option<SourcedId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub user: JoinedUser,
    pub class: JoinedClass,
}

/// User reference inside a [`JoinedEnrollment`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourced_id: Option<SourcedId>,
}

/// Class embedded in a [`JoinedEnrollment`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedClass {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourced_id: Option<SourcedId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub class_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grades: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<Reference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub course: JoinedCourse,
}

/// Course embedded in a [`JoinedClass`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedCourse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourced_id: Option<SourcedId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Decode untyped records into a typed roster resource
///
/// # Errors
///
/// Returns [`RosterError::Serialization`] naming the offending record when a
/// record does not match `T`.
pub fn decode_records<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(serde_json::Value::Object(record)).map_err(|e| {
                RosterError::Serialization(format!("Failed to decode record {index}: {e}"))
            })
        })
        .collect()
}
