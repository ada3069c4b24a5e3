//! OneRoster API models
//!
//! Request and response structures for the OneRoster REST API. These are
//! kept separate from the domain types: a collection response is decoded
//! into generic [`Record`]s and the typed view is applied afterwards.

use crate::domain::errors::{OneRosterError, RosterError};
use crate::domain::{Record, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Roster resource collections served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Users,
    Enrollments,
    Classes,
    Courses,
}

impl ResourceType {
    /// Every supported resource type
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Users,
        ResourceType::Enrollments,
        ResourceType::Classes,
        ResourceType::Courses,
    ];

    /// Path segment relative to the provider base URL
    pub fn path(&self) -> &'static str {
        match self {
            ResourceType::Users => "users",
            ResourceType::Enrollments => "enrollments",
            ResourceType::Classes => "classes",
            ResourceType::Courses => "courses",
        }
    }

    /// JSON envelope key wrapping the collection in a response body
    ///
    /// OneRoster names the envelope after the collection, e.g.
    /// `{"enrollments": [...]}`.
    pub fn collection_key(&self) -> &'static str {
        self.path()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "users" => Ok(ResourceType::Users),
            "enrollments" => Ok(ResourceType::Enrollments),
            "classes" => Ok(ResourceType::Classes),
            "courses" => Ok(ResourceType::Courses),
            _ => Err(format!(
                "Unknown resource type: {s}. Expected one of: users, enrollments, classes, courses"
            )),
        }
    }
}

/// Sort direction for the `orderBy` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {s}. Expected 'asc' or 'desc'")),
        }
    }
}

/// Filtering, sorting and field selection for a collection request
///
/// Paging parameters are added per request by the fetcher.
///
/// # Example
///
/// ```
/// use oneroster::adapters::oneroster::{QueryParams, SortOrder};
///
/// let params = QueryParams::default()
///     .with_filter("status='active'")
///     .with_sort("familyName", SortOrder::Asc);
///
/// let pairs = params.to_query_pairs();
/// assert!(pairs.contains(&("filter".to_string(), "status='active'".to_string())));
/// assert!(pairs.contains(&("orderBy".to_string(), "asc".to_string())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// OneRoster filter expression, e.g. `role='student'`
    pub filter: Option<String>,
    /// Field to sort on
    pub sort: Option<String>,
    /// Sort direction
    pub order_by: Option<SortOrder>,
    /// Fields to return; empty means all fields
    pub fields: Vec<String>,
}

impl QueryParams {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order_by = Some(order);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Query string pairs in OneRoster naming
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(filter) = &self.filter {
            pairs.push(("filter".to_string(), filter.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        if let Some(order) = self.order_by {
            pairs.push(("orderBy".to_string(), order.as_str().to_string()));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields".to_string(), self.fields.join(",")));
        }

        pairs
    }

    /// Query string pairs including paging
    pub fn page_query_pairs(&self, limit: usize, offset: usize) -> Vec<(String, String)> {
        let mut pairs = self.to_query_pairs();
        pairs.push(("limit".to_string(), limit.to_string()));
        pairs.push(("offset".to_string(), offset.to_string()));
        pairs
    }
}

/// One decoded page of a collection response
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage {
    /// Records on this page, in server order
    pub records: Vec<Record>,
    /// Value of the `X-Total-Count` header, if the server sent one
    pub total_count: Option<usize>,
}

impl CollectionPage {
    /// Decode a page from a response body
    ///
    /// # Errors
    ///
    /// Returns [`OneRosterError::InvalidResponse`] if the envelope key is
    /// missing, is not an array, or holds a non-object element.
    pub fn from_body(
        resource: ResourceType,
        body: Value,
        total_count: Option<usize>,
    ) -> Result<Self> {
        let key = resource.collection_key();

        let items = match body {
            Value::Object(mut envelope) => envelope.remove(key),
            _ => None,
        }
        .ok_or_else(|| {
            OneRosterError::InvalidResponse(format!(
                "Response for {resource} is missing the '{key}' collection"
            ))
        })?;

        let Value::Array(items) = items else {
            return Err(OneRosterError::InvalidResponse(format!(
                "'{key}' in response for {resource} is not an array"
            ))
            .into());
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(RosterError::from(OneRosterError::InvalidResponse(format!(
                    "Element {index} of '{key}' is not an object: {other}"
                )))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            records,
            total_count,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
