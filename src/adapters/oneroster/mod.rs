//! OneRoster REST API adapter
//!
//! This module provides the Authentication Provider ([`Session`]), the
//! Resource Fetcher trait and its HTTP implementation, and the API models.

pub mod auth;
pub mod client;
pub mod fetcher;
pub mod models;

pub use auth::Session;
pub use client::OneRosterClient;
pub use fetcher::ResourceFetcher;
pub use models::{CollectionPage, QueryParams, ResourceType, SortOrder};
