//! Resource fetcher trait
//!
//! The assembly core only needs complete collections of records. This trait
//! is the seam between it and whatever serves them: the HTTP client in
//! production, in-memory collections in tests.

use super::models::{QueryParams, ResourceType};
use crate::domain::{decode_records, Class, Course, Enrollment, Record, Result, User};
use async_trait::async_trait;

/// Retrieves complete, depaginated resource collections
///
/// # Example
///
/// ```no_run
/// use oneroster::adapters::oneroster::{QueryParams, ResourceFetcher, ResourceType};
///
/// # async fn example(fetcher: &impl ResourceFetcher) -> oneroster::domain::Result<()> {
/// let classes = fetcher
///     .fetch_all(ResourceType::Classes, &QueryParams::default())
///     .await?;
/// println!("{} classes", classes.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch every record of a collection, all pages merged, in server order
    ///
    /// # Errors
    ///
    /// Fails with an authentication error when no valid credential is
    /// present, and with a transport or HTTP error when a request fails.
    async fn fetch_all(&self, resource: ResourceType, params: &QueryParams)
        -> Result<Vec<Record>>;

    /// Fetch users as typed records
    async fn get_users(&self, params: &QueryParams) -> Result<Vec<User>> {
        decode_records(self.fetch_all(ResourceType::Users, params).await?)
    }

    /// Fetch enrollments as typed records
    async fn get_enrollments(&self, params: &QueryParams) -> Result<Vec<Enrollment>> {
        decode_records(self.fetch_all(ResourceType::Enrollments, params).await?)
    }

    /// Fetch classes as typed records
    async fn get_classes(&self, params: &QueryParams) -> Result<Vec<Class>> {
        decode_records(self.fetch_all(ResourceType::Classes, params).await?)
    }

    /// Fetch courses as typed records
    async fn get_courses(&self, params: &QueryParams) -> Result<Vec<Course>> {
        decode_records(self.fetch_all(ResourceType::Courses, params).await?)
    }
}

#[async_trait]
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for std::sync::Arc<T> {
    async fn fetch_all(
        &self,
        resource: ResourceType,
        params: &QueryParams,
    ) -> Result<Vec<Record>> {
        (**self).fetch_all(resource, params).await
    }
}
