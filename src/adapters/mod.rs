//! External system integrations
//!
//! - [`oneroster`] - OneRoster REST API (authentication, paginated fetches)
//!
//! The assembly core depends only on the [`oneroster::ResourceFetcher`]
//! trait, so tests can substitute in-memory collections for the HTTP client.
//!
//! ```rust,no_run
//! use oneroster::adapters::oneroster::OneRosterClient;
//! use oneroster::config::{secret_string, AuthConfig, ProviderConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig {
//!     base_url: "https://roster.example.com/ims/oneroster/v1p1".to_string(),
//!     auth: AuthConfig {
//!         auth_type: "bearer".to_string(),
//!         token: Some(secret_string("access-token".to_string())),
//!         ..AuthConfig::default()
//!     },
//!     ..ProviderConfig::default()
//! };
//!
//! let client = OneRosterClient::connect(config).await?;
//! client.health_check().await?;
//! # Ok(())
//! # }
//! ```

pub mod oneroster;
