//! Configuration management
//!
//! TOML-based configuration loading, parsing and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ONEROSTER_*` environment variable overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use oneroster::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("oneroster.toml")?;
//!
//! println!("Provider: {} ({})", config.provider.name, config.provider.base_url);
//! println!("Page size: {}", config.provider.pagination.page_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ProviderConfig`] - Provider URL, TLS, credentials, paging and retries
//! - [`OutputConfig`] - Output format for the CLI
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [provider]
//! name = "district"
//! base_url = "https://roster.example.com/ims/oneroster/v1p1"
//!
//! [provider.auth]
//! auth_type = "oauth2"
//! token_url = "https://roster.example.com/oauth/token"
//! client_id = "roster-sync"
//! client_secret = "${ONEROSTER_CLIENT_SECRET}"
//!
//! [provider.pagination]
//! page_size = 100
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuthConfig, Environment, LoggingConfig, OutputConfig, OutputFormat,
    PaginationConfig, ProviderConfig, RetryConfig, RosterConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
