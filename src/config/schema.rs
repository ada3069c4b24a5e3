//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// OneRoster provider connection
    pub provider: ProviderConfig,

    /// Output settings for the CLI
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RosterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.provider.validate(&self.environment)?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 disables retrying)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "provider.retry.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "provider.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Pagination settings used when depaginating a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records requested per page (`limit`)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on pages fetched for one collection
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl PaginationConfig {
    fn validate(&self) -> Result<(), String> {
        if !(1..=10_000).contains(&self.page_size) {
            return Err(format!(
                "provider.pagination.page_size must be between 1 and 10000, got {}",
                self.page_size
            ));
        }

        if self.max_pages == 0 {
            return Err("provider.pagination.max_pages must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

/// Credential settings for the provider's token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Authentication type (oauth2 or bearer)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// OAuth2 token endpoint (oauth2)
    #[serde(default)]
    pub token_url: Option<String>,

    /// OAuth2 client ID (oauth2)
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth2 client secret (oauth2)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// OAuth2 scope requested with the token (oauth2, optional)
    #[serde(default)]
    pub scope: Option<String>,

    /// Pre-issued access token (bearer)
    #[serde(default)]
    pub token: Option<SecretString>,
}

impl AuthConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        match self.auth_type.as_str() {
            "oauth2" => {
                match self.token_url.as_deref() {
                    None | Some("") => {
                        return Err(
                            "provider.auth.token_url cannot be empty when auth_type is 'oauth2'"
                                .to_string(),
                        )
                    }
                    Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                        return Err(
                            "provider.auth.token_url must start with http:// or https://"
                                .to_string(),
                        )
                    }
                    Some(_) => {}
                }

                if self.client_id.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
                    return Err(
                        "provider.auth.client_id cannot be empty when auth_type is 'oauth2'"
                            .to_string(),
                    );
                }

                if self
                    .client_secret
                    .as_ref()
                    .map(|s| s.expose_secret().as_str().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "provider.auth.client_secret cannot be empty when auth_type is 'oauth2'"
                            .to_string(),
                    );
                }
            }
            "bearer" => {
                if self
                    .token
                    .as_ref()
                    .map(|s| s.expose_secret().as_str().is_empty())
                    .unwrap_or(true)
                {
                    return Err(
                        "provider.auth.token cannot be empty when auth_type is 'bearer'"
                            .to_string(),
                    );
                }
            }
            other => {
                return Err(format!(
                    "Invalid auth_type '{other}'. Must be one of: oauth2, bearer"
                ))
            }
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: default_auth_type(),
            token_url: None,
            client_id: None,
            client_secret: None,
            scope: None,
            token: None,
        }
    }
}

/// OneRoster provider configuration
///
/// Providers differ only in URLs, credentials and paging limits, so one
/// client implementation serves all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of the OneRoster API, including the version path
    /// (e.g. `https://host/ims/oneroster/v1p1`)
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes the client to
    /// man-in-the-middle attacks. Validation rejects `false` in production;
    /// use `tls_ca_cert` for private CAs instead.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Optional PEM CA certificate path for custom/self-signed certificates
    #[serde(default)]
    pub tls_ca_cert: Option<String>,

    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ProviderConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("provider.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("provider.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("provider.timeout_seconds must be > 0".to_string());
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Either set 'tls_verify = true' or provide a custom CA certificate using 'tls_ca_cert'."
                    .to_string(),
            );
        }

        self.auth.validate()?;
        self.pagination.validate()?;
        self.retry.validate()?;
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: "http://localhost:8080/ims/oneroster/v1p1".to_string(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            tls_ca_cert: None,
            auth: AuthConfig::default(),
            pagination: PaginationConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Output format for joined enrollments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nested enrollment → class → course objects
    #[default]
    Nested,
    /// Flat joined rows with `class_` / `class_course_` prefixed fields
    Flat,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nested" => Ok(Self::Nested),
            "flat" | "flattened" => Ok(Self::Flat),
            _ => Err(format!(
                "Invalid output format: {s}. Expected 'nested' or 'flat'"
            )),
        }
    }
}

/// CLI output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format for the `enrollments` command
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Fetch the three collections concurrently
    #[serde(default)]
    pub concurrent_fetch: bool,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
            concurrent_fetch: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider_name() -> String {
    "oneroster".to_string()
}

fn default_auth_type() -> String {
    "oauth2".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_page_size() -> usize {
    100
}

fn default_max_pages() -> usize {
    10_000
}

fn default_local_path() -> String {
    "/var/log/oneroster".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
