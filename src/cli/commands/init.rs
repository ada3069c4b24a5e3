//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Sample configuration written by `init`
pub const SAMPLE_CONFIG: &str = r#"# OneRoster client configuration
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any setting can also be overridden with ONEROSTER_<SECTION>_<KEY>.

# development, staging or production
environment = "development"

[application]
log_level = "info"

[provider]
name = "district"
base_url = "https://roster.example.com/ims/oneroster/v1p1"
timeout_seconds = 60
tls_verify = true
# tls_ca_cert = "/etc/ssl/certs/district-ca.pem"

[provider.auth]
# oauth2: client-credentials grant against token_url
# bearer: pre-issued token
auth_type = "oauth2"
token_url = "https://roster.example.com/oauth/token"
client_id = "${ONEROSTER_CLIENT_ID}"
client_secret = "${ONEROSTER_CLIENT_SECRET}"
# scope = "https://purl.imsglobal.org/spec/or/v1p1/scope/roster-core.readonly"
# token = "${ONEROSTER_TOKEN}"

[provider.pagination]
page_size = 100
max_pages = 10000

[provider.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[output]
# nested or flat
format = "nested"
pretty = true
concurrent_fetch = false

[logging]
local_enabled = false
local_path = "/var/log/oneroster"
# daily or hourly
local_rotation = "daily"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "oneroster.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your provider's URLs", self.output);
                println!("  2. Set ONEROSTER_CLIENT_ID and ONEROSTER_CLIENT_SECRET (or use a .env file)");
                println!("  3. Run: oneroster --config {} validate-config", self.output);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to write configuration file");
                println!("❌ Failed to create configuration file: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
