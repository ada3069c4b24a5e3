//! Enrollments command implementation
//!
//! Fetches enrollments, classes and courses and writes the joined
//! enrollment records as JSON.

use super::write_json;
use crate::adapters::oneroster::OneRosterClient;
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::{load_config, OutputFormat};
use crate::core::EnrollmentAssembler;
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the enrollments command
#[derive(Args, Debug)]
pub struct EnrollmentsArgs {
    /// Output format (nested or flat); defaults to `output.format`
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Fetch enrollments, classes and courses concurrently
    #[arg(long)]
    pub concurrent: bool,
}

impl EnrollmentsArgs {
    /// Execute the enrollments command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let format = self.format.unwrap_or(config.output.format);
        let pretty = config.output.pretty && !self.compact;
        let concurrent = self.concurrent || config.output.concurrent_fetch;

        let client = match OneRosterClient::connect(config.provider).await {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to provider");
                eprintln!("Failed to connect: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let assembler = EnrollmentAssembler::new(client).with_concurrent_fetch(concurrent);

        let result = match format {
            OutputFormat::Nested => assembler
                .get_enrollments_joined()
                .await
                .and_then(|rows| Ok(serde_json::to_value(rows)?)),
            OutputFormat::Flat => assembler
                .get_enrollment_rows()
                .await
                .map(|rows| Value::Array(rows.into_iter().map(Value::Object).collect())),
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(error = %e, "Enrollment assembly failed");
                eprintln!("Failed to fetch enrollments: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        write_json(&output, self.output.as_deref(), pretty)?;
        Ok(EXIT_SUCCESS)
    }
}
