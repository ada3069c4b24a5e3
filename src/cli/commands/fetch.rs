//! Fetch command implementation
//!
//! Depaginates one resource collection and writes the records as JSON.

use super::write_json;
use crate::adapters::oneroster::{
    OneRosterClient, QueryParams, ResourceFetcher, ResourceType, SortOrder,
};
use crate::cli::{exit_code_for, EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Resource collection (users, enrollments, classes, courses)
    pub resource: ResourceType,

    /// OneRoster filter expression, e.g. "role='student'"
    #[arg(long)]
    pub filter: Option<String>,

    /// Field to sort on
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    pub order_by: Option<SortOrder>,

    /// Comma-separated fields to return
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

impl FetchArgs {
    fn query_params(&self) -> QueryParams {
        QueryParams {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            order_by: self.order_by,
            fields: self.fields.clone(),
        }
    }

    /// Execute the fetch command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let pretty = config.output.pretty && !self.compact;

        let client = match OneRosterClient::connect(config.provider).await {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to provider");
                eprintln!("Failed to connect: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let records = match client.fetch_all(self.resource, &self.query_params()).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(resource = %self.resource, error = %e, "Fetch failed");
                eprintln!("Failed to fetch {}: {e}", self.resource);
                return Ok(exit_code_for(&e));
            }
        };

        write_json(&records, self.output.as_deref(), pretty)?;
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_fetch_args_to_query_params() {
        let cli = Cli::parse_from([
            "oneroster",
            "fetch",
            "classes",
            "--sort",
            "title",
            "--order-by",
            "desc",
        ]);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch command");
        };

        assert_eq!(args.resource, ResourceType::Classes);
        assert_eq!(
            args.query_params(),
            QueryParams::default().with_sort("title", SortOrder::Desc)
        );
    }

    #[test]
    fn test_fetch_rejects_unknown_resource() {
        let result = Cli::try_parse_from(["oneroster", "fetch", "schools"]);
        assert!(result.is_err());
    }
}
