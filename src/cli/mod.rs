//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use crate::domain::errors::OneRosterError;
use crate::domain::RosterError;
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for authentication failures
pub const EXIT_AUTH: i32 = 3;
/// Exit code for API and transport failures
pub const EXIT_API: i32 = 4;
/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;
/// Exit code when interrupted with Ctrl+C
pub const EXIT_INTERRUPTED: i32 = 130;

/// OneRoster roster client
#[derive(Parser, Debug)]
#[command(name = "oneroster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "oneroster.toml", env = "ONEROSTER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ONEROSTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch enrollments joined with their classes and courses
    Enrollments(commands::enrollments::EnrollmentsArgs),

    /// Fetch every record of one resource collection
    Fetch(commands::fetch::FetchArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Map an error to the process exit code
pub fn exit_code_for(err: &RosterError) -> i32 {
    match err {
        RosterError::Configuration(_) => EXIT_CONFIG,
        RosterError::OneRoster(OneRosterError::Authentication(_)) => EXIT_AUTH,
        RosterError::OneRoster(_) => EXIT_API,
        _ => EXIT_FATAL,
    }
}
