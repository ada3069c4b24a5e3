//! CLI command implementations

pub mod enrollments;
pub mod fetch;
pub mod init;
pub mod validate;

use serde::Serialize;
use std::path::Path;

/// Write JSON to a file, or to stdout when no path is given
pub(crate) fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            tracing::info!(path = %path.display(), "Wrote output file");
        }
        None => println!("{json}"),
    }

    Ok(())
}
