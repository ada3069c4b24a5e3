//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RosterConfig;
use super::secret::secret_string;
use crate::domain::errors::RosterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`RosterConfig`]
/// 4. Applies environment variable overrides (`ONEROSTER_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RosterError::Configuration`] if the file cannot be read, a
/// referenced environment variable is missing, parsing fails, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use oneroster::config::loader::load_config;
///
/// let config = load_config("oneroster.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RosterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RosterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RosterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: RosterConfig = toml::from_str(&contents)
        .map_err(|e| RosterError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        RosterError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RosterError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(RosterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the `ONEROSTER_*` prefix
///
/// Variables follow the pattern `ONEROSTER_<SECTION>_<KEY>`, for example
/// `ONEROSTER_PROVIDER_BASE_URL` or `ONEROSTER_AUTH_CLIENT_SECRET`.
/// Unparseable numeric or boolean values are ignored.
fn apply_env_overrides(config: &mut RosterConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("ONEROSTER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Provider overrides
    if let Ok(val) = std::env::var("ONEROSTER_PROVIDER_NAME") {
        config.provider.name = val;
    }
    if let Ok(val) = std::env::var("ONEROSTER_PROVIDER_BASE_URL") {
        config.provider.base_url = val;
    }
    if let Ok(val) = std::env::var("ONEROSTER_PROVIDER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.provider.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("ONEROSTER_PROVIDER_TLS_VERIFY") {
        config.provider.tls_verify = val.parse().unwrap_or(true);
    }

    // Auth overrides
    if let Ok(val) = std::env::var("ONEROSTER_AUTH_TYPE") {
        config.provider.auth.auth_type = val;
    }
    if let Ok(val) = std::env::var("ONEROSTER_AUTH_TOKEN_URL") {
        config.provider.auth.token_url = Some(val);
    }
    if let Ok(val) = std::env::var("ONEROSTER_AUTH_CLIENT_ID") {
        config.provider.auth.client_id = Some(val);
    }
    if let Ok(val) = std::env::var("ONEROSTER_AUTH_CLIENT_SECRET") {
        config.provider.auth.client_secret = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ONEROSTER_AUTH_SCOPE") {
        config.provider.auth.scope = Some(val);
    }
    if let Ok(val) = std::env::var("ONEROSTER_AUTH_TOKEN") {
        config.provider.auth.token = Some(secret_string(val));
    }

    // Pagination overrides
    if let Ok(val) = std::env::var("ONEROSTER_PAGINATION_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.provider.pagination.page_size = size;
        }
    }

    // Output overrides
    if let Ok(val) = std::env::var("ONEROSTER_OUTPUT_FORMAT") {
        if let Ok(format) = val.parse() {
            config.output.format = format;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ONEROSTER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ONEROSTER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOADER_TEST_SECRET", "test_value");
        let input = "client_secret = \"${LOADER_TEST_SECRET}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "client_secret = \"test_value\"");
        std::env::remove_var("LOADER_TEST_SECRET");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOADER_MISSING_A");
        std::env::remove_var("LOADER_MISSING_B");
        let input = "a = \"${LOADER_MISSING_A}\"\nb = \"${LOADER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("LOADER_MISSING_A"));
        assert!(err.contains("LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("LOADER_COMMENTED");
        let input = "# token = \"${LOADER_COMMENTED}\"\nname = \"x\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(RosterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[provider]
name = "district"
base_url = "https://roster.example.com/ims/oneroster/v1p1"

[provider.auth]
auth_type = "bearer"
token = "static-token"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.provider.name, "district");
        assert_eq!(config.provider.pagination.page_size, 100);
        assert_eq!(config.application.log_level, "info");
    }
}
