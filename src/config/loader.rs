//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BalancerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML configuration file without validating it.
///
/// Callers that layer command-line overrides on top validate afterwards.
pub fn read_config(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_config;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
backends = ["http://10.0.0.1:3000", "http://10.0.0.2:3000", "http://10.0.0.3:3000"]

[listener]
bind_address = ":9000"

[selection]
sample_width = 3

[timeouts]
request_secs = 10
"#,
        );

        let config = read_config(file.path()).unwrap();
        assert_eq!(config.backends.len(), 3);
        assert_eq!(config.listener.bind_address, ":9000");
        assert_eq!(config.selection.sample_width, 3);
        assert_eq!(config.timeouts.request_secs, 10);
        assert_eq!(config.timeouts.connect_secs, 5);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = write_config("");
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.selection.sample_width, 2);
    }

    #[test]
    fn test_invalid_config_parses_but_fails_validation() {
        let file = write_config("backends = []\n[selection]\nsample_width = -1\n");
        let config = read_config(file.path()).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_parse_error() {
        let file = write_config("backends = 12");
        assert!(matches!(read_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/nonexistent/kplus.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
