//! Configuration management.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, else `<config dir>/academic-search/config.toml`)
//! 3. environment variables such as `ACADEMIC_SEARCH__API__BASE_URL`
//! 4. command-line flags, applied by the binary

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "ACADEMIC_SEARCH";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Output settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address; endpoints are resolved beneath it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Output format for results
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table if stdout is a terminal, JSON otherwise
    #[default]
    Auto,
    /// Human-readable tables and cards
    Table,
    /// JSON, exactly as the service returned it
    Json,
    /// Plain text without colors or box drawing
    Plain,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub output: OutputFormat,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for this crate's logs when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("academic-search").join("config.toml"))
}

/// The default configuration file, if one exists
pub fn find_config_file() -> Option<PathBuf> {
    default_config_path().filter(|path| path.is_file())
}

/// Load configuration from an optional file plus the environment
///
/// An explicitly given file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(
            config::File::from(path).format(config::FileFormat::Toml),
        );
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from the default file location and environment
pub fn get_config() -> Result<Config, config::ConfigError> {
    let path = find_config_file();
    if let Some(path) = &path {
        tracing::debug!(path = %path.display(), "using config file");
    }
    load_config(path.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::NamedTempFile;

    // Tests reading the environment must not interleave with ones writing it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets variables for the duration of a test and removes them on drop
    struct EnvGuard {
        keys: Vec<&'static str>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
            Self {
                keys: vars.iter().map(|(key, _)| *key).collect(),
                _lock: lock,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.display.output, OutputFormat::Auto);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://search.example.org/api"
timeout_secs = 15

[display]
output = "json"
"#
        )
        .unwrap();

        let _env = EnvGuard::set(&[]);
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "https://search.example.org/api");
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.display.output, OutputFormat::Json);
        // untouched sections keep their defaults
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://file.example.org/api"
timeout_secs = 5

[logging]
level = "info"
"#
        )
        .unwrap();

        let _env = EnvGuard::set(&[
            ("ACADEMIC_SEARCH__API__BASE_URL", "https://env.example.org/api"),
            ("ACADEMIC_SEARCH__API__TIMEOUT_SECS", "30"),
        ]);
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.api.base_url, "https://env.example.org/api");
        assert_eq!(config.api.timeout_secs, Some(30));
        // keys without a variable keep the file value
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_without_file() {
        let _env = EnvGuard::set(&[("ACADEMIC_SEARCH__DISPLAY__OUTPUT", "plain")]);
        let config = load_config(None).unwrap();

        assert_eq!(config.display.output, OutputFormat::Plain);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/academic-search.toml")));
        assert!(result.is_err());
    }
}
