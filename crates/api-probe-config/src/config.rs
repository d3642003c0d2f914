// api-probe-config/src/config.rs
// ============================================================================
// Module: API Probe Configuration
// Description: Configuration resolution and validation for API Probe.
// Purpose: Provide strict, fail-closed settings resolution with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Settings are resolved from three layers, highest precedence first: an
//! explicit [`ConfigOverrides`] record, an optional TOML file, and compiled
//! defaults. The result is an immutable [`ExecutionConfig`] validated at
//! construction. Missing or invalid configuration fails closed.
//! Security posture: config inputs are untrusted; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "api-probe.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "API_PROBE_CONFIG";
/// Environment variable used to override the probe origin.
pub const BASE_URL_ENV_VAR: &str = "BASE_URL";
/// Compiled-in default origin used when no override or file value is present.
pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// Default connection establishment deadline in milliseconds.
pub(crate) const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Default response read deadline in milliseconds.
pub(crate) const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;
/// Maximum allowed timeout value in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 300_000;
/// Maximum length of a base URL in bytes.
pub(crate) const MAX_BASE_URL_LENGTH: usize = 2_048;
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Immutable execution settings for one probe run.
///
/// Constructed once at startup, read by every probe dispatch within the run,
/// and discarded at process exit. Fields are private; the public surface is
/// read-only, so a constructed config can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Fully qualified HTTP(S) origin probes are dispatched against.
    base_url: String,
    /// Connection establishment deadline in milliseconds.
    connect_timeout_ms: u64,
    /// Response read deadline in milliseconds.
    read_timeout_ms: u64,
}

/// Overrides applied ahead of file values and compiled defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replacement origin for outbound probes.
    pub base_url: Option<String>,
}

impl ConfigOverrides {
    /// Captures overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(BASE_URL_ENV_VAR).ok(),
        }
    }
}

/// On-disk configuration model for `api-probe.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    /// Origin probes are dispatched against.
    base_url: Option<String>,
    /// Connection establishment deadline in milliseconds.
    connect_timeout_ms: Option<u64>,
    /// Response read deadline in milliseconds.
    read_timeout_ms: Option<u64>,
}

impl ExecutionConfig {
    /// Constructs a validated config from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any value fails validation.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout_ms: u64,
        read_timeout_ms: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            base_url: base_url.into(),
            connect_timeout_ms,
            read_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolves configuration from the process environment and disk.
    ///
    /// Equivalent to [`ExecutionConfig::resolve_with`] with no explicit path
    /// and overrides captured via [`ConfigOverrides::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_with(None, &ConfigOverrides::from_env())
    }

    /// Resolves configuration from an optional file path and override record.
    ///
    /// Precedence, highest first: overrides, file values, compiled defaults.
    /// An explicitly named file (argument or `API_PROBE_CONFIG`) that cannot
    /// be read is an error; the implicit default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn resolve_with(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = load_file(path)?;
        let base_url = overrides
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let config = Self {
            base_url,
            connect_timeout_ms: file.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout_ms: file.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the origin probes are dispatched against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the connection establishment deadline in milliseconds.
    #[must_use]
    pub const fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms
    }

    /// Returns the response read deadline in milliseconds.
    #[must_use]
    pub const fn read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms
    }

    /// Returns the connection establishment deadline as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the response read deadline as a [`Duration`].
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Validates the configuration for internal consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.base_url)?;
        validate_timeout("connect_timeout_ms", self.connect_timeout_ms)?;
        validate_timeout("read_timeout_ms", self.read_timeout_ms)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors produced while resolving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from an explicit argument or environment default.
///
/// Returns `None` when no path was named and the default file is absent.
fn resolve_file_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = Path::new(DEFAULT_CONFIG_NAME);
    if default.exists() {
        return Ok(Some(default.to_path_buf()));
    }
    Ok(None)
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Loads the config file if one is named or present, with strict limits.
fn load_file(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let Some(resolved) = resolve_file_path(path)? else {
        return Ok(FileConfig::default());
    };
    validate_path(&resolved)?;
    let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
}

/// Validates an origin string as a usable HTTP(S) base URL.
fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid("base_url must be non-empty".to_string()));
    }
    if value.len() > MAX_BASE_URL_LENGTH {
        return Err(ConfigError::Invalid("base_url exceeds max length".to_string()));
    }
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("base_url is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::Invalid(format!(
                "base_url scheme must be http or https, got {scheme}"
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("base_url must include a host".to_string()));
    }
    Ok(())
}

/// Validates a timeout value against the hard upper bound.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid(format!(
            "{field} exceeds maximum of {MAX_TIMEOUT_MS} ms"
        )));
    }
    Ok(())
}
