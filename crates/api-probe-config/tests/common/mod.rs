// api-probe-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config resolution tests.
// Purpose: Reduce duplication across integration tests for api-probe-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::PathBuf;

use api_probe_config::ConfigError;
use api_probe_config::ConfigOverrides;
use api_probe_config::ExecutionConfig;
use tempfile::TempDir;

/// Writes `contents` to a config file inside a fresh temp directory.
///
/// The [`TempDir`] must be kept alive for the duration of the test.
pub fn write_config_file(contents: &str) -> Result<(TempDir, PathBuf), String> {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("api-probe.toml");
    std::fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Resolves a config from a TOML string and override record.
pub fn resolve_from_toml(
    contents: &str,
    overrides: &ConfigOverrides,
) -> Result<Result<ExecutionConfig, ConfigError>, String> {
    let (_dir, path) = write_config_file(contents)?;
    Ok(ExecutionConfig::resolve_with(Some(&path), overrides))
}

/// Resolves a config with no file values and no overrides.
pub fn resolve_defaults() -> Result<Result<ExecutionConfig, ConfigError>, String> {
    resolve_from_toml("", &ConfigOverrides::default())
}

/// Returns an override record carrying only a base URL.
pub fn base_url_override(value: &str) -> ConfigOverrides {
    ConfigOverrides {
        base_url: Some(value.to_string()),
    }
}
