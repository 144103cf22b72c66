// crates/flagcheck-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for flagcheck-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::io::Write;

use flagcheck_config::ConfigError;
use flagcheck_config::FlagCheckConfig;
use tempfile::NamedTempFile;

/// Result type shared by config tests.
pub type TestResult = Result<(), String>;

/// Writes `contents` to a temporary config file.
pub fn config_file(contents: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

/// Parses and validates a TOML string.
pub fn config_from_toml(toml_str: &str) -> Result<FlagCheckConfig, ConfigError> {
    FlagCheckConfig::from_toml_str(toml_str)
}

/// Asserts that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
