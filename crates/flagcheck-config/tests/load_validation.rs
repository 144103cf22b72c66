//! Config load validation tests for flagcheck-config.
// crates/flagcheck-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, syntax).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

mod common;

use std::io::Write;
use std::path::Path;

use common::TestResult;
use common::assert_invalid;
use common::config_file;
use flagcheck_config::ConfigError;
use flagcheck_config::FlagCheckConfig;
use tempfile::NamedTempFile;

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(FlagCheckConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        FlagCheckConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(FlagCheckConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(FlagCheckConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match FlagCheckConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected io error".to_string()),
    }
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = config_file("[resolver\nmode = ")?;
    assert_invalid(FlagCheckConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_rejects_unknown_mode() -> TestResult {
    let file = config_file("[resolver]\nmode = \"lenient\"\n")?;
    assert_invalid(FlagCheckConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn load_accepts_empty_file_with_defaults() -> TestResult {
    let file = config_file("")?;
    let config = FlagCheckConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if !config.parameters.is_empty() {
        return Err("expected no parameter overrides".to_string());
    }
    Ok(())
}
