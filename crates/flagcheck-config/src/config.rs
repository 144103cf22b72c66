// crates/flagcheck-config/src/config.rs
// ============================================================================
// Module: flagcheck Configuration
// Description: Configuration loading and validation for flagcheck runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: flagcheck-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Parameter entries carry typed TOML values; each is matched against the
//! kind the standard catalog declares for its name. Missing or invalid
//! configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use flagcheck_core::CompilerSet;
use flagcheck_core::DiagnosticSink;
use flagcheck_core::Environment;
use flagcheck_core::ExecutionMode;
use flagcheck_core::FileDiagnosticSink;
use flagcheck_core::InMemoryParameterStore;
use flagcheck_core::Mode;
use flagcheck_core::NoopDiagnosticSink;
use flagcheck_core::ParamKind;
use flagcheck_core::ParamValue;
use flagcheck_core::Platform;
use flagcheck_core::Resolver;
use flagcheck_core::StaticIntrinsicCatalog;
use flagcheck_core::StderrDiagnosticSink;
use flagcheck_core::ValueOrigin;
use flagcheck_core::Verbosity;
use flagcheck_core::standard_defaults;
use flagcheck_core::standard_parameter_kinds;
use flagcheck_core::standard_registry;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "flagcheck.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "FLAGCHECK_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of extra intrinsic identifiers.
pub(crate) const MAX_EXTRA_INTRINSICS: usize = 1024;
/// Maximum length of one intrinsic identifier.
pub(crate) const MAX_INTRINSIC_ID_LENGTH: usize = 128;

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// Parsed `flagcheck.toml` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagCheckConfig {
    /// Pass mode and reporting.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Platform and compiler configuration the values are checked for.
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Diagnostic destination.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Intrinsic catalog extensions.
    #[serde(default)]
    pub intrinsics: IntrinsicsConfig,
    /// Parameter overrides keyed by parameter name.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterEntry>,
}

impl FlagCheckConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from `path`, then `FLAGCHECK_CONFIG`, then
    /// `flagcheck.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.diagnostics.validate()?;
        self.intrinsics.validate()?;
        let kinds: BTreeMap<&str, ParamKind> = standard_parameter_kinds().into_iter().collect();
        for (name, entry) in &self.parameters {
            let kind = kinds.get(name.as_str()).copied().ok_or_else(|| {
                ConfigError::Invalid(format!("parameters.{name} is not a known parameter"))
            })?;
            entry.typed_value(name, kind)?;
        }
        Ok(())
    }

    /// Returns the environment the values are checked for.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment.to_environment()
    }

    /// Returns the intrinsic catalog: the standard set plus configured extras.
    #[must_use]
    pub fn catalog(&self) -> StaticIntrinsicCatalog {
        StaticIntrinsicCatalog::standard().with_extra(self.intrinsics.extra.iter().cloned())
    }

    /// Builds the parameter store: baseline defaults plus configured entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an entry names an unknown parameter or
    /// carries a value of the wrong kind.
    pub fn store(&self) -> Result<InMemoryParameterStore, ConfigError> {
        let kinds: BTreeMap<&str, ParamKind> = standard_parameter_kinds().into_iter().collect();
        let mut store = standard_defaults();
        for (name, entry) in &self.parameters {
            let kind = kinds.get(name.as_str()).copied().ok_or_else(|| {
                ConfigError::Invalid(format!("parameters.{name} is not a known parameter"))
            })?;
            store.insert(name.as_str(), entry.typed_value(name, kind)?, entry.origin);
        }
        Ok(store)
    }

    /// Opens the configured diagnostic sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the diagnostic file cannot be opened.
    pub fn sink(&self) -> Result<Arc<dyn DiagnosticSink>, ConfigError> {
        self.diagnostics.open()
    }

    /// Builds a resolver over the standard registry for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the registry cannot be built or the
    /// diagnostic sink cannot be opened.
    pub fn resolver(&self) -> Result<Resolver, ConfigError> {
        let environment = self.environment();
        let registry = standard_registry(&environment, Arc::new(self.catalog()))
            .map_err(|err| ConfigError::Invalid(format!("parameter registry: {err}")))?;
        Ok(Resolver::new(registry, environment)
            .with_mode(self.resolver.mode)
            .with_verbosity(self.resolver.verbosity)
            .with_sink(self.sink()?))
    }
}

// ============================================================================
// SECTION: Resolver Config
// ============================================================================

/// Pass mode and reporting configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Mode of every pass.
    #[serde(default)]
    pub mode: Mode,
    /// Diagnostic verbosity.
    #[serde(default)]
    pub verbosity: Verbosity,
}

// ============================================================================
// SECTION: Environment Config
// ============================================================================

/// Target platform and compiler configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Architecture family.
    #[serde(default = "default_platform")]
    pub platform: Platform,
    /// Compilers present in the build.
    #[serde(default = "default_compilers")]
    pub compilers: CompilerSet,
    /// Execution mode chosen at startup.
    #[serde(default = "default_execution")]
    pub execution: ExecutionMode,
}

impl EnvironmentConfig {
    /// Converts into the engine's environment description.
    #[must_use]
    pub const fn to_environment(self) -> Environment {
        Environment::new(self.platform, self.compilers, self.execution)
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            compilers: default_compilers(),
            execution: default_execution(),
        }
    }
}

// ============================================================================
// SECTION: Diagnostics Config
// ============================================================================

/// Diagnostic sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Diagnostics discarded.
    None,
}

/// Diagnostic destination configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: DiagnosticSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl DiagnosticsConfig {
    /// Validates sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (DiagnosticSinkKind::File, Some(path)) => validate_path_string("diagnostics.path", path),
            (DiagnosticSinkKind::File, None) => Err(ConfigError::Invalid(
                "diagnostics.path required for file sink".to_string(),
            )),
            (_, Some(_)) => Err(ConfigError::Invalid(
                "diagnostics.path only allowed for file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }

    /// Opens the configured sink.
    fn open(&self) -> Result<Arc<dyn DiagnosticSink>, ConfigError> {
        match (self.sink, &self.path) {
            (DiagnosticSinkKind::Stderr, _) => Ok(Arc::new(StderrDiagnosticSink)),
            (DiagnosticSinkKind::None, _) => Ok(Arc::new(NoopDiagnosticSink)),
            (DiagnosticSinkKind::File, Some(path)) => {
                let sink = FileDiagnosticSink::new(Path::new(path))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (DiagnosticSinkKind::File, None) => Err(ConfigError::Invalid(
                "diagnostics.path required for file sink".to_string(),
            )),
        }
    }
}

// ============================================================================
// SECTION: Intrinsics Config
// ============================================================================

/// Intrinsic catalog extensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntrinsicsConfig {
    /// Identifiers recognized in addition to the standard catalog.
    #[serde(default)]
    pub extra: Vec<String>,
}

impl IntrinsicsConfig {
    /// Validates identifier count and shape.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.extra.len() > MAX_EXTRA_INTRINSICS {
            return Err(ConfigError::Invalid("intrinsics.extra exceeds max entries".to_string()));
        }
        for id in &self.extra {
            if id.is_empty() || id.len() > MAX_INTRINSIC_ID_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "intrinsics.extra entries must be 1-{MAX_INTRINSIC_ID_LENGTH} characters"
                )));
            }
            if id.chars().any(|ch| ch.is_whitespace() || matches!(ch, ',' | '+' | '-')) {
                return Err(ConfigError::Invalid(format!(
                    "intrinsics.extra entry {id} contains a separator or marker"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Parameter Entries
// ============================================================================

/// One configured parameter value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterEntry {
    /// Typed value: integer, boolean, or string.
    pub value: toml::Value,
    /// Where the value is considered to come from.
    #[serde(default = "default_origin")]
    pub origin: ValueOrigin,
}

impl ParameterEntry {
    /// Converts the TOML value into a parameter value of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the TOML type does not match the
    /// kind or the integer does not fit it.
    pub fn typed_value(&self, name: &str, kind: ParamKind) -> Result<ParamValue, ConfigError> {
        let mismatch = || {
            ConfigError::Invalid(format!("parameters.{name} must be a {} value", kind.as_str()))
        };
        match (kind, &self.value) {
            (ParamKind::Bool, toml::Value::Boolean(value)) => Ok(ParamValue::Bool(*value)),
            (ParamKind::List, toml::Value::String(value)) => Ok(ParamValue::List(value.clone())),
            (ParamKind::Int | ParamKind::Uint | ParamKind::Packed, toml::Value::Integer(value)) => {
                ParamValue::from_integer(kind, i128::from(*value)).ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "parameters.{name} ({value}) is out of range for {} values",
                        kind.as_str()
                    ))
                })
            }
            _ => Err(mismatch()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
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

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
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

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default platform.
const fn default_platform() -> Platform {
    Platform::X86_64
}

/// Default compiler set.
const fn default_compilers() -> CompilerSet {
    CompilerSet::Both
}

/// Default execution mode.
const fn default_execution() -> ExecutionMode {
    ExecutionMode::Tiered
}

/// Configured values count as command-line settings unless stated otherwise.
const fn default_origin() -> ValueOrigin {
    ValueOrigin::CommandLine
}
