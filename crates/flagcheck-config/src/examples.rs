// crates/flagcheck-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `flagcheck.toml`. The example is static, loads without
//! errors, and resolves cleanly in strict mode.

/// Returns a canonical example `flagcheck.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[resolver]
mode = "strict"
verbosity = "verbose"

[environment]
platform = "x86_64"
compilers = "both"
execution = "tiered"

[diagnostics]
sink = "stderr"
# sink = "file"
# path = "flagcheck-diagnostics.jsonl"

[intrinsics]
extra = []

[parameters.CICompilerCount]
value = 4

[parameters.AllocatePrefetchDistance]
value = 256

[parameters.CodeEntryAlignment]
value = 64
origin = "ergonomic"

[parameters.TypeProfileLevel]
value = 121

[parameters.LoopStripMiningIter]
value = 1000

[parameters.UseCountedLoopSafepoints]
value = true

[parameters.DisableIntrinsic]
value = "_dsin,_dcos"

[parameters.ControlIntrinsic]
value = "+_dabs,-_dpow"
"#,
    )
}
