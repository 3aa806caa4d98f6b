//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `WAYFINDER_DEBUG` | `debug` |
//! | `WAYFINDER_LOG_LEVEL` | `log_level` |
//! | `WAYFINDER_METHOD_FALLBACK` | `method_fallback` |
//! | `WAYFINDER_CHECK_REQUIREMENTS` | `check_requirements` |
//! | `WAYFINDER_SCHEME` | `default_context.scheme` |
//! | `WAYFINDER_HOST` | `default_context.host` |
//! | `WAYFINDER_PORT` | `default_context.port` |
//! | `WAYFINDER_BASE_PATH` | `default_context.base_path` |
//!
//! Setting any of the `default_context` variables creates a default context
//! (starting from [`ContextSettings::default`]) if none was configured.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use wayfinder_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/routing.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/routing.json").unwrap();
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::RoutingError;
use crate::settings::{ContextSettings, Settings};

/// A configuration file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    const fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, source: &str) -> Result<Value, String> {
        match self {
            Self::Toml => toml::from_str(source).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
        }
    }

    /// Parses `source` and lays it over [`Settings::default`], so partial
    /// documents keep every field they leave out.
    fn load(self, source: &str) -> Result<Settings, RoutingError> {
        let document = self.parse(source).map_err(|e| {
            RoutingError::ConfigurationError(format!("Failed to parse {}: {e}", self.name()))
        })?;

        let mut merged = serde_json::to_value(Settings::default()).map_err(|e| {
            RoutingError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
        })?;
        overlay(&mut merged, document);

        serde_json::from_value(merged).map_err(|e| {
            RoutingError::ConfigurationError(format!(
                "Failed to deserialize settings from {}: {e}",
                self.name()
            ))
        })
    }

    fn load_file(self, path: &Path) -> Result<Settings, RoutingError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RoutingError::ConfigurationError(format!(
                "Failed to read {} file '{}': {e}",
                self.name(),
                path.display()
            ))
        })?;
        self.load(&content)
    }
}

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RoutingError> {
    Format::Toml.load(toml_str)
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    Format::Toml.load_file(path.as_ref())
}

/// Like [`from_toml_file`], then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    from_toml_file(path).map(with_env_overrides)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, RoutingError> {
    Format::Json.load(json_str)
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    Format::Json.load_file(path.as_ref())
}

/// Like [`from_json_file`], then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    from_json_file(path).map(with_env_overrides)
}

/// Loads settings from environment variables alone, starting from defaults.
pub fn from_env() -> Settings {
    with_env_overrides(Settings::default())
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" as true and anything else as
/// false. An unparsable `WAYFINDER_PORT` is ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn with_env_overrides(mut settings: Settings) -> Settings {
    apply_env_overrides(&mut settings);
    settings
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let flag = |key: &str| lookup(key).map(|val| parse_bool(&val));

    if let Some(debug) = flag("WAYFINDER_DEBUG") {
        settings.debug = debug;
    }
    if let Some(level) = lookup("WAYFINDER_LOG_LEVEL") {
        settings.log_level = level;
    }
    if let Some(fallback) = flag("WAYFINDER_METHOD_FALLBACK") {
        settings.method_fallback = fallback;
    }
    if let Some(check) = flag("WAYFINDER_CHECK_REQUIREMENTS") {
        settings.check_requirements = check;
    }

    if let Some(scheme) = lookup("WAYFINDER_SCHEME") {
        context_mut(settings).scheme = scheme;
    }
    if let Some(host) = lookup("WAYFINDER_HOST") {
        context_mut(settings).host = host;
    }
    if let Some(port) = lookup("WAYFINDER_PORT").and_then(|val| val.parse::<u16>().ok()) {
        context_mut(settings).port = port;
    }
    if let Some(base_path) = lookup("WAYFINDER_BASE_PATH") {
        context_mut(settings).base_path = base_path;
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn context_mut(settings: &mut Settings) -> &mut ContextSettings {
    settings
        .default_context
        .get_or_insert_with(ContextSettings::default)
}

/// Lays `layer` over `base`. Tables merge key by key; any other value
/// replaces what it lands on.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, layer) => *slot = layer,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "debug"
            check_requirements = false
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        assert!(!settings.check_requirements);
        // Defaults preserved
        assert!(settings.method_fallback);
        assert_eq!(settings.default_path_requirement, "[^/]+");
    }

    #[test]
    fn test_from_toml_str_default_context() {
        let toml = r#"
            [default_context]
            scheme = "https"
            host = "example.com"
            port = 8443
            base_path = "/app"
        "#;

        let settings = from_toml_str(toml).unwrap();
        let ctx = settings.default_context.unwrap();
        assert_eq!(ctx.scheme, "https");
        assert_eq!(ctx.host, "example.com");
        assert_eq!(ctx.port, 8443);
        assert_eq!(ctx.base_path, "/app");
        assert_eq!(ctx.https_port, None);
    }

    #[test]
    fn test_from_toml_str_partial_default_context() {
        let toml = r#"
            [default_context]
            host = "example.com"
        "#;

        let ctx = from_toml_str(toml).unwrap().default_context.unwrap();
        assert_eq!(ctx.host, "example.com");
        assert_eq!(ctx.scheme, "http");
        assert_eq!(ctx.port, 80);
        assert_eq!(ctx.base_path, "");
    }

    #[test]
    fn test_from_toml_str_requirements() {
        let toml = r#"
            default_requirement = "[a-z]+"
            default_path_requirement = "[a-z0-9-]+"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.default_requirement, "[a-z]+");
        assert_eq!(settings.default_path_requirement, "[a-z0-9-]+");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"not a bool\"");
        assert!(matches!(result, Err(RoutingError::ConfigurationError(_))));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "debug": false,
            "method_fallback": false
        }"#;

        let settings = from_json_str(json).unwrap();
        assert!(!settings.debug);
        assert!(!settings.method_fallback);
        assert!(settings.check_requirements);
    }

    #[test]
    fn test_from_json_str_default_context() {
        let json = r#"{
            "default_context": {
                "scheme": "https",
                "host": "example.com",
                "port": 443,
                "base_path": "",
                "http_port": 8080,
                "https_port": null
            }
        }"#;

        let settings = from_json_str(json).unwrap();
        let ctx = settings.default_context.unwrap();
        assert_eq!(ctx.http_port, Some(8080));
        assert_eq!(ctx.https_port, None);
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "wayfinder_settings_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.log_level, "warn");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/wayfinder/settings.toml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
    }

    #[test]
    fn test_from_json_file_missing() {
        assert!(from_json_file("/nonexistent/wayfinder/settings.json").is_err());
    }

    // ── Overrides ───────────────────────────────────────────────────

    #[test]
    fn test_apply_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WAYFINDER_DEBUG", "0"),
            ("WAYFINDER_LOG_LEVEL", "trace"),
            ("WAYFINDER_METHOD_FALLBACK", "no"),
            ("WAYFINDER_CHECK_REQUIREMENTS", "YES"),
            ("WAYFINDER_HOST", "example.org"),
            ("WAYFINDER_PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.check_requirements = false;
        apply_overrides(&mut settings, |key| vars.get(key).map(|v| (*v).to_string()));

        assert!(!settings.debug);
        assert_eq!(settings.log_level, "trace");
        assert!(!settings.method_fallback);
        assert!(settings.check_requirements);

        let ctx = settings.default_context.unwrap();
        assert_eq!(ctx.host, "example.org");
        assert_eq!(ctx.port, 8080);
        // Untouched context fields start from defaults
        assert_eq!(ctx.scheme, "http");
    }

    #[test]
    fn test_apply_overrides_bad_port_ignored() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, |key| {
            (key == "WAYFINDER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(settings.default_context.is_none());
    }

    #[test]
    fn test_apply_overrides_none_set() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, |_| None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overlay_merges_tables() {
        let mut base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": 3, "e": null});
        overlay(
            &mut base,
            serde_json::json!({"a": {"b": 10}, "d": [4], "e": {"f": true}}),
        );
        assert_eq!(
            base,
            serde_json::json!({"a": {"b": 10, "c": 2}, "d": [4], "e": {"f": true}})
        );
    }

    #[test]
    fn test_from_json_file_with_env_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "wayfinder_settings_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"default_path_requirement": "\\d+"}"#).unwrap();

        let settings = from_json_file_with_env(&path).unwrap();
        assert_eq!(settings.default_path_requirement, r"\d+");

        std::fs::remove_file(&path).ok();
    }
}
