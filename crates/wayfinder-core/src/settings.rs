//! Settings for wayfinder.
//!
//! This module provides the [`Settings`] struct, which holds router-wide
//! configuration, and [`ContextSettings`], the serializable form of a request
//! context used to fill in scheme, host and port when matching by path or
//! generating URLs.

use serde::{Deserialize, Serialize};

/// Serializable description of a default request context.
///
/// The routing crate converts this into its `Context` type. Missing fields
/// take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// The scheme, `"http"` or `"https"`.
    pub scheme: String,
    /// The host name.
    pub host: String,
    /// The port the application is served on.
    pub port: u16,
    /// Path prefix the application is mounted under (e.g. `"/app"`).
    pub base_path: String,
    /// Port to use when generating `http` URLs, if it differs from the default.
    pub http_port: Option<u16>,
    /// Port to use when generating `https` URLs, if it differs from the default.
    pub https_port: Option<u16>,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 80,
            base_path: String::new(),
            http_port: None,
            https_port: None,
        }
    }
}

/// The complete set of router settings.
///
/// # Examples
///
/// ```
/// use wayfinder_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.check_requirements);
/// assert_eq!(settings.default_path_requirement, "[^/]+");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Logging ──────────────────────────────────────────────────────

    /// Whether debug mode (pretty log output) is enabled.
    pub debug: bool,
    /// The log level filter (e.g. "info", "debug", "wayfinder_routing=trace").
    pub log_level: String,

    // ── Matching ─────────────────────────────────────────────────────

    /// Whether a HEAD request may fall back to a GET route.
    pub method_fallback: bool,

    // ── Generation ───────────────────────────────────────────────────

    /// Whether generated parameter values are validated against their requirements.
    pub check_requirements: bool,

    // ── Patterns ─────────────────────────────────────────────────────

    /// Requirement used for host-pattern placeholders without an explicit one.
    pub default_requirement: String,
    /// Requirement used for path-pattern placeholders without an explicit one.
    pub default_path_requirement: String,

    // ── Context ──────────────────────────────────────────────────────

    /// The default context, if any.
    pub default_context: Option<ContextSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            method_fallback: true,
            check_requirements: true,
            default_requirement: ".+".to_string(),
            default_path_requirement: "[^/]+".to_string(),
            default_context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert!(s.method_fallback);
        assert!(s.check_requirements);
        assert_eq!(s.default_requirement, ".+");
        assert!(s.default_context.is_none());
    }

    #[test]
    fn test_default_context_settings() {
        let c = ContextSettings::default();
        assert_eq!(c.scheme, "http");
        assert_eq!(c.host, "localhost");
        assert_eq!(c.port, 80);
        assert!(c.base_path.is_empty());
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let mut s = Settings::default();
        s.default_context = Some(ContextSettings {
            scheme: "https".into(),
            host: "example.com".into(),
            port: 443,
            base_path: "/app".into(),
            http_port: None,
            https_port: Some(8443),
        });
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
