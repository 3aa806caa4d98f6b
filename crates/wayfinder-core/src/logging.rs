//! Logging integration for wayfinder.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-match spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info", "warn",
/// "error"). In debug mode a pretty, human-readable format is used; otherwise
/// a structured JSON format is used.
///
/// Installing a subscriber when one is already set is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for a single route-matching call.
///
/// # Examples
///
/// ```
/// use wayfinder_core::logging::match_span;
///
/// let span = match_span("GET", "/articles/42");
/// let _guard = span.enter();
/// tracing::debug!("matching");
/// ```
pub fn match_span(method: &str, path: &str) -> tracing::Span {
    tracing::debug_span!("route_match", method = method, path = path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_harmless() {
        let settings = Settings {
            debug: false,
            log_level: "not a valid filter [".to_string(),
            ..Settings::default()
        };
        setup_logging(&settings);
        setup_logging(&Settings::default());
    }

    #[test]
    fn test_match_span_enter() {
        let span = match_span("HEAD", "/");
        let _guard = span.enter();
        tracing::trace!("inside span");
    }
}
