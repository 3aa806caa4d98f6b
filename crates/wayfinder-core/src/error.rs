//! Core error types for wayfinder.
//!
//! This module provides the [`RoutingError`] enum covering URL generation,
//! route lookup, route building, pattern compilation and configuration
//! failures.
//!
//! A pattern or route that simply does not match is *not* an error: matching
//! operations return `Option`, and only the router turns a failed match into a
//! not-found or method-not-allowed outcome.

use thiserror::Error;

/// The primary error type for wayfinder.
#[derive(Error, Debug)]
pub enum RoutingError {
    // ── Generation ───────────────────────────────────────────────────

    /// A placeholder's parameter was not supplied when generating.
    #[error("Missing parameter \"{0}\"")]
    MissingParameter(String),

    /// A supplied parameter value does not satisfy its requirement.
    #[error("Parameter \"{name}\" must match \"{requirement}\"")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The anchored requirement the value was checked against.
        requirement: String,
    },

    // ── Lookup ───────────────────────────────────────────────────────

    /// No route (or route builder) is registered under the given name.
    #[error("There is no route named \"{0}\"")]
    RouteNotFound(String),

    // ── Route building ───────────────────────────────────────────────

    /// A route builder could not produce a route.
    #[error("Failed when building route \"{route}\" - {reason}")]
    BuildFailure {
        /// The name of the route being built.
        route: String,
        /// Why the build failed.
        reason: String,
    },

    /// An HTTP method outside the supported set was configured.
    #[error("Invalid method \"{method}\", valid methods are: {valid}")]
    InvalidMethod {
        /// The rejected method token.
        method: String,
        /// Comma-separated list of accepted methods.
        valid: String,
    },

    /// A scheme other than `http` or `https` was configured.
    #[error("Invalid scheme \"{0}\"")]
    InvalidScheme(String),

    // ── Pattern compilation ──────────────────────────────────────────

    /// A parameter requirement is not a valid regular expression.
    #[error("Invalid requirement for parameter \"{parameter}\": {reason}")]
    InvalidRequirement {
        /// The parameter the requirement belongs to.
        parameter: String,
        /// The regex compiler's message.
        reason: String,
    },

    /// The regex composed from a pattern could not be compiled.
    #[error("Invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern string.
        pattern: String,
        /// The regex compiler's message.
        reason: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// An operation needed the router's default context but none is set.
    #[error("Default context is not defined")]
    NoDefaultContext,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl RoutingError {
    /// Returns `true` for errors raised while generating a URL from
    /// parameters (as opposed to lookup or configuration errors).
    pub const fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidParameter { .. }
        )
    }
}

/// A convenience type alias for `Result<T, RoutingError>`.
pub type RoutingResult<T> = Result<T, RoutingError>;
