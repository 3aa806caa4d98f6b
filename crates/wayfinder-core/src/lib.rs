//! # wayfinder-core
//!
//! Error types, settings and logging shared by the wayfinder crates.
//! This crate has no routing logic of its own.
//!
//! ## Modules
//!
//! - [`error`] - Error type and result alias
//! - [`settings`] - Router settings and the serializable default context
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RoutingError, RoutingResult};
pub use settings::{ContextSettings, Settings};
