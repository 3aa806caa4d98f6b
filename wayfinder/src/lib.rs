//! # wayfinder
//!
//! Pattern-based URL routing.
//!
//! This is the meta-crate that re-exports the wayfinder crates. Depend on
//! `wayfinder` for everything, or on `wayfinder-routing` alone if you do not
//! need the settings loader or logging setup.
//!
//! ```
//! use wayfinder::prelude::*;
//!
//! let settings = wayfinder::core::settings_loader::from_toml_str(
//!     r#"
//!     [default_context]
//!     scheme = "https"
//!     host = "example.com"
//!     port = 443
//!     "#,
//! )
//! .unwrap();
//!
//! let mut router = Router::from_settings(&settings).unwrap();
//! router
//!     .define_routes(|routes| {
//!         routes.get("user").path("/user/{name}");
//!     })
//!     .unwrap();
//!
//! let result = router.match_path(Method::GET, "/user/ada", None).unwrap();
//! assert_eq!(result.parameters().unwrap()["name"], "ada");
//! ```

/// Error types, settings, settings loading and logging setup.
pub use wayfinder_core as core;

/// Pattern compiler, routes, router and URL generation.
pub use wayfinder_routing as routing;

/// Third-party crates appearing in the public API.
pub use http;
pub use serde_json;
pub use tracing;

/// The types most applications need.
pub mod prelude {
    pub use http::Method;

    pub use wayfinder_core::{RoutingError, RoutingResult, Settings};
    pub use wayfinder_routing::{
        Context, MatchResult, Parameters, Requirements, Route, RouteCollector, Router, Scheme,
        Subject, Url, UrlFormat,
    };
}
