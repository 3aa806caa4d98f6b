//! # wayfinder-routing
//!
//! Pattern compilation, route matching and URL generation.
//!
//! Patterns such as `/page/{id}-{slug}` are compiled into anchored regexes
//! that extract named parameters, and can generate strings back from
//! parameters. Routes combine a path pattern with optional host, method,
//! scheme and port constraints. The [`Router`] matches request subjects
//! against routes in registration order, falls back from `HEAD` to `GET`,
//! and tells "method not allowed" apart from "not found".
//!
//! ## Modules
//!
//! - [`compiler`] - Turns pattern strings into compiled patterns
//! - [`pattern`] - Compiled patterns: matching, generation and dumping
//! - [`route`] - Routes and their constraints
//! - [`builder`] / [`collector`] - Fluent route definition
//! - [`router`] - Ordered matching and generation by name
//! - [`subject`], [`context`], [`url`], [`scheme`] - Value types
//! - [`result`] - Match outcomes
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use wayfinder_routing::{Context, Parameters, Router, Scheme, Subject};
//!
//! let mut router = Router::new();
//! router
//!     .define_routes(|routes| {
//!         routes.get("page").path("/page/{id}-{slug}").requirement("id", r"\d+");
//!     })
//!     .unwrap();
//!
//! let context = Context::new(Scheme::Https, "example.com", 443, "/blog");
//! let subject = Subject::from_context(Method::GET, "/page/123-hello", &context);
//! let result = router.match_subject(&subject);
//! assert_eq!(result.parameters().unwrap()["slug"], "hello");
//!
//! let params = Parameters::from([
//!     ("id".to_string(), "5".to_string()),
//!     ("slug".to_string(), "rust".to_string()),
//! ]);
//! let url = router.generate_with("page", &params, true, Some(&context)).unwrap();
//! assert_eq!(url.to_string(), "/blog/page/5-rust");
//! ```

pub mod builder;
pub mod collector;
pub mod compiler;
pub mod context;
mod named;
pub mod pattern;
pub mod result;
pub mod route;
pub mod router;
pub mod scheme;
pub mod subject;
pub mod url;

pub use builder::RouteBuilder;
pub use collector::RouteCollector;
pub use compiler::PatternCompiler;
pub use context::Context;
pub use pattern::{Parameters, Part, PathPattern, Pattern, Requirements, SegmentEncoding};
pub use result::{MatchResult, RouteMatch};
pub use route::{Attributes, MethodConstraint, Route};
pub use router::{HeadToGet, MethodFallback, NoFallback, Router};
pub use scheme::Scheme;
pub use subject::Subject;
pub use crate::url::{Url, UrlFormat};

pub use wayfinder_core::{RoutingError, RoutingResult};
