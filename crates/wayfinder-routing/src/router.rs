//! The router: ordered matching and URL generation by route name.
//!
//! Matching a [`Subject`] runs in four phases:
//!
//! 1. Scan routes in registration order; the first route that matches wins.
//! 2. If the [`MethodFallback`] policy maps the subject's method to another
//!    one (by default `HEAD` to `GET`), scan again with that method. The
//!    result still carries the original subject.
//! 3. Scan again ignoring the method. If any method-restricted route matches,
//!    the result is [`MatchResult::MethodNotAllowed`] with the union of their
//!    methods.
//! 4. Otherwise the result is [`MatchResult::NotFound`].
//!
//! # Concurrency
//!
//! A `Router` is `Send + Sync`. Matching and generation take `&self` and
//! never mutate it, so any number of threads may use a shared router.
//! Changing the route set takes `&mut self` and therefore cannot overlap with
//! reads. To update routes while serving, wrap the router in a
//! `std::sync::RwLock`, or build a new router and swap it in (for example
//! behind an `Arc`).

use std::fmt;

use http::{Method, Uri};
use tracing::{debug, trace};

use wayfinder_core::logging::match_span;
use wayfinder_core::{RoutingError, RoutingResult, Settings};

use crate::collector::RouteCollector;
use crate::compiler::PatternCompiler;
use crate::context::Context;
use crate::named::NamedSet;
use crate::pattern::Parameters;
use crate::result::{MatchResult, RouteMatch};
use crate::route::Route;
use crate::subject::Subject;
use crate::url::Url;

/// Chooses a method to retry with when nothing matched the requested one.
pub trait MethodFallback: Send + Sync + fmt::Debug {
    /// Returns the substitute for `method`, or `None` to skip the retry.
    fn fallback(&self, method: &Method) -> Option<Method>;
}

/// Serves `HEAD` requests with `GET` routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadToGet;

impl MethodFallback for HeadToGet {
    fn fallback(&self, method: &Method) -> Option<Method> {
        (*method == Method::HEAD).then_some(Method::GET)
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl MethodFallback for NoFallback {
    fn fallback(&self, _method: &Method) -> Option<Method> {
        None
    }
}

/// Matches requests against named routes and generates URLs for them.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use wayfinder_routing::{Context, MatchResult, Parameters, Router, Scheme};
///
/// let mut router = Router::new();
/// router.set_default_context(Some(Context::new(Scheme::Https, "example.com", 443, "")));
/// router
///     .define_routes(|routes| {
///         routes.get("index").path("/");
///         routes.get("article").path("/article/{id}").requirement("id", r"\d+");
///         routes.post("comment").path("/article/{id}/comments").requirement("id", r"\d+");
///     })
///     .unwrap();
///
/// let result = router.match_path(Method::GET, "/article/42", None).unwrap();
/// assert_eq!(result.route().unwrap().name(), "article");
/// assert_eq!(result.parameters().unwrap()["id"], "42");
///
/// let result = router.match_path(Method::GET, "/article/42/comments", None).unwrap();
/// assert!(matches!(result, MatchResult::MethodNotAllowed { .. }));
///
/// let params = Parameters::from([("id".to_string(), "7".to_string())]);
/// assert_eq!(router.generate("article", &params).unwrap().to_string(), "/article/7");
/// ```
#[derive(Debug)]
pub struct Router {
    routes: NamedSet<Route>,
    default_context: Option<Context>,
    compiler: PatternCompiler,
    fallback: Box<dyn MethodFallback>,
    check_requirements: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router with `HEAD`-to-`GET` fallback and requirement
    /// checking enabled.
    pub fn new() -> Self {
        Self {
            routes: NamedSet::new(),
            default_context: None,
            compiler: PatternCompiler::new(),
            fallback: Box::new(HeadToGet),
            check_requirements: true,
        }
    }

    /// Creates an empty router configured from settings.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidScheme`] if the configured default
    /// context has an unsupported scheme.
    pub fn from_settings(settings: &Settings) -> RoutingResult<Self> {
        let default_context = settings
            .default_context
            .as_ref()
            .map(Context::try_from)
            .transpose()?;

        let fallback: Box<dyn MethodFallback> = if settings.method_fallback {
            Box::new(HeadToGet)
        } else {
            Box::new(NoFallback)
        };

        Ok(Self {
            routes: NamedSet::new(),
            default_context,
            compiler: PatternCompiler::from_settings(settings),
            fallback,
            check_requirements: settings.check_requirements,
        })
    }

    /// Replaces the method fallback policy.
    #[must_use]
    pub fn with_method_fallback(mut self, fallback: impl MethodFallback + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub const fn compiler(&self) -> &PatternCompiler {
        &self.compiler
    }

    pub const fn default_context(&self) -> Option<&Context> {
        self.default_context.as_ref()
    }

    pub fn set_default_context(&mut self, context: Option<Context>) {
        self.default_context = context;
    }

    /// Whether [`generate`](Self::generate) validates parameter values.
    pub const fn check_requirements(&self) -> bool {
        self.check_requirements
    }

    pub fn set_check_requirements(&mut self, check: bool) {
        self.check_requirements = check;
    }

    /// Returns the routes in matching order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains(name)
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Replaces all routes.
    pub fn set_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        self.routes.clear();
        self.add_routes(routes);
    }

    /// Appends routes. A route whose name is already registered replaces the
    /// existing one in place.
    pub fn add_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        for route in routes {
            self.add_route(route);
        }
    }

    pub fn add_route(&mut self, route: Route) {
        debug!(route = %route.name(), dump = %route.dump(), "Registering route");
        let name = route.name().to_string();
        self.routes.insert(&name, route);
    }

    pub fn remove_route(&mut self, name: &str) -> Option<Route> {
        self.routes.remove(name)
    }

    /// Defines routes through a [`RouteCollector`] sharing this router's
    /// compiler, then appends them.
    ///
    /// # Errors
    ///
    /// Returns the first [`RoutingError::BuildFailure`]; no routes are added
    /// in that case.
    pub fn define_routes<F>(&mut self, define: F) -> RoutingResult<()>
    where
        F: FnOnce(&mut RouteCollector),
    {
        let mut collector = RouteCollector::new(self.compiler.clone());
        define(&mut collector);
        let routes = collector.build_routes()?;
        self.add_routes(routes);
        Ok(())
    }

    /// Matches a subject against the routes.
    pub fn match_subject(&self, subject: &Subject) -> MatchResult<'_> {
        let _span = match_span(subject.method_str(), &subject.path).entered();

        if let Some((route, parameters)) = self.find(subject) {
            debug!(route = %route.name(), "Matched route");
            return MatchResult::Match(RouteMatch {
                subject: subject.clone(),
                route,
                parameters,
            });
        }

        if let Some(method) = subject.method.as_ref().and_then(|m| self.fallback.fallback(m)) {
            trace!(fallback = %method, "Retrying with fallback method");
            let substituted = subject.clone().with_method(method);

            if let Some((route, parameters)) = self.find(&substituted) {
                debug!(route = %route.name(), "Matched route via method fallback");
                return MatchResult::Match(RouteMatch {
                    subject: subject.clone(),
                    route,
                    parameters,
                });
            }
        }

        let allowed_methods = self.allowed_methods(subject);
        if !allowed_methods.is_empty() {
            debug!(?allowed_methods, "Method not allowed");
            return MatchResult::MethodNotAllowed {
                subject: subject.clone(),
                allowed_methods,
            };
        }

        debug!("No route matched");
        MatchResult::NotFound {
            subject: subject.clone(),
        }
    }

    fn find(&self, subject: &Subject) -> Option<(&Route, Parameters)> {
        self.routes.values().find_map(|route| {
            route
                .match_subject(subject, false)
                .map(|parameters| (route, parameters))
        })
    }

    /// Methods of method-restricted routes that match ignoring the method.
    fn allowed_methods(&self, subject: &Subject) -> Vec<Method> {
        let mut allowed: Vec<Method> = Vec::new();

        for route in self.routes.values() {
            let Some(methods) = route.methods().methods() else {
                continue;
            };
            if methods.is_empty() || route.match_subject(subject, true).is_none() {
                continue;
            }

            for method in methods {
                if !allowed.contains(method) {
                    allowed.push(method.clone());
                }
            }
        }

        allowed
    }

    fn context<'a>(&'a self, context: Option<&'a Context>) -> RoutingResult<&'a Context> {
        context
            .or(self.default_context.as_ref())
            .ok_or(RoutingError::NoDefaultContext)
    }

    /// Matches a path on the given context (or the default context).
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NoDefaultContext`] if no context is given and
    /// none is configured.
    pub fn match_path(
        &self,
        method: Method,
        path: &str,
        context: Option<&Context>,
    ) -> RoutingResult<MatchResult<'_>> {
        let context = self.context(context)?;
        Ok(self.match_subject(&Subject::from_context(method, path, context)))
    }

    /// Matches a request URI. The context's base path is stripped first; a
    /// URI outside it, or one whose scheme is neither `http` nor `https`, is
    /// not found.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NoDefaultContext`] if no context is given and
    /// none is configured.
    pub fn match_uri(
        &self,
        method: Method,
        uri: &Uri,
        context: Option<&Context>,
    ) -> RoutingResult<MatchResult<'_>> {
        let context = self.context(context)?;

        match Subject::from_uri(method.clone(), uri, context) {
            Some(subject) => Ok(self.match_subject(&subject)),
            None => {
                if context.strip_base_path(uri.path()).is_none() {
                    debug!(
                        path = uri.path(),
                        base_path = context.base_path(),
                        "URI outside base path"
                    );
                } else {
                    debug!(scheme = uri.scheme_str(), "Unsupported URI scheme");
                }
                Ok(MatchResult::NotFound {
                    subject: Subject {
                        method: Some(method),
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        ..Subject::default()
                    },
                })
            }
        }
    }

    /// Generates a URL using the default context and the router's
    /// requirement-checking setting.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::RouteNotFound`], [`RoutingError::NoDefaultContext`]
    /// or a generation error from the route.
    pub fn generate(&self, name: &str, parameters: &Parameters) -> RoutingResult<Url> {
        self.generate_with(name, parameters, self.check_requirements, None)
    }

    /// Generates a URL with explicit requirement checking and context.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::RouteNotFound`], [`RoutingError::NoDefaultContext`]
    /// or a generation error from the route.
    pub fn generate_with(
        &self,
        name: &str,
        parameters: &Parameters,
        check_requirements: bool,
        context: Option<&Context>,
    ) -> RoutingResult<Url> {
        let route = self
            .route(name)
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))?;
        let context = self.context(context)?;

        route
            .generate(context, parameters, check_requirements)
            .map_err(|err| {
                if err.is_parameter_error() {
                    debug!(route = name, error = %err, "Rejected generation parameters");
                }
                err
            })
    }
}
