//! Fluent route configuration.
//!
//! A [`RouteBuilder`] collects pattern strings and constraints and compiles
//! them into a [`Route`] on [`build`](RouteBuilder::build). Builders are
//! usually obtained from a [`RouteCollector`](crate::collector::RouteCollector).

use http::Method;

use wayfinder_core::{RoutingError, RoutingResult};

use crate::compiler::PatternCompiler;
use crate::pattern::{Parameters, Requirements};
use crate::route::{Attributes, MethodConstraint, Route};
use crate::scheme::Scheme;

/// Methods accepted by [`RouteBuilder::allowed_methods`].
const VALID_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

/// Builds a single [`Route`].
///
/// # Examples
///
/// ```
/// use wayfinder_routing::builder::RouteBuilder;
/// use wayfinder_routing::compiler::PatternCompiler;
///
/// let mut builder = RouteBuilder::new(PatternCompiler::new(), "article");
/// builder
///     .allowed_methods(["GET"])
///     .unwrap()
///     .path("/article/{id}")
///     .requirement("id", r"\d+");
///
/// let route = builder.build().unwrap();
/// assert_eq!(route.dump(), "GET /article/{id}");
/// ```
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    compiler: PatternCompiler,
    name: String,
    methods: MethodConstraint,
    scheme: Option<Scheme>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    defaults: Parameters,
    attributes: Attributes,
    requirements: Requirements,
}

impl RouteBuilder {
    pub fn new(compiler: PatternCompiler, name: impl Into<String>) -> Self {
        Self {
            compiler,
            name: name.into(),
            methods: MethodConstraint::Any,
            scheme: None,
            host: None,
            port: None,
            path: None,
            defaults: Parameters::new(),
            attributes: Attributes::new(),
            requirements: Requirements::new(),
        }
    }

    /// Returns a copy of this builder under a different name.
    #[must_use]
    pub fn copy(&self, new_name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.name = new_name.into();
        copy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn methods(&self) -> &MethodConstraint {
        &self.methods
    }

    /// Restricts the route to the given methods. An empty list yields a
    /// route that never matches.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidMethod`] for anything other than an
    /// uppercase GET, HEAD, POST, PUT, DELETE, CONNECT, OPTIONS, TRACE or
    /// PATCH. The builder is left unchanged in that case.
    pub fn allowed_methods<I, S>(&mut self, methods: I) -> RoutingResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let methods = methods
            .into_iter()
            .map(|method| parse_method(method.as_ref()))
            .collect::<RoutingResult<Vec<_>>>()?;

        self.methods = MethodConstraint::only(methods);
        Ok(self)
    }

    pub(crate) fn set_methods(&mut self, methods: MethodConstraint) -> &mut Self {
        self.methods = methods;
        self
    }

    /// Removes any method restriction.
    pub fn any_method(&mut self) -> &mut Self {
        self.methods = MethodConstraint::Any;
        self
    }

    pub const fn scheme_constraint(&self) -> Option<Scheme> {
        self.scheme
    }

    pub fn scheme(&mut self, scheme: Option<Scheme>) -> &mut Self {
        self.scheme = scheme;
        self
    }

    pub fn host_pattern(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn host(&mut self, pattern: Option<&str>) -> &mut Self {
        self.host = pattern.map(str::to_string);
        self
    }

    pub fn prepend_host(&mut self, prefix: &str) -> &mut Self {
        let current = self.host.take().unwrap_or_default();
        self.host = Some(format!("{prefix}{current}"));
        self
    }

    pub fn append_host(&mut self, suffix: &str) -> &mut Self {
        self.host.get_or_insert_with(String::new).push_str(suffix);
        self
    }

    pub const fn port_constraint(&self) -> Option<u16> {
        self.port
    }

    pub fn port(&mut self, port: Option<u16>) -> &mut Self {
        self.port = port;
        self
    }

    pub fn path_pattern(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn path(&mut self, pattern: &str) -> &mut Self {
        self.path = Some(pattern.to_string());
        self
    }

    pub fn prepend_path(&mut self, prefix: &str) -> &mut Self {
        let current = self.path.take().unwrap_or_default();
        self.path = Some(format!("{prefix}{current}"));
        self
    }

    pub fn append_path(&mut self, suffix: &str) -> &mut Self {
        self.path.get_or_insert_with(String::new).push_str(suffix);
        self
    }

    pub const fn default_parameters(&self) -> &Parameters {
        &self.defaults
    }

    pub fn defaults(&mut self, defaults: Parameters) -> &mut Self {
        self.defaults = defaults;
        self
    }

    pub const fn route_attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes(&mut self, attributes: Attributes) -> &mut Self {
        self.attributes = attributes;
        self
    }

    pub const fn parameter_requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Replaces all requirements.
    pub fn requirements(&mut self, requirements: Requirements) -> &mut Self {
        self.requirements = requirements;
        self
    }

    /// Sets the requirement of one parameter.
    pub fn requirement(&mut self, parameter: &str, regex: &str) -> &mut Self {
        self.requirements
            .insert(parameter.to_string(), regex.to_string());
        self
    }

    /// Compiles the configured patterns into a route.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::BuildFailure`] if no path pattern was set or a
    /// pattern or requirement does not compile.
    pub fn build(&self) -> RoutingResult<Route> {
        let failure = |reason: String| RoutingError::BuildFailure {
            route: self.name.clone(),
            reason,
        };

        let path_source = self
            .path
            .as_deref()
            .ok_or_else(|| failure("Path pattern must be specified".to_string()))?;

        let host = self
            .host
            .as_deref()
            .map(|source| self.compiler.compile_pattern(source, &self.requirements))
            .transpose()
            .map_err(|e| failure(e.to_string()))?;

        let path = self
            .compiler
            .compile_path_pattern(path_source, &self.requirements)
            .map_err(|e| failure(e.to_string()))?;

        Ok(Route::new(self.name.clone(), path)
            .with_methods(self.methods.clone())
            .with_scheme(self.scheme)
            .with_host(host)
            .with_port(self.port)
            .with_defaults(self.defaults.clone())
            .with_attributes(self.attributes.clone()))
    }
}

fn parse_method(method: &str) -> RoutingResult<Method> {
    VALID_METHODS
        .iter()
        .find(|valid| valid.as_str() == method)
        .cloned()
        .ok_or_else(|| RoutingError::InvalidMethod {
            method: method.to_string(),
            valid: VALID_METHODS
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
