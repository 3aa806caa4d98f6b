//! Routes.
//!
//! A [`Route`] combines an optional host [`Pattern`], a [`PathPattern`] and
//! method, scheme and port constraints. It matches full request subjects and
//! generates full URLs.

use std::collections::{HashMap, HashSet};
use std::fmt;

use http::Method;
use tracing::trace;

use wayfinder_core::RoutingResult;

use crate::context::Context;
use crate::pattern::{Parameters, PathPattern, Pattern};
use crate::scheme::Scheme;
use crate::subject::Subject;
use crate::url::{Url, UrlFormat};

/// Opaque per-route metadata. The router never interprets it.
pub type Attributes = HashMap<String, serde_json::Value>;

/// Which HTTP methods a route accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MethodConstraint {
    /// Any method, including none at all.
    #[default]
    Any,
    /// Only the listed methods. An empty list matches nothing.
    Only(Vec<Method>),
}

impl MethodConstraint {
    /// Builds an `Only` constraint, dropping duplicates but keeping order.
    pub fn only(methods: impl IntoIterator<Item = Method>) -> Self {
        let mut unique: Vec<Method> = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        Self::Only(unique)
    }

    /// A constraint no method satisfies.
    pub const fn none() -> Self {
        Self::Only(Vec::new())
    }

    pub fn allows(&self, method: Option<&Method>) -> bool {
        match (self, method) {
            (Self::Any, _) => true,
            (Self::Only(methods), Some(method)) => methods.contains(method),
            (Self::Only(_), None) => false,
        }
    }

    /// Returns the listed methods, or `None` for `Any`.
    pub fn methods(&self) -> Option<&[Method]> {
        match self {
            Self::Any => None,
            Self::Only(methods) => Some(methods),
        }
    }
}

impl fmt::Display for MethodConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("ANY"),
            Self::Only(methods) if methods.is_empty() => f.write_str("NONE"),
            Self::Only(methods) => {
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    f.write_str(method.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// A named route.
///
/// Routes are immutable once built; the `with_*` methods consume and return
/// the route and are meant for construction. Most code builds routes through
/// [`RouteBuilder`](crate::builder::RouteBuilder) instead.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    methods: MethodConstraint,
    scheme: Option<Scheme>,
    host: Option<Pattern>,
    port: Option<u16>,
    path: PathPattern,
    defaults: Parameters,
    attributes: Attributes,
    /// Placeholder names of the host and path patterns
    known_parameters: HashSet<String>,
}

impl Route {
    pub fn new(name: impl Into<String>, path: PathPattern) -> Self {
        let mut route = Self {
            name: name.into(),
            methods: MethodConstraint::Any,
            scheme: None,
            host: None,
            port: None,
            path,
            defaults: Parameters::new(),
            attributes: Attributes::new(),
            known_parameters: HashSet::new(),
        };
        route.collect_known_parameters();
        route
    }

    #[must_use]
    pub fn with_methods(mut self, methods: MethodConstraint) -> Self {
        self.methods = methods;
        self
    }

    #[must_use]
    pub const fn with_scheme(mut self, scheme: Option<Scheme>) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: Option<Pattern>) -> Self {
        self.host = host;
        self.collect_known_parameters();
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: Parameters) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    fn collect_known_parameters(&mut self) {
        self.known_parameters = self
            .host
            .iter()
            .flat_map(Pattern::parameter_names)
            .chain(self.path.parameter_names())
            .map(str::to_string)
            .collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn methods(&self) -> &MethodConstraint {
        &self.methods
    }

    pub const fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    pub const fn host(&self) -> Option<&Pattern> {
        self.host.as_ref()
    }

    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    pub const fn path(&self) -> &PathPattern {
        &self.path
    }

    pub const fn defaults(&self) -> &Parameters {
        &self.defaults
    }

    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Returns `true` if `name` is a host or path placeholder.
    pub fn is_known_parameter(&self, name: &str) -> bool {
        self.known_parameters.contains(name)
    }

    /// Matches the route against a subject.
    ///
    /// Constraints are checked in order (method, scheme, host, port, path) and
    /// the first failure short-circuits. With `ignore_method` the method
    /// constraint is skipped entirely.
    ///
    /// On success returns the defaults overlaid by host parameters, overlaid
    /// by path parameters.
    pub fn match_subject(&self, subject: &Subject, ignore_method: bool) -> Option<Parameters> {
        if !ignore_method && !self.methods.allows(subject.method.as_ref()) {
            return None;
        }

        if let Some(scheme) = self.scheme {
            if subject.scheme != Some(scheme) {
                return None;
            }
        }

        let host_parameters = match &self.host {
            Some(pattern) => pattern.match_subject(subject.host.as_deref()?)?,
            None => Parameters::new(),
        };

        if let Some(port) = self.port {
            if subject.port != Some(port) {
                return None;
            }
        }

        let path_parameters = self.path.match_subject(&subject.path)?;

        let mut parameters = self.defaults.clone();
        parameters.extend(host_parameters);
        parameters.extend(path_parameters);

        Some(parameters)
    }

    /// Generates a URL for this route.
    ///
    /// `parameters` overlay the route defaults. Anything the route does not
    /// constrain comes from `context`, and parameters that are not host or
    /// path placeholders end up in the query.
    ///
    /// # Errors
    ///
    /// Returns [`MissingParameter`](wayfinder_core::RoutingError::MissingParameter)
    /// or [`InvalidParameter`](wayfinder_core::RoutingError::InvalidParameter)
    /// from host or path generation.
    pub fn generate(
        &self,
        context: &Context,
        parameters: &Parameters,
        check_requirements: bool,
    ) -> RoutingResult<Url> {
        let mut merged = self.defaults.clone();
        merged.extend(parameters.iter().map(|(k, v)| (k.clone(), v.clone())));

        let scheme = self.scheme.unwrap_or_else(|| context.scheme());
        let host = match &self.host {
            Some(pattern) => pattern.generate(&merged, check_requirements)?,
            None => context.host().to_string(),
        };
        let port = self.port.unwrap_or_else(|| context.port_for_scheme(scheme));
        let path = format!(
            "{}{}",
            context.base_path(),
            self.path.generate(&merged, check_requirements)?
        );

        let format = if scheme != context.scheme() || host != context.host() || port != context.port() {
            UrlFormat::Absolute
        } else {
            UrlFormat::Relative
        };

        let query: Parameters = merged
            .into_iter()
            .filter(|(name, _)| !self.known_parameters.contains(name))
            .collect();

        trace!(route = %self.name, %path, ?format, "Generated URL");

        Ok(Url::new(scheme, host)
            .with_port((port != scheme.default_port()).then_some(port))
            .with_path(path)
            .with_query(query)
            .with_format(format))
    }

    /// Renders the route for humans, e.g. `GET|POST https://{sub}.example.com:8080/page/{id}`.
    pub fn dump(&self) -> String {
        let mut dump = format!("{} ", self.methods);

        if let Some(scheme) = self.scheme {
            dump.push_str(scheme.as_str());
            dump.push_str("://");
        }

        if let Some(host) = &self.host {
            dump.push_str(&host.dump());
        } else if self.scheme.is_some() || self.port.is_some() {
            dump.push('*');
        }

        if let Some(port) = self.port {
            dump.push(':');
            dump.push_str(&port.to_string());
        }

        dump.push_str(&self.path.dump());
        dump
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
