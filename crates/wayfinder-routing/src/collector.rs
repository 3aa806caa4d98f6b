//! Collecting route builders.

use http::Method;

use wayfinder_core::{RoutingError, RoutingResult};

use crate::builder::RouteBuilder;
use crate::compiler::PatternCompiler;
use crate::named::NamedSet;
use crate::route::{MethodConstraint, Route};

/// An ordered set of [`RouteBuilder`]s keyed by route name.
///
/// Adding a name that already exists replaces the builder but keeps its
/// position, so the order routes are matched in is the order their names
/// were first added.
///
/// # Examples
///
/// ```
/// use wayfinder_routing::collector::RouteCollector;
///
/// let mut collector = RouteCollector::default();
/// collector.get("index").path("/");
/// collector.add_group("user_", "/user", |group| {
///     group.get("list").path("");
///     group.get("show").path("/{id}");
/// });
///
/// let routes = collector.build_routes().unwrap();
/// let dumps: Vec<String> = routes.iter().map(|r| format!("{} {}", r.name(), r.dump())).collect();
/// assert_eq!(dumps, [
///     "index GET /",
///     "user_list GET /user",
///     "user_show GET /user/{id}",
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteCollector {
    compiler: PatternCompiler,
    builders: NamedSet<RouteBuilder>,
}

impl RouteCollector {
    pub fn new(compiler: PatternCompiler) -> Self {
        Self {
            compiler,
            builders: NamedSet::new(),
        }
    }

    pub const fn compiler(&self) -> &PatternCompiler {
        &self.compiler
    }

    /// Adds a route accepting any method.
    pub fn add(&mut self, name: &str) -> &mut RouteBuilder {
        self.builders
            .insert(name, RouteBuilder::new(self.compiler.clone(), name))
    }

    fn add_with_method(&mut self, name: &str, method: Method) -> &mut RouteBuilder {
        self.add(name)
            .set_methods(MethodConstraint::only([method]))
    }

    pub fn get(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::GET)
    }

    pub fn head(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::HEAD)
    }

    pub fn post(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::POST)
    }

    pub fn put(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::PUT)
    }

    pub fn delete(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::DELETE)
    }

    pub fn options(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::OPTIONS)
    }

    pub fn patch(&mut self, name: &str) -> &mut RouteBuilder {
        self.add_with_method(name, Method::PATCH)
    }

    /// Adds a copy of an existing builder under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::RouteNotFound`] if `existing` was never added.
    pub fn add_variant(&mut self, existing: &str, new_name: &str) -> RoutingResult<&mut RouteBuilder> {
        let variant = self.builder(existing)?.copy(new_name);
        Ok(self.builders.insert(new_name, variant))
    }

    /// Adds the routes defined by `define` with names prefixed by
    /// `name_prefix` and paths prefixed by `path_prefix`.
    pub fn add_group<F>(&mut self, name_prefix: &str, path_prefix: &str, define: F)
    where
        F: FnOnce(&mut Self),
    {
        let mut group = Self::new(self.compiler.clone());
        define(&mut group);

        for builder in group.builders.values() {
            let name = format!("{name_prefix}{}", builder.name());
            let mut prefixed = builder.copy(name.clone());
            prefixed.prepend_path(path_prefix);
            self.builders.insert(&name, prefixed);
        }
    }

    pub fn has_builder(&self, name: &str) -> bool {
        self.builders.contains(name)
    }

    /// # Errors
    ///
    /// Returns [`RoutingError::RouteNotFound`] for an unknown name.
    pub fn builder(&self, name: &str) -> RoutingResult<&RouteBuilder> {
        self.builders
            .get(name)
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`RoutingError::RouteNotFound`] for an unknown name.
    pub fn builder_mut(&mut self, name: &str) -> RoutingResult<&mut RouteBuilder> {
        self.builders
            .get_mut(name)
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))
    }

    pub fn remove_builder(&mut self, name: &str) -> Option<RouteBuilder> {
        self.builders.remove(name)
    }

    /// Returns the builders in insertion order.
    pub fn builders(&self) -> impl Iterator<Item = &RouteBuilder> {
        self.builders.values()
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Builds every route, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RoutingError::BuildFailure`].
    pub fn build_routes(&self) -> RoutingResult<Vec<Route>> {
        self.builders.values().map(RouteBuilder::build).collect()
    }

    pub fn clear(&mut self) {
        self.builders.clear();
    }
}
