//! What the router matches against.

use http::{Method, Uri};

use crate::context::Context;
use crate::scheme::Scheme;

/// A request as seen by the router.
///
/// Every field except `path` is optional. A route that constrains a field
/// never matches a subject that leaves it unset; an unconstrained route
/// ignores it.
///
/// `path` is relative to the application's base path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    pub method: Option<Method>,
    pub scheme: Option<Scheme>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    /// Raw query string, not used for matching
    pub query: Option<String>,
}

impl Subject {
    pub fn new(
        method: Method,
        scheme: Scheme,
        host: impl Into<String>,
        port: u16,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: Some(method),
            scheme: Some(scheme),
            host: Some(host.into()),
            port: Some(port),
            path: path.into(),
            query: None,
        }
    }

    /// A subject carrying only a path.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Returns the same subject with a different method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// A subject for `path` on the context's scheme, host and port.
    pub fn from_context(method: Method, path: impl Into<String>, context: &Context) -> Self {
        Self::new(
            method,
            context.scheme(),
            context.host(),
            context.port(),
            path,
        )
    }

    /// Builds a subject from a request URI.
    ///
    /// Scheme, host and port fall back to the context when the URI does not
    /// carry them (origin-form request targets never do). Returns `None` if
    /// the URI path is outside the context's base path.
    pub fn from_uri(method: Method, uri: &Uri, context: &Context) -> Option<Self> {
        let path = context.strip_base_path(uri.path())?;

        let scheme = match uri.scheme_str() {
            Some(s) => s.parse().ok()?,
            None => context.scheme(),
        };
        let host = uri.host().unwrap_or_else(|| context.host());
        let port = uri.port_u16().unwrap_or_else(|| {
            if uri.host().is_some() {
                scheme.default_port()
            } else {
                context.port()
            }
        });

        Some(Self {
            method: Some(method),
            scheme: Some(scheme),
            host: Some(host.to_string()),
            port: Some(port),
            path: path.to_string(),
            query: uri.query().map(str::to_string),
        })
    }

    /// Returns the method name, or `*` when unset.
    pub fn method_str(&self) -> &str {
        self.method.as_ref().map_or("*", Method::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context::new(Scheme::Https, "example.com", 8443, "/app")
    }

    #[test]
    fn test_for_path() {
        let subject = Subject::for_path("/foo");
        assert_eq!(subject.path, "/foo");
        assert!(subject.method.is_none());
        assert!(subject.host.is_none());
        assert_eq!(subject.method_str(), "*");
    }

    #[test]
    fn test_from_context() {
        let subject = Subject::from_context(Method::POST, "/login", &context());
        assert_eq!(subject.method, Some(Method::POST));
        assert_eq!(subject.scheme, Some(Scheme::Https));
        assert_eq!(subject.host.as_deref(), Some("example.com"));
        assert_eq!(subject.port, Some(8443));
        assert_eq!(subject.path, "/login");
    }

    #[test]
    fn test_from_origin_form_uri() {
        let uri: Uri = "/app/search?q=x".parse().unwrap();
        let subject = Subject::from_uri(Method::GET, &uri, &context()).unwrap();
        assert_eq!(subject.path, "/search");
        assert_eq!(subject.query.as_deref(), Some("q=x"));
        assert_eq!(subject.host.as_deref(), Some("example.com"));
        assert_eq!(subject.port, Some(8443));
    }

    #[test]
    fn test_from_absolute_uri() {
        let uri: Uri = "http://other.org/app/page".parse().unwrap();
        let subject = Subject::from_uri(Method::GET, &uri, &context()).unwrap();
        assert_eq!(subject.scheme, Some(Scheme::Http));
        assert_eq!(subject.host.as_deref(), Some("other.org"));
        assert_eq!(subject.port, Some(80));
        assert_eq!(subject.path, "/page");
    }

    #[test]
    fn test_from_uri_outside_base_path() {
        let uri: Uri = "/elsewhere".parse().unwrap();
        assert!(Subject::from_uri(Method::GET, &uri, &context()).is_none());
    }

    #[test]
    fn test_with_method() {
        let subject = Subject::for_path("/").with_method(Method::DELETE);
        assert_eq!(subject.method_str(), "DELETE");
    }
}
