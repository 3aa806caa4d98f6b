//! Generation and matching context.
//!
//! A [`Context`] describes where the application is served from: the scheme,
//! host and port a client reaches it on, and the base path it is mounted
//! under. URL generation falls back to it for anything a route does not
//! constrain, and decides between absolute and relative output by comparing
//! against it.

use wayfinder_core::{ContextSettings, RoutingError};

use crate::scheme::Scheme;
use crate::url::Url;

/// Where the application is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: String,
    http_port: Option<u16>,
    https_port: Option<u16>,
}

impl Context {
    /// Creates a context. `base_path` is prepended to every generated path
    /// and should not end with a slash.
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16, base_path: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
            base_path: base_path.into(),
            http_port: None,
            https_port: None,
        }
    }

    /// Sets the port used for `http` URLs when the context itself is not `http`.
    #[must_use]
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = Some(port);
        self
    }

    /// Sets the port used for `https` URLs when the context itself is not `https`.
    #[must_use]
    pub fn with_https_port(mut self, port: u16) -> Self {
        self.https_port = Some(port);
        self
    }

    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub const fn http_port(&self) -> Option<u16> {
        self.http_port
    }

    pub const fn https_port(&self) -> Option<u16> {
        self.https_port
    }

    /// Returns the port to use for a URL with the given scheme.
    ///
    /// An explicitly configured per-scheme port always wins. Otherwise the
    /// context's own port is used for its own scheme, and the standard port
    /// for the other one.
    pub fn port_for_scheme(&self, scheme: Scheme) -> u16 {
        let configured = match scheme {
            Scheme::Http => self.http_port,
            Scheme::Https => self.https_port,
        };

        match configured {
            Some(port) => port,
            None if self.scheme == scheme => self.port,
            None => scheme.default_port(),
        }
    }

    /// Removes the base path from a request path.
    ///
    /// Returns `None` if the path is not under the base path. The base path
    /// only matches on a segment boundary, so `/app` strips `/app/x` and
    /// `/app` but not `/application`.
    pub fn strip_base_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.base_path.is_empty() {
            return Some(path);
        }

        let rest = path.strip_prefix(self.base_path.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    /// Returns the URL of the application root.
    pub fn base_url(&self) -> Url {
        let port = (self.port != self.scheme.default_port()).then_some(self.port);
        Url::new(self.scheme, self.host.clone())
            .with_port(port)
            .with_path(self.base_path.clone())
    }
}

impl TryFrom<&ContextSettings> for Context {
    type Error = RoutingError;

    fn try_from(settings: &ContextSettings) -> Result<Self, Self::Error> {
        let mut context = Self::new(
            settings.scheme.parse()?,
            settings.host.clone(),
            settings.port,
            settings.base_path.clone(),
        );
        context.http_port = settings.http_port;
        context.https_port = settings.https_port;
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_for_scheme() {
        let cases = [
            // (context scheme, context port, http_port, https_port, expected http, expected https)
            (Scheme::Http, 80, None, None, 80, 443),
            (Scheme::Http, 8080, None, None, 8080, 443),
            (Scheme::Https, 443, None, None, 80, 443),
            (Scheme::Https, 8443, None, None, 80, 8443),
            (Scheme::Http, 8080, Some(8081), Some(8443), 8081, 8443),
            (Scheme::Https, 8443, Some(8080), None, 8080, 8443),
            (Scheme::Http, 8080, None, Some(9443), 8080, 9443),
        ];

        for (scheme, port, http_port, https_port, expected_http, expected_https) in cases {
            let mut context = Context::new(scheme, "localhost", port, "");
            if let Some(p) = http_port {
                context = context.with_http_port(p);
            }
            if let Some(p) = https_port {
                context = context.with_https_port(p);
            }

            assert_eq!(context.port_for_scheme(Scheme::Http), expected_http, "{context:?}");
            assert_eq!(context.port_for_scheme(Scheme::Https), expected_https, "{context:?}");
        }
    }

    #[test]
    fn test_strip_base_path() {
        let context = Context::new(Scheme::Http, "localhost", 80, "/app");
        assert_eq!(context.strip_base_path("/app/page"), Some("/page"));
        assert_eq!(context.strip_base_path("/app"), Some(""));
        assert_eq!(context.strip_base_path("/application"), None);
        assert_eq!(context.strip_base_path("/other"), None);

        let root = Context::new(Scheme::Http, "localhost", 80, "");
        assert_eq!(root.strip_base_path("/page"), Some("/page"));
    }

    #[test]
    fn test_base_url() {
        let context = Context::new(Scheme::Https, "example.com", 443, "/app");
        assert_eq!(context.base_url().to_string(), "https://example.com/app");

        let context = Context::new(Scheme::Http, "example.com", 8080, "");
        assert_eq!(context.base_url().to_string(), "http://example.com:8080");
    }

    #[test]
    fn test_from_settings() {
        let settings = ContextSettings {
            scheme: "https".into(),
            host: "example.com".into(),
            port: 8443,
            base_path: "/app".into(),
            http_port: Some(8080),
            https_port: None,
        };
        let context = Context::try_from(&settings).unwrap();
        assert_eq!(context.scheme(), Scheme::Https);
        assert_eq!(context.host(), "example.com");
        assert_eq!(context.base_path(), "/app");
        assert_eq!(context.port_for_scheme(Scheme::Http), 8080);
        assert_eq!(context.port_for_scheme(Scheme::Https), 8443);
    }

    #[test]
    fn test_from_settings_invalid_scheme() {
        let settings = ContextSettings {
            scheme: "gopher".into(),
            ..ContextSettings::default()
        };
        assert!(matches!(
            Context::try_from(&settings),
            Err(RoutingError::InvalidScheme(_))
        ));
    }
}
