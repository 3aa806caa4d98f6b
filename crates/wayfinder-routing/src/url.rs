//! Generated URLs.
//!
//! [`Url`] is the value returned by URL generation. It keeps its components
//! separate so callers can adjust them, and it remembers whether an absolute
//! or a relative rendering is preferred: generation prefers the relative form
//! when the URL points at the same scheme, host and port as the context it
//! was generated for.

use std::fmt;

use ::url::form_urlencoded;

use crate::pattern::Parameters;
use crate::scheme::Scheme;

/// Which form [`Url`]'s `Display` implementation renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlFormat {
    /// `scheme://host[:port]/path?query`
    Absolute,
    /// `/path?query`
    #[default]
    Relative,
}

/// A URL produced by the router.
///
/// # Examples
///
/// ```
/// use wayfinder_routing::url::{Url, UrlFormat};
/// use wayfinder_routing::Scheme;
///
/// let mut url = Url::new(Scheme::Https, "example.com").with_path("/search");
/// url.query_mut().insert("q".to_string(), "rust router".to_string());
///
/// assert_eq!(url.to_absolute_string(), "https://example.com/search?q=rust+router");
/// assert_eq!(url.to_relative_string(), "/search?q=rust+router");
/// assert_eq!(url.format(), UrlFormat::Absolute);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    scheme: Scheme,
    host: String,
    /// Only set for non-default ports
    port: Option<u16>,
    path: String,
    query: Parameters,
    format: UrlFormat,
}

impl Url {
    /// Creates an absolute URL with an empty path and no query.
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: None,
            path: String::new(),
            query: Parameters::new(),
            format: UrlFormat::Absolute,
        }
    }

    /// Sets the port (`None` for the scheme's default).
    #[must_use]
    pub const fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Parameters) -> Self {
        self.query = query;
        self
    }

    /// Sets the preferred format.
    #[must_use]
    pub const fn with_format(mut self, format: UrlFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the scheme.
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Sets the scheme.
    pub fn set_scheme(&mut self, scheme: Scheme) {
        self.scheme = scheme;
    }

    /// Returns the host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Sets the host.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Returns the explicit port, if the URL has a non-default one.
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the effective port (explicit or the scheme's default).
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Sets the port.
    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    /// Returns the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sets the path.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Returns the query parameters.
    pub const fn query(&self) -> &Parameters {
        &self.query
    }

    /// Returns the query parameters for modification.
    pub fn query_mut(&mut self) -> &mut Parameters {
        &mut self.query
    }

    /// Sets the query parameters.
    pub fn set_query(&mut self, query: Parameters) {
        self.query = query;
    }

    /// Returns the preferred format.
    pub const fn format(&self) -> UrlFormat {
        self.format
    }

    /// Sets the preferred format.
    pub fn set_format(&mut self, format: UrlFormat) {
        self.format = format;
    }

    /// Returns `host` or `host:port`.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        }
    }

    /// Returns the form-urlencoded query, or `None` when there are no parameters.
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.query.iter());
        Some(serializer.finish())
    }

    /// Renders `scheme://authority/path?query`.
    pub fn to_absolute_string(&self) -> String {
        let mut out = format!("{}://{}{}", self.scheme, self.authority(), self.path);
        if let Some(query) = self.query_string() {
            out.push('?');
            out.push_str(&query);
        }
        out
    }

    /// Renders `/path?query`. An empty path renders as `/`.
    pub fn to_relative_string(&self) -> String {
        let mut out = if self.path.is_empty() {
            "/".to_string()
        } else {
            self.path.clone()
        };
        if let Some(query) = self.query_string() {
            out.push('?');
            out.push_str(&query);
        }
        out
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            UrlFormat::Absolute => f.write_str(&self.to_absolute_string()),
            UrlFormat::Relative => f.write_str(&self.to_relative_string()),
        }
    }
}

impl TryFrom<&Url> for ::url::Url {
    type Error = ::url::ParseError;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        Self::parse(&value.to_absolute_string())
    }
}
