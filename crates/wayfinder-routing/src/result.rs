//! Match outcomes.

use http::{Method, StatusCode};

use crate::pattern::Parameters;
use crate::route::Route;
use crate::subject::Subject;

/// A successful match: the route and the parameters it extracted.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// The subject as given to the router (before any method fallback)
    pub subject: Subject,
    pub route: &'r Route,
    pub parameters: Parameters,
}

/// The outcome of [`Router::match_subject`](crate::router::Router::match_subject).
#[derive(Debug, Clone)]
pub enum MatchResult<'r> {
    Match(RouteMatch<'r>),
    /// Some route matched everything but the method.
    MethodNotAllowed {
        subject: Subject,
        /// Deduplicated, in order of first appearance
        allowed_methods: Vec<Method>,
    },
    NotFound {
        subject: Subject,
    },
}

impl<'r> MatchResult<'r> {
    pub const fn subject(&self) -> &Subject {
        match self {
            Self::Match(m) => &m.subject,
            Self::MethodNotAllowed { subject, .. } | Self::NotFound { subject } => subject,
        }
    }

    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    pub const fn route(&self) -> Option<&'r Route> {
        match self {
            Self::Match(m) => Some(m.route),
            _ => None,
        }
    }

    pub const fn parameters(&self) -> Option<&Parameters> {
        match self {
            Self::Match(m) => Some(&m.parameters),
            _ => None,
        }
    }

    /// Returns the allowed methods of a `MethodNotAllowed` result.
    pub fn allowed_methods(&self) -> Option<&[Method]> {
        match self {
            Self::MethodNotAllowed { allowed_methods, .. } => Some(allowed_methods),
            _ => None,
        }
    }

    /// Returns the HTTP status a server would answer with.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Match(_) => StatusCode::OK,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Converts into the match, if any.
    pub fn into_match(self) -> Option<RouteMatch<'r>> {
        match self {
            Self::Match(m) => Some(m),
            _ => None,
        }
    }
}
