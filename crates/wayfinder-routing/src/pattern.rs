//! Compiled patterns.
//!
//! A [`Pattern`] is produced by the [`PatternCompiler`](crate::compiler::PatternCompiler)
//! from a string such as `/page/{id}-{slug}`. It matches subjects against an
//! anchored regex, generates strings back from parameters, and can be dumped
//! back to its human-readable form.
//!
//! A [`PathPattern`] is a pattern whose generated output is percent-encoded
//! for use in a URL path. Host patterns use a plain [`Pattern`], which emits
//! its parts verbatim.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Deref;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use wayfinder_core::{RoutingError, RoutingResult};

/// Parameter values keyed by name.
///
/// Used for matched parameters, route defaults and generation input. Keys are
/// kept sorted, so query strings built from extra parameters are stable.
pub type Parameters = BTreeMap<String, String>;

/// Regex requirements (unanchored, without delimiters) keyed by parameter name.
pub type Requirements = HashMap<String, String>;

/// Characters left raw when encoding path segments: RFC 3986 unreserved
/// characters plus `! * + , / : ; = @ |`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@')
    .remove(b'|');

/// How a pattern encodes the parts it generates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentEncoding {
    /// Parts are emitted unchanged.
    #[default]
    Verbatim,
    /// Parts are percent-encoded for a URL path.
    PathSegment,
}

impl SegmentEncoding {
    /// Encodes a single generated part.
    pub fn encode(self, part: &str) -> Cow<'_, str> {
        match self {
            Self::Verbatim => Cow::Borrowed(part),
            Self::PathSegment => utf8_percent_encode(part, PATH_SEGMENT).into(),
        }
    }
}

/// One element of a compiled pattern after its prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text, matched and generated as-is (modulo encoding).
    Literal(String),
    /// A named placeholder.
    Placeholder(String),
}

/// A parameter requirement: the source regex and its anchored compiled form.
#[derive(Debug, Clone)]
pub struct Requirement {
    source: String,
    anchored: Regex,
}

impl Requirement {
    pub(crate) fn compile(parameter: &str, source: &str) -> RoutingResult<Self> {
        let anchored = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            RoutingError::InvalidRequirement {
                parameter: parameter.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// Returns the requirement as it was configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the anchored regex used to validate a whole value.
    pub fn anchored(&self) -> &str {
        self.anchored.as_str()
    }

    /// Returns `true` if the whole value satisfies the requirement.
    pub fn is_match(&self, value: &str) -> bool {
        self.anchored.is_match(value)
    }
}

/// A compiled pattern.
///
/// Patterns are immutable; build them with
/// [`PatternCompiler`](crate::compiler::PatternCompiler).
///
/// # Examples
///
/// ```
/// use wayfinder_routing::compiler::PatternCompiler;
/// use wayfinder_routing::pattern::Parameters;
/// use wayfinder_routing::Requirements;
///
/// let mut requirements = Requirements::new();
/// requirements.insert("id".to_string(), r"\d+".to_string());
///
/// let pattern = PatternCompiler::new()
///     .compile_path_pattern("/page/{id}-{slug}", &requirements)
///     .unwrap();
///
/// let params = pattern.match_subject("/page/123-hello").unwrap();
/// assert_eq!(params["id"], "123");
/// assert_eq!(params["slug"], "hello");
/// assert!(pattern.match_subject("/page/abc-hello").is_none());
///
/// assert_eq!(pattern.generate(&params, true).unwrap(), "/page/123-hello");
/// assert_eq!(pattern.dump(), "/page/{id}-{slug}");
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Literal text before the first placeholder
    prefix: Option<String>,
    /// Matcher for the whole subject, prefix included; `None` for literal patterns
    regex: Option<Regex>,
    /// Literals and placeholders after the prefix, in order
    parts: Vec<Part>,
    /// `(part index, parameter name)` for each placeholder, in order
    parameters: Vec<(usize, String)>,
    /// Requirement per parameter name
    requirements: HashMap<String, Requirement>,
    encoding: SegmentEncoding,
}

impl Pattern {
    /// A pattern without placeholders: matches only the exact string.
    pub(crate) fn literal(text: &str, encoding: SegmentEncoding) -> Self {
        Self {
            prefix: Some(text.to_string()),
            regex: None,
            parts: Vec::new(),
            parameters: Vec::new(),
            requirements: HashMap::new(),
            encoding,
        }
    }

    pub(crate) fn compiled(
        prefix: Option<String>,
        regex: Regex,
        parts: Vec<Part>,
        requirements: HashMap<String, Requirement>,
        encoding: SegmentEncoding,
    ) -> Self {
        let parameters = parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| match part {
                Part::Placeholder(name) => Some((index, name.clone())),
                Part::Literal(_) => None,
            })
            .collect();

        Self {
            prefix,
            regex: Some(regex),
            parts,
            parameters,
            requirements,
            encoding,
        }
    }

    /// Returns the literal prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the compiled regex, or `None` for a literal pattern.
    pub const fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Returns the parts following the prefix.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns `(part index, name)` pairs for every placeholder.
    ///
    /// Indices are increasing but not contiguous: literal parts sit between
    /// them.
    pub fn parameters(&self) -> &[(usize, String)] {
        &self.parameters
    }

    /// Returns the parameter names in pattern order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|(_, name)| name.as_str())
    }

    /// Returns the requirement for a parameter.
    pub fn requirement(&self, name: &str) -> Option<&Requirement> {
        self.requirements.get(name)
    }

    /// Returns all requirements keyed by parameter name.
    pub const fn requirements(&self) -> &HashMap<String, Requirement> {
        &self.requirements
    }

    /// Returns the encoding applied by [`generate`](Self::generate).
    pub const fn encoding(&self) -> SegmentEncoding {
        self.encoding
    }

    /// Returns `true` if the pattern has no placeholders.
    pub const fn is_literal(&self) -> bool {
        self.regex.is_none()
    }

    /// Attempts to match the subject.
    ///
    /// Returns the captured parameters on success, or `None` if the subject
    /// does not match. A literal pattern yields an empty map.
    pub fn match_subject(&self, subject: &str) -> Option<Parameters> {
        let prefix = self.prefix.as_deref().unwrap_or("");

        let Some(regex) = &self.regex else {
            return (subject == prefix).then(Parameters::new);
        };

        if !subject.starts_with(prefix) {
            return None;
        }
        let captures = regex.captures(subject)?;

        // Group N holds the Nth placeholder
        let mut result = Parameters::new();
        for (group, (_, name)) in self.parameters.iter().enumerate() {
            let value = captures.get(group + 1).map_or("", |m| m.as_str());
            result.insert(name.clone(), value.to_string());
        }

        Some(result)
    }

    /// Generates a string from the pattern and parameters.
    ///
    /// Parameters that are not placeholders of this pattern are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::MissingParameter`] if a placeholder has no
    /// value, and [`RoutingError::InvalidParameter`] if `check_requirements`
    /// is set and a value does not satisfy its requirement.
    pub fn generate(&self, parameters: &Parameters, check_requirements: bool) -> RoutingResult<String> {
        let mut result = self
            .encoding
            .encode(self.prefix.as_deref().unwrap_or(""))
            .into_owned();

        for part in &self.parts {
            match part {
                Part::Literal(text) => result.push_str(&self.encoding.encode(text)),
                Part::Placeholder(name) => {
                    let value = parameters
                        .get(name)
                        .ok_or_else(|| RoutingError::MissingParameter(name.clone()))?;

                    if check_requirements {
                        if let Some(requirement) = self.requirements.get(name) {
                            if !requirement.is_match(value) {
                                return Err(RoutingError::InvalidParameter {
                                    name: name.clone(),
                                    requirement: requirement.anchored().to_string(),
                                });
                            }
                        }
                    }

                    result.push_str(&self.encoding.encode(value));
                }
            }
        }

        Ok(result)
    }

    /// Dumps the pattern back to its human-readable form.
    pub fn dump(&self) -> String {
        let mut result = self.prefix.clone().unwrap_or_default();

        for part in &self.parts {
            match part {
                Part::Literal(text) => result.push_str(text),
                Part::Placeholder(name) => {
                    result.push('{');
                    result.push_str(name);
                    result.push('}');
                }
            }
        }

        result
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

/// A pattern for URL paths.
///
/// Behaves like [`Pattern`] (which it dereferences to), except that generated
/// parts are percent-encoded.
#[derive(Debug, Clone)]
pub struct PathPattern(Pattern);

impl PathPattern {
    pub(crate) const fn new(pattern: Pattern) -> Self {
        Self(pattern)
    }

    /// Returns the underlying pattern.
    pub const fn as_pattern(&self) -> &Pattern {
        &self.0
    }

    /// Unwraps the underlying pattern.
    pub fn into_inner(self) -> Pattern {
        self.0
    }
}

impl Deref for PathPattern {
    type Target = Pattern;

    fn deref(&self) -> &Pattern {
        &self.0
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PatternCompiler;

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn requirements(pairs: &[(&str, &str)]) -> Requirements {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn pattern(source: &str, reqs: &[(&str, &str)]) -> Pattern {
        PatternCompiler::new()
            .compile_pattern(source, &requirements(reqs))
            .unwrap()
    }

    fn path_pattern(source: &str, reqs: &[(&str, &str)]) -> PathPattern {
        PatternCompiler::new()
            .compile_path_pattern(source, &requirements(reqs))
            .unwrap()
    }

    #[test]
    fn test_empty_literal() {
        let p = pattern("", &[]);
        assert!(p.is_literal());
        assert_eq!(p.match_subject(""), Some(Parameters::new()));
        assert!(p.match_subject("/foo").is_none());
        assert_eq!(p.generate(&Parameters::new(), true).unwrap(), "");
        assert_eq!(p.dump(), "");
    }

    #[test]
    fn test_literal_exact_match() {
        let p = path_pattern("/foo", &[]);
        assert!(p.match_subject("").is_none());
        assert_eq!(p.match_subject("/foo"), Some(Parameters::new()));
        assert!(p.match_subject("/foox").is_none());
        assert!(p.match_subject("/bar").is_none());
        assert_eq!(p.generate(&Parameters::new(), true).unwrap(), "/foo");
        assert_eq!(p.dump(), "/foo");
    }

    #[test]
    fn test_single_placeholder() {
        let p = path_pattern("/profile/{name}", &[("name", r"\w+")]);
        assert!(p.match_subject("").is_none());
        assert!(p.match_subject("/profile/").is_none());
        assert_eq!(p.match_subject("/profile/bar"), Some(params(&[("name", "bar")])));
        assert_eq!(
            p.match_subject("/profile/baz_qux"),
            Some(params(&[("name", "baz_qux")]))
        );
        assert!(p.match_subject("/profile/baz/qux").is_none());

        assert_eq!(
            p.generate(&params(&[("name", "qux")]), true).unwrap(),
            "/profile/qux"
        );
        assert_eq!(
            p.generate(&params(&[("name", "lorem_ipsum"), ("unknown", "dummy")]), true)
                .unwrap(),
            "/profile/lorem_ipsum"
        );
        assert_eq!(p.dump(), "/profile/{name}");
    }

    #[test]
    fn test_prefix_and_multiple_placeholders() {
        let p = pattern("/page/{id}-{slug}", &[("id", r"\d+"), ("slug", r"[\w\-]+")]);
        assert_eq!(p.prefix(), Some("/page/"));
        assert_eq!(
            p.parameters(),
            &[(0, "id".to_string()), (2, "slug".to_string())]
        );

        for subject in ["", "/page/", "/page/5", "/page/foo", "/page/foo-bar", "/egap/5-foo"] {
            assert!(p.match_subject(subject).is_none(), "{subject} should not match");
        }
        assert_eq!(
            p.match_subject("/page/5-foo"),
            Some(params(&[("id", "5"), ("slug", "foo")]))
        );
        assert_eq!(
            p.match_subject("/page/123456-lorem-ipsum"),
            Some(params(&[("id", "123456"), ("slug", "lorem-ipsum")]))
        );

        assert_eq!(
            p.generate(&params(&[("id", "123"), ("slug", "foo")]), true).unwrap(),
            "/page/123-foo"
        );
        assert_eq!(p.dump(), "/page/{id}-{slug}");
    }

    #[test]
    fn test_default_path_requirement_example() {
        let p = path_pattern("/page/{id}-{slug}", &[("id", r"\d+")]);
        assert_eq!(
            p.match_subject("/page/123-hello"),
            Some(params(&[("id", "123"), ("slug", "hello")]))
        );
        assert!(p.match_subject("/page/abc-hello").is_none());
    }

    #[test]
    fn test_placeholder_without_prefix() {
        let p = pattern("{foo}", &[]);
        assert_eq!(p.prefix(), None);
        assert!(p.match_subject("").is_none());
        assert_eq!(p.match_subject("x"), Some(params(&[("foo", "x")])));
    }

    #[test]
    fn test_utf8() {
        let reqs = [("zvíře", "(kůň|jednorožec)"), ("kde", "v-lese|na-louce")];
        let p = pattern("/žluťoučký/{zvíře}/{kde}", &reqs);

        assert!(p.match_subject("/hadraplán").is_none());
        assert!(p.match_subject("/žluťoučký/kůň").is_none());
        assert_eq!(
            p.match_subject("/žluťoučký/kůň/v-lese"),
            Some(params(&[("zvíře", "kůň"), ("kde", "v-lese")]))
        );
        assert_eq!(
            p.generate(&params(&[("zvíře", "jednorožec"), ("kde", "na-louce")]), true)
                .unwrap(),
            "/žluťoučký/jednorožec/na-louce"
        );
        assert_eq!(p.dump(), "/žluťoučký/{zvíře}/{kde}");
    }

    #[test]
    fn test_utf8_path_encoding() {
        let reqs = [("zvíře", "(kůň|jednorožec)"), ("kde", "v-lese|na-louce")];
        let p = path_pattern("/žluťoučký/{zvíře}/{kde}", &reqs);

        assert_eq!(
            p.generate(&params(&[("zvíře", "kůň"), ("kde", "v-lese")]), true)
                .unwrap(),
            "/%C5%BElu%C5%A5ou%C4%8Dk%C3%BD/k%C5%AF%C5%88/v-lese"
        );
        // dump is never encoded
        assert_eq!(p.dump(), "/žluťoučký/{zvíře}/{kde}");
    }

    #[test]
    fn test_alternation_requirement_is_fully_anchored() {
        let p = pattern("{kde}", &[("kde", "v-lese|na-louce")]);
        let err = p
            .generate(&params(&[("kde", "v-lese-x")]), true)
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidParameter { .. }));
    }

    #[test]
    fn test_requirement_assertions_see_the_prefix() {
        let p = pattern("a{x}", &[("x", r"\b\w+")]);
        assert!(p.match_subject("ab").is_none());

        let p = pattern("a-{x}", &[("x", r"\b\w+")]);
        assert_eq!(p.match_subject("a-b"), Some(params(&[("x", "b")])));

        let p = pattern("a{x}", &[("x", r"\B\w+")]);
        assert_eq!(p.match_subject("ab"), Some(params(&[("x", "b")])));
    }

    #[test]
    fn test_raw_special_characters() {
        let p = path_pattern("/!*+,/:;=@|/{str}/|@=;:/,+*!", &[("str", ".+")]);
        assert!(p.match_subject("/!*+,/:;=@|").is_none());
        assert_eq!(
            p.match_subject("/!*+,/:;=@|/foo/|@=;:/,+*!"),
            Some(params(&[("str", "foo")]))
        );
        assert_eq!(
            p.generate(&params(&[("str", "*/,|:;@=!+")]), true).unwrap(),
            "/!*+,/:;=@|/*/,|:;@=!+/|@=;:/,+*!"
        );
    }

    #[test]
    fn test_path_encoding_of_ascii() {
        let raw = ['!', '*', '+', ',', '/', ':', ';', '=', '@', '|', '-', '_', '.', '~'];
        for byte in 32u8..127 {
            let c = char::from(byte);
            let encoded = SegmentEncoding::PathSegment.encode(&c.to_string()).into_owned();
            if c.is_ascii_alphanumeric() || raw.contains(&c) {
                assert_eq!(encoded, c.to_string());
            } else {
                assert_eq!(encoded, format!("%{byte:02X}"));
            }
        }
    }

    #[test]
    fn test_verbatim_encoding() {
        let p = pattern("{sub}.example.com", &[]);
        assert_eq!(
            p.generate(&params(&[("sub", "a b")]), false).unwrap(),
            "a b.example.com"
        );
    }

    #[test]
    fn test_missing_parameter() {
        let p = pattern("{foo}-{bar}", &[("foo", r"\w+"), ("bar", r"\w+")]);
        let err = p.generate(&params(&[("foo", "test")]), true).unwrap_err();
        assert_eq!(err.to_string(), "Missing parameter \"bar\"");
    }

    #[test]
    fn test_invalid_parameter_unless_unchecked() {
        let p = pattern("{from}:{to}", &[("from", r"\d+"), ("to", r"\d+")]);

        assert_eq!(
            p.generate(&params(&[("from", "not-a-number"), ("to", "foo")]), false)
                .unwrap(),
            "not-a-number:foo"
        );

        let err = p
            .generate(&params(&[("from", "123456"), ("to", "not-a-number")]), true)
            .unwrap_err();
        assert_eq!(err.to_string(), r#"Parameter "to" must match "^(?:\d+)$""#);
    }

    #[test]
    fn test_round_trip() {
        let p = path_pattern("/archive/{year}/{month}/{slug}", &[("year", r"\d{4}"), ("month", r"\d{2}")]);
        let input = params(&[("year", "2024"), ("month", "02"), ("slug", "hello-world")]);
        let generated = p.generate(&input, true).unwrap();
        assert_eq!(generated, "/archive/2024/02/hello-world");
        assert_eq!(p.match_subject(&generated), Some(input));
    }

    #[test]
    fn test_duplicate_names_last_wins_on_match() {
        let p = pattern("{a}/{a}", &[("a", "[^/]+")]);
        assert_eq!(p.match_subject("x/y"), Some(params(&[("a", "y")])));
        assert_eq!(p.generate(&params(&[("a", "z")]), true).unwrap(), "z/z");
    }

    #[test]
    fn test_display_matches_dump() {
        let p = path_pattern("/users/{id}", &[]);
        assert_eq!(p.to_string(), "/users/{id}");
        assert_eq!(p.as_pattern().to_string(), "/users/{id}");
    }

    #[test]
    fn test_parameter_names_and_requirements() {
        let p = pattern("db-{database}.{format}", &[("format", "json|xml")]);
        let names: Vec<&str> = p.parameter_names().collect();
        assert_eq!(names, ["database", "format"]);
        assert_eq!(p.requirement("format").unwrap().source(), "json|xml");
        assert_eq!(p.requirement("database").unwrap().source(), ".+");
        assert_eq!(p.requirements().len(), 2);
        assert!(p.requirement("missing").is_none());
    }
}
