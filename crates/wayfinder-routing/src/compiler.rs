//! Pattern compilation.
//!
//! Turns strings like `db-{database}-{id}.{format}` into [`Pattern`]s. Each
//! `{name}` placeholder becomes a capturing group whose contents are the
//! parameter's requirement (or the compiler's default); the text in between
//! is matched literally.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use regex::Regex;

use wayfinder_core::{RoutingError, RoutingResult, Settings};

use crate::pattern::{Part, PathPattern, Pattern, Requirement, Requirements, SegmentEncoding};

/// Default requirement for placeholders in generic (host) patterns.
pub const DEFAULT_REQUIREMENT: &str = ".+";

/// Default requirement for placeholders in path patterns.
pub const DEFAULT_PATH_REQUIREMENT: &str = "[^/]+";

/// Compiles pattern strings into [`Pattern`]s and [`PathPattern`]s.
///
/// Requirements are regexes without anchors or delimiters. Any capturing
/// groups inside them are rewritten to non-capturing groups, so parameter
/// values can be read by group position.
///
/// # Examples
///
/// ```
/// use wayfinder_routing::compiler::PatternCompiler;
/// use wayfinder_routing::Requirements;
///
/// let compiler = PatternCompiler::new();
/// let host = compiler
///     .compile_pattern("{tenant}.example.com", &Requirements::new())
///     .unwrap();
/// assert_eq!(host.match_subject("acme.example.com").unwrap()["tenant"], "acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCompiler {
    default_requirement: String,
    default_path_requirement: String,
}

impl Default for PatternCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCompiler {
    /// Creates a compiler with the default requirements (`.+` and `[^/]+`).
    pub fn new() -> Self {
        Self::with_defaults(DEFAULT_REQUIREMENT, DEFAULT_PATH_REQUIREMENT)
    }

    /// Creates a compiler with custom default requirements.
    pub fn with_defaults(
        default_requirement: impl Into<String>,
        default_path_requirement: impl Into<String>,
    ) -> Self {
        Self {
            default_requirement: default_requirement.into(),
            default_path_requirement: default_path_requirement.into(),
        }
    }

    /// Creates a compiler using the default requirements from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_defaults(
            settings.default_requirement.clone(),
            settings.default_path_requirement.clone(),
        )
    }

    /// Returns the default requirement for generic patterns.
    pub fn default_requirement(&self) -> &str {
        &self.default_requirement
    }

    /// Returns the default requirement for path patterns.
    pub fn default_path_requirement(&self) -> &str {
        &self.default_path_requirement
    }

    /// Compiles a generic pattern (used for hosts). Generated parts are not encoded.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidRequirement`] or
    /// [`RoutingError::InvalidPattern`] if a regex does not compile.
    pub fn compile_pattern(&self, pattern: &str, requirements: &Requirements) -> RoutingResult<Pattern> {
        compile(
            pattern,
            requirements,
            &self.default_requirement,
            SegmentEncoding::Verbatim,
        )
    }

    /// Compiles a path pattern. Generated parts are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidRequirement`] or
    /// [`RoutingError::InvalidPattern`] if a regex does not compile.
    pub fn compile_path_pattern(
        &self,
        pattern: &str,
        requirements: &Requirements,
    ) -> RoutingResult<PathPattern> {
        compile(
            pattern,
            requirements,
            &self.default_path_requirement,
            SegmentEncoding::PathSegment,
        )
        .map(PathPattern::new)
    }
}

/// A `{name}` occurrence in a pattern string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder<'a> {
    /// Byte offset of the opening brace
    start: usize,
    /// Byte offset just past the closing brace
    end: usize,
    name: &'a str,
}

fn compile(
    pattern: &str,
    requirements: &Requirements,
    default_requirement: &str,
    encoding: SegmentEncoding,
) -> RoutingResult<Pattern> {
    let placeholders = scan_placeholders(pattern);

    let Some(first) = placeholders.first() else {
        return Ok(Pattern::literal(pattern, encoding));
    };

    let prefix = (first.start > 0).then(|| pattern[..first.start].to_string());
    let default_group = disable_capturing_groups(default_requirement);

    // Matched against the whole subject, prefix included
    let mut regex_src = String::from("^");
    if let Some(prefix) = &prefix {
        regex_src.push_str(&regex::escape(prefix));
    }
    let mut parts = Vec::with_capacity(placeholders.len() * 2);
    let mut compiled: HashMap<String, Requirement> = HashMap::new();
    let mut previous_end = first.start;

    for placeholder in &placeholders {
        if placeholder.start > previous_end {
            let literal = &pattern[previous_end..placeholder.start];
            regex_src.push_str(&regex::escape(literal));
            parts.push(Part::Literal(literal.to_string()));
        }

        let requirement = requirements.get(placeholder.name).map(String::as_str);

        regex_src.push('(');
        match requirement {
            Some(source) => regex_src.push_str(&disable_capturing_groups(source)),
            None => regex_src.push_str(&default_group),
        }
        regex_src.push(')');

        if let Entry::Vacant(slot) = compiled.entry(placeholder.name.to_string()) {
            slot.insert(Requirement::compile(
                placeholder.name,
                requirement.unwrap_or(default_requirement),
            )?);
        }

        parts.push(Part::Placeholder(placeholder.name.to_string()));
        previous_end = placeholder.end;
    }

    if previous_end < pattern.len() {
        let literal = &pattern[previous_end..];
        regex_src.push_str(&regex::escape(literal));
        parts.push(Part::Literal(literal.to_string()));
    }

    regex_src.push('$');

    let regex = Regex::new(&regex_src).map_err(|e| RoutingError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    tracing::trace!(pattern, regex = regex.as_str(), "compiled pattern");

    Ok(Pattern::compiled(prefix, regex, parts, compiled, encoding))
}

/// Finds `{name}` placeholders left to right.
///
/// A name is one or more characters other than `}`. A `{` without a closing
/// brace, or `{}`, is literal text.
fn scan_placeholders(pattern: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut search_from = 0;

    while let Some(offset) = pattern[search_from..].find('{') {
        let start = search_from + offset;
        let body_start = start + 1;

        match pattern[body_start..].find('}') {
            Some(0) => search_from = body_start,
            Some(len) => {
                let end = body_start + len + 1;
                found.push(Placeholder {
                    start,
                    end,
                    name: &pattern[body_start..body_start + len],
                });
                search_from = end;
            }
            None => break,
        }
    }

    found
}

/// Rewrites capturing groups in a requirement to non-capturing groups.
///
/// An unescaped `(` outside a character class that does not start a `(?...)`
/// construct becomes `(?:`. Named groups (`(?P<name>` and `(?<name>`) become
/// `(?:` as well. Everything else is copied unchanged.
pub(crate) fn disable_capturing_groups(regex: &str) -> String {
    let mut result = String::with_capacity(regex.len() + 8);
    let mut chars = regex.char_indices().peekable();
    let mut escaped = false;
    // Character classes nest (`[a[bc]]`, `[[:alpha:]x]`)
    let mut class_depth = 0usize;
    // Byte offset where a `]` would still be literal (`[]` / `[^]`)
    let mut class_literal_at = None;

    while let Some((i, c)) = chars.next() {
        if escaped {
            escaped = false;
            result.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                result.push(c);
            }
            '[' => {
                class_depth += 1;
                let after = if regex[i + 1..].starts_with('^') { i + 2 } else { i + 1 };
                class_literal_at = Some(after);
                result.push(c);
            }
            ']' if class_depth > 0 && class_literal_at != Some(i) => {
                class_depth -= 1;
                result.push(c);
            }
            '(' if class_depth == 0 => {
                let rest = &regex[i + 1..];
                if !rest.starts_with('?') {
                    result.push_str("(?:");
                } else if let Some(len) = named_group_len(rest) {
                    result.push_str("(?:");
                    let target = i + 1 + len;
                    while chars.peek().is_some_and(|(j, _)| *j < target) {
                        chars.next();
                    }
                } else {
                    result.push(c);
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Length of a `?P<name>` / `?<name>` group header at the start of `rest`.
fn named_group_len(rest: &str) -> Option<usize> {
    let name_start = if rest.starts_with("?P<") {
        3
    } else if rest.starts_with("?<") && !rest.starts_with("?<=") && !rest.starts_with("?<!") {
        2
    } else {
        return None;
    };

    rest[name_start..]
        .find('>')
        .map(|close| name_start + close + 1)
}
