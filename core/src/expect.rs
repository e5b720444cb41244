//! Typed JSON expectations applied to registry responses.
//!
//! # Design
//! Callers describe the shape they expect with a jq-style path (`.crate`,
//! `.crate.name`, `.versions[0].num`). The path is parsed once into a
//! `KeyPath` and evaluated against a `serde_json::Value`, with jq's `-e`
//! truthiness: the expectation holds when the path resolves to a value that
//! is neither `null` nor `false`. Missing keys and type mismatches along the
//! path simply do not hold.
//!
//! The 404 error envelope is a named validator rather than a path, so it
//! cannot drift between call sites.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CallError;

/// One step of a `KeyPath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// A parsed jq-style path. `.` is the identity path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    expr: String,
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk the path. `None` when any step is missing or has the wrong type.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(doc, |value, segment| match segment {
            Segment::Field(name) => value.get(name.as_str()),
            Segment::Index(index) => value.get(*index),
        })
    }
}

impl FromStr for KeyPath {
    type Err = CallError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CallError::InvalidExpectation {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = expr.trim();
        if !trimmed.starts_with('.') {
            return Err(invalid("path must start with `.`"));
        }

        let mut segments = Vec::new();
        if trimmed == "." {
            return Ok(KeyPath {
                expr: trimmed.to_string(),
                segments,
            });
        }

        let mut rest = trimmed;
        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                if let Some(quoted) = after_dot.strip_prefix('"') {
                    let end = quoted
                        .find('"')
                        .ok_or_else(|| invalid("unterminated quoted key"))?;
                    segments.push(Segment::Field(quoted[..end].to_string()));
                    rest = &quoted[end + 1..];
                    continue;
                }

                let len = after_dot
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after_dot.len());
                if len == 0 {
                    if after_dot.starts_with('[') {
                        rest = after_dot;
                        continue;
                    }
                    return Err(invalid("empty key after `.`"));
                }
                segments.push(Segment::Field(after_dot[..len].to_string()));
                rest = &after_dot[len..];
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                let end = after_bracket
                    .find(']')
                    .ok_or_else(|| invalid("unterminated `[`"))?;
                let index = after_bracket[..end]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid("array index must be a non-negative integer"))?;
                segments.push(Segment::Index(index));
                rest = &after_bracket[end + 1..];
            } else {
                return Err(invalid("unexpected character in path"));
            }
        }

        Ok(KeyPath {
            expr: trimmed.to_string(),
            segments,
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// A boolean predicate over a parsed response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// The value at the path exists and is neither `null` nor `false`.
    Key(KeyPath),
    /// The document has an `errors` field holding a non-empty array.
    ErrorEnvelope,
}

impl Expectation {
    pub fn key(expr: &str) -> Result<Self, CallError> {
        expr.parse()
    }

    pub fn holds(&self, doc: &Value) -> bool {
        match self {
            Expectation::Key(path) => path.resolve(doc).is_some_and(is_truthy),
            Expectation::ErrorEnvelope => doc
                .get("errors")
                .and_then(Value::as_array)
                .is_some_and(|errors| !errors.is_empty()),
        }
    }
}

impl FromStr for Expectation {
    type Err = CallError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        expr.parse().map(Expectation::Key)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Key(path) => fmt::Display::fmt(path, f),
            Expectation::ErrorEnvelope => f.write_str(".errors | length > 0"),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}
