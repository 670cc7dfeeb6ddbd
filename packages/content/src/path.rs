//! Canonical field addresses.
//!
//! A path is built left to right by appending one segment to the resolved
//! parent path. The root scope has an empty parent, so no leading separator
//! is emitted. List items render as `{attribute}.fields[{index}].data`.
//! Composition is purely textual; separators inside keys are not escaped.

use crate::error::PathError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Scope(String),
    List { attribute: String, index: usize },
    Attribute(String),
}

impl PathSegment {
    pub fn scope(name: impl Into<String>) -> Self {
        PathSegment::Scope(name.into())
    }

    pub fn list(attribute: impl Into<String>, index: usize) -> Self {
        PathSegment::List {
            attribute: attribute.into(),
            index,
        }
    }

    pub fn attribute(key: impl Into<String>) -> Self {
        PathSegment::Attribute(key.into())
    }

    /// Name of the scope, list attribute or attribute key
    pub fn name(&self) -> &str {
        match self {
            PathSegment::Scope(name) | PathSegment::Attribute(name) => name,
            PathSegment::List { attribute, .. } => attribute,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Scope(name) | PathSegment::Attribute(name) => write!(f, "{}", name),
            PathSegment::List { attribute, index } => {
                write!(f, "{}.fields[{}].data", attribute, index)
            }
        }
    }
}

/// Append one segment to a resolved parent path
pub fn compose(parent: &str, segment: &PathSegment) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

/// Ordered path segments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentPath {
    segments: Vec<PathSegment>,
}

impl ContentPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Parse a canonical path string
    ///
    /// `{attr}.fields[{i}].data` becomes a list segment. Other tokens become
    /// scope segments, except the last which becomes an attribute segment.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let tokens: Vec<&str> = path.split('.').collect();
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(PathError::EmptySegment(path.to_string()));
        }

        let mut segments = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if parse_fields_index(token).is_some() {
                return Err(PathError::DanglingListSegment(path.to_string()));
            }

            let next = tokens.get(i + 1).copied();
            match next.and_then(parse_fields_index) {
                Some(Ok(index)) if tokens.get(i + 2) == Some(&"data") => {
                    segments.push(PathSegment::list(token, index));
                    i += 3;
                }
                Some(Ok(_)) => return Err(PathError::DanglingListSegment(path.to_string())),
                Some(Err(())) => return Err(PathError::MalformedIndex(path.to_string())),
                None => {
                    if i + 1 == tokens.len() {
                        segments.push(PathSegment::attribute(token));
                    } else {
                        segments.push(PathSegment::scope(token));
                    }
                    i += 1;
                }
            }
        }

        Ok(Self { segments })
    }
}

/// `fields[N]` → `Some(Ok(N))`, `fields[x]` → `Some(Err(()))`, other → `None`
fn parse_fields_index(token: &str) -> Option<Result<usize, ()>> {
    let inner = token.strip_prefix("fields[")?.strip_suffix(']')?;
    Some(inner.parse::<usize>().map_err(|_| ()))
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .segments
            .iter()
            .fold(String::new(), |path, segment| compose(&path, segment));
        write!(f, "{}", rendered)
    }
}
