//! Route pattern representation.

use crate::error::RouterError;
use regex::Regex;
use std::fmt;

/// A route pattern as registered on a router.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Matches every path. Produced by `None`.
    MatchAll,
    /// A literal, parameterized or wildcard path string.
    Path(PathSpec),
    /// A regular expression tested against the raw request path.
    Regex(Regex),
    /// Matches if any member matches; members are tried in order.
    AnyOf(Vec<PathPattern>),
    /// Never matches. Produced by values that are not patterns at all.
    Never,
}

impl PathPattern {
    /// Parse a path string.
    pub fn path(raw: &str) -> Self {
        PathPattern::Path(PathSpec::parse(raw))
    }

    /// Compile a regular expression pattern.
    pub fn regex(source: &str) -> Result<Self, RouterError> {
        Ok(PathPattern::Regex(Regex::new(source)?))
    }

    /// Returns `true` for string patterns.
    pub fn is_path(&self) -> bool {
        matches!(self, PathPattern::Path(_))
    }

    /// The string form, if this is a string pattern.
    pub fn as_path(&self) -> Option<&PathSpec> {
        match self {
            PathPattern::Path(spec) => Some(spec),
            _ => None,
        }
    }

    /// Compose `self` under `mount`.
    ///
    /// Only string patterns that are not wildcards are rebased; every other
    /// pattern is returned unchanged, as is everything mounted under a
    /// non-string pattern.
    pub fn mounted_under(&self, mount: &PathPattern) -> PathPattern {
        match (mount, self) {
            (PathPattern::Path(left), PathPattern::Path(right))
                if right.shape() != Shape::Wildcard =>
            {
                PathPattern::path(&combine(left.as_str(), right.as_str()))
            }
            _ => self.clone(),
        }
    }
}

impl Default for PathPattern {
    fn default() -> Self {
        PathPattern::path("/")
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::MatchAll => f.write_str("*"),
            PathPattern::Path(spec) => f.write_str(spec.as_str()),
            PathPattern::Regex(regex) => write!(f, "/{}/", regex.as_str()),
            PathPattern::AnyOf(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                Ok(())
            }
            PathPattern::Never => f.write_str("<never>"),
        }
    }
}

/// Join a mount path and a child path.
///
/// The left side loses its trailing slashes and the right side its leading
/// ones. An empty or root left side yields `/<right>`; an empty right side
/// yields the bare left side.
pub fn combine(left: &str, right: &str) -> String {
    let lhs = left.trim_end_matches('/');
    let rhs = right.trim_start_matches('/');
    if lhs.trim().is_empty() {
        format!("/{rhs}")
    } else if rhs.trim().is_empty() {
        lhs.to_string()
    } else {
        format!("{lhs}/{rhs}")
    }
}

/// Ensure a leading `/` and drop trailing ones, except for `/` itself.
pub fn normalize(path: &str) -> String {
    if path.trim().is_empty() {
        return "/".to_string();
    }
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// `true` if `path` ends in a slash that normalization would strip.
pub(crate) fn has_trailing_slash(path: &str) -> bool {
    path.len() > 1 && path.ends_with('/')
}

// ============================================================================
// Path strings
// ============================================================================

/// What kind of string pattern a [`PathSpec`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `/` or empty. Matches every path in both modes.
    Root,
    /// Only literal segments.
    Literal,
    /// At least one `:name` segment.
    Parameterized,
    /// A trailing `*`, `*name` or `{*name}` segment.
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Static(String),
    Param(String),
}

/// A parsed path string.
#[derive(Debug, Clone)]
pub struct PathSpec {
    normalized: String,
    trailing_slash: bool,
    shape: Shape,
    segments: Vec<Segment>,
}

impl PathSpec {
    /// Parse and classify a path string.
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        let mut parts: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let wildcard = parts.last().is_some_and(|last| is_wildcard(last));
        if wildcard {
            parts.pop();
        }

        let segments: Vec<Segment> = parts
            .into_iter()
            .map(|part| match part.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Static(part.to_string()),
            })
            .collect();

        let shape = if wildcard {
            Shape::Wildcard
        } else if segments.is_empty() {
            Shape::Root
        } else if segments.iter().any(|s| matches!(s, Segment::Param(_))) {
            Shape::Parameterized
        } else {
            Shape::Literal
        };

        Self {
            trailing_slash: has_trailing_slash(raw),
            normalized,
            shape,
            segments,
        }
    }

    /// The normalized path string.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// The pattern's classification.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Names of the `:name` segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }
}

fn is_wildcard(segment: &str) -> bool {
    segment.starts_with('*') || (segment.starts_with("{*") && segment.ends_with('}'))
}

// ============================================================================
// Conversions
// ============================================================================

impl From<&str> for PathPattern {
    fn from(raw: &str) -> Self {
        PathPattern::path(raw)
    }
}

impl From<String> for PathPattern {
    fn from(raw: String) -> Self {
        PathPattern::path(&raw)
    }
}

impl From<&String> for PathPattern {
    fn from(raw: &String) -> Self {
        PathPattern::path(raw)
    }
}

impl From<Regex> for PathPattern {
    fn from(regex: Regex) -> Self {
        PathPattern::Regex(regex)
    }
}

impl<T: Into<PathPattern>> From<Vec<T>> for PathPattern {
    fn from(items: Vec<T>) -> Self {
        PathPattern::AnyOf(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathPattern>, const N: usize> From<[T; N]> for PathPattern {
    fn from(items: [T; N]) -> Self {
        PathPattern::AnyOf(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathPattern>> From<Option<T>> for PathPattern {
    fn from(value: Option<T>) -> Self {
        value.map_or(PathPattern::MatchAll, Into::into)
    }
}

macro_rules! never_pattern {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathPattern {
                fn from(_: $ty) -> Self {
                    PathPattern::Never
                }
            }
        )*
    };
}

never_pattern!(i32, i64, u32, u64, usize, f64, bool);
