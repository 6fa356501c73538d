//! Matching request paths against patterns.
//!
//! Two modes exist. **Terminal** matching (routes) requires the whole path to
//! match; **prefix** matching (middleware) accepts a path that continues past
//! the pattern at a `/` boundary.

use super::pattern::{PathPattern, PathSpec, Segment, Shape, has_trailing_slash};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use trellis_core::Params;

/// Flags that change how string patterns compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare literal segments exactly instead of case-insensitively.
    pub case_sensitive: bool,
    /// Treat a trailing slash as significant for terminal matches.
    pub strict: bool,
}

/// A successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
    /// Captured parameters.
    pub params: Params,
    /// The leading part of the request path covered by a string pattern,
    /// in the request's own spelling. `""` for the root pattern, `None` for
    /// non-string patterns.
    pub prefix: Option<String>,
}

impl PathPattern {
    /// Match `path` in terminal mode with default options.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        self.match_path(path, false, MatchOptions::default())
    }

    /// Match `path` in prefix mode with default options.
    pub fn matches_prefix(&self, path: &str) -> Option<PathMatch> {
        self.match_path(path, true, MatchOptions::default())
    }

    /// Match `path`, as a prefix if `middleware` is set.
    pub fn match_path(
        &self,
        path: &str,
        middleware: bool,
        options: MatchOptions,
    ) -> Option<PathMatch> {
        match self {
            PathPattern::MatchAll => Some(PathMatch::default()),
            PathPattern::Never => None,
            PathPattern::Path(spec) => spec.match_path(path, middleware, options),
            PathPattern::Regex(regex) => {
                let captures = regex.captures(path)?;
                let mut params = Params::new();
                for name in regex.capture_names().flatten() {
                    if let Some(value) = captures.name(name) {
                        params.insert(name, value.as_str());
                    }
                }
                Some(PathMatch {
                    params,
                    prefix: None,
                })
            }
            PathPattern::AnyOf(items) => items
                .iter()
                .find_map(|item| item.match_path(path, middleware, options)),
        }
    }
}

impl PathSpec {
    /// Match `path` against this string pattern.
    pub fn match_path(
        &self,
        path: &str,
        middleware: bool,
        options: MatchOptions,
    ) -> Option<PathMatch> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let pattern = self.segments();

        match self.shape() {
            Shape::Root => {}
            Shape::Wildcard => {
                if !pattern.is_empty() && parts.len() <= pattern.len() {
                    return None;
                }
            }
            Shape::Literal | Shape::Parameterized => {
                if middleware && pattern.len() > parts.len() {
                    return None;
                }
                if !middleware {
                    if pattern.len() != parts.len() {
                        return None;
                    }
                    if options.strict && self.trailing_slash() != has_trailing_slash(path) {
                        return None;
                    }
                }
            }
        }

        let mut params = Params::new();
        for (segment, part) in pattern.iter().zip(&parts) {
            match segment {
                Segment::Param(name) => {
                    params.insert(name.as_str(), decode_segment(part));
                }
                Segment::Static(literal) => {
                    if !segment_eq(literal, part, options.case_sensitive) {
                        return None;
                    }
                }
            }
        }

        let prefix = match pattern.len() {
            0 => String::new(),
            n => format!("/{}", parts[..n].join("/")),
        };

        Some(PathMatch {
            params,
            prefix: Some(prefix),
        })
    }
}

/// Percent-decode one segment, keeping it as written when the bytes are not UTF-8.
fn decode_segment(part: &str) -> Cow<'_, str> {
    percent_decode_str(part)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(part))
}

fn segment_eq(literal: &str, part: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        literal == part
    } else {
        literal
            .chars()
            .flat_map(char::to_lowercase)
            .eq(part.chars().flat_map(char::to_lowercase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn params(m: &PathMatch) -> Vec<(&str, &str)> {
        m.params.iter().collect()
    }

    #[test]
    fn test_literal_terminal_is_exact_and_case_insensitive() {
        let p = PathPattern::from("/users");
        assert!(p.matches("/users").is_some());
        assert!(p.matches("/USERS/").is_some());
        assert!(p.matches("/users/1").is_none());
        assert!(p.matches("/user").is_none());
    }

    #[test]
    fn test_literal_prefix_stops_at_segment_boundary() {
        let p = PathPattern::from("/admin");
        assert!(p.matches_prefix("/admin").is_some());
        assert!(p.matches_prefix("/admin/stats").is_some());
        assert!(p.matches_prefix("/administrator").is_none());
    }

    #[test]
    fn test_params_are_captured_and_decoded() {
        let p = PathPattern::from("/a/:x/:y");
        let m = p.matches("/a/1/hello%20world").unwrap();
        assert_eq!(params(&m), [("x", "1"), ("y", "hello world")]);
        assert!(p.matches("/a/1").is_none());
        assert!(p.matches("/a/1/2/3").is_none());
        assert!(p.matches_prefix("/a/1/2/3").is_some());
        assert!(p.matches_prefix("/a/1").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let p = PathPattern::from("/");
        assert!(p.matches("/").is_some());
        assert!(p.matches("").is_some());
        assert!(p.matches("/users/42").is_some());
        assert!(PathPattern::from("").matches("/x/").is_some());
        assert!(p.matches_prefix("/anything/at/all").is_some());
        assert_eq!(p.matches_prefix("/x").unwrap().prefix.as_deref(), Some(""));
    }

    #[test]
    fn test_undecodable_param_is_kept_as_written() {
        let p = PathPattern::from("/f/:name");
        let m = p.matches("/f/%FF%FE").unwrap();
        assert_eq!(m.params.get("name"), Some("%FF%FE"));
        let m = p.matches("/f/caf%C3%A9").unwrap();
        assert_eq!(m.params.get("name"), Some("café"));
    }

    #[test]
    fn test_wildcard() {
        let p = PathPattern::from("/files/*");
        assert!(p.matches("/files/a/b.txt").is_some());
        assert!(p.matches("/FILES/a").is_some());
        assert!(p.matches("/files").is_none());
        assert!(p.matches("/other/a").is_none());
        assert!(p.matches("/files/a").unwrap().params.is_empty());

        assert!(PathPattern::from("/{*splat}").matches("/").is_some());
        assert!(PathPattern::from("/*").matches("/x/y").is_some());
    }

    #[test]
    fn test_regex_surfaces_named_groups() {
        let p = PathPattern::from(Regex::new(r"^/items/(?P<id>\d+)$").unwrap());
        let m = p.matches("/items/42").unwrap();
        assert_eq!(m.params.get("id"), Some("42"));
        assert!(m.prefix.is_none());
        assert!(p.matches("/items/abc").is_none());
    }

    #[test]
    fn test_any_of_takes_first_match() {
        let p = PathPattern::from(["/a", "/b/:id"]);
        assert!(p.matches("/a").is_some());
        assert_eq!(p.matches("/b/7").unwrap().params.get("id"), Some("7"));
        assert!(p.matches("/c").is_none());
    }

    #[test]
    fn test_match_all_and_never() {
        assert!(PathPattern::from(None::<&str>).matches("/x/y").is_some());
        assert!(PathPattern::from(7_u32).matches("/").is_none());
        assert!(PathPattern::from(7_u32).matches_prefix("/7").is_none());
    }

    #[test]
    fn test_case_sensitive_option() {
        let p = PathPattern::from("/Users");
        let exact = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        assert!(p.match_path("/Users", false, exact).is_some());
        assert!(p.match_path("/users", false, exact).is_none());
    }

    #[test]
    fn test_strict_option() {
        let strict = MatchOptions {
            strict: true,
            ..MatchOptions::default()
        };
        let p = PathPattern::from("/users");
        assert!(p.match_path("/users", false, strict).is_some());
        assert!(p.match_path("/users/", false, strict).is_none());
        let slash = PathPattern::from("/users/");
        assert!(slash.match_path("/users/", false, strict).is_some());
        assert!(slash.match_path("/users", false, strict).is_none());
    }

    #[test]
    fn test_prefix_keeps_request_spelling() {
        let p = PathPattern::from("/admin/:section");
        let m = p.matches_prefix("/Admin/Stats/today").unwrap();
        assert_eq!(m.prefix.as_deref(), Some("/Admin/Stats"));
        assert_eq!(m.params.get("section"), Some("Stats"));
    }
}
