//! Router configuration.

use crate::path::MatchOptions;

/// Options that change how a router matches paths.
///
/// Both flags default to `false`, which gives case-insensitive matching
/// with an optional trailing slash.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::with_options(RouterOptions::new().case_sensitive(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterOptions {
    case_sensitive: bool,
    strict: bool,
}

impl RouterOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare literal segments exactly.
    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    /// Make the trailing slash significant for routes.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Whether literal segments compare exactly.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether the trailing slash is significant.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub(crate) fn matching(&self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.case_sensitive,
            strict: self.strict,
        }
    }
}
