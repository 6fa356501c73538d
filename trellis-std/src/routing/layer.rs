//! One registered unit of a router.

use super::params::ParamTable;
use crate::path::{MatchOptions, PathMatch, PathPattern, PathSpec, combine};
use std::sync::Arc;
use trellis_core::Handler;

/// A pattern, an optional method and the handlers to run on a match.
///
/// Layers are immutable once built. Mounting produces rebased copies that
/// share the handler list with the original.
#[derive(Debug, Clone)]
pub struct Layer {
    pattern: PathPattern,
    method: Option<String>,
    middleware: bool,
    handlers: Arc<[Handler]>,
    mount: Option<PathSpec>,
    params: Option<Arc<ParamTable>>,
}

impl Layer {
    /// Build a layer. `method` is upper-cased; `None` means any method.
    pub fn new(
        pattern: PathPattern,
        method: Option<&str>,
        middleware: bool,
        handlers: impl Into<Arc<[Handler]>>,
    ) -> Self {
        Self {
            pattern,
            method: method.map(str::to_ascii_uppercase),
            middleware,
            handlers: handlers.into(),
            mount: None,
            params: None,
        }
    }

    /// The layer's path pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The method this route answers, or `None` for any method.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// `true` for middleware (prefix-matched, any method).
    pub fn is_middleware(&self) -> bool {
        self.middleware
    }

    /// The handlers, in execution order.
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// The path this layer was mounted under, if any.
    pub fn mount(&self) -> Option<&str> {
        self.mount.as_ref().map(PathSpec::as_str)
    }

    /// The param table of the router this layer was exported from.
    ///
    /// `None` for layers registered directly on the dispatching router.
    pub(crate) fn param_table(&self) -> Option<&Arc<ParamTable>> {
        self.params.as_ref()
    }

    /// Match the layer against a request path and method.
    pub(crate) fn match_request(
        &self,
        path: &str,
        method: &str,
        options: MatchOptions,
    ) -> Option<PathMatch> {
        let found = self.pattern.match_path(path, self.middleware, options)?;
        if self.middleware {
            return Some(found);
        }
        match &self.method {
            Some(own) if !own.eq_ignore_ascii_case(method) => None,
            _ => Some(found),
        }
    }

    /// The mount path handlers of this layer observe.
    ///
    /// Middleware with a string pattern sees the part of `path` the pattern
    /// covered. Everything else sees the part covered by its mount path.
    pub(crate) fn base_url(&self, path: &str, found: &PathMatch, options: MatchOptions) -> String {
        if self.middleware {
            if let Some(prefix) = &found.prefix {
                return prefix.clone();
            }
        }
        self.mount
            .as_ref()
            .and_then(|mount| mount.match_path(path, true, options))
            .and_then(|m| m.prefix)
            .unwrap_or_default()
    }

    /// A copy of this layer rebased under `at`.
    ///
    /// Layers without their own param table adopt `table`, the table of the
    /// router being exported.
    pub(crate) fn mounted_under(&self, at: &PathPattern, table: &Arc<ParamTable>) -> Layer {
        let mount = match (at.as_path(), &self.mount) {
            (Some(at), Some(inner)) => {
                Some(PathSpec::parse(&combine(at.as_str(), inner.as_str())))
            }
            (Some(at), None) => Some(at.clone()),
            (None, inner) => inner.clone(),
        };
        Layer {
            pattern: self.pattern.mounted_under(at),
            method: self.method.clone(),
            middleware: self.middleware,
            handlers: Arc::clone(&self.handlers),
            mount,
            params: self.params.clone().or_else(|| Some(Arc::clone(table))),
        }
    }
}
