//! Parameter callback table and per-request bookkeeping.

use std::{collections::HashSet, sync::Arc};
use trellis_core::ParamCallback;

/// Callbacks registered with `param`, grouped by parameter name.
///
/// Names keep their registration order; so do the callbacks under each name.
#[derive(Debug, Clone, Default)]
pub struct ParamTable {
    entries: Vec<(String, Vec<ParamCallback>)>,
}

impl ParamTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` to the list for `name`.
    pub fn push(&mut self, name: impl Into<String>, callback: ParamCallback) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
            Some((_, callbacks)) => callbacks.push(callback),
            None => self.entries.push((name, vec![callback])),
        }
    }

    /// Callbacks registered for `name`, matched case-insensitively.
    pub fn callbacks(&self, name: &str) -> &[ParamCallback] {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, callbacks)| callbacks.as_slice())
            .unwrap_or_default()
    }

    /// Registered parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The `(table, name, value)` triples already handled for one request.
///
/// Each router's table is its own scope, so a parent and a mounted child
/// that both register callbacks for `id` each run theirs once.
#[derive(Debug, Default)]
pub(crate) struct SeenParams {
    seen: HashSet<(usize, String, String)>,
}

impl SeenParams {
    /// Record a triple. Returns `false` if it was already recorded.
    pub(crate) fn insert(&mut self, table: &Arc<ParamTable>, name: &str, value: &str) -> bool {
        let scope = Arc::as_ptr(table) as usize;
        self.seen
            .insert((scope, name.to_ascii_lowercase(), value.to_string()))
    }
}
