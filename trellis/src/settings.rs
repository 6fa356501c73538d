//! Application settings.

use serde_json::Value;
use std::collections::HashMap;

/// A key/value settings map with case-insensitive keys.
///
/// Settings are plain configuration owned by an
/// [`Application`](crate::Application). Dispatch never reads them; components
/// that need a setting are handed the value explicitly.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, Value>,
}

impl Settings {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Set `name` to `value`, returning the previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(Self::key(name), value.into())
    }

    /// Look up `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&Self::key(name))
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(&Self::key(name))
    }

    /// Set `name` to `true`.
    pub fn enable(&mut self, name: &str) {
        self.set(name, true);
    }

    /// Set `name` to `false`.
    pub fn disable(&mut self, name: &str) {
        self.set(name, false);
    }

    /// Returns `true` if `name` is set to `true`.
    pub fn enabled(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(true)))
    }

    /// Returns `true` if `name` is set to `false`.
    ///
    /// An unset name is neither enabled nor disabled.
    pub fn disabled(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(false)))
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
