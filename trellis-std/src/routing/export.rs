//! Mounting a router inside another.
//!
//! Mounting is a registration-time copy. The parent receives rebased copies
//! of the child's layers and keeps no reference to the child, so later
//! changes to the child are not seen and mount graphs can never be cyclic.
//! Mounting the same router twice simply produces two sets of copies.

use super::{layer::Layer, router::Router, stack::Mountable};
use crate::path::PathPattern;

impl Router {
    /// Copies of every layer, with string patterns rebased under `at`.
    ///
    /// Handler lists are shared with the originals. Layers registered
    /// directly on this router carry its param callbacks along, so they
    /// still run after mounting.
    pub fn export(&self, at: impl Into<PathPattern>) -> Vec<Layer> {
        let at = at.into();
        self.layers
            .iter()
            .map(|layer| layer.mounted_under(&at, &self.params))
            .collect()
    }
}

impl Mountable for Router {
    fn export(&self, at: &PathPattern) -> Vec<Layer> {
        Router::export(self, at.clone())
    }
}
