//! A registration facade bound to one pattern.

use super::{methods::for_each_verb, router::Router, stack::IntoStack};
use crate::{error::RouterError, path::PathPattern};

/// Registers routes for a single pattern on its router.
///
/// Returned by [`Router::route`]; every call adds a layer to that router,
/// so `router.route("/book").get(show).put(update)` is the same as two
/// separate registrations.
#[derive(Debug)]
pub struct Route<'r> {
    router: &'r mut Router,
    pattern: PathPattern,
}

impl<'r> Route<'r> {
    pub(crate) fn new(router: &'r mut Router, pattern: PathPattern) -> Self {
        Self { router, pattern }
    }

    /// The pattern this facade registers under.
    pub fn path(&self) -> &PathPattern {
        &self.pattern
    }

    /// Register handlers for every method.
    #[track_caller]
    pub fn all<M>(&mut self, stack: impl IntoStack<M>) -> &mut Self {
        self.router.add_layer(None, false, self.pattern.clone(), stack);
        self
    }

    /// Register handlers for an arbitrary method name.
    #[track_caller]
    pub fn method<M>(
        &mut self,
        name: &str,
        stack: impl IntoStack<M>,
    ) -> Result<&mut Self, RouterError> {
        self.router.method(name, self.pattern.clone(), stack)?;
        Ok(self)
    }
}

macro_rules! route_verbs {
    ($($name:ident => $verb:literal),* $(,)?) => {
        impl Route<'_> {
            $(
                #[doc = concat!("Register `", $verb, "` handlers for this pattern.")]
                #[track_caller]
                pub fn $name<M>(&mut self, stack: impl IntoStack<M>) -> &mut Self {
                    self.router
                        .add_layer(Some($verb), false, self.pattern.clone(), stack);
                    self
                }
            )*
        }
    };
}

for_each_verb!(route_verbs);
