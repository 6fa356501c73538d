//! # trellis-std
//!
//! Path matching, routing and standard middleware for the Trellis dispatch
//! engine.
//!
//! This crate provides:
//! - **Path patterns**: [`PathPattern`](path::PathPattern) and its matcher
//! - **Routing**: [`Router`], [`Route`], mounting through [`Mountable`]
//! - **Standard middleware**: [`logger`](middleware::logger)
//! - **Testing**: recorders and request builders in [`testing`]
//! - **Tower**: `RouterService`, behind the `tower` feature

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use trellis_core;

// Modules
pub mod error;
pub mod middleware;
pub mod path;
pub mod routing;
pub mod testing;

#[cfg(feature = "tower")]
pub mod tower;

pub use error::RouterError;
pub use routing::{DispatchOutcome, IntoStack, Layer, Mountable, Route, Router, RouterOptions};
