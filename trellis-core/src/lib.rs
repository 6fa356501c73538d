//! # trellis-core
//!
//! Core types for the Trellis request-dispatch engine.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! middleware crates that don't need the full router from `trellis-std`.
//!
//! # The Handler Protocol
//!
//! Dispatch walks an ordered list of layers and hands each matching layer's
//! handlers three things:
//!
//! ## [`Request`] and [`Response`]
//!
//! Shared, cloneable handles over per-request state. The router rewrites
//! `params`, `base_url` and `route` on the request as layers match, and reads
//! [`Response::ended`] to decide whether to stop.
//!
//! ## [`Handler`]
//!
//! A closed set of calling conventions, picked by the closure's parameter
//! list when it is registered:
//!
//! - **Plain** `(req, res)`: trusted to finish the response
//! - **WithNext** `(req, res, next)`: decides how dispatch continues
//! - **Error** `(err, req, res, next)`: only runs while an error is pending
//!
//! ## [`Next`]
//!
//! The continuation. A handler calls one of `proceed`, `route`, `router` or
//! `fail`; not calling it at all means the handler resolved the request.
//!
//! # Error Types
//!
//! - [`Error`] - A pending dispatch error (returned, passed to `next`, or panicked)
//! - [`ErrorKind`] - Why the error happened

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler;
mod next;
mod request;
mod response;

// Re-exports
pub use error::{BoxError, Error, ErrorKind};
pub use handler::{Handler, HandlerFuture, HandlerKind, IntoHandler, IntoOutcome, ParamCallback};
pub use next::{Control, Next, NextSignal};
pub use request::{Params, Request};
pub use response::Response;

/// Re-exported so downstream crates agree on the `http` version.
pub use http;
