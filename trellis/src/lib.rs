//! # trellis - Ordered-Layer HTTP Dispatch
//!
//! `trellis` routes a request through an ordered list of layers: middleware
//! that matches a path prefix, and routes that match a whole path and a
//! method. Handlers pass control along with a [`Next`] continuation, hand
//! errors to error handlers, and can skip the rest of a route or leave a
//! router altogether.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trellis::prelude::*;
//!
//! let mut app = Application::new();
//! app.use_handler(logger())
//!     .get("/users/:id", |req: Request, res: Response| {
//!         res.send(format!("user {}", req.param("id").unwrap_or_default()));
//!     })
//!     .use_handler(|err: Error, _req: Request, res: Response, _next: Next| async move {
//!         res.status(StatusCode::INTERNAL_SERVER_ERROR).send(err.to_string());
//!     });
//!
//! let response = app.handle(http_request).await;
//! ```
//!
//! ## Handler Shapes
//!
//! | Parameters                    | Kind       | Continues by              |
//! |-------------------------------|------------|---------------------------|
//! | `(req, res)`                  | plain      | never; it ends the request |
//! | `(req, res, next)`            | with-next  | calling `next`            |
//! | `(err, req, res, next)`       | error      | calling `next`            |
//!
//! ## Mounting
//!
//! Routers and applications are mounted by copy: `use_at("/admin", &child)`
//! splices rebased copies of the child's layers into the parent.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod application;
mod settings;

pub use application::Application;
pub use settings::Settings;

pub use trellis_core::{
    // Error types
    BoxError,
    // Control flow
    Control,
    Error,
    ErrorKind,
    // Handler
    Handler,
    HandlerFuture,
    HandlerKind,
    IntoHandler,
    IntoOutcome,
    Next,
    ParamCallback,
    // Request / Response
    Params,
    Request,
    Response,
    http,
};

pub use trellis_std::{
    DispatchOutcome, IntoStack, Layer, Mountable, Route, Router, RouterError, RouterOptions,
};

/// Path patterns and matching.
pub mod path {
    pub use trellis_std::path::{
        MatchOptions, PathMatch, PathPattern, PathSpec, Shape, combine, normalize,
    };
}

/// Routing internals: the verb table, param tables and stack flattening.
pub mod routing {
    pub use trellis_std::routing::{METHODS, ParamTable, Stage, flatten, is_known};
}

/// Standard middleware.
pub mod middleware {
    pub use trellis_std::middleware::logger;
}

/// Testing utilities.
pub mod testing {
    pub use trellis_std::testing::{
        Journal, TestRequest, TestResponse, mark, mark_error, respond,
    };
}

/// Tower integration.
#[cfg(feature = "tower")]
pub mod tower {
    pub use trellis_std::tower::{RouterService, into_service};
}

/// Prelude module - common imports for Trellis.
///
/// # Usage
///
/// ```rust,ignore
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Application,
        // Errors
        BoxError,
        DispatchOutcome,
        Error,
        // Core types
        Handler,
        Next,
        Request,
        Response,
        Router,
        RouterOptions,
        http::{Method, StatusCode},
        middleware::logger,
        path::PathPattern,
    };
}
