//! Handler calling conventions.
//!
//! A [`Handler`] is one of three shapes, fixed when it is built:
//!
//! - [`HandlerKind::Plain`]: `(req, res)`, synchronous, always finishes the
//!   response.
//! - [`HandlerKind::WithNext`]: `(req, res, next)`, asynchronous,
//!   next-gated.
//! - [`HandlerKind::Error`]: `(err, req, res, next)`, asynchronous, only runs
//!   while an error is pending.
//!
//! Closures convert through [`IntoHandler`]; the parameter list picks the
//! shape, so `|req: Request, res: Response| ...` becomes a plain handler and
//! `|err: Error, req: Request, res: Response, next: Next| async move { ... }`
//! an error handler.

use crate::{
    error::{BoxError, Error},
    next::Next,
    request::Request,
    response::Response,
};
use futures::future::BoxFuture;
use std::{fmt, future::Future, sync::Arc};

/// The future returned by asynchronous handlers.
pub type HandlerFuture = BoxFuture<'static, Result<(), Error>>;

type PlainFn = dyn Fn(Request, Response) -> Result<(), Error> + Send + Sync;
type WithNextFn = dyn Fn(Request, Response, Next) -> HandlerFuture + Send + Sync;
type ErrorFn = dyn Fn(Error, Request, Response, Next) -> HandlerFuture + Send + Sync;
type ParamFn = dyn Fn(Request, Response, Next, String, String) -> HandlerFuture + Send + Sync;

// ============================================================================
// Outcome conversion
// ============================================================================

/// Conversion of a handler's return value into success or a thrown error.
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<(), E>` → `Err` becomes the pending error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid handler return type",
    label = "expected `()` or `Result<(), E>`"
)]
pub trait IntoOutcome {
    /// Convert into the dispatcher's view of the result.
    fn into_outcome(self) -> Result<(), Error>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), Error> {
        Ok(())
    }
}

impl<E> IntoOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), Error> {
        self.map_err(Error::new)
    }
}

fn boxed<Fut, R>(fut: Fut) -> HandlerFuture
where
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome,
{
    Box::pin(async move { fut.await.into_outcome() })
}

// ============================================================================
// Handler
// ============================================================================

/// Calling convention of a [`Handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// `(req, res)`
    Plain,
    /// `(req, res, next)`
    WithNext,
    /// `(err, req, res, next)`
    Error,
}

impl HandlerKind {
    /// The number of parameters the convention takes.
    pub fn arity(self) -> usize {
        match self {
            HandlerKind::Plain => 2,
            HandlerKind::WithNext => 3,
            HandlerKind::Error => 4,
        }
    }
}

/// A registered handler.
///
/// Cloning shares the underlying callable.
#[derive(Clone)]
pub enum Handler {
    /// `(req, res)`
    Plain(Arc<PlainFn>),
    /// `(req, res, next)`
    WithNext(Arc<WithNextFn>),
    /// `(err, req, res, next)`
    Error(Arc<ErrorFn>),
}

impl Handler {
    /// Build a plain handler.
    pub fn plain<F, R>(f: F) -> Self
    where
        F: Fn(Request, Response) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        Handler::Plain(Arc::new(move |req, res| f(req, res).into_outcome()))
    }

    /// Build a next-gated handler.
    pub fn with_next<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, Response, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        Handler::WithNext(Arc::new(move |req, res, next| boxed(f(req, res, next))))
    }

    /// Build an error handler.
    pub fn error<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Error, Request, Response, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        Handler::Error(Arc::new(move |err, req, res, next| boxed(f(err, req, res, next))))
    }

    /// The handler's calling convention.
    pub fn kind(&self) -> HandlerKind {
        match self {
            Handler::Plain(_) => HandlerKind::Plain,
            Handler::WithNext(_) => HandlerKind::WithNext,
            Handler::Error(_) => HandlerKind::Error,
        }
    }

    /// The handler's declared arity.
    pub fn arity(&self) -> usize {
        self.kind().arity()
    }

    /// Whether this handler runs given the current error state.
    ///
    /// Error handlers run only while an error is pending; every other kind
    /// runs only while none is.
    pub fn accepts(&self, error_pending: bool) -> bool {
        (self.kind() == HandlerKind::Error) == error_pending
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.kind()).finish()
    }
}

// ============================================================================
// IntoHandler
// ============================================================================

/// Conversion into a [`Handler`].
///
/// `M` is a marker naming the closure signature; it is always inferred.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a handler",
    label = "not a handler",
    note = "handlers take `(Request, Response)`, `(Request, Response, Next)` or `(Error, Request, Response, Next)`"
)]
pub trait IntoHandler<M>: Send + Sync + 'static {
    /// Perform the conversion.
    fn into_handler(self) -> Handler;
}

impl IntoHandler<Handler> for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

impl<F, R> IntoHandler<fn(Request, Response) -> R> for F
where
    F: Fn(Request, Response) -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn into_handler(self) -> Handler {
        Handler::plain(self)
    }
}

impl<F, Fut, R> IntoHandler<fn(Request, Response, Next) -> (Fut, R)> for F
where
    F: Fn(Request, Response, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome,
{
    fn into_handler(self) -> Handler {
        Handler::with_next(self)
    }
}

impl<F, Fut, R> IntoHandler<fn(Error, Request, Response, Next) -> (Fut, R)> for F
where
    F: Fn(Error, Request, Response, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome,
{
    fn into_handler(self) -> Handler {
        Handler::error(self)
    }
}

// ============================================================================
// Param callbacks
// ============================================================================

/// A callback bound to a route parameter name.
///
/// Invoked as `(req, res, next, value, name)` with the same `next` protocol
/// as handlers.
#[derive(Clone)]
pub struct ParamCallback {
    f: Arc<ParamFn>,
}

impl ParamCallback {
    /// Wrap an asynchronous callback.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, Response, Next, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        Self {
            f: Arc::new(move |req, res, next, value, name| boxed(f(req, res, next, value, name))),
        }
    }

    /// Invoke the callback.
    pub fn call(
        &self,
        req: Request,
        res: Response,
        next: Next,
        value: String,
        name: String,
    ) -> HandlerFuture {
        (self.f)(req, res, next, value, name)
    }
}

impl fmt::Debug for ParamCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParamCallback")
    }
}
