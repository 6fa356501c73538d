//! Error types for Trellis.
//!
//! Every failure that happens while a request is being dispatched funnels into
//! a single [`Error`] value, regardless of how it was produced:
//!
//! - a handler returned `Err(..)`
//! - a handler handed an error to `next`
//! - a handler panicked
//!
//! [`Error`] is cheap to clone so the same pending error can be offered to
//! every error handler further down the chain.

use std::{fmt, sync::Arc};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The concrete reason behind an [`Error`].
#[derive(Error, Debug)]
pub enum ErrorKind {
    /// A handler returned an error or passed one to `next`.
    #[error(transparent)]
    Handler(BoxError),

    /// A handler panicked while running.
    #[error("handler panicked: {0}")]
    Panic(String),
}

/// A pending dispatch error.
///
/// Cloning shares the underlying error.
#[derive(Clone)]
pub struct Error {
    kind: Arc<ErrorKind>,
}

impl Error {
    /// Wrap any error value.
    ///
    /// Wrapping an existing [`Error`] returns it unchanged instead of nesting it.
    pub fn new(err: impl Into<BoxError>) -> Self {
        let boxed: BoxError = err.into();
        match boxed.downcast::<Error>() {
            Ok(existing) => *existing,
            Err(other) => Self::from_kind(ErrorKind::Handler(other)),
        }
    }

    /// Create an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(message.into())
    }

    /// Create an error describing a caught panic payload.
    pub fn panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::from_kind(ErrorKind::Panic(message))
    }

    fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind: Arc::new(kind),
        }
    }

    /// The reason behind this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns `true` if this error was produced by a panicking handler.
    pub fn is_panic(&self) -> bool {
        matches!(*self.kind, ErrorKind::Panic(_))
    }

    /// Attempt to view the application error carried by this value.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match &*self.kind {
            ErrorKind::Handler(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.kind, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.kind, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}
