//! Registration errors.

use thiserror::Error;

/// Errors raised while building a router.
///
/// Dispatch itself never fails with these; they signal misuse of the
/// registration API.
#[derive(Error, Debug)]
pub enum RouterError {
    /// `method()` was called with a name that is not an HTTP method token.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// A regular-expression pattern failed to compile.
    #[error("invalid route pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
