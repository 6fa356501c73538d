//! Testing utilities for Trellis.
//!
//! This module provides helpers for exercising routers without a server.
//!
//! # Features
//!
//! - [`Journal`]: A shared log that handlers append labels to
//! - [`mark`] / [`mark_error`]: Pass-through handlers that write to a journal
//! - [`respond`]: A plain handler that finishes the response with a body
//! - [`TestRequest`]: A request builder that dispatches and collects the result

use crate::routing::{DispatchOutcome, Router};
use http::{HeaderName, HeaderValue, Method, StatusCode};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trellis_core::{Error, Handler, Next, Request, Response};

// ============================================================================
// Journal
// ============================================================================

/// A shared, ordered record of what ran.
///
/// Clones write to the same log.
///
/// # Example
///
/// ```rust,ignore
/// let journal = Journal::new();
/// router.use_handler(mark(&journal, "auth")).get("/", respond("ok"));
///
/// TestRequest::get("/").dispatch(&router).await;
/// assert_eq!(journal.entries(), ["auth"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// Get a copy of the entries so far.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Get the number of entries.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler that records `label` and calls `next`.
pub fn mark(journal: &Journal, label: impl Into<String>) -> Handler {
    let journal = journal.clone();
    let label = label.into();
    Handler::with_next(move |_req, _res, next: Next| {
        journal.record(label.clone());
        async move { next.proceed() }
    })
}

/// An error handler that records `label: error` and passes the error on.
pub fn mark_error(journal: &Journal, label: impl Into<String>) -> Handler {
    let journal = journal.clone();
    let label = label.into();
    Handler::error(move |err: Error, _req, _res, next: Next| {
        journal.record(format!("{label}: {err}"));
        async move { next.fail(err) }
    })
}

/// A plain handler that sends `body`.
pub fn respond(body: impl Into<String>) -> Handler {
    let body = body.into();
    Handler::plain(move |_req, res: Response| res.send(body.clone()))
}

// ============================================================================
// Test Request
// ============================================================================

/// Builds a [`Request`], dispatches it and keeps the result.
#[derive(Debug)]
pub struct TestRequest {
    request: Request,
}

impl TestRequest {
    /// Start a request for `method` and `uri`.
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            request: Request::new(method, uri),
        }
    }

    /// Start a `GET` request.
    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Start a `POST` request.
    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Add a header.
    pub fn header(self, name: HeaderName, value: HeaderValue) -> Self {
        Self {
            request: self.request.with_header(name, value),
        }
    }

    /// Set the raw body.
    pub fn body(self, body: impl Into<Vec<u8>>) -> Self {
        self.request.set_body(body);
        self
    }

    /// The request built so far.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Run the request through `router`.
    pub async fn dispatch(self, router: &Router) -> TestResponse {
        let response = Response::new();
        let outcome = router.dispatch(&self.request, &response).await;
        TestResponse {
            request: self.request,
            response,
            outcome,
        }
    }
}

/// What a dispatched [`TestRequest`] produced.
#[derive(Debug)]
pub struct TestResponse {
    /// The request, with the state dispatch left on it.
    pub request: Request,
    /// The response handlers wrote to.
    pub response: Response,
    /// How dispatch ended.
    pub outcome: DispatchOutcome,
}

impl TestResponse {
    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.response.status_code()
    }

    /// The response body as text.
    pub fn text(&self) -> String {
        self.response.body_string()
    }

    /// A response header, if set.
    pub fn header(&self, name: &str) -> Option<String> {
        self.response.get_header(name)
    }

    /// The unhandled error, if dispatch ended with one.
    pub fn error(&self) -> Option<&Error> {
        self.outcome.error()
    }
}

// ============================================================================
// Tests
// ============================================================================
