//! The response sink handed to handlers.
//!
//! Like [`Request`](crate::Request), a [`Response`] is a shared handle: every
//! clone writes to the same underlying state. The dispatcher only inspects
//! [`ended`](Response::ended) to decide whether to keep walking layers.

use crate::error::Error;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    ended: bool,
}

/// A shared handle to the outgoing response of one request.
#[derive(Debug, Clone)]
pub struct Response {
    inner: Arc<Mutex<ResponseState>>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Create an empty `200 OK` response.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ResponseState {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: Vec::new(),
                ended: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, ResponseState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the status code.
    pub fn status(&self, status: StatusCode) -> &Self {
        self.state().status = status;
        self
    }

    /// The current status code.
    pub fn status_code(&self) -> StatusCode {
        self.state().status
    }

    /// Set a header, replacing any previous value.
    pub fn set(&self, name: &str, value: &str) -> Result<&Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(Error::new)?;
        let value = HeaderValue::from_str(value).map_err(Error::new)?;
        self.state().headers.insert(name, value);
        Ok(self)
    }

    /// Read back a response header.
    pub fn get_header(&self, name: &str) -> Option<String> {
        self.state()
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    /// Write `body` and finish the response.
    ///
    /// Defaults the content type to `text/plain` when none was set.
    pub fn send(&self, body: impl Into<Vec<u8>>) {
        let mut state = self.state();
        state
            .headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("text/plain; charset=utf-8"));
        state.body = body.into();
        state.ended = true;
    }

    /// Serialize `value` as JSON and finish the response.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(value).map_err(Error::new)?;
        let mut state = self.state();
        state.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        state.body = body;
        state.ended = true;
        Ok(())
    }

    /// Set the status and send its canonical reason phrase as the body.
    pub fn send_status(&self, status: StatusCode) {
        self.status(status);
        self.send(status.canonical_reason().unwrap_or_default());
    }

    /// Finish the response without touching the body.
    pub fn end(&self) {
        self.state().ended = true;
    }

    /// Returns `true` once the response has been finished.
    pub fn ended(&self) -> bool {
        self.state().ended
    }

    /// Alias of [`ended`](Self::ended).
    pub fn headers_sent(&self) -> bool {
        self.ended()
    }

    /// A copy of the response body.
    pub fn body(&self) -> Vec<u8> {
        self.state().body.clone()
    }

    /// The response body decoded as UTF-8, lossily.
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.state().body).into_owned()
    }

    /// A copy of the response headers.
    pub fn headers(&self) -> HeaderMap {
        self.state().headers.clone()
    }

    /// Convert into an `http` response for the host.
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let state = self.state();
        let mut response = http::Response::new(state.body.clone());
        *response.status_mut() = state.status;
        *response.headers_mut() = state.headers.clone();
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct User {
        id: u32,
        name: &'static str,
    }

    #[test]
    fn test_send_ends_and_defaults_content_type() {
        let res = Response::new();
        assert!(!res.ended());
        res.send("hi");
        assert!(res.ended());
        assert!(res.headers_sent());
        assert_eq!(res.body_string(), "hi");
        assert_eq!(
            res.get_header("content-type").as_deref(),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn test_end_without_body() {
        let res = Response::new();
        assert!(!res.headers_sent());
        res.end();
        assert!(res.headers_sent());
        assert!(res.body().is_empty());
    }

    #[test]
    fn test_send_keeps_explicit_content_type() {
        let res = Response::new();
        res.set("Content-Type", "text/html").unwrap().send("<p>");
        assert_eq!(res.get_header("content-type").as_deref(), Some("text/html"));
    }

    #[test]
    fn test_json_body() {
        let res = Response::new();
        res.json(&User { id: 7, name: "ada" }).unwrap();
        assert_eq!(res.body_string(), r#"{"id":7,"name":"ada"}"#);
        assert_eq!(
            res.get_header("content-type").as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_invalid_header_name_is_error() {
        let res = Response::new();
        assert!(res.set("bad header", "x").is_err());
    }

    #[test]
    fn test_into_http() {
        let res = Response::new();
        res.send_status(StatusCode::NOT_FOUND);
        let http = res.into_http();
        assert_eq!(http.status(), StatusCode::NOT_FOUND);
        assert_eq!(http.body(), b"Not Found");
    }
}
