//! The request handle seen by handlers.
//!
//! A [`Request`] is a cheap, cloneable handle over per-request state. Handlers
//! receive it by value, so asynchronous handlers can hold on to it across
//! `.await` points without borrowing from the dispatcher.
//!
//! The router rewrites three pieces of it while walking layers:
//! [`params`](Request::params), [`base_url`](Request::base_url) and
//! [`route`](Request::route). Everything else is supplied by the host.

use http::{Extensions, HeaderMap, Method};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Path parameters captured while matching layers.
///
/// Keys compare case-insensitively; insertion order is preserved and a later
/// insert for the same key replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Merge `other` into `self`; values from `other` win.
    pub fn extend(&mut self, other: &Params) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
struct RequestState {
    method: Method,
    path: String,
    original_url: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Vec<u8>,
    params: Params,
    base_url: String,
    route: Option<String>,
    extensions: Extensions,
}

/// A shared handle to the state of one inbound request.
#[derive(Debug, Clone)]
pub struct Request {
    inner: Arc<Mutex<RequestState>>,
}

impl Request {
    /// Create a request for `method` and `uri` (path plus optional query).
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };
        let path = if path.is_empty() { "/" } else { path };
        let query = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self {
            inner: Arc::new(Mutex::new(RequestState {
                method,
                path: path.to_string(),
                original_url: uri.to_string(),
                query,
                headers: HeaderMap::new(),
                body: Vec::new(),
                params: Params::new(),
                base_url: String::new(),
                route: None,
                extensions: Extensions::new(),
            })),
        }
    }

    /// Build a request from an `http` request, taking over its headers,
    /// extensions and body.
    pub fn from_http(request: http::Request<Vec<u8>>) -> Self {
        let (parts, body) = request.into_parts();
        let uri = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let req = Self::new(parts.method, &uri);
        {
            let mut state = req.state();
            state.headers = parts.headers;
            state.extensions = parts.extensions;
            state.body = body;
        }
        req
    }

    fn state(&self) -> MutexGuard<'_, RequestState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.state().method.clone()
    }

    /// The request path, without the query string.
    pub fn path(&self) -> String {
        self.state().path.clone()
    }

    /// The URI exactly as the host supplied it.
    pub fn original_url(&self) -> String {
        self.state().original_url.clone()
    }

    /// First query-string value for `name`.
    pub fn query(&self, name: &str) -> Option<String> {
        self.state()
            .query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// A header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<String> {
        self.state()
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    /// A copy of all request headers.
    pub fn headers(&self) -> HeaderMap {
        self.state().headers.clone()
    }

    /// Insert a header. Returns `self` for chaining in test setup.
    pub fn with_header(self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.state().headers.insert(name, value);
        self
    }

    /// The raw request body.
    pub fn body(&self) -> Vec<u8> {
        self.state().body.clone()
    }

    /// Replace the raw request body.
    pub fn set_body(&self, body: impl Into<Vec<u8>>) {
        self.state().body = body.into();
    }

    /// A single path parameter.
    pub fn param(&self, name: &str) -> Option<String> {
        self.state().params.get(name).map(str::to_string)
    }

    /// All path parameters captured so far.
    pub fn params(&self) -> Params {
        self.state().params.clone()
    }

    /// Merge freshly captured parameters; later captures win.
    pub fn merge_params(&self, params: &Params) {
        self.state().params.extend(params);
    }

    /// The mount path of the currently executing layer.
    pub fn base_url(&self) -> String {
        self.state().base_url.clone()
    }

    /// Set the mount path seen by the next handler.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.state().base_url = base_url.into();
    }

    /// Pattern of the first terminal route matched for this request.
    pub fn route(&self) -> Option<String> {
        self.state().route.clone()
    }

    /// Record the matched terminal route.
    pub fn set_route(&self, route: impl Into<String>) {
        self.state().route = Some(route.into());
    }

    /// A typed extension value.
    pub fn extension<T>(&self) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.state().extensions.get::<T>().cloned()
    }

    /// Store a typed extension value, returning the previous one.
    pub fn insert_extension<T>(&self, value: T) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.state().extensions.insert(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_case_insensitive_last_write_wins() {
        let mut params = Params::new();
        params.insert("Id", "1");
        params.insert("id", "2");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("ID"), Some("2"));
    }

    #[test]
    fn test_request_splits_query() {
        let req = Request::new(Method::GET, "/search?q=rust+lang&page=2");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query("q").as_deref(), Some("rust lang"));
        assert_eq!(req.query("page").as_deref(), Some("2"));
        assert_eq!(req.original_url(), "/search?q=rust+lang&page=2");
    }

    #[test]
    fn test_from_http_keeps_headers_and_body() {
        let http_req = http::Request::builder()
            .method(Method::POST)
            .uri("/items?x=1")
            .header("content-type", "application/json")
            .body(b"{}".to_vec())
            .unwrap();
        let req = Request::from_http(http_req);
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.path(), "/items");
        assert_eq!(req.header("Content-Type").as_deref(), Some("application/json"));
        assert_eq!(req.body(), b"{}".to_vec());
    }

    #[test]
    fn test_clones_share_state() {
        let req = Request::new(Method::GET, "/");
        let other = req.clone();
        other.set_base_url("/api");
        assert_eq!(req.base_url(), "/api");
    }
}
