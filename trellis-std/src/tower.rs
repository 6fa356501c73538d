//! Tower integration for Trellis.
//!
//! [`RouterService`] exposes a finished [`Router`] as a tower `Service`, so
//! any tower-based host (or tower middleware such as timeouts) can drive it.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_std::tower::RouterService;
//!
//! let service = RouterService::new(router);
//! let response = service.clone().call(request).await?;
//! ```

use crate::routing::Router;
use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

// ============================================================================
// Router → Service Adapter
// ============================================================================

/// Wraps a [`Router`] as a tower `Service` over `http` types.
///
/// Requests nothing answered get `404 Not Found`; requests that end with an
/// unhandled error get `500 Internal Server Error`.
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    /// Create a service that dispatches through `router`.
    pub fn new(router: impl Into<Arc<Router>>) -> Self {
        Self {
            router: router.into(),
        }
    }

    /// Get a reference to the inner router.
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl ::tower::Service<http::Request<Vec<u8>>> for RouterService {
    type Response = http::Response<Vec<u8>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Routers are always ready
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Vec<u8>>) -> Self::Future {
        let router = Arc::clone(&self.router);
        Box::pin(async move { Ok(router.handle(request).await) })
    }
}

/// Convert a router into a tower `Service`.
pub fn into_service(router: Router) -> RouterService {
    RouterService::new(router)
}

// ============================================================================
// Tests
// ============================================================================
