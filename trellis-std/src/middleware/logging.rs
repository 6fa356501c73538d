//! Request logging middleware.

use trellis_core::{Handler, Next, Request, Response};

/// Middleware that logs each request's method and path, then continues.
///
/// Logs at `info` level when the `tracing` feature is enabled; otherwise it
/// only passes the request on.
pub fn logger() -> Handler {
    Handler::with_next(|req: Request, _res: Response, next: Next| async move {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(
                method = %req.method(),
                path = %req.path(),
                base_url = %req.base_url(),
                "request"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = req;
        }
        next.proceed();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{DispatchOutcome, Router};
    use http::Method;

    #[tokio::test]
    async fn test_logger_passes_through() {
        let mut router = Router::new();
        router
            .use_handler(logger())
            .get("/", |_req: Request, res: Response| res.send("home"));

        let res = Response::new();
        let outcome = router.dispatch(&Request::new(Method::GET, "/"), &res).await;
        assert!(matches!(outcome, DispatchOutcome::Handled));
        assert_eq!(res.body_string(), "home");
    }
}
