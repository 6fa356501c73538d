//! The per-request dispatch loop.
//!
//! Layers are walked in registration order. For each matching layer the
//! dispatcher rewrites `base_url`, merges captured params, runs any param
//! callbacks that have not yet seen their value, then runs the layer's
//! handlers one at a time. A handler must call `next`, finish the response,
//! or fail before anything else happens.
//!
//! While an error is pending, only error handlers run. An error handler
//! that calls `next.proceed()` clears it.

use super::{layer::Layer, params::SeenParams, router::Router};
use futures::FutureExt;
use http::StatusCode;
use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
};
use trellis_core::{Control, Error, Handler, HandlerFuture, Next, NextSignal, Request, Response};

/// How a call to [`Router::dispatch`] ended.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A handler finished the response.
    Handled,
    /// Every layer was tried and nothing finished the response.
    Unhandled,
    /// Every layer was tried and an error was still pending.
    Failed(Error),
    /// A handler called `next.router()`.
    Exited,
}

impl DispatchOutcome {
    /// Returns `true` if the response was finished.
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled)
    }

    /// The unhandled error, if dispatch ended with one.
    pub fn error(&self) -> Option<&Error> {
        match self {
            DispatchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What a layer's handlers asked for.
enum LayerFlow {
    Ended,
    Advance,
    Route,
    Router,
}

/// What one handler or param callback asked for.
enum Step {
    Control(Control),
    /// Finished without calling `next`.
    Silent,
    Failed(Error),
}

impl Router {
    /// Run the request through this router.
    ///
    /// Never returns an application error as `Err`; the result says whether
    /// the response was finished, and with what error if not. Dropping the
    /// returned future stops the walk and runs no further handlers.
    pub async fn dispatch(&self, req: &Request, res: &Response) -> DispatchOutcome {
        let path = req.path();
        let method = req.method();
        let options = self.options.matching();
        let mut error: Option<Error> = None;
        let mut seen = SeenParams::default();

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, %path, layers = self.layers.len(), "dispatch");

        for layer in &self.layers {
            let Some(found) = layer.match_request(&path, method.as_str(), options) else {
                continue;
            };

            #[cfg(feature = "tracing")]
            tracing::trace!(
                pattern = %layer.pattern(),
                middleware = layer.is_middleware(),
                error_pending = error.is_some(),
                "layer matched"
            );

            req.set_base_url(layer.base_url(&path, &found, options));
            req.merge_params(&found.params);
            if !layer.is_middleware() && req.route().is_none() {
                req.set_route(layer.pattern().to_string());
            }

            // Callbacks run even with an error pending; a failing one replaces it.
            match self.run_param_callbacks(layer, req, res, &mut seen).await {
                Some(Step::Control(Control::Route)) => continue,
                Some(Step::Control(Control::Router)) => return exited(),
                Some(Step::Control(Control::Error(err)) | Step::Failed(err)) => {
                    error = Some(err);
                }
                Some(Step::Control(Control::Continue) | Step::Silent) | None => {}
            }
            if res.ended() {
                return handled();
            }

            match run_handlers(layer, req, res, &mut error).await {
                LayerFlow::Ended => return handled(),
                LayerFlow::Router => return exited(),
                LayerFlow::Route | LayerFlow::Advance => {}
            }

            if res.ended() {
                return handled();
            }
        }

        match error {
            Some(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "dispatch finished with an unhandled error");
                DispatchOutcome::Failed(err)
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!("dispatch finished without a response");
                DispatchOutcome::Unhandled
            }
        }
    }

    /// Run the param callbacks that apply to `layer` for values not yet seen.
    ///
    /// Returns the first step that interrupts the normal flow, if any.
    async fn run_param_callbacks(
        &self,
        layer: &Layer,
        req: &Request,
        res: &Response,
        seen: &mut SeenParams,
    ) -> Option<Step> {
        let table = layer.param_table().unwrap_or(&self.params);
        if table.is_empty() {
            return None;
        }

        for (name, value) in req.params().iter() {
            let callbacks = table.callbacks(name);
            if callbacks.is_empty() || !seen.insert(table, name, value) {
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(param = name, value, callbacks = callbacks.len(), "param callbacks");

            for callback in callbacks {
                let (next, signal) = Next::channel();
                let call = catch_unwind(AssertUnwindSafe(|| {
                    callback.call(
                        req.clone(),
                        res.clone(),
                        next,
                        value.to_string(),
                        name.to_string(),
                    )
                }));
                match settle(call, signal, res).await {
                    Step::Control(Control::Continue) | Step::Silent => {}
                    step => return Some(step),
                }
            }
        }
        None
    }

    /// Dispatch an [`http::Request`] and build the response.
    ///
    /// Requests nothing answered get `404 Not Found`; an unhandled error
    /// gets `500 Internal Server Error`. Either way, a response that was
    /// already finished is returned as the handlers left it.
    pub async fn handle(&self, request: http::Request<Vec<u8>>) -> http::Response<Vec<u8>> {
        let req = Request::from_http(request);
        let res = Response::new();
        let outcome = self.dispatch(&req, &res).await;
        if !res.ended() {
            match outcome {
                DispatchOutcome::Failed(_) => res.send_status(StatusCode::INTERNAL_SERVER_ERROR),
                _ => res.send_status(StatusCode::NOT_FOUND),
            }
        }
        res.into_http()
    }
}

/// Run a layer's handlers in order under the current error state.
async fn run_handlers(
    layer: &Layer,
    req: &Request,
    res: &Response,
    error: &mut Option<Error>,
) -> LayerFlow {
    for handler in layer.handlers() {
        if !handler.accepts(error.is_some()) {
            continue;
        }

        let step = match handler {
            Handler::Plain(f) => {
                match catch_unwind(AssertUnwindSafe(|| f(req.clone(), res.clone()))) {
                    Ok(Ok(())) => return LayerFlow::Ended,
                    Ok(Err(err)) => Step::Failed(err),
                    Err(panic) => Step::Failed(Error::panic(panic)),
                }
            }
            Handler::WithNext(f) => {
                let (next, signal) = Next::channel();
                let call = catch_unwind(AssertUnwindSafe(|| f(req.clone(), res.clone(), next)));
                settle(call, signal, res).await
            }
            Handler::Error(f) => {
                let Some(pending) = error.clone() else {
                    continue;
                };
                let (next, signal) = Next::channel();
                let call = catch_unwind(AssertUnwindSafe(|| {
                    f(pending, req.clone(), res.clone(), next)
                }));
                settle(call, signal, res).await
            }
        };

        match step {
            Step::Silent => return LayerFlow::Ended,
            Step::Control(Control::Continue) => {
                if error.take().is_some() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("error cleared by error handler");
                }
            }
            Step::Control(Control::Route) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("next(\"route\")");
                return LayerFlow::Route;
            }
            Step::Control(Control::Router) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("next(\"router\")");
                return LayerFlow::Router;
            }
            Step::Control(Control::Error(err)) | Step::Failed(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "error pending");
                *error = Some(err);
            }
        }
    }
    LayerFlow::Advance
}

/// Drive an asynchronous handler to completion and read its `next` signal.
async fn settle(
    call: Result<HandlerFuture, Box<dyn Any + Send>>,
    signal: NextSignal,
    res: &Response,
) -> Step {
    let future = match call {
        Ok(future) => future,
        Err(panic) => return Step::Failed(Error::panic(panic)),
    };
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(())) => match signal.settle(res).await {
            Some(control) => Step::Control(control),
            None => Step::Silent,
        },
        Ok(Err(err)) => Step::Failed(err),
        Err(panic) => Step::Failed(Error::panic(panic)),
    }
}

fn handled() -> DispatchOutcome {
    #[cfg(feature = "tracing")]
    tracing::debug!("response finished");
    DispatchOutcome::Handled
}

fn exited() -> DispatchOutcome {
    #[cfg(feature = "tracing")]
    tracing::debug!("next(\"router\"), leaving router");
    DispatchOutcome::Exited
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    fn mark(log: &Log, label: &'static str) -> Handler {
        let log = Arc::clone(log);
        Handler::with_next(move |_req, _res, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(label.to_string());
                next.proceed();
            }
        })
    }

    async fn run(router: &Router, method: Method, uri: &str) -> (DispatchOutcome, Response) {
        let req = Request::new(method, uri);
        let res = Response::new();
        let outcome = router.dispatch(&req, &res).await;
        (outcome, res)
    }

    #[tokio::test]
    async fn test_middleware_then_route() {
        let log = log();
        let mut router = Router::new();
        router
            .use_handler(mark(&log, "mw"))
            .get("/a", |_req: Request, res: Response| res.send("a"));
        let (outcome, res) = run(&router, Method::GET, "/a").await;
        assert!(outcome.is_handled());
        assert_eq!(res.body_string(), "a");
        assert_eq!(entries(&log), ["mw"]);
    }

    #[tokio::test]
    async fn test_unmatched_is_unhandled() {
        let mut router = Router::new();
        router.get("/a", |_req: Request, res: Response| res.send("a"));
        let (outcome, res) = run(&router, Method::POST, "/a").await;
        assert!(matches!(outcome, DispatchOutcome::Unhandled));
        assert!(!res.ended());
    }

    #[tokio::test]
    async fn test_next_route_skips_rest_of_layer() {
        let log = log();
        let mut router = Router::new();
        router
            .get(
                "/x",
                (
                    |_req: Request, _res: Response, next: Next| async move { next.route() },
                    mark(&log, "skipped"),
                ),
            )
            .get("/x", mark(&log, "second"));
        let (outcome, _) = run(&router, Method::GET, "/x").await;
        assert!(matches!(outcome, DispatchOutcome::Unhandled));
        assert_eq!(entries(&log), ["second"]);
    }

    #[tokio::test]
    async fn test_next_router_exits() {
        let log = log();
        let mut router = Router::new();
        router
            .use_handler(|_req: Request, _res: Response, next: Next| async move { next.router() })
            .use_handler(mark(&log, "never"));
        let (outcome, _) = run(&router, Method::GET, "/").await;
        assert!(matches!(outcome, DispatchOutcome::Exited));
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn test_error_skips_to_error_handler() {
        let log = log();
        let seen = log.clone();
        let mut router = Router::new();
        router
            .use_handler(|_req: Request, _res: Response, next: Next| async move {
                next.fail(Error::msg("boom"))
            })
            .use_handler(mark(&log, "skipped"))
            .use_handler(
                move |err: Error, _req: Request, res: Response, _next: Next| {
                    let seen = seen.clone();
                    async move {
                        seen.lock().unwrap().push(err.to_string());
                        res.status(StatusCode::INTERNAL_SERVER_ERROR).send("handled");
                    }
                },
            );
        let (outcome, res) = run(&router, Method::GET, "/").await;
        assert!(outcome.is_handled());
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(entries(&log), ["boom"]);
    }

    #[tokio::test]
    async fn test_panics_become_errors() {
        let mut router = Router::new();
        router.get("/p", |_req: Request, _res: Response| -> Result<(), Error> {
            panic!("kaboom")
        });
        let (outcome, _) = run(&router, Method::GET, "/p").await;
        let err = outcome.error().unwrap();
        assert!(err.is_panic());
        assert!(err.to_string().contains("kaboom"));
    }

    #[tokio::test]
    async fn test_error_handler_can_recover() {
        let log = log();
        let mut router = Router::new();
        router
            .use_handler(|_req: Request, _res: Response| -> Result<(), Error> {
                Err(Error::msg("first"))
            })
            .use_handler(|_err: Error, _req: Request, _res: Response, next: Next| async move {
                next.proceed()
            })
            .use_handler(mark(&log, "after"));
        let (outcome, _) = run(&router, Method::GET, "/").await;
        assert!(matches!(outcome, DispatchOutcome::Unhandled));
        assert_eq!(entries(&log), ["after"]);
    }

    #[tokio::test]
    async fn test_param_callback_runs_once_per_value() {
        let log = log();
        let calls = log.clone();
        let mut router = Router::new();
        router
            .param("id", move |_req, _res, next: Next, value: String, _name| {
                let calls = calls.clone();
                async move {
                    calls.lock().unwrap().push(value);
                    next.proceed();
                }
            })
            .get("/u/:id", |_req: Request, _res: Response, next: Next| async move {
                next.proceed()
            })
            .get("/u/:id", |req: Request, res: Response| {
                res.send(req.param("id").unwrap_or_default())
            });
        let (outcome, res) = run(&router, Method::GET, "/u/7").await;
        assert!(outcome.is_handled());
        assert_eq!(res.body_string(), "7");
        assert_eq!(entries(&log), ["7"]);
    }

    #[tokio::test]
    async fn test_handle_maps_outcomes_to_status() {
        let mut router = Router::new();
        router
            .get("/ok", |_req: Request, res: Response| res.send("ok"))
            .get("/fail", |_req: Request, _res: Response| -> Result<(), Error> {
                Err(Error::msg("nope"))
            });

        let request = |uri: &str| {
            http::Request::builder()
                .uri(uri)
                .body(Vec::new())
                .unwrap()
        };
        let ok = router.handle(request("/ok")).await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.body(), b"ok");
        assert_eq!(router.handle(request("/missing")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            router.handle(request("/fail")).await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
