#![allow(dead_code)]

use trellis::{Handler, Next, Request, Response, http::Method, testing::Journal};

// ============================================================================
// Handlers
// ============================================================================

/// Sends the value of route parameter `name`.
pub fn echo_param(name: &'static str) -> Handler {
    Handler::plain(move |req: Request, res: Response| {
        res.send(req.param(name).unwrap_or_default())
    })
}

/// Sends the request's `base_url`.
pub fn echo_base_url() -> Handler {
    Handler::plain(|req: Request, res: Response| res.send(req.base_url()))
}

/// Records `label` and `base_url` as `label@base_url`, then continues.
pub fn mark_base_url(journal: &Journal, label: &'static str) -> Handler {
    let journal = journal.clone();
    Handler::with_next(move |req: Request, _res: Response, next: Next| {
        journal.record(format!("{label}@{}", req.base_url()));
        async move { next.proceed() }
    })
}

// ============================================================================
// Requests
// ============================================================================

pub fn request(method: Method, uri: &str) -> (Request, Response) {
    (Request::new(method, uri), Response::new())
}
