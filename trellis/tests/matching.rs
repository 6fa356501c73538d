//! Path pattern matching as seen through dispatch.

mod common;

use common::echo_param;
use regex::Regex;
use trellis::{
    DispatchOutcome, Next, Request, Response, Router, RouterOptions,
    http::Method,
    testing::{Journal, TestRequest, mark, respond},
};

#[tokio::test]
async fn test_parameters_are_captured() {
    let mut router = Router::new();
    router.get("/a/:x/:y", |req: Request, res: Response| {
        let params = req.params();
        let x = params.get("x").unwrap_or_default();
        let y = params.get("y").unwrap_or_default();
        res.send(format!("{x}-{y}"));
    });

    assert_eq!(TestRequest::get("/a/1/2").dispatch(&router).await.text(), "1-2");
    for path in ["/a/1", "/a/1/2/3", "/b/1/2"] {
        let result = TestRequest::get(path).dispatch(&router).await;
        assert!(matches!(result.outcome, DispatchOutcome::Unhandled), "{path}");
    }
}

#[tokio::test]
async fn test_parameters_are_url_decoded() {
    let mut router = Router::new();
    router.get("/files/:name", echo_param("name"));

    let result = TestRequest::get("/files/annual%20report.pdf").dispatch(&router).await;
    assert_eq!(result.text(), "annual report.pdf");
}

#[tokio::test]
async fn test_parameter_names_are_case_insensitive() {
    let mut router = Router::new();
    router.get("/users/:userId", echo_param("USERID"));

    assert_eq!(TestRequest::get("/users/9").dispatch(&router).await.text(), "9");
}

#[tokio::test]
async fn test_literal_matching_ignores_case_and_trailing_slash() {
    let mut router = Router::new();
    router.get("/About", respond("about"));

    assert_eq!(TestRequest::get("/about/").dispatch(&router).await.text(), "about");
    assert_eq!(TestRequest::get("/ABOUT").dispatch(&router).await.text(), "about");
}

#[tokio::test]
async fn test_root_route_answers_every_path() {
    let mut router = Router::new();
    router.get("/", respond("root"));

    for path in ["/", "/users/42", "/a/b/c/"] {
        let result = TestRequest::get(path).dispatch(&router).await;
        assert!(result.outcome.is_handled(), "{path}");
        assert_eq!(result.text(), "root", "{path}");
    }
    let post = TestRequest::post("/users/42").dispatch(&router).await;
    assert!(matches!(post.outcome, DispatchOutcome::Unhandled));
}

#[tokio::test]
async fn test_query_string_is_not_part_of_the_path() {
    let mut router = Router::new();
    router.get("/search", |req: Request, res: Response| {
        res.send(req.query("q").unwrap_or_default())
    });

    assert_eq!(TestRequest::get("/search?q=rust").dispatch(&router).await.text(), "rust");
}

#[tokio::test]
async fn test_array_of_patterns_matches_each_member() {
    let mut router = Router::new();
    router.get(["/a", "/b"], respond("hit"));

    assert_eq!(TestRequest::get("/a").dispatch(&router).await.text(), "hit");
    assert_eq!(TestRequest::get("/b").dispatch(&router).await.text(), "hit");
    let result = TestRequest::get("/c").dispatch(&router).await;
    assert!(matches!(result.outcome, DispatchOutcome::Unhandled));
}

#[tokio::test]
async fn test_array_members_are_tried_in_order() {
    let mut router = Router::new();
    router.get(vec!["/p/:first", "/p/:second"], |req: Request, res: Response| {
        let names: Vec<String> = req.params().iter().map(|(name, _)| name.to_string()).collect();
        res.send(names.join(","));
    });

    assert_eq!(TestRequest::get("/p/1").dispatch(&router).await.text(), "first");
}

#[tokio::test]
async fn test_wildcard_matches_everything_below_its_prefix() {
    let mut router = Router::new();
    router.get("/static/*", respond("asset"));

    let hit = TestRequest::get("/STATIC/css/site.css").dispatch(&router).await;
    assert_eq!(hit.text(), "asset");
    let miss = TestRequest::get("/static").dispatch(&router).await;
    assert!(matches!(miss.outcome, DispatchOutcome::Unhandled));
}

#[tokio::test]
async fn test_regex_patterns_surface_named_groups() {
    let mut router = Router::new();
    router.get(
        Regex::new(r"^/v(?P<version>\d+)/status$").unwrap(),
        echo_param("version"),
    );

    assert_eq!(TestRequest::get("/v2/status").dispatch(&router).await.text(), "2");
    let miss = TestRequest::get("/vx/status").dispatch(&router).await;
    assert!(matches!(miss.outcome, DispatchOutcome::Unhandled));
}

#[tokio::test]
async fn test_missing_pattern_matches_everything() {
    let journal = Journal::new();
    let mut router = Router::new();
    router.use_at(None::<&str>, mark(&journal, "global"));

    TestRequest::get("/any/path").dispatch(&router).await;
    TestRequest::new(Method::OPTIONS, "/").dispatch(&router).await;
    assert_eq!(journal.count(), 2);
}

#[tokio::test]
async fn test_non_pattern_values_never_match() {
    let journal = Journal::new();
    let mut router = Router::new();
    router.use_at(42_i32, mark(&journal, "never"));

    TestRequest::get("/").dispatch(&router).await;
    TestRequest::get("/42").dispatch(&router).await;
    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn test_case_sensitive_option() {
    let mut router = Router::with_options(RouterOptions::new().case_sensitive(true));
    router.get("/Docs", respond("docs"));

    assert_eq!(TestRequest::get("/Docs").dispatch(&router).await.text(), "docs");
    let miss = TestRequest::get("/docs").dispatch(&router).await;
    assert!(matches!(miss.outcome, DispatchOutcome::Unhandled));
}

#[tokio::test]
async fn test_strict_option_keeps_trailing_slash_significant() {
    let mut router = Router::with_options(RouterOptions::new().strict(true));
    router.get("/dir/", respond("dir")).get("/file", respond("file"));

    assert_eq!(TestRequest::get("/dir/").dispatch(&router).await.text(), "dir");
    assert_eq!(TestRequest::get("/file").dispatch(&router).await.text(), "file");
    for path in ["/dir", "/file/"] {
        let miss = TestRequest::get(path).dispatch(&router).await;
        assert!(matches!(miss.outcome, DispatchOutcome::Unhandled), "{path}");
    }
}

#[tokio::test]
async fn test_params_from_earlier_layers_stay_visible() {
    let mut router = Router::new();
    router
        .use_at("/org/:org", |_req: Request, _res: Response, next: Next| async move {
            next.proceed()
        })
        .get(Regex::new(r"^/org/[^/]+/members$").unwrap(), echo_param("org"));

    let result = TestRequest::get("/org/acme/members").dispatch(&router).await;
    assert_eq!(result.text(), "acme");
}
