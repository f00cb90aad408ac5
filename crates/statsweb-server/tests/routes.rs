//! Router tests via `tower::ServiceExt::oneshot`, no TCP listener.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Cursor;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use statsweb_core::curve::CurveParams;
use statsweb_server::app_state::AppState;
use statsweb_server::config::ServerConfig;
use statsweb_server::router::build_router;

fn test_state() -> AppState {
    let mut cfg = ServerConfig::default();
    cfg.statsd.enabled = false;
    cfg.curve = CurveParams {
        size: 30,
        frames: 5,
        ..CurveParams::default()
    };
    cfg.validate().unwrap();
    AppState::new(cfg, None)
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn help_lists_routes_and_counts() {
    let state = test_state();
    let app = build_router(state.clone());

    let (status, body) = get_text(&app, "/help").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Usage"));
    assert!(body.contains("\"/lissajous\""));

    let reg = state.registry();
    assert_eq!(reg.counter("help.pageview.count"), Some(1));
    assert_eq!(reg.counter("total.pageview.count"), Some(1));
    assert_eq!(reg.counter("get.requests.counter"), Some(1));
}

#[tokio::test]
async fn unknown_path_is_echoed() {
    let state = test_state();
    let app = build_router(state.clone());

    let (status, body) = get_text(&app, "/some/where").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "URL.Path = \"/some/where\"\n");

    let (_, body) = get_text(&app, "/").await;
    assert_eq!(body, "URL.Path = \"/\"\n");
    assert_eq!(state.registry().counter("default.pageview.count"), Some(2));
}

#[tokio::test]
async fn count_includes_every_routed_request() {
    let state = test_state();
    let app = build_router(state.clone());

    get_text(&app, "/").await;
    get_text(&app, "/help").await;
    let (_, body) = get_text(&app, "/count").await;
    assert_eq!(body, "Count: 3\n");
    assert_eq!(state.hits().snapshot(), 3);
    assert_eq!(state.registry().counter("counter.pageview.count"), Some(1));
}

#[tokio::test]
async fn ops_routes_are_not_hits() {
    let state = test_state();
    let app = build_router(state.clone());

    let (status, body) = get_text(&app, "/healthz").await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

    get_text(&app, "/help").await;
    let (_, metrics) = get_text(&app, "/metrics").await;
    assert!(metrics.contains("statsweb_help_pageview_count 1"));
    assert!(metrics.contains("statsweb_total_pageview_count 1"));
    assert_eq!(state.hits().snapshot(), 1);
}

#[tokio::test]
async fn head_requests_get_their_own_counter() {
    let state = test_state();
    let app = build_router(state.clone());

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::HEAD)
                .uri("/help")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.registry().counter("head.requests.counter"), Some(1));
    assert_eq!(state.registry().counter("get.requests.counter"), None);
}

#[tokio::test]
async fn custom_methods_share_one_counter() {
    let state = test_state();
    let app = build_router(state.clone());

    for m in ["PURGE", "BREW", "X-RANDOM-1"] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::from_bytes(m.as_bytes()).unwrap())
                    .uri("/nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let reg = state.registry();
    assert_eq!(reg.counter("other.requests.counter"), Some(3));
    assert_eq!(reg.counter("get.requests.counter"), None);
    let text = reg.render().to_ascii_lowercase();
    assert!(!text.contains("purge"), "{text}");
    assert!(!text.contains("brew"), "{text}");
    assert!(!text.contains("x_random_1"), "{text}");
}

#[tokio::test]
async fn debug_dumps_request() {
    let state = test_state();
    let app = build_router(state.clone());

    let mut req = Request::get("/debug?a=1&b=x&a=2")
        .header(header::HOST, "localhost:8000")
        .header("x-trace", "t1")
        .header("x-trace", "t2")
        .body(Body::empty())
        .unwrap();
    let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(peer));

    let resp = app.oneshot(req).await.unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(body.starts_with("GET /debug?a=1&b=x&a=2 HTTP/1.1\n"), "{body}");
    assert!(body.contains("Header[\"X-Trace\"] = [\"t1\", \"t2\"]\n"), "{body}");
    assert!(body.contains("Header[\"Host\"] = [\"localhost:8000\"]\n"), "{body}");
    assert!(body.contains("Host = \"localhost:8000\"\n"));
    assert!(body.contains("RemoteAddr = \"127.0.0.1:5555\"\n"));
    let a = body.find("Form[\"a\"] = [\"1\", \"2\"]").unwrap();
    let b = body.find("Form[\"b\"] = [\"x\"]").unwrap();
    assert!(a < b);
    assert_eq!(state.registry().counter("debug.pageview.count"), Some(1));
}

#[tokio::test]
async fn debug_reads_form_body() {
    let app = build_router(test_state());

    let req = Request::post("/debug?q=1")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=rob&name=egan"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(body.starts_with("POST /debug?q=1 HTTP/1.1\n"));
    assert!(body.contains("RemoteAddr = \"\"\n"));
    assert!(body.contains("Form[\"name\"] = [\"rob\", \"egan\"]\n"), "{body}");
    assert!(body.contains("Form[\"q\"] = [\"1\"]\n"));
}

#[tokio::test]
async fn lissajous_serves_gif_and_reports() {
    let state = test_state();
    let app = build_router(state.clone());

    let resp = app
        .oneshot(Request::get("/lissajous").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/gif");

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut dec = opts.read_info(Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!((dec.width(), dec.height()), (61, 61));
    let mut frames = 0;
    while let Some(f) = dec.read_next_frame().unwrap() {
        assert_eq!(f.delay, 8);
        frames += 1;
    }
    assert_eq!(frames, 5);

    let reg = state.registry();
    assert_eq!(reg.counter("lissajous.pageview.count"), Some(1));
    assert_eq!(reg.timing("lissajous.load.time").unwrap().count, 1);
    assert_eq!(reg.counter("total.pageview.count"), Some(1));
}
