//! Axum router wiring.
//!
//! Page routes (and the fallback) sit behind the hit layer; ops routes are
//! added after the layer so they are not counted.

use axum::{
    middleware,
    routing::{any, get},
    Router,
};

use crate::{
    app_state::AppState,
    http::{hits, lissajous, pages},
    ops,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::echo_path))
        .route("/help", get(pages::help))
        .route("/debug", any(pages::debug))
        .route("/count", get(pages::count))
        .route("/lissajous", get(lissajous::lissajous))
        .fallback(pages::echo_path)
        .layer(middleware::from_fn_with_state(state.clone(), hits::track))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
