//! Hit layer: runs before every page handler.
//!
//! Bumps the shared hit counter and emits the total-hits counter plus a
//! per-method counter (`get.requests.counter`, `head.requests.counter`, ...).

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub async fn track(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let hits = app.hits().increment();

    let names = app.names();
    let metrics = app.metrics();
    metrics.increment_counter(&names.total, 1);
    metrics.increment_counter(&names.method_counter(req.method().as_str()), 1);

    tracing::debug!(method = %req.method(), path = %req.uri().path(), hits, "request");
    next.run(req).await
}
