//! `/lissajous`: render a fresh animation and return it as `image/gif`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use statsweb_core::error::StatsWebError;

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn lissajous(State(app): State<AppState>) -> Result<Response, ApiError> {
    let generator = app.lissajous().clone();

    // CPU-bound; keep it off the async workers.
    let res = tokio::task::spawn_blocking(move || {
        let mut buf = Vec::new();
        generator.generate(&mut rand::rng(), &mut buf).map(|report| (report, buf))
    })
    .await
    .map_err(|e| StatsWebError::Internal(format!("generator task failed: {e}")))?;

    match res {
        Ok((report, buf)) => {
            tracing::info!(
                freq = report.frequency,
                frames = report.frames,
                bytes = report.bytes_written,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "lissajous served"
            );
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "image/gif")],
                Bytes::from(buf),
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "lissajous generation failed");
            Err(e.into())
        }
    }
}
