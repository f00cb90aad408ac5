//! HTTP mapping for `StatsWebError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use statsweb_core::error::{ClientCode, StatsWebError};

/// Handler error: logs nothing itself, renders `error: <CODE>` as plain text.
#[derive(Debug)]
pub struct ApiError(pub StatsWebError);

impl From<StatsWebError> for ApiError {
    fn from(e: StatsWebError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::BadConfig | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Encode | ClientCode::Io | ClientCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, format!("error: {}\n", code.as_str())).into_response()
    }
}
