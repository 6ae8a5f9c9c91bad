// HTTP error mapping
use crate::domain::level2::SearchError;
use crate::domain::plot_data::PlotDataError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    /// Upstream data that cannot be shaped into plots.
    #[error("{0}")]
    Unprocessable(String),
    #[error("Odin API request failed: {0:#}")]
    Upstream(anyhow::Error),
    #[error("internal error")]
    Internal(StatusCode),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(status) => *status,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<SearchError>() {
            return ApiError::BadRequest(e.to_string());
        }
        if let Some(e) = err.downcast_ref::<PlotDataError>() {
            return ApiError::Unprocessable(e.to_string());
        }
        ApiError::Upstream(err)
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        ApiError::Internal(status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
