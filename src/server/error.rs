use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::service::finance::FinanceServiceError;

/// `{"error": "..."}` body shared by both error conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Errors that change the HTTP status of a response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Ticker symbol is required.")]
    MissingTicker,
    #[error("Invalid limit '{0}': expected an integer")]
    InvalidLimit(String),
    #[error(transparent)]
    Provider(#[from] FinanceServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingTicker | ApiError::InvalidLimit(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Provider request failed: {self}");
        } else {
            warn!("Rejected request: {self}");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
