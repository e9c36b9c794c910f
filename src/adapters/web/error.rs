//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::TradelogError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<TradelogError> for ApiError {
    fn from(err: TradelogError) -> Self {
        let status = match &err {
            TradelogError::InvalidOrder { .. }
            | TradelogError::InvalidQuery { .. }
            | TradelogError::Import { .. }
            | TradelogError::ConfigMissing { .. }
            | TradelogError::ConfigInvalid { .. }
            | TradelogError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
            TradelogError::OrderNotFound { .. } | TradelogError::MetaNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            TradelogError::Database { .. }
            | TradelogError::DatabaseQuery { .. }
            | TradelogError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
