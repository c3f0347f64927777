use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Response envelope shared by every endpoint
///
/// Success: `{success: true, message, payload?}`.
/// Failure: `{success: false, message, error, error_code}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, payload: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload,
            error: None,
            error_code: None,
            status: StatusCode::OK,
        }
    }

    pub fn failure(
        message: impl Into<String>,
        error: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
            error: Some(error.into()),
            error_code: Some(error_code.into()),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
