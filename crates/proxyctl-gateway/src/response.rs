//! HTTP mapping for envelopes and errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use proxyctl_core::{OperationResult, ProxyCtlError};

/// Envelope plus the HTTP status it is sent with.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: OperationResult,
}

impl ApiResponse {
    pub fn ok(body: OperationResult) -> Self {
        Self { status: StatusCode::OK, body }
    }

    pub fn error(e: &ProxyCtlError) -> Self {
        Self {
            status: status_for(e),
            body: OperationResult::from(e),
        }
    }

    pub fn outcome(&self) -> &'static str {
        if self.body.success {
            "ok"
        } else if self.status.is_success() {
            "negative"
        } else {
            "error"
        }
    }
}

pub fn status_for(e: &ProxyCtlError) -> StatusCode {
    match e {
        ProxyCtlError::AccessDenied => StatusCode::FORBIDDEN,
        ProxyCtlError::BadConfig(_) | ProxyCtlError::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ProxyCtlError::ResourceUnavailable { .. }
        | ProxyCtlError::CommandFailed { .. }
        | ProxyCtlError::CommandUnavailable(_)
        | ProxyCtlError::Timeout(_)
        | ProxyCtlError::InvalidOutput(_)
        | ProxyCtlError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
