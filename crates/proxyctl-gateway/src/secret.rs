//! Secret reader for the managed proxy's credential file.

use std::path::Path;

use axum::http::StatusCode;

use proxyctl_core::error::{ClientCode, ProxyCtlError, Result};
use proxyctl_core::OperationResult;

use crate::response::ApiResponse;

const READ_FAILED: &str = "failed to read secret file";
const RETRIEVED: &str = "Secret retrieved successfully.";

/// Split secret file content into lines.
///
/// The whole content is trimmed first, then each line loses trailing
/// whitespace. Interior blank lines are kept in place.
pub fn split_secrets(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(|l| l.trim_end().to_string()).collect()
}

pub async fn read_secrets(path: &Path) -> Result<Vec<String>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ProxyCtlError::ResourceUnavailable {
            resource: "secret file",
            reason: e.to_string(),
        })?;
    Ok(split_secrets(&raw))
}

/// `GET /secret` body. The underlying read error is logged, never returned.
pub async fn secret_response(path: &Path) -> ApiResponse {
    match read_secrets(path).await {
        Ok(secrets) => ApiResponse::ok(OperationResult::ok(RETRIEVED).with_secrets(secrets)),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "secret read failed");
            ApiResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: OperationResult::failure(ClientCode::SecretUnavailable, READ_FAILED),
            }
        }
    }
}
