//! JSON response envelope returned by every proxyctl route.
//!
//! Wire shape:
//! `{ "success": bool, "message": str, "output"?: str, "details"?: str,
//!    "data"?: any, "secrets"?: [str], "error"?: str }`
//!
//! Optional fields are omitted when unset, so each route only carries the
//! keys relevant to it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientCode, ProxyCtlError};

/// Outcome of an operation, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<String>>,
    /// Stable error code, set on failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            output: None,
            details: None,
            data: None,
            secrets: None,
            error: None,
        }
    }

    pub fn failure(code: ClientCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(code.as_str().to_string()),
            ..Self::ok(message)
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_secrets(mut self, secrets: Vec<String>) -> Self {
        self.secrets = Some(secrets);
        self
    }
}

impl From<&ProxyCtlError> for OperationResult {
    fn from(e: &ProxyCtlError) -> Self {
        OperationResult::failure(e.client_code(), e.to_string())
    }
}
