//! Envelope wire-shape tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use proxyctl_core::{ClientCode, OperationResult, ProxyCtlError};

#[test]
fn success_omits_unset_fields() {
    let r = OperationResult::ok("MTProxy started successfully").with_output("");
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(
        v,
        json!({
            "success": true,
            "message": "MTProxy started successfully",
            "output": ""
        })
    );
}

#[test]
fn failure_carries_error_code() {
    let err = ProxyCtlError::command_failed(Some(5), "unit not found\n");
    let v = serde_json::to_value(OperationResult::from(&err)).unwrap();
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["message"], json!("unit not found"));
    assert_eq!(v["error"], json!("COMMAND_FAILED"));
    assert!(v.get("output").is_none());
}

#[test]
fn secrets_and_data_serialize_as_given() {
    let r = OperationResult::ok("Secret retrieved successfully.")
        .with_secrets(vec!["abc".into(), "xyz".into()]);
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["secrets"], json!(["abc", "xyz"]));

    let r = OperationResult::ok("Statistics retrieved").with_data(json!({"uptime": 12}));
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["data"]["uptime"], json!(12));
}

#[test]
fn parses_back_from_wire() {
    let s = r#"{"success":false,"message":"Service is not running","details":"inactive","error":"NOT_RUNNING"}"#;
    let r: OperationResult = serde_json::from_str(s).unwrap();
    assert!(!r.success);
    assert_eq!(r.details.as_deref(), Some("inactive"));
    assert_eq!(r.error.as_deref(), Some(ClientCode::NotRunning.as_str()));
}
