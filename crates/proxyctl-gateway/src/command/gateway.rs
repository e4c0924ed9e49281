use std::sync::Arc;
use std::time::Instant;

use proxyctl_core::error::{ClientCode, ProxyCtlError, Result};
use proxyctl_core::OperationResult;

use crate::config::{OpKind, OperationConfig, ResponseShape};
use crate::obs::GatewayMetrics;
use crate::response::ApiResponse;

use super::executor::{CommandExecutor, CommandOutput, Invocation};

const RUNNING: &str = "Service is running";
const NOT_RUNNING: &str = "Service is not running";

/// Maps logical operations to host commands and their outcomes to envelopes.
///
/// Never retries. The first failure is reported as-is.
pub struct CommandGateway {
    ops: Vec<OperationConfig>,
    executor: Arc<dyn CommandExecutor>,
    metrics: Arc<GatewayMetrics>,
}

impl CommandGateway {
    pub fn new(
        ops: Vec<OperationConfig>,
        executor: Arc<dyn CommandExecutor>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self { ops, executor, metrics }
    }

    pub fn operations(&self) -> &[OperationConfig] {
        &self.ops
    }

    /// First table entry bound to `kind`.
    pub fn find(&self, kind: OpKind) -> Option<&OperationConfig> {
        self.ops.iter().find(|o| o.op == kind)
    }

    pub async fn start(&self) -> ApiResponse {
        self.run_kind(OpKind::Start).await
    }

    pub async fn stop(&self) -> ApiResponse {
        self.run_kind(OpKind::Stop).await
    }

    pub async fn status(&self) -> ApiResponse {
        self.run_kind(OpKind::Status).await
    }

    pub async fn stats(&self) -> ApiResponse {
        self.run_kind(OpKind::Stats).await
    }

    pub async fn reboot(&self) -> ApiResponse {
        self.run_kind(OpKind::Reboot).await
    }

    async fn run_kind(&self, kind: OpKind) -> ApiResponse {
        match self.find(kind) {
            Some(entry) => self.invoke(entry).await,
            None => ApiResponse::error(&ProxyCtlError::Internal(format!(
                "operation not configured: {}",
                kind.as_str()
            ))),
        }
    }

    /// Entry at `idx` in the table; used by the router, which binds by index.
    pub async fn invoke_at(&self, idx: usize) -> ApiResponse {
        match self.ops.get(idx) {
            Some(entry) => self.invoke(entry).await,
            None => ApiResponse::error(&ProxyCtlError::Internal(format!(
                "no operation at index {idx}"
            ))),
        }
    }

    /// Run `entry` on its own task.
    ///
    /// The handler only awaits the task, so a client disconnect drops the
    /// wait but never the running command, its logging, or its metrics.
    pub async fn invoke(&self, entry: &OperationConfig) -> ApiResponse {
        let task = tokio::spawn(run_operation(
            entry.clone(),
            Arc::clone(&self.executor),
            Arc::clone(&self.metrics),
        ));
        match task.await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(op = entry.op.as_str(), route = %entry.route, error = %e, "operation task failed");
                ApiResponse::error(&ProxyCtlError::Internal(format!("operation task failed: {e}")))
            }
        }
    }
}

async fn run_operation(
    entry: OperationConfig,
    executor: Arc<dyn CommandExecutor>,
    metrics: Arc<GatewayMetrics>,
) -> ApiResponse {
    let inv = Invocation::new(entry.program.clone(), entry.args.clone());
    let op = entry.op.as_str();

    metrics.commands_in_flight.inc(&[("op", op)]);
    let started = Instant::now();
    let result = executor.execute(&inv).await;
    let elapsed = started.elapsed();
    metrics.commands_in_flight.dec(&[("op", op)]);

    let resp = shape_response(&entry, result.as_ref());
    let outcome = resp.outcome();
    let elapsed_ms = elapsed.as_millis() as u64;
    let exit_code = result.as_ref().ok().and_then(|o| o.status);

    metrics.command_duration.observe(&[("op", op), ("outcome", outcome)], elapsed);
    metrics.requests.inc(&[("route", entry.route.as_str()), ("outcome", outcome)]);

    if resp.body.success {
        if entry.op.is_mutating() {
            tracing::info!(op, route = %entry.route, command = %inv.display(), ?exit_code, elapsed_ms, "host operation succeeded");
        } else {
            tracing::debug!(op, route = %entry.route, ?exit_code, elapsed_ms, "query succeeded");
        }
    } else {
        tracing::warn!(
            op,
            route = %entry.route,
            command = %inv.display(),
            ?exit_code,
            elapsed_ms,
            status = resp.status.as_u16(),
            error = %resp.body.message,
            "host operation failed"
        );
    }

    resp
}

/// Map one command outcome to a response according to the entry's shape.
pub fn shape_response(
    entry: &OperationConfig,
    result: std::result::Result<&CommandOutput, &ProxyCtlError>,
) -> ApiResponse {
    let success_message = entry.success_message.as_deref().unwrap_or_default();
    match entry.shape {
        ResponseShape::Output => match result {
            Ok(out) if out.success() => ApiResponse::ok(
                OperationResult::ok(success_message).with_output(out.stdout.trim()),
            ),
            Ok(out) => ApiResponse::error(&ProxyCtlError::command_failed(out.status, &out.stderr)),
            Err(e) => ApiResponse::error(e),
        },
        ResponseShape::ActiveCheck => active_check(result),
        ResponseShape::JsonData => match result {
            Ok(out) if out.success() => match parse_json(&out.stdout) {
                Ok(data) => ApiResponse::ok(OperationResult::ok(success_message).with_data(data)),
                Err(e) => ApiResponse::error(&e),
            },
            Ok(out) => ApiResponse::error(&ProxyCtlError::command_failed(out.status, &out.stderr)),
            Err(e) => ApiResponse::error(e),
        },
    }
}

fn active_check(result: std::result::Result<&CommandOutput, &ProxyCtlError>) -> ApiResponse {
    let mut resp = match result {
        Ok(out) => {
            let state = out.stdout.trim();
            if out.success() && state == "active" {
                return ApiResponse::ok(OperationResult::ok(RUNNING).with_details(state));
            }
            // A non-zero exit that still printed a state is an answer, not an
            // invocation error (`systemctl is-active` exits 3 for "inactive"),
            // so it gets 200 rather than 500. See "Active check vs. exit codes"
            // in DESIGN.md.
            if out.success() || !state.is_empty() {
                return ApiResponse::ok(
                    OperationResult::failure(ClientCode::NotRunning, NOT_RUNNING).with_details(state),
                );
            }
            ApiResponse::error(&ProxyCtlError::command_failed(out.status, &out.stderr))
        }
        Err(e) => ApiResponse::error(e),
    };
    let details = std::mem::replace(&mut resp.body.message, NOT_RUNNING.to_string());
    resp.body.details = Some(details);
    resp
}

fn parse_json(stdout: &str) -> Result<serde_json::Value> {
    serde_json::from_str(stdout.trim()).map_err(|e| ProxyCtlError::InvalidOutput(e.to_string()))
}
