//! Shared application state for the proxyctl gateway.
//!
//! Holds only immutable config and the command gateway. The allowlist and
//! secret file are deliberately not cached here; handlers re-read them.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use proxyctl_core::error::Result;

use crate::command::{CommandExecutor, CommandGateway, SystemExecutor};
use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    gateway: Arc<CommandGateway>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build state that spawns real host processes.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let timeout = Duration::from_millis(cfg.gateway.command_timeout_ms);
        Self::with_executor(cfg, Arc::new(SystemExecutor::new(timeout)))
    }

    /// Build state around a caller-supplied executor.
    pub fn with_executor(cfg: GatewayConfig, executor: Arc<dyn CommandExecutor>) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(GatewayMetrics::default());
        let gateway = CommandGateway::new(cfg.operations.clone(), executor, Arc::clone(&metrics));

        for op in gateway.operations() {
            tracing::info!(
                route = %op.route,
                method = op.method.as_str(),
                op = op.op.as_str(),
                program = %op.program,
                "operation registered"
            );
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            gateway: Arc::new(gateway),
            metrics,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn allowlist_path(&self) -> &Path {
        Path::new(&self.inner.cfg.gateway.allowlist_path)
    }

    pub fn secret_path(&self) -> &Path {
        Path::new(&self.inner.cfg.gateway.secret_path)
    }

    pub fn gateway(&self) -> Arc<CommandGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }
}
