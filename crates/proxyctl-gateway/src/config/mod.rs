//! Gateway config loader (strict parsing).
//!
//! Lookup order: `$PROXYCTL_CONFIG`, then `./proxyctl.yaml`, then built-in
//! defaults. `$PORT` overrides `gateway.port` in every case.

pub mod schema;

use std::fs;
use std::path::Path;

use proxyctl_core::error::{ProxyCtlError, Result};

pub use schema::{
    GatewayConfig, GatewaySection, HttpMethod, OpKind, OperationConfig, ResponseShape,
};

pub const CONFIG_ENV: &str = "PROXYCTL_CONFIG";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_CONFIG_PATH: &str = "proxyctl.yaml";

pub fn load() -> Result<GatewayConfig> {
    let mut cfg = match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            tracing::info!("no config file found, using built-in defaults");
            GatewayConfig::default()
        }
    };
    apply_port_override(&mut cfg, std::env::var(PORT_ENV).ok().as_deref())?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ProxyCtlError::BadConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| ProxyCtlError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply the `PORT` environment override, if set.
pub fn apply_port_override(cfg: &mut GatewayConfig, port: Option<&str>) -> Result<()> {
    if let Some(raw) = port {
        cfg.gateway.port = raw
            .trim()
            .parse()
            .map_err(|_| ProxyCtlError::BadConfig(format!("{PORT_ENV} is not a valid port: {raw}")))?;
    }
    Ok(())
}
