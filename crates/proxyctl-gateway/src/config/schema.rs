use std::collections::HashSet;

use serde::Deserialize;
use proxyctl_core::error::{ProxyCtlError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default = "default_operations")]
    pub operations: Vec<OperationConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            operations: default_operations(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ProxyCtlError::UnsupportedVersion);
        }

        self.gateway.validate()?;

        let mut seen = HashSet::new();
        for op in &self.operations {
            op.validate()?;
            if !seen.insert((op.method, op.route.as_str())) {
                return Err(ProxyCtlError::BadConfig(format!(
                    "duplicate operation route: {} {}",
                    op.method.as_str(),
                    op.route
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: String,

    #[serde(default = "default_secret_path")]
    pub secret_path: String,

    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Take the caller address from `X-Forwarded-For` when present.
    /// Assumes a reverse proxy in front that always sets it.
    #[serde(default = "default_trust_forwarded_for")]
    pub trust_forwarded_for: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowlist_path: default_allowlist_path(),
            secret_path: default_secret_path(),
            command_timeout_ms: default_command_timeout_ms(),
            trust_forwarded_for: default_trust_forwarded_for(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=600_000).contains(&self.command_timeout_ms) {
            return Err(ProxyCtlError::BadConfig(
                "gateway.command_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        if self.allowlist_path.trim().is_empty() {
            return Err(ProxyCtlError::BadConfig(
                "gateway.allowlist_path must not be empty".into(),
            ));
        }
        if !self.secret_path.starts_with('/') {
            return Err(ProxyCtlError::BadConfig(
                "gateway.secret_path must be an absolute path".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_allowlist_path() -> String {
    "./whitelist.txt".into()
}
fn default_secret_path() -> String {
    "/opt/MTProxy/proxy-secret.txt".into()
}
fn default_command_timeout_ms() -> u64 {
    30_000
}
fn default_trust_forwarded_for() -> bool {
    true
}

/// Logical operation an entry performs on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Start,
    Stop,
    Status,
    Stats,
    Reboot,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Start => "start",
            OpKind::Stop => "stop",
            OpKind::Status => "status",
            OpKind::Stats => "stats",
            OpKind::Reboot => "reboot",
        }
    }

    /// Operations with an irreversible host-level side effect.
    pub fn is_mutating(self) -> bool {
        matches!(self, OpKind::Start | OpKind::Stop | OpKind::Reboot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// How a command outcome maps to the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{success, message, output}` with the trimmed stdout.
    Output,
    /// Binary running/not-running check on stdout == "active".
    ActiveCheck,
    /// Stdout parsed as JSON into `data`.
    JsonData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationConfig {
    pub route: String,
    pub method: HttpMethod,
    pub op: OpKind,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub shape: ResponseShape,
    #[serde(default)]
    pub success_message: Option<String>,
}

impl OperationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.route.starts_with('/') || self.route.len() < 2 {
            return Err(ProxyCtlError::BadConfig(format!(
                "operation route must start with '/': {}",
                self.route
            )));
        }
        // Routes are literal paths; axum treats these prefixes as captures.
        if self.route.split('/').any(|seg| seg.starts_with(':') || seg.starts_with('*')) {
            return Err(ProxyCtlError::BadConfig(format!(
                "operation route must be a literal path, no ':' or '*' segments: {}",
                self.route
            )));
        }
        if RESERVED_ROUTES.contains(&self.route.as_str()) {
            return Err(ProxyCtlError::BadConfig(format!(
                "operation route is reserved: {}",
                self.route
            )));
        }
        if self.program.trim().is_empty() {
            return Err(ProxyCtlError::BadConfig(format!(
                "operation {} has an empty program",
                self.route
            )));
        }
        if self.shape != ResponseShape::ActiveCheck && self.success_message.is_none() {
            return Err(ProxyCtlError::BadConfig(format!(
                "operation {} requires success_message",
                self.route
            )));
        }
        Ok(())
    }
}

/// Routes served by the gateway itself.
pub const RESERVED_ROUTES: [&str; 3] = ["/secret", "/healthz", "/metrics"];

const SERVICE_NAME: &str = "MTProxy";

fn systemctl(verb: &str) -> Vec<String> {
    vec![verb.to_string(), SERVICE_NAME.to_string()]
}

/// Built-in operation table for the MTProxy unit.
pub fn default_operations() -> Vec<OperationConfig> {
    vec![
        OperationConfig {
            route: "/start".into(),
            method: HttpMethod::Post,
            op: OpKind::Start,
            program: "systemctl".into(),
            args: systemctl("start"),
            shape: ResponseShape::Output,
            success_message: Some(format!("{SERVICE_NAME} started successfully")),
        },
        OperationConfig {
            route: "/stop".into(),
            method: HttpMethod::Post,
            op: OpKind::Stop,
            program: "systemctl".into(),
            args: systemctl("stop"),
            shape: ResponseShape::Output,
            success_message: Some(format!("{SERVICE_NAME} stopped successfully")),
        },
        OperationConfig {
            route: "/reboot".into(),
            method: HttpMethod::Post,
            op: OpKind::Reboot,
            program: "reboot".into(),
            args: Vec::new(),
            shape: ResponseShape::Output,
            success_message: Some("Server Reboot Success".into()),
        },
        OperationConfig {
            route: "/status".into(),
            method: HttpMethod::Get,
            op: OpKind::Status,
            program: "systemctl".into(),
            args: systemctl("is-active"),
            shape: ResponseShape::ActiveCheck,
            success_message: None,
        },
        OperationConfig {
            route: "/stats".into(),
            method: HttpMethod::Get,
            op: OpKind::Stats,
            program: "curl".into(),
            args: vec!["-s".into(), "http://localhost:8888/stats".into()],
            shape: ResponseShape::JsonData,
            success_message: Some("Statistics retrieved".into()),
        },
    ]
}
