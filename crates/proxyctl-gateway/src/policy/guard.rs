//! Access guard (runs before every handler).
//!
//! Caller address resolution:
//! - `X-Forwarded-For`, when present and trusted, is used verbatim (trimmed).
//!   It is not validated; the deployment must put a reverse proxy in front
//!   that sets it.
//! - Otherwise the TCP peer address, with `::ffff:a.b.c.d` reduced to
//!   `a.b.c.d`.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use proxyctl_core::ProxyCtlError;

use crate::app_state::AppState;
use crate::response::ApiResponse;

use super::allowlist;

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolve the caller address string compared against the allowlist.
pub fn caller_address(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> Option<String> {
    if trust_forwarded_for {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(v) = forwarded {
            return Some(v.to_string());
        }
    }
    peer.map(|p| p.ip().to_canonical().to_string())
}

pub async fn access_guard(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let caller = caller_address(req.headers(), peer, app.cfg().gateway.trust_forwarded_for);

    let Some(caller) = caller else {
        app.metrics().denied.inc(&[("reason", "no_address")]);
        tracing::warn!(path = %req.uri().path(), "request without caller address denied");
        return ApiResponse::error(&ProxyCtlError::AccessDenied).into_response();
    };

    let list = allowlist::load(app.allowlist_path()).await;
    if !list.contains(&caller) {
        app.metrics().denied.inc(&[("reason", "not_listed")]);
        tracing::warn!(caller = %caller, path = %req.uri().path(), "caller not in allowlist");
        return ApiResponse::error(&ProxyCtlError::AccessDenied).into_response();
    }

    tracing::debug!(caller = %caller, method = %req.method(), path = %req.uri().path(), "access granted");
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer(s: &str) -> Option<SocketAddr> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn peer_address_used_without_header() {
        let h = HeaderMap::new();
        assert_eq!(caller_address(&h, peer("10.1.2.3:5000"), true).as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn ipv4_mapped_peer_is_unmapped() {
        let h = HeaderMap::new();
        assert_eq!(
            caller_address(&h, peer("[::ffff:192.168.0.9]:5000"), true).as_deref(),
            Some("192.168.0.9")
        );
        assert_eq!(caller_address(&h, peer("[::1]:5000"), true).as_deref(), Some("::1"));
    }

    #[test]
    fn forwarded_header_wins_when_trusted() {
        let mut h = HeaderMap::new();
        h.insert(FORWARDED_FOR, HeaderValue::from_static(" 203.0.113.7 "));
        assert_eq!(caller_address(&h, peer("127.0.0.1:1"), true).as_deref(), Some("203.0.113.7"));
        assert_eq!(caller_address(&h, peer("127.0.0.1:1"), false).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn forwarded_chain_is_not_split() {
        let mut h = HeaderMap::new();
        h.insert(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(
            caller_address(&h, None, true).as_deref(),
            Some("203.0.113.7, 10.0.0.1")
        );
    }

    #[test]
    fn nothing_to_go_on() {
        assert_eq!(caller_address(&HeaderMap::new(), None, true), None);
    }
}
