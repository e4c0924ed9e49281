//! Fixed HTTP endpoints served by the gateway itself.
//!
//! - `/secret`  : proxy secret lines
//! - `/healthz` : liveness
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::response::ApiResponse;
use crate::secret;

pub async fn secret(State(state): State<AppState>) -> ApiResponse {
    let resp = secret::secret_response(state.secret_path()).await;
    state
        .metrics()
        .requests
        .inc(&[("route", "/secret"), ("outcome", resp.outcome())]);
    resp
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
