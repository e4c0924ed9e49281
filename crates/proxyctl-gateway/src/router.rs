//! Axum router wiring.
//!
//! Operation routes come from the config table; `/secret`, `/healthz` and
//! `/metrics` are fixed. The access guard wraps everything, fallback included.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    middleware,
    routing::{get, MethodFilter, MethodRouter},
    Router,
};

use crate::config::HttpMethod;
use crate::{app_state::AppState, ops, policy};

fn method_filter(m: HttpMethod) -> MethodFilter {
    match m {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut by_route: BTreeMap<String, MethodRouter<AppState>> = BTreeMap::new();

    let gateway = state.gateway();
    for (idx, op) in gateway.operations().iter().enumerate() {
        let handler = move |State(app): State<AppState>| async move {
            app.gateway().invoke_at(idx).await
        };
        let entry = by_route.remove(&op.route).unwrap_or_else(MethodRouter::new);
        by_route.insert(op.route.clone(), entry.on(method_filter(op.method), handler));
    }

    let mut router = Router::new()
        .route("/secret", get(ops::secret))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics));

    for (path, methods) in by_route {
        router = router.route(&path, methods);
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), policy::access_guard))
        .with_state(state)
}
