use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{Extension, Host, Request},
    middleware::Next,
    response::Response,
};

use super::{AuthState, RequestStateInner, State};
use crate::error::{ServerError, ServerResult};

/// Initializes per-request state.
pub async fn init_request_state(mut req: Request, next: Next) -> Response {
    let req_state = Arc::new(RequestStateInner {
        auth: AuthState::new(),
    });

    req.extensions_mut().insert(req_state);
    next.run(req).await
}

/// Restricts valid Host headers.
///
/// We also require that all request have a Host header in
/// the first place.
pub async fn restrict_host(
    Extension(state): Extension<State>,
    Host(host): Host,
    req: Request,
    next: Next,
) -> ServerResult<Response> {
    let allowed_hosts = &state.config.allowed_hosts;

    if !allowed_hosts.is_empty() && !allowed_hosts.iter().any(|h| h.as_str() == host) {
        return Err(ServerError::RequestError(anyhow!("Bad Host")));
    }

    Ok(next.run(req).await)
}
