use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = bearer_token(req.headers()).ok_or(Error::AuthFailNoToken)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!("Rejected token: {}", e);
        e
    })?;

    // Token may outlive the account it names
    let user = state
        .accounts
        .find_by_id(&claims.id)
        .await?
        .ok_or(Error::AuthFailNoToken)?;

    req.extensions_mut().insert(Ctx::new(user.id, user.username));

    Ok(next.run(req).await)
}

/// Token from an `Authorization: Bearer <token>` header; the scheme is
/// case-insensitive and an empty token counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
