use crate::core::config::AppState;
use crate::core::error::{Error, Result};
use crate::core::models::{LoginRequest, LoginResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    info!("POST /api/login - {}", username);

    let user = state.accounts.find_by_username(&username).await?;
    let verified = match &user {
        Some(user) => {
            state
                .credentials
                .verify(&password, &user.password_hash)
                .await?
        }
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        warn!("Failed login attempt for {}", username);
        return Err(Error::LoginFail);
    };

    let token = state.tokens.issue(&user.id, &user.username)?;
    info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
