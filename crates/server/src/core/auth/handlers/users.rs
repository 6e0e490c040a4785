use crate::core::config::AppState;
use crate::core::error::{Error, Result};
use crate::core::models::{parse_id, NewUser, UserInfo};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserInfo>>> {
    info!("GET /api/users");

    let users = state.accounts.list().await?;
    let mut owned = state.posts.summaries_by_owner().await?;

    let infos: Vec<UserInfo> = users
        .into_iter()
        .map(|user| {
            let blogs = owned.remove(&user.id).unwrap_or_default();
            UserInfo::new(user, blogs)
        })
        .collect();

    Ok(Json(infos))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserInfo>> {
    info!("GET /api/users/{}", id);
    let id = parse_id(&id)?;

    let user = state
        .accounts
        .find_by_id(&id)
        .await?
        .ok_or(Error::NotFound("user"))?;
    let blogs = state.posts.list_by_owner(&user.id).await?;

    Ok(Json(UserInfo::new(user, blogs)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    let Json(req) = payload?;
    info!("POST /api/users - {:?}", req.username);

    let user = state.accounts.create(req, &state.credentials).await?;

    Ok((StatusCode::CREATED, Json(UserInfo::new(user, Vec::new()))))
}
