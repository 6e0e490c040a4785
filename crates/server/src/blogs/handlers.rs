//! Blog post handlers
//!
//! Reads are public. Create, update and delete run behind
//! `mw_require_auth`, and update/delete additionally require that the
//! caller owns the post.

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::models::{parse_id, NewPost, Post, PostUpdate};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

/// Load a post and check that `ctx` owns it.
async fn owned_post(state: &AppState, ctx: &Ctx, id: &str, denied: &'static str) -> Result<Post> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(Error::NotFound("blog"))?;

    let owns = post
        .user
        .as_ref()
        .is_some_and(|owner| owner.id == ctx.user_id());
    if !owns {
        warn!("{} attempted to modify {} without owning it", ctx.username(), id);
        return Err(Error::Forbidden(denied));
    }

    Ok(post)
}

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Post>>> {
    info!("GET /api/blogs");
    Ok(Json(state.posts.list().await?))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    info!("GET /api/blogs/{}", id);
    let id = parse_id(&id)?;

    state
        .posts
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("blog"))
}

/// POST /api/blogs
pub async fn create_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>)> {
    let Json(req) = payload?;
    info!("POST /api/blogs - by {}", ctx.username());

    let post = state.posts.create(req, Some(ctx.user_id())).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    payload: std::result::Result<Json<PostUpdate>, JsonRejection>,
) -> Result<Json<Post>> {
    info!("PUT /api/blogs/{} - by {}", id, ctx.username());
    let id = parse_id(&id)?;
    owned_post(&state, &ctx, &id, "unauthorized access to modify blog").await?;

    let Json(update) = payload?;
    state
        .posts
        .update(&id, update)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("blog"))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    info!("DELETE /api/blogs/{} - by {}", id, ctx.username());
    let id = parse_id(&id)?;
    owned_post(&state, &ctx, &id, "unauthorized access to delete blog").await?;

    if !state.posts.delete(&id).await? {
        return Err(Error::NotFound("blog"));
    }

    Ok(StatusCode::NO_CONTENT)
}
