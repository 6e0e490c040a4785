//! Core Router
//!
//! Every `/api` route. Mutating blog routes sit behind `mw_require_auth`.

use crate::blogs::{handlers as blog_handlers, stats};
use crate::core::auth::handlers as auth_handlers;
use crate::core::auth::middleware::mw_require_auth;
use crate::core::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/blogs", post(blog_handlers::create_blog))
        .route(
            "/api/blogs/{id}",
            put(blog_handlers::update_blog).delete(blog_handlers::delete_blog),
        )
        .route_layer(from_fn_with_state(state, mw_require_auth));

    Router::new()
        // Blog routes
        .route("/api/blogs", get(blog_handlers::list_blogs))
        .route("/api/blogs/{id}", get(blog_handlers::get_blog))
        .route("/api/stats", get(stats::get_stats))
        // Account routes
        .route(
            "/api/users",
            get(auth_handlers::list_users).post(auth_handlers::create_user),
        )
        .route("/api/users/{id}", get(auth_handlers::get_user))
        .route("/api/login", post(auth_handlers::login))
        .merge(protected)
}
