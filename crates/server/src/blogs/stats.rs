//! Statistics over every stored post

use crate::core::config::AppState;
use crate::core::error::Result;
use crate::core::models::Post;
use axum::{extract::State, Json};
use blog_stats::{AuthorBlogs, AuthorLikes};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_likes: u64,
    pub favourite_blog: Option<Post>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

impl StatsResponse {
    pub fn from_posts(posts: &[Post]) -> Self {
        let summary = blog_stats::summarize(posts);
        Self {
            total_likes: summary.total_likes,
            favourite_blog: summary.favourite_blog.cloned(),
            most_blogs: summary.most_blogs,
            most_likes: summary.most_likes,
        }
    }
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let posts = state.posts.list().await?;
    info!("GET /api/stats - {} posts", posts.len());

    Ok(Json(StatsResponse::from_posts(&posts)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, author: &str, likes: u64) -> Post {
        Post {
            id: title.to_lowercase(),
            title: title.to_string(),
            author: author.to_string(),
            url: format!("https://example.com/{}", title),
            likes,
            user: None,
        }
    }

    #[test]
    fn test_stats_over_stored_posts() {
        let posts = vec![
            post("React patterns", "Michael Chan", 7),
            post("Type wars", "Robert C. Martin", 10),
            post("Clean code", "Michael Chan", 0),
        ];

        let stats = StatsResponse::from_posts(&posts);
        assert_eq!(stats.total_likes, 17);
        assert_eq!(stats.favourite_blog, Some(posts[1].clone()));
        assert_eq!(stats.most_blogs.unwrap().author, "Michael Chan");
        assert_eq!(stats.most_likes.unwrap().author, "Robert C. Martin");
    }

    #[test]
    fn test_stats_over_nothing() {
        let stats = StatsResponse::from_posts(&[]);
        assert_eq!(stats.total_likes, 0);
        assert!(stats.favourite_blog.is_none());
        assert!(stats.most_blogs.is_none());
        assert!(stats.most_likes.is_none());
    }
}
