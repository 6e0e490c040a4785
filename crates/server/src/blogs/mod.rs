//! Blog post storage
//!
//! Posts live in the `posts` table. `user_id` is the owner back-reference
//! and listings are returned in insertion order, which keeps statistics
//! tie-breaks stable.

pub mod handlers;
pub mod stats;

use crate::core::error::{Error, Result};
use crate::core::models::{NewPost, Post, PostOwner, PostSummary, PostUpdate};
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

type PostRow = (
    String,
    String,
    String,
    String,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
);

const SELECT_POST: &str = r#"
    SELECT p.id, p.title, p.author, p.url, p.likes, u.id, u.username, u.name
    FROM posts p
    LEFT JOIN users u ON u.id = p.user_id
"#;

fn post_from_row((id, title, author, url, likes, user_id, username, name): PostRow) -> Post {
    let user = match (user_id, username) {
        (Some(id), Some(username)) => Some(PostOwner { id, username, name }),
        _ => None,
    };

    Post {
        id,
        title,
        author,
        url,
        likes: u64::try_from(likes).unwrap_or_default(),
        user,
    }
}

/// Present and non-empty, the way a required form field is checked.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn likes_to_db(likes: u64) -> Result<i64> {
    i64::try_from(likes).map_err(|_| Error::BadRequest("likes out of range".to_string()))
}

/// Post store
pub struct PostManager {
    pool: SqlitePool,
}

impl PostManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a new post owned by `owner_id`. Likes default to zero.
    pub async fn create(&self, req: NewPost, owner_id: Option<&str>) -> Result<Post> {
        let (Some(title), Some(author), Some(url)) =
            (required(req.title), required(req.author), required(req.url))
        else {
            return Err(Error::BadRequest(
                "All blog parameters must be filled out".to_string(),
            ));
        };

        let id = Uuid::new_v4().to_string();
        let likes = req.likes.unwrap_or(0);

        sqlx::query(
            "INSERT INTO posts (id, title, author, url, likes, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&title)
        .bind(&author)
        .bind(&url)
        .bind(likes_to_db(likes)?)
        .bind(owner_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("[Blogs] Created {} \"{}\"", id, title);

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| Error::Internal(format!("post {} vanished after insert", id)))
    }

    /// Every post with its owner populated
    pub async fn list(&self) -> Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!("{} ORDER BY p.rowid", SELECT_POST))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(post_from_row).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Post>> {
        let row: Option<PostRow> = sqlx::query_as(&format!("{} WHERE p.id = ?", SELECT_POST))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(post_from_row))
    }

    /// Apply the fields present in `update`. `None` when no such post exists.
    pub async fn update(&self, id: &str, update: PostUpdate) -> Result<Option<Post>> {
        let text_fields = [&update.title, &update.author, &update.url];
        if text_fields
            .iter()
            .any(|field| field.as_deref().is_some_and(str::is_empty))
        {
            return Err(Error::BadRequest(
                "title, author and url cannot be empty".to_string(),
            ));
        }

        let likes = update.likes.map(likes_to_db).transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE posts SET
                title = COALESCE(?, title),
                author = COALESCE(?, author),
                url = COALESCE(?, url),
                likes = COALESCE(?, likes)
            WHERE id = ?
            "#,
        )
        .bind(update.title)
        .bind(update.author)
        .bind(update.url)
        .bind(likes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!("[Blogs] Updated {}", id);
        self.find_by_id(id).await
    }

    /// Remove a post. Returns whether anything was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("[Blogs] Deleted {}", id);
        }
        Ok(deleted)
    }

    /// Posts owned by one account
    pub async fn list_by_owner(&self, user_id: &str) -> Result<Vec<PostSummary>> {
        let rows: Vec<(String, String, String, String)> = sqlx::query_as(
            "SELECT id, title, author, url FROM posts WHERE user_id = ? ORDER BY rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, author, url)| PostSummary {
                id,
                title,
                author,
                url,
            })
            .collect())
    }

    /// Owned posts of every account, keyed by owner id
    pub async fn summaries_by_owner(&self) -> Result<HashMap<String, Vec<PostSummary>>> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT user_id, id, title, author, url FROM posts WHERE user_id IS NOT NULL ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut owned: HashMap<String, Vec<PostSummary>> = HashMap::new();
        for (user_id, id, title, author, url) in rows {
            owned.entry(user_id).or_default().push(PostSummary {
                id,
                title,
                author,
                url,
            });
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{AccountManager, Credentials};
    use crate::core::models::NewUser;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        posts: PostManager,
        owner_id: String,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let pool = crate::core::db::connect(&dir.path().join("blog.sqlite"))
            .await
            .unwrap();

        let owner = AccountManager::new(pool.clone())
            .create(
                NewUser {
                    username: Some("Sheceido".into()),
                    name: Some("Leon".into()),
                    password: Some("ayyylmao".into()),
                },
                &Credentials::new(4),
            )
            .await
            .unwrap();

        Fixture {
            _dir: dir,
            posts: PostManager::new(pool),
            owner_id: owner.id,
        }
    }

    fn new_post(title: &str, likes: Option<u64>) -> NewPost {
        NewPost {
            title: Some(title.to_string()),
            author: Some("Leon".to_string()),
            url: Some("localhost:3001".to_string()),
            likes,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_likes_and_links_owner() {
        let f = fixture().await;

        let post = f
            .posts
            .create(new_post("Testing blog", None), Some(f.owner_id.as_str()))
            .await
            .unwrap();

        assert_eq!(post.likes, 0);
        let owner = post.user.expect("owner populated");
        assert_eq!(owner.id, f.owner_id);
        assert_eq!(owner.username, "Sheceido");

        let owned = f.posts.list_by_owner(&f.owner_id).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].title, "Testing blog");
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let f = fixture().await;

        let mut missing_url = new_post("No url", Some(2));
        missing_url.url = None;
        let err = f.posts.create(missing_url, None).await.unwrap_err();
        assert_eq!(err.to_string(), "All blog parameters must be filled out");

        let err = f.posts.create(new_post("", None), None).await.unwrap_err();
        assert_eq!(err.to_string(), "All blog parameters must be filled out");

        assert!(f.posts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let f = fixture().await;
        for title in ["first", "second", "third"] {
            f.posts.create(new_post(title, Some(1)), None).await.unwrap();
        }

        let titles: Vec<String> = f
            .posts
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let f = fixture().await;
        let post = f
            .posts
            .create(new_post("Original", Some(3)), Some(f.owner_id.as_str()))
            .await
            .unwrap();

        let updated = f
            .posts
            .update(
                &post.id,
                PostUpdate {
                    likes: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.likes, 4);
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.user, post.user);

        let missing = f
            .posts
            .update(&Uuid::new_v4().to_string(), PostUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());

        let err = f
            .posts
            .update(
                &post.id,
                PostUpdate {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture().await;
        let post = f.posts.create(new_post("Doomed", None), None).await.unwrap();

        assert!(f.posts.delete(&post.id).await.unwrap());
        assert!(!f.posts.delete(&post.id).await.unwrap());
        assert!(f.posts.find_by_id(&post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summaries_by_owner_skips_unowned() {
        let f = fixture().await;
        f.posts.create(new_post("mine", None), Some(f.owner_id.as_str())).await.unwrap();
        f.posts.create(new_post("nobody's", None), None).await.unwrap();

        let owned = f.posts.summaries_by_owner().await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[&f.owner_id].len(), 1);
        assert_eq!(owned[&f.owner_id][0].title, "mine");
    }
}
