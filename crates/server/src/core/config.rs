//! Blog server configuration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::blogs::PostManager;
use crate::core::auth::token::TokenService;
use crate::core::auth::{AccountManager, Credentials};

const DEFAULT_PORT: u16 = 3003;
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;
const DEFAULT_BCRYPT_COST: u32 = 10;

/// Configuration for the blog server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Data directory holding the SQLite database
    pub data_dir: PathBuf,
    /// Port to listen on
    pub port: u16,
    /// HMAC secret used to sign identity tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `SECRET` is required; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("BLOG_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("blog_data"));

        let secret = std::env::var("SECRET").context("SECRET must be set")?;

        Ok(Self {
            data_dir,
            port: env_or("PORT", DEFAULT_PORT)?,
            secret,
            token_ttl_secs: env_or("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            bcrypt_cost: env_or("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
        })
    }

    /// Create config with custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>, secret: impl Into<String>) -> Self {
        Self {
            data_dir: base_dir.into(),
            port: DEFAULT_PORT,
            secret: secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Path of the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("blog.sqlite")
    }

    /// Ensure the data directory exists
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountManager>,
    pub posts: Arc<PostManager>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<Credentials>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_dir_defaults() {
        let config = ServerConfig::with_base_dir("/tmp/blog", "shh");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/blog/blog.sqlite"));
        assert_eq!(config.port, 3003);
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let port: u16 = env_or("BLOG_SERVER_TEST_UNSET_PORT", 4000).unwrap();
        assert_eq!(port, 4000);
    }
}
