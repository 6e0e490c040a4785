//! Signed, time-limited identity tokens (HS256 JWT)

use crate::core::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn new(user_id: &str, username: &str, expires_in_seconds: u64) -> Self {
        let now = Utc::now().timestamp().max(0) as u64;
        Self {
            id: user_id.to_owned(),
            username: username.to_owned(),
            iat: now,
            exp: now.saturating_add(expires_in_seconds),
        }
    }
}

pub struct TokenService {
    ttl_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            ttl_secs,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `user_id`/`username` valid for the configured TTL.
    pub fn issue(&self, user_id: &str, username: &str) -> Result<String> {
        self.sign(&Claims::new(user_id, username, self.ttl_secs))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode and check a token. Expired tokens map to `AuthFailTokenExpired`,
    /// anything else that fails to verify to `AuthFailInvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new("test-secret", 3600);
        let token = assert_ok!(service.issue("user-1", "Sheceido"));

        let claims = assert_ok!(service.verify(&token));
        assert_eq!(claims.id, "user-1");
        assert_eq!(claims.username, "Sheceido");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new("test-secret", 3600);
        let mut claims = Claims::new("user-1", "Sheceido", 0);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = assert_ok!(service.sign(&claims));

        let err = assert_err!(service.verify(&token));
        assert!(matches!(err, Error::AuthFailTokenExpired));
    }

    #[test]
    fn test_huge_ttl_saturates_expiry() {
        let claims = Claims::new("user-1", "Sheceido", u64::MAX);
        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenService::new("secret-a", 3600);
        let verifier = TokenService::new("secret-b", 3600);
        let token = assert_ok!(issuer.issue("user-1", "Sheceido"));

        let err = assert_err!(verifier.verify(&token));
        assert!(matches!(err, Error::AuthFailInvalidToken));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = TokenService::new("test-secret", 3600);
        let err = assert_err!(service.verify("not.a.token"));
        assert!(matches!(err, Error::AuthFailInvalidToken));
    }
}
