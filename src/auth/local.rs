// src/auth/local.rs
// Self-hosted auth: users and hashed bearer tokens in the SQLite store

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::AuthProvider;
use crate::error::{Result, ShadowError};
use crate::models::User;
use crate::store::db::now_timestamp;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hash_token(token: &str) -> String {
    to_hex(&Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    to_hex(&bytes)
}

#[derive(Clone)]
pub struct SqliteAuth {
    pool: SqlitePool,
}

impl SqliteAuth {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, email: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ShadowError::InvalidRequest(format!(
                "'{email}' is not an email address"
            )));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO users (id, email, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(email)
            .bind(now_timestamp())
            .execute(&self.pool)
            .await?;

        info!(user_id = %id, "user created");
        Ok(User {
            id,
            email: Some(email.to_string()),
        })
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT id, email FROM users WHERE email = ?")
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, email)| User {
            id,
            email: Some(email),
        }))
    }

    /// Mint a new token for the user. Only the digest is persisted.
    pub async fn issue_token(&self, user_id: &str) -> Result<String> {
        let token = generate_token();
        sqlx::query("INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)")
            .bind(hash_token(&token))
            .bind(user_id)
            .bind(now_timestamp())
            .execute(&self.pool)
            .await?;
        Ok(token)
    }
}

#[async_trait]
impl AuthProvider for SqliteAuth {
    async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT u.id, u.email FROM auth_tokens t
             INNER JOIN users u ON u.id = t.user_id
             WHERE t.token_hash = ?",
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, email)| User {
            id,
            email: Some(email),
        }))
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::db::{create_memory_pool, run_migrations};

    async fn auth() -> SqliteAuth {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteAuth::new(pool)
    }

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
        assert_eq!(hash_token("abc").len(), 64);
        assert_ne!(hash_token("abc"), "abc");
    }

    #[tokio::test]
    async fn test_issue_resolve_revoke() {
        let auth = auth().await;
        let user = auth.create_user("me@example.com").await.unwrap();
        let token = auth.issue_token(&user.id).await.unwrap();

        let resolved = auth.resolve(&token).await.unwrap().unwrap();
        assert_eq!(resolved, user);

        assert!(auth.resolve("not-a-token").await.unwrap().is_none());

        auth.revoke(&token).await.unwrap();
        assert!(auth.resolve(&token).await.unwrap().is_none());
        // second revoke is a no-op
        auth.revoke(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let auth = auth().await;
        assert!(auth.create_user("not an email").await.is_err());
        auth.create_user("a@b.c").await.unwrap();
        // email is unique
        assert!(auth.create_user("a@b.c").await.is_err());
        assert!(auth.find_user_by_email("a@b.c").await.unwrap().is_some());
        assert!(auth.find_user_by_email("x@y.z").await.unwrap().is_none());
    }
}
