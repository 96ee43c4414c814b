// src/auth/mod.rs
// Bearer-token authentication providers

mod local;
mod remote;

pub use local::SqliteAuth;
pub use remote::RemoteAuth;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::User;

/// Resolves bearer credentials to users
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `None` when the token is unknown, expired or revoked
    async fn resolve(&self, token: &str) -> Result<Option<User>>;

    /// Invalidate the token. Revoking an unknown token is not an error.
    async fn revoke(&self, token: &str) -> Result<()>;
}

/// Extract the token from an `Authorization` header value.
/// A value without the `Bearer ` prefix is taken as the raw token.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value
        .strip_prefix("Bearer ")
        .or_else(|| header_value.strip_prefix("bearer "))
        .unwrap_or(header_value)
        .trim();
    (!token.is_empty()).then_some(token)
}
