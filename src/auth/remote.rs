// src/auth/remote.rs
// GoTrue-compatible remote auth provider (GET /auth/v1/user, POST /auth/v1/logout)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::AuthProvider;
use crate::error::{Result, ShadowError};
use crate::models::User;

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

pub struct RemoteAuth {
    client: Client,
    user_url: Url,
    logout_url: Url,
    api_key: String,
}

/// Resolve the user and logout endpoints below `base_url`, keeping any path
/// prefix it carries (`https://host/supabase` -> `https://host/supabase/auth/v1/user`).
fn endpoint_urls(base_url: &str) -> Result<(Url, Url)> {
    let invalid = |e: url::ParseError| ShadowError::Config(format!("invalid AUTH_URL '{base_url}': {e}"));

    let mut base = Url::parse(base_url).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok((
        base.join("auth/v1/user").map_err(invalid)?,
        base.join("auth/v1/logout").map_err(invalid)?,
    ))
}

impl RemoteAuth {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let (user_url, logout_url) = endpoint_urls(base_url)?;

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            user_url,
            logout_url,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl AuthProvider for RemoteAuth {
    async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let response = self
            .client
            .get(self.user_url.clone())
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: RemoteUser = response.json().await?;
                debug!(user_id = %user.id, "remote auth resolved user");
                Ok(Some(User {
                    id: user.id,
                    email: user.email,
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            status => {
                warn!(status = status.as_u16(), "remote auth lookup failed");
                Err(ShadowError::UpstreamError(status.as_u16()))
            }
        }
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.logout_url.clone())
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(ShadowError::UpstreamError(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn mock_auth() -> String {
        let app = Router::new()
            .route(
                "/auth/v1/user",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    let has_key = headers.get("apikey").is_some();
                    match (auth, has_key) {
                        ("Bearer good", true) => (
                            AxumStatus::OK,
                            Json(json!({"id": "user-1", "email": "me@example.com", "aud": "authenticated"})),
                        ),
                        ("Bearer broken", _) => (
                            AxumStatus::INTERNAL_SERVER_ERROR,
                            Json(json!({"msg": "boom"})),
                        ),
                        _ => (AxumStatus::UNAUTHORIZED, Json(json!({"msg": "invalid JWT"}))),
                    }
                }),
            )
            .route("/auth/v1/logout", post(|| async { AxumStatus::NO_CONTENT }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_resolve_statuses() {
        let base = mock_auth().await;
        let auth = RemoteAuth::new(&base, "anon-key", Duration::from_secs(5)).unwrap();

        let user = auth.resolve("good").await.unwrap().unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("me@example.com"));

        assert!(auth.resolve("bad").await.unwrap().is_none());

        let err = auth.resolve("broken").await.unwrap_err();
        assert!(matches!(err, ShadowError::UpstreamError(500)));

        auth.revoke("good").await.unwrap();
    }

    #[test]
    fn test_endpoints_keep_path_prefix() {
        let (user, logout) = endpoint_urls("https://host.example/supabase").unwrap();
        assert_eq!(user.as_str(), "https://host.example/supabase/auth/v1/user");
        assert_eq!(logout.as_str(), "https://host.example/supabase/auth/v1/logout");

        let (user, _) = endpoint_urls("https://host.example/supabase/").unwrap();
        assert_eq!(user.as_str(), "https://host.example/supabase/auth/v1/user");

        let (user, _) = endpoint_urls("https://host.example").unwrap();
        assert_eq!(user.as_str(), "https://host.example/auth/v1/user");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RemoteAuth::new("not a url", "k", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ShadowError::Config(_)));
    }
}
