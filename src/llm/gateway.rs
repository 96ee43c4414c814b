// src/llm/gateway.rs
// HTTP client for the OpenAI-compatible chat-completion gateway (single attempt, no retries)

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{Span, debug, error, info, instrument};
use uuid::Uuid;

use super::{ChatGateway, ChatMessage, ChatRequest, CompletionSettings, parse_chat_response};
use crate::config::ShadowConfig;
use crate::error::{Result, ShadowError};

pub struct GatewayClient {
    client: Client,
    url: String,
    api_key: String,
    settings: CompletionSettings,
}

impl GatewayClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        settings: CompletionSettings,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            settings,
        })
    }

    pub fn from_config(config: &ShadowConfig) -> Result<Self> {
        let settings = CompletionSettings {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };
        Self::new(
            &config.gateway_url,
            config.require_gateway_key()?,
            settings,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    #[instrument(skip(self, messages), fields(request_id, model = %self.settings.model, message_count = messages.len()))]
    async fn send(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();
        Span::current().record("request_id", &request_id);

        let request = ChatRequest::from_settings(&self.settings, messages);
        debug!(request_id = %request_id, "Calling LLM gateway");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                request_id = %request_id,
                status = status.as_u16(),
                error = %error_body,
                "AI API error"
            );
            return Err(ShadowError::from_gateway_status(status.as_u16()));
        }

        let body = response.text().await?;
        let reply = parse_chat_response(&body)?;

        info!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis() as u64,
            reply_len = reply.len(),
            "AI response generated successfully"
        );
        Ok(reply)
    }
}

#[async_trait]
impl ChatGateway for GatewayClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.send(messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    /// Serve a canned gateway answer on an ephemeral port, capturing request bodies
    async fn mock_gateway(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(request): Json<Value>| {
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    captured.lock().unwrap().push(request);
                    (status, Json(body))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1/chat/completions"), seen)
    }

    fn client(url: &str) -> GatewayClient {
        GatewayClient::new(
            url,
            "test-key",
            CompletionSettings::default(),
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_reply_and_sends_settings() {
        let (url, seen) = mock_gateway(
            StatusCode::OK,
            json!({"choices": [{"message": {"content": "Hi there!"}}]}),
        )
        .await;

        let reply = client(&url)
            .complete(vec![ChatMessage::system("sys"), ChatMessage::user("Hello")])
            .await
            .unwrap();
        assert_eq!(reply, "Hi there!");

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["max_tokens"], 500);
        assert_eq!(requests[0]["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (url, _) = mock_gateway(StatusCode::TOO_MANY_REQUESTS, json!({"error": "slow"})).await;
        let err = client(&url).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ShadowError::RateLimited));

        let (url, _) = mock_gateway(StatusCode::PAYMENT_REQUIRED, json!({"error": "pay"})).await;
        let err = client(&url).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ShadowError::QuotaExceeded));

        let (url, seen) = mock_gateway(StatusCode::BAD_GATEWAY, json!({"error": "down"})).await;
        let err = client(&url).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ShadowError::UpstreamError(502)));
        // single attempt, no internal retry
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_completion() {
        let (url, _) = mock_gateway(StatusCode::OK, json!({"choices": []})).await;
        let err = client(&url).complete(vec![]).await.unwrap_err();
        assert!(matches!(err, ShadowError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let err = client("http://127.0.0.1:1/v1/chat/completions")
            .complete(vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ShadowError::Http(_)));
    }
}
