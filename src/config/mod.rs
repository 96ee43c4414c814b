// src/config/mod.rs
// Runtime configuration loaded from the environment (and an optional .env file)

use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, ShadowError};

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_CONTEXT_LIMIT: u32 = 20;
/// Upper bound for either prompt context limit
pub const MAX_CONTEXT_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct ShadowConfig {
    // ── Server
    pub host: String,
    pub port: u16,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── LLM gateway
    pub gateway_url: String,
    pub gateway_api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,

    // ── Auth (remote provider when auth_url is set)
    pub auth_url: Option<String>,
    pub auth_api_key: Option<String>,

    // ── Prompt context
    pub training_limit: u32,
    pub history_limit: u32,

    // ── Logging
    pub log_level: String,
}

/// Read `key` and parse it, falling back to `default` when unset or unparsable.
/// Trailing `# comments` from .env files are stripped.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => {
                    debug!(key, value = clean_val, "config value from environment");
                    parsed
                }
                Err(_) => {
                    debug!(key, value = %val, "config value failed to parse, using default");
                    default
                }
            }
        }
        Err(_) => default,
    }
}

/// Context limits are bound straight into SQL `LIMIT`, so anything outside
/// `1..=MAX_CONTEXT_LIMIT` is rejected instead of falling back.
fn check_context_limit(key: &str, value: i64) -> Result<u32> {
    if (1..=i64::from(MAX_CONTEXT_LIMIT)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ShadowError::Config(format!(
            "{key} must be between 1 and {MAX_CONTEXT_LIMIT}, got {value}"
        )))
    }
}

fn env_context_limit(key: &str) -> Result<u32> {
    let value: i64 = env_var_or(key, i64::from(DEFAULT_CONTEXT_LIMIT));
    check_context_limit(key, value)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://shadowme.db".to_string(),
            sqlite_max_connections: 5,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            gateway_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            auth_url: None,
            auth_api_key: None,
            training_limit: DEFAULT_CONTEXT_LIMIT,
            history_limit: DEFAULT_CONTEXT_LIMIT,
            log_level: "info".to_string(),
        }
    }
}

impl ShadowConfig {
    pub fn from_env() -> Result<Self> {
        // A missing .env is normal in deployments
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Ok(Self {
            host: env_var_or("SHADOW_HOST", defaults.host),
            port: env_var_or("SHADOW_PORT", defaults.port),
            database_url: env_var_or("DATABASE_URL", defaults.database_url),
            sqlite_max_connections: env_var_or(
                "SQLITE_MAX_CONNECTIONS",
                defaults.sqlite_max_connections,
            ),
            gateway_url: env_var_or("LLM_GATEWAY_URL", defaults.gateway_url),
            gateway_api_key: env_opt("LLM_API_KEY").or_else(|| env_opt("LOVABLE_API_KEY")),
            model: env_var_or("LLM_MODEL", defaults.model),
            temperature: env_var_or("LLM_TEMPERATURE", defaults.temperature),
            max_tokens: env_var_or("LLM_MAX_TOKENS", defaults.max_tokens),
            request_timeout_secs: env_var_or("LLM_TIMEOUT_SECS", defaults.request_timeout_secs),
            connect_timeout_secs: env_var_or(
                "LLM_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            auth_url: env_opt("AUTH_URL"),
            auth_api_key: env_opt("AUTH_API_KEY"),
            training_limit: env_context_limit("TRAINING_LIMIT")?,
            history_limit: env_context_limit("HISTORY_LIMIT")?,
            log_level: env_var_or("LOG_LEVEL", defaults.log_level),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// The gateway key is only needed when actually serving chat traffic
    pub fn require_gateway_key(&self) -> Result<&str> {
        self.gateway_api_key
            .as_deref()
            .ok_or_else(|| ShadowError::Config("LLM_API_KEY is not set".to_string()))
    }

    /// Remote auth needs both the base URL and the project key
    pub fn remote_auth(&self) -> Result<Option<(&str, &str)>> {
        match (self.auth_url.as_deref(), self.auth_api_key.as_deref()) {
            (Some(url), Some(key)) => Ok(Some((url, key))),
            (None, _) => Ok(None),
            (Some(_), None) => Err(ShadowError::Config(
                "AUTH_URL is set but AUTH_API_KEY is missing".to_string(),
            )),
        }
    }
}
