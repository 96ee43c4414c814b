// src/state.rs
// Shared application state and its assembly from configuration

use std::sync::Arc;
use tracing::info;

use crate::{
    auth::{AuthProvider, RemoteAuth, SqliteAuth},
    config::ShadowConfig,
    error::Result,
    llm::GatewayClient,
    orchestrator::{ContextLimits, Orchestrator},
    store::{
        SqliteStore,
        db::{create_pool, run_migrations},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub model: String,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, model: impl Into<String>) -> Self {
        Self {
            orchestrator,
            model: model.into(),
        }
    }
}

/// Open the database, pick the auth provider, and build the gateway client.
/// `AUTH_URL` switches auth to the remote provider; otherwise tokens are
/// checked against the local database.
pub async fn create_app_state(config: &ShadowConfig) -> Result<Arc<AppState>> {
    let pool = create_pool(&config.database_url, config.sqlite_max_connections).await?;
    run_migrations(&pool).await?;

    let auth: Arc<dyn AuthProvider> = match config.remote_auth()? {
        Some((url, key)) => {
            info!(auth_url = %url, "Using remote auth provider");
            Arc::new(RemoteAuth::new(url, key, config.request_timeout())?)
        }
        None => {
            info!("Using local token auth");
            Arc::new(SqliteAuth::new(pool.clone()))
        }
    };

    let gateway = GatewayClient::from_config(config)?;
    let limits = ContextLimits {
        training: config.training_limit,
        history: config.history_limit,
    };

    let orchestrator = Orchestrator::new(Arc::new(SqliteStore::new(pool)), auth, Arc::new(gateway))
        .with_limits(limits);

    Ok(Arc::new(AppState::new(orchestrator, config.model.clone())))
}
