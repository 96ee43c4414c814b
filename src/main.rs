// src/main.rs
// ShadowMe - persona chat backend

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use shadowme::{
    api::http_router,
    auth::SqliteAuth,
    config::ShadowConfig,
    state::create_app_state,
    store::db::{create_pool, run_migrations},
};

#[derive(Parser)]
#[command(name = "shadowme")]
#[command(about = "Persona chat backend that answers in the user's own voice")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind (overrides SHADOW_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides SHADOW_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply database migrations and exit
    Migrate,

    /// Manage local users and tokens
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user and print a bearer token for it
    Add {
        #[arg(long)]
        email: String,
    },
    /// Issue another bearer token for an existing user
    Token {
        #[arg(long)]
        email: String,
    },
}

fn log_level(cli: &Cli, config: &ShadowConfig) -> Level {
    if cli.verbose {
        return Level::DEBUG;
    }
    config.log_level.parse().unwrap_or(Level::INFO)
}

async fn run_server(mut config: ShadowConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let app_state = create_app_state(&config).await?;
    let app = http_router(app_state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(model = %config.model, "ShadowMe listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn local_auth(config: &ShadowConfig) -> Result<SqliteAuth> {
    let pool = create_pool(&config.database_url, config.sqlite_max_connections).await?;
    run_migrations(&pool).await?;
    Ok(SqliteAuth::new(pool))
}

async fn run_user_action(config: &ShadowConfig, action: UserAction) -> Result<()> {
    let auth = local_auth(config).await?;
    match action {
        UserAction::Add { email } => {
            let user = auth.create_user(&email).await?;
            let token = auth.issue_token(&user.id).await?;
            println!("user:  {}", user.id);
            println!("token: {}", token);
        }
        UserAction::Token { email } => {
            let user = auth
                .find_user_by_email(&email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("no user with email {email}"))?;
            println!("{}", auth.issue_token(&user.id).await?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ShadowConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&cli, &config))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await,
        None => run_server(config, None, None).await,
        Some(Commands::Migrate) => {
            let pool = create_pool(&config.database_url, config.sqlite_max_connections).await?;
            run_migrations(&pool).await?;
            Ok(())
        }
        Some(Commands::User { action }) => run_user_action(&config, action).await,
    }
}
