//! ctOP chatbot binary - composition root.
//!
//! 1. Load configuration from TOML, then start tracing
//! 2. Load the FAQ catalog (fatal on error)
//! 3. Build the action registry and the agent client
//! 4. Serve the action server and the chat API until Ctrl-C

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;

use ctop_action::{ActionRegistry, ActionSettings};
use ctop_api::{create_action_router, create_chat_router, ActionState, Agent, ChatState, RestAgent};
use ctop_core::config::BotConfig;
use ctop_core::BotError;
use ctop_recommend::{CatalogError, CatalogLoader, Recommender, RecommenderHandle};

use cli::CliArgs;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn load_recommender(path: &Path) -> Result<Recommender, CatalogError> {
    match CatalogLoader::load(path) {
        Ok(entries) => Ok(Recommender::new(entries)),
        Err(err) => {
            let malformed = err.malformed_indices();
            if malformed.is_empty() {
                tracing::error!(path = %path.display(), error = %err, "Failed to load FAQ catalog");
            } else {
                tracing::error!(
                    path = %path.display(),
                    malformed = ?malformed,
                    error = %err,
                    "FAQ catalog has malformed entries"
                );
            }
            Err(err)
        }
    }
}

fn build_agent(config: &BotConfig) -> Option<Arc<dyn Agent>> {
    let Some(url) = config.chat.agent_url.as_deref() else {
        tracing::warn!("No agent_url configured, chat requests will fail");
        return None;
    };
    match RestAgent::new(url, Duration::from_secs(config.chat.agent_timeout_secs)) {
        Ok(agent) => {
            tracing::info!(endpoint = %agent.endpoint(), "Agent client ready");
            Some(Arc::new(agent))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create agent client");
            None
        }
    }
}

async fn bind(host: &str, port: u16, name: &str) -> Result<TcpListener, BotError> {
    let addr = format!("{}:{}", host, port);
    match TcpListener::bind(&addr).await {
        Ok(listener) => {
            tracing::info!(addr = %addr, "{} listening", name);
            Ok(listener)
        }
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind {}", name);
            Err(BotError::Api(format!("Failed to bind {}: {}", addr, e)))
        }
    }
}

async fn serve(
    listener: TcpListener,
    router: axum::Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), BotError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            // Sender dropped also means shut down.
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| BotError::Api(format!("Server error: {}", e)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing needs the configured level, so load first and log afterwards.
    let config_file = args.resolve_config_path();
    let loaded = BotConfig::load(&config_file);
    let config_level = match &loaded {
        Ok(config) => config.general.log_level.clone(),
        Err(_) => BotConfig::default().general.log_level,
    };
    init_tracing(&args.resolve_log_level(&config_level));

    tracing::info!("Starting ctop-chatbot v{}", env!("CARGO_PKG_VERSION"));
    let config = BotConfig::resolve(loaded, &config_file);

    // Catalog.
    let catalog_path = args.resolve_catalog_path(&config.catalog.path);
    let recommender = Arc::new(RecommenderHandle::new(load_recommender(&catalog_path)?));

    // Action server.
    let settings = ActionSettings::from_config(&config);
    let registry = ActionRegistry::with_defaults(Arc::clone(&recommender), settings);
    let action_state = ActionState::new(registry, Arc::clone(&recommender))
        .with_catalog_path(catalog_path)
        .with_default_top_k(config.catalog.default_top_k);

    // Chat API.
    let chat_state =
        ChatState::new(build_agent(&config)).with_allowed_origins(config.chat.allowed_origins.clone());

    let action_listener = bind(
        &config.actions.host,
        args.resolve_action_port(config.actions.port),
        "Action server",
    )
    .await?;
    let chat_listener = bind(
        &config.chat.host,
        args.resolve_chat_port(config.chat.port),
        "Chat API",
    )
    .await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            // Keep the servers up; dropping the sender would stop them.
            std::future::pending::<()>().await;
        }
        tracing::info!("Ctrl-C received, shutting down");
        let _ = shutdown_tx.send(true);
    });

    tokio::try_join!(
        serve(action_listener, create_action_router(action_state), shutdown_rx.clone()),
        serve(chat_listener, create_chat_router(chat_state), shutdown_rx),
    )?;

    tracing::info!("Shutdown complete");
    Ok(())
}
