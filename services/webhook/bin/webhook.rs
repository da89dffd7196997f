//! Main Entrypoint for the Webhook Fulfillment Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Building the conversation app and registering its handlers.
//! 4. Constructing the Axum router and starting the web server with
//!    graceful shutdown.

use anyhow::Context;
use converse_core::Turn;
use converse_webhook::{
    ConversationApp, UnverifiedProcessor, Verification, VerificationMessage,
    config::Config,
    router::create_router,
    state::AppState,
};
use futures::FutureExt;
use std::sync::Arc;
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// The default conversation entry point.
async fn welcome(conv: &mut Turn) -> anyhow::Result<()> {
    conv.add("Welcome! This webhook is up and answering turns.")?;
    conv.session
        .params
        .insert("greeted".to_string(), serde_json::json!(true));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();
    info!("Configuration loaded. Building conversation app...");

    // --- 3. Build the Conversation App ---
    let mut app = ConversationApp::new(Arc::new(UnverifiedProcessor));
    if let Some(client_id) = &config.client_id {
        app = app.with_client_id(client_id.clone());
    }
    if let Some(project) = &config.verification_project {
        let mut verification = Verification::new(project.clone());
        if let Some(status) = config.verification_status {
            verification = verification.with_status(status);
        }
        if let Some(message) = &config.verification_error {
            verification = verification.with_message(VerificationMessage::Fixed(message.clone()));
        }
        app = app.with_verification(verification);
    }
    app.handle("main", |conv: &mut Turn| welcome(conv).boxed());

    let app_state = Arc::new(AppState {
        app,
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Start Server ---
    let router = create_router(app_state);
    info!(bind_address = %config.bind_address, "Service configured. Starting server...");
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}
