//! Two-person chat relay with automatic Chinese/English translation.
//!
//! Run with: cargo run -p duo-chat-server
//!
//! Then open http://localhost:3000 in two browsers and log in with
//! `USER1_PASSWORD` and `USER2_PASSWORD`.

mod config;
mod index;

use std::sync::Arc;

use anyhow::Context as _;
use axum::{response::Html, routing::get};
use clap::Parser;
use duo_chat_core::{DisabledTranslator, Translator};
use duo_chat_translate::GoogleTranslator;
use duo_chat_transport::{ChatState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::parse();
    let addr = config.listen_addr()?;
    let passwords = config.password_table()?;
    let limits = config.upload_limits()?;
    let translator = build_translator(&config)?;
    tracing::info!("Authentication initialized for User1 and User2");

    let state = ChatState::new(passwords, translator, limits);

    // Build router
    let app = create_router(state).route("/", get(index_handler));

    // Start server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_translator(config: &Config) -> anyhow::Result<Arc<dyn Translator>> {
    let Some(credentials) = config.credentials()? else {
        tracing::warn!(
            "No translation credentials found; messages will be relayed untranslated. \
             Set GOOGLE_TRANSLATE_API_KEY, GOOGLE_ACCESS_TOKEN or GOOGLE_USE_METADATA_SERVER."
        );
        return Ok(Arc::new(DisabledTranslator));
    };

    let mut builder = GoogleTranslator::builder(credentials).timeout(config.translate_timeout());
    if let Some(base_url) = &config.translate_base_url {
        builder = builder.base_url(base_url);
    }
    let translator = builder
        .build()
        .context("failed to build translation client")?;
    Ok(Arc::new(translator))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn index_handler() -> Html<&'static str> {
    Html(index::INDEX_HTML)
}
