//! Libros - authenticated book catalogue API
//! Mission: Every user sees and edits only their own books

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use libros_backend::{build_router, AppState, Config, Database};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    info!("🚀 Libros API starting with {:?}", config);

    let db = Database::open(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    let state = AppState::new(db, Arc::new(config.jwt_handler()), config.password_hasher());

    info!(
        "🔐 Authentication initialized, tokens valid for {} minutes",
        config.access_token_expire_minutes
    );

    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "libros_backend=debug,libros=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    dotenv().ok();

    // 2) Also try the crate's own .env when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        dotenv::from_path(&manifest_env).ok();
    }
}
