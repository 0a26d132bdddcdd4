use std::sync::Arc;

use clap::Parser;
use engine::{InMemoryUserRepository, UserRepository};
use server::{LinkGenerator, ServerState};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = settings::Args::parse();
    let settings = settings::Settings::new(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "users_api={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let state = ServerState::new(users, LinkGenerator::new(settings.server.public_url.clone()));

    let listener = match tokio::net::TcpListener::bind(settings.server.address()).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return Err(err.into());
        }
    };

    tokio::select! {
        result = server::run_with_listener(state, listener) => {
            if let Err(err) = result {
                tracing::error!("server failed: {err}");
                return Err(err.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}
