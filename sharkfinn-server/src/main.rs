use sharkfinn_server::server;
mod cli;

use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    use clap::Parser;
    // Missing .env is fine
    let _ = dotenvy::dotenv();
    let args = cli::Cli::parse();

    // Console-only logging with env-driven level
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(true)
        .init();

    let mut config = match server::AppConfig::load_from_path(&args.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error=%e, path=%args.config.display(), "Failed to load config");
            std::process::exit(2);
        }
    };
    if args.database_url.is_some() {
        config.database_url = args.database_url;
    }
    if args.port.is_some() {
        config.listen_port = args.port;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }
    if args.cors_origin.is_some() {
        config.cors_origin = args.cors_origin;
    }

    // SQLite creates the file but not its directory
    if let Some(db_path) = config.database_url()
        && let Some(parent) = std::path::Path::new(db_path.trim_start_matches("sqlite://")).parent()
        && !parent.as_os_str().is_empty()
    {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(error = %e, dir = %parent.display(), "Failed to create database directory");
        }
    }

    let port = config.port();
    let state = server::AppState::from_config(config);
    let app = server::router(state);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error=%e, %addr, "Failed to bind listener");
            std::process::exit(3);
        }
    };
    tracing::info!("SharkFinn Learning server running on http://localhost:{}", port);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%err, "server error");
    }
    tracing::info!("shutdown: complete");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("shutdown: received SIGINT");
            }
            _ = sigterm.recv() => {
                tracing::info!("shutdown: received SIGTERM");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown: received Ctrl+C");
    }
}
