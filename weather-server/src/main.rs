use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use weather_core::Config;
use weather_server::{AppState, router};

#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Location and weather proxy")]
struct Args {
    /// Address to listen on. Defaults to `server.bind_addr` from the config.
    #[arg(long, env = "WEATHER_HTTP_ADDR")]
    http_addr: Option<String>,

    /// Config file. Defaults to the platform config directory.
    #[arg(long, env = "WEATHER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_env_overrides();

    let state = AppState::from_config(&config)?;
    let http_addr = args.http_addr.unwrap_or_else(|| config.server.bind_addr.clone());

    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind http listener on {http_addr}"))?;

    tracing::info!(
        addr = %http_addr,
        cors = ?config.server.cors,
        postal_country = %config.postal_country,
        "weather proxy listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("http server crashed")?;

    Ok(())
}
