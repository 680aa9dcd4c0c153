use anyhow::Context;
use chirp_api::{config::ChirpApiConfig, server};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ChirpApiConfig::parse();

    if !config.dump_openapi {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or("chirp_api=info,chirp_common=info,chirp_db=info".into()),
            )
            .pretty()
            .init();
    }

    let (router, api) = server::make(config.clone()).await?;

    if config.dump_openapi {
        print!("{}", api.to_pretty_json()?);
        return Ok(());
    }

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, router)
        .await
        .context("server exited with an error")
}
