// SPDX-License-Identifier: AGPL-3.0-only
// Minimal bootstrap; request handling lives in the routes module.
use anyhow::Result;
use auspex::{AnalyzerConfig, HttpReasonerClient, QueryAnalyzer};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod routes;

#[derive(Parser, Debug, Clone)]
#[command(name = "atlas-server", about = "Query understanding and visualization recommendation service")]
struct Cli {
    /// Socket address to bind; falls back to ATLAS_BIND_ADDR, then the default.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let addr = cli
        .addr
        .or_else(|| {
            std::env::var("ATLAS_BIND_ADDR")
                .ok()
                .and_then(|raw| raw.parse().ok())
        })
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

    let config = AnalyzerConfig::from_env()?;
    let client = HttpReasonerClient::new(&config);
    let analyzer = Arc::new(QueryAnalyzer::new(client, config));

    let app = routes::build_router(analyzer);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "atlas-server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
