use std::net::SocketAddr;

use clap::Parser;
use simulon_server::{AppState, ServerConfig, routes};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let limits = config.limits();
    let address = SocketAddr::new(config.host, config.port);
    info!(%address, ?limits, "simulon server listening");

    warp::serve(routes(AppState::new(limits))).run(address).await;
    Ok(())
}
