//! Collect Arena Server
//!
//! Loads configuration, starts the world task and serves WebSocket
//! connections until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use collect_arena::{
    game::spawner::SpawnConfig, DeterministicRng, GameServer, GameWorld, ServerConfig,
    WorldHandle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();

    info!("Collect Arena Server v{}", config.version);
    info!("Bind: {}", config.bind_addr());
    info!("Max connections: {}", config.max_connections);

    let rng = match config.spawn_seed {
        Some(seed) => {
            info!("Spawn seed: {}", seed);
            DeterministicRng::new(seed)
        }
        None => DeterministicRng::from_clock(),
    };

    let (world, world_task) = WorldHandle::spawn(GameWorld::new(rng, SpawnConfig::default()));
    let server = Arc::new(GameServer::new(config, world));

    let signal_server = server.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                signal_server.shutdown();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    server.run().await.context("game server failed")?;

    // Connection tasks hold world handles until they close
    drop(server);
    if tokio::time::timeout(std::time::Duration::from_secs(5), world_task)
        .await
        .is_err()
    {
        info!("World task still draining at exit");
    }

    info!("Server stopped");
    Ok(())
}
