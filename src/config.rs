//! Server Configuration
//!
//! Loaded from the environment (and a `.env` file when present). Invalid
//! values are logged and replaced by the default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Maximum concurrent connections
    pub max_connections: usize,
    /// Per-session outbound queue capacity
    pub outbound_queue: usize,
    /// Spawner RNG seed (clock-seeded when unset)
    pub spawn_seed: Option<u64>,
    /// Period of the stats log line
    pub stats_interval: Duration,
    /// Server version string
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            max_connections: 1000,
            outbound_queue: 64,
            spawn_seed: None,
            stats_interval: Duration::from_secs(60),
            version: crate::VERSION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port);
        let port = if port == 0 {
            warn!("PORT must be > 0, using default");
            defaults.port
        } else {
            port
        };

        let max_connections = parse_or(&lookup, "MAX_CONNECTIONS", defaults.max_connections);
        let outbound_queue = parse_or(&lookup, "OUTBOUND_QUEUE", defaults.outbound_queue).max(1);
        let stats_secs = parse_or(&lookup, "STATS_INTERVAL_SECS", defaults.stats_interval.as_secs());

        Self {
            bind_address: parse_or(&lookup, "BIND_ADDRESS", defaults.bind_address),
            port,
            max_connections,
            outbound_queue,
            spawn_seed: lookup("SPAWN_SEED").and_then(|raw| match raw.parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn!("Invalid SPAWN_SEED '{}', seeding from clock", raw);
                    None
                }
            }),
            stats_interval: Duration::from_secs(stats_secs.max(1)),
            version: defaults.version,
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', using default", key, raw);
            default
        }),
        None => default,
    }
}
