use std::net::IpAddr;

use clap::Parser;
use tracing::Level;

/// Simulon heat-equation service
#[derive(Debug, Clone, Parser)]
#[command(name = "simulon-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Runs and visualizes 1D heat-equation solves over HTTP", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3030)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Largest accepted grid
    #[arg(long, default_value_t = Limits::default().max_points)]
    pub max_points: usize,

    /// Largest accepted number of time steps
    #[arg(long, default_value_t = Limits::default().max_steps)]
    pub max_steps: usize,

    /// Largest accepted number of stored field values per simulation
    #[arg(long, default_value_t = Limits::default().max_values)]
    pub max_values: usize,

    /// Largest accepted number of training epochs
    #[arg(long, default_value_t = Limits::default().max_epochs)]
    pub max_epochs: usize,

    /// Largest accepted number of network parameters
    #[arg(long, default_value_t = Limits::default().max_params)]
    pub max_params: usize,

    /// Largest accepted number of collocation times
    #[arg(long, default_value_t = Limits::default().max_collocation_times)]
    pub max_collocation_times: usize,

    /// Simulations kept in memory before the oldest is evicted
    #[arg(long, default_value_t = Limits::default().max_simulations)]
    pub max_simulations: usize,
}

impl ServerConfig {
    /// The tracing level named by `log_level`, falling back to `INFO`.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits {
            max_points: self.max_points,
            max_steps: self.max_steps,
            max_values: self.max_values,
            max_epochs: self.max_epochs,
            max_params: self.max_params,
            max_collocation_times: self.max_collocation_times,
            max_simulations: self.max_simulations,
        }
    }
}

/// Request size limits enforced before any solve starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_points: usize,
    pub max_steps: usize,
    /// Snapshots times points of one stored trace.
    pub max_values: usize,
    pub max_epochs: usize,
    /// Weights and biases of one learned network.
    pub max_params: usize,
    pub max_collocation_times: usize,
    /// Size of the in-memory store.
    pub max_simulations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_points: 10_000,
            max_steps: 1_000_000,
            max_values: 10_000_000,
            max_epochs: 5_000,
            max_params: 10_000,
            max_collocation_times: 1_000,
            max_simulations: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::parse_from(["simulon-server"]);

        assert_eq!(config.port, 3030);
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.level(), Level::INFO);
        assert_eq!(config.limits(), Limits::default());
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::parse_from([
            "simulon-server",
            "--port",
            "8080",
            "--log-level",
            "DEBUG",
            "--max-points",
            "64",
            "--max-values",
            "4096",
            "--max-simulations",
            "8",
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.limits().max_points, 64);
        assert_eq!(config.limits().max_values, 4096);
        assert_eq!(config.limits().max_simulations, 8);
    }
}
