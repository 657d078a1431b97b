//! api-balancer CLI.
//!
//! ```text
//! balancer.toml
//!     → config::load_config (parse + validate)
//!     → two HttpProviders (left, right)
//!     → AdaptiveFailoverBalancer (initial preference / frozen)
//!     → `get` issues balanced GETs, printing each response
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use api_balancer::balancer::{AdaptiveFailoverBalancer, Provider};
use api_balancer::config::{load_config, BalancerConfig};
use api_balancer::observability::{logging, metrics};
use api_balancer::providers::{HttpProvider, ProviderError};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "api-balancer")]
#[command(about = "Adaptive failover between two API providers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "balancer.toml")]
    config: PathBuf,

    /// Override the configured log level.
    #[arg(
        short,
        long,
        value_parser = PossibleValuesParser::new(logging::LOG_LEVELS.iter().copied())
    )]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print a summary
    Check,
    /// Send balanced GET requests to the providers
    Get {
        /// Request path, relative to each provider's base URL
        path: String,

        /// Number of sequential requests
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,

        /// Override the initial preference (0 = left, 1 = right)
        #[arg(long)]
        preference: Option<f64>,

        /// Disable adaptive adjustment
        #[arg(long)]
        frozen: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    logging::init_logging(level);

    tracing::info!(
        config = %cli.config.display(),
        left = %config.providers.left.name,
        right = %config.providers.right.name,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    match cli.command {
        Commands::Check => print_summary(&config),
        Commands::Get {
            path,
            count,
            preference,
            frozen,
        } => {
            let mut settings = config.balancer.clone();
            if let Some(p) = preference {
                settings.preference = p;
            }
            settings.frozen |= frozen;

            let left = Arc::new(HttpProvider::from_config(&config.providers.left)?);
            let right = Arc::new(HttpProvider::from_config(&config.providers.right)?);
            let balancer = AdaptiveFailoverBalancer::from_config(left, right, &settings);

            for i in 0..count {
                let result = balancer
                    .load_balance(|provider| {
                        let path = path.clone();
                        async move {
                            let body: Value = provider.get_json(&path).await?;
                            Ok::<_, ProviderError>((
                                provider.name().to_string(),
                                body,
                            ))
                        }
                    })
                    .await;

                match result {
                    Ok((name, body)) => {
                        println!("[{}] {}:", i + 1, name);
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    }
                    Err(e) => eprintln!("[{}] error: {}", i + 1, e),
                }
            }

            println!("final preference: {:.3}", balancer.preference());
        }
    }

    Ok(())
}

fn print_summary(config: &BalancerConfig) {
    println!("configuration OK");
    println!("  https_only: {}", config.https_only);
    println!(
        "  left:  {} ({}, timeout {}s)",
        config.providers.left.name, config.providers.left.url, config.providers.left.timeout_secs
    );
    println!(
        "  right: {} ({}, timeout {}s)",
        config.providers.right.name, config.providers.right.url, config.providers.right.timeout_secs
    );
    println!(
        "  preference: {} (frozen: {})",
        config.balancer.preference, config.balancer.frozen
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_accepts_known_levels() {
        for level in logging::LOG_LEVELS {
            let cli = Cli::try_parse_from(["api-balancer", "--log-level", level, "check"]).unwrap();
            assert_eq!(cli.log_level.as_deref(), Some(*level));
        }
    }

    #[test]
    fn test_log_level_rejects_unknown_level() {
        let err = Cli::try_parse_from(["api-balancer", "--log-level", "loud", "check"])
            .err()
            .expect("unknown level must be rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_log_level_is_optional() {
        let cli = Cli::try_parse_from(["api-balancer", "check"]).unwrap();
        assert!(cli.log_level.is_none());
        assert!(matches!(cli.command, Commands::Check));
    }
}
