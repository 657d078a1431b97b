//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for the balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Reject providers that are not served over HTTPS.
    pub https_only: bool,

    /// Initial balancer state.
    pub balancer: BalancerSettings,

    /// The two providers to balance between.
    pub providers: ProvidersConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Initial preference and frozen state.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerSettings {
    /// 0.0 always prefers the left provider, 1.0 the right one.
    /// Out-of-range values are clamped.
    pub preference: f64,

    /// Start with adaptive adjustment disabled.
    pub frozen: bool,
}

/// Left and right provider definitions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub left: ProviderConfig,
    pub right: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            left: ProviderConfig {
                name: "neoscan".to_string(),
                url: "https://api.neoscan.io/api/main_net".to_string(),
                timeout_secs: default_timeout_secs(),
            },
            right: ProviderConfig {
                name: "neondb".to_string(),
                url: "https://api.neonwallet.com".to_string(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// A single provider endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider name used in logs and metrics.
    pub name: String,

    /// Base URL requests are resolved against.
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
