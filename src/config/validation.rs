//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate provider URLs, names and timeouts
//! - Enforce `https_only`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{BalancerConfig, ProviderConfig};
use crate::observability::logging::LOG_LEVELS;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{side} provider name must not be empty")]
    EmptyProviderName { side: &'static str },

    #[error("provider names must be distinct, both are '{0}'")]
    DuplicateProviderName(String),

    #[error("{side} provider URL '{url}' is invalid: {reason}")]
    InvalidUrl {
        side: &'static str,
        url: String,
        reason: String,
    },

    #[error("{side} provider URL '{url}' must use https when https_only is set")]
    InsecureUrl { side: &'static str, url: String },

    #[error("{side} provider timeout must be greater than zero")]
    ZeroTimeout { side: &'static str },

    #[error("balancer preference must be a finite number")]
    NonFinitePreference,

    #[error("metrics address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_provider("left", &config.providers.left, config.https_only, &mut errors);
    validate_provider("right", &config.providers.right, config.https_only, &mut errors);

    let left = config.providers.left.name.trim();
    if !left.is_empty() && left == config.providers.right.name.trim() {
        errors.push(ValidationError::DuplicateProviderName(left.to_string()));
    }

    if !config.balancer.preference.is_finite() {
        errors.push(ValidationError::NonFinitePreference);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }
    if !LOG_LEVELS.contains(&observability.log_level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_provider(
    side: &'static str,
    provider: &ProviderConfig,
    https_only: bool,
    errors: &mut Vec<ValidationError>,
) {
    if provider.name.trim().is_empty() {
        errors.push(ValidationError::EmptyProviderName { side });
    }

    if provider.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { side });
    }

    match Url::parse(&provider.url) {
        Ok(url) => match url.scheme() {
            "https" => {}
            "http" if !https_only => {}
            "http" => errors.push(ValidationError::InsecureUrl {
                side,
                url: provider.url.clone(),
            }),
            other => errors.push(ValidationError::InvalidUrl {
                side,
                url: provider.url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        },
        Err(e) => errors.push(ValidationError::InvalidUrl {
            side,
            url: provider.url.clone(),
            reason: e.to_string(),
        }),
    }
}
