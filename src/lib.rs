//! Adaptive two-provider failover balancer.

pub mod balancer;
pub mod config;
pub mod observability;
pub mod providers;

pub use balancer::{AdaptiveFailoverBalancer, Provider, Side};
pub use config::BalancerConfig;
pub use providers::HttpProvider;
