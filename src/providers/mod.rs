//! Concrete provider implementations.
//!
//! # Responsibilities
//! - Wrap a backend API behind the `Provider` contract
//! - Enforce per-provider request timeouts
//! - Map transport and status failures into `ProviderError`

pub mod http;

pub use http::{HttpProvider, ProviderError};
