//! Adaptive failover subsystem.
//!
//! # Data Flow
//! ```text
//! caller → load_balance(request fn)
//!     → random.rs (draw r ∈ [0, 1))
//!     → adaptive.rs (r vs preference → primary side)
//!     → request fn(primary provider)
//!         ok  → shift preference toward primary → return
//!         err → shift preference toward secondary
//!             → request fn(secondary provider) → return as-is
//! ```
//!
//! # Design Decisions
//! - Exactly two providers; a single fallback hop per call
//! - Providers are opaque: only their name is read (logs, metrics)
//! - Freezing blocks adaptive shifts, never explicit configuration
//! - The random source is injected so selection can be pinned in tests

pub mod adaptive;
pub mod provider;
pub mod random;

pub use adaptive::{
    clamp_preference, AdaptiveFailoverBalancer, ADJUSTMENT_STEP, MAX_PREFERENCE, MIN_PREFERENCE,
};
pub use provider::{Provider, Side};
pub use random::{RandomSource, SeededRandom, SequenceDraws, ThreadRandom};
