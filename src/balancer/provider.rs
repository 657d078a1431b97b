//! Provider abstraction.
//!
//! # Responsibilities
//! - Identify a backend by name (for logs and metric labels)
//! - Name the two slots a balancer routes between

use std::fmt;
use std::sync::Arc;

/// An interchangeable backend that can serve the same class of requests.
///
/// The balancer never calls into a provider itself; it only hands the
/// selected provider to the caller's request function.
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Which of the two provider slots a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The opposite slot.
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
