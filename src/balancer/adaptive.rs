//! Adaptive two-provider failover balancer.
//!
//! # Selection
//! ```text
//! draw r ∈ [0, 1)
//!     r > preference  → primary = left
//!     r ≤ preference  → primary = right
//! ```
//!
//! # Adjustment
//! ```text
//! primary succeeds → shift toward primary   (left: -STEP, right: +STEP)
//! primary fails    → shift toward secondary, then call secondary once
//! frozen           → no shift (explicit set_preference still applies)
//! ```
//!
//! # Concurrency
//! Preference writes are a single atomic swap and adjustments a single CAS
//! loop, so no shift is ever lost. The select-invoke-adjust sequence is not
//! transactional: concurrent calls may read the same preference and both
//! shift it.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::balancer::provider::{Provider, Side};
use crate::balancer::random::{RandomSource, ThreadRandom};
use crate::config::schema::BalancerSettings;
use crate::observability::metrics;

/// Preference that always routes to the left provider.
pub const MIN_PREFERENCE: f64 = 0.0;
/// Preference that always routes to the right provider.
pub const MAX_PREFERENCE: f64 = 1.0;
/// Shift applied per success or failure.
pub const ADJUSTMENT_STEP: f64 = 0.2;

/// Clamp a preference into `[MIN_PREFERENCE, MAX_PREFERENCE]`.
///
/// `NaN` maps to `MIN_PREFERENCE`.
pub fn clamp_preference(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_PREFERENCE;
    }
    let clamped = MIN_PREFERENCE.max(MAX_PREFERENCE.min(value));
    // Normalize -0.0
    if clamped == 0.0 {
        0.0
    } else {
        clamped
    }
}

/// Routes each call to one of two providers with a single fallback hop.
pub struct AdaptiveFailoverBalancer<P: ?Sized> {
    left: Arc<P>,
    right: Arc<P>,
    /// `f64` bit pattern, always within `[0, 1]`.
    preference: AtomicU64,
    frozen: AtomicBool,
    random: Box<dyn RandomSource>,
}

impl<P: Provider + ?Sized> AdaptiveFailoverBalancer<P> {
    /// Create a balancer preferring the left provider, unfrozen.
    pub fn new(left: Arc<P>, right: Arc<P>) -> Self {
        Self {
            left,
            right,
            preference: AtomicU64::new(MIN_PREFERENCE.to_bits()),
            frozen: AtomicBool::new(false),
            random: Box::new(ThreadRandom),
        }
    }

    /// Create a balancer with the configured initial preference and frozen state.
    pub fn from_config(left: Arc<P>, right: Arc<P>, settings: &BalancerSettings) -> Self {
        Self::new(left, right)
            .with_preference(settings.preference)
            .with_frozen(settings.frozen)
    }

    /// Set the initial preference (clamped).
    pub fn with_preference(self, preference: f64) -> Self {
        self.set_preference(preference);
        self
    }

    /// Set the initial frozen state.
    pub fn with_frozen(self, frozen: bool) -> Self {
        self.set_frozen(frozen);
        self
    }

    /// Replace the random source used for provider selection.
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn left(&self) -> &Arc<P> {
        &self.left
    }

    pub fn right(&self) -> &Arc<P> {
        &self.right
    }

    /// The provider in the given slot.
    pub fn provider(&self, side: Side) -> &Arc<P> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Current preference in `[0, 1]`.
    pub fn preference(&self) -> f64 {
        f64::from_bits(self.preference.load(Ordering::SeqCst))
    }

    /// Set the preference, clamping into `[0, 1]`.
    ///
    /// Applies even while frozen. Logs only when the stored value changes.
    pub fn set_preference(&self, value: f64) {
        let clamped = clamp_preference(value);
        let previous = f64::from_bits(self.preference.swap(clamped.to_bits(), Ordering::SeqCst));
        if previous != clamped {
            tracing::info!(previous, preference = clamped, "Preference set to {}", clamped);
        }
        metrics::record_preference(clamped);
    }

    pub fn frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// Freeze or unfreeze adaptive adjustment.
    pub fn set_frozen(&self, frozen: bool) {
        let previous = self.frozen.swap(frozen, Ordering::SeqCst);
        if previous != frozen {
            if frozen {
                let preference = self.preference();
                tracing::info!(preference, "Balancer frozen at preference of {}", preference);
            } else {
                tracing::info!("Balancer unfrozen");
            }
        }
    }

    /// Draw once and pick the primary slot for the current preference.
    pub fn select_side(&self) -> Side {
        let draw = self.random.next_draw();
        let side = if draw > self.preference() {
            Side::Left
        } else {
            Side::Right
        };
        tracing::debug!(draw, side = %side, "Selected primary provider");
        side
    }

    /// Run `request` against a selected provider, falling back to the other
    /// provider once if it fails.
    ///
    /// Returns the primary's result on success, otherwise the secondary's
    /// result as-is. The primary's error is only logged.
    pub async fn load_balance<T, E, F, Fut>(&self, mut request: F) -> Result<T, E>
    where
        F: FnMut(Arc<P>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Debug,
    {
        let primary = self.select_side();
        let provider = self.provider(primary);

        let error = match request(Arc::clone(provider)).await {
            Ok(value) => {
                metrics::record_request(provider.name(), true);
                self.increase_weight(primary);
                return Ok(value);
            }
            Err(error) => error,
        };

        let secondary = self.fall_back(primary, error);
        let fallback = self.provider(secondary);
        let result = request(Arc::clone(fallback)).await;
        match &result {
            Ok(_) => metrics::record_request(fallback.name(), true),
            Err(e) => {
                metrics::record_request(fallback.name(), false);
                tracing::warn!(
                    provider = fallback.name(),
                    side = %secondary,
                    error = ?e,
                    "Fallback provider failed"
                );
            }
        }
        result
    }

    /// Record a primary failure and shift toward the other slot.
    ///
    /// Takes the error by value so it is not held across the fallback call.
    fn fall_back<E: fmt::Debug>(&self, primary: Side, error: E) -> Side {
        let secondary = primary.other();
        let failed = self.provider(primary).name();
        let fallback = self.provider(secondary).name();

        metrics::record_request(failed, false);
        metrics::record_fallback(failed, fallback);
        tracing::warn!(
            provider = failed,
            side = %primary,
            fallback,
            error = ?error,
            "Primary provider failed, falling back"
        );

        // Shifts before the fallback outcome is known.
        self.increase_weight(secondary);
        secondary
    }

    /// Shift the preference one step toward `side` unless frozen.
    fn increase_weight(&self, side: Side) {
        if self.frozen() {
            return;
        }

        let delta = match side {
            Side::Left => -ADJUSTMENT_STEP,
            Side::Right => ADJUSTMENT_STEP,
        };
        let previous = self
            .preference
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some(clamp_preference(f64::from_bits(bits) + delta).to_bits())
            })
            .unwrap_or_else(|bits| bits);
        let previous = f64::from_bits(previous);
        let current = clamp_preference(previous + delta);

        if previous != current {
            tracing::info!(previous, preference = current, "Preference set to {}", current);
        }
        metrics::record_preference(current);

        let name = self.provider(side).name();
        tracing::info!(provider = name, side = %side, "Increasing weight towards {}", name);
    }
}

impl<P: Provider + ?Sized> fmt::Debug for AdaptiveFailoverBalancer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveFailoverBalancer")
            .field("left", &self.left.name())
            .field("right", &self.right.name())
            .field("preference", &self.preference())
            .field("frozen", &self.frozen())
            .finish()
    }
}
