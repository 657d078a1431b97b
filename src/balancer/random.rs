//! Random draw sources for provider selection.
//!
//! Every balancer owns its source so tests can pin the draw and assert the
//! exact provider chosen.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    /// Draw the next value in `[0, 1)`.
    fn next_draw(&self) -> f64;
}

/// Thread-local RNG. Default source for production balancers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible RNG seeded from a fixed value.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_draw(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws.
///
/// Once the list is exhausted the last draw repeats; an empty list always
/// yields `0.0`.
#[derive(Debug)]
pub struct SequenceDraws {
    /// Remaining draws and the most recent one.
    state: Mutex<(VecDeque<f64>, f64)>,
}

impl SequenceDraws {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let draws: VecDeque<f64> = draws.into_iter().map(clamp_draw).collect();
        Self {
            state: Mutex::new((draws, 0.0)),
        }
    }

    /// A source that always returns `draw`.
    pub fn constant(draw: f64) -> Self {
        Self::new([draw])
    }
}

impl RandomSource for SequenceDraws {
    fn next_draw(&self) -> f64 {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let (draws, last) = &mut *state;
        if let Some(next) = draws.pop_front() {
            *last = next;
        }
        *last
    }
}

/// Keep scripted draws inside the half-open unit interval.
fn clamp_draw(draw: f64) -> f64 {
    if draw.is_nan() || draw < 0.0 {
        0.0
    } else if draw >= 1.0 {
        // Largest f64 below 1.0
        1.0 - f64::EPSILON / 2.0
    } else {
        draw
    }
}
