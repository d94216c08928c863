//! # Sliding Value Window
//!
//! Rolling statistics over a stream of scalar observations, used to score a
//! node's fitness over time.
//!
//! Each window keeps eight series that grow in lockstep, one entry per
//! observation:
//!
//! | Series | Full history | Windowed tail (last N) |
//! |--------|--------------|------------------------|
//! | punctual value | `punctual_values` | `sliding_punctual_values` |
//! | moving average μ | `average` | `sliding_average` |
//! | top boundary μ+σ | `top_boundary` | `sliding_top_boundary` |
//! | bottom boundary μ−σ | `bottom_boundary` | `sliding_bottom_boundary` |
//!
//! μ is the mean of the windowed punctual tail once the new value is in and
//! the oldest value (if the tail overflowed) is out. σ is the population
//! standard deviation of that same tail, measured from the μ just appended.
//!
//! Both are recomputed from the tail on every observation (two passes, O(N)),
//! so no rounding error carries over from values that have left the window.
//!
//! Reading a current value before the first observation returns 0.0.

#![allow(clippy::float_arithmetic)]

use crate::{EnsmError, WindowConfig};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling window of capacity N over a stream of `f64` observations.
#[derive(Debug, Clone)]
pub struct SlidingValueWindow {
    capacity: usize,
    has_new_value: bool,

    punctual: Vec<f64>,
    average: Vec<f64>,
    top: Vec<f64>,
    bottom: Vec<f64>,

    sliding_punctual: VecDeque<f64>,
    sliding_average: VecDeque<f64>,
    sliding_top: VecDeque<f64>,
    sliding_bottom: VecDeque<f64>,
}

impl SlidingValueWindow {
    /// Create a window keeping the last `capacity` observations.
    ///
    /// Tails grow with the data; nothing is reserved up front, so any
    /// non-zero capacity is accepted.
    pub fn new(capacity: usize) -> Result<Self, EnsmError> {
        if capacity == 0 {
            return Err(EnsmError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            has_new_value: false,
            punctual: Vec::new(),
            average: Vec::new(),
            top: Vec::new(),
            bottom: Vec::new(),
            sliding_punctual: VecDeque::new(),
            sliding_average: VecDeque::new(),
            sliding_top: VecDeque::new(),
            sliding_bottom: VecDeque::new(),
        })
    }

    /// Create a window from a validated configuration (`1..=MAX_WINDOW_SIZE`).
    pub fn from_config(config: &WindowConfig) -> Result<Self, EnsmError> {
        config.validate()?;
        Self::new(config.size)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record one observation and extend all eight series.
    pub fn add_value(&mut self, value: f64) {
        self.has_new_value = true;

        self.punctual.push(value);
        self.sliding_punctual.push_back(value);
        if self.sliding_punctual.len() > self.capacity {
            self.sliding_punctual.pop_front();
        }

        let mean = self.avg();
        let deviation = self.std_dev(mean);
        Self::push(&mut self.average, &mut self.sliding_average, mean, self.capacity);
        Self::push(
            &mut self.top,
            &mut self.sliding_top,
            mean + deviation,
            self.capacity,
        );
        Self::push(
            &mut self.bottom,
            &mut self.sliding_bottom,
            mean - deviation,
            self.capacity,
        );
    }

    /// Mean of the windowed punctual tail (0.0 when empty).
    #[must_use]
    pub fn avg(&self) -> f64 {
        let n = self.sliding_punctual.len();
        if n == 0 {
            return 0.0;
        }
        self.sliding_punctual.iter().sum::<f64>() / n as f64
    }

    // -------------------------------------------------------------------------
    // Full series
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn punctual_values(&self) -> &[f64] {
        &self.punctual
    }

    #[must_use]
    pub fn average(&self) -> &[f64] {
        &self.average
    }

    #[must_use]
    pub fn top_boundary(&self) -> &[f64] {
        &self.top
    }

    #[must_use]
    pub fn bottom_boundary(&self) -> &[f64] {
        &self.bottom
    }

    // -------------------------------------------------------------------------
    // Windowed tails
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn sliding_punctual_values(&self) -> &VecDeque<f64> {
        &self.sliding_punctual
    }

    #[must_use]
    pub fn sliding_average(&self) -> &VecDeque<f64> {
        &self.sliding_average
    }

    #[must_use]
    pub fn sliding_top_boundary(&self) -> &VecDeque<f64> {
        &self.sliding_top
    }

    #[must_use]
    pub fn sliding_bottom_boundary(&self) -> &VecDeque<f64> {
        &self.sliding_bottom
    }

    // -------------------------------------------------------------------------
    // Current values
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn current_punctual_value(&self) -> f64 {
        self.sliding_punctual.back().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn current_average(&self) -> f64 {
        self.sliding_average.back().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn current_top_boundary(&self) -> f64 {
        self.sliding_top.back().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn current_bottom_boundary(&self) -> f64 {
        self.sliding_bottom.back().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn num_punctual_values(&self) -> usize {
        self.punctual.len()
    }

    #[must_use]
    pub fn num_sliding_punctual_values(&self) -> usize {
        self.sliding_punctual.len()
    }

    // -------------------------------------------------------------------------
    // New-value flag
    // -------------------------------------------------------------------------

    /// True once `add_value` has run and until the flag is cleared.
    #[must_use]
    pub fn has_new_value(&self) -> bool {
        self.has_new_value
    }

    pub fn set_new_value(&mut self, new_value: bool) {
        self.has_new_value = new_value;
    }

    /// Clear all eight series and the new-value flag.
    pub fn reset(&mut self) {
        self.punctual.clear();
        self.average.clear();
        self.top.clear();
        self.bottom.clear();
        self.sliding_punctual.clear();
        self.sliding_average.clear();
        self.sliding_top.clear();
        self.sliding_bottom.clear();
        self.has_new_value = false;
    }

    /// Owned copy of every series, suitable for serialisation.
    #[must_use]
    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            capacity: self.capacity,
            has_new_value: self.has_new_value,
            punctual_values: self.punctual.clone(),
            average: self.average.clone(),
            top_boundary: self.top.clone(),
            bottom_boundary: self.bottom.clone(),
            sliding_punctual_values: self.sliding_punctual.iter().copied().collect(),
            sliding_average: self.sliding_average.iter().copied().collect(),
            sliding_top_boundary: self.sliding_top.iter().copied().collect(),
            sliding_bottom_boundary: self.sliding_bottom.iter().copied().collect(),
            current_average: self.current_average(),
            current_top_boundary: self.current_top_boundary(),
            current_bottom_boundary: self.current_bottom_boundary(),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn push(series: &mut Vec<f64>, tail: &mut VecDeque<f64>, value: f64, capacity: usize) {
        series.push(value);
        tail.push_back(value);
        if tail.len() > capacity {
            tail.pop_front();
        }
    }

    /// Population standard deviation of the windowed punctual tail around `mean`.
    fn std_dev(&self, mean: f64) -> f64 {
        let n = self.sliding_punctual.len();
        if n == 0 {
            return 0.0;
        }
        let variance = self
            .sliding_punctual
            .iter()
            .map(|x| (x - mean) * (x - mean))
            .sum::<f64>()
            / n as f64;
        variance.sqrt()
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Serializable copy of a window's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub capacity: usize,
    pub has_new_value: bool,
    pub punctual_values: Vec<f64>,
    pub average: Vec<f64>,
    pub top_boundary: Vec<f64>,
    pub bottom_boundary: Vec<f64>,
    pub sliding_punctual_values: Vec<f64>,
    pub sliding_average: Vec<f64>,
    pub sliding_top_boundary: Vec<f64>,
    pub sliding_bottom_boundary: Vec<f64>,
    pub current_average: f64,
    pub current_top_boundary: f64,
    pub current_bottom_boundary: f64,
}

// =============================================================================
// TESTS
// =============================================================================
