//! First-order DC blocking highpass.
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R * z^-1)
//! ```
//!
//! `R = exp(-2π fc / fs)` places the pole for a given cutoff. The pedal uses
//! it to model the output coupling capacitor (1 µF into 10 kΩ, ~15.9 Hz).

use crate::flush_denormal;
use core::f32::consts::TAU;
use libm::expf;

/// DC blocker with a configurable cutoff.
///
/// ## Example
///
/// ```rust
/// use screamer_core::DcBlocker;
///
/// let mut blocker = DcBlocker::with_cutoff(48000.0, 15.9);
/// let out = blocker.process(0.6);
/// assert!(out > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    coeff: f32,
    cutoff_hz: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    /// Default cutoff in Hz.
    pub const DEFAULT_CUTOFF_HZ: f32 = 7.0;

    /// Create a DC blocker with the default cutoff.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_cutoff(sample_rate, Self::DEFAULT_CUTOFF_HZ)
    }

    /// Create a DC blocker with an explicit cutoff in Hz.
    pub fn with_cutoff(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self {
            coeff: Self::calculate_coeff(cutoff_hz, sample_rate),
            cutoff_hz,
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// Process one sample: `y[n] = x[n] - x[n-1] + R * y[n-1]`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = flush_denormal(input - self.x_prev + self.coeff * self.y_prev);
        self.x_prev = input;
        self.y_prev = output;
        output
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    /// Recalculate R for a new sample rate, keeping the cutoff.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.coeff = Self::calculate_coeff(self.cutoff_hz, sample_rate);
    }

    /// Current R coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    fn calculate_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
        expf(-TAU * cutoff_hz / sample_rate).clamp(0.9, 0.99999)
    }
}
