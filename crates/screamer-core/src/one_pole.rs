//! One-pole lowpass filter.
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`. 6 dB/octave, zero latency,
//! one multiply per sample. The tone stage builds its treble shelf on top of
//! this filter.
//!
//! # Usage
//!
//! ```rust
//! use screamer_core::OnePole;
//!
//! let mut lp = OnePole::new(48000.0, 723.4);
//! let filtered = lp.process(1.0);
//! assert!(filtered < 1.0);
//! ```

use crate::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
/// - `state` is flushed to zero when below 1e-20
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Create a new one-pole lowpass filter with cutoff `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Create a filter from an RC network, `fc = 1 / (2π R C)`.
    pub fn from_rc(sample_rate: f32, resistance: f32, capacitance: f32) -> Self {
        Self::new(
            sample_rate,
            1.0 / (core::f32::consts::TAU * resistance * capacitance),
        )
    }

    /// Cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Update sample rate and recalculate the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    fn recalculate_coeff(&mut self) {
        let nyquist = 0.5 * self.sample_rate;
        let freq = self.freq.clamp(0.0, nyquist);
        self.coeff = expf(-core::f32::consts::TAU * freq / self.sample_rate);
    }
}
