//! Multichannel 2× oversampler for the nonlinear stage.
//!
//! Nonlinear stages generate harmonics above the base-rate Nyquist that
//! would otherwise fold back into the audible band. [`Oversampler2x`]
//! interpolates each channel to twice the rate, hands the caller a mutable
//! view of the high-rate block, then decimates back in place.
//!
//! ## Lifecycle
//!
//! 1. [`Oversampler2x::new`] fixes the channel count and filter design.
//! 2. [`Oversampler2x::init_processing`] sizes the high-rate buffers for the
//!    largest block. This is the only call that allocates.
//! 3. [`Oversampler2x::process_samples_up`] / [`Oversampler2x::process_samples_down`]
//!    run per block on the audio thread.
//!
//! ## Usage
//!
//! ```rust
//! use screamer_core::{Oversampler2x, OversamplingQuality};
//!
//! let mut os = Oversampler2x::new(1, OversamplingQuality::Standard);
//! os.init_processing(64);
//!
//! let mut block = [0.25f32; 64];
//! let high = os.process_samples_up(0, &block);
//! for s in high.iter_mut() {
//!     *s = s.clamp(-0.1, 0.1);
//! }
//! os.process_samples_down(0, &mut block);
//! assert!(block.iter().all(|s| s.is_finite()));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::halfband::{HalfbandDesign, HalfbandDownsampler, HalfbandUpsampler};

/// Oversampling factor.
pub const OVERSAMPLE_FACTOR: usize = 2;

/// Anti-aliasing filter quality.
///
/// | Quality | Sections | Transition | Stopband |
/// |---------|----------|------------|----------|
/// | `Draft` | 4 | 0.10 | ~70 dB |
/// | `Standard` | 8 | 0.06 | ~113 dB |
/// | `High` | 12 | 0.03 | ~140 dB |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversamplingQuality {
    /// Cheapest filters, audible aliasing only at extreme drive.
    Draft,
    /// Default.
    #[default]
    Standard,
    /// Steepest filters, passband extends closest to Nyquist.
    High,
}

impl OversamplingQuality {
    /// The half-band design used for this quality.
    pub fn design(self) -> HalfbandDesign {
        match self {
            Self::Draft => HalfbandDesign::new(4, 0.1),
            Self::Standard => HalfbandDesign::new(8, 0.06),
            Self::High => HalfbandDesign::new(12, 0.03),
        }
    }

    /// Lowercase name used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Standard => "standard",
            Self::High => "high",
        }
    }

    /// Parse a configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(Self::Draft),
            "standard" => Some(Self::Standard),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct ChannelFilters {
    up: HalfbandUpsampler,
    down: HalfbandDownsampler,
}

/// 2× polyphase IIR up/down sampler with per-channel filter state.
///
/// # Invariants
///
/// - Buffers are sized once in [`init_processing`](Self::init_processing)
///   and never resized by the processing calls.
/// - Channel `i` only touches filter state and buffer space of channel `i`.
#[derive(Debug, Clone)]
pub struct Oversampler2x {
    quality: OversamplingQuality,
    round_trip_delay: f64,
    channels: Vec<ChannelFilters>,
    buffer: Vec<f32>,
    max_block_size: usize,
}

impl Oversampler2x {
    /// Create an oversampler for `num_channels` channels.
    ///
    /// No buffer space is reserved until [`init_processing`](Self::init_processing).
    pub fn new(num_channels: usize, quality: OversamplingQuality) -> Self {
        let design = quality.design();
        let filters = ChannelFilters {
            up: HalfbandUpsampler::new(&design),
            down: HalfbandDownsampler::new(&design),
        };
        Self {
            quality,
            round_trip_delay: design.round_trip_delay(),
            channels: (0..num_channels).map(|_| filters.clone()).collect(),
            buffer: Vec::new(),
            max_block_size: 0,
        }
    }

    /// Size the high-rate buffers for blocks of up to `max_block_size`
    /// base-rate samples and clear all filter state.
    pub fn init_processing(&mut self, max_block_size: usize) {
        self.max_block_size = max_block_size;
        self.buffer.clear();
        self.buffer
            .resize(self.channels.len() * max_block_size * OVERSAMPLE_FACTOR, 0.0);
        self.reset();
    }

    /// Clear filter memory and the high-rate buffers.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.up.reset();
            ch.down.reset();
        }
        self.buffer.fill(0.0);
    }

    /// Interpolate `input` for `channel` and return the high-rate view.
    ///
    /// The returned slice holds `2 * input.len()` samples. Inputs longer
    /// than the prepared block size are truncated; an unknown channel yields
    /// an empty slice.
    pub fn process_samples_up(&mut self, channel: usize, input: &[f32]) -> &mut [f32] {
        debug_assert!(input.len() <= self.max_block_size);
        let n = input.len().min(self.max_block_size);
        let Some(filters) = self.channels.get_mut(channel) else {
            return &mut [];
        };
        let start = channel * self.max_block_size * OVERSAMPLE_FACTOR;
        let high = &mut self.buffer[start..start + n * OVERSAMPLE_FACTOR];
        filters.up.process_block(&input[..n], high);
        high
    }

    /// Decimate the high-rate block of `channel` back into `output`.
    pub fn process_samples_down(&mut self, channel: usize, output: &mut [f32]) {
        debug_assert!(output.len() <= self.max_block_size);
        let n = output.len().min(self.max_block_size);
        let Some(filters) = self.channels.get_mut(channel) else {
            return;
        };
        let start = channel * self.max_block_size * OVERSAMPLE_FACTOR;
        let high = &self.buffer[start..start + n * OVERSAMPLE_FACTOR];
        filters.down.process_block(high, &mut output[..n]);
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Largest block accepted, in base-rate samples.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Filter quality.
    pub fn quality(&self) -> OversamplingQuality {
        self.quality
    }

    /// Oversampling factor.
    pub const fn factor(&self) -> usize {
        OVERSAMPLE_FACTOR
    }

    /// Up-then-down latency at DC in base-rate samples, rounded.
    pub fn latency_samples(&self) -> usize {
        libm::round(self.round_trip_delay) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| libm::sinf(2.0 * PI * freq * i as f32 / sample_rate))
            .collect()
    }

    #[test]
    fn round_trip_preserves_amplitude() {
        let mut os = Oversampler2x::new(1, OversamplingQuality::Standard);
        os.init_processing(256);
        let input = sine(440.0, 44100.0, 4096);
        let mut output = Vec::with_capacity(input.len());
        for chunk in input.chunks(256) {
            let mut block = chunk.to_vec();
            os.process_samples_up(0, &block);
            os.process_samples_down(0, &mut block);
            output.extend_from_slice(&block);
        }
        let peak = output[2048..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-3, "round trip peak {peak}");
    }

    #[test]
    fn up_view_is_twice_as_long() {
        let mut os = Oversampler2x::new(2, OversamplingQuality::Draft);
        os.init_processing(128);
        assert_eq!(os.process_samples_up(1, &[0.5; 100]).len(), 200);
        assert!(os.process_samples_up(2, &[0.5; 10]).is_empty());
    }

    #[test]
    fn channels_are_independent() {
        let mut os = Oversampler2x::new(2, OversamplingQuality::Standard);
        os.init_processing(64);
        let mut left = [0.0f32; 64];
        let mut right = [0.0f32; 64];
        left[0] = 1.0;
        os.process_samples_up(0, &left);
        os.process_samples_up(1, &right);
        os.process_samples_down(0, &mut left);
        os.process_samples_down(1, &mut right);
        assert!(left.iter().any(|&s| s != 0.0));
        assert!(right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn reset_clears_state() {
        let mut os = Oversampler2x::new(1, OversamplingQuality::High);
        os.init_processing(32);
        let mut block = [1.0f32; 32];
        os.process_samples_up(0, &block);
        os.process_samples_down(0, &mut block);
        os.reset();
        let mut silent = [0.0f32; 32];
        os.process_samples_up(0, &silent);
        os.process_samples_down(0, &mut silent);
        assert!(silent.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn latency_grows_with_quality() {
        let draft = Oversampler2x::new(1, OversamplingQuality::Draft).latency_samples();
        let high = Oversampler2x::new(1, OversamplingQuality::High).latency_samples();
        assert_eq!(draft, 2);
        assert_eq!(high, 4);
    }

    #[test]
    fn quality_names_round_trip() {
        for q in [
            OversamplingQuality::Draft,
            OversamplingQuality::Standard,
            OversamplingQuality::High,
        ] {
            assert_eq!(OversamplingQuality::from_name(q.name()), Some(q));
        }
        assert_eq!(OversamplingQuality::from_name("ultra"), None);
    }
}
