//! Audio configuration handed to `prepare`.

use crate::error::{PedalError, Result};

/// Most channels a processor can be prepared for.
pub const MAX_CHANNELS: usize = 2;

/// Sample rate, block size and channel count fixed between `prepare` calls.
///
/// ```rust
/// use screamer_pedal::ProcessSpec;
///
/// let spec = ProcessSpec::new(44100.0, 512, 2);
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.oversampled_rate(), 88200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Base sample rate in Hz.
    pub sample_rate: f64,
    /// Largest number of samples per channel in one `process` call.
    pub max_block_size: usize,
    /// Number of channels, 1 or 2.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Create a spec.
    pub const fn new(sample_rate: f64, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    /// Check that the spec can be prepared.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(PedalError::InvalidSpec("sample rate must be positive and finite"));
        }
        if self.max_block_size == 0 {
            return Err(PedalError::InvalidSpec("maximum block size must be non-zero"));
        }
        if self.num_channels == 0 || self.num_channels > MAX_CHANNELS {
            return Err(PedalError::InvalidSpec("channel count must be 1 or 2"));
        }
        Ok(())
    }

    /// Rate the clipping stage runs at.
    pub fn oversampled_rate(&self) -> f64 {
        self.sample_rate * screamer_core::OVERSAMPLE_FACTOR as f64
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self::new(44100.0, 512, 2)
    }
}
