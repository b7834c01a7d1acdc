//! Construction-time engine options.
//!
//! Options change filter designs or circuit topology and therefore only take
//! effect at the next `prepare`.

pub use screamer_core::OversamplingQuality;

/// Series diode counts in each direction of the clipping pair.
///
/// ```rust
/// use screamer_pedal::DiodeConfig;
///
/// assert!(DiodeConfig::default().is_symmetric());
/// assert!(!DiodeConfig::new(1, 2).is_symmetric());
/// assert_eq!(DiodeConfig::new(0, 9), DiodeConfig::new(1, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiodeConfig {
    /// Diodes conducting on positive swings.
    pub forward: u8,
    /// Diodes conducting on negative swings.
    pub reverse: u8,
}

impl DiodeConfig {
    /// Most diodes allowed in one direction.
    pub const MAX_SERIES: u8 = 3;

    /// Create a configuration, clamping each count to `1..=3`.
    pub fn new(forward: u8, reverse: u8) -> Self {
        Self {
            forward: forward.clamp(1, Self::MAX_SERIES),
            reverse: reverse.clamp(1, Self::MAX_SERIES),
        }
    }

    /// One diode each way.
    pub const fn symmetric() -> Self {
        Self {
            forward: 1,
            reverse: 1,
        }
    }

    /// Whether both directions clip at the same level.
    pub fn is_symmetric(&self) -> bool {
        self.forward == self.reverse
    }
}

impl Default for DiodeConfig {
    fn default() -> Self {
        Self::symmetric()
    }
}

/// Options applied at `prepare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PedalOptions {
    /// Anti-aliasing filter quality of the oversampler.
    pub quality: OversamplingQuality,
    /// Clipping diode arrangement.
    pub diodes: DiodeConfig,
    /// Ramp drive, tone and level linearly across each block instead of
    /// stepping at the block start.
    pub ramp_parameters: bool,
}

impl PedalOptions {
    /// Set the oversampling quality.
    pub fn with_quality(mut self, quality: OversamplingQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the diode arrangement.
    pub fn with_diodes(mut self, diodes: DiodeConfig) -> Self {
        self.diodes = diodes;
        self
    }

    /// Enable or disable per-block parameter ramps.
    pub fn with_ramp_parameters(mut self, ramp: bool) -> Self {
        self.ramp_parameters = ramp;
        self
    }
}
