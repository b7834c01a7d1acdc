//! The engine configuration document.
//!
//! ```toml
//! [params]
//! drive = 2.0
//! tone = 5.0
//! level = 7.0
//!
//! [engine]
//! oversampling = "standard"   # draft | standard | high
//! ramp_parameters = false
//! max_block_size = 512
//! channels = 2
//! diodes = { forward = 1, reverse = 1 }
//! ```
//!
//! Every key is optional. Knob values outside `[0, 10]` are clamped when the
//! document is applied; structural values are checked by
//! [`EngineConfig::validate`].

use crate::error::{ConfigError, Result};
use screamer_pedal::params::{DRIVE, LEVEL, TONE};
use screamer_pedal::{
    DiodeConfig, MAX_CHANNELS, OversamplingQuality, ParamSnapshot, PedalOptions, ProcessSpec,
    TsProcessor,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knob section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamsConfig {
    /// Drive, 0–10.
    pub drive: f32,
    /// Tone, 0–10.
    pub tone: f32,
    /// Level, 0–10.
    pub level: f32,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            drive: DRIVE.default,
            tone: TONE.default,
            level: LEVEL.default,
        }
    }
}

impl ParamsConfig {
    /// Knob values clamped to their range.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            drive: DRIVE.clamp(self.drive),
            tone: TONE.clamp(self.tone),
            level: LEVEL.clamp(self.level),
        }
    }
}

/// Oversampling filter quality as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Oversampling {
    /// Short filters.
    Draft,
    /// Default trade-off.
    #[default]
    Standard,
    /// Steep filters.
    High,
}

impl From<Oversampling> for OversamplingQuality {
    fn from(value: Oversampling) -> Self {
        match value {
            Oversampling::Draft => OversamplingQuality::Draft,
            Oversampling::Standard => OversamplingQuality::Standard,
            Oversampling::High => OversamplingQuality::High,
        }
    }
}

impl From<OversamplingQuality> for Oversampling {
    fn from(value: OversamplingQuality) -> Self {
        match value {
            OversamplingQuality::Draft => Oversampling::Draft,
            OversamplingQuality::Standard => Oversampling::Standard,
            OversamplingQuality::High => Oversampling::High,
        }
    }
}

/// Series diode counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiodesConfig {
    /// Diodes conducting on positive swings.
    pub forward: u8,
    /// Diodes conducting on negative swings.
    pub reverse: u8,
}

impl Default for DiodesConfig {
    fn default() -> Self {
        Self {
            forward: 1,
            reverse: 1,
        }
    }
}

/// Engine section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Half-band filter quality.
    pub oversampling: Oversampling,
    /// Ramp knob changes across each block.
    pub ramp_parameters: bool,
    /// Largest block the host will pass.
    pub max_block_size: usize,
    /// Channel count, 1 or 2.
    pub channels: usize,
    /// Clipping diode arrangement.
    pub diodes: DiodesConfig,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            oversampling: Oversampling::default(),
            ramp_parameters: false,
            max_block_size: 512,
            channels: 2,
            diodes: DiodesConfig::default(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Initial knob positions.
    pub params: ParamsConfig,
    /// Engine construction options.
    pub engine: EngineSection,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// [`load`](Self::load), or defaults when `path` does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.validate()?;
        let text = self.to_toml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::write_file(parent, e))?;
        }
        std::fs::write(path, text).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::info!(path = %path.display(), "saved engine config");
        Ok(())
    }

    /// Check structural values. Knob values are clamped, never rejected,
    /// except NaN.
    pub fn validate(&self) -> Result<()> {
        let p = &self.params;
        if [p.drive, p.tone, p.level].iter().any(|v| v.is_nan()) {
            return Err(ConfigError::Invalid("knob values must be numbers".into()));
        }
        let e = &self.engine;
        if e.channels == 0 || e.channels > MAX_CHANNELS {
            return Err(ConfigError::Invalid(format!(
                "channels must be 1..={MAX_CHANNELS}, got {}",
                e.channels
            )));
        }
        if e.max_block_size == 0 {
            return Err(ConfigError::Invalid("max_block_size must be positive".into()));
        }
        let range = 1..=DiodeConfig::MAX_SERIES;
        if !range.contains(&e.diodes.forward) || !range.contains(&e.diodes.reverse) {
            return Err(ConfigError::Invalid(format!(
                "diode counts must be 1..={}, got {}/{}",
                DiodeConfig::MAX_SERIES,
                e.diodes.forward,
                e.diodes.reverse
            )));
        }
        Ok(())
    }

    /// Engine construction options.
    pub fn to_options(&self) -> PedalOptions {
        PedalOptions::default()
            .with_quality(self.engine.oversampling.into())
            .with_diodes(DiodeConfig::new(
                self.engine.diodes.forward,
                self.engine.diodes.reverse,
            ))
            .with_ramp_parameters(self.engine.ramp_parameters)
    }

    /// Processing spec at `sample_rate`.
    pub fn to_spec(&self, sample_rate: f64) -> ProcessSpec {
        ProcessSpec::new(sample_rate, self.engine.max_block_size, self.engine.channels)
    }

    /// Push the knob values into a running processor.
    pub fn apply_to(&self, processor: &TsProcessor) {
        processor.params().apply(self.params.snapshot());
    }

    /// Build and prepare a processor for `sample_rate`.
    pub fn build(&self, sample_rate: f64) -> Result<TsProcessor> {
        let mut processor = TsProcessor::with_options(self.to_options());
        self.apply_to(&processor);
        processor
            .prepare(self.to_spec(sample_rate))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(processor)
    }
}
