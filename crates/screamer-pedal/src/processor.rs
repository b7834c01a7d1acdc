//! The overdrive orchestrator.
//!
//! [`TsProcessor`] owns one [`ChannelState`] per channel and a shared
//! [`Oversampler2x`]. Per block:
//!
//! ```text
//! buffer ─▶ up 2× ─▶ ClippingStage (per sample, 2× rate) ─▶ down 2×
//!        ─▶ ToneStage (base rate) ─▶ × level/10 ─▶ buffer
//! ```
//!
//! Knob values are read once at block start from the shared
//! [`PedalParams`]. With ramping disabled (the default) every stage steps to
//! the new values at the block boundary; with ramping enabled drive, treble
//! gain and level move linearly from the previous block's values and land on
//! the new ones at the block's last sample.
//!
//! # Real-time contract
//!
//! - [`prepare`](TsProcessor::prepare) is the only call that allocates.
//! - [`process`](TsProcessor::process) and
//!   [`process_interleaved`](TsProcessor::process_interleaved) do O(n) work
//!   with bounded solver iterations, no locks and no allocation.
//! - Non-finite samples never reach the output: they are replaced with
//!   silence and the offending stage is reset at the next block start.

#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

use crate::clipping::ClippingStage;
use crate::error::{PedalError, Result};
use crate::options::PedalOptions;
use crate::params::{ParamSnapshot, PedalParams};
use crate::spec::{MAX_CHANNELS, ProcessSpec};
use crate::tone::ToneStage;
use screamer_core::{
    LinearRamp, OVERSAMPLE_FACTOR, Oversampler2x, Stage, finite_or_zero, knob_fraction,
};

/// Stages owned by one channel. Channels never share state.
#[derive(Debug, Clone)]
struct ChannelState {
    clipping: ClippingStage,
    tone: ToneStage,
}

impl ChannelState {
    fn new(options: &PedalOptions) -> Self {
        Self {
            clipping: ClippingStage::new(options.diodes),
            tone: ToneStage::new(),
        }
    }

    fn prepare(&mut self, spec: &ProcessSpec, params: ParamSnapshot) {
        self.clipping.prepare(spec.oversampled_rate() as f32);
        self.clipping.set_drive(params.drive);
        self.tone.prepare(spec.sample_rate as f32);
        self.tone.set_tone(params.tone);
    }

    fn reset(&mut self) {
        self.clipping.reset();
        self.tone.reset();
    }
}

/// Per-block parameter endpoints.
#[derive(Debug, Clone, Copy)]
struct BlockParams {
    from: ParamSnapshot,
    to: ParamSnapshot,
}

/// Overdrive engine: oversampled diode clipper, tone stage and level.
///
/// # Example
///
/// ```rust
/// use screamer_pedal::{ProcessSpec, TsProcessor};
///
/// let mut pedal = TsProcessor::new();
/// pedal.prepare(ProcessSpec::new(44100.0, 512, 2)).unwrap();
/// pedal.set_drive(2.0);
/// pedal.set_tone(5.0);
/// pedal.set_level(7.0);
///
/// let mut left = vec![0.1f32; 512];
/// let mut right = vec![-0.1f32; 512];
/// pedal.process(&mut [&mut left, &mut right]).unwrap();
/// assert!(left.iter().chain(&right).all(|s| s.is_finite()));
/// ```
#[derive(Debug)]
pub struct TsProcessor {
    params: Arc<PedalParams>,
    options: PedalOptions,
    spec: Option<ProcessSpec>,
    channels: Vec<ChannelState>,
    oversampler: Oversampler2x,
    scratch: Vec<f32>,
    applied: ParamSnapshot,
    pending_reset: bool,
    instabilities: u64,
    unconverged: u64,
}

impl TsProcessor {
    /// Create an unprepared processor with default options and knobs
    /// (drive 2, tone 5, level 7).
    pub fn new() -> Self {
        Self::with_options(PedalOptions::default())
    }

    /// Create an unprepared processor with explicit options.
    pub fn with_options(options: PedalOptions) -> Self {
        Self::with_params(options, Arc::new(PedalParams::default()))
    }

    /// Create a processor that reads its knobs from an existing handle.
    pub fn with_params(options: PedalOptions, params: Arc<PedalParams>) -> Self {
        let applied = params.snapshot();
        Self {
            params,
            options,
            spec: None,
            channels: Vec::new(),
            oversampler: Oversampler2x::new(0, options.quality),
            scratch: Vec::new(),
            applied,
            pending_reset: false,
            instabilities: 0,
            unconverged: 0,
        }
    }

    /// Size all state for `spec`. Not real-time safe.
    ///
    /// Must be called before processing and again whenever the audio
    /// configuration or [`options`](Self::set_options) change.
    pub fn prepare(&mut self, spec: ProcessSpec) -> Result<()> {
        spec.validate()?;
        let params = self.params.snapshot();

        self.oversampler = Oversampler2x::new(spec.num_channels, self.options.quality);
        self.oversampler.init_processing(spec.max_block_size);

        self.channels = (0..spec.num_channels)
            .map(|_| ChannelState::new(&self.options))
            .collect();
        for channel in &mut self.channels {
            channel.prepare(&spec, params);
        }

        self.scratch.clear();
        self.scratch.resize(spec.max_block_size * MAX_CHANNELS, 0.0);
        self.applied = params;
        self.pending_reset = false;
        self.spec = Some(spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            max_block_size = spec.max_block_size,
            channels = spec.num_channels,
            quality = self.options.quality.name(),
            latency = self.latency_samples(),
            "prepared overdrive engine"
        );
        Ok(())
    }

    /// Clear all filter and reactive state without resizing. Real-time safe.
    pub fn reset(&mut self) {
        self.oversampler.reset();
        for channel in &mut self.channels {
            channel.reset();
        }
        self.pending_reset = false;
        self.applied = self.params.snapshot();
    }

    /// Set drive, clamped to `[0, 10]`. Effective from the next block.
    pub fn set_drive(&self, value: f32) {
        self.params.set_drive(value);
    }

    /// Set tone, clamped to `[0, 10]`. Effective from the next block.
    pub fn set_tone(&self, value: f32) {
        self.params.set_tone(value);
    }

    /// Set level, clamped to `[0, 10]`. Effective from the next block.
    pub fn set_level(&self, value: f32) {
        self.params.set_level(value);
    }

    /// Last stored drive.
    pub fn current_drive(&self) -> f32 {
        self.params.drive()
    }

    /// Last stored tone.
    pub fn current_tone(&self) -> f32 {
        self.params.tone()
    }

    /// Last stored level.
    pub fn current_level(&self) -> f32 {
        self.params.level()
    }

    /// Shared knob handle for control threads.
    pub fn params(&self) -> Arc<PedalParams> {
        Arc::clone(&self.params)
    }

    /// Active options.
    pub fn options(&self) -> PedalOptions {
        self.options
    }

    /// Replace the options. Takes effect at the next [`prepare`](Self::prepare).
    pub fn set_options(&mut self, options: PedalOptions) {
        self.options = options;
    }

    /// Spec from the last successful `prepare`.
    pub fn spec(&self) -> Option<ProcessSpec> {
        self.spec
    }

    /// Whether `prepare` has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    /// Latency introduced by the oversampling filters, in base-rate samples.
    pub fn latency_samples(&self) -> usize {
        self.oversampler.latency_samples()
    }

    /// Non-finite samples replaced with silence since construction.
    pub fn instability_count(&self) -> u64 {
        self.instabilities
    }

    /// Diode solves that hit the iteration cap since construction.
    pub fn unconverged_count(&self) -> u64 {
        self.unconverged
    }

    /// Process planar channels in place.
    ///
    /// Every channel must have the same length, at most the prepared block
    /// size; at most the prepared number of channels may be passed.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) -> Result<()> {
        let spec = self.spec.ok_or(PedalError::NotPrepared)?;
        if channels.len() > spec.num_channels {
            return Err(PedalError::TooManyChannels {
                requested: channels.len(),
                prepared: spec.num_channels,
            });
        }
        let Some(first) = channels.first() else {
            return Ok(());
        };
        let n = first.len();
        if let Some((channel, buf)) = channels.iter().enumerate().find(|(_, c)| c.len() != n) {
            return Err(PedalError::ChannelLengthMismatch {
                channel,
                expected: n,
                actual: buf.len(),
            });
        }
        if n > spec.max_block_size {
            return Err(PedalError::BlockTooLarge {
                requested: n,
                max: spec.max_block_size,
            });
        }
        if n == 0 {
            return Ok(());
        }

        self.run_block(channels, n);
        Ok(())
    }

    /// Process an interleaved buffer of `num_channels` channels in place.
    pub fn process_interleaved(&mut self, data: &mut [f32], num_channels: usize) -> Result<()> {
        let spec = self.spec.ok_or(PedalError::NotPrepared)?;
        if num_channels > spec.num_channels {
            return Err(PedalError::TooManyChannels {
                requested: num_channels,
                prepared: spec.num_channels,
            });
        }
        if data.is_empty() {
            return Ok(());
        }
        if num_channels == 0 || data.len() % num_channels != 0 {
            return Err(PedalError::PartialFrame {
                len: data.len(),
                channels: num_channels,
            });
        }
        let n = data.len() / num_channels;
        if n > spec.max_block_size {
            return Err(PedalError::BlockTooLarge {
                requested: n,
                max: spec.max_block_size,
            });
        }

        let mut scratch = core::mem::take(&mut self.scratch);
        {
            let (left, right) = scratch.split_at_mut(spec.max_block_size);
            let mut planes: [&mut [f32]; MAX_CHANNELS] = [&mut left[..n], &mut right[..n]];
            for (frame, samples) in data.chunks_exact(num_channels).enumerate() {
                for (ch, &s) in samples.iter().enumerate() {
                    planes[ch][frame] = s;
                }
            }
            self.run_block(&mut planes[..num_channels], n);
            for (frame, samples) in data.chunks_exact_mut(num_channels).enumerate() {
                for (ch, s) in samples.iter_mut().enumerate() {
                    *s = planes[ch][frame];
                }
            }
        }
        self.scratch = scratch;
        Ok(())
    }

    /// One validated block: `channels` are non-empty and exactly `n` long.
    fn run_block(&mut self, channels: &mut [&mut [f32]], n: usize) {
        self.heal();

        let block = BlockParams {
            from: self.applied,
            to: self.params.snapshot(),
        };
        let ramp = self.options.ramp_parameters;

        for (index, buf) in channels.iter_mut().enumerate() {
            let buf = &mut buf[..n];
            for s in buf.iter_mut() {
                *s = finite_or_zero(*s);
            }

            let state = &mut self.channels[index];

            // Clipping at the oversampled rate.
            let high = self.oversampler.process_samples_up(index, buf);
            if ramp {
                let mut drive = LinearRamp::new(block.from.drive);
                drive.ramp_to(block.to.drive, n * OVERSAMPLE_FACTOR);
                for s in high.iter_mut() {
                    state.clipping.set_drive(drive.advance());
                    *s = state.clipping.process_sample(*s);
                }
            } else {
                state.clipping.set_drive(block.to.drive);
                state.clipping.process_block(high);
            }
            self.oversampler.process_samples_down(index, buf);

            // Tone at the base rate.
            if ramp {
                let mut gain = LinearRamp::new(ToneStage::treble_gain_for(block.from.tone));
                gain.ramp_to(ToneStage::treble_gain_for(block.to.tone), n);
                state.tone.process_block_ramped(buf, &mut gain);
                state.tone.set_tone(block.to.tone);
            } else {
                state.tone.set_tone(block.to.tone);
                state.tone.process_block(buf);
            }

            // Level: plain linear gain level / 10.
            if ramp {
                let mut level = LinearRamp::new(knob_fraction(block.from.level));
                level.ramp_to(knob_fraction(block.to.level), n);
                for s in buf.iter_mut() {
                    *s *= level.advance();
                }
            } else {
                let gain = knob_fraction(block.to.level);
                for s in buf.iter_mut() {
                    *s *= gain;
                }
            }

            let mut caught = 0u32;
            for s in buf.iter_mut() {
                if !s.is_finite() {
                    *s = 0.0;
                    caught += 1;
                }
            }
            if caught > 0 {
                self.pending_reset = true;
            }
            let contained = state.clipping.take_instabilities().saturating_add(caught);
            self.unconverged += u64::from(state.clipping.take_unconverged());
            if contained > 0 {
                self.instabilities += u64::from(contained);
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    channel = index,
                    samples = contained,
                    "replaced non-finite samples with silence"
                );
            }
        }

        self.applied = block.to;
    }

    /// Reset stages that flagged themselves since the last block.
    fn heal(&mut self) {
        if self.pending_reset {
            self.oversampler.reset();
            for channel in &mut self.channels {
                channel.reset();
            }
            self.pending_reset = false;
            return;
        }
        for channel in &mut self.channels {
            if channel.clipping.needs_reset() {
                channel.clipping.reset();
            }
        }
    }
}

impl Default for TsProcessor {
    fn default() -> Self {
        Self::new()
    }
}
