//! Passive tone network.
//!
//! The treble control blends a fixed 723 Hz lowpass (1 kΩ / 0.22 µF) with
//! the unfiltered signal:
//!
//! ```text
//! y = lp(x) + g · (x - lp(x)),   g = 10^((-20 + 2.8 · tone) / 20)
//! ```
//!
//! so tone 0 cuts everything above the corner by 20 dB and tone 10 lifts it
//! by 8 dB, with the bass left at unity. The output coupling capacitor
//! (1 µF into 10 kΩ) follows as a 15.9 Hz highpass.

use screamer_core::{DcBlocker, LinearRamp, OnePole, Stage, db_to_linear};

/// Tone network resistor (Ω).
const R_TONE: f32 = 1_000.0;
/// Tone network capacitor (F).
const C_TONE: f32 = 0.22e-6;
/// Output coupling corner, 1 / (2π · 10 kΩ · 1 µF).
const OUTPUT_COUPLING_HZ: f32 = 15.915;

/// Treble gain at tone 0, in dB.
const TREBLE_MIN_DB: f32 = -20.0;
/// Treble gain change per tone step, in dB.
const TREBLE_DB_PER_STEP: f32 = 2.8;

const DEFAULT_RATE: f32 = 44_100.0;

/// Per-channel tone filter.
#[derive(Debug, Clone)]
pub struct ToneStage {
    lowpass: OnePole,
    coupling: DcBlocker,
    tone: f32,
    treble_gain: f32,
}

impl ToneStage {
    /// Create a stage at tone 5.
    pub fn new() -> Self {
        let mut stage = Self {
            lowpass: OnePole::from_rc(DEFAULT_RATE, R_TONE, C_TONE),
            coupling: DcBlocker::with_cutoff(DEFAULT_RATE, OUTPUT_COUPLING_HZ),
            tone: 0.0,
            treble_gain: 1.0,
        };
        stage.set_tone(5.0);
        stage
    }

    /// Linear treble gain for a tone setting.
    ///
    /// ```rust
    /// use screamer_pedal::ToneStage;
    ///
    /// assert!((ToneStage::treble_gain_for(0.0) - 0.1).abs() < 1e-6);
    /// assert!(ToneStage::treble_gain_for(10.0) > 2.5);
    /// ```
    pub fn treble_gain_for(tone: f32) -> f32 {
        db_to_linear(TREBLE_MIN_DB + TREBLE_DB_PER_STEP * tone.clamp(0.0, 10.0))
    }

    /// Set tone, 0–10 (clamped). 0 is darkest, 10 brightest.
    pub fn set_tone(&mut self, tone: f32) {
        self.tone = tone.clamp(0.0, 10.0);
        self.treble_gain = Self::treble_gain_for(self.tone);
    }

    /// Cached tone value.
    pub fn tone(&self) -> f32 {
        self.tone
    }

    /// Current linear treble gain.
    pub fn treble_gain(&self) -> f32 {
        self.treble_gain
    }

    #[inline]
    fn filter(&mut self, x: f32, treble_gain: f32) -> f32 {
        let lp = self.lowpass.process(x);
        self.coupling.process(lp + treble_gain * (x - lp))
    }

    /// Filter a block while the treble gain follows `ramp`.
    ///
    /// The stage's cached tone is left unchanged; the final gain is the
    /// ramp's target.
    pub fn process_block_ramped(&mut self, buffer: &mut [f32], ramp: &mut LinearRamp) {
        for sample in buffer.iter_mut() {
            let g = ramp.advance();
            *sample = self.filter(*sample, g);
        }
        self.treble_gain = ramp.get();
    }
}

impl Default for ToneStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for ToneStage {
    fn prepare(&mut self, sample_rate: f32) {
        self.lowpass.set_sample_rate(sample_rate);
        self.coupling.set_sample_rate(sample_rate);
        self.reset();
    }

    fn reset(&mut self) {
        self.lowpass.reset();
        self.coupling.reset();
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.filter(input, self.treble_gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    const FS: f32 = 48_000.0;

    fn gain_at(tone: f32, freq: f32) -> f32 {
        let mut stage = ToneStage::new();
        stage.prepare(FS);
        stage.set_tone(tone);
        let mut block: Vec<f32> = (0..9600)
            .map(|i| libm::sinf(2.0 * PI * freq * i as f32 / FS))
            .collect();
        stage.process_block(&mut block);
        block[4800..].iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn bass_is_unaffected_by_tone() {
        let dark = gain_at(0.0, 100.0);
        let bright = gain_at(10.0, 100.0);
        assert!((dark - bright).abs() < 0.25, "dark {dark} bright {bright}");
    }

    #[test]
    fn treble_tracks_tone() {
        let gains: Vec<f32> = [0.0, 2.5, 5.0, 7.5, 10.0]
            .iter()
            .map(|&t| gain_at(t, 6000.0))
            .collect();
        assert!(gains.windows(2).all(|w| w[0] < w[1]), "{gains:?}");
        assert!(gains[0] < 0.2);
        assert!(gains[4] > 2.0);
    }

    #[test]
    fn removes_dc() {
        let mut stage = ToneStage::new();
        stage.prepare(FS);
        let mut block = vec![0.5f32; 48_000];
        stage.process_block(&mut block);
        assert!(block[47_999].abs() < 1e-3);
    }

    #[test]
    fn block_split_is_seamless() {
        let input: Vec<f32> = (0..512).map(|i| libm::sinf(i as f32 * 0.05)).collect();
        let mut whole = ToneStage::new();
        whole.prepare(FS);
        let mut a = input.clone();
        whole.process_block(&mut a);

        let mut split = ToneStage::new();
        split.prepare(FS);
        let mut b = input;
        for chunk in b.chunks_mut(128) {
            split.process_block(chunk);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn ramp_ends_on_target_gain() {
        let mut stage = ToneStage::new();
        stage.prepare(FS);
        let mut ramp = LinearRamp::new(stage.treble_gain());
        let target = ToneStage::treble_gain_for(9.0);
        ramp.ramp_to(target, 64);
        let mut block = [0.1f32; 64];
        stage.process_block_ramped(&mut block, &mut ramp);
        assert_eq!(stage.treble_gain(), target);
    }

    #[test]
    fn tone_is_clamped() {
        let mut stage = ToneStage::new();
        stage.set_tone(-3.0);
        assert_eq!(stage.tone(), 0.0);
        stage.set_tone(30.0);
        assert_eq!(stage.tone(), 10.0);
    }
}
