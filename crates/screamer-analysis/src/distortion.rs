//! Harmonic distortion measurement.
//!
//! [`ThdAnalyzer`] reads harmonic amplitudes from a Blackman-Harris windowed
//! spectrum. Each harmonic is taken as the largest bin within
//! [`HARMONIC_GUARD_BINS`] of its nominal position, which is exact for
//! bin-centred tones and within the window's scalloping loss otherwise.

use crate::fft::{Fft, Window};
use crate::spectrum::HARMONIC_GUARD_BINS;
use screamer_core::linear_to_db;
use std::f32::consts::PI;

/// Result of a THD measurement.
#[derive(Debug, Clone)]
pub struct ThdResult {
    /// Fundamental frequency the measurement was made at (Hz).
    pub fundamental_freq: f32,
    /// Fundamental amplitude, peak, scaled to the input signal.
    pub fundamental_amplitude: f32,
    /// Harmonic-to-fundamental amplitude ratio.
    pub thd_ratio: f32,
    /// THD in dB.
    pub thd_db: f32,
    /// Everything-but-the-fundamental ratio.
    pub thd_n_ratio: f32,
    /// THD+N in dB.
    pub thd_n_db: f32,
    /// Harmonic amplitudes, fundamental first.
    pub harmonics: Vec<f32>,
}

impl ThdResult {
    /// Level of harmonic `order` (2 = second) relative to the fundamental,
    /// in dB. `-200.0` when it was not measured.
    pub fn harmonic_db(&self, order: usize) -> f32 {
        match (order, self.harmonics.first()) {
            (2.., Some(&fundamental)) if fundamental > 0.0 => self
                .harmonics
                .get(order - 1)
                .map_or(-200.0, |&h| linear_to_db(h / fundamental)),
            _ => -200.0,
        }
    }

    /// Ratio of even-harmonic to odd-harmonic energy (excluding the
    /// fundamental). Zero for perfectly symmetric clipping.
    pub fn even_odd_ratio(&self) -> f32 {
        let (mut even, mut odd) = (0.0f32, 0.0f32);
        for (i, h) in self.harmonics.iter().enumerate().skip(1) {
            if (i + 1) % 2 == 0 {
                even += h * h;
            } else {
                odd += h * h;
            }
        }
        if odd > 0.0 { (even / odd).sqrt() } else { 0.0 }
    }
}

/// THD analyzer.
#[derive(Debug, Clone)]
pub struct ThdAnalyzer {
    sample_rate: f32,
    fft_size: usize,
    window: Window,
    max_harmonics: usize,
}

impl ThdAnalyzer {
    /// Analyzer for `fft_size`-point frames at `sample_rate`.
    pub fn new(sample_rate: f32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
            window: Window::BlackmanHarris,
            max_harmonics: 10,
        }
    }

    /// Override the window.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Number of harmonics to read, fundamental included.
    pub fn with_max_harmonics(mut self, max: usize) -> Self {
        self.max_harmonics = max.max(1);
        self
    }

    /// Measure `signal` at a known fundamental.
    ///
    /// Uses the last `fft_size` samples so filter start-up transients are
    /// skipped when the signal is longer than one frame.
    pub fn analyze(&self, signal: &[f32], fundamental_freq: f32) -> ThdResult {
        let start = signal.len().saturating_sub(self.fft_size);
        let mut frame = signal[start..].to_vec();
        frame.resize(self.fft_size, 0.0);
        self.window.apply(&mut frame);

        let scale = 2.0 / self.window.coherent_gain(self.fft_size).max(1e-10);
        let magnitudes: Vec<f32> = Fft::new(self.fft_size)
            .forward(&frame)
            .iter()
            .map(|c| c.norm() * scale)
            .collect();

        let bin_width = self.sample_rate / self.fft_size as f32;
        let nyquist = self.sample_rate / 2.0;
        let harmonics: Vec<f32> = (1..=self.max_harmonics)
            .map(|h| fundamental_freq * h as f32)
            .take_while(|&f| f > 0.0 && f < nyquist)
            .map(|f| Self::harmonic_amplitude(&magnitudes, f / bin_width))
            .collect();

        let Some(&fundamental_amplitude) = harmonics.first() else {
            return ThdResult {
                fundamental_freq,
                fundamental_amplitude: 0.0,
                thd_ratio: 0.0,
                thd_db: -200.0,
                thd_n_ratio: 0.0,
                thd_n_db: -200.0,
                harmonics,
            };
        };
        let reference = fundamental_amplitude.max(1e-10);

        let harmonic_power: f32 = harmonics[1..].iter().map(|h| h * h).sum();
        let thd_ratio = harmonic_power.sqrt() / reference;

        // THD+N: all bins outside the fundamental's lobe, DC lobe excluded.
        let fundamental_bin = (fundamental_freq / bin_width).round() as usize;
        let lobe = fundamental_bin.saturating_sub(HARMONIC_GUARD_BINS)
            ..=fundamental_bin + HARMONIC_GUARD_BINS;
        let lobe_power: f32 = magnitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| lobe.contains(i))
            .map(|(_, m)| m * m)
            .sum();
        let rest_power: f32 = magnitudes
            .iter()
            .enumerate()
            .skip(HARMONIC_GUARD_BINS + 1)
            .filter(|(i, _)| !lobe.contains(i))
            .map(|(_, m)| m * m)
            .sum();
        let thd_n_ratio = (rest_power / lobe_power.max(1e-20)).sqrt();

        ThdResult {
            fundamental_freq,
            fundamental_amplitude,
            thd_ratio,
            thd_db: linear_to_db(thd_ratio),
            thd_n_ratio,
            thd_n_db: linear_to_db(thd_n_ratio),
            harmonics,
        }
    }

    fn harmonic_amplitude(magnitudes: &[f32], bin: f32) -> f32 {
        let centre = bin.round() as usize;
        let lo = centre.saturating_sub(HARMONIC_GUARD_BINS);
        let hi = (centre + HARMONIC_GUARD_BINS + 1).min(magnitudes.len());
        magnitudes
            .get(lo..hi)
            .map_or(0.0, |lobe| lobe.iter().copied().fold(0.0, f32::max))
    }
}

/// Sine of `amplitude` at `frequency` lasting `duration_secs`.
pub fn generate_test_tone(
    sample_rate: f32,
    frequency: f32,
    duration_secs: f32,
    amplitude: f32,
) -> Vec<f32> {
    let len = (duration_secs * sample_rate) as usize;
    let step = 2.0 * PI * frequency / sample_rate;
    (0..len)
        .map(|i| amplitude * (step * i as f32).sin())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_has_negligible_thd() {
        // Bin 171 of an 8192-point frame.
        let freq = 171.0 * 48000.0 / 8192.0;
        let signal = generate_test_tone(48000.0, freq, 0.5, 0.5);
        let result = ThdAnalyzer::new(48000.0, 8192).analyze(&signal, freq);
        assert!(result.thd_ratio < 0.001, "thd {}", result.thd_ratio);
        assert!(
            (result.fundamental_amplitude - 0.5).abs() < 0.01,
            "amplitude {}",
            result.fundamental_amplitude
        );
    }

    #[test]
    fn hard_clip_is_odd_only() {
        let signal: Vec<f32> = generate_test_tone(48000.0, 1000.0, 0.5, 1.0)
            .into_iter()
            .map(|s| s.clamp(-0.5, 0.5))
            .collect();
        let result = ThdAnalyzer::new(48000.0, 8192).analyze(&signal, 1000.0);
        assert!(result.thd_ratio > 0.1);
        assert!(result.harmonic_db(3) > -30.0);
        assert!(result.harmonic_db(2) < -60.0);
        assert!(result.even_odd_ratio() < 0.01);
    }

    #[test]
    fn offset_clip_produces_even_harmonics() {
        let signal: Vec<f32> = generate_test_tone(48000.0, 1000.0, 0.5, 1.0)
            .into_iter()
            .map(|s| s.clamp(-0.3, 0.7))
            .collect();
        let result = ThdAnalyzer::new(48000.0, 8192).analyze(&signal, 1000.0);
        assert!(result.harmonic_db(2) > -40.0);
        assert!(result.even_odd_ratio() > 0.1);
    }

    #[test]
    fn harmonics_stop_at_nyquist() {
        let signal = generate_test_tone(48000.0, 5000.0, 0.2, 0.5);
        let result = ThdAnalyzer::new(48000.0, 4096)
            .with_max_harmonics(10)
            .analyze(&signal, 5000.0);
        assert_eq!(result.harmonics.len(), 4);
        assert_eq!(result.harmonic_db(9), -200.0);
    }
}
