//! Magnitude spectra and aliasing measurement.

use crate::fft::{Fft, Window};
use screamer_core::linear_to_db;

/// Bins excluded on each side of a harmonic. A bin-centred tone under
/// Blackman-Harris occupies exactly this many neighbours.
pub const HARMONIC_GUARD_BINS: usize = 3;

/// Windowed magnitude spectrum, `fft_size / 2 + 1` bins.
pub fn magnitude_spectrum(signal: &[f32], fft_size: usize, window: Window) -> Vec<f32> {
    let mut windowed = signal.to_vec();
    windowed.resize(fft_size, 0.0);
    window.apply(&mut windowed);
    Fft::new(fft_size)
        .forward(&windowed)
        .iter()
        .map(|c| c.norm())
        .collect()
}

/// Centre frequency of `bin` for a transform of `fft_size` points.
pub fn bin_frequency(bin: usize, sample_rate: f32, fft_size: usize) -> f32 {
    bin as f32 * sample_rate / fft_size as f32
}

/// Index of the strongest bin above DC.
pub fn peak_bin(magnitudes: &[f32]) -> Option<usize> {
    magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}

/// Energy that is neither a harmonic of `fundamental` nor DC, relative to
/// all energy below `max_freq`, in dB.
///
/// The whole of `signal` is analysed with a Blackman-Harris window, so its
/// length sets the resolution. For an exact reading choose `fundamental` on
/// a bin centre whose harmonics do not fold onto each other (an odd bin
/// index works for power-of-two lengths).
///
/// Returns `-200.0` for silence.
pub fn non_harmonic_energy_db(
    signal: &[f32],
    sample_rate: f32,
    fundamental: f32,
    max_freq: f32,
) -> f32 {
    let n = signal.len();
    if n == 0 || fundamental <= 0.0 {
        return -200.0;
    }
    let magnitudes = magnitude_spectrum(signal, n, Window::BlackmanHarris);
    let bin_width = sample_rate / n as f32;
    let fundamental_bin = fundamental / bin_width;
    let last = ((max_freq / bin_width) as usize).min(magnitudes.len());

    let mut total = 0.0f64;
    let mut residual = 0.0f64;
    for (bin, &mag) in magnitudes.iter().enumerate().take(last) {
        if bin <= HARMONIC_GUARD_BINS {
            continue;
        }
        let power = f64::from(mag) * f64::from(mag);
        total += power;
        let harmonic = (bin as f32 / fundamental_bin).round();
        let distance = (bin as f32 - harmonic * fundamental_bin).abs();
        if distance > HARMONIC_GUARD_BINS as f32 {
            residual += power;
        }
    }
    if total <= 0.0 {
        return -200.0;
    }
    linear_to_db((residual / total).sqrt() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(bin: f32, n: usize, amplitude: f32) -> Vec<f32> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * bin * i as f32 / n as f32).sin())
            .collect()
    }

    #[test]
    fn pure_tone_has_no_residual() {
        let n = 4096;
        let sr = 48000.0;
        let signal = tone(63.0, n, 0.5);
        let db = non_harmonic_energy_db(&signal, sr, bin_frequency(63, sr, n), 0.45 * sr);
        assert!(db < -100.0, "residual {db} dB");
    }

    #[test]
    fn inharmonic_tone_is_detected() {
        let n = 4096;
        let sr = 48000.0;
        let mut signal = tone(63.0, n, 0.5);
        for (s, spur) in signal.iter_mut().zip(tone(200.0, n, 0.005)) {
            *s += spur;
        }
        let db = non_harmonic_energy_db(&signal, sr, bin_frequency(63, sr, n), 0.45 * sr);
        assert!((db + 40.0).abs() < 1.0, "residual {db} dB");
    }

    #[test]
    fn silence_reads_floor() {
        assert_eq!(non_harmonic_energy_db(&[0.0; 256], 48000.0, 1000.0, 20000.0), -200.0);
        assert_eq!(non_harmonic_energy_db(&[], 48000.0, 1000.0, 20000.0), -200.0);
    }

    #[test]
    fn peak_bin_skips_dc() {
        let mut mags = vec![0.0f32; 16];
        mags[0] = 10.0;
        mags[5] = 2.0;
        assert_eq!(peak_bin(&mags), Some(5));
        assert_eq!(peak_bin(&[1.0]), None);
    }
}
