//! Level statistics.

use screamer_core::linear_to_db;

/// Root-mean-square level. Zero for an empty slice.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum / signal.len() as f64).sqrt() as f32
}

/// RMS level in dBFS, `-200.0` for silence.
pub fn rms_db(signal: &[f32]) -> f32 {
    linear_to_db(rms(signal))
}

/// Largest absolute sample.
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// Peak level in dBFS, `-200.0` for silence.
pub fn peak_db(signal: &[f32]) -> f32 {
    linear_to_db(peak(signal))
}

/// Peak-to-RMS ratio. A sine reads √2; hard clipping pushes it towards 1.
pub fn crest_factor(signal: &[f32]) -> f32 {
    let level = rms(signal);
    if level > 1e-10 { peak(signal) / level } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_statistics() {
        let sine: Vec<f32> = (0..4800)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / 48000.0).sin())
            .collect();
        assert!((rms(&sine) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        assert!((peak(&sine) - 1.0).abs() < 1e-3);
        assert!((crest_factor(&sine) - std::f32::consts::SQRT_2).abs() < 1e-2);
    }

    #[test]
    fn silence() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms_db(&[0.0; 8]), -200.0);
        assert_eq!(peak_db(&[]), -200.0);
        assert_eq!(crest_factor(&[0.0; 8]), 0.0);
    }

    #[test]
    fn peak_ignores_sign() {
        assert_eq!(peak(&[0.1, -0.9, 0.5]), 0.9);
    }
}
