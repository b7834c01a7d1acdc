//! Real-input FFT with analysis windows.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// No windowing.
    Rectangular,
    /// Raised cosine.
    Hann,
    /// Four-term Blackman-Harris (-92 dB sidelobes). The spectrum of a
    /// bin-centred tone is confined to ±3 bins.
    #[default]
    BlackmanHarris,
}

impl Window {
    /// Periodic window value at index `i` of `n`.
    pub fn value(self, i: usize, n: usize) -> f32 {
        let x = 2.0 * PI * i as f32 / n as f32;
        match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5 - 0.5 * x.cos(),
            Window::BlackmanHarris => {
                0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                    - 0.01168 * (3.0 * x).cos()
            }
        }
    }

    /// Multiply `buffer` by the window in place.
    pub fn apply(self, buffer: &mut [f32]) {
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.value(i, n);
        }
    }

    /// Sum of window values, the amplitude scale of a windowed tone.
    pub fn coherent_gain(self, n: usize) -> f32 {
        (0..n).map(|i| self.value(i, n)).sum()
    }

    /// Parse `rect`, `hann` or `blackman-harris`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rect" | "rectangular" => Some(Window::Rectangular),
            "hann" => Some(Window::Hann),
            "blackman-harris" | "bh" => Some(Window::BlackmanHarris),
            _ => None,
        }
    }
}

/// Forward FFT with a cached plan.
pub struct Fft {
    plan: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Plan a transform of `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            plan: planner.plan_fft_forward(size),
            size,
        }
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform real input, zero-padded or truncated to `size`.
    ///
    /// Returns the `size / 2 + 1` bins from DC to Nyquist.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.plan.process(&mut buffer);
        buffer.truncate(self.size / 2 + 1);
        buffer
    }
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blackman_harris_endpoints() {
        let n = 64;
        assert!(Window::BlackmanHarris.value(0, n) < 1e-4);
        assert!((Window::BlackmanHarris.value(n / 2, n) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bin_centred_tone_lands_in_its_bin() {
        let n = 1024;
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 32.0 * i as f32 / n as f32).sin())
            .collect();
        let spectrum = Fft::new(n).forward(&signal);
        assert_eq!(spectrum.len(), n / 2 + 1);
        let (peak, _) = spectrum
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.norm()))
            .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        assert_eq!(peak, 32);
        assert!((spectrum[32].norm() - n as f32 / 2.0).abs() < 0.5);
    }

    #[test]
    fn window_names() {
        assert_eq!(Window::from_name("BH"), Some(Window::BlackmanHarris));
        assert_eq!(Window::from_name("hann"), Some(Window::Hann));
        assert_eq!(Window::from_name("kaiser"), None);
    }
}
