//! Screamer Analysis - Measurements for nonlinear audio stages
//!
//! Offline tools used by the test suites and the `screamer analyze` command:
//!
//! - [`fft`] - Cached FFT plans and analysis windows
//! - [`spectrum`] - Magnitude spectra and aliasing measurement
//! - [`distortion`] - Harmonic distortion (THD, THD+N)
//! - [`dynamics`] - RMS, peak and crest factor
//!
//! ## Measuring a clipper
//!
//! ```rust
//! use screamer_analysis::{ThdAnalyzer, generate_test_tone};
//!
//! let tone = generate_test_tone(48000.0, 1000.0, 0.25, 0.5);
//! let clipped: Vec<f32> = tone.iter().map(|x| x.clamp(-0.3, 0.3)).collect();
//!
//! let result = ThdAnalyzer::new(48000.0, 8192).analyze(&clipped, 1000.0);
//! assert!(result.thd_ratio > 0.05);
//! ```

pub mod distortion;
pub mod dynamics;
pub mod fft;
pub mod spectrum;

pub use distortion::{ThdAnalyzer, ThdResult, generate_test_tone};
pub use dynamics::{crest_factor, peak, peak_db, rms, rms_db};
pub use fft::{Fft, Window};
pub use spectrum::{bin_frequency, magnitude_spectrum, non_harmonic_energy_db, peak_bin};
