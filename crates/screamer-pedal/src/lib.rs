//! Screamer Pedal - Tube-Screamer-style overdrive engine
//!
//! A stereo-capable overdrive built from three stages:
//!
//! - [`ClippingStage`] - Wave digital filter model of the op-amp feedback
//!   clipper with an anti-parallel diode pair, run at twice the host rate
//! - [`ToneStage`] - Fixed 723 Hz lowpass blended with a tone-controlled
//!   treble shelf, followed by output DC coupling
//! - Level - Plain linear gain `level / 10`
//!
//! [`TsProcessor`] ties them together behind a prepare/reset/process
//! lifecycle. Knobs live in a lock-free [`PedalParams`] so a control thread
//! can move them while the audio thread renders.
//!
//! # Quick Start
//!
//! ```rust
//! use screamer_pedal::{PedalOptions, OversamplingQuality, ProcessSpec, TsProcessor};
//!
//! let options = PedalOptions::default().with_quality(OversamplingQuality::High);
//! let mut pedal = TsProcessor::with_options(options);
//! pedal.prepare(ProcessSpec::new(48000.0, 256, 1)).unwrap();
//!
//! let knobs = pedal.params();
//! knobs.set_drive(6.5);
//!
//! let mut block = [0.2f32; 256];
//! pedal.process(&mut [&mut block]).unwrap();
//! ```
//!
//! # Features
//!
//! - `std` (default) - Standard library support
//! - `tracing` - Emit `tracing` events on prepare and instability containment

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod clipping;
pub mod error;
pub mod options;
pub mod params;
pub mod processor;
pub mod spec;
pub mod tone;

pub use clipping::ClippingStage;
pub use error::{PedalError, Result};
pub use options::{DiodeConfig, OversamplingQuality, PedalOptions};
pub use params::{DESCRIPTORS, ParamSnapshot, PedalParams};
pub use processor::TsProcessor;
pub use spec::{MAX_CHANNELS, ProcessSpec};
pub use tone::ToneStage;
