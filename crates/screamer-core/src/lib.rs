//! Screamer Core - DSP primitives for the overdrive engine
//!
//! Building blocks for real-time processing with zero allocation on the
//! audio path once a processor has been prepared.
//!
//! # Core Abstractions
//!
//! - [`Stage`] - Mono, stateful processing stage with prepare/reset lifecycle
//!
//! ## Circuit Modeling
//!
//! - [`wdf`] - Wave digital filter leaves, series/parallel adaptors and the
//!   [`DiodePair`] nonlinear root
//!
//! ## Multirate
//!
//! - [`HalfbandDesign`] - Elliptic polyphase allpass half-band design
//! - [`Oversampler2x`] - Multichannel 2× up/down sampler with selectable
//!   [`OversamplingQuality`]
//!
//! ## Filters
//!
//! - [`OnePole`] - 6 dB/oct lowpass
//! - [`DcBlocker`] - First-order DC blocking highpass
//!
//! ## Parameters
//!
//! - [`ParamCell`] - Lock-free clamped value cell shared across threads
//! - [`LinearRamp`] - Per-block linear parameter ramp
//! - [`ParamDescriptor`] - Range, default and stable IDs for a knob
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! screamer-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod dc_blocker;
pub mod halfband;
pub mod math;
pub mod one_pole;
pub mod oversample;
pub mod param;
pub mod param_info;
pub mod stage;
pub mod wdf;

pub use dc_blocker::DcBlocker;
pub use halfband::{HalfbandDesign, HalfbandDownsampler, HalfbandUpsampler, MAX_HALFBAND_COEFS};
pub use math::{
    db_to_linear, finite_or_zero, flush_denormal, flush_denormal_f64, knob_fraction, linear_to_db,
};
pub use one_pole::OnePole;
pub use oversample::{OVERSAMPLE_FACTOR, Oversampler2x, OversamplingQuality};
pub use param::{LinearRamp, ParamCell};
pub use param_info::{ParamDescriptor, ParamId};
pub use stage::Stage;
pub use wdf::{DiodeModel, DiodePair, SolveStats};
