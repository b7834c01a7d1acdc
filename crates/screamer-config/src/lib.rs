//! Configuration for the screamer overdrive engine.
//!
//! - [`EngineConfig`] - TOML document with knob positions and engine options
//! - [`factory_presets`] - Read-only named settings built into the library
//! - [`paths`] - Platform location of the user configuration file
//!
//! # Example
//!
//! ```rust
//! use screamer_config::{EngineConfig, factory_preset};
//!
//! let config = factory_preset("edge")?.config()?;
//! let mut pedal = config.build(48000.0)?;
//! assert_eq!(pedal.current_drive(), 7.0);
//!
//! let mut block = vec![0.1f32; 256];
//! pedal.process(&mut [&mut block]).unwrap();
//! # Ok::<(), screamer_config::ConfigError>(())
//! ```

mod engine_config;
mod error;

/// Built-in presets.
pub mod factory_presets;

/// Platform configuration paths.
pub mod paths;

pub use engine_config::{
    DiodesConfig, EngineConfig, EngineSection, Oversampling, ParamsConfig,
};
pub use error::{ConfigError, Result};
pub use factory_presets::{FACTORY_PRESETS, FactoryPreset, factory_preset, factory_preset_names};
pub use paths::{default_config_path, user_config_dir};
