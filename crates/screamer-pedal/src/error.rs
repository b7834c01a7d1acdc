//! Configuration errors surfaced by the engine.
//!
//! Only precondition violations are reported here. Numeric instabilities
//! inside the stages are contained and counted, never returned.

use thiserror::Error;

/// Errors returned by [`TsProcessor`](crate::TsProcessor).
///
/// A rejected call leaves the caller's buffer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PedalError {
    /// `process` was called before `prepare`.
    #[error("processor used before prepare")]
    NotPrepared,

    /// More channels than the prepared channel count.
    #[error("{requested} channels requested, prepared for {prepared}")]
    TooManyChannels {
        /// Channels in the buffer.
        requested: usize,
        /// Channels given to `prepare`.
        prepared: usize,
    },

    /// More samples than the prepared maximum block size.
    #[error("block of {requested} samples exceeds prepared maximum of {max}")]
    BlockTooLarge {
        /// Samples per channel in the buffer.
        requested: usize,
        /// Maximum block size given to `prepare`.
        max: usize,
    },

    /// Planar channels of unequal length.
    #[error("channel {channel} holds {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Offending channel index.
        channel: usize,
        /// Length of channel 0.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Interleaved buffer that is not a whole number of frames, including a
    /// non-empty buffer declared with zero channels.
    #[error("interleaved buffer of {len} samples does not split into {channels}-channel frames")]
    PartialFrame {
        /// Samples in the buffer.
        len: usize,
        /// Declared channel count.
        channels: usize,
    },

    /// `prepare` was given an unusable audio configuration.
    #[error("invalid process spec: {0}")]
    InvalidSpec(&'static str),
}

/// Convenience result type for engine operations.
pub type Result<T> = core::result::Result<T, PedalError>;
