//! WAV file I/O for the screamer overdrive engine.
//!
//! Audio is exchanged as planar `f32` in `[-1, 1]`:
//!
//! - [`read_wav`] / [`write_wav`] - mono
//! - [`read_wav_stereo`] / [`write_wav_stereo`] - two planar channels
//! - [`read_wav_info`] - header only
//!
//! ```rust,no_run
//! use screamer_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (mut audio, spec) = read_wav_stereo("dry.wav")?;
//! for s in audio.left.iter_mut().chain(audio.right.iter_mut()) {
//!     *s *= 0.5;
//! }
//! write_wav_stereo("quiet.wav", &audio, spec)?;
//! # Ok::<(), screamer_io::Error>(())
//! ```

mod wav;

pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo,
    write_wav, write_wav_stereo,
};

/// Errors from audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV encode/decode error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Bit depth or channel layout the engine cannot use.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
