//! Test signal generation.

use clap::{Args, Subcommand};
use screamer_analysis::generate_test_tone;
use screamer_io::{WavSpec, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Sine {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "1000.0")]
        freq: f32,

        /// Peak amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        rate: u32,

        /// Output bit depth (16, 24, or 32)
        #[arg(long, default_value = "32")]
        bit_depth: u16,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Sine {
            output,
            freq,
            amplitude,
            duration,
            rate,
            bit_depth,
        } => {
            if !(freq > 0.0 && freq < rate as f32 / 2.0) {
                anyhow::bail!("frequency must be between 0 and {} Hz", rate / 2);
            }
            let samples = generate_test_tone(rate as f32, freq, duration, amplitude.clamp(0.0, 1.0));
            let spec = WavSpec {
                channels: 1,
                sample_rate: rate,
                bits_per_sample: bit_depth,
            };
            write_wav(&output, &samples, spec)?;
            println!(
                "wrote {} ({:.1} Hz, {} samples at {} Hz)",
                output.display(),
                freq,
                samples.len(),
                rate
            );
        }
    }
    Ok(())
}
