//! Level and distortion report for a WAV file.

use anyhow::{Context, anyhow};
use clap::Args;
use screamer_analysis::{
    ThdAnalyzer, Window, bin_frequency, crest_factor, magnitude_spectrum, peak_bin, peak_db,
    rms_db,
};
use screamer_io::read_wav;
use std::path::PathBuf;

const FFT_SIZE: usize = 8192;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// WAV file to measure (mixed to mono)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Fundamental in Hz; detected from the spectrum when omitted
    #[arg(short, long)]
    fundamental: Option<f32>,

    /// Harmonics to list, fundamental included
    #[arg(long, default_value = "8")]
    harmonics: usize,

    /// Analysis window: blackman-harris, hann or rect
    #[arg(long, default_value = "blackman-harris")]
    window: String,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let window = Window::from_name(&args.window)
        .ok_or_else(|| anyhow!("unknown window '{}'", args.window))?;
    let (samples, spec) =
        read_wav(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    println!("{}", args.input.display());
    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );
    println!("  RMS   {:.1} dB", rms_db(&samples));
    println!("  Peak  {:.1} dB", peak_db(&samples));
    println!("  Crest {:.2}", crest_factor(&samples));

    if samples.len() < FFT_SIZE {
        println!("  (too short for harmonic analysis, need {FFT_SIZE} samples)");
        return Ok(());
    }

    let fundamental = match args.fundamental {
        Some(f) => f,
        None => {
            let tail = &samples[samples.len() - FFT_SIZE..];
            let mags = magnitude_spectrum(tail, FFT_SIZE, window);
            let Some(bin) = peak_bin(&mags) else {
                println!("  (no tonal content)");
                return Ok(());
            };
            bin_frequency(bin, sample_rate, FFT_SIZE)
        }
    };

    let result = ThdAnalyzer::new(sample_rate, FFT_SIZE)
        .with_window(window)
        .with_max_harmonics(args.harmonics)
        .analyze(&samples, fundamental);

    println!("\nFundamental {:.1} Hz", fundamental);
    println!("  THD   {:.3}% ({:.1} dB)", result.thd_ratio * 100.0, result.thd_db);
    println!("  THD+N {:.3}% ({:.1} dB)", result.thd_n_ratio * 100.0, result.thd_n_db);
    println!("  even/odd {:.3}", result.even_odd_ratio());
    println!("\n  {:>3}  {:>9}  {:>8}", "H", "Hz", "dBc");
    for order in 2..=result.harmonics.len() {
        println!(
            "  {:>3}  {:>9.1}  {:>8.1}",
            order,
            fundamental * order as f32,
            result.harmonic_db(order)
        );
    }
    Ok(())
}
