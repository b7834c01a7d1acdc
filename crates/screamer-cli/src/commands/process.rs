//! Render a WAV file through the pedal.

use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use screamer_analysis::{peak_db, rms_db};
use screamer_config::{EngineConfig, Oversampling, default_config_path, factory_preset};
use screamer_io::{StereoSamples, WavSpec, read_wav_info, read_wav_stereo, write_wav, write_wav_stereo};
use screamer_pedal::TsProcessor;
use std::path::PathBuf;

/// Oversampling quality on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliQuality {
    Draft,
    Standard,
    High,
}

impl From<CliQuality> for Oversampling {
    fn from(q: CliQuality) -> Self {
        match q {
            CliQuality::Draft => Oversampling::Draft,
            CliQuality::Standard => Oversampling::Standard,
            CliQuality::High => Oversampling::High,
        }
    }
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Start from a factory preset instead of the config file
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    /// Engine configuration file (defaults to the user config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drive, 0-10
    #[arg(short, long)]
    drive: Option<f32>,

    /// Tone, 0-10
    #[arg(short, long)]
    tone: Option<f32>,

    /// Level, 0-10
    #[arg(short, long)]
    level: Option<f32>,

    /// Oversampling filter quality
    #[arg(short, long, value_enum)]
    quality: Option<CliQuality>,

    /// Processing block size
    #[arg(long)]
    block_size: Option<usize>,

    /// Shift the output back by the oversampling latency
    #[arg(long)]
    compensate_latency: bool,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

fn resolve_config(args: &ProcessArgs) -> anyhow::Result<EngineConfig> {
    let mut config = if let Some(name) = &args.preset {
        factory_preset(name)?.config()?
    } else if let Some(path) = &args.config {
        EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?
    } else {
        EngineConfig::load_or_default(default_config_path())?
    };

    if let Some(v) = args.drive {
        config.params.drive = v;
    }
    if let Some(v) = args.tone {
        config.params.tone = v;
    }
    if let Some(v) = args.level {
        config.params.level = v;
    }
    if let Some(q) = args.quality {
        config.engine.oversampling = q.into();
    }
    if let Some(n) = args.block_size {
        config.engine.max_block_size = n;
    }
    config.validate()?;
    Ok(config)
}

fn render(
    pedal: &mut TsProcessor,
    channels: &mut [Vec<f32>],
    block_size: usize,
    progress: &ProgressBar,
) -> anyhow::Result<()> {
    let len = channels.first().map_or(0, Vec::len);
    let mut start = 0;
    while start < len {
        let end = (start + block_size).min(len);
        let mut planes: Vec<&mut [f32]> =
            channels.iter_mut().map(|c| &mut c[start..end]).collect();
        pedal.process(&mut planes)?;
        progress.set_position(end as u64);
        start = end;
    }
    Ok(())
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(&args)?;

    let info = read_wav_info(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let (audio, spec) = read_wav_stereo(&args.input)?;
    let mono = info.channels == 1;
    config.engine.channels = if mono { 1 } else { 2 };

    tracing::info!(
        input = %args.input.display(),
        frames = audio.len(),
        sample_rate = spec.sample_rate,
        channels = config.engine.channels,
        "processing"
    );
    if info.channels > 2 {
        tracing::warn!(channels = info.channels, "only the first two channels are processed");
    }

    let mut pedal = config.build(f64::from(spec.sample_rate))?;
    let latency = if args.compensate_latency {
        pedal.latency_samples()
    } else {
        0
    };

    let mut channels: Vec<Vec<f32>> = if mono {
        vec![audio.left]
    } else {
        vec![audio.left, audio.right]
    };
    let frames = channels[0].len();
    for c in &mut channels {
        c.resize(frames + latency, 0.0);
    }

    let input_rms = rms_db(&channels[0]);
    let progress = ProgressBar::new((frames + latency) as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    render(&mut pedal, &mut channels, config.engine.max_block_size, &progress)?;
    progress.finish_and_clear();

    for c in &mut channels {
        c.drain(..latency);
    }
    if pedal.instability_count() > 0 {
        tracing::warn!(samples = pedal.instability_count(), "non-finite samples were silenced");
    }

    println!(
        "drive {:.1}  tone {:.1}  level {:.1}  ({} oversampling, {} samples latency)",
        pedal.current_drive(),
        pedal.current_tone(),
        pedal.current_level(),
        pedal.options().quality.name(),
        pedal.latency_samples()
    );
    println!(
        "  input  RMS {:.1} dB\n  output RMS {:.1} dB, peak {:.1} dB",
        input_rms,
        rms_db(&channels[0]),
        peak_db(&channels[0])
    );

    let out_spec = WavSpec {
        channels: if mono { 1 } else { 2 },
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    match channels.as_mut_slice() {
        [only] => write_wav(&args.output, only, out_spec)?,
        [left, right] => {
            let stereo = StereoSamples::new(std::mem::take(left), std::mem::take(right));
            write_wav_stereo(&args.output, &stereo, out_spec)?;
        }
        _ => bail!("unexpected channel layout"),
    }
    println!("wrote {}", args.output.display());
    Ok(())
}
