//! Criterion benchmarks for the overdrive engine
//!
//! Run with: cargo bench -p screamer-pedal
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use screamer_pedal::{
    ClippingStage, OversamplingQuality, PedalOptions, ProcessSpec, TsProcessor,
};
use screamer_core::Stage;

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn guitar_like(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let fundamental = (2.0 * std::f32::consts::PI * 110.0 * t).sin();
            let overtone = (2.0 * std::f32::consts::PI * 330.0 * t).sin() * 0.3;
            (fundamental + overtone) * 0.4
        })
        .collect()
}

fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("TsProcessor_stereo");

    for (label, ramp) in [("step", false), ("ramp", true)] {
        for &block_size in BLOCK_SIZES {
            let input = guitar_like(block_size);
            group.bench_with_input(
                BenchmarkId::new(label, block_size),
                &block_size,
                |b, _| {
                    let options = PedalOptions::default().with_ramp_parameters(ramp);
                    let mut pedal = TsProcessor::with_options(options);
                    pedal
                        .prepare(ProcessSpec::new(SAMPLE_RATE, block_size, 2))
                        .expect("valid spec");
                    pedal.set_drive(6.0);
                    let mut left = input.clone();
                    let mut right = input.clone();
                    b.iter(|| {
                        left.copy_from_slice(&input);
                        right.copy_from_slice(&input);
                        pedal
                            .process(black_box(&mut [&mut left[..], &mut right[..]]))
                            .expect("process");
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("TsProcessor_quality");
    let input = guitar_like(512);

    for quality in [
        OversamplingQuality::Draft,
        OversamplingQuality::Standard,
        OversamplingQuality::High,
    ] {
        group.bench_function(quality.name(), |b| {
            let mut pedal = TsProcessor::with_options(PedalOptions::default().with_quality(quality));
            pedal
                .prepare(ProcessSpec::new(SAMPLE_RATE, 512, 1))
                .expect("valid spec");
            let mut block = input.clone();
            b.iter(|| {
                block.copy_from_slice(&input);
                pedal.process(black_box(&mut [&mut block[..]])).expect("process");
            });
        });
    }
    group.finish();
}

fn bench_clipping_drive(c: &mut Criterion) {
    let mut group = c.benchmark_group("ClippingStage_drive");
    let input = guitar_like(1024);

    for drive in [0.0f32, 5.0, 10.0] {
        group.bench_with_input(BenchmarkId::from_parameter(drive), &drive, |b, &drive| {
            let mut stage = ClippingStage::default();
            stage.prepare(2.0 * SAMPLE_RATE as f32);
            stage.set_drive(drive);
            let mut block = input.clone();
            b.iter(|| {
                block.copy_from_slice(&input);
                stage.process_block(black_box(&mut block));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_processor, bench_quality, bench_clipping_drive);
criterion_main!(benches);
