//! Property-based tests for the overdrive engine.
//!
//! Randomized knob positions, block sizes and input blocks check the
//! engine-level guarantees: bounded finite output, clamped parameters,
//! determinism across resets and block partitioning.

use proptest::prelude::*;
use screamer_pedal::{DiodeConfig, PedalOptions, ProcessSpec, TsProcessor};

const MAX_BLOCK: usize = 256;

fn engine(drive: f32, tone: f32, level: f32) -> TsProcessor {
    let mut pedal = TsProcessor::new();
    pedal
        .prepare(ProcessSpec::new(48000.0, MAX_BLOCK, 1))
        .expect("valid spec");
    pedal.set_drive(drive);
    pedal.set_tone(tone);
    pedal.set_level(level);
    pedal
}

fn render(pedal: &mut TsProcessor, input: &[f32], block: usize) -> Vec<f32> {
    let mut out = input.to_vec();
    for chunk in out.chunks_mut(block) {
        pedal.process(&mut [chunk]).expect("process");
    }
    out
}

fn sine(len: usize, cycles_per_sample: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * std::f32::consts::PI * cycles_per_sample * i as f32).sin())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any knob setting and any bounded input yields finite, bounded output.
    #[test]
    fn output_finite_and_bounded(
        drive in -5.0f32..15.0,
        tone in -5.0f32..15.0,
        level in -5.0f32..15.0,
        input in prop::collection::vec(-1.0f32..=1.0, 1..MAX_BLOCK),
    ) {
        let mut pedal = engine(drive, tone, level);
        for _ in 0..4 {
            let mut block = input.clone();
            pedal.process(&mut [&mut block]).expect("process");
            for &s in &block {
                prop_assert!(s.is_finite());
                prop_assert!(s.abs() < 16.0, "sample {} escaped", s);
            }
        }
        prop_assert_eq!(pedal.instability_count(), 0);
    }

    /// Setters clamp to the knob range whatever they are given.
    #[test]
    fn knobs_always_in_range(value in prop::num::f32::ANY) {
        let pedal = engine(2.0, 5.0, 7.0);
        pedal.set_drive(value);
        pedal.set_tone(value);
        pedal.set_level(value);
        for v in [pedal.current_drive(), pedal.current_tone(), pedal.current_level()] {
            prop_assert!((0.0..=10.0).contains(&v));
        }
    }

    /// Reset returns the engine to its just-prepared state.
    #[test]
    fn reset_is_idempotent(
        drive in 0.0f32..=10.0,
        tone in 0.0f32..=10.0,
        freq in 0.001f32..0.2,
    ) {
        let input = sine(MAX_BLOCK, freq, 0.5);
        let mut fresh = engine(drive, tone, 7.0);
        let expected = render(&mut fresh, &input, MAX_BLOCK);

        let mut used = engine(drive, tone, 7.0);
        render(&mut used, &sine(MAX_BLOCK, 0.37, 0.9), MAX_BLOCK);
        used.reset();
        used.reset();
        prop_assert_eq!(render(&mut used, &input, MAX_BLOCK), expected);
    }

    /// Splitting a stream into smaller blocks does not change the result.
    #[test]
    fn block_partition_invariant(
        drive in 0.0f32..=10.0,
        block in 1usize..=MAX_BLOCK,
        freq in 0.001f32..0.2,
    ) {
        let input = sine(4 * MAX_BLOCK, freq, 0.4);
        let whole = render(&mut engine(drive, 5.0, 7.0), &input, MAX_BLOCK);
        let split = render(&mut engine(drive, 5.0, 7.0), &input, block);
        for (a, b) in whole.iter().zip(&split) {
            prop_assert!((a - b).abs() <= 1e-6, "{} vs {}", a, b);
        }
    }

    /// Level is a pure output gain.
    #[test]
    fn level_scales_linearly(drive in 0.0f32..=10.0, tone in 0.0f32..=10.0) {
        let input = sine(MAX_BLOCK, 0.021, 0.5);
        let full = render(&mut engine(drive, tone, 10.0), &input, MAX_BLOCK);
        let half = render(&mut engine(drive, tone, 5.0), &input, MAX_BLOCK);
        for (f, h) in full.iter().zip(&half) {
            prop_assert_eq!(f * 0.5, *h);
        }
    }

    /// Silence in, silence out, for every diode arrangement.
    #[test]
    fn silence_stays_silent(
        forward in 1u8..=3,
        reverse in 1u8..=3,
        drive in 0.0f32..=10.0,
    ) {
        let options = PedalOptions::default().with_diodes(DiodeConfig::new(forward, reverse));
        let mut pedal = TsProcessor::with_options(options);
        pedal.prepare(ProcessSpec::new(44100.0, MAX_BLOCK, 2)).expect("valid spec");
        pedal.set_drive(drive);
        let mut l = vec![0.0f32; MAX_BLOCK];
        let mut r = vec![0.0f32; MAX_BLOCK];
        pedal.process(&mut [&mut l, &mut r]).expect("process");
        prop_assert!(l.iter().chain(&r).all(|&s| s == 0.0));
    }
}
