//! Diode clipping stage.
//!
//! Models the non-inverting op-amp stage with an anti-parallel diode pair in
//! its feedback loop as a pair of wave digital filter trees:
//!
//! ```text
//!   input branch (to ground)          feedback branch (out to -in)
//!
//!   x ─[ 4.7k ]─┤├─ gnd                ┌─[ 51k + 500k·drive ]─┐
//!              0.047µ                  ├──────┤├──────────────┤
//!                                      │     51p              │
//!                                      └──────▶|◀|────────────┘
//! ```
//!
//! The op-amp holds its inverting input at `x`, so the input branch is a
//! series tree driven by `x` and terminated by a short circuit. Its loop
//! current is injected into the feedback branch, a parallel tree with the
//! diode pair at the root. The stage output is `x + v_f`, where `v_f` is the
//! voltage across the feedback network.
//!
//! All circuit math runs in `f64`; only the stage boundary is `f32`.

use crate::options::DiodeConfig;
use screamer_core::wdf::{
    Capacitor, DiodeModel, DiodePair, Parallel, ResistiveCurrentSource, ResistiveVoltageSource,
    Series, ShortCircuit, WdfPort, wave_voltage,
};
use screamer_core::{Stage, knob_fraction};

/// Input resistor (Ω).
const R_IN: f64 = 4_700.0;
/// Input coupling capacitor (F).
const C_IN: f64 = 0.047e-6;
/// Fixed feedback resistor (Ω).
const R_FEEDBACK: f64 = 51_000.0;
/// Drive potentiometer (Ω), linear taper.
const R_DRIVE_POT: f64 = 500_000.0;
/// Feedback capacitor (F).
const C_FEEDBACK: f64 = 51e-12;

/// Rate used until `prepare` is called.
const DEFAULT_RATE: f32 = 88_200.0;

type InputTree = Series<ResistiveVoltageSource, Capacitor>;
type FeedbackTree = Parallel<ResistiveCurrentSource, Capacitor>;

/// Per-channel diode clipper.
///
/// # Example
///
/// ```rust
/// use screamer_core::Stage;
/// use screamer_pedal::ClippingStage;
///
/// let mut stage = ClippingStage::default();
/// stage.prepare(88200.0);
/// stage.set_drive(6.0);
/// let y = stage.process_sample(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ClippingStage {
    input: InputTree,
    feedback: FeedbackTree,
    diodes: DiodePair,
    drive: f32,
    sample_rate: f32,
    needs_reset: bool,
    instabilities: u32,
    unconverged: u32,
}

impl ClippingStage {
    /// Create a stage with the given diode arrangement.
    pub fn new(diodes: DiodeConfig) -> Self {
        let rate = f64::from(DEFAULT_RATE);
        let mut stage = Self {
            input: Series::new(ResistiveVoltageSource::new(R_IN), Capacitor::new(C_IN, rate)),
            feedback: Parallel::new(
                ResistiveCurrentSource::new(R_FEEDBACK),
                Capacitor::new(C_FEEDBACK, rate),
            ),
            diodes: DiodePair::new(DiodeModel::silicon(), diodes.forward, diodes.reverse),
            drive: 0.0,
            sample_rate: DEFAULT_RATE,
            needs_reset: false,
            instabilities: 0,
            unconverged: 0,
        };
        stage.set_drive(0.0);
        stage
    }

    /// Set drive, 0–10 (clamped). Higher drive raises the feedback
    /// resistance and with it the pre-clip gain.
    #[inline]
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(0.0, 10.0);
        let r_f = R_FEEDBACK + R_DRIVE_POT * f64::from(knob_fraction(self.drive));
        self.feedback.left_mut().set_resistance(r_f);
    }

    /// Cached drive value.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Rate the stage was prepared for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Small-signal gain `1 + R_f / R_in` well above the input corner.
    pub fn small_signal_gain(&self) -> f32 {
        (1.0 + self.feedback.left().port_resistance() / R_IN) as f32
    }

    /// Whether a non-finite value was caught since the last reset.
    pub fn needs_reset(&self) -> bool {
        self.needs_reset
    }

    /// Return and clear the count of contained non-finite samples.
    pub fn take_instabilities(&mut self) -> u32 {
        core::mem::take(&mut self.instabilities)
    }

    /// Return and clear the count of solves that hit the iteration cap.
    pub fn take_unconverged(&mut self) -> u32 {
        core::mem::take(&mut self.unconverged)
    }

    #[cold]
    fn contain(&mut self) -> f32 {
        self.needs_reset = true;
        self.instabilities = self.instabilities.saturating_add(1);
        0.0
    }
}

impl Default for ClippingStage {
    fn default() -> Self {
        Self::new(DiodeConfig::default())
    }
}

impl Stage for ClippingStage {
    fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let rate = f64::from(sample_rate);
        self.input.right_mut().set_sample_rate(rate);
        self.feedback.right_mut().set_sample_rate(rate);
        self.reset();
    }

    fn reset(&mut self) {
        self.input.reset();
        self.feedback.reset();
        self.diodes.reset();
        self.needs_reset = false;
    }

    fn process_sample(&mut self, input: f32) -> f32 {
        if !input.is_finite() {
            return self.contain();
        }
        let x = f64::from(input);

        // Input branch: loop current through R_in and C_in.
        self.input.left_mut().set_voltage(x);
        let up = self.input.reflected();
        self.input.incident(ShortCircuit.reflect(up));
        let i_in = -up / self.input.port_resistance();

        // Feedback branch: the same current develops v_f across the diodes.
        self.feedback.left_mut().set_current(i_in);
        let a = self.feedback.reflected();
        let rp = self.feedback.port_resistance();
        let b = self.diodes.reflect(a, rp);
        self.feedback.incident(b);
        if !self.diodes.stats().converged {
            self.unconverged = self.unconverged.saturating_add(1);
        }

        let y = (x + wave_voltage(a, b)) as f32;
        if y.is_finite() { y } else { self.contain() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    const FS: f32 = 88_200.0;

    fn run_sine(stage: &mut ClippingStage, amp: f32, freq: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| stage.process_sample(amp * libm::sinf(2.0 * PI * freq * i as f32 / FS)))
            .collect()
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn silence_in_silence_out() {
        let mut stage = ClippingStage::default();
        stage.prepare(FS);
        for _ in 0..256 {
            assert_eq!(stage.process_sample(0.0), 0.0);
        }
    }

    #[test]
    fn small_signal_gain_matches_circuit() {
        let mut stage = ClippingStage::default();
        stage.prepare(FS);
        stage.set_drive(2.0);
        let out = run_sine(&mut stage, 0.001, 1000.0, 4000);
        let gain = peak(&out[2000..]) / 0.001;
        // 1 + 151k / 4.7k is ~33 at high frequency; the input corner at
        // ~720 Hz pulls 1 kHz down to ~26.
        assert!((gain - 26.4).abs() < 1.5, "gain {gain}");
    }

    #[test]
    fn output_in_phase_with_input() {
        let mut stage = ClippingStage::default();
        stage.prepare(FS);
        let out = run_sine(&mut stage, 0.001, 1000.0, 4000);
        let input: Vec<f32> = (0..4000)
            .map(|i| libm::sinf(2.0 * PI * 1000.0 * i as f32 / FS))
            .collect();
        let corr: f32 = out[2000..].iter().zip(&input[2000..]).map(|(a, b)| a * b).sum();
        assert!(corr > 0.0);
    }

    #[test]
    fn diodes_limit_feedback_voltage() {
        let mut stage = ClippingStage::default();
        stage.prepare(FS);
        stage.set_drive(10.0);
        let out = run_sine(&mut stage, 0.5, 1000.0, 4000);
        // Linear gain would reach ~60; the diodes hold v_f under ~0.7 V.
        assert!(peak(&out[2000..]) < 0.5 + 0.8, "peak {}", peak(&out[2000..]));
    }

    #[test]
    fn drive_raises_gain() {
        let mut gains = Vec::new();
        for drive in [0.0, 2.5, 5.0, 7.5, 10.0] {
            let mut stage = ClippingStage::default();
            stage.prepare(FS);
            stage.set_drive(drive);
            gains.push(stage.small_signal_gain());
            let out = run_sine(&mut stage, 0.0005, 2000.0, 4000);
            gains.push(peak(&out[2000..]));
        }
        let static_gains: Vec<f32> = gains.iter().step_by(2).copied().collect();
        let measured: Vec<f32> = gains.iter().skip(1).step_by(2).copied().collect();
        assert!(static_gains.windows(2).all(|w| w[0] < w[1]), "{static_gains:?}");
        assert!(measured.windows(2).all(|w| w[0] < w[1]), "{measured:?}");
    }

    #[test]
    fn drive_is_clamped() {
        let mut stage = ClippingStage::default();
        stage.set_drive(42.0);
        assert_eq!(stage.drive(), 10.0);
        stage.set_drive(-1.0);
        assert_eq!(stage.drive(), 0.0);
    }

    #[test]
    fn non_finite_input_is_contained() {
        let mut stage = ClippingStage::default();
        stage.prepare(FS);
        assert_eq!(stage.process_sample(f32::NAN), 0.0);
        assert_eq!(stage.process_sample(f32::INFINITY), 0.0);
        assert!(stage.needs_reset());
        assert_eq!(stage.take_instabilities(), 2);
        assert_eq!(stage.take_instabilities(), 0);
        stage.reset();
        assert!(!stage.needs_reset());
    }

    #[test]
    fn huge_finite_input_stays_finite() {
        let mut stage = ClippingStage::default();
        stage.prepare(FS);
        stage.set_drive(10.0);
        for x in [1e3, -1e3, 1e6, -1e6, 0.0, 0.3] {
            let y = stage.process_sample(x);
            assert!(y.is_finite(), "x={x} y={y}");
        }
        assert_eq!(stage.take_unconverged(), 0);
        for x in [1e30, -1e30, 0.0] {
            assert!(stage.process_sample(x).is_finite());
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut a = ClippingStage::default();
        a.prepare(FS);
        run_sine(&mut a, 0.5, 440.0, 500);
        a.reset();
        let snapshot = format!("{a:?}");
        a.reset();
        assert_eq!(snapshot, format!("{a:?}"));
    }
}
