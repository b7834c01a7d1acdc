//! Wave digital filter building blocks.
//!
//! Voltage waves throughout: `a = v + R i`, `b = v - R i`, so the port
//! voltage is `(a + b) / 2` and the port current `(a - b) / (2 R)`.
//!
//! One-port leaves ([`Resistor`], [`Capacitor`], [`ResistiveVoltageSource`],
//! [`ResistiveCurrentSource`]) are combined with three-port [`Series`] and
//! [`Parallel`] adaptors into a tree. Every tree is evaluated in two passes:
//! [`WdfPort::reflected`] gathers waves from the leaves up to the root, the
//! root computes its reflection, and [`WdfPort::incident`] scatters the
//! result back down so reactive leaves can advance their state.
//!
//! The only nonlinear root is [`DiodePair`], an anti-parallel diode pair
//! solved with a bracketed Newton iteration in `f64`.
//!
//! ```rust
//! use screamer_core::wdf::{Capacitor, ResistiveVoltageSource, Series, WdfPort};
//!
//! // RC lowpass driven by a unit step, short-circuited at the root. Series
//! // ports are oriented around the loop, so the capacitor reads negated.
//! let mut tree = Series::new(
//!     ResistiveVoltageSource::new(1_000.0),
//!     Capacitor::new(1e-6, 48_000.0),
//! );
//! tree.left_mut().set_voltage(1.0);
//! let mut v_cap = 0.0;
//! for _ in 0..480 {
//!     let b = tree.reflected();
//!     tree.incident(-b);
//!     v_cap = -tree.right().voltage();
//! }
//! assert!(v_cap > 0.99);
//! ```

use libm::{exp, log1p};

/// A port of a wave digital filter tree.
pub trait WdfPort {
    /// Port resistance in ohms.
    fn port_resistance(&self) -> f64;

    /// Compute the wave leaving this port toward the root.
    fn reflected(&mut self) -> f64;

    /// Accept the wave arriving from the root and update state.
    fn incident(&mut self, a: f64);

    /// Clear reactive state.
    fn reset(&mut self);
}

/// Port voltage from the incident and reflected waves.
#[inline]
pub fn wave_voltage(a: f64, b: f64) -> f64 {
    0.5 * (a + b)
}

/// Linear resistor. Absorbs every incident wave.
#[derive(Debug, Clone)]
pub struct Resistor {
    r: f64,
    a: f64,
}

impl Resistor {
    /// Create a resistor of `r` ohms.
    pub fn new(r: f64) -> Self {
        Self { r, a: 0.0 }
    }

    /// Change the resistance.
    pub fn set_resistance(&mut self, r: f64) {
        self.r = r;
    }

    /// Voltage across the resistor after the last scatter.
    pub fn voltage(&self) -> f64 {
        wave_voltage(self.a, 0.0)
    }
}

impl WdfPort for Resistor {
    fn port_resistance(&self) -> f64 {
        self.r
    }

    fn reflected(&mut self) -> f64 {
        0.0
    }

    fn incident(&mut self, a: f64) {
        self.a = a;
    }

    fn reset(&mut self) {
        self.a = 0.0;
    }
}

/// Capacitor discretized with the trapezoidal rule.
///
/// Port resistance `T / (2 C)`; the reflected wave is the previous incident
/// wave.
#[derive(Debug, Clone)]
pub struct Capacitor {
    c: f64,
    r: f64,
    state: f64,
    a: f64,
    b: f64,
}

impl Capacitor {
    /// Create a capacitor of `c` farads at `sample_rate`.
    pub fn new(c: f64, sample_rate: f64) -> Self {
        Self {
            c,
            r: 1.0 / (2.0 * sample_rate * c),
            state: 0.0,
            a: 0.0,
            b: 0.0,
        }
    }

    /// Recompute the port resistance for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.r = 1.0 / (2.0 * sample_rate * self.c);
    }

    /// Voltage across the capacitor after the last scatter.
    pub fn voltage(&self) -> f64 {
        wave_voltage(self.a, self.b)
    }
}

impl WdfPort for Capacitor {
    fn port_resistance(&self) -> f64 {
        self.r
    }

    fn reflected(&mut self) -> f64 {
        self.b = self.state;
        self.b
    }

    fn incident(&mut self, a: f64) {
        self.a = a;
        self.state = crate::flush_denormal_f64(a);
    }

    fn reset(&mut self) {
        self.state = 0.0;
        self.a = 0.0;
        self.b = 0.0;
    }
}

/// Ideal voltage source in series with a resistance.
#[derive(Debug, Clone)]
pub struct ResistiveVoltageSource {
    r: f64,
    vs: f64,
}

impl ResistiveVoltageSource {
    /// Create a source with internal resistance `r`.
    pub fn new(r: f64) -> Self {
        Self { r, vs: 0.0 }
    }

    /// Set the source voltage for the next sample.
    #[inline]
    pub fn set_voltage(&mut self, vs: f64) {
        self.vs = vs;
    }
}

impl WdfPort for ResistiveVoltageSource {
    fn port_resistance(&self) -> f64 {
        self.r
    }

    fn reflected(&mut self) -> f64 {
        self.vs
    }

    fn incident(&mut self, _a: f64) {}

    fn reset(&mut self) {
        self.vs = 0.0;
    }
}

/// Ideal current source in parallel with a resistance.
#[derive(Debug, Clone)]
pub struct ResistiveCurrentSource {
    r: f64,
    is: f64,
}

impl ResistiveCurrentSource {
    /// Create a source with shunt resistance `r`.
    pub fn new(r: f64) -> Self {
        Self { r, is: 0.0 }
    }

    /// Set the source current for the next sample.
    #[inline]
    pub fn set_current(&mut self, is: f64) {
        self.is = is;
    }

    /// Change the shunt resistance.
    #[inline]
    pub fn set_resistance(&mut self, r: f64) {
        self.r = r;
    }
}

impl WdfPort for ResistiveCurrentSource {
    fn port_resistance(&self) -> f64 {
        self.r
    }

    fn reflected(&mut self) -> f64 {
        self.r * self.is
    }

    fn incident(&mut self, _a: f64) {}

    fn reset(&mut self) {
        self.is = 0.0;
    }
}

/// Three-port series adaptor, adapted at the upward port.
#[derive(Debug, Clone)]
pub struct Series<L, R> {
    left: L,
    right: R,
    a_left: f64,
    a_right: f64,
}

impl<L: WdfPort, R: WdfPort> Series<L, R> {
    /// Connect two ports in series.
    pub fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            a_left: 0.0,
            a_right: 0.0,
        }
    }

    /// First child.
    pub fn left(&self) -> &L {
        &self.left
    }

    /// First child, mutably.
    pub fn left_mut(&mut self) -> &mut L {
        &mut self.left
    }

    /// Second child.
    pub fn right(&self) -> &R {
        &self.right
    }

    /// Second child, mutably.
    pub fn right_mut(&mut self) -> &mut R {
        &mut self.right
    }
}

impl<L: WdfPort, R: WdfPort> WdfPort for Series<L, R> {
    fn port_resistance(&self) -> f64 {
        self.left.port_resistance() + self.right.port_resistance()
    }

    fn reflected(&mut self) -> f64 {
        self.a_left = self.left.reflected();
        self.a_right = self.right.reflected();
        -(self.a_left + self.a_right)
    }

    fn incident(&mut self, a: f64) {
        let r_left = self.left.port_resistance();
        let r_up = r_left + self.right.port_resistance();
        let sum = self.a_left + self.a_right + a;
        let b_left = self.a_left - (r_left / r_up) * sum;
        let b_right = -(a + b_left);
        self.left.incident(b_left);
        self.right.incident(b_right);
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.a_left = 0.0;
        self.a_right = 0.0;
    }
}

/// Three-port parallel adaptor, adapted at the upward port.
#[derive(Debug, Clone)]
pub struct Parallel<L, R> {
    left: L,
    right: R,
    a_left: f64,
    a_right: f64,
    b_up: f64,
}

impl<L: WdfPort, R: WdfPort> Parallel<L, R> {
    /// Connect two ports in parallel.
    pub fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            a_left: 0.0,
            a_right: 0.0,
            b_up: 0.0,
        }
    }

    /// First child.
    pub fn left(&self) -> &L {
        &self.left
    }

    /// First child, mutably.
    pub fn left_mut(&mut self) -> &mut L {
        &mut self.left
    }

    /// Second child.
    pub fn right(&self) -> &R {
        &self.right
    }

    /// Second child, mutably.
    pub fn right_mut(&mut self) -> &mut R {
        &mut self.right
    }
}

impl<L: WdfPort, R: WdfPort> WdfPort for Parallel<L, R> {
    fn port_resistance(&self) -> f64 {
        let g = 1.0 / self.left.port_resistance() + 1.0 / self.right.port_resistance();
        1.0 / g
    }

    fn reflected(&mut self) -> f64 {
        let g_left = 1.0 / self.left.port_resistance();
        let g_right = 1.0 / self.right.port_resistance();
        self.a_left = self.left.reflected();
        self.a_right = self.right.reflected();
        self.b_up = (g_left * self.a_left + g_right * self.a_right) / (g_left + g_right);
        self.b_up
    }

    fn incident(&mut self, a: f64) {
        let common = a + self.b_up;
        self.left.incident(common - self.a_left);
        self.right.incident(common - self.a_right);
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.a_left = 0.0;
        self.a_right = 0.0;
        self.b_up = 0.0;
    }
}

/// Ideal short circuit at the root: `b = -a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortCircuit;

impl ShortCircuit {
    /// Reflect the incident wave.
    #[inline]
    pub fn reflect(self, a: f64) -> f64 {
        -a
    }
}

/// Shockley diode parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiodeModel {
    /// Saturation current in amps.
    pub is: f64,
    /// Ideality factor times thermal voltage, in volts.
    pub n_vt: f64,
}

impl DiodeModel {
    /// Thermal voltage at room temperature.
    pub const VT: f64 = 25.85e-3;

    /// 1N914 / 1N4148 small-signal silicon diode.
    pub const fn silicon() -> Self {
        Self {
            is: 2.52e-9,
            n_vt: 1.752 * Self::VT,
        }
    }
}

impl Default for DiodeModel {
    fn default() -> Self {
        Self::silicon()
    }
}

/// Outcome of the last [`DiodePair::reflect`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveStats {
    /// Iterations spent.
    pub iterations: u32,
    /// Whether the step size fell below tolerance.
    pub converged: bool,
}

/// Anti-parallel diode pair at the tree root.
///
/// The forward branch holds `forward` diodes in series, the reverse branch
/// `reverse` diodes. Unequal counts give asymmetric clipping.
///
/// Solves `f(v) = v + Rp * i(v) - a = 0` for the port voltage `v`, with
///
/// ```text
/// i(v) = Is * (exp(v / (Nf nVt)) - exp(-v / (Nr nVt)))
/// ```
///
/// `f` is strictly increasing, so the root lies in `[0, v_max]` for `a > 0`
/// where `v_max = min(a, Nf nVt ln(1 + a / (Rp Is)))` (mirrored for
/// `a < 0`). Newton steps that leave the bracket fall back to bisection,
/// which keeps the iteration bounded for any finite `a`.
#[derive(Debug, Clone)]
pub struct DiodePair {
    model: DiodeModel,
    forward_nvt: f64,
    reverse_nvt: f64,
    v_prev: f64,
    max_iterations: u32,
    tolerance: f64,
    stats: SolveStats,
}

impl DiodePair {
    /// Default iteration cap.
    pub const MAX_ITERATIONS: u32 = 32;

    /// Default convergence tolerance in volts.
    pub const TOLERANCE: f64 = 1e-9;

    /// Create a pair with `forward` and `reverse` series diode counts.
    ///
    /// Counts are clamped to at least one.
    pub fn new(model: DiodeModel, forward: u8, reverse: u8) -> Self {
        let forward = f64::from(forward.max(1));
        let reverse = f64::from(reverse.max(1));
        Self {
            model,
            forward_nvt: forward * model.n_vt,
            reverse_nvt: reverse * model.n_vt,
            v_prev: 0.0,
            max_iterations: Self::MAX_ITERATIONS,
            tolerance: Self::TOLERANCE,
            stats: SolveStats::default(),
        }
    }

    /// Symmetric single-diode pair.
    pub fn symmetric(model: DiodeModel) -> Self {
        Self::new(model, 1, 1)
    }

    /// Current through the pair at voltage `v`.
    #[inline]
    pub fn current(&self, v: f64) -> f64 {
        self.model.is * (exp(v / self.forward_nvt) - exp(-v / self.reverse_nvt))
    }

    #[inline]
    fn conductance(&self, v: f64) -> f64 {
        self.model.is
            * (exp(v / self.forward_nvt) / self.forward_nvt
                + exp(-v / self.reverse_nvt) / self.reverse_nvt)
    }

    /// Solve for the port voltage given incident wave `a` and port
    /// resistance `rp`.
    pub fn solve_voltage(&mut self, a: f64, rp: f64) -> f64 {
        if a == 0.0 {
            self.stats = SolveStats {
                iterations: 0,
                converged: true,
            };
            self.v_prev = 0.0;
            return 0.0;
        }

        let is = self.model.is;
        let (mut lo, mut hi) = if a > 0.0 {
            (0.0, a.min(self.forward_nvt * log1p(a / (rp * is))))
        } else {
            ((-self.reverse_nvt * log1p(-a / (rp * is))).max(a), 0.0)
        };

        let mut v = self.v_prev.clamp(lo, hi);
        let mut stats = SolveStats::default();
        for iteration in 1..=self.max_iterations {
            let f = v + rp * self.current(v) - a;
            if f > 0.0 {
                hi = v;
            } else {
                lo = v;
            }
            let slope = 1.0 + rp * self.conductance(v);
            let mut next = v - f / slope;
            if !(lo <= next && next <= hi) {
                next = 0.5 * (lo + hi);
            }
            let step = (next - v).abs();
            v = next;
            stats.iterations = iteration;
            if step < self.tolerance {
                stats.converged = true;
                break;
            }
        }

        self.stats = stats;
        self.v_prev = v;
        v
    }

    /// Reflected wave `b = 2v - a` for incident wave `a`.
    #[inline]
    pub fn reflect(&mut self, a: f64, rp: f64) -> f64 {
        2.0 * self.solve_voltage(a, rp) - a
    }

    /// Statistics of the last solve.
    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Forget the warm-start voltage.
    pub fn reset(&mut self) {
        self.v_prev = 0.0;
        self.stats = SolveStats::default();
    }
}
