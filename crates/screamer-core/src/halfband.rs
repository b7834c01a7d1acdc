//! Polyphase IIR half-band filters for 2× resampling.
//!
//! A half-band lowpass is split into two parallel chains of first-order
//! allpass sections (Regalia-Mitra decomposition). Each section computes
//!
//! ```text
//! y[n] = a * (x[n] - y[n-1]) + x[n-1]
//! ```
//!
//! which is `(a + z^-1) / (1 + a z^-1)` running at the low rate. The
//! coefficients come from an elliptic design evaluated with Jacobi theta
//! series at construction time, so the transition band and stopband depth
//! can be traded per [`HalfbandDesign`].
//!
//! Upsampling feeds each input to both chains and interleaves the results
//! (even chain first). Downsampling feeds the odd high-rate sample to the
//! even chain, the even sample to the odd chain, and averages.
//!
//! The round-trip delay at DC equals the sum of the per-section delays
//! `(1 - a) / (1 + a)`, expressed in base-rate samples.

use libm::{cos, pow, sin, sqrt, tan};

/// Largest supported coefficient count (sections over both chains).
pub const MAX_HALFBAND_COEFS: usize = 12;

/// Sections per polyphase chain.
const MAX_CHAIN_LEN: usize = MAX_HALFBAND_COEFS / 2;

/// Series terms below this magnitude end the theta sums.
const SERIES_EPSILON: f64 = 1e-100;

/// Safety cap on theta series terms.
const SERIES_MAX_TERMS: u32 = 64;

/// Allpass coefficients of an elliptic half-band filter.
///
/// ```rust
/// use screamer_core::HalfbandDesign;
///
/// let design = HalfbandDesign::new(8, 0.06);
/// assert_eq!(design.coefficients().len(), 8);
/// assert!(design.coefficients().windows(2).all(|w| w[0] < w[1]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HalfbandDesign {
    coefs: [f64; MAX_HALFBAND_COEFS],
    len: usize,
    transition_bw: f64,
}

impl HalfbandDesign {
    /// Design a filter with `num_coefs` allpass sections.
    ///
    /// `transition_bw` is the transition band width relative to the high
    /// sample rate, in `(0, 0.5)`. `num_coefs` is clamped to
    /// `2..=MAX_HALFBAND_COEFS`; odd counts are rounded up to even so both
    /// chains have equal length.
    pub fn new(num_coefs: usize, transition_bw: f64) -> Self {
        let len = num_coefs.clamp(2, MAX_HALFBAND_COEFS).next_multiple_of(2);
        let transition_bw = transition_bw.clamp(1e-4, 0.49);
        let (k, q) = transition_param(transition_bw);
        let order = (2 * len + 1) as f64;

        let mut coefs = [0.0; MAX_HALFBAND_COEFS];
        for (index, coef) in coefs.iter_mut().take(len).enumerate() {
            let c = (index + 1) as f64;
            let num = theta_numerator(q, order, c) * pow(q, 0.25);
            let den = theta_denominator(q, order, c) + 0.5;
            let ww = num / den;
            let wwsq = ww * ww;
            let x = sqrt((1.0 - wwsq * k) * (1.0 - wwsq / k)) / (1.0 + wwsq);
            *coef = (1.0 - x) / (1.0 + x);
        }

        Self {
            coefs,
            len,
            transition_bw,
        }
    }

    /// Allpass coefficients in ascending order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefs[..self.len]
    }

    /// Transition band width relative to the high rate.
    pub fn transition_bw(&self) -> f64 {
        self.transition_bw
    }

    /// Up-then-down delay at DC in base-rate samples.
    pub fn round_trip_delay(&self) -> f64 {
        self.coefficients()
            .iter()
            .map(|a| (1.0 - a) / (1.0 + a))
            .sum()
    }

    fn chain(&self, parity: usize) -> AllpassChain {
        let mut chain = AllpassChain::default();
        for (slot, &a) in self.coefficients().iter().skip(parity).step_by(2).enumerate() {
            chain.coefs[slot] = a as f32;
            chain.len = slot + 1;
        }
        chain
    }
}

/// Elliptic selectivity `k` and nome `q` for a transition width.
fn transition_param(transition_bw: f64) -> (f64, f64) {
    let k = tan((1.0 - transition_bw * 2.0) * core::f64::consts::PI / 4.0);
    let k = k * k;
    let kksqrt = pow(1.0 - k * k, 0.25);
    let e = 0.5 * (1.0 - kksqrt) / (1.0 + kksqrt);
    let e4 = e * e * e * e;
    let q = e * (1.0 + e4 * (2.0 + e4 * (15.0 + 150.0 * e4)));
    (k, q)
}

fn theta_numerator(q: f64, order: f64, c: f64) -> f64 {
    let mut acc = 0.0;
    let mut sign = 1.0;
    for i in 0..SERIES_MAX_TERMS {
        let i = f64::from(i);
        let term = pow(q, i * (i + 1.0))
            * sin((i * 2.0 + 1.0) * c * core::f64::consts::PI / order)
            * sign;
        acc += term;
        sign = -sign;
        if term.abs() <= SERIES_EPSILON {
            break;
        }
    }
    acc
}

fn theta_denominator(q: f64, order: f64, c: f64) -> f64 {
    let mut acc = 0.0;
    let mut sign = -1.0;
    for i in 1..SERIES_MAX_TERMS {
        let i = f64::from(i);
        let term = pow(q, i * i) * cos(i * 2.0 * c * core::f64::consts::PI / order) * sign;
        acc += term;
        sign = -sign;
        if term.abs() <= SERIES_EPSILON {
            break;
        }
    }
    acc
}

/// Cascade of first-order allpass sections with fixed capacity.
#[derive(Debug, Clone, Default)]
struct AllpassChain {
    coefs: [f32; MAX_CHAIN_LEN],
    x1: [f32; MAX_CHAIN_LEN],
    y1: [f32; MAX_CHAIN_LEN],
    len: usize,
}

impl AllpassChain {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut x = input;
        for i in 0..self.len {
            let y = self.coefs[i] * (x - self.y1[i]) + self.x1[i];
            self.x1[i] = x;
            self.y1[i] = y;
            x = y;
        }
        x
    }

    fn reset(&mut self) {
        self.x1 = [0.0; MAX_CHAIN_LEN];
        self.y1 = [0.0; MAX_CHAIN_LEN];
    }

    fn flush_denormals(&mut self) {
        for i in 0..self.len {
            self.x1[i] = crate::flush_denormal(self.x1[i]);
            self.y1[i] = crate::flush_denormal(self.y1[i]);
        }
    }
}

/// 2× interpolator: one input sample in, two output samples out.
#[derive(Debug, Clone)]
pub struct HalfbandUpsampler {
    even: AllpassChain,
    odd: AllpassChain,
}

impl HalfbandUpsampler {
    /// Build from a design.
    pub fn new(design: &HalfbandDesign) -> Self {
        Self {
            even: design.chain(0),
            odd: design.chain(1),
        }
    }

    /// Produce the two high-rate samples for `input`.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> [f32; 2] {
        [self.even.process(input), self.odd.process(input)]
    }

    /// Upsample `input` into `output`, which must hold `2 * input.len()`.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert!(output.len() >= input.len() * 2);
        for (&x, pair) in input.iter().zip(output.chunks_exact_mut(2)) {
            let [a, b] = self.process_sample(x);
            pair[0] = a;
            pair[1] = b;
        }
        self.even.flush_denormals();
        self.odd.flush_denormals();
    }

    /// Clear filter memory.
    pub fn reset(&mut self) {
        self.even.reset();
        self.odd.reset();
    }
}

/// 2× decimator: two input samples in, one output sample out.
#[derive(Debug, Clone)]
pub struct HalfbandDownsampler {
    even: AllpassChain,
    odd: AllpassChain,
}

impl HalfbandDownsampler {
    /// Build from a design.
    pub fn new(design: &HalfbandDesign) -> Self {
        Self {
            even: design.chain(0),
            odd: design.chain(1),
        }
    }

    /// Decimate one high-rate pair `[x[2n], x[2n+1]]`.
    #[inline]
    pub fn process_sample(&mut self, pair: [f32; 2]) -> f32 {
        let a = self.even.process(pair[1]);
        let b = self.odd.process(pair[0]);
        0.5 * (a + b)
    }

    /// Decimate `input` into `output`, which must hold `input.len() / 2`.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert!(input.len() >= output.len() * 2);
        for (pair, out) in input.chunks_exact(2).zip(output.iter_mut()) {
            *out = self.process_sample([pair[0], pair[1]]);
        }
        self.even.flush_denormals();
        self.odd.flush_denormals();
    }

    /// Clear filter memory.
    pub fn reset(&mut self) {
        self.even.reset();
        self.odd.reset();
    }
}
