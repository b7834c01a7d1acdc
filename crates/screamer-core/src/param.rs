//! Parameter storage shared between control and audio threads, plus the
//! per-block ramp used when parameter ramping is enabled.
//!
//! - [`ParamCell`]: lock-free single-slot value cell. Control thread
//!   writes, audio thread reads the latest value at block start.
//! - [`LinearRamp`]: linear interpolation from the previous block's value to
//!   the new one over a fixed number of samples.

use core::sync::atomic::{AtomicU32, Ordering};

/// A clamped `f32` stored as bit-cast `AtomicU32`.
///
/// Writes clamp to `[min, max]` before publishing, so a reader can never
/// observe an out-of-range value. NaN writes are ignored.
///
/// ```rust
/// use screamer_core::ParamCell;
///
/// let drive = ParamCell::new(2.0, 0.0, 10.0);
/// drive.set(-5.0);
/// assert_eq!(drive.get(), 0.0);
/// drive.set(50.0);
/// assert_eq!(drive.get(), 10.0);
/// ```
#[derive(Debug)]
pub struct ParamCell {
    value: AtomicU32,
    min: f32,
    max: f32,
}

impl ParamCell {
    /// Create a cell with a default value and range.
    pub fn new(default: f32, min: f32, max: f32) -> Self {
        Self {
            value: AtomicU32::new(default.clamp(min, max).to_bits()),
            min,
            max,
        }
    }

    /// Store a new value (control thread).
    #[inline]
    pub fn set(&self, v: f32) {
        if v.is_nan() {
            return;
        }
        let clamped = v.clamp(self.min, self.max);
        self.value.store(clamped.to_bits(), Ordering::Release);
    }

    /// Load the latest value (audio thread).
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }

    /// Lower bound.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f32 {
        self.max
    }
}

impl Clone for ParamCell {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU32::new(self.value.load(Ordering::Acquire)),
            min: self.min,
            max: self.max,
        }
    }
}

/// Linear ramp between block-start parameter values.
///
/// Unlike a time-based smoother, the ramp length is given per call so the
/// ramp always lands on the target at the end of the current block.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    increment: f32,
    samples_remaining: u32,
}

impl LinearRamp {
    /// Create a settled ramp at `initial`.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
        }
    }

    /// Ramp from the current value to `target` over `samples` advances.
    ///
    /// `samples == 0` jumps immediately.
    pub fn ramp_to(&mut self, target: f32, samples: usize) {
        self.target = target;
        if samples == 0 || self.current == target {
            self.snap_to_target();
            return;
        }
        let samples = u32::try_from(samples).unwrap_or(u32::MAX);
        self.increment = (target - self.current) / samples as f32;
        self.samples_remaining = samples;
    }

    /// Step one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the ramp has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Jump to the target.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_clamps_on_store() {
        let cell = ParamCell::new(5.0, 0.0, 10.0);
        cell.set(-5.0);
        assert_eq!(cell.get(), 0.0);
        cell.set(50.0);
        assert_eq!(cell.get(), 10.0);
        cell.set(3.25);
        assert_eq!(cell.get(), 3.25);
    }

    #[test]
    fn cell_ignores_nan() {
        let cell = ParamCell::new(7.0, 0.0, 10.0);
        cell.set(f32::NAN);
        assert_eq!(cell.get(), 7.0);
        cell.set(f32::INFINITY);
        assert_eq!(cell.get(), 10.0);
    }

    #[test]
    fn cell_default_is_clamped() {
        let cell = ParamCell::new(12.0, 0.0, 10.0);
        assert_eq!(cell.get(), 10.0);
        assert_eq!(cell.clone().get(), 10.0);
    }

    #[test]
    fn ramp_lands_on_target() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.ramp_to(1.0, 4);
        let values: Vec<f32> = (0..4).map(|_| ramp.advance()).collect();
        assert_eq!(values, vec![0.25, 0.5, 0.75, 1.0]);
        assert!(ramp.is_settled());
        assert_eq!(ramp.advance(), 1.0);
    }

    #[test]
    fn ramp_zero_length_jumps() {
        let mut ramp = LinearRamp::new(2.0);
        ramp.ramp_to(8.0, 0);
        assert_eq!(ramp.get(), 8.0);
        assert!(ramp.is_settled());
    }

    #[test]
    fn ramp_retarget_starts_from_current() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.ramp_to(10.0, 10);
        for _ in 0..5 {
            ramp.advance();
        }
        ramp.ramp_to(0.0, 5);
        assert!((ramp.advance() - 4.0).abs() < 1e-5);
    }
}
