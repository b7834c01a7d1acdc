//! Small math helpers shared by the DSP stages.
//!
//! All functions are allocation-free and `no_std` friendly.

use libm::{expf, log10f};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use screamer_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-20.0) - 0.1).abs() < 0.001);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Values at or below `1e-10` map to -200 dB instead of `-inf`.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-10 {
        -200.0
    } else {
        20.0 * log10f(linear)
    }
}

/// Flush denormal numbers to zero.
///
/// Filter feedback paths decay into the subnormal range on silence, which
/// costs hundreds of cycles per operation on x86.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// `f64` variant of [`flush_denormal`] for the circuit solvers.
#[inline]
pub fn flush_denormal_f64(x: f64) -> f64 {
    if x.abs() < 1e-30 { 0.0 } else { x }
}

/// Replace NaN and infinities with zero.
#[inline]
pub fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

/// Map a 0–10 pedal knob position to 0–1.
#[inline]
pub fn knob_fraction(value: f32) -> f32 {
    (value / 10.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip() {
        for db in [-40.0, -6.0, 0.0, 8.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
    }

    #[test]
    fn silence_maps_to_floor() {
        assert_eq!(linear_to_db(0.0), -200.0);
    }

    #[test]
    fn denormals_flushed() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
        assert_eq!(flush_denormal_f64(-1e-40), 0.0);
    }

    #[test]
    fn non_finite_replaced() {
        assert_eq!(finite_or_zero(f32::NAN), 0.0);
        assert_eq!(finite_or_zero(f32::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(-0.25), -0.25);
    }

    #[test]
    fn knob_fraction_clamps() {
        assert_eq!(knob_fraction(-3.0), 0.0);
        assert_eq!(knob_fraction(5.0), 0.5);
        assert_eq!(knob_fraction(12.0), 1.0);
    }
}
