//! Parameter metadata for hosts, presets and the command line.
//!
//! Each pedal knob is described by a [`ParamDescriptor`] with a stable
//! [`ParamId`] so that automation and stored presets survive renames.

/// Stable numeric parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Describes one parameter: range, default and display names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g., "Drive").
    pub name: &'static str,
    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,
    /// Stable numeric ID.
    pub id: ParamId,
    /// Stable string ID used as the key in preset files.
    pub string_id: &'static str,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
    /// Recommended step for encoder control.
    pub step: f32,
}

impl ParamDescriptor {
    /// A 0–10 pedal knob.
    ///
    /// ```rust
    /// use screamer_core::{ParamDescriptor, ParamId};
    ///
    /// let tone = ParamDescriptor::knob("Tone", "Tone", ParamId(2), "tone", 5.0);
    /// assert_eq!(tone.clamp(11.0), 10.0);
    /// assert_eq!(tone.normalize(5.0), 0.5);
    /// ```
    pub const fn knob(
        name: &'static str,
        short_name: &'static str,
        id: ParamId,
        string_id: &'static str,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            id,
            string_id,
            min: 0.0,
            max: 10.0,
            default,
            step: 0.1,
        }
    }

    /// Clamp a value to the parameter range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Plain value to 0–1.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / range
    }

    /// 0–1 to plain value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVE: ParamDescriptor = ParamDescriptor::knob("Drive", "Drive", ParamId(1), "drive", 2.0);

    #[test]
    fn clamp_bounds() {
        assert_eq!(DRIVE.clamp(-1.0), 0.0);
        assert_eq!(DRIVE.clamp(4.5), 4.5);
        assert_eq!(DRIVE.clamp(99.0), 10.0);
    }

    #[test]
    fn normalize_inverts_denormalize() {
        for v in [0.0, 2.5, 7.0, 10.0] {
            let back = DRIVE.denormalize(DRIVE.normalize(v));
            assert!((back - v).abs() < 1e-6);
        }
    }
}
