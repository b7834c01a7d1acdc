//! Knob values shared between the control thread and the audio thread.
//!
//! [`PedalParams`] is held in an `Arc` by the processor. Any thread may call
//! the setters; the audio thread reads one [`ParamSnapshot`] at the start of
//! every block.

use screamer_core::{ParamCell, ParamDescriptor, ParamId};

/// Drive knob descriptor.
pub const DRIVE: ParamDescriptor = ParamDescriptor::knob("Drive", "Drive", ParamId(1), "drive", 2.0);

/// Tone knob descriptor.
pub const TONE: ParamDescriptor = ParamDescriptor::knob("Tone", "Tone", ParamId(2), "tone", 5.0);

/// Level knob descriptor.
pub const LEVEL: ParamDescriptor = ParamDescriptor::knob("Level", "Level", ParamId(3), "level", 7.0);

/// All knobs in display order.
pub const DESCRIPTORS: [ParamDescriptor; 3] = [DRIVE, TONE, LEVEL];

/// Values read at one block boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Drive, 0–10.
    pub drive: f32,
    /// Tone, 0–10.
    pub tone: f32,
    /// Level, 0–10.
    pub level: f32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            drive: DRIVE.default,
            tone: TONE.default,
            level: LEVEL.default,
        }
    }
}

/// Lock-free drive/tone/level storage.
///
/// Every setter clamps to `[0, 10]`, so no value outside the knob range is
/// ever observable.
///
/// ```rust
/// use screamer_pedal::PedalParams;
///
/// let params = PedalParams::default();
/// params.set_drive(-5.0);
/// assert_eq!(params.drive(), 0.0);
/// params.set_drive(50.0);
/// assert_eq!(params.drive(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct PedalParams {
    drive: ParamCell,
    tone: ParamCell,
    level: ParamCell,
}

impl PedalParams {
    /// Create with explicit initial values (clamped).
    pub fn new(drive: f32, tone: f32, level: f32) -> Self {
        let params = Self::default();
        params.set_drive(drive);
        params.set_tone(tone);
        params.set_level(level);
        params
    }

    /// Set drive.
    #[inline]
    pub fn set_drive(&self, value: f32) {
        self.drive.set(value);
    }

    /// Set tone.
    #[inline]
    pub fn set_tone(&self, value: f32) {
        self.tone.set(value);
    }

    /// Set level.
    #[inline]
    pub fn set_level(&self, value: f32) {
        self.level.set(value);
    }

    /// Current drive.
    #[inline]
    pub fn drive(&self) -> f32 {
        self.drive.get()
    }

    /// Current tone.
    #[inline]
    pub fn tone(&self) -> f32 {
        self.tone.get()
    }

    /// Current level.
    #[inline]
    pub fn level(&self) -> f32 {
        self.level.get()
    }

    /// Read all three values.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            drive: self.drive(),
            tone: self.tone(),
            level: self.level(),
        }
    }

    /// Store all three values.
    pub fn apply(&self, snapshot: ParamSnapshot) {
        self.set_drive(snapshot.drive);
        self.set_tone(snapshot.tone);
        self.set_level(snapshot.level);
    }

    /// Set a value by its string ID. Returns `false` for unknown IDs.
    pub fn set_by_id(&self, string_id: &str, value: f32) -> bool {
        match self.cell(string_id) {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        }
    }

    /// Read a value by its string ID.
    pub fn get_by_id(&self, string_id: &str) -> Option<f32> {
        self.cell(string_id).map(ParamCell::get)
    }

    /// Restore all defaults.
    pub fn reset_to_defaults(&self) {
        self.drive.set(DRIVE.default);
        self.tone.set(TONE.default);
        self.level.set(LEVEL.default);
    }

    fn cell(&self, string_id: &str) -> Option<&ParamCell> {
        match string_id {
            id if id == DRIVE.string_id => Some(&self.drive),
            id if id == TONE.string_id => Some(&self.tone),
            id if id == LEVEL.string_id => Some(&self.level),
            _ => None,
        }
    }
}

impl Default for PedalParams {
    fn default() -> Self {
        let cell = |d: ParamDescriptor| ParamCell::new(d.default, d.min, d.max);
        Self {
            drive: cell(DRIVE),
            tone: cell(TONE),
            level: cell(LEVEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let snap = PedalParams::default().snapshot();
        assert_eq!(snap, ParamSnapshot { drive: 2.0, tone: 5.0, level: 7.0 });
    }

    #[test]
    fn all_setters_clamp() {
        let params = PedalParams::new(-1.0, 11.0, 100.0);
        assert_eq!(params.drive(), 0.0);
        assert_eq!(params.tone(), 10.0);
        assert_eq!(params.level(), 10.0);
    }

    #[test]
    fn string_ids_route_to_cells() {
        let params = PedalParams::default();
        assert!(params.set_by_id("tone", 3.5));
        assert_eq!(params.get_by_id("tone"), Some(3.5));
        assert!(!params.set_by_id("gain", 1.0));
        assert_eq!(params.get_by_id("gain"), None);
    }

    #[test]
    fn reset_restores_defaults() {
        let params = PedalParams::new(9.0, 9.0, 9.0);
        params.reset_to_defaults();
        assert_eq!(params.snapshot(), ParamSnapshot::default());
    }
}
