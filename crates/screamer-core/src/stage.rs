//! The [`Stage`] trait shared by the per-channel processing stages.
//!
//! A stage is a mono, stateful processor. The orchestrator owns one stage
//! instance per channel and never shares state between them.
//!
//! - **No allocations**: every method is callable from the audio thread
//!   after construction.
//! - **Object-safe**: stages can be boxed for tests and tooling, though the
//!   processor uses them by value.

/// A mono processing stage with prepare/reset lifecycle.
///
/// # Example
///
/// ```rust
/// use screamer_core::Stage;
///
/// struct Gain(f32);
///
/// impl Stage for Gain {
///     fn prepare(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
///     fn process_sample(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
/// }
///
/// let mut gain = Gain(0.5);
/// let mut block = [1.0, -1.0];
/// gain.process_block(&mut block);
/// assert_eq!(block, [0.5, -0.5]);
/// ```
pub trait Stage {
    /// Fix the time base. Must be called before processing.
    fn prepare(&mut self, sample_rate: f32);

    /// Clear all internal state to quiescent values.
    fn reset(&mut self);

    /// Advance the stage by one sample.
    fn process_sample(&mut self, input: f32) -> f32;

    /// Process a block in place, carrying state across calls.
    fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
