//! Difficulty ramp: the pipe gap narrows as the session goes on

use crate::tuning::Tuning;

/// Gap after `frame` frames have been simulated, given the current gap.
///
/// Shrinks by `gap_step` on every multiple of `gap_every`, never below `min_gap`.
pub fn ramp_gap(gap: f32, frame: u64, tuning: &Tuning) -> f32 {
    if frame == 0 || !frame.is_multiple_of(tuning.gap_every) {
        return gap;
    }
    let next = (gap - tuning.gap_step).max(tuning.min_gap);
    if next < gap {
        log::debug!("Pipe gap narrowed to {} at frame {}", next, frame);
    }
    next
}

/// Closed form of repeated `ramp_gap` from a fresh session
pub fn gap_at(frame: u64, tuning: &Tuning) -> f32 {
    let steps = (frame / tuning.gap_every) as f32;
    (tuning.initial_gap - steps * tuning.gap_step).max(tuning.min_gap)
}
