//! Avatar integration
//!
//! Semi-implicit Euler: velocity first, then position. No drag and no
//! terminal velocity; the floor check catches a falling avatar first.

use super::state::Avatar;

/// Advance one frame under gravity
#[inline]
pub fn integrate(avatar: &mut Avatar) {
    avatar.velocity += avatar.gravity;
    avatar.pos.y += avatar.velocity;
}

/// Replace the current velocity with the lift impulse
#[inline]
pub fn flap(avatar: &mut Avatar) {
    avatar.velocity = avatar.lift;
}
