//! Demo pilot
//!
//! Flies toward the centre of the next gap by flapping whenever the avatar
//! drops below its target while falling. Used by the attract/demo mode and
//! the headless native runner.

use super::state::{GameMode, GameState};

/// Height gained by one flap from rest at default tuning, plus a little slack
const FLAP_RISE: f32 = 65.0;

/// y the pilot tries to hover at
pub fn target_y(state: &GameState) -> f32 {
    let session = &state.session;
    let avatar = &session.avatar;

    let next_pipe = session
        .pipes
        .iter()
        .find(|p| p.right() > avatar.pos.x - avatar.radius);

    let wanted = match next_pipe {
        Some(pipe) => {
            let gap_bottom = pipe.bottom_start(session.pipe_gap).min(state.field.height);
            (pipe.top_height + gap_bottom) / 2.0
        }
        None => state.field.height / 2.0,
    };

    let ceiling = avatar.radius + FLAP_RISE;
    let floor = state.field.height - avatar.radius - 4.0;
    wanted.max(ceiling).min(floor)
}

/// Whether the pilot wants to flap this frame
pub fn wants_flap(state: &GameState) -> bool {
    if state.mode != GameMode::Playing {
        return false;
    }
    let avatar = &state.session.avatar;
    avatar.velocity >= 0.0 && avatar.pos.y >= target_y(state)
}
