//! Entity spawning, scrolling and culling
//!
//! Pipes (each with one coin in its gap) appear every `pipe_every` frames.
//! Power-up items appear every `power_up_every` frames, one random kind per
//! attempt; the attempt is dropped if that kind is already on screen.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, CollectibleKind, Field, Pipe, Session};
use crate::tuning::Tuning;

/// Move everything left by `speed` and drop what has fully left the field
pub fn scroll(session: &mut Session, speed: f32) {
    for pipe in &mut session.pipes {
        pipe.x -= speed;
    }
    for item in &mut session.collectibles {
        item.pos.x -= speed;
    }

    session.pipes.retain(|p| p.right() > 0.0);
    session.collectibles.retain(|c| c.pos.x + c.radius > 0.0);
}

/// Spawn whatever is due on `frame`
pub fn spawn<R: Rng>(session: &mut Session, frame: u64, field: Field, tuning: &Tuning, rng: &mut R) {
    if frame.is_multiple_of(tuning.pipe_every) {
        spawn_pipe(session, field, tuning, rng);
    }
    if frame > 0 && frame.is_multiple_of(tuning.power_up_every) {
        spawn_power_up(session, field, tuning, rng);
    }
}

fn spawn_pipe<R: Rng>(session: &mut Session, field: Field, tuning: &Tuning, rng: &mut R) {
    let half = field.height / 2.0;
    let top_height = if half > 0.0 {
        rng.random_range(0.0..half)
    } else {
        0.0
    };
    session.pipes.push(Pipe {
        x: field.width,
        top_height,
        width: tuning.pipe_width,
    });

    let gap = session.pipe_gap;
    let coin_y = if gap > 0.0 {
        rng.random_range(top_height..top_height + gap)
    } else {
        top_height
    };
    session.collectibles.push(Collectible {
        pos: Vec2::new(field.width, coin_y),
        radius: tuning.coin_radius,
        kind: CollectibleKind::Coin,
    });

    log::debug!(
        "Pipe spawned (top {:.0}, gap {:.0}), coin at {:.0}",
        top_height,
        gap,
        coin_y
    );
}

fn spawn_power_up<R: Rng>(session: &mut Session, field: Field, tuning: &Tuning, rng: &mut R) {
    let kinds = CollectibleKind::POWER_UPS;
    let kind = kinds[rng.random_range(0..kinds.len())];
    if session.has_on_screen(kind) {
        log::debug!("{:?} already on screen, skipping power-up", kind);
        return;
    }

    let radius = tuning.power_up_radius;
    let y = if field.height > 2.0 * radius {
        rng.random_range(radius..field.height - radius)
    } else {
        field.height / 2.0
    };
    session.collectibles.push(Collectible {
        pos: Vec2::new(field.width + radius, y),
        radius,
        kind,
    });
    log::debug!("{:?} spawned at y={:.0}", kind, y);
}
