//! Collision and pickup detection
//!
//! The avatar is a circle. Field edges and pipes are tested against its
//! axis-aligned extent; collectibles are circle-vs-circle.

use super::state::{Avatar, Collectible, CollectibleKind, Field, Pipe};

/// What the avatar ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Left the top or bottom of the field
    Boundary,
    /// Struck the pipe at this index
    Pipe(usize),
}

/// Avatar crossing the ceiling or the floor
pub fn hits_boundary(avatar: &Avatar, field: Field) -> bool {
    avatar.bottom() > field.height || avatar.top() < 0.0
}

/// Avatar overlapping a pipe horizontally while not fully inside its gap
pub fn hits_pipe(avatar: &Avatar, pipe: &Pipe, gap: f32) -> bool {
    let in_x_range = avatar.pos.x + avatar.radius > pipe.x && avatar.pos.x - avatar.radius < pipe.right();
    let in_y_range = avatar.top() < pipe.top_height || avatar.bottom() > pipe.bottom_start(gap);
    in_x_range && in_y_range
}

/// First terminal collision this frame, boundaries before pipes.
///
/// An avatar without a radius is never tested.
pub fn detect(avatar: &Avatar, pipes: &[Pipe], gap: f32, field: Field) -> Option<Collision> {
    if avatar.radius <= 0.0 {
        return None;
    }
    if hits_boundary(avatar, field) {
        return Some(Collision::Boundary);
    }
    pipes
        .iter()
        .position(|pipe| hits_pipe(avatar, pipe, gap))
        .map(Collision::Pipe)
}

/// Strictly closer than the sum of radii; touching edges do not count
#[inline]
pub fn touches(avatar: &Avatar, item: &Collectible) -> bool {
    avatar.pos.distance(item.pos) < avatar.radius + item.radius
}

/// Remove every collectible the avatar touches and return their kinds in
/// resolution order: coins, slow, speed, shield.
pub fn take_pickups(avatar: &Avatar, collectibles: &mut Vec<Collectible>) -> Vec<CollectibleKind> {
    if avatar.radius <= 0.0 {
        return Vec::new();
    }

    let mut taken = Vec::new();
    collectibles.retain(|item| {
        if touches(avatar, item) {
            taken.push(item.kind);
            false
        } else {
            true
        }
    });
    taken.sort();
    taken
}
