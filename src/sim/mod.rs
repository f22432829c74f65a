//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per animation frame, frame-counted cadences
//! - Seeded RNG only
//! - Wall-clock time enters only through `TickInput::elapsed_ms`
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod powerup;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Collision;
pub use state::{
    Avatar, Collectible, CollectibleKind, Field, GameEvent, GameMode, GameState, Pipe, PowerUps,
    Session, SpeedEffect,
};
pub use tick::{InputEvent, TickInput, tick};
