//! Flappy BabyBobo - a side-scrolling browser game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, power-ups)
//! - `renderer`: Draw-command scene composition and the Canvas 2D sink
//! - `game`: Controller tying the sim to storage, score submission and drawing
//! - `platform`: Browser/native storage and network abstraction
//! - `tuning`: Data-driven game balance

pub mod airdrop;
pub mod assets;
pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::{BestScore, HighScoreRecord, Leaderboard};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Field size used before the host reports a canvas size
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 480.0;
    /// Canvas height as a share of the window height
    pub const FIELD_HEIGHT_FRACTION: f64 = 0.6;
    /// Wall-clock length of one power-up countdown step
    pub const MS_PER_COUNTDOWN: f64 = 1000.0;
    /// Frame time assumed by the native demo runner (60 Hz)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
}
