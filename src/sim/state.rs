//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything a frame touches. Components
//! receive it (or the `Session` inside it) by reference each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

/// Top-level mode. Gates everything that runs per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Idle, showing the start prompt
    Start,
    /// Simulation running
    Playing,
    /// Session over, showing the summary
    Restart,
}

/// Visible play field in canvas pixels, origin top-left, y down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: crate::consts::DEFAULT_FIELD_WIDTH,
            height: crate::consts::DEFAULT_FIELD_HEIGHT,
        }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    /// Centre; x never changes during a session
    pub pos: Vec2,
    /// Collision radius. Zero until the sprite size is known.
    pub radius: f32,
    /// Vertical velocity (positive = down)
    pub velocity: f32,
    pub gravity: f32,
    pub lift: f32,
}

impl Avatar {
    pub fn new(tuning: &Tuning, radius: f32) -> Self {
        Self {
            pos: Vec2::new(tuning.avatar_x, tuning.avatar_start_y),
            radius,
            velocity: 0.0,
            gravity: tuning.gravity,
            lift: tuning.lift,
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// A top/bottom obstacle pair. The bottom segment starts `gap` below the top one.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Height of the top segment, measured from the top of the field
    pub top_height: f32,
    pub width: f32,
}

impl Pipe {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// y where the bottom segment begins
    pub fn bottom_start(&self, gap: f32) -> f32 {
        self.top_height + gap
    }
}

/// Collectible kinds, declared in pickup resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectibleKind {
    Coin,
    Slow,
    Speed,
    Shield,
}

impl CollectibleKind {
    /// Kinds that spawn on the power-up cadence
    pub const POWER_UPS: [CollectibleKind; 3] = [
        CollectibleKind::Speed,
        CollectibleKind::Slow,
        CollectibleKind::Shield,
    ];

    pub fn is_power_up(self) -> bool {
        self != CollectibleKind::Coin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: CollectibleKind,
}

/// Speed-affecting effect. Slow and fast cannot both be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedEffect {
    #[default]
    None,
    /// Slowed scroll, seconds remaining
    Slow(u32),
    /// Fast scroll, seconds remaining
    Fast(u32),
}

impl SpeedEffect {
    pub fn seconds_left(self) -> u32 {
        match self {
            SpeedEffect::None => 0,
            SpeedEffect::Slow(s) | SpeedEffect::Fast(s) => s,
        }
    }

    pub fn is_slow(self) -> bool {
        matches!(self, SpeedEffect::Slow(_))
    }

    pub fn is_fast(self) -> bool {
        matches!(self, SpeedEffect::Fast(_))
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerUps {
    pub speed: SpeedEffect,
    /// One-shot collision absorber, independent of `speed`
    pub shield: bool,
    /// Wall-clock milliseconds accumulated toward the next countdown step.
    /// Belongs to the current speed effect; reset whenever it changes.
    pub clock_ms: f64,
}

/// Everything that lives for one play-through
#[derive(Debug, Clone)]
pub struct Session {
    pub avatar: Avatar,
    /// Oldest first
    pub pipes: Vec<Pipe>,
    /// Coins and power-up items, oldest first
    pub collectibles: Vec<Collectible>,
    /// Frames simulated so far
    pub frame: u64,
    pub score: u64,
    pub coins: u32,
    /// Current opening between top and bottom segments
    pub pipe_gap: f32,
    pub power_ups: PowerUps,
}

impl Session {
    pub fn new(tuning: &Tuning, avatar_radius: f32) -> Self {
        Self {
            avatar: Avatar::new(tuning, avatar_radius),
            pipes: Vec::new(),
            collectibles: Vec::new(),
            frame: 0,
            score: 0,
            coins: 0,
            pipe_gap: tuning.initial_gap,
            power_ups: PowerUps::default(),
        }
    }

    /// Whether a power-up of this kind is currently on screen
    pub fn has_on_screen(&self, kind: CollectibleKind) -> bool {
        self.collectibles.iter().any(|c| c.kind == kind)
    }
}

/// Something observable happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fresh session began
    SessionStarted,
    Flapped,
    CoinCollected { total: u32 },
    PowerUpCollected(CollectibleKind),
    /// A speed effect ran out
    EffectExpired,
    /// The shield ate a collision
    ShieldAbsorbed,
    /// Terminal collision. `new_high_score` is set when `score` beat the old best.
    GameOver {
        score: u64,
        coins: u32,
        new_high_score: bool,
    },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub field: Field,
    pub mode: GameMode,
    pub session: Session,
    /// Best score seen, including previous sessions
    pub high_score: u64,
    /// Avatar radius derived from the sprite, zero until loaded
    pub avatar_radius: f32,
    pub rng: Pcg32,
}

impl GameState {
    pub fn new(tuning: Tuning, field: Field, high_score: u64, seed: u64) -> Self {
        let session = Session::new(&tuning, 0.0);
        log::debug!("Simulation seeded with {}", seed);
        Self {
            tuning,
            field,
            mode: GameMode::Start,
            session,
            high_score,
            avatar_radius: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Record the avatar sprite's natural size; radius is half the larger side
    pub fn set_avatar_sprite(&mut self, width: f32, height: f32) {
        self.avatar_radius = width.max(height) / 2.0;
        self.session.avatar.radius = self.avatar_radius;
        log::debug!("Avatar radius set to {}", self.avatar_radius);
    }

    /// Sessions may only start once the avatar has a size
    pub fn assets_ready(&self) -> bool {
        self.avatar_radius > 0.0
    }

    /// Replace the session wholesale and enter `Playing`
    pub fn begin_session(&mut self) {
        self.session = Session::new(&self.tuning, self.avatar_radius);
        self.mode = GameMode::Playing;
    }
}
