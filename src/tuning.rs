//! Data-driven game balance
//!
//! Every simulation constant lives here so a build can be rebalanced from
//! LocalStorage without recompiling. Units are canvas pixels and frames.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Avatar ===
    /// Fixed horizontal position of the avatar
    pub avatar_x: f32,
    /// Vertical position at session start
    pub avatar_start_y: f32,
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub lift: f32,

    // === Obstacles ===
    pub pipe_width: f32,
    /// Frames between pipe spawns
    pub pipe_every: u64,
    pub initial_gap: f32,
    pub min_gap: f32,
    /// Gap shrink per ramp step
    pub gap_step: f32,
    /// Frames between ramp steps
    pub gap_every: u64,

    // === Collectibles ===
    pub coin_radius: f32,
    pub power_up_radius: f32,
    /// Frames between power-up spawn attempts
    pub power_up_every: u64,
    /// Seconds a slow/fast effect lasts
    pub effect_seconds: u32,

    // === Scroll speed (px/frame) ===
    pub normal_speed: f32,
    pub slow_speed: f32,
    pub fast_speed: f32,

    // === Scoring ===
    /// Frames per distance point
    pub frames_per_point: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            avatar_x: 100.0,
            avatar_start_y: 150.0,
            gravity: 0.2,
            lift: -5.0,

            pipe_width: 20.0,
            pipe_every: 150,
            initial_gap: 400.0,
            min_gap: 160.0,
            gap_step: 5.0,
            gap_every: 300,

            coin_radius: 10.0,
            power_up_radius: 15.0,
            power_up_every: 600,
            effect_seconds: 10,

            normal_speed: 2.0,
            slow_speed: 1.0,
            fast_speed: 4.0,

            frames_per_point: 10,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flappy_bobo_tuning";

    /// Reject combinations the simulation cannot honour
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.pipe_every > 0, "pipe_every must be positive");
        ensure!(self.gap_every > 0, "gap_every must be positive");
        ensure!(self.frames_per_point > 0, "frames_per_point must be positive");
        ensure!(
            self.power_up_every > self.pipe_every,
            "power_up_every ({}) must exceed pipe_every ({})",
            self.power_up_every,
            self.pipe_every
        );
        ensure!(
            self.min_gap > 0.0 && self.min_gap <= self.initial_gap,
            "min_gap ({}) must be in (0, initial_gap ({})]",
            self.min_gap,
            self.initial_gap
        );
        ensure!(self.gap_step >= 0.0, "gap_step must not be negative");
        ensure!(
            self.normal_speed > 0.0 && self.slow_speed > 0.0 && self.fast_speed > 0.0,
            "scroll speeds must be positive"
        );
        ensure!(self.pipe_width > 0.0, "pipe_width must be positive");
        Ok(())
    }

    fn parse(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate().context("invalid tuning")?;
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::parse(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from storage");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring stored tuning: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Tuning saved");
        Ok(())
    }
}
