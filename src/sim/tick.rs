//! One frame of the game
//!
//! `tick` is the game state machine. In `Playing` it runs the frame in a
//! fixed order: flap, effect countdown, physics, scroll + spawn, collision,
//! pickups, then score and difficulty. Collision precedes pickup, so an
//! avatar that dies and touches a coin on the same frame just dies.

use super::state::{CollectibleKind, GameEvent, GameMode, GameState};
use super::{collision, difficulty, physics, powerup, spawner};

/// Discrete input sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Click or tap on the canvas
    Pointer,
    /// Space
    FlapKey,
    /// R
    RestartKey,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave the start screen
    pub start: bool,
    /// Flap while playing
    pub flap: bool,
    /// Leave the game-over screen
    pub restart: bool,
    /// Wall-clock milliseconds since the previous frame
    pub elapsed_ms: f64,
}

impl TickInput {
    /// Fold an input event into this frame's triggers. Which trigger matters
    /// is decided by the mode at tick time; the rest are ignored.
    pub fn record(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer => {
                self.start = true;
                self.flap = true;
                self.restart = true;
            }
            InputEvent::FlapKey => {
                self.start = true;
                self.flap = true;
            }
            InputEvent::RestartKey => self.restart = true,
        }
    }

    /// Clear one-shot triggers after a frame consumed them
    pub fn clear_triggers(&mut self) {
        self.start = false;
        self.flap = false;
        self.restart = false;
    }
}

/// Advance the game by one frame. Returns what happened, in order.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match state.mode {
        GameMode::Start => {
            if input.start {
                begin(state, &mut events);
            }
        }
        GameMode::Restart => {
            if input.restart {
                begin(state, &mut events);
            }
        }
        GameMode::Playing => step(state, input, &mut events),
    }
    events
}

fn begin(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.assets_ready() {
        log::debug!("Avatar sprite not loaded yet, ignoring start");
        return;
    }
    state.begin_session();
    log::info!("Session started");
    events.push(GameEvent::SessionStarted);
}

fn step(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let GameState {
        tuning,
        field,
        mode,
        session,
        high_score,
        rng,
        ..
    } = state;

    if input.flap {
        physics::flap(&mut session.avatar);
        events.push(GameEvent::Flapped);
    }

    if powerup::advance_clock(&mut session.power_ups, input.elapsed_ms) {
        log::debug!("Speed effect expired");
        events.push(GameEvent::EffectExpired);
    }

    physics::integrate(&mut session.avatar);

    let speed = powerup::scroll_speed(&session.power_ups, tuning);
    spawner::scroll(session, speed);
    let frame = session.frame;
    spawner::spawn(session, frame, *field, tuning, rng);

    if let Some(hit) = collision::detect(&session.avatar, &session.pipes, session.pipe_gap, *field) {
        if powerup::absorb_hit(&mut session.power_ups) {
            log::debug!("Shield absorbed {:?}", hit);
            events.push(GameEvent::ShieldAbsorbed);
        } else {
            let score = session.score;
            let new_high_score = score > *high_score;
            if new_high_score {
                *high_score = score;
            }
            *mode = GameMode::Restart;
            log::info!(
                "Game over ({:?}): {}m, {} coins{}",
                hit,
                score,
                session.coins,
                if new_high_score { ", new high score" } else { "" }
            );
            events.push(GameEvent::GameOver {
                score,
                coins: session.coins,
                new_high_score,
            });
            return;
        }
    }

    for kind in collision::take_pickups(&session.avatar, &mut session.collectibles) {
        match kind {
            CollectibleKind::Coin => {
                session.coins += 1;
                events.push(GameEvent::CoinCollected {
                    total: session.coins,
                });
            }
            power_up => {
                powerup::collect(&mut session.power_ups, power_up, tuning);
                log::debug!("Collected {:?}", power_up);
                events.push(GameEvent::PowerUpCollected(power_up));
            }
        }
    }

    session.frame += 1;
    session.score = session.frame / tuning.frames_per_point;
    session.pipe_gap = difficulty::ramp_gap(session.pipe_gap, session.frame, tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Collectible, Field, Pipe, SpeedEffect};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const AVATAR: f32 = 40.0;

    fn pointer() -> TickInput {
        let mut input = TickInput::default();
        input.record(InputEvent::Pointer);
        input
    }

    fn key(event: InputEvent) -> TickInput {
        let mut input = TickInput::default();
        input.record(event);
        input
    }

    /// Zero gravity so the avatar hovers at its start height
    fn hovering() -> GameState {
        let tuning = Tuning {
            gravity: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(tuning, Field::default(), 0, 42);
        state.set_avatar_sprite(AVATAR, AVATAR);
        tick(&mut state, &pointer());
        assert_eq!(state.mode, GameMode::Playing);
        state
    }

    /// Run frames with pipes removed so nothing can kill the avatar
    fn cruise(state: &mut GameState, frames: u64) {
        for _ in 0..frames {
            state.session.pipes.clear();
            tick(state, &TickInput::default());
        }
    }

    fn pipe_on_avatar() -> Pipe {
        Pipe {
            x: 95.0,
            top_height: 300.0,
            width: 20.0,
        }
    }

    #[test]
    fn test_start_needs_sprite() {
        let mut state = GameState::new(Tuning::default(), Field::default(), 0, 1);
        let events = tick(&mut state, &pointer());
        assert!(events.is_empty());
        assert_eq!(state.mode, GameMode::Start);

        state.set_avatar_sprite(AVATAR, AVATAR);
        let events = tick(&mut state, &key(InputEvent::FlapKey));
        assert_eq!(events, vec![GameEvent::SessionStarted]);
        assert_eq!(state.mode, GameMode::Playing);
        // The starting frame does not simulate
        assert_eq!(state.session.frame, 0);
    }

    #[test]
    fn test_restart_key_ignored_on_start_screen() {
        let mut state = GameState::new(Tuning::default(), Field::default(), 0, 1);
        state.set_avatar_sprite(AVATAR, AVATAR);
        tick(&mut state, &key(InputEvent::RestartKey));
        assert_eq!(state.mode, GameMode::Start);
    }

    #[test]
    fn test_free_fall_scenario() {
        let mut state = GameState::new(Tuning::default(), Field::default(), 0, 1);
        state.set_avatar_sprite(AVATAR, AVATAR);
        tick(&mut state, &pointer());

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        let avatar = &state.session.avatar;
        assert!((avatar.velocity - 2.0).abs() < 1e-5);
        assert!((avatar.pos.y - 161.0).abs() < 1e-4);
        assert_eq!(state.session.frame, 10);
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_flap_applies_before_gravity() {
        let mut state = hovering();
        let events = tick(&mut state, &key(InputEvent::FlapKey));
        assert_eq!(events, vec![GameEvent::Flapped]);
        assert_eq!(state.session.avatar.velocity, state.tuning.lift);
        assert_eq!(state.session.avatar.pos.y, 145.0);
    }

    #[test]
    fn test_floor_ends_session_and_records_high_score() {
        let mut state = GameState::new(Tuning::default(), Field::default(), 3, 1);
        state.set_avatar_sprite(AVATAR, AVATAR);
        tick(&mut state, &pointer());

        let mut last = Vec::new();
        while state.mode == GameMode::Playing {
            state.session.pipes.clear();
            last = tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.mode, GameMode::Restart);
        let score = state.session.score;
        assert!(score > 3);
        assert_eq!(state.high_score, score);
        assert_eq!(
            last,
            vec![GameEvent::GameOver {
                score,
                coins: 0,
                new_high_score: true
            }]
        );
    }

    #[test]
    fn test_game_over_below_high_score() {
        let mut state = hovering();
        state.high_score = 500;
        state.session.pipes.push(pipe_on_avatar());
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Restart);
        assert_eq!(state.high_score, 500);
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver {
                new_high_score: false,
                ..
            })
        ));
    }

    #[test]
    fn test_shield_absorbs_boundary_collision() {
        let mut state = hovering();
        state.session.power_ups.shield = true;
        // Half the avatar below the floor
        state.session.avatar.pos.y = state.field.height;

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Playing);
        assert!(!state.session.power_ups.shield);
        assert!(events.contains(&GameEvent::ShieldAbsorbed));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Shield spent and still out of bounds
        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Restart);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_shield_absorbs_one_collision_only() {
        let mut state = hovering();
        state.session.power_ups.shield = true;
        state.session.pipes.push(pipe_on_avatar());

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Playing);
        assert!(!state.session.power_ups.shield);
        assert!(events.contains(&GameEvent::ShieldAbsorbed));

        // Still inside the pipe next frame: no second save
        tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Restart);
    }

    #[test]
    fn test_death_beats_pickup_on_same_frame() {
        let mut state = hovering();
        state.session.pipes.push(pipe_on_avatar());
        state.session.collectibles.push(Collectible {
            pos: state.session.avatar.pos,
            radius: 10.0,
            kind: CollectibleKind::Coin,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Restart);
        assert_eq!(state.session.coins, 0);
    }

    #[test]
    fn test_coin_pickup_counts() {
        let mut state = hovering();
        state.session.collectibles.push(Collectible {
            pos: state.session.avatar.pos + Vec2::new(4.0, 0.0),
            radius: 10.0,
            kind: CollectibleKind::Coin,
        });
        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::CoinCollected { total: 1 }));
        assert_eq!(state.session.coins, 1);
    }

    #[test]
    fn test_slow_item_changes_speed_next_frame() {
        let mut state = hovering();
        cruise(&mut state, 1);
        state.session.collectibles.push(Collectible {
            pos: state.session.avatar.pos,
            radius: 15.0,
            kind: CollectibleKind::Slow,
        });
        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::PowerUpCollected(CollectibleKind::Slow)));
        assert_eq!(state.session.power_ups.speed, SpeedEffect::Slow(10));

        state.session.pipes = vec![Pipe {
            x: 500.0,
            top_height: 10.0,
            width: 20.0,
        }];
        tick(&mut state, &TickInput::default());
        assert_eq!(state.session.pipes[0].x, 500.0 - state.tuning.slow_speed);
    }

    #[test]
    fn test_speed_effect_counts_down_on_wall_clock() {
        let mut state = hovering();
        state.session.power_ups.speed = SpeedEffect::Fast(10);

        let second = TickInput {
            elapsed_ms: 1000.0,
            ..Default::default()
        };
        let mut expired_at = None;
        for i in 1..=12 {
            state.session.pipes.clear();
            let events = tick(&mut state, &second);
            if events.contains(&GameEvent::EffectExpired) {
                expired_at = Some(i);
                break;
            }
        }
        assert_eq!(expired_at, Some(10));
        assert_eq!(state.session.power_ups.speed, SpeedEffect::None);
    }

    #[test]
    fn test_gap_narrows_then_resets_on_restart() {
        let mut state = hovering();
        cruise(&mut state, 900);
        assert_eq!(state.session.pipe_gap, 385.0);

        state.session.pipes.push(pipe_on_avatar());
        state.session.collectibles.clear();
        state.session.power_ups.shield = false;
        state.session.coins = 4;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.mode, GameMode::Restart);

        // Flap is meaningless here
        tick(&mut state, &key(InputEvent::FlapKey));
        assert_eq!(state.mode, GameMode::Restart);

        let events = tick(&mut state, &key(InputEvent::RestartKey));
        assert_eq!(events, vec![GameEvent::SessionStarted]);
        assert_eq!(state.mode, GameMode::Playing);
        assert_eq!(state.session.pipe_gap, state.tuning.initial_gap);
        assert_eq!(state.session.coins, 0);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.power_ups, Default::default());
        assert!(state.session.pipes.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = hovering();
        let mut b = hovering();
        for i in 0..400 {
            let input = TickInput {
                flap: i % 40 == 0,
                elapsed_ms: 16.0,
                ..Default::default()
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.mode, b.mode);
        assert_eq!(a.session.frame, b.session.frame);
        assert_eq!(a.session.pipes, b.session.pipes);
        assert_eq!(a.session.collectibles, b.session.collectibles);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_score_is_frames_over_ten(frames in 0u64..2_000) {
            let mut state = hovering();
            let mut prev = 0;
            for _ in 0..frames {
                state.session.pipes.clear();
                tick(&mut state, &TickInput::default());
                prop_assert!(state.session.score >= prev);
                prev = state.session.score;
            }
            prop_assert_eq!(state.mode, GameMode::Playing);
            prop_assert_eq!(state.session.frame, frames);
            prop_assert_eq!(state.session.score, frames / 10);
        }
    }
}
