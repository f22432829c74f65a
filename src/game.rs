//! Game controller
//!
//! Owns the simulation plus everything around it that has side effects:
//! persistence of the best score, score submission, sprite loading and the
//! frame scheduler. Platform glue feeds it input events and frame times and
//! hands it a draw sink; nothing in here touches the DOM.

use crate::assets::{AssetError, Sprite, SpriteSheet};
use crate::highscores::{BestScore, HighScoreRecord, Leaderboard};
use crate::platform::{KeyValueStore, ScoreSubmitter};
use crate::renderer::scene::{compose, leaderboard_lines};
use crate::renderer::DrawSink;
use crate::scheduler::FrameScheduler;
use crate::sim::{Field, GameEvent, GameMode, GameState, InputEvent, TickInput, autopilot, tick};
use crate::tuning::Tuning;

/// Storage key holding the connected wallet address, if any
pub const IDENTITY_KEY: &str = "walletAddress";

pub struct Game {
    pub state: GameState,
    sprites: SpriteSheet,
    best: BestScore,
    store: Box<dyn KeyValueStore>,
    submitter: Box<dyn ScoreSubmitter>,
    identity: Option<String>,
    leaderboard: Leaderboard,
    input: TickInput,
    autopilot: bool,
    scheduler: FrameScheduler,
}

impl Game {
    /// Build a controller. The best score and identity come from `store`.
    pub fn new(
        tuning: Tuning,
        field: Field,
        store: Box<dyn KeyValueStore>,
        submitter: Box<dyn ScoreSubmitter>,
        seed: u64,
    ) -> Self {
        let best = BestScore::load(store.as_ref());
        let identity = store
            .get(IDENTITY_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(wallet) = &identity {
            log::info!("Submitting scores as {}", wallet);
        }
        Self {
            state: GameState::new(tuning, field, best.value, seed),
            sprites: SpriteSheet::new(),
            best,
            store,
            submitter,
            identity,
            leaderboard: Leaderboard::default(),
            input: TickInput::default(),
            autopilot: false,
            scheduler: FrameScheduler::new(),
        }
    }

    pub fn set_identity(&mut self, wallet: Option<String>) {
        self.identity = wallet.filter(|s| !s.trim().is_empty());
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Replace the shared table shown on the summary screen
    pub fn set_leaderboard(&mut self, leaderboard: Leaderboard) {
        log::info!(
            "Leaderboard loaded: {} rows, top {:?}",
            leaderboard.entries.len(),
            leaderboard.top_score()
        );
        self.leaderboard = leaderboard;
    }

    pub fn best_score(&self) -> u64 {
        self.best.value
    }

    pub fn sprites(&self) -> &SpriteSheet {
        &self.sprites
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// A sprite finished decoding
    pub fn sprite_loaded(&mut self, sprite: Sprite, width: f32, height: f32) -> Result<(), AssetError> {
        let size = self.sprites.loaded(sprite, width, height)?;
        if sprite == Sprite::Avatar {
            self.state.set_avatar_sprite(size.width, size.height);
        }
        Ok(())
    }

    pub fn sprite_failed(&mut self, sprite: Sprite) -> AssetError {
        self.sprites.failed(sprite)
    }

    /// Queue an input event for the next frame
    pub fn record(&mut self, event: InputEvent) {
        self.input.record(event);
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Autopilot: {}", if on { "on" } else { "off" });
        }
        self.autopilot = on;
    }

    pub fn toggle_autopilot(&mut self) {
        self.set_autopilot(!self.autopilot);
    }

    /// Run one frame. `elapsed_ms` is wall-clock time since the previous one.
    pub fn frame(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        self.input.elapsed_ms = elapsed_ms;
        if self.autopilot && (self.state.mode == GameMode::Playing || self.sprites.ready()) {
            match self.state.mode {
                GameMode::Start => self.input.start = true,
                GameMode::Playing => self.input.flap |= autopilot::wants_flap(&self.state),
                GameMode::Restart => self.input.restart = true,
            }
        }

        // Start and restart wait for every sprite, not just the avatar
        if self.state.mode != GameMode::Playing && !self.sprites.ready() {
            if self.input.start || self.input.restart {
                log::debug!("Sprites not ready, ignoring start");
            }
            self.input.start = false;
            self.input.restart = false;
        }

        let events = tick(&mut self.state, &self.input);
        self.input.clear_triggers();

        for event in &events {
            self.handle(event);
        }
        events
    }

    fn handle(&mut self, event: &GameEvent) {
        let GameEvent::GameOver { score, .. } = *event else {
            return;
        };
        if self.best.record(score) {
            if let Err(e) = self.best.save(self.store.as_mut()) {
                log::error!("{:#}", e);
            }
        }
        if let Some(wallet) = &self.identity {
            self.submitter.submit(HighScoreRecord::new(wallet.clone(), score));
        }
    }

    /// Draw the current frame
    pub fn render(&self, sink: &mut dyn DrawSink) {
        sink.draw_all(&compose(&self.state, &self.sprites));
        if self.state.mode == GameMode::Restart {
            sink.draw_all(&leaderboard_lines(
                &self.state,
                &self.leaderboard,
                self.identity.as_deref(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use crate::renderer::DrawCommand;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<HighScoreRecord>>>);

    impl ScoreSubmitter for Recorder {
        fn submit(&self, record: HighScoreRecord) {
            self.0.borrow_mut().push(record);
        }
    }

    /// Store that shares its map with the test so writes can be inspected
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.borrow_mut().set(key, value)
        }
    }

    fn game_with(store: SharedStore, submitted: Recorder) -> Game {
        let mut game = Game::new(
            Tuning::default(),
            Field::default(),
            Box::new(store),
            Box::new(submitted),
            3,
        );
        game.sprite_loaded(Sprite::Avatar, 40.0, 40.0).unwrap();
        game.sprite_loaded(Sprite::GameOver, 200.0, 100.0).unwrap();
        game
    }

    /// Start a session and let the avatar fall to the floor
    fn play_until_over(game: &mut Game) -> Vec<GameEvent> {
        game.record(InputEvent::FlapKey);
        let mut all = game.frame(16.0);
        for _ in 0..1_000 {
            all.extend(game.frame(16.0));
            if game.state.mode == GameMode::Restart {
                break;
            }
        }
        all
    }

    #[test]
    fn test_start_requires_avatar_sprite() {
        let mut game = Game::new(
            Tuning::default(),
            Field::default(),
            Box::new(MemoryStore::new()),
            Box::new(Recorder::default()),
            1,
        );
        game.record(InputEvent::Pointer);
        assert!(game.frame(16.0).is_empty());
        assert_eq!(game.state.mode, GameMode::Start);
    }

    #[test]
    fn test_failed_banner_blocks_start() {
        let mut game = Game::new(
            Tuning::default(),
            Field::default(),
            Box::new(MemoryStore::new()),
            Box::new(Recorder::default()),
            1,
        );
        game.sprite_loaded(Sprite::Avatar, 40.0, 40.0).unwrap();
        game.sprite_failed(Sprite::GameOver);

        game.record(InputEvent::Pointer);
        assert!(game.frame(16.0).is_empty());
        game.record(InputEvent::FlapKey);
        assert!(game.frame(16.0).is_empty());
        assert_eq!(game.state.mode, GameMode::Start);
    }

    #[test]
    fn test_banner_failure_after_game_over_blocks_restart() {
        let mut game = game_with(SharedStore::default(), Recorder::default());
        play_until_over(&mut game);
        assert_eq!(game.state.mode, GameMode::Restart);

        game.sprite_failed(Sprite::GameOver);
        game.record(InputEvent::RestartKey);
        assert!(game.frame(16.0).is_empty());
        assert_eq!(game.state.mode, GameMode::Restart);
    }

    #[test]
    fn test_autopilot_waits_for_sprites() {
        let mut game = Game::new(
            Tuning::default(),
            Field::default(),
            Box::new(MemoryStore::new()),
            Box::new(Recorder::default()),
            1,
        );
        game.set_autopilot(true);
        game.sprite_loaded(Sprite::Avatar, 40.0, 40.0).unwrap();
        for _ in 0..5 {
            assert!(game.frame(16.0).is_empty());
        }
        assert_eq!(game.state.mode, GameMode::Start);

        game.sprite_loaded(Sprite::GameOver, 200.0, 100.0).unwrap();
        assert_eq!(game.frame(16.0), vec![GameEvent::SessionStarted]);
    }

    #[test]
    fn test_game_over_persists_new_best_and_submits() {
        let store = SharedStore::default();
        store.0.borrow_mut().set(IDENTITY_KEY, "0xabc").unwrap();
        let submitted = Recorder::default();
        let mut game = game_with(store.clone(), submitted.clone());

        let events = play_until_over(&mut game);
        let Some(GameEvent::GameOver { score, new_high_score, .. }) = events.last().cloned() else {
            panic!("expected game over, got {:?}", events.last());
        };
        assert!(score > 0);
        assert!(new_high_score);
        assert_eq!(game.best_score(), score);
        assert_eq!(
            store.0.borrow().get(BestScore::STORAGE_KEY),
            Some(score.to_string())
        );
        assert_eq!(*submitted.0.borrow(), vec![HighScoreRecord::new("0xabc", score)]);
    }

    #[test]
    fn test_lower_score_keeps_stored_best() {
        let store = SharedStore::default();
        store.0.borrow_mut().set(BestScore::STORAGE_KEY, "9999").unwrap();
        let submitted = Recorder::default();
        let mut game = game_with(store.clone(), submitted.clone());

        play_until_over(&mut game);
        assert_eq!(game.best_score(), 9999);
        assert_eq!(game.state.high_score, 9999);
        assert_eq!(
            store.0.borrow().get(BestScore::STORAGE_KEY),
            Some("9999".to_string())
        );
        // No wallet connected
        assert!(submitted.0.borrow().is_empty());
    }

    #[test]
    fn test_triggers_are_cleared_after_a_frame() {
        let mut game = game_with(SharedStore::default(), Recorder::default());
        game.record(InputEvent::FlapKey);
        assert_eq!(game.frame(16.0), vec![GameEvent::SessionStarted]);
        // The start key press must not also flap on the first playing frame
        assert!(!game.frame(16.0).contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_autopilot_survives_and_restarts() {
        let mut game = game_with(SharedStore::default(), Recorder::default());
        game.set_autopilot(true);
        let events = game.frame(16.0);
        assert_eq!(events, vec![GameEvent::SessionStarted]);
        // The first pipe reaches the avatar around frame 340; until then only
        // the floor and ceiling can end the run
        for _ in 0..300 {
            let events = game.frame(16.0);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        }
        assert_eq!(game.state.session.frame, 300);
    }

    #[test]
    fn test_render_draws_current_mode() {
        let game = game_with(SharedStore::default(), Recorder::default());
        let mut sink: Vec<DrawCommand> = Vec::new();
        game.render(&mut sink);
        assert_eq!(sink.first(), Some(&DrawCommand::Clear));
        assert!(sink.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text.starts_with("Press Space")
        )));
    }

    #[test]
    fn test_summary_shows_leaderboard() {
        let store = SharedStore::default();
        store.0.borrow_mut().set(IDENTITY_KEY, "0xabc").unwrap();
        let mut game = game_with(store, Recorder::default());
        game.set_leaderboard(Leaderboard::from_records(vec![
            HighScoreRecord::new("0xabc", 12),
            HighScoreRecord::new("0xdef", 80),
        ]));
        play_until_over(&mut game);

        let mut sink: Vec<DrawCommand> = Vec::new();
        game.render(&mut sink);
        let texts: Vec<&str> = sink
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Top Score: 80m"));
        assert!(texts.contains(&"Your Best: 12m"));
    }
}
