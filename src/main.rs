//! Flappy BabyBobo entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_bobo::assets::Sprite;
    use flappy_bobo::audio::{AudioManager, SoundEffect};
    use flappy_bobo::consts::FIELD_HEIGHT_FRACTION;
    use flappy_bobo::platform::{HttpSubmitter, LocalStore, fetch_leaderboard};
    use flappy_bobo::renderer::CanvasSink;
    use flappy_bobo::sim::{Field, InputEvent};
    use flappy_bobo::{Game, Tuning};

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        sink: Option<CanvasSink>,
        audio: AudioManager,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;

            for event in self.game.frame(elapsed) {
                self.audio.play(SoundEffect::for_event(&event));
            }
            if let Some(sink) = self.sink.as_mut() {
                self.game.render(sink);
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).context("failed to init logger")?;

        log::info!("Flappy BabyBobo starting...");

        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| anyhow!("no canvas"))?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        // Full width, 60% of the window height
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(flappy_bobo::consts::DEFAULT_FIELD_WIDTH as f64);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .map(|h| h * FIELD_HEIGHT_FRACTION)
            .unwrap_or(flappy_bobo::consts::DEFAULT_FIELD_HEIGHT as f64);
        let dpr = window.device_pixel_ratio();
        canvas.set_width((width * dpr) as u32);
        canvas.set_height((height * dpr) as u32);
        let _ = canvas.set_attribute("style", &format!("width:{}px;height:{}px", width, height));

        let store = LocalStore::open()?;
        let tuning = Tuning::load(&store);
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            tuning,
            Field {
                width: width as f32,
                height: height as f32,
            },
            Box::new(store),
            Box::new(HttpSubmitter::new(HttpSubmitter::DEFAULT_ENDPOINT)),
            seed,
        );
        log::info!("Game initialized with seed: {}", seed);

        let avatar = HtmlImageElement::new().map_err(|e| anyhow!("{:?}", e))?;
        let game_over = HtmlImageElement::new().map_err(|e| anyhow!("{:?}", e))?;
        let sink = CanvasSink::new(&canvas, width, height, dpr, avatar.clone(), game_over.clone())?;

        let app = Rc::new(RefCell::new(App {
            game,
            sink: Some(sink),
            audio: AudioManager::new(),
            last_time: 0.0,
        }));

        load_sprite(&avatar, Sprite::Avatar, app.clone());
        load_sprite(&game_over, Sprite::GameOver, app.clone());

        load_leaderboard(app.clone());
        setup_input_handlers(&canvas, app.clone());
        setup_teardown(app.clone());

        request_animation_frame(app);

        log::info!("Flappy BabyBobo running!");
        Ok(())
    }

    /// Report the sprite's natural size to the game once the browser decodes it
    fn load_sprite(img: &HtmlImageElement, sprite: Sprite, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let img_clone = img.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let width = img_clone.natural_width() as f32;
                let height = img_clone.natural_height() as f32;
                if let Err(e) = app.borrow_mut().game.sprite_loaded(sprite, width, height) {
                    log::error!("{}", e);
                }
            });
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut()>::new(move || {
                app.borrow_mut().game.sprite_failed(sprite);
            });
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        img.set_src(sprite.path());
    }

    /// Fetch the shared table in the background; the summary shows it once known
    fn load_leaderboard(app: Rc<RefCell<App>>) {
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_leaderboard(HttpSubmitter::DEFAULT_ENDPOINT).await {
                Ok(board) => app.borrow_mut().game.set_leaderboard(board),
                Err(e) => log::warn!("Leaderboard unavailable: {:#}", e),
            }
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.record(InputEvent::Pointer);
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.record(InputEvent::Pointer);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            match event.code().as_str() {
                "Space" => {
                    // Keep the page from scrolling
                    event.prevent_default();
                    a.game.record(InputEvent::FlapKey);
                }
                "KeyR" => a.game.record(InputEvent::RestartKey),
                "KeyI" => a.game.toggle_autopilot(),
                "KeyM" => a.audio.toggle_muted(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the frame loop when the page goes away
    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
            let mut a = app.borrow_mut();
            a.game.scheduler().stop();
            a.sink = None;
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.frame(time);
            a.game.scheduler().frame_done()
        };

        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:#}", e);
        web_sys::console::error_1(&format!("Startup failed: {:#}", e).into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy BabyBobo (native) starting...");
    log::info!("The browser build is the real game - run with `trunk serve`; this is a headless autopilot run");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    println!("\nRunning autopilot demo (seed {})...", seed);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use flappy_bobo::assets::Sprite;
    use flappy_bobo::consts::NOMINAL_FRAME_MS;
    use flappy_bobo::platform::{LogSubmitter, MemoryStore};
    use flappy_bobo::renderer::DrawCommand;
    use flappy_bobo::sim::{Field, GameEvent};
    use flappy_bobo::{Game, Tuning};

    /// Ten minutes of play at 60 Hz
    const MAX_FRAMES: u32 = 36_000;

    pub fn run(seed: u64) {
        let mut game = Game::new(
            Tuning::default(),
            Field::default(),
            Box::new(MemoryStore::new()),
            Box::new(LogSubmitter),
            seed,
        );
        // Stand-ins for the decoded sprite sizes
        for (sprite, w, h) in [(Sprite::Avatar, 50.0, 40.0), (Sprite::GameOver, 400.0, 200.0)] {
            if let Err(e) = game.sprite_loaded(sprite, w, h) {
                log::error!("{}", e);
                return;
            }
        }
        game.set_autopilot(true);

        let mut flaps = 0u32;
        let mut power_ups = 0u32;
        let mut shields = 0u32;
        for _ in 0..MAX_FRAMES {
            for event in game.frame(NOMINAL_FRAME_MS) {
                match event {
                    GameEvent::Flapped => flaps += 1,
                    GameEvent::PowerUpCollected(_) => power_ups += 1,
                    GameEvent::ShieldAbsorbed => shields += 1,
                    GameEvent::GameOver { score, coins, .. } => {
                        let mut frame: Vec<DrawCommand> = Vec::new();
                        game.render(&mut frame);
                        println!(
                            "Game over: {}m, {} coins, {} flaps, {} power-ups, {} shield saves ({} draw commands on the summary screen)",
                            score,
                            coins,
                            flaps,
                            power_ups,
                            shields,
                            frame.len()
                        );
                        return;
                    }
                    _ => {}
                }
            }
        }
        println!(
            "Autopilot survived {} frames: {}m, {} coins",
            MAX_FRAMES, game.state.session.score, game.state.session.coins
        );
    }
}
