//! Sound effects
//!
//! Procedural Web Audio tones, one short envelope per game event. No sample
//! files are shipped. Event-to-sound mapping is platform-neutral; playback
//! exists only in the browser build.

use crate::sim::{CollectibleKind, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Session begins
    Start,
    Flap,
    Coin,
    /// Speed or slow item picked up
    PowerUp,
    /// Shield item picked up
    ShieldUp,
    /// Shield consumed by a collision
    ShieldBreak,
    /// Speed effect ran out
    EffectEnd,
    GameOver,
    /// Game over with a new best
    HighScore,
}

impl SoundEffect {
    /// Sound for a game event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::SessionStarted => SoundEffect::Start,
            GameEvent::Flapped => SoundEffect::Flap,
            GameEvent::CoinCollected { .. } => SoundEffect::Coin,
            GameEvent::PowerUpCollected(CollectibleKind::Shield) => SoundEffect::ShieldUp,
            GameEvent::PowerUpCollected(CollectibleKind::Coin) => SoundEffect::Coin,
            GameEvent::PowerUpCollected(_) => SoundEffect::PowerUp,
            GameEvent::ShieldAbsorbed => SoundEffect::ShieldBreak,
            GameEvent::EffectExpired => SoundEffect::EffectEnd,
            GameEvent::GameOver {
                new_high_score: true,
                ..
            } => SoundEffect::HighScore,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// One tone: frequency sweep under an exponential decay
    struct Tone {
        from_hz: f32,
        to_hz: f32,
        kind: OscillatorType,
        gain: f32,
        delay: f64,
        length: f64,
    }

    impl Tone {
        const fn steady(hz: f32, kind: OscillatorType, gain: f32, delay: f64, length: f64) -> Self {
            Self {
                from_hz: hz,
                to_hz: hz,
                kind,
                gain,
                delay,
                length,
            }
        }

        const fn sweep(from_hz: f32, to_hz: f32, kind: OscillatorType, gain: f32, length: f64) -> Self {
            Self {
                from_hz,
                to_hz,
                kind,
                gain,
                delay: 0.0,
                length,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.6,
                muted: false,
            }
        }

        pub fn toggle_muted(&mut self) {
            self.muted = !self.muted;
            log::info!("Sound {}", if self.muted { "off" } else { "on" });
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            use OscillatorType::{Sine, Square, Triangle};
            let tones: &[Tone] = match effect {
                SoundEffect::Start => &[Tone::sweep(200.0, 600.0, Triangle, 0.3, 0.2)],
                SoundEffect::Flap => &[Tone::sweep(300.0, 520.0, Triangle, 0.15, 0.08)],
                SoundEffect::Coin => &[
                    Tone::steady(988.0, Square, 0.12, 0.0, 0.08),
                    Tone::steady(1319.0, Square, 0.12, 0.07, 0.2),
                ],
                SoundEffect::PowerUp => &[
                    Tone::steady(600.0, Sine, 0.25, 0.0, 0.15),
                    Tone::steady(800.0, Sine, 0.25, 0.08, 0.15),
                    Tone::steady(1000.0, Sine, 0.25, 0.16, 0.15),
                ],
                SoundEffect::ShieldUp => &[
                    Tone::steady(1200.0, Sine, 0.2, 0.0, 0.3),
                    Tone::steady(1800.0, Sine, 0.2, 0.02, 0.3),
                ],
                SoundEffect::ShieldBreak => &[
                    Tone::sweep(150.0, 60.0, Sine, 0.5, 0.2),
                    Tone::steady(1500.0, Square, 0.15, 0.0, 0.1),
                ],
                SoundEffect::EffectEnd => &[Tone::sweep(600.0, 200.0, Sine, 0.2, 0.3)],
                SoundEffect::GameOver => &[
                    Tone::steady(400.0, Sine, 0.3, 0.0, 0.3),
                    Tone::steady(350.0, Sine, 0.3, 0.2, 0.3),
                    Tone::steady(300.0, Sine, 0.3, 0.4, 0.3),
                    Tone::steady(200.0, Sine, 0.3, 0.6, 0.3),
                ],
                SoundEffect::HighScore => &[
                    Tone::steady(500.0, Triangle, 0.25, 0.0, 0.25),
                    Tone::steady(600.0, Triangle, 0.25, 0.08, 0.25),
                    Tone::steady(700.0, Triangle, 0.25, 0.16, 0.25),
                    Tone::steady(800.0, Triangle, 0.25, 0.24, 0.25),
                    Tone::steady(1000.0, Triangle, 0.25, 0.32, 0.25),
                ],
            };
            for tone in tones {
                self.play_tone(ctx, tone);
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.from_hz, tone.kind) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;

            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.length)
                .ok();
            if tone.to_hz != tone.from_hz {
                osc.frequency().set_value_at_time(tone.from_hz, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.to_hz, t + tone.length)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.length + 0.05).ok();
        }
    }
}
