//! Frame composition: game state in, draw commands out

use glam::Vec2;

use super::command::{Color, DrawCommand, TextAlign, colors};
use crate::assets::{Sprite, SpriteSheet};
use crate::highscores::Leaderboard;
use crate::sim::{CollectibleKind, GameMode, GameState, SpeedEffect};

const HUD_FONT_PX: f32 = 20.0;
const BANNER_FONT_PX: f32 = 30.0;
/// HUD column, measured from the right edge
const HUD_INSET: f32 = 150.0;
/// Game-over banner is drawn at this fraction of its natural size
const BANNER_SCALE: f32 = 0.5;

/// Build the draw list for the current frame
pub fn compose(state: &GameState, sprites: &SpriteSheet) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear];
    match state.mode {
        GameMode::Start => start_screen(state, &mut out),
        GameMode::Playing => playfield(state, sprites, &mut out),
        GameMode::Restart => summary_screen(state, sprites, &mut out),
    }
    out
}

fn item_color(kind: CollectibleKind) -> Color {
    match kind {
        CollectibleKind::Coin => colors::COIN,
        CollectibleKind::Slow => colors::SLOW_ITEM,
        CollectibleKind::Speed => colors::SPEED_ITEM,
        CollectibleKind::Shield => colors::SHIELD_ITEM,
    }
}

fn text(out: &mut Vec<DrawCommand>, text: String, pos: Vec2, size_px: f32, align: TextAlign) {
    out.push(DrawCommand::Text {
        text,
        pos,
        size_px,
        align,
        color: colors::TEXT,
    });
}

fn overlay(state: &GameState, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::FillRect {
        pos: Vec2::ZERO,
        size: Vec2::new(state.field.width, state.field.height),
        color: colors::OVERLAY,
    });
}

fn start_screen(state: &GameState, out: &mut Vec<DrawCommand>) {
    overlay(state, out);
    let center = Vec2::new(state.field.width, state.field.height) / 2.0;
    text(
        out,
        "Press Space or Click to Start".to_string(),
        center,
        BANNER_FONT_PX,
        TextAlign::Center,
    );
}

fn playfield(state: &GameState, sprites: &SpriteSheet, out: &mut Vec<DrawCommand>) {
    let session = &state.session;
    let field = state.field;
    let avatar = &session.avatar;

    if let Some(size) = sprites.size(Sprite::Avatar) {
        let size = Vec2::new(size.width, size.height);
        out.push(DrawCommand::Image {
            sprite: Sprite::Avatar,
            pos: avatar.pos - size / 2.0,
            size,
        });
    }
    if session.power_ups.shield {
        out.push(DrawCommand::StrokeCircle {
            center: avatar.pos,
            radius: avatar.radius + 4.0,
            width: 3.0,
            color: colors::SHIELD_RING,
        });
    }

    for pipe in &session.pipes {
        out.push(DrawCommand::FillRect {
            pos: Vec2::new(pipe.x, 0.0),
            size: Vec2::new(pipe.width, pipe.top_height),
            color: colors::PIPE,
        });
        let bottom = pipe.bottom_start(session.pipe_gap);
        if bottom < field.height {
            out.push(DrawCommand::FillRect {
                pos: Vec2::new(pipe.x, bottom),
                size: Vec2::new(pipe.width, field.height - bottom),
                color: colors::PIPE,
            });
        }
    }

    for item in &session.collectibles {
        out.push(DrawCommand::FillCircle {
            center: item.pos,
            radius: item.radius,
            color: item_color(item.kind),
        });
    }

    let x = field.width - HUD_INSET;
    let mut y = 30.0;
    let mut hud = |line: String| {
        text(out, line, Vec2::new(x, y), HUD_FONT_PX, TextAlign::Left);
        y += 30.0;
    };
    hud(format!("Score: {}m", session.score));
    hud(format!("Coins: {}", session.coins));
    match session.power_ups.speed {
        SpeedEffect::None => {}
        SpeedEffect::Slow(s) => hud(format!("Slow: {}s", s)),
        SpeedEffect::Fast(s) => hud(format!("Fast: {}s", s)),
    }
    if session.power_ups.shield {
        hud("Shield".to_string());
    }
}

fn summary_screen(state: &GameState, sprites: &SpriteSheet, out: &mut Vec<DrawCommand>) {
    overlay(state, out);
    let center = Vec2::new(state.field.width, state.field.height) / 2.0;

    if let Some(size) = sprites.size(Sprite::GameOver) {
        let size = Vec2::new(size.width, size.height) * BANNER_SCALE;
        out.push(DrawCommand::Image {
            sprite: Sprite::GameOver,
            pos: Vec2::new(center.x - size.x / 2.0, center.y - size.y / 2.0 - 150.0),
            size,
        });
    }

    let session = &state.session;
    let lines = [
        format!("Game Over! Score: {}m", session.score),
        format!("High Score: {}m", state.high_score),
        format!("Coins Collected: {}", session.coins),
        "Press \"R\" to Restart".to_string(),
    ];
    for (i, line) in lines.into_iter().enumerate() {
        let y = center.y - 30.0 + i as f32 * 30.0;
        text(out, line, Vec2::new(center.x, y), BANNER_FONT_PX, TextAlign::Center);
    }
}

/// Shared-table lines drawn under the summary. Empty until a table is known.
pub fn leaderboard_lines(
    state: &GameState,
    board: &Leaderboard,
    wallet: Option<&str>,
) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    let Some(top) = board.top_score() else {
        return out;
    };
    let x = state.field.width / 2.0;
    let mut y = state.field.height / 2.0 + 100.0;
    text(&mut out, format!("Top Score: {}m", top), Vec2::new(x, y), HUD_FONT_PX, TextAlign::Center);
    if let Some(best) = wallet.and_then(|w| board.best_for(w)) {
        y += 26.0;
        text(&mut out, format!("Your Best: {}m", best), Vec2::new(x, y), HUD_FONT_PX, TextAlign::Center);
    }
    out
}
