//! Draw command types

use glam::Vec2;

use crate::assets::Sprite;

/// Straight-alpha RGBA, components in 0..=1
pub type Color = [f32; 4];

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One primitive for the sink to draw, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole canvas
    Clear,
    FillRect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    /// Blit a sprite with its top-left corner at `pos`
    Image {
        sprite: Sprite,
        pos: Vec2,
        size: Vec2,
    },
    Text {
        text: String,
        pos: Vec2,
        size_px: f32,
        align: TextAlign,
        color: Color,
    },
}

/// Anything that can draw commands
pub trait DrawSink {
    fn draw(&mut self, command: &DrawCommand);

    fn draw_all(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.draw(command);
        }
    }
}

/// Sink that keeps the commands, for tests and headless runs
impl DrawSink for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(command.clone());
    }
}

/// Format a color for CSS
pub fn css(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const PIPE: Color = [0.0, 0.5, 0.0, 1.0];
    pub const COIN: Color = [1.0, 1.0, 0.0, 1.0];
    pub const SLOW_ITEM: Color = [0.3, 0.6, 1.0, 1.0];
    pub const SPEED_ITEM: Color = [1.0, 0.35, 0.2, 1.0];
    pub const SHIELD_ITEM: Color = [0.75, 0.4, 1.0, 1.0];
    pub const SHIELD_RING: Color = [0.75, 0.4, 1.0, 0.8];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.5];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
}
