//! Canvas 2D sink
//!
//! Draws `DrawCommand`s onto a browser canvas. Coordinates are in CSS pixels;
//! the context transform absorbs the device pixel ratio.

use anyhow::anyhow;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::command::{DrawCommand, DrawSink, TextAlign, css};
use crate::assets::Sprite;

pub struct CanvasSink {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    avatar: HtmlImageElement,
    game_over: HtmlImageElement,
}

impl CanvasSink {
    /// Acquire the 2D context. `width`/`height` are the CSS size of the canvas.
    pub fn new(
        canvas: &HtmlCanvasElement,
        width: f64,
        height: f64,
        dpr: f64,
        avatar: HtmlImageElement,
        game_over: HtmlImageElement,
    ) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("get_context failed: {:?}", e))?
            .ok_or_else(|| anyhow!("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("context is not CanvasRenderingContext2d"))?;
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(|e| anyhow!("set_transform failed: {:?}", e))?;
        Ok(Self {
            ctx,
            width,
            height,
            avatar,
            game_over,
        })
    }

    fn image(&self, sprite: Sprite) -> &HtmlImageElement {
        match sprite {
            Sprite::Avatar => &self.avatar,
            Sprite::GameOver => &self.game_over,
        }
    }

    fn circle(&self, x: f32, y: f32, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            x as f64,
            y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
    }
}

impl DrawSink for CanvasSink {
    fn draw(&mut self, command: &DrawCommand) {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear => ctx.clear_rect(0.0, 0.0, self.width, self.height),
            DrawCommand::FillRect { pos, size, color } => {
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&css(*color));
                self.circle(center.x, center.y, *radius);
                ctx.fill();
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                width,
                color,
            } => {
                ctx.set_stroke_style_str(&css(*color));
                ctx.set_line_width(*width as f64);
                self.circle(center.x, center.y, *radius);
                ctx.stroke();
            }
            DrawCommand::Image { sprite, pos, size } => {
                if let Err(e) = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    self.image(*sprite),
                    pos.x as f64,
                    pos.y as f64,
                    size.x as f64,
                    size.y as f64,
                ) {
                    log::warn!("Failed to draw {}: {:?}", sprite.name(), e);
                }
            }
            DrawCommand::Text {
                text,
                pos,
                size_px,
                align,
                color,
            } => {
                ctx.set_fill_style_str(&css(*color));
                ctx.set_font(&format!("{}px Arial", size_px));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
        }
    }
}
