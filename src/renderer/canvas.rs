//! Draw-primitive adapter
//!
//! [`draw_frame`] describes a frame in terms of a few primitives; a
//! [`Canvas`] decides what those primitives become. [`VertexCanvas`]
//! turns them into triangles for the GPU and text items for the overlay.

use glam::Vec2;

use super::shapes::{self, CIRCLE_SEGMENTS};
use super::vertex::Vertex;
use crate::palette::{self, Rgba};
use crate::sim::{Game, Phase, Rect};
use crate::ui::{HudText, hud_texts};

/// Drawing surface for one frame
pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: &Rect, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn text(&mut self, text: &HudText);
}

/// Draw the whole frame for the current phase
pub fn draw_frame(game: &Game, canvas: &mut impl Canvas) {
    canvas.clear(palette::BLACK);

    if game.phase == Phase::Playing {
        for brick in game.state.bricks.iter().filter(|b| b.active) {
            canvas.fill_rect(&brick.rect, brick.color);
        }
        canvas.fill_circle(game.ball.pos, game.ball.radius, game.ball.color);
        canvas.fill_rect(&game.paddle.rect, game.paddle.color);
    }

    for text in hud_texts(game) {
        canvas.text(&text);
    }
}

/// Collects a frame as triangles plus overlay text
#[derive(Debug, Clone, Default)]
pub struct VertexCanvas {
    pub clear_color: Rgba,
    pub vertices: Vec<Vertex>,
    pub texts: Vec<HudText>,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for VertexCanvas {
    fn clear(&mut self, color: Rgba) {
        self.clear_color = color;
        self.vertices.clear();
        self.texts.clear();
    }

    fn fill_rect(&mut self, rect: &Rect, color: Rgba) {
        self.vertices.extend(shapes::rect(rect, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    fn text(&mut self, text: &HudText) {
        self.texts.push(text.clone());
    }
}
