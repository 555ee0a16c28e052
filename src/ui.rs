//! HUD and message text layout
//!
//! Decides what text each phase shows and where; the renderer's canvas
//! draws it.

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::palette::{self, Rgba};
use crate::sim::{Game, Phase};

/// Horizontal anchoring of a text item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge
    Left,
    /// `x` is the horizontal center
    Center,
}

/// One line of text in screen pixels (`y` is the top of the line)
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
    pub align: Align,
}

impl HudText {
    fn left(text: impl Into<String>, x: f32, y: f32, size: f32, color: Rgba) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            color,
            align: Align::Left,
        }
    }

    fn centered(text: impl Into<String>, y: f32, size: f32, color: Rgba) -> Self {
        Self {
            text: text.into(),
            x: SCREEN_WIDTH / 2.0,
            y,
            size,
            color,
            align: Align::Center,
        }
    }
}

/// Text for the current phase
pub fn hud_texts(game: &Game) -> Vec<HudText> {
    let cx = SCREEN_WIDTH / 2.0;
    let cy = SCREEN_HEIGHT / 2.0;

    match game.phase {
        Phase::Start => vec![
            HudText::left("Press ENTER to Start", cx - 150.0, cy - 50.0, 30.0, palette::WHITE),
            HudText::left("Press ESC to Exit", cx - 120.0, cy, 30.0, palette::WHITE),
        ],
        Phase::Playing => vec![HudText::left(
            format!("Score: {}", game.state.score),
            10.0,
            SCREEN_HEIGHT - 30.0,
            20.0,
            palette::WHITE,
        )],
        Phase::GameOver => vec![
            HudText::centered("Game Over!", cy - 150.0, 60.0, palette::RED),
            HudText::left(
                format!("Final Score: {}", game.state.score),
                cx - 100.0,
                cy - 50.0,
                30.0,
                palette::WHITE,
            ),
            HudText::left("Press ENTER to Restart", cx - 150.0, cy, 30.0, palette::WHITE),
            HudText::left("Press ESC to Exit", cx - 120.0, cy + 50.0, 30.0, palette::WHITE),
        ],
        Phase::Exit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_start_screen_prompts() {
        let game = Game::new(Settings::default(), 1);
        let texts = hud_texts(&game);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].text, "Press ENTER to Start");
        assert_eq!(texts[1].text, "Press ESC to Exit");
    }

    #[test]
    fn test_playing_shows_score() {
        let mut game = Game::new(Settings::default(), 1);
        game.phase = Phase::Playing;
        game.state.score = 1500;
        let texts = hud_texts(&game);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "Score: 1500");
        assert_eq!((texts[0].x, texts[0].y), (10.0, 570.0));
    }

    #[test]
    fn test_game_over_shows_final_score() {
        let mut game = Game::new(Settings::default(), 1);
        game.phase = Phase::GameOver;
        game.state.score = 4200;
        let texts = hud_texts(&game);
        assert_eq!(texts[0].text, "Game Over!");
        assert_eq!(texts[0].align, Align::Center);
        assert!(texts.iter().any(|t| t.text == "Final Score: 4200"));
        assert!(texts.iter().any(|t| t.text == "Press ENTER to Restart"));
    }
}
