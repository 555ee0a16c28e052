//! Game state and core simulation types

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::SCREEN_WIDTH;
use crate::palette::{self, Rgba};
use crate::tuning::Tuning;

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the left, right or top wall
    WallHit,
    /// Ball bounced off the paddle
    PaddleHit,
    /// A brick was destroyed (points already multiplied)
    BrickDestroyed { row: u32, points: u64 },
    /// Grid cleared and regenerated
    WaveCleared { multiplier: u32 },
    /// Ball fell past the bottom edge
    BallLost,
    /// Background music should (re)start
    MusicStart,
    /// Background music should stop
    MusicStop,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

impl Ball {
    /// Serve a new ball from the spawn point at the current ball speed,
    /// tilted by a random whole-degree angle from straight up
    pub fn serve(tuning: &Tuning, speed: f32, rng: &mut impl Rng) -> Self {
        let spread = tuning.serve_spread_degrees.abs();
        let degrees = rng.random_range(-spread..=spread);
        let angle = (degrees as f32).to_radians();
        Self {
            pos: tuning.ball_spawn(),
            vel: Vec2::new(speed * angle.sin(), -speed * angle.cos()),
            radius: tuning.ball_radius,
            color: palette::RED,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal speed (pixels/s)
    pub speed: f32,
    pub color: Rgba,
}

impl Paddle {
    pub fn new(tuning: &Tuning, speed: f32) -> Self {
        let origin = tuning.paddle_origin();
        Self {
            rect: Rect::new(origin.x, origin.y, tuning.paddle_width, tuning.paddle_height),
            speed,
            color: palette::BLUE,
        }
    }

    /// Move horizontally by `direction * speed * dt`, staying on screen
    pub fn move_by(&mut self, direction: f32, dt: f32) {
        self.rect.x += direction * self.speed * dt;
        self.clamp_to_screen();
    }

    /// Keep x within [0, screen width - paddle width]
    pub fn clamp_to_screen(&mut self) {
        let max_x = (SCREEN_WIDTH - self.rect.width).max(0.0);
        self.rect.x = self.rect.x.clamp(0.0, max_x);
    }
}

/// A brick in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: Rgba,
    /// Base points before the wave multiplier
    pub points: u32,
    /// Row index (0 = top)
    pub row: u32,
    /// Cleared bricks stay in place with `active = false`
    pub active: bool,
}

/// Difficulty that outlives a single session
///
/// Starts at the tuning's initial values when the process starts. Whether a
/// restart resets it is a settings choice (`reset_difficulty_on_restart`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Magnitude every ball velocity is normalized to
    pub ball_speed: f32,
    pub paddle_speed: f32,
    /// Score multiplier, doubles per cleared wave
    pub wave_multiplier: u32,
    /// Bricks destroyed since the last reset
    pub bricks_destroyed: u32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ball_speed: tuning.initial_ball_speed,
            paddle_speed: tuning.initial_paddle_speed,
            wave_multiplier: 1,
            bricks_destroyed: 0,
        }
    }

    /// Back to process-start values
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Speed-ramp bookkeeping for one destroyed brick
    pub fn record_brick(&mut self, tuning: &Tuning) {
        self.bricks_destroyed += 1;
        self.paddle_speed =
            (self.paddle_speed + tuning.paddle_speed_increment).min(tuning.max_paddle_speed);
        self.ball_speed =
            (self.ball_speed + tuning.ball_speed_increment).min(tuning.max_ball_speed);
    }
}

/// Per-session state: bricks, score and the game-over flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Row-major brick grid
    pub bricks: Vec<Brick>,
    pub score: u64,
    pub game_over: bool,
}

impl GameState {
    /// Fresh session with a full brick grid
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            bricks: super::wave::create_bricks(tuning),
            score: 0,
            game_over: false,
        }
    }

    pub fn active_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn all_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_serve_direction_within_spread() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let max_tilt = (tuning.serve_spread_degrees as f32).to_radians().sin() * 600.0;
        for _ in 0..100 {
            let ball = Ball::serve(&tuning, 600.0, &mut rng);
            assert!(ball.vel.y < 0.0, "serve must go up");
            assert!(ball.vel.x.abs() <= max_tilt + 1e-3);
            assert!((ball.speed() - 600.0).abs() < 1e-3);
            assert_eq!(ball.pos, Vec2::new(400.0, 540.0));
        }
    }

    #[test]
    fn test_serve_is_seeded() {
        let tuning = Tuning::default();
        let a = Ball::serve(&tuning, 600.0, &mut Pcg32::seed_from_u64(9));
        let b = Ball::serve(&tuning, 600.0, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_difficulty_caps() {
        let tuning = Tuning::default();
        let mut difficulty = Difficulty::new(&tuning);
        for _ in 0..500 {
            difficulty.record_brick(&tuning);
        }
        assert_eq!(difficulty.ball_speed, 800.0);
        assert_eq!(difficulty.paddle_speed, 750.0);
        assert_eq!(difficulty.bricks_destroyed, 500);

        difficulty.reset(&tuning);
        assert_eq!(difficulty, Difficulty::new(&tuning));
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(&Tuning::default());
        assert_eq!(state.bricks.len(), 40);
        assert_eq!(state.active_bricks(), 40);
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
        assert!(!state.all_cleared());
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_on_screen(
            start in -500.0f32..1500.0,
            moves in proptest::collection::vec((-1.0f32..=1.0, 0.0f32..0.2), 1..50),
        ) {
            let tuning = Tuning::default();
            let mut paddle = Paddle::new(&tuning, 750.0);
            paddle.rect.x = start;
            paddle.clamp_to_screen();
            for (direction, dt) in moves {
                paddle.move_by(direction, dt);
                prop_assert!(paddle.rect.x >= 0.0);
                prop_assert!(paddle.rect.x <= SCREEN_WIDTH - paddle.rect.width);
            }
        }
    }
}
