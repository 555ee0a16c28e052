//! Top-level phase machine
//!
//! Phases and their transitions are a table ([`transition`]); [`Game::frame`]
//! turns one frame of input into triggers, applies the table, and runs the
//! physics while playing.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics;
use super::state::{Ball, Difficulty, GameEvent, GameState, Paddle};
use crate::settings::Settings;

/// Current phase of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, waiting for confirm/cancel
    Start,
    /// Physics running
    Playing,
    /// Session ended, waiting for confirm/cancel
    GameOver,
    /// Process should shut down
    Exit,
}

/// What can move the machine between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Confirm,
    Cancel,
    /// Ball crossed the bottom edge
    BallLost,
    /// Window close / page hide
    CloseRequested,
}

/// Transition table. `None` means the trigger is ignored in that phase.
pub fn transition(phase: Phase, trigger: Trigger) -> Option<Phase> {
    use Phase::*;
    use Trigger::*;

    match (phase, trigger) {
        (Exit, _) => None,
        (_, CloseRequested) => Some(Exit),
        (Start, Confirm) => Some(Playing),
        (Start, Cancel) => Some(Exit),
        (Playing, BallLost) => Some(GameOver),
        (GameOver, Confirm) => Some(Start),
        (GameOver, Cancel) => Some(Exit),
        _ => None,
    }
}

/// Input for one frame
///
/// `left`/`right` are held keys; `confirm`/`cancel` are presses latched
/// since the previous frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub close_requested: bool,
}

impl FrameInput {
    /// Paddle direction from held keys (-1, 0 or +1)
    pub fn paddle_direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Menu trigger for this frame; confirm wins over cancel
    fn menu_trigger(&self) -> Option<Trigger> {
        if self.close_requested {
            Some(Trigger::CloseRequested)
        } else if self.confirm {
            Some(Trigger::Confirm)
        } else if self.cancel {
            Some(Trigger::Cancel)
        } else {
            None
        }
    }
}

/// Everything the loop owns: phase, session entities and difficulty
#[derive(Debug, Clone)]
pub struct Game {
    pub phase: Phase,
    pub ball: Ball,
    pub paddle: Paddle,
    pub state: GameState,
    pub difficulty: Difficulty,
    pub settings: Settings,
    /// Sessions started since launch
    pub sessions: u32,
    rng: Pcg32,
}

impl Game {
    pub fn new(mut settings: Settings, seed: u64) -> Self {
        settings.tuning.sanitize();
        let seed = settings.seed.unwrap_or(seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        let tuning = &settings.tuning;
        let difficulty = Difficulty::new(tuning);
        let ball = Ball::serve(tuning, difficulty.ball_speed, &mut rng);
        let paddle = Paddle::new(tuning, difficulty.paddle_speed);
        let state = GameState::new(tuning);

        log::info!("Game created with seed {}", seed);

        Self {
            phase: Phase::Start,
            ball,
            paddle,
            state,
            difficulty,
            settings,
            sessions: 0,
            rng,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Exit
    }

    /// Fresh ball, paddle and brick grid; difficulty carries over unless the
    /// settings ask for a reset
    fn start_session(&mut self) {
        let tuning = &self.settings.tuning;
        if self.settings.reset_difficulty_on_restart {
            self.difficulty.reset(tuning);
        }
        self.ball = Ball::serve(tuning, self.difficulty.ball_speed, &mut self.rng);
        self.paddle = Paddle::new(tuning, self.difficulty.paddle_speed);
        self.state = GameState::new(tuning);
        self.sessions += 1;

        log::info!(
            "Session {} started: ball speed {}, paddle speed {}, multiplier x{}",
            self.sessions,
            self.difficulty.ball_speed,
            self.difficulty.paddle_speed,
            self.difficulty.wave_multiplier
        );
    }

    /// Apply a trigger; returns true if the phase changed
    pub fn apply(&mut self, trigger: Trigger, events: &mut Vec<GameEvent>) -> bool {
        let Some(next) = transition(self.phase, trigger) else {
            return false;
        };

        log::info!("Phase {:?} -> {:?} on {:?}", self.phase, next, trigger);
        match next {
            Phase::Playing => {
                self.start_session();
                events.push(GameEvent::MusicStart);
            }
            Phase::Start | Phase::GameOver | Phase::Exit => {
                if self.phase == Phase::Playing {
                    events.push(GameEvent::MusicStop);
                }
            }
        }
        self.phase = next;
        true
    }

    /// Run one loop iteration
    pub fn frame(&mut self, input: &FrameInput, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match self.phase {
            Phase::Start | Phase::GameOver => {
                if let Some(trigger) = input.menu_trigger() {
                    self.apply(trigger, &mut events);
                }
            }
            Phase::Playing => {
                if input.close_requested {
                    self.apply(Trigger::CloseRequested, &mut events);
                    return events;
                }

                let dt = dt.clamp(0.0, self.settings.tuning.max_frame_dt);
                events.extend(physics::step(
                    &mut self.ball,
                    &mut self.paddle,
                    &mut self.state,
                    &mut self.difficulty,
                    &self.settings,
                    input.paddle_direction(),
                    dt,
                ));

                if self.state.game_over {
                    self.apply(Trigger::BallLost, &mut events);
                }
            }
            Phase::Exit => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn confirm() -> FrameInput {
        FrameInput {
            confirm: true,
            ..Default::default()
        }
    }

    fn cancel() -> FrameInput {
        FrameInput {
            cancel: true,
            ..Default::default()
        }
    }

    /// Put the ball just above the bottom edge, falling, away from the paddle
    fn drop_ball(game: &mut Game) {
        game.paddle.rect.x = 0.0;
        game.ball.pos = Vec2::new(700.0, 590.0);
        game.ball.vel = Vec2::new(0.0, game.difficulty.ball_speed);
    }

    #[test]
    fn test_transition_table() {
        use Phase::*;
        use Trigger::*;

        assert_eq!(transition(Start, Confirm), Some(Playing));
        assert_eq!(transition(Start, Cancel), Some(Exit));
        assert_eq!(transition(Start, BallLost), None);
        assert_eq!(transition(Playing, BallLost), Some(GameOver));
        assert_eq!(transition(Playing, Confirm), None);
        assert_eq!(transition(Playing, Cancel), None);
        assert_eq!(transition(GameOver, Confirm), Some(Start));
        assert_eq!(transition(GameOver, Cancel), Some(Exit));
        assert_eq!(transition(GameOver, BallLost), None);
        for phase in [Start, Playing, GameOver] {
            assert_eq!(transition(phase, CloseRequested), Some(Exit));
        }
        for trigger in [Confirm, Cancel, BallLost, CloseRequested] {
            assert_eq!(transition(Exit, trigger), None);
        }
    }

    #[test]
    fn test_paddle_direction() {
        let mut input = FrameInput::default();
        assert_eq!(input.paddle_direction(), 0.0);
        input.left = true;
        assert_eq!(input.paddle_direction(), -1.0);
        input.right = true;
        assert_eq!(input.paddle_direction(), 0.0);
        input.left = false;
        assert_eq!(input.paddle_direction(), 1.0);
    }

    #[test]
    fn test_start_to_playing() {
        let mut game = Game::new(Settings::default(), 1);
        assert_eq!(game.phase, Phase::Start);

        let events = game.frame(&FrameInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(game.phase, Phase::Start);

        let events = game.frame(&confirm(), DT);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(events, vec![GameEvent::MusicStart]);
        assert_eq!(game.sessions, 1);
        assert_eq!(game.state.score, 0);
        assert!(!game.state.game_over);
        assert_eq!(game.state.active_bricks(), game.settings.tuning.brick_count());
    }

    #[test]
    fn test_cancel_on_start_exits() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&cancel(), DT);
        assert_eq!(game.phase, Phase::Exit);
        assert!(!game.is_running());
    }

    #[test]
    fn test_ball_lost_ends_session() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&confirm(), DT);
        drop_ball(&mut game);

        let events = game.frame(&FrameInput::default(), DT);
        assert_eq!(events, vec![GameEvent::BallLost, GameEvent::MusicStop]);
        assert_eq!(game.phase, Phase::GameOver);
        assert!(game.state.game_over);

        // Physics frozen while waiting on the game-over screen
        let frozen = game.ball.pos;
        game.frame(&FrameInput::default(), DT);
        assert_eq!(game.ball.pos, frozen);
    }

    #[test]
    fn test_game_over_confirm_returns_to_start() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&confirm(), DT);
        drop_ball(&mut game);
        game.frame(&FrameInput::default(), DT);

        let events = game.frame(&confirm(), DT);
        assert!(events.is_empty());
        assert_eq!(game.phase, Phase::Start);

        game.frame(&cancel(), DT);
        assert_eq!(game.phase, Phase::Exit);
    }

    #[test]
    fn test_game_over_cancel_exits() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&confirm(), DT);
        drop_ball(&mut game);
        game.frame(&FrameInput::default(), DT);
        game.frame(&cancel(), DT);
        assert_eq!(game.phase, Phase::Exit);
    }

    #[test]
    fn test_close_while_playing_stops_music() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&confirm(), DT);
        let events = game.frame(
            &FrameInput {
                close_requested: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(events, vec![GameEvent::MusicStop]);
        assert_eq!(game.phase, Phase::Exit);
    }

    #[test]
    fn test_difficulty_carries_over_restart() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&confirm(), DT);
        game.difficulty.ball_speed = 700.0;
        game.difficulty.wave_multiplier = 4;
        drop_ball(&mut game);
        game.frame(&FrameInput::default(), DT);
        game.frame(&confirm(), DT);
        game.frame(&confirm(), DT);

        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.sessions, 2);
        assert_eq!(game.difficulty.ball_speed, 700.0);
        assert_eq!(game.difficulty.wave_multiplier, 4);
        assert!((game.ball.speed() - 700.0).abs() < 1e-3);
        assert_eq!(game.state.score, 0);
    }

    #[test]
    fn test_difficulty_reset_on_restart_setting() {
        let settings = Settings {
            reset_difficulty_on_restart: true,
            ..Settings::default()
        };
        let mut game = Game::new(settings, 1);
        game.frame(&confirm(), DT);
        game.difficulty.ball_speed = 700.0;
        game.difficulty.wave_multiplier = 4;
        drop_ball(&mut game);
        game.frame(&FrameInput::default(), DT);
        game.frame(&confirm(), DT);
        game.frame(&confirm(), DT);

        assert_eq!(game.difficulty, Difficulty::new(&game.settings.tuning));
        assert!((game.ball.speed() - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut game = Game::new(Settings::default(), 1);
        game.frame(&confirm(), DT);
        game.ball.pos = Vec2::new(400.0, 400.0);
        game.ball.vel = Vec2::new(0.0, -600.0);

        game.frame(&FrameInput::default(), 5.0);
        assert!((game.ball.pos.y - 340.0).abs() < 1e-3);
    }

    #[test]
    fn test_seed_from_settings_wins() {
        let settings = Settings {
            seed: Some(5),
            ..Settings::default()
        };
        let a = Game::new(settings.clone(), 100);
        let b = Game::new(settings, 200);
        assert_eq!(a.ball.vel, b.ball.vel);
    }

    #[test]
    fn test_bad_tuning_is_replaced_before_play() {
        let mut settings = Settings::default();
        settings.tuning.max_frame_dt = -1.0;
        settings.tuning.brick_rows = 0;
        settings.tuning.paddle_width = 0.0;
        let mut game = Game::new(settings, 1);
        assert_eq!(game.settings.tuning, crate::Tuning::default());

        // A full grid is never instantly cleared and the frame delta stays usable
        let mut waves = 0;
        game.frame(&confirm(), DT);
        for _ in 0..10 {
            let events = game.frame(&FrameInput::default(), DT);
            waves += events
                .iter()
                .filter(|e| matches!(e, GameEvent::WaveCleared { .. }))
                .count();
        }
        assert_eq!(waves, 0);
        assert_eq!(game.difficulty.wave_multiplier, 1);
        assert!(game.ball.pos.is_finite());

        drop_ball(&mut game);
        game.frame(&FrameInput::default(), DT);
        assert_eq!(game.phase, Phase::GameOver);
    }
}
