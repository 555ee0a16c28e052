//! Per-frame ball and paddle physics
//!
//! One call to [`step`] advances the playfield by a measured frame delta:
//! move the paddle, integrate the ball, then resolve walls, paddle and
//! bricks in that order. Every directional change ends with the ball
//! velocity rescaled to the current difficulty speed.

use glam::Vec2;

use super::geometry::{circle_rect_overlap, with_magnitude};
use super::state::{Ball, Difficulty, GameEvent, GameState, Paddle};
use super::wave::advance_wave_if_cleared;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Rescale the ball velocity to exactly `speed`
#[inline]
pub fn normalize_ball_velocity(ball: &mut Ball, speed: f32) {
    ball.vel = with_magnitude(ball.vel, speed);
}

/// Advance the ball along its velocity
#[inline]
pub fn integrate(ball: &mut Ball, dt: f32) {
    ball.pos += ball.vel * dt;
}

/// Move the paddle from held input (-1 left, +1 right, 0 idle)
pub fn update_paddle(paddle: &mut Paddle, direction: f32, dt: f32) {
    paddle.move_by(direction.clamp(-1.0, 1.0), dt);
}

/// Bounce off the left, right and top walls
///
/// The velocity component along the wall normal is set to point away from
/// the wall rather than negated. The two agree for a ball moving into the
/// wall; a ball still touching the wall but already leaving keeps its
/// direction instead of being turned back into it.
///
/// The bottom edge is not a wall; crossing it loses the ball.
pub fn handle_wall_collision(
    ball: &mut Ball,
    difficulty: &Difficulty,
    events: &mut Vec<GameEvent>,
) {
    let r = ball.radius;

    if ball.pos.x - r <= 0.0 || ball.pos.x + r >= SCREEN_WIDTH {
        if ball.pos.x - r <= 0.0 {
            ball.pos.x = r;
            ball.vel.x = ball.vel.x.abs();
        } else {
            ball.pos.x = SCREEN_WIDTH - r;
            ball.vel.x = -ball.vel.x.abs();
        }
        normalize_ball_velocity(ball, difficulty.ball_speed);
        events.push(GameEvent::WallHit);
    }

    if ball.pos.y - r <= 0.0 {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
        normalize_ball_velocity(ball, difficulty.ball_speed);
        events.push(GameEvent::WallHit);
    }
}

/// Where along the paddle face the ball struck (0 = left edge, 1 = right edge)
///
/// Overlaps past either edge fall outside [0, 1] unless `clamp` is set.
pub fn paddle_hit_position(ball_x: f32, paddle: &Paddle, clamp: bool) -> f32 {
    let hit = (ball_x - paddle.rect.x) / paddle.rect.width;
    if clamp { hit.clamp(0.0, 1.0) } else { hit }
}

/// Bounce angle from vertical for a hit position; 0 at the paddle center,
/// half the fan at either edge
#[inline]
pub fn paddle_bounce_angle(hit_position: f32, fan: f32) -> f32 {
    (hit_position - 0.5) * fan
}

/// Bounce off the paddle, steering by where the ball struck
///
/// Returns true on a hit.
pub fn handle_paddle_collision(
    ball: &mut Ball,
    paddle: &Paddle,
    difficulty: &Difficulty,
    tuning: &Tuning,
    clamp_hit: bool,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !circle_rect_overlap(ball.pos, ball.radius, &paddle.rect) {
        return false;
    }

    let hit = paddle_hit_position(ball.pos.x, paddle, clamp_hit);
    let angle = paddle_bounce_angle(hit, tuning.paddle_deflection_fan);
    let speed = ball.speed();

    ball.vel = Vec2::new(speed * angle.sin(), -speed * angle.cos());
    ball.pos.y = paddle.rect.y - ball.radius - tuning.paddle_clearance;
    normalize_ball_velocity(ball, difficulty.ball_speed);

    log::debug!("Paddle hit at {:.2} -> {:.1} deg", hit, angle.to_degrees());
    events.push(GameEvent::PaddleHit);
    true
}

/// Destroy the first active brick the ball overlaps and bounce off it
///
/// Bricks are checked in row-major order and at most one is resolved per
/// frame; later overlaps wait for the next frame. Returns the index of the
/// destroyed brick.
pub fn handle_brick_collisions(
    ball: &mut Ball,
    paddle: &mut Paddle,
    state: &mut GameState,
    difficulty: &mut Difficulty,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Option<usize> {
    let index = state
        .bricks
        .iter()
        .position(|b| b.active && circle_rect_overlap(ball.pos, ball.radius, &b.rect))?;

    let brick = &mut state.bricks[index];
    brick.active = false;
    let awarded = u64::from(brick.points) * u64::from(difficulty.wave_multiplier);
    state.score = state.score.saturating_add(awarded);

    difficulty.record_brick(tuning);
    paddle.speed = difficulty.paddle_speed;
    normalize_ball_velocity(ball, difficulty.ball_speed);

    // Whichever axis the ball sits further out on (relative to the brick's
    // half-extents) is the face it struck.
    let rect = brick.rect;
    let center = rect.center();
    let half = rect.half_extents();
    let offset = ball.pos - center;
    let side_hit = offset.x.abs() / half.x > offset.y.abs() / half.y;

    if side_hit {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = if ball.pos.x < center.x {
            rect.x - ball.radius
        } else {
            rect.right() + ball.radius
        };
    } else {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = if ball.pos.y < center.y {
            rect.y - ball.radius
        } else {
            rect.bottom() + ball.radius
        };
    }
    normalize_ball_velocity(ball, difficulty.ball_speed);

    log::debug!(
        "Brick {} (row {}) destroyed for {} points, ball speed {}",
        index,
        brick.row,
        awarded,
        difficulty.ball_speed
    );
    events.push(GameEvent::BrickDestroyed {
        row: brick.row,
        points: awarded,
    });
    Some(index)
}

/// Advance one frame of play
///
/// Does nothing once the session is over. Returns the events produced.
pub fn step(
    ball: &mut Ball,
    paddle: &mut Paddle,
    state: &mut GameState,
    difficulty: &mut Difficulty,
    settings: &Settings,
    paddle_direction: f32,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.game_over {
        return events;
    }
    let tuning = &settings.tuning;

    update_paddle(paddle, paddle_direction, dt);
    integrate(ball, dt);

    handle_wall_collision(ball, difficulty, &mut events);
    handle_paddle_collision(
        ball,
        paddle,
        difficulty,
        tuning,
        settings.clamp_paddle_hit,
        &mut events,
    );
    handle_brick_collisions(ball, paddle, state, difficulty, tuning, &mut events);

    if let Some(event) = advance_wave_if_cleared(state, difficulty, tuning) {
        events.push(event);
    }

    if ball.pos.y + ball.radius >= SCREEN_HEIGHT {
        state.game_over = true;
        log::info!("Ball lost, final score {}", state.score);
        events.push(GameEvent::BallLost);
    }

    events
}
