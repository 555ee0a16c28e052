//! Brick grid generation and wave progression

use super::geometry::Rect;
use super::state::{Brick, Difficulty, GameEvent, GameState};
use crate::palette;
use crate::tuning::Tuning;

/// Build a full grid of active bricks, row-major from the top-left
///
/// Colors cycle by row and row `r` is worth `(rows - r) * points_step`.
pub fn create_bricks(tuning: &Tuning) -> Vec<Brick> {
    let slot_width = tuning.brick_slot_width();
    let origin = tuning.brick_origin;
    let mut bricks = Vec::with_capacity(tuning.brick_count());

    for row in 0..tuning.brick_rows {
        let color = palette::BRICK_ROWS[row as usize % palette::BRICK_ROWS.len()];
        let points = (tuning.brick_rows - row) * tuning.brick_points_step;
        for col in 0..tuning.brick_cols {
            bricks.push(Brick {
                rect: Rect::new(
                    origin.x + col as f32 * slot_width,
                    origin.y + row as f32 * tuning.brick_height,
                    slot_width - tuning.brick_padding,
                    tuning.brick_height - tuning.brick_padding,
                ),
                color,
                points,
                row,
                active: true,
            });
        }
    }

    bricks
}

/// Start the next wave if every brick is gone
///
/// Doubles the score multiplier and refills the grid. Returns the event to
/// report, or None while any brick is still standing.
pub fn advance_wave_if_cleared(
    state: &mut GameState,
    difficulty: &mut Difficulty,
    tuning: &Tuning,
) -> Option<GameEvent> {
    if !state.all_cleared() {
        return None;
    }

    difficulty.wave_multiplier = difficulty.wave_multiplier.saturating_mul(2);
    state.bricks = create_bricks(tuning);
    log::info!(
        "Wave cleared: multiplier now x{}, {} bricks destroyed so far",
        difficulty.wave_multiplier,
        difficulty.bricks_destroyed
    );

    Some(GameEvent::WaveCleared {
        multiplier: difficulty.wave_multiplier,
    })
}
