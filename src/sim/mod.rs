//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Frame-rate independent (everything scales by the measured frame delta)
//! - Seeded RNG only
//! - Stable iteration order (bricks are row-major and never reordered)

pub mod geometry;
pub mod machine;
pub mod physics;
pub mod state;
pub mod wave;

pub use geometry::{Rect, circle_rect_overlap, with_magnitude};
pub use machine::{FrameInput, Game, Phase, Trigger, transition};
pub use physics::step;
pub use state::{Ball, Brick, Difficulty, GameEvent, GameState, Paddle};
pub use wave::{advance_wave_if_cleared, create_bricks};
