//! Data-driven game balance
//!
//! Every number that shapes how the game plays lives here so it can be
//! overridden from settings JSON without touching the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Largest grid accepted from settings
pub const MAX_BRICKS: u32 = 1024;

/// Widest serve spread accepted from settings (degrees)
pub const MAX_SERVE_SPREAD: i32 = 89;

/// Balance and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speeds (pixels/s) ===
    pub initial_ball_speed: f32,
    pub initial_paddle_speed: f32,
    pub max_ball_speed: f32,
    pub max_paddle_speed: f32,
    /// Added to the ball speed per destroyed brick
    pub ball_speed_increment: f32,
    /// Added to the paddle speed per destroyed brick
    pub paddle_speed_increment: f32,

    // === Brick grid ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    /// Gap shaved off each brick slot
    pub brick_padding: f32,
    pub brick_height: f32,
    /// Top-left corner of the grid
    pub brick_origin: Vec2,
    /// Horizontal space not used by the grid (split across both sides)
    pub brick_margin: f32,
    /// Base points per row; row `r` is worth `(rows - r) * brick_points_step`
    pub brick_points_step: u32,

    // === Ball ===
    pub ball_radius: f32,
    /// Spawn height above the bottom edge
    pub ball_spawn_offset: f32,
    /// Serve direction spread either side of vertical (whole degrees)
    pub serve_spread_degrees: i32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Paddle top edge distance from the bottom of the screen
    pub paddle_bottom_offset: f32,
    /// Total deflection fan across the paddle face (radians)
    pub paddle_deflection_fan: f32,
    /// Gap left between ball and paddle after a bounce
    pub paddle_clearance: f32,

    // === Loop ===
    /// Largest frame delta fed to physics (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_ball_speed: 600.0,
            initial_paddle_speed: 550.0,
            max_ball_speed: 800.0,
            max_paddle_speed: 750.0,
            ball_speed_increment: 2.0,
            paddle_speed_increment: 2.0,

            brick_rows: 5,
            brick_cols: 8,
            brick_padding: 4.0,
            brick_height: 30.0,
            brick_origin: Vec2::new(50.0, 50.0),
            brick_margin: 100.0,
            brick_points_step: 100,

            ball_radius: 15.0,
            ball_spawn_offset: 60.0,
            serve_spread_degrees: 30,

            paddle_width: 100.0,
            paddle_height: 20.0,
            paddle_bottom_offset: 40.0,
            paddle_deflection_fan: std::f32::consts::PI / 3.0,
            paddle_clearance: 1.0,

            max_frame_dt: 0.1,
        }
    }
}

impl Tuning {
    /// Width of one brick slot, truncated to whole pixels
    pub fn brick_slot_width(&self) -> f32 {
        ((SCREEN_WIDTH - self.brick_margin) / self.brick_cols.max(1) as f32).floor()
    }

    /// Number of bricks in a full grid
    pub fn brick_count(&self) -> usize {
        (self.brick_rows as usize).saturating_mul(self.brick_cols as usize)
    }

    /// Replace every value the game cannot run with by its default
    ///
    /// Returns the names of the fields that were reset.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let defaults = Tuning::default();
        let mut reset = Vec::new();

        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        let finite = |v: f32| v.is_finite();
        let d = &defaults;
        let r = &mut reset;

        keep_valid(
            r,
            "initial_ball_speed",
            &mut self.initial_ball_speed,
            d.initial_ball_speed,
            positive,
        );
        keep_valid(
            r,
            "initial_paddle_speed",
            &mut self.initial_paddle_speed,
            d.initial_paddle_speed,
            positive,
        );
        keep_valid(r, "max_ball_speed", &mut self.max_ball_speed, d.max_ball_speed, positive);
        keep_valid(r, "max_paddle_speed", &mut self.max_paddle_speed, d.max_paddle_speed, positive);
        keep_valid(
            r,
            "ball_speed_increment",
            &mut self.ball_speed_increment,
            d.ball_speed_increment,
            non_negative,
        );
        keep_valid(
            r,
            "paddle_speed_increment",
            &mut self.paddle_speed_increment,
            d.paddle_speed_increment,
            non_negative,
        );
        keep_valid(r, "brick_rows", &mut self.brick_rows, d.brick_rows, |v| v > 0);
        keep_valid(r, "brick_cols", &mut self.brick_cols, d.brick_cols, |v| v > 0);
        keep_valid(r, "brick_margin", &mut self.brick_margin, d.brick_margin, |v| {
            v.is_finite() && (0.0..SCREEN_WIDTH).contains(&v)
        });
        keep_valid(r, "brick_height", &mut self.brick_height, d.brick_height, positive);
        keep_valid(r, "brick_origin", &mut self.brick_origin, d.brick_origin, |v| v.is_finite());
        keep_valid(r, "ball_radius", &mut self.ball_radius, d.ball_radius, positive);
        keep_valid(
            r,
            "ball_spawn_offset",
            &mut self.ball_spawn_offset,
            d.ball_spawn_offset,
            finite,
        );
        keep_valid(
            r,
            "serve_spread_degrees",
            &mut self.serve_spread_degrees,
            d.serve_spread_degrees,
            |v| (0..=MAX_SERVE_SPREAD).contains(&v),
        );
        keep_valid(r, "paddle_width", &mut self.paddle_width, d.paddle_width, |v| {
            positive(v) && v < SCREEN_WIDTH
        });
        keep_valid(r, "paddle_height", &mut self.paddle_height, d.paddle_height, positive);
        keep_valid(
            r,
            "paddle_bottom_offset",
            &mut self.paddle_bottom_offset,
            d.paddle_bottom_offset,
            finite,
        );
        keep_valid(
            r,
            "paddle_deflection_fan",
            &mut self.paddle_deflection_fan,
            d.paddle_deflection_fan,
            finite,
        );
        keep_valid(
            r,
            "paddle_clearance",
            &mut self.paddle_clearance,
            d.paddle_clearance,
            non_negative,
        );
        keep_valid(r, "max_frame_dt", &mut self.max_frame_dt, d.max_frame_dt, positive);

        // Checks spanning several fields
        let grid_fits = self
            .brick_rows
            .checked_mul(self.brick_cols)
            .is_some_and(|n| n <= MAX_BRICKS);
        if !grid_fits {
            log::warn!(
                "Ignoring {}x{} brick grid, using {}x{}",
                self.brick_rows,
                self.brick_cols,
                defaults.brick_rows,
                defaults.brick_cols
            );
            self.brick_rows = defaults.brick_rows;
            self.brick_cols = defaults.brick_cols;
            reset.extend(["brick_rows", "brick_cols"]);
        }

        if self.brick_slot_width() < 1.0 {
            log::warn!("Brick slots narrower than a pixel, using default margin and columns");
            self.brick_margin = defaults.brick_margin;
            self.brick_cols = defaults.brick_cols;
            reset.extend(["brick_margin", "brick_cols"]);
        }

        let padding = self.brick_padding;
        if !(padding.is_finite() && padding >= 0.0 && padding < self.brick_slot_width()) {
            log::warn!(
                "Ignoring tuning.brick_padding = {:?}, using {:?}",
                padding,
                defaults.brick_padding
            );
            self.brick_padding = defaults.brick_padding.min(self.brick_slot_width() - 1.0);
            reset.push("brick_padding");
        }

        if self.brick_rows.checked_mul(self.brick_points_step).is_none() {
            log::warn!(
                "Ignoring tuning.brick_points_step = {}, using {}",
                self.brick_points_step,
                defaults.brick_points_step
            );
            self.brick_points_step = defaults.brick_points_step;
            reset.push("brick_points_step");
        }

        reset
    }

    /// Ball spawn point (centered horizontally)
    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - self.ball_spawn_offset)
    }

    /// Paddle top-left corner at session start (centered horizontally)
    pub fn paddle_origin(&self) -> Vec2 {
        Vec2::new(
            SCREEN_WIDTH / 2.0 - self.paddle_width / 2.0,
            SCREEN_HEIGHT - self.paddle_bottom_offset,
        )
    }
}

/// Reset `value` to `default` unless it passes `valid`
fn keep_valid<T: Copy + std::fmt::Debug>(
    reset: &mut Vec<&'static str>,
    name: &'static str,
    value: &mut T,
    default: T,
    valid: impl Fn(T) -> bool,
) {
    if !valid(*value) {
        log::warn!("Ignoring tuning.{} = {:?}, using {:?}", name, value, default);
        *value = default;
        reset.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let tuning = Tuning::default();
        assert_eq!(tuning.brick_slot_width(), 87.0);
        assert_eq!(tuning.brick_count(), 40);
        assert_eq!(tuning.ball_spawn(), Vec2::new(400.0, 540.0));
        assert_eq!(tuning.paddle_origin(), Vec2::new(350.0, 560.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"brick_rows": 3}"#).unwrap();
        assert_eq!(tuning.brick_rows, 3);
        assert_eq!(tuning.brick_cols, 8);
        assert_eq!(tuning.max_ball_speed, 800.0);
    }

    fn sanitized(json: &str) -> (Tuning, Vec<&'static str>) {
        let mut tuning: Tuning = serde_json::from_str(json).unwrap();
        let reset = tuning.sanitize();
        (tuning, reset)
    }

    #[test]
    fn test_sanitize_keeps_defaults() {
        let (tuning, reset) = sanitized("{}");
        assert!(reset.is_empty());
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitize_keeps_valid_overrides() {
        let (tuning, reset) = sanitized(r#"{"brick_rows": 3, "max_frame_dt": 0.05}"#);
        assert!(reset.is_empty());
        assert_eq!(tuning.brick_rows, 3);
        assert_eq!(tuning.max_frame_dt, 0.05);
    }

    #[test]
    fn test_sanitize_rejects_bad_frame_dt() {
        let (tuning, reset) = sanitized(r#"{"max_frame_dt": -1.0}"#);
        assert_eq!(tuning.max_frame_dt, 0.1);
        assert_eq!(reset, vec!["max_frame_dt"]);

        let (tuning, _) = sanitized(r#"{"max_frame_dt": 0.0}"#);
        assert_eq!(tuning.max_frame_dt, 0.1);
    }

    #[test]
    fn test_sanitize_rejects_nan() {
        let mut tuning = Tuning {
            max_frame_dt: f32::NAN,
            ball_radius: f32::INFINITY,
            ..Tuning::default()
        };
        let reset = tuning.sanitize();
        assert_eq!(reset, vec!["ball_radius", "max_frame_dt"]);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_sanitize_rejects_empty_grid() {
        let (tuning, reset) = sanitized(r#"{"brick_rows": 0}"#);
        assert_eq!(tuning.brick_rows, 5);
        assert_eq!(reset, vec!["brick_rows"]);

        let (tuning, _) = sanitized(r#"{"brick_cols": 0}"#);
        assert_eq!(tuning.brick_cols, 8);
        assert_eq!(tuning.brick_count(), 40);
    }

    #[test]
    fn test_sanitize_rejects_oversized_grid() {
        let (tuning, reset) = sanitized(r#"{"brick_rows": 4294967295, "brick_cols": 2}"#);
        assert_eq!((tuning.brick_rows, tuning.brick_cols), (5, 8));
        assert!(reset.contains(&"brick_rows"));
    }

    #[test]
    fn test_sanitize_rejects_zero_paddle_width() {
        let (tuning, reset) = sanitized(r#"{"paddle_width": 0.0}"#);
        assert_eq!(tuning.paddle_width, 100.0);
        assert_eq!(reset, vec!["paddle_width"]);
    }

    #[test]
    fn test_sanitize_rejects_padding_wider_than_slot() {
        let (tuning, reset) = sanitized(r#"{"brick_padding": 87.0}"#);
        assert_eq!(tuning.brick_padding, 4.0);
        assert_eq!(reset, vec!["brick_padding"]);
    }

    #[test]
    fn test_sanitize_rejects_extreme_serve_spread() {
        let (tuning, reset) = sanitized(r#"{"serve_spread_degrees": -2147483648}"#);
        assert_eq!(tuning.serve_spread_degrees, 30);
        assert_eq!(reset, vec!["serve_spread_degrees"]);
    }

    #[test]
    fn test_sanitize_rejects_overflowing_points() {
        let (tuning, reset) = sanitized(r#"{"brick_points_step": 4294967295}"#);
        assert_eq!(tuning.brick_points_step, 100);
        assert_eq!(reset, vec!["brick_points_step"]);
    }
}
