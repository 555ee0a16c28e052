//! Geometry helpers for circle-vs-rectangle collision
//!
//! Screen space: origin top-left, x right, y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Check whether a circle overlaps a rectangle (touching counts)
///
/// Works on the distance from the rectangle center: anything within the
/// half-extents on either axis is a face hit, otherwise the corner distance
/// decides.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half = rect.half_extents();
    let d = (center - rect.center()).abs();

    if d.x > half.x + radius || d.y > half.y + radius {
        return false;
    }
    if d.x <= half.x || d.y <= half.y {
        return true;
    }

    let corner = d - half;
    corner.length_squared() <= radius * radius
}

/// Rescale a vector to the given magnitude, keeping its direction
///
/// A zero vector has no direction and is returned unchanged.
#[inline]
pub fn with_magnitude(v: Vec2, magnitude: f32) -> Vec2 {
    let len = v.length();
    if len <= f32::EPSILON {
        return v;
    }
    v * (magnitude / len)
}
