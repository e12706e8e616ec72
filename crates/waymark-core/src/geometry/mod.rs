//! Viewport geometry for pointing at off-screen pins.
//!
//! Coordinates are map pixels with `y` growing downward, so positive angles
//! are clockwise.

mod pointer;
mod segment;
mod visible_area;

pub use pointer::{
    DEFAULT_POSE_EPSILON, PointerPose, PoseCalculator, RetainedPose, ScreenOffset, Side,
};
pub use segment::LineSegment;
pub use visible_area::{Padding, Viewport, VisibleArea};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotates this point around `center` by `radians`, clockwise on screen.
    #[must_use]
    pub fn rotated_around(self, center: Self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }
}

/// Size in whole pixels, as reported by the layout or the tile pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Normalizes an angle in degrees to `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}
