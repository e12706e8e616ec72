use serde::{Deserialize, Serialize};

use super::Point;

/// Directed segment from `p1` to `p2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
}

impl LineSegment {
    #[must_use]
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Angle of the segment in degrees within `(-180, 180]`; 0 points right
    /// and positive values turn clockwise.
    #[must_use]
    pub fn slope(&self) -> f64 {
        (self.p2.y - self.p1.y)
            .atan2(self.p2.x - self.p1.x)
            .to_degrees()
    }

    /// Scalar projection of `p1 -> p` onto `p1 -> p2`, in segment lengths.
    /// Unbounded; 0 for a degenerate segment.
    #[must_use]
    pub fn fraction_of_projection(&self, p: Point) -> f64 {
        let seg_x = self.p2.x - self.p1.x;
        let seg_y = self.p2.y - self.p1.y;
        let squared_length = seg_x * seg_x + seg_y * seg_y;
        if squared_length == 0.0 {
            return 0.0;
        }
        let dot = (p.x - self.p1.x) * seg_x + (p.y - self.p1.y) * seg_y;
        dot / squared_length
    }

    /// [`Self::fraction_of_projection`] clamped to `[0, 1]`.
    #[must_use]
    pub fn fraction_of_closest_point(&self, p: Point) -> f64 {
        self.fraction_of_projection(p).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn contains_projection_of(&self, p: Point) -> bool {
        (0.0..=1.0).contains(&self.fraction_of_projection(p))
    }
}
