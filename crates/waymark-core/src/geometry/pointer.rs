use serde::{Deserialize, Serialize};

use crate::error::{Result, WaymarkError};

use super::{LineSegment, Padding, PixelSize, Point, Viewport, VisibleArea, normalize_degrees};

/// Tolerance, in edge fractions, for snapping a pin to an edge end.
pub const DEFAULT_POSE_EPSILON: f64 = 1e-5;

/// The pointer glyph points straight down when unrotated.
const GLYPH_HEADING_DEGREES: f64 = 90.0;
/// Turning an edge slope around to face out of the area.
const HALF_TURN_DEGREES: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Where to draw the off-screen pointer and which way to turn it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPose {
    pub side: Side,
    /// Position along the side, from its top or left end, in `[0, 1]`.
    pub side_fraction: f32,
    /// Rotation of the pointer glyph in map degrees, clockwise positive.
    pub direction_degrees: f32,
}

impl PointerPose {
    /// Placeholder before any real pose has been computed.
    pub const EMPTY: Self = Self {
        side: Side::Top,
        side_fraction: 0.0,
        direction_degrees: 0.0,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Angle the pointer points at on the map, in `(-180, 180]`; 0 is right.
    #[must_use]
    pub fn heading(&self) -> f64 {
        normalize_degrees(f64::from(self.direction_degrees) + GLYPH_HEADING_DEGREES)
    }

    /// Glyph rotation to apply on screen, where the map itself is rotated.
    #[must_use]
    pub fn screen_rotation(&self, full_area: &VisibleArea) -> f64 {
        f64::from(self.direction_degrees) - full_area.rotation()
    }

    /// Top-left pixel of an `indicator_size` pointer pressed against the pose
    /// side of `box_size`, never leaving the box.
    #[must_use]
    pub fn coordinates(&self, box_size: PixelSize, indicator_size: u32) -> ScreenOffset {
        let along = |extent: u32| {
            let centered = f64::from(extent) * f64::from(self.side_fraction)
                - f64::from(indicator_size) / 2.0;
            truncate_to_i64(centered).clamp(0, far_edge(extent, indicator_size))
        };
        match self.side {
            Side::Left => ScreenOffset {
                x: 0,
                y: along(box_size.height),
            },
            Side::Right => ScreenOffset {
                x: far_edge(box_size.width, indicator_size),
                y: along(box_size.height),
            },
            Side::Top => ScreenOffset {
                x: along(box_size.width),
                y: 0,
            },
            Side::Bottom => ScreenOffset {
                x: along(box_size.width),
                y: far_edge(box_size.height, indicator_size),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenOffset {
    pub x: i64,
    pub y: i64,
}

/// Keeps the last real pose so a pointer can finish its exit animation after
/// the pin became visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainedPose {
    last: Option<PointerPose>,
}

impl RetainedPose {
    /// Records `current` if there is one and returns the pose to draw.
    pub fn update(&mut self, current: Option<PointerPose>) -> PointerPose {
        if current.is_some() {
            self.last = current;
        }
        self.last.unwrap_or(PointerPose::EMPTY)
    }

    #[must_use]
    pub const fn last(&self) -> Option<PointerPose> {
        self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseCalculator {
    epsilon: f64,
}

impl Default for PoseCalculator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_POSE_EPSILON,
        }
    }
}

impl PoseCalculator {
    pub fn new(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 || epsilon >= 0.5 {
            return Err(WaymarkError::Validation(format!(
                "pose epsilon must be within (0, 0.5), got {epsilon}"
            )));
        }
        Ok(Self { epsilon })
    }

    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Pose of a pointer to `pin`, or `None` when the pin is visible.
    ///
    /// `padded_area` decides visibility and must enclose `full_area`, which
    /// gives the edges and angles. A pin outside the padded area but strictly
    /// inside the full one breaks that contract and is an
    /// [`WaymarkError::InvariantViolation`].
    pub fn compute_pose(
        &self,
        full_area: &VisibleArea,
        padded_area: &VisibleArea,
        pin: Point,
    ) -> Result<Option<PointerPose>> {
        if !pin.x.is_finite() || !pin.y.is_finite() {
            return Err(WaymarkError::Validation(format!(
                "pin position must be finite, got ({}, {})",
                pin.x, pin.y
            )));
        }
        if padded_area.contains(pin) {
            return Ok(None);
        }

        let top = full_area.top();
        let left = full_area.left();
        let horizontal = top.fraction_of_closest_point(pin);
        let vertical = left.fraction_of_closest_point(pin);

        let at_start = |fraction: f64| fraction < self.epsilon;
        let at_end = |fraction: f64| fraction > 1.0 - self.epsilon;
        let toward_pin = |from: Point| LineSegment::new(from, pin).slope();

        let (side, side_fraction, heading) = if at_start(horizontal) && at_start(vertical) {
            (Side::Top, 0.0, toward_pin(top.p1))
        } else if at_end(horizontal) && at_start(vertical) {
            (Side::Top, 1.0, toward_pin(top.p2))
        } else if at_start(horizontal) && at_end(vertical) {
            (Side::Bottom, 0.0, toward_pin(left.p2))
        } else if at_end(horizontal) && at_end(vertical) {
            (Side::Bottom, 1.0, toward_pin(full_area.p3))
        } else if at_start(horizontal) {
            (Side::Left, vertical, top.slope() - HALF_TURN_DEGREES)
        } else if at_end(horizontal) {
            (Side::Right, vertical, top.slope())
        } else if at_start(vertical) {
            (Side::Top, horizontal, left.slope() - HALF_TURN_DEGREES)
        } else if at_end(vertical) {
            (Side::Bottom, horizontal, left.slope())
        } else {
            return Err(WaymarkError::InvariantViolation(format!(
                "pin ({}, {}) is outside the padded area but inside the full one",
                pin.x, pin.y
            )));
        };

        Ok(Some(PointerPose {
            side,
            side_fraction: narrow_to_f32(side_fraction),
            direction_degrees: narrow_to_f32(heading - GLYPH_HEADING_DEGREES),
        }))
    }

    /// Computes the full and indicator-padded areas of `viewport` and the pose
    /// of a pointer to `pin` (map pixels).
    pub fn pose_for(
        &self,
        viewport: &Viewport,
        pin: Point,
        indicator_size: u32,
    ) -> Result<Option<PointerPose>> {
        let full_area = viewport.visible_area(Padding::NONE);
        let padded_area = viewport.visible_area(Padding::for_indicator(indicator_size));
        self.compute_pose(&full_area, &padded_area, pin)
    }
}

fn far_edge(extent: u32, indicator_size: u32) -> i64 {
    (i64::from(extent) - i64::from(indicator_size)).max(0)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "pose angles and fractions only need single precision for rendering"
)]
fn narrow_to_f32(value: f64) -> f32 {
    value as f32
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "on-screen offsets are truncated toward zero like integer pixel layouts"
)]
fn truncate_to_i64(value: f64) -> i64 {
    value as i64
}
