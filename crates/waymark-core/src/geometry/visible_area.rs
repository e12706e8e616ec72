use serde::{Deserialize, Serialize};

use crate::error::{Result, WaymarkError};

use super::{LineSegment, PixelSize, Point};

/// Rectangle of the map shown on screen, in map pixels.
///
/// `p1 -> p2` is the top edge, `p2 -> p3` the right, `p3 -> p4` the bottom and
/// `p4 -> p1` the left one, as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleArea {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub p4: Point,
}

impl VisibleArea {
    #[must_use]
    pub const fn new(p1: Point, p2: Point, p3: Point, p4: Point) -> Self {
        Self { p1, p2, p3, p4 }
    }

    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        [self.p1, self.p2, self.p3, self.p4]
    }

    #[must_use]
    pub const fn top(&self) -> LineSegment {
        LineSegment::new(self.p1, self.p2)
    }

    #[must_use]
    pub const fn bottom(&self) -> LineSegment {
        LineSegment::new(self.p4, self.p3)
    }

    #[must_use]
    pub const fn left(&self) -> LineSegment {
        LineSegment::new(self.p1, self.p4)
    }

    #[must_use]
    pub const fn right(&self) -> LineSegment {
        LineSegment::new(self.p2, self.p3)
    }

    /// Rotation of the area in degrees within `(-180, 180]`, clockwise positive.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.top().slope()
    }

    #[must_use]
    pub fn centroid(&self) -> Point {
        self.p1.midpoint(self.p3)
    }

    /// Exact for rectangles, which is what [`Viewport::visible_area`] builds.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.top().contains_projection_of(p) && self.left().contains_projection_of(p)
    }
}

/// Extra on-screen pixels added around the layout on each side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Padding {
    pub const NONE: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// How far past the layout a pin glyph of `indicator_size` pixels still
    /// shows. The glyph hangs above its anchor point, centered horizontally.
    #[must_use]
    pub fn for_indicator(indicator_size: u32) -> Self {
        let size = f64::from(indicator_size);
        Self {
            left: size / 2.0,
            top: 0.0,
            right: size / 2.0,
            bottom: size,
        }
    }
}

/// Map state needed to locate the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    center: Point,
    scale: f64,
    rotation_degrees: f64,
    full_map_size: PixelSize,
    layout_size: PixelSize,
}

impl Viewport {
    /// `center` is in normalized map coordinates, `rotation_degrees` is how far
    /// the map content is turned clockwise on screen.
    pub fn new(
        center: Point,
        scale: f64,
        rotation_degrees: f64,
        full_map_size: PixelSize,
        layout_size: PixelSize,
    ) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WaymarkError::Validation(format!(
                "viewport scale must be finite and > 0, got {scale}"
            )));
        }
        if !rotation_degrees.is_finite() {
            return Err(WaymarkError::Validation(format!(
                "viewport rotation must be finite, got {rotation_degrees}"
            )));
        }
        if !center.x.is_finite() || !center.y.is_finite() {
            return Err(WaymarkError::Validation(
                "viewport center must be finite".to_string(),
            ));
        }
        if full_map_size.is_empty() {
            return Err(WaymarkError::Validation(format!(
                "full map size must be non-empty, got {}x{}",
                full_map_size.width, full_map_size.height
            )));
        }
        Ok(Self {
            center,
            scale,
            rotation_degrees: rotation_degrees.rem_euclid(360.0),
            full_map_size,
            layout_size,
        })
    }

    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation normalized to `[0, 360)`.
    #[must_use]
    pub const fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    #[must_use]
    pub const fn full_map_size(&self) -> PixelSize {
        self.full_map_size
    }

    #[must_use]
    pub const fn layout_size(&self) -> PixelSize {
        self.layout_size
    }

    /// Map-pixel position of a point given in normalized map coordinates.
    #[must_use]
    pub fn to_map_pixels(&self, normalized: Point) -> Point {
        Point::new(
            normalized.x * f64::from(self.full_map_size.width),
            normalized.y * f64::from(self.full_map_size.height),
        )
    }

    /// Area of the map visible in the layout grown by `padding`.
    ///
    /// Normalized coordinates are anisotropic in pixels on non-square maps, so
    /// the x axis is stretched to the y axis density before rotating and the
    /// result is scaled back to pixels. This keeps the area a rectangle.
    #[must_use]
    pub fn visible_area(&self, padding: Padding) -> VisibleArea {
        let map_width = f64::from(self.full_map_size.width);
        let map_height = f64::from(self.full_map_size.height);
        let half_layout_width = f64::from(self.layout_size.width) / 2.0;
        let half_layout_height = f64::from(self.layout_size.height) / 2.0;

        let left_x = self.center.x - (half_layout_width + padding.left) / (map_width * self.scale);
        let top_y = self.center.y - (half_layout_height + padding.top) / (map_height * self.scale);
        let right_x =
            self.center.x + (half_layout_width + padding.right) / (map_width * self.scale);
        let bottom_y =
            self.center.y + (half_layout_height + padding.bottom) / (map_height * self.scale);

        let x_axis_scale = map_height / map_width;
        let scaled_center = Point::new(self.center.x / x_axis_scale, self.center.y);
        // the area turns against the map content
        let radians = -self.rotation_degrees.to_radians();

        let corner = |x: f64, y: f64| {
            let rotated = Point::new(x / x_axis_scale, y).rotated_around(scaled_center, radians);
            // x_axis_scale * map_width == map_height
            Point::new(rotated.x * map_height, rotated.y * map_height)
        };

        VisibleArea::new(
            corner(left_x, top_y),
            corner(right_x, top_y),
            corner(right_x, bottom_y),
            corner(left_x, bottom_y),
        )
    }
}
