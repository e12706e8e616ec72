use serde::Serialize;
use waymark_core::config::PointerConfig;
use waymark_core::geometry::{
    Padding, PixelSize, Point, PoseCalculator, ScreenOffset, Side, Viewport,
};
use waymark_core::{Result, SqliteMarkerStore, WaymarkError};

use crate::cli::PointerArgs;

/// Pose of the pointer plus everything a renderer needs to place it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(super) struct PointerReport {
    pub(super) side: Side,
    pub(super) side_fraction: f32,
    pub(super) direction_degrees: f32,
    pub(super) heading: f64,
    pub(super) screen_rotation: f64,
    pub(super) coordinates: ScreenOffset,
}

/// Full map size and normalized pin the pointer is computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PointerTarget {
    pub(super) full_map_size: PixelSize,
    pub(super) pin: Point,
}

impl PointerArgs {
    pub(super) const fn needs_store(&self) -> bool {
        self.map_id.is_some() || self.marker_id.is_some()
    }
}

/// Explicit flags win; `--map` and `--marker` fill in whatever is missing.
pub(super) fn resolve_target(
    args: &PointerArgs,
    store: Option<&SqliteMarkerStore>,
) -> Result<PointerTarget> {
    let marker = match args.marker_id {
        Some(id) => Some(require_store(store)?.load_marker(id)?),
        None => None,
    };
    let map_id = match (args.map_id, &marker) {
        (Some(map_id), Some(marker)) if map_id != marker.map_id => {
            return Err(WaymarkError::Validation(format!(
                "marker {} is on map {}, not map {map_id}",
                marker.id, marker.map_id
            )));
        }
        (Some(map_id), _) => Some(map_id),
        (None, marker) => marker.as_ref().map(|marker| marker.map_id),
    };

    let full_map_size = match (args.map_width, args.map_height, map_id) {
        (Some(width), Some(height), _) => PixelSize::new(width, height),
        (_, _, Some(map_id)) => require_store(store)?.load_map_info(map_id)?.full_size(),
        _ => {
            return Err(WaymarkError::Validation(
                "pointer needs --map-width and --map-height, --map or --marker".to_string(),
            ));
        }
    };
    let pin = match (&marker, args.pin_x, args.pin_y) {
        (Some(marker), _, _) => Point::new(marker.x, marker.y),
        (None, Some(x), Some(y)) => Point::new(x, y),
        _ => {
            return Err(WaymarkError::Validation(
                "pointer needs --pin-x and --pin-y or --marker".to_string(),
            ));
        }
    };
    Ok(PointerTarget { full_map_size, pin })
}

fn require_store(store: Option<&SqliteMarkerStore>) -> Result<&SqliteMarkerStore> {
    store.ok_or_else(|| {
        WaymarkError::Validation("--map and --marker need a marker database".to_string())
    })
}

/// `None` when the pin is visible and no pointer is needed.
pub(super) fn compute_pointer(
    args: &PointerArgs,
    target: PointerTarget,
    config: PointerConfig,
) -> Result<Option<PointerReport>> {
    let calculator = match args.epsilon {
        Some(epsilon) => PoseCalculator::new(epsilon)?,
        None => config.calculator(),
    };
    let layout_size = PixelSize::new(args.layout_width, args.layout_height);
    let viewport = Viewport::new(
        Point::new(args.center_x, args.center_y),
        args.scale,
        args.rotation,
        target.full_map_size,
        layout_size,
    )?;
    let pin = viewport.to_map_pixels(target.pin);

    let Some(pose) = calculator.pose_for(&viewport, pin, args.indicator_size)? else {
        tracing::debug!(pin_x = pin.x, pin_y = pin.y, "pin is visible");
        return Ok(None);
    };
    let full_area = viewport.visible_area(Padding::NONE);
    Ok(Some(PointerReport {
        side: pose.side,
        side_fraction: pose.side_fraction,
        direction_degrees: pose.direction_degrees,
        heading: pose.heading(),
        screen_rotation: pose.screen_rotation(&full_area),
        coordinates: pose.coordinates(layout_size, args.indicator_size),
    }))
}
