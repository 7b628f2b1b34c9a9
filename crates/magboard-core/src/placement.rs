//! Drag placement: turning a pointer release into a committed item position.

use crate::board::{Board, ItemId, ItemKind, Settings};
use kurbo::{Point, Rect, Vec2};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 24.0;

/// Nominal rendered width of an item, used for clamping.
pub const ITEM_WIDTH: f64 = 120.0;
/// Nominal rendered height of an item, used for clamping.
pub const ITEM_HEIGHT: f64 = 40.0;

/// Horizontal shift that centers a magnet's drag handle under the pointer.
pub const DRAG_OFFSET_X: f64 = 60.0;
/// Vertical shift applied to every kind.
pub const DRAG_OFFSET_Y: f64 = 20.0;

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Convert a viewport point into board-local coordinates.
pub fn viewport_to_board(viewport_point: Point, board_rect: Rect) -> Point {
    viewport_point - board_rect.origin().to_vec2()
}

/// Offset from the pointer to the item's top-left corner for `kind`.
pub fn drag_offset(kind: ItemKind) -> Vec2 {
    match kind {
        ItemKind::Label => Vec2::new(0.0, DRAG_OFFSET_Y),
        ItemKind::Magnet => Vec2::new(DRAG_OFFSET_X, DRAG_OFFSET_Y),
    }
}

/// Largest allowed top-left coordinate along one axis.
///
/// With snapping on, the limit is pulled down to a grid line so the clamped
/// value stays a grid multiple.
fn axis_limit(extent: f64, item_extent: f64, snap: bool) -> f64 {
    let limit = (extent - item_extent).max(0.0);
    if snap {
        (limit / GRID_SIZE).floor() * GRID_SIZE
    } else {
        limit
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    // Written out so that -0.0 also lands on 0.0.
    if value <= 0.0 {
        0.0
    } else if value > max {
        max
    } else {
        value
    }
}

/// Compute where an item of `kind` lands when released at `viewport_point`.
///
/// Returns `None` when the board is locked, when the board rect has not been
/// laid out yet (non-positive or non-finite size), or when the pointer is not
/// a finite point.
pub fn place(
    kind: ItemKind,
    viewport_point: Point,
    board_rect: Rect,
    settings: &Settings,
) -> Option<Point> {
    if settings.locked {
        return None;
    }
    let (width, height) = (board_rect.width(), board_rect.height());
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        log::debug!("Deferring placement: board not laid out ({width}x{height})");
        return None;
    }
    if !viewport_point.is_finite() || !board_rect.origin().is_finite() {
        return None;
    }

    let mut target = viewport_to_board(viewport_point, board_rect) - drag_offset(kind);
    if settings.snap_enabled {
        target = snap_to_grid(target, GRID_SIZE);
    }

    let max_x = axis_limit(width, ITEM_WIDTH, settings.snap_enabled);
    let max_y = axis_limit(height, ITEM_HEIGHT, settings.snap_enabled);
    Some(Point::new(clamp_axis(target.x, max_x), clamp_axis(target.y, max_y)))
}

impl Board {
    /// Commit a drag release for the item `id`.
    ///
    /// Only the dragged item changes, so concurrent drags of different items
    /// never overwrite each other. Unknown ids, a locked board and an unlaid
    /// board rect all leave the board as is.
    #[must_use]
    pub fn place_item(&self, id: &ItemId, viewport_point: Point, board_rect: Rect) -> Self {
        let Some(item) = self.item(id) else {
            log::debug!("Ignoring drag of missing item {id}");
            return self.clone();
        };
        match place(item.kind, viewport_point, board_rect, self.settings()) {
            Some(position) => self.with_item_position(id, position),
            None => self.clone(),
        }
    }
}
