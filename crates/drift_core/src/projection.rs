//! Screen-to-world projection
//!
//! Pointer events arrive in screen space. Widgets convert them into their
//! own local space through a [`ScreenProjection`] supplied with the event.

use crate::geometry::Point;

/// Converts screen positions into world positions
pub trait ScreenProjection {
    /// Project a screen position into world space, `None` if degenerate
    fn screen_to_world(&self, screen: Point) -> Option<Point>;
}

/// Overlay canvas: screen space and world space coincide
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenSpace;

impl ScreenProjection for ScreenSpace {
    fn screen_to_world(&self, screen: Point) -> Option<Point> {
        Some(screen)
    }
}

/// Orthographic 2D camera looking at `position` with a uniform zoom
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    /// World position shown at the screen origin
    pub position: Point,
    /// Screen pixels per world unit
    pub zoom: f32,
}

impl Camera2D {
    pub fn new(position: Point, zoom: f32) -> Self {
        Self { position, zoom }
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Point::ZERO, 1.0)
    }
}

impl ScreenProjection for Camera2D {
    fn screen_to_world(&self, screen: Point) -> Option<Point> {
        if !self.zoom.is_finite() || self.zoom == 0.0 {
            tracing::trace!("camera zoom {} is degenerate, dropping pointer", self.zoom);
            return None;
        }
        Some(Point::new(
            self.position.x + screen.x / self.zoom,
            self.position.y + screen.y / self.zoom,
        ))
    }
}
