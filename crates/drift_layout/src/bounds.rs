//! Bounds math for scroll containers
//!
//! Stateless helpers that measure content against its viewport. All bounds
//! are expressed in the viewport's local space.

use drift_core::{Affine2D, Bounds, Point, Vec2};

use crate::widgets::scroll::MovementType;

/// Axis-aligned bounds of world-space `corners` in the viewport's local space
pub fn content_bounds(corners: &[Point; 4], world_to_view: &Affine2D) -> Bounds {
    let mut min = Vec2::new(f32::MAX, f32::MAX);
    let mut max = Vec2::new(f32::MIN, f32::MIN);

    for corner in corners {
        let local = Vec2::from(world_to_view.transform_point(*corner));
        min = min.min(local);
        max = max.max(local);
    }

    Bounds::from_min_max(min, max)
}

/// Grow content that is smaller than the view to the view's size
///
/// The content keeps its pivot edge in place: a top-pivoted list shorter
/// than its viewport is treated as extending down to the view's bottom.
pub fn adjust_bounds(view: &Bounds, content_pivot: Vec2, content: &mut Bounds) {
    let excess = view.size - content.size;
    for axis in 0..2 {
        if excess[axis] > 0.0 {
            content.center[axis] -= excess[axis] * (content_pivot[axis] - 0.5);
            content.size[axis] = view.size[axis];
        }
    }
}

/// Offset that would bring `content` (moved by `delta`) back inside `view`
///
/// Only enabled axes are corrected, and `Unrestricted` movement never is.
pub fn calculate_offset(
    view: &Bounds,
    content: &Bounds,
    horizontal: bool,
    vertical: bool,
    movement: MovementType,
    delta: Vec2,
) -> Vec2 {
    let mut offset = Vec2::ZERO;
    if movement == MovementType::Unrestricted {
        return offset;
    }

    let mut min = content.min();
    let mut max = content.max();
    let view_min = view.min();
    let view_max = view.max();

    if horizontal {
        min.x += delta.x;
        max.x += delta.x;
        if min.x > view_min.x {
            offset.x = view_min.x - min.x;
        } else if max.x < view_max.x {
            offset.x = view_max.x - max.x;
        }
    }

    // Vertical checks the top edge first so a list pulled down snaps to its top
    if vertical {
        min.y += delta.y;
        max.y += delta.y;
        if max.y < view_max.y {
            offset.y = view_max.y - max.y;
        } else if min.y > view_min.y {
            offset.y = view_min.y - min.y;
        }
    }

    offset
}

/// Rubber-band compression for an overstretch past the view edge
///
/// Grows without bound in `overstretch` but approaches `view_size`, so the
/// further content is pulled out the less it follows the pointer.
pub fn rubber_delta(overstretch: f32, view_size: f32) -> f32 {
    if view_size <= 0.0 || !view_size.is_finite() {
        return 0.0;
    }
    (1.0 - 1.0 / (overstretch.abs() * 0.55 / view_size + 1.0)) * view_size * overstretch.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Bounds {
        Bounds::new(Vec2::ZERO, Vec2::new(400.0, 600.0))
    }

    #[test]
    fn test_unrestricted_offset_is_zero() {
        let content = Bounds::new(Vec2::new(500.0, 900.0), Vec2::new(50.0, 50.0));
        for delta in [Vec2::ZERO, Vec2::new(-1000.0, 1000.0), Vec2::new(3.0, -7.0)] {
            let offset = calculate_offset(
                &view(),
                &content,
                true,
                true,
                MovementType::Unrestricted,
                delta,
            );
            assert_eq!(offset, Vec2::ZERO);
        }
    }

    #[test]
    fn test_content_covering_view_needs_no_offset() {
        // Content larger than the view and overlapping it on every edge
        let content = Bounds::new(Vec2::new(10.0, -20.0), Vec2::new(500.0, 900.0));
        for movement in [MovementType::Elastic, MovementType::Clamped] {
            let offset = calculate_offset(&view(), &content, true, true, movement, Vec2::ZERO);
            assert_eq!(offset, Vec2::ZERO);
        }
    }

    #[test]
    fn test_offset_pulls_content_back_on_enabled_axes_only() {
        // Content top edge sits 50 below the view top
        let content = Bounds::from_min_max(Vec2::new(-200.0, -950.0), Vec2::new(200.0, 250.0));
        let offset = calculate_offset(
            &view(),
            &content,
            false,
            true,
            MovementType::Elastic,
            Vec2::ZERO,
        );
        assert_eq!(offset, Vec2::new(0.0, 50.0));

        // Shifted right by 30: horizontal correction only when enabled
        let shifted = calculate_offset(
            &view(),
            &content,
            false,
            false,
            MovementType::Elastic,
            Vec2::new(30.0, 0.0),
        );
        assert_eq!(shifted, Vec2::ZERO);
        let shifted = calculate_offset(
            &view(),
            &content,
            true,
            false,
            MovementType::Elastic,
            Vec2::new(30.0, 0.0),
        );
        assert_eq!(shifted, Vec2::new(-30.0, 0.0));
    }

    #[test]
    fn test_rubber_delta_limits() {
        assert_eq!(rubber_delta(0.0, 600.0), 0.0);
        let far = rubber_delta(1.0e9, 600.0);
        assert!((far - 600.0).abs() < 0.01);
        let far_negative = rubber_delta(-1.0e9, 600.0);
        assert!((far_negative + 600.0).abs() < 0.01);
        // Monotonic and below the view size
        assert!(rubber_delta(100.0, 600.0) < rubber_delta(200.0, 600.0));
        assert!(rubber_delta(200.0, 600.0) < 200.0);
    }

    #[test]
    fn test_adjust_bounds_extends_small_content_from_pivot_edge() {
        let mut content = Bounds::from_min_max(Vec2::new(-200.0, 100.0), Vec2::new(200.0, 300.0));
        adjust_bounds(&view(), Vec2::new(0.5, 1.0), &mut content);
        assert_eq!(content.max().y, 300.0);
        assert_eq!(content.size.y, 600.0);
        assert_eq!(content.size.x, 400.0);
    }

    #[test]
    fn test_content_bounds_in_view_space() {
        let corners = [
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(50.0, 30.0),
            Point::new(50.0, 10.0),
        ];
        let world_to_view = Affine2D::translation(-10.0, -10.0);
        let bounds = content_bounds(&corners, &world_to_view);
        assert_eq!(bounds.min(), Vec2::new(0.0, 0.0));
        assert_eq!(bounds.max(), Vec2::new(40.0, 20.0));
    }
}
