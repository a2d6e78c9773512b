//! Layout rectangles
//!
//! A [`LayoutRect`] is a viewport with its own local space; a [`ContentRect`]
//! is a rectangle anchored inside that space and moved by changing its
//! `anchored_position`. Scroll widgets only ever write the anchored position,
//! everything else is read-only layout input.

use crate::geometry::{Affine2D, Point, Rect, Size, Vec2};
use crate::projection::ScreenProjection;

/// A viewport rectangle placed in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRect {
    /// Size of the rectangle
    pub size: Size,
    /// Normalized pivot (0,0 = bottom-left, 1,1 = top-right)
    pub pivot: Vec2,
    /// Transform from this rect's local space into world space
    pub local_to_world: Affine2D,
}

impl Default for LayoutRect {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            pivot: Vec2::new(0.5, 0.5),
            local_to_world: Affine2D::IDENTITY,
        }
    }
}

impl LayoutRect {
    /// Create a centered-pivot rect located at the world origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Default::default()
        }
    }

    /// Place the rect in world space
    pub fn with_transform(mut self, local_to_world: Affine2D) -> Self {
        self.local_to_world = local_to_world;
        self
    }

    /// The rect in its own local space (the pivot sits at the origin)
    pub fn rect(&self) -> Rect {
        Rect::new(
            -self.pivot.x * self.size.width,
            -self.pivot.y * self.size.height,
            self.size.width,
            self.size.height,
        )
    }

    /// World-to-local transform, `None` when the placement is singular
    pub fn world_to_local(&self) -> Option<Affine2D> {
        self.local_to_world.inverse()
    }

    /// Project a screen position into this rect's local space
    ///
    /// Returns `None` when either the projection or the inverse placement
    /// is degenerate.
    pub fn screen_to_local(
        &self,
        screen: Point,
        projection: &dyn ScreenProjection,
    ) -> Option<Point> {
        let world = projection.screen_to_world(screen)?;
        let world_to_local = self.world_to_local()?;
        let local = world_to_local.transform_point(world);
        if local.x.is_finite() && local.y.is_finite() {
            Some(local)
        } else {
            None
        }
    }
}

/// Content rectangle anchored inside a viewport's local space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentRect {
    /// Anchor reference point in the viewport's local space
    pub anchor: Point,
    /// Offset of the pivot from the anchor (the scroll position)
    pub anchored_position: Vec2,
    /// Size of the content
    pub size: Size,
    /// Normalized pivot
    pub pivot: Vec2,
}

impl ContentRect {
    /// Content hanging from the top edge of `view`, pivot at its top-center
    pub fn top_anchored(view: &LayoutRect, size: Size) -> Self {
        let rect = view.rect();
        Self {
            anchor: Point::new(rect.center().x, rect.origin.y + rect.height()),
            anchored_position: Vec2::ZERO,
            size,
            pivot: Vec2::new(0.5, 1.0),
        }
    }

    /// Content centered in `view`
    pub fn centered(view: &LayoutRect, size: Size) -> Self {
        Self {
            anchor: view.rect().center(),
            anchored_position: Vec2::ZERO,
            size,
            pivot: Vec2::new(0.5, 0.5),
        }
    }

    /// The content rect in the viewport's local space
    pub fn rect_in_view(&self) -> Rect {
        Rect::new(
            self.anchor.x + self.anchored_position.x - self.pivot.x * self.size.width,
            self.anchor.y + self.anchored_position.y - self.pivot.y * self.size.height,
            self.size.width,
            self.size.height,
        )
    }

    /// World-space corners of the content placed inside `view`
    pub fn world_corners(&self, view: &LayoutRect) -> [Point; 4] {
        self.rect_in_view()
            .corners()
            .map(|corner| view.local_to_world.transform_point(corner))
    }
}
