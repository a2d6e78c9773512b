//! Drag-driven scroll physics with elastic edges and inertia
//!
//! [`ScrollPhysics`] converts pointer drags into a content position inside a
//! viewport. Each frame the host calls [`ScrollPhysics::late_update`], which
//! springs overstretched content back into bounds, lets released content
//! glide with decaying velocity, or clamps it hard, depending on the
//! configured [`MovementType`].
//!
//! # Example
//!
//! ```rust
//! use drift_core::{ContentRect, LayoutRect, Point, ScreenSpace, Size};
//! use drift_layout::widgets::scroll::{ScrollConfig, ScrollPhysics};
//!
//! let view = LayoutRect::new(400.0, 600.0);
//! let content = ContentRect::top_anchored(&view, Size::new(400.0, 2000.0));
//! let mut physics = ScrollPhysics::new(ScrollConfig::default(), view, content);
//!
//! physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
//! physics.drag(Point::new(0.0, 120.0), &ScreenSpace);
//! physics.late_update(1.0 / 60.0);
//! physics.end_drag();
//!
//! assert_eq!(physics.content_position().y, 120.0);
//! ```
//!
//! # Features
//!
//! - **Rubber band**: dragging past an edge meets growing resistance
//! - **Elastic snap-back**: critically damped return to bounds after release
//! - **Inertia**: release velocity decays exponentially per second
//! - **Axis locking**: a disabled axis never moves
//! - **Pluggable position writes**: a [`PositionSetter`] can rewrite every
//!   position before it is applied (used by the infinite list)

use drift_animation::{lerp_vec2, smooth_damp};
use drift_core::{
    Bounds, ContentRect, DragHandler, LayoutRect, Point, PointerEvent, ScreenProjection, Size,
    Vec2,
};
use serde::{Deserialize, Serialize};

use crate::bounds;
use crate::error::{ConfigError, Result};

/// Speeds below this (units per second) are treated as stopped
const VELOCITY_EPSILON: f32 = 1.0;

// ============================================================================
// Scroll Configuration
// ============================================================================

/// How content behaves when moved past the viewport edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Content can move anywhere
    Unrestricted,
    /// Content can be pulled out and springs back (default)
    #[default]
    Elastic,
    /// Content is held inside the viewport
    Clamped,
}

/// Configuration for scroll behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Edge behavior
    pub movement_type: MovementType,
    /// Snap-back smoothing time in seconds (Elastic only)
    pub elasticity: f32,
    /// Keep moving after release
    pub inertia: bool,
    /// Fraction of velocity kept after one second (inertia only)
    pub deceleration_rate: f32,
    /// Allow horizontal movement
    pub horizontal: bool,
    /// Allow vertical movement
    pub vertical: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            movement_type: MovementType::Elastic,
            elasticity: 0.1,
            inertia: true,
            deceleration_rate: 0.135,
            horizontal: false,
            vertical: true,
        }
    }
}

impl ScrollConfig {
    /// Create config that keeps content inside the viewport
    pub fn clamped() -> Self {
        Self {
            movement_type: MovementType::Clamped,
            ..Default::default()
        }
    }

    /// Create config without edge correction
    pub fn unrestricted() -> Self {
        Self {
            movement_type: MovementType::Unrestricted,
            ..Default::default()
        }
    }

    /// Create config that stops as soon as the pointer is released
    pub fn no_inertia() -> Self {
        Self {
            inertia: false,
            ..Default::default()
        }
    }

    /// Check the numeric parameters
    pub fn validate(&self) -> Result<()> {
        if !self.elasticity.is_finite() || self.elasticity < 0.0 {
            return Err(ConfigError::InvalidElasticity(self.elasticity));
        }
        if !(0.0..=1.0).contains(&self.deceleration_rate) {
            return Err(ConfigError::InvalidDecelerationRate(self.deceleration_rate));
        }
        Ok(())
    }
}

// ============================================================================
// Position Setter
// ============================================================================

/// Drag bookkeeping that position setters may compensate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragContext {
    /// A drag session is active
    pub dragging: bool,
    /// Pointer position in view space when the drag began
    pub pointer_start_local_cursor: Vec2,
    /// Content position when the drag began
    pub content_start_position: Vec2,
    /// Content position at the end of the previous frame
    pub prev_position: Vec2,
}

/// Final say over every content position written by [`ScrollPhysics`]
///
/// Called after axis locking. Implementations that move the position
/// discontinuously must shift the [`DragContext`] reference points by the
/// same amount so the drag and the velocity estimate stay continuous.
pub trait PositionSetter {
    fn adjust_position(&mut self, position: Vec2, drag: &mut DragContext) -> Vec2;
}

/// Writes positions unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectSetter;

impl PositionSetter for DirectSetter {
    fn adjust_position(&mut self, position: Vec2, _drag: &mut DragContext) -> Vec2 {
        position
    }
}

// ============================================================================
// Scroll Physics State
// ============================================================================

/// Observable motion state, derived each time it is queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPhase {
    /// At rest inside bounds
    #[default]
    Idle,
    /// Following the pointer
    Dragging,
    /// Springing back into bounds
    Bouncing,
    /// Gliding on inertia
    Decelerating,
}

/// Scroll physics for a content rect inside a viewport
pub struct ScrollPhysics<S: PositionSetter = DirectSetter> {
    /// Configuration, may be replaced between frames
    pub config: ScrollConfig,
    view: LayoutRect,
    content: ContentRect,
    setter: S,
    drag: DragContext,
    velocity: Vec2,
    view_bounds: Bounds,
    content_bounds: Bounds,
    prev_view_bounds: Bounds,
    prev_content_bounds: Bounds,
}

impl ScrollPhysics<DirectSetter> {
    /// Create physics that writes positions directly
    pub fn new(config: ScrollConfig, view: LayoutRect, content: ContentRect) -> Self {
        Self::with_setter(config, view, content, DirectSetter)
    }
}

impl<S: PositionSetter> ScrollPhysics<S> {
    /// Create physics whose position writes pass through `setter`
    pub fn with_setter(config: ScrollConfig, view: LayoutRect, content: ContentRect, setter: S) -> Self {
        let mut physics = Self {
            config,
            view,
            content,
            setter,
            drag: DragContext::default(),
            velocity: Vec2::ZERO,
            view_bounds: Bounds::default(),
            content_bounds: Bounds::default(),
            prev_view_bounds: Bounds::default(),
            prev_content_bounds: Bounds::default(),
        };
        physics.update_bounds();
        physics.update_prev_data();
        physics
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current anchored content position
    pub fn content_position(&self) -> Vec2 {
        self.content.anchored_position
    }

    pub fn content(&self) -> &ContentRect {
        &self.content
    }

    pub fn view(&self) -> &LayoutRect {
        &self.view
    }

    /// Replace the viewport (e.g. after a resize)
    pub fn set_view(&mut self, view: LayoutRect) {
        self.view = view;
        self.update_bounds();
    }

    /// Resize the content, keeping its anchor and position
    pub fn set_content_size(&mut self, size: Size) {
        self.content.size = size;
        self.update_bounds();
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Drop any remaining momentum
    pub fn stop_movement(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn drag_context(&self) -> &DragContext {
        &self.drag
    }

    pub fn view_bounds(&self) -> Bounds {
        self.view_bounds
    }

    pub fn content_bounds(&self) -> Bounds {
        self.content_bounds
    }

    pub fn setter(&self) -> &S {
        &self.setter
    }

    pub fn setter_mut(&mut self) -> &mut S {
        &mut self.setter
    }

    /// Current motion phase
    pub fn phase(&self) -> ScrollPhase {
        if self.drag.dragging {
            return ScrollPhase::Dragging;
        }
        let offset = self.calculate_offset(Vec2::ZERO);
        if self.config.movement_type == MovementType::Elastic && !offset.is_zero() {
            ScrollPhase::Bouncing
        } else if !self.velocity.is_zero() {
            ScrollPhase::Decelerating
        } else {
            ScrollPhase::Idle
        }
    }

    // =========================================================================
    // Drag lifecycle
    // =========================================================================

    /// Start a drag session at a screen position
    pub fn begin_drag(&mut self, screen: Point, projection: &dyn ScreenProjection) {
        self.update_bounds();

        let cursor = self
            .view
            .screen_to_local(screen, projection)
            .map(Vec2::from)
            .unwrap_or(Vec2::ZERO);
        self.drag.pointer_start_local_cursor = cursor;
        self.drag.content_start_position = self.content.anchored_position;
        self.drag.dragging = true;

        tracing::trace!(
            "begin drag cursor=({:.1}, {:.1}) content=({:.1}, {:.1})",
            cursor.x,
            cursor.y,
            self.content.anchored_position.x,
            self.content.anchored_position.y
        );
    }

    /// Follow the pointer to a new screen position
    ///
    /// Ignored outside a drag session and when the position cannot be
    /// projected into the viewport.
    pub fn drag(&mut self, screen: Point, projection: &dyn ScreenProjection) {
        if !self.drag.dragging {
            return;
        }
        let Some(local) = self.view.screen_to_local(screen, projection) else {
            return;
        };

        self.update_bounds();

        let pointer_delta = Vec2::from(local) - self.drag.pointer_start_local_cursor;
        let mut position = self.drag.content_start_position + pointer_delta;

        let offset = self.calculate_offset(position - self.content.anchored_position);
        position += offset;

        if self.config.movement_type == MovementType::Elastic {
            for axis in 0..2 {
                if offset[axis] != 0.0 {
                    position[axis] -= bounds::rubber_delta(offset[axis], self.view_bounds.size[axis]);
                }
            }
        }

        self.set_content_anchored_position(position);
    }

    /// End the drag session; velocity is kept for inertia
    pub fn end_drag(&mut self) {
        self.drag.dragging = false;
        tracing::trace!(
            "end drag velocity=({:.1}, {:.1})",
            self.velocity.x,
            self.velocity.y
        );
    }

    // =========================================================================
    // Frame update
    // =========================================================================

    /// Per-frame settle step
    ///
    /// Runs once per frame whether or not a drag is active. `dt` is the
    /// unscaled frame time in seconds; a zero `dt` integrates nothing.
    pub fn late_update(&mut self, dt: f32) {
        self.update_bounds();
        let mut offset = self.calculate_offset(Vec2::ZERO);

        if dt > 0.0 {
            if !self.drag.dragging && (!offset.is_zero() || !self.velocity.is_zero()) {
                let current = self.content.anchored_position;
                let mut position = current;

                for axis in 0..2 {
                    if self.config.movement_type == MovementType::Elastic && offset[axis] != 0.0 {
                        let mut speed = self.velocity[axis];
                        position[axis] = smooth_damp(
                            current[axis],
                            current[axis] + offset[axis],
                            &mut speed,
                            self.config.elasticity,
                            f32::INFINITY,
                            dt,
                        );
                        if speed.abs() < VELOCITY_EPSILON {
                            speed = 0.0;
                        }
                        self.velocity[axis] = speed;
                    } else if self.config.inertia {
                        self.velocity[axis] *= self.config.deceleration_rate.powf(dt);
                        if self.velocity[axis].abs() < VELOCITY_EPSILON {
                            self.velocity[axis] = 0.0;
                        }
                        position[axis] += self.velocity[axis] * dt;
                    } else {
                        self.velocity[axis] = 0.0;
                    }
                }

                if self.config.movement_type == MovementType::Clamped {
                    offset = self.calculate_offset(position - current);
                    position += offset;
                }

                tracing::trace!(
                    "settle ({:.1}, {:.1}) -> ({:.1}, {:.1}) velocity=({:.1}, {:.1})",
                    current.x,
                    current.y,
                    position.x,
                    position.y,
                    self.velocity.x,
                    self.velocity.y
                );

                self.set_content_anchored_position(position);
            }

            if self.drag.dragging && self.config.inertia {
                let new_velocity =
                    (self.content.anchored_position - self.drag.prev_position) / dt;
                self.velocity = lerp_vec2(self.velocity, new_velocity, dt * 10.0);
            }
        }

        if self.view_bounds != self.prev_view_bounds
            || self.content_bounds != self.prev_content_bounds
            || self.content.anchored_position != self.drag.prev_position
        {
            self.update_prev_data();
        }
    }

    // =========================================================================
    // Position writes
    // =========================================================================

    /// Write a content position through axis locking and the position setter
    pub fn set_content_anchored_position(&mut self, mut position: Vec2) {
        let current = self.content.anchored_position;
        if !self.config.horizontal {
            position.x = current.x;
        }
        if !self.config.vertical {
            position.y = current.y;
        }

        let position = self.setter.adjust_position(position, &mut self.drag);

        if position != current {
            self.content.anchored_position = position;
            self.update_bounds();
        }
    }

    /// Stop and jump to `position`
    pub fn scroll_to(&mut self, position: Vec2) {
        self.stop_movement();
        self.set_content_anchored_position(position);
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Recompute view and content bounds from the current layout
    pub fn update_bounds(&mut self) {
        self.view_bounds = Bounds::from(self.view.rect());

        let Some(world_to_view) = self.view.world_to_local() else {
            tracing::trace!("viewport transform is singular, keeping previous bounds");
            return;
        };

        let corners = self.content.world_corners(&self.view);
        let mut content_bounds = bounds::content_bounds(&corners, &world_to_view);
        bounds::adjust_bounds(&self.view_bounds, self.content.pivot, &mut content_bounds);
        self.content_bounds = content_bounds;
    }

    fn update_prev_data(&mut self) {
        self.drag.prev_position = self.content.anchored_position;
        self.prev_view_bounds = self.view_bounds;
        self.prev_content_bounds = self.content_bounds;
    }

    fn calculate_offset(&self, delta: Vec2) -> Vec2 {
        bounds::calculate_offset(
            &self.view_bounds,
            &self.content_bounds,
            self.config.horizontal,
            self.config.vertical,
            self.config.movement_type,
            delta,
        )
    }
}

impl<S: PositionSetter> DragHandler for ScrollPhysics<S> {
    fn on_begin_drag(&mut self, event: &PointerEvent<'_>) {
        self.begin_drag(event.position, event.projection);
    }

    fn on_drag(&mut self, event: &PointerEvent<'_>) {
        self.drag(event.position, event.projection);
    }

    fn on_end_drag(&mut self, _event: &PointerEvent<'_>) {
        self.end_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::{Affine2D, Camera2D, ScreenSpace};

    const DT: f32 = 1.0 / 60.0;

    fn physics(config: ScrollConfig) -> ScrollPhysics {
        let view = LayoutRect::new(400.0, 600.0);
        let content = ContentRect::top_anchored(&view, Size::new(400.0, 1000.0));
        ScrollPhysics::new(config, view, content)
    }

    #[test]
    fn test_scroll_physics_basic() {
        let mut physics = physics(ScrollConfig::default());
        assert_eq!(physics.phase(), ScrollPhase::Idle);

        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        physics.drag(Point::new(0.0, 150.0), &ScreenSpace);

        assert_eq!(physics.content_position(), Vec2::new(0.0, 150.0));
        assert_eq!(physics.phase(), ScrollPhase::Dragging);
    }

    #[test]
    fn test_drag_without_session_is_ignored() {
        let mut physics = physics(ScrollConfig::default());
        physics.drag(Point::new(0.0, 150.0), &ScreenSpace);
        assert_eq!(physics.content_position(), Vec2::ZERO);
    }

    #[test]
    fn test_failed_projection_skips_frame() {
        let mut physics = physics(ScrollConfig::default());
        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        physics.drag(Point::new(0.0, 50.0), &ScreenSpace);

        let broken = Camera2D::new(Point::ZERO, 0.0);
        physics.drag(Point::new(0.0, 300.0), &broken);
        assert_eq!(physics.content_position().y, 50.0);
    }

    #[test]
    fn test_horizontal_axis_locked_by_default() {
        let mut physics = physics(ScrollConfig::default());
        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        physics.drag(Point::new(80.0, 40.0), &ScreenSpace);
        assert_eq!(physics.content_position(), Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_elastic_overscroll_resists_drag() {
        let mut physics = physics(ScrollConfig::default());
        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        // Pull down past the top edge by 100
        physics.drag(Point::new(0.0, -100.0), &ScreenSpace);

        let y = physics.content_position().y;
        let expected = -bounds::rubber_delta(100.0, 600.0);
        assert!((y - expected).abs() < 1e-3, "y={y} expected={expected}");
        assert!(y > -100.0 && y < 0.0);
    }

    #[test]
    fn test_clamped_drag_stops_at_edge() {
        let mut physics = physics(ScrollConfig::clamped());
        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        physics.drag(Point::new(0.0, -100.0), &ScreenSpace);
        assert_eq!(physics.content_position().y, 0.0);

        physics.drag(Point::new(0.0, 900.0), &ScreenSpace);
        assert_eq!(physics.content_position().y, 400.0);
    }

    #[test]
    fn test_elastic_snaps_back_after_release() {
        let mut physics = physics(ScrollConfig::default());
        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        physics.drag(Point::new(0.0, -120.0), &ScreenSpace);
        physics.end_drag();
        physics.stop_movement();
        assert_eq!(physics.phase(), ScrollPhase::Bouncing);

        for _ in 0..120 {
            physics.late_update(DT);
        }

        assert!(physics.content_position().y.abs() < 0.5);
        assert_eq!(physics.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_inertia_decays_velocity() {
        let mut physics = physics(ScrollConfig::default());
        physics.set_velocity(Vec2::new(0.0, 300.0));

        physics.late_update(DT);
        let after_one = physics.velocity().y;
        let expected = 300.0 * 0.135f32.powf(DT);
        assert!((after_one - expected).abs() < 1e-3);
        assert!(physics.content_position().y > 0.0);

        for _ in 0..600 {
            physics.late_update(DT);
        }
        assert_eq!(physics.velocity(), Vec2::ZERO);
        assert_eq!(physics.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_no_inertia_zeroes_velocity() {
        let mut physics = physics(ScrollConfig::no_inertia());
        physics.set_velocity(Vec2::new(0.0, 300.0));
        physics.late_update(DT);
        assert_eq!(physics.velocity(), Vec2::ZERO);
        assert_eq!(physics.content_position(), Vec2::ZERO);
    }

    #[test]
    fn test_zero_dt_does_not_integrate() {
        let mut physics = physics(ScrollConfig::default());
        physics.set_velocity(Vec2::new(0.0, 300.0));
        physics.late_update(0.0);
        assert_eq!(physics.content_position(), Vec2::ZERO);
        assert_eq!(physics.velocity().y, 300.0);
    }

    #[test]
    fn test_release_carries_momentum() {
        let mut physics = physics(ScrollConfig::default());
        physics.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
        for frame in 1..=10 {
            physics.drag(Point::new(0.0, frame as f32 * 10.0), &ScreenSpace);
            physics.late_update(DT);
        }
        physics.end_drag();

        assert!(physics.velocity().y > 0.0);
        let released_at = physics.content_position().y;
        physics.late_update(DT);
        assert!(physics.content_position().y > released_at);
        assert_eq!(physics.phase(), ScrollPhase::Decelerating);
    }

    #[test]
    fn test_clamped_inertia_stops_at_edge() {
        let mut physics = physics(ScrollConfig::clamped());
        physics.set_velocity(Vec2::new(0.0, 50_000.0));
        physics.late_update(DT);
        assert_eq!(physics.content_position().y, 400.0);
    }

    #[test]
    fn test_drag_in_translated_view() {
        let view = LayoutRect::new(400.0, 600.0).with_transform(Affine2D::translation(500.0, 300.0));
        let content = ContentRect::top_anchored(&view, Size::new(400.0, 1000.0));
        let mut physics = ScrollPhysics::new(ScrollConfig::default(), view, content);

        physics.begin_drag(Point::new(500.0, 300.0), &ScreenSpace);
        physics.drag(Point::new(500.0, 360.0), &ScreenSpace);
        assert_eq!(physics.content_position().y, 60.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(ScrollConfig::default().validate().is_ok());
        let bad = ScrollConfig {
            deceleration_rate: 1.5,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::InvalidDecelerationRate(1.5))
        );
        let bad = ScrollConfig {
            elasticity: -0.1,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidElasticity(_))));
    }
}
