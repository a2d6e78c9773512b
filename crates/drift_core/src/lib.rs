//! Drift Core
//!
//! Foundational types shared by the Drift scroll and carousel widgets:
//!
//! - **Geometry**: points, sizes, rectangles, vectors, bounds and 2D affine transforms
//! - **Layout**: viewport rectangles and anchored content rectangles
//! - **Projection**: screen-to-world conversion for pointer input
//! - **Events**: drag phases and the [`DragHandler`] trait
//!
//! # Example
//!
//! ```rust
//! use drift_core::{ContentRect, LayoutRect, Size};
//!
//! let view = LayoutRect::new(400.0, 600.0);
//! let content = ContentRect::top_anchored(&view, Size::new(400.0, 896.0));
//! assert_eq!(content.rect_in_view().height(), 896.0);
//! ```

pub mod events;
pub mod geometry;
pub mod layout;
pub mod projection;

pub use events::{dispatch, DragHandler, DragPhase, EventType, PointerEvent};
pub use geometry::{Affine2D, Bounds, Point, Rect, Size, Vec2};
pub use layout::{ContentRect, LayoutRect};
pub use projection::{Camera2D, ScreenProjection, ScreenSpace};
