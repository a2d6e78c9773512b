//! Drift Layout
//!
//! Scroll physics and virtualized widgets driven by pointer drags and a
//! per-frame update.
//!
//! # Features
//!
//! - **Scroll physics**: elastic, clamped or unrestricted edges with inertia
//! - **Infinite list**: a fixed window of rows recycled over any row count
//! - **Carousel**: a looping item pool with size and opacity falloff
//! - **Bounds math**: stateless helpers measuring content against its viewport
//!
//! # Example
//!
//! ```rust
//! use drift_core::{LayoutRect, Point, ScreenSpace};
//! use drift_layout::{GridMetrics, InfiniteScroll, ScrollConfig};
//!
//! let view = LayoutRect::new(720.0, 600.0);
//! let mut list = InfiniteScroll::new(ScrollConfig::default(), view, GridMetrics::default(), 30);
//!
//! list.begin_drag(Point::new(0.0, 0.0), &ScreenSpace);
//! list.drag(Point::new(0.0, 140.0), &ScreenSpace);
//! list.late_update(1.0 / 60.0);
//! list.end_drag();
//!
//! assert_eq!(list.target_index(), 7);
//! ```

pub mod bounds;
pub mod error;
pub mod widgets;

pub use error::{ConfigError, Result};
pub use widgets::{
    Carousel, CarouselConfig, CarouselItem, CarouselLayout, CarouselMetrics, DirectSetter,
    DragContext, GridConstraint, GridMetrics, InfiniteScroll, ListConfig, MovementType,
    PositionSetter, Rotation, RowCallback, RowShift, RowWindow, ScrollConfig, ScrollPhase,
    ScrollPhysics,
};
