//! Drag-driven widgets

pub mod carousel;
pub mod infinite_list;
pub mod scroll;

pub use carousel::{Carousel, CarouselConfig, CarouselItem, CarouselLayout, CarouselMetrics, Rotation};
pub use infinite_list::{
    GridConstraint, GridMetrics, InfiniteScroll, ListConfig, RowCallback, RowShift, RowWindow,
};
pub use scroll::{
    DirectSetter, DragContext, MovementType, PositionSetter, ScrollConfig, ScrollPhase,
    ScrollPhysics,
};
