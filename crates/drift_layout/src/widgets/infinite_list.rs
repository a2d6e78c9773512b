//! Infinite list virtualization
//!
//! A list of `count` logical rows is shown with a fixed window of `rows`
//! physical rows. While the content scrolls, [`RowWindow`] watches every
//! position write: when the content travels more than one row height the
//! position is wrapped back by a row, the logical bottom index moves by one
//! and the matching callback fires so an item pool can rebind its rows.
//!
//! The physical content never grows beyond `rows * row_height`, no matter
//! how large `count` is.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use drift_core::{LayoutRect, Vec2};
//! use drift_layout::widgets::infinite_list::{GridMetrics, InfiniteScroll};
//! use drift_layout::widgets::scroll::ScrollConfig;
//!
//! let view = LayoutRect::new(720.0, 600.0);
//! let mut list = InfiniteScroll::new(ScrollConfig::default(), view, GridMetrics::default(), 30);
//!
//! let moved_up = Arc::new(AtomicUsize::new(0));
//! let counter = moved_up.clone();
//! list.on_moving_up(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! list.set_content_anchored_position(Vec2::new(0.0, 140.0));
//! assert_eq!(list.target_index(), 7);
//! assert_eq!(moved_up.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use drift_core::{ContentRect, DragHandler, LayoutRect, PointerEvent, Size, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ConfigError, Result};
use crate::widgets::scroll::{DragContext, PositionSetter, ScrollConfig, ScrollPhysics};

const DEFAULT_COUNT: usize = 30;
const DEFAULT_COLUMNS: usize = 5;
const DEFAULT_ROWS: usize = 6;
const DEFAULT_ROW_HEIGHT: f32 = 128.0;

/// Row recycle callback, receives the new bottom row index
pub type RowCallback = Box<dyn FnMut(usize) + Send>;

// ============================================================================
// Grid metrics
// ============================================================================

/// How a grid decides its column count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridConstraint {
    #[default]
    Flexible,
    FixedColumnCount(usize),
    FixedRowCount(usize),
}

/// Cell layout of the list content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub cell_size: Size,
    pub spacing: Vec2,
    pub constraint: GridConstraint,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_size: Size::new(128.0, 118.0),
            spacing: Vec2::new(10.0, 10.0),
            constraint: GridConstraint::FixedColumnCount(DEFAULT_COLUMNS),
        }
    }
}

impl GridMetrics {
    /// Distance between the tops of two consecutive rows
    pub fn row_height(&self) -> f32 {
        self.cell_size.height + self.spacing.y
    }
}

/// Serializable list setup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Logical row count
    pub count: usize,
    pub view_width: f32,
    pub view_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Fixed column count of the grid
    pub columns: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            view_width: 720.0,
            view_height: 600.0,
            cell_width: 128.0,
            cell_height: 118.0,
            spacing_x: 10.0,
            spacing_y: 10.0,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl ListConfig {
    pub fn grid(&self) -> GridMetrics {
        GridMetrics {
            cell_size: Size::new(self.cell_width, self.cell_height),
            spacing: Vec2::new(self.spacing_x, self.spacing_y),
            constraint: GridConstraint::FixedColumnCount(self.columns),
        }
    }

    pub fn view(&self) -> LayoutRect {
        LayoutRect::new(self.view_width, self.view_height)
    }

    pub fn validate(&self) -> Result<()> {
        let view = Size::new(self.view_width, self.view_height);
        if view.is_degenerate() {
            return Err(ConfigError::InvalidLayout(format!(
                "viewport must have a positive finite size, got {}x{}",
                self.view_width, self.view_height
            )));
        }
        let row_height = self.grid().row_height();
        if !row_height.is_finite() || row_height <= 0.0 {
            return Err(ConfigError::InvalidLayout(format!(
                "row height must be positive, got {row_height}"
            )));
        }
        if self.columns == 0 {
            return Err(ConfigError::InvalidLayout(
                "column count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Row window
// ============================================================================

/// A single window move recorded during a position write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShift {
    /// Content wrapped down a row, bottom index increased
    Up { target_index: usize },
    /// Content wrapped up a row, bottom index decreased
    Down { target_index: usize },
}

/// Position setter that keeps content within one row of travel
pub struct RowWindow {
    count: usize,
    rows: usize,
    columns: usize,
    row_height: f32,
    target_index: usize,
    on_moving_up: Option<RowCallback>,
    on_moving_down: Option<RowCallback>,
    last_shifts: SmallVec<[RowShift; 4]>,
}

impl fmt::Debug for RowWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowWindow")
            .field("count", &self.count)
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("row_height", &self.row_height)
            .field("target_index", &self.target_index)
            .finish_non_exhaustive()
    }
}

impl RowWindow {
    /// Window with default metrics, before any grid is measured
    pub fn new(count: usize) -> Self {
        Self {
            count,
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            row_height: DEFAULT_ROW_HEIGHT,
            target_index: DEFAULT_ROWS - 1,
            on_moving_up: None,
            on_moving_down: None,
            last_shifts: SmallVec::new(),
        }
    }

    /// Measure the window from the grid and viewport height
    pub fn from_grid(grid: &GridMetrics, view_height: f32, count: usize) -> Self {
        let mut window = Self::new(count);
        if let GridConstraint::FixedColumnCount(columns) = grid.constraint {
            window.columns = columns;
        }
        window.row_height = grid.row_height();

        let visible = if window.has_usable_row_height() && view_height.is_finite() {
            (view_height / window.row_height).ceil().max(0.0) as usize
        } else {
            0
        };
        window.rows = visible + 2;
        window.target_index = window.rows - 1;

        tracing::debug!(
            "row window rows={} columns={} row_height={:.1} count={}",
            window.rows,
            window.columns,
            window.row_height,
            window.count
        );
        window
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Logical index of the row in the last physical slot
    ///
    /// Stays at `rows - 1` while `count <= rows`, so for short lists it can
    /// be past the last logical row; use [`RowWindow::row_binding`] to map
    /// slots to rows.
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Height of the physical content
    pub fn content_height(&self) -> f32 {
        self.rows as f32 * self.row_height.max(0.0)
    }

    /// Shifts performed by the most recent position write
    pub fn last_shifts(&self) -> &[RowShift] {
        &self.last_shifts
    }

    /// Logical row shown in physical slot `slot` (0 is the top slot)
    pub fn row_binding(&self, slot: usize) -> Option<usize> {
        if slot >= self.rows {
            return None;
        }
        let row = (self.target_index + slot).checked_sub(self.rows - 1)?;
        (row < self.count).then_some(row)
    }

    /// Whether writes can move the window at all
    pub fn is_active(&self) -> bool {
        self.count > self.rows && self.has_usable_row_height()
    }

    fn has_usable_row_height(&self) -> bool {
        self.row_height.is_finite() && self.row_height > 0.0
    }

    fn reset(&mut self) {
        self.target_index = self.rows - 1;
    }

    fn shift_up(&mut self, position: &mut Vec2, drag: &mut DragContext) {
        let last = self.count.saturating_sub(1);
        while position.y > self.row_height && self.target_index < last {
            position.y -= self.row_height;
            self.target_index += 1;
            if drag.dragging {
                drag.pointer_start_local_cursor.y += self.row_height;
            }
            drag.prev_position.y -= self.row_height;

            tracing::debug!("row window moved up, target_index={}", self.target_index);
            self.last_shifts.push(RowShift::Up {
                target_index: self.target_index,
            });
            if let Some(callback) = self.on_moving_up.as_mut() {
                callback(self.target_index);
            }
        }
    }

    fn shift_down(&mut self, position: &mut Vec2, drag: &mut DragContext) {
        let first = self.rows - 1;
        while position.y < 0.0 && self.target_index > first {
            position.y += self.row_height;
            self.target_index -= 1;
            if drag.dragging {
                drag.pointer_start_local_cursor.y -= self.row_height;
            }
            drag.prev_position.y += self.row_height;

            tracing::debug!("row window moved down, target_index={}", self.target_index);
            self.last_shifts.push(RowShift::Down {
                target_index: self.target_index,
            });
            if let Some(callback) = self.on_moving_down.as_mut() {
                callback(self.target_index);
            }
        }
    }
}

impl PositionSetter for RowWindow {
    fn adjust_position(&mut self, mut position: Vec2, drag: &mut DragContext) -> Vec2 {
        self.last_shifts.clear();
        if !self.is_active() {
            return position;
        }

        if self.target_index >= self.count - 1 {
            if position.y < 0.0 {
                self.shift_down(&mut position, drag);
            }
        } else if self.target_index > self.rows - 1 {
            if position.y > self.row_height {
                self.shift_up(&mut position, drag);
            } else if position.y < 0.0 {
                self.shift_down(&mut position, drag);
            }
        } else if position.y > self.row_height {
            self.shift_up(&mut position, drag);
        }

        position
    }
}

// ============================================================================
// Infinite scroll
// ============================================================================

/// Scroll physics over a recycled row window
pub struct InfiniteScroll {
    physics: ScrollPhysics<RowWindow>,
}

impl InfiniteScroll {
    /// Build a vertical list hanging from the top of `view`
    pub fn new(config: ScrollConfig, view: LayoutRect, grid: GridMetrics, count: usize) -> Self {
        let window = RowWindow::from_grid(&grid, view.size.height, count);
        let size = Size::new(view.size.width, window.content_height());
        let content = ContentRect::top_anchored(&view, size);
        Self {
            physics: ScrollPhysics::with_setter(config, view, content, window),
        }
    }

    /// Validate both configs and build the list
    pub fn from_config(list: &ListConfig, scroll: ScrollConfig) -> Result<Self> {
        list.validate()?;
        scroll.validate()?;
        Ok(Self::new(scroll, list.view(), list.grid(), list.count))
    }

    /// Called once per row the window moves toward later rows
    pub fn on_moving_up<F>(&mut self, callback: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.physics.setter_mut().on_moving_up = Some(Box::new(callback));
    }

    /// Called once per row the window moves toward earlier rows
    pub fn on_moving_down<F>(&mut self, callback: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.physics.setter_mut().on_moving_down = Some(Box::new(callback));
    }

    /// Return to the top of the list
    pub fn refresh_view(&mut self) {
        self.physics.set_content_anchored_position(Vec2::ZERO);
        self.physics.setter_mut().reset();
        tracing::debug!("row window refreshed");
    }

    /// Replace the logical row count and return to the top
    pub fn set_count(&mut self, count: usize) {
        self.physics.setter_mut().count = count;
        self.refresh_view();
    }

    pub fn target_index(&self) -> usize {
        self.physics.setter().target_index()
    }

    pub fn rows(&self) -> usize {
        self.physics.setter().rows()
    }

    pub fn columns(&self) -> usize {
        self.physics.setter().columns()
    }

    pub fn count(&self) -> usize {
        self.physics.setter().count()
    }

    pub fn row_height(&self) -> f32 {
        self.physics.setter().row_height()
    }

    pub fn row_binding(&self, slot: usize) -> Option<usize> {
        self.physics.setter().row_binding(slot)
    }

    pub fn last_shifts(&self) -> &[RowShift] {
        self.physics.setter().last_shifts()
    }

    pub fn window(&self) -> &RowWindow {
        self.physics.setter()
    }
}

impl Deref for InfiniteScroll {
    type Target = ScrollPhysics<RowWindow>;

    fn deref(&self) -> &Self::Target {
        &self.physics
    }
}

impl DerefMut for InfiniteScroll {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.physics
    }
}

impl DragHandler for InfiniteScroll {
    fn on_begin_drag(&mut self, event: &PointerEvent<'_>) {
        self.physics.on_begin_drag(event);
    }

    fn on_drag(&mut self, event: &PointerEvent<'_>) {
        self.physics.on_drag(event);
    }

    fn on_end_drag(&mut self, event: &PointerEvent<'_>) {
        self.physics.on_end_drag(event);
    }
}
