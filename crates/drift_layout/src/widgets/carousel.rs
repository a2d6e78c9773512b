//! Looping card carousel
//!
//! A fixed pool of items laid out in a horizontal row. Dragging moves the
//! row; once it travels a full item step the pool is rotated and the row
//! jumps back to its start, so the loop never runs out of cards. Items grow
//! and fade in with their distance from the virtual edges of the row.
//!
//! Releasing the row snaps it to the nearest step with a [`FrameTask`]
//! stepped by an [`AnimationScheduler`]. A new drag cancels the settle.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use drift_animation::AnimationScheduler;
//! use drift_layout::widgets::carousel::{Carousel, CarouselConfig, CarouselLayout};
//!
//! let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));
//! let mut carousel = Carousel::new(CarouselConfig::default(), CarouselLayout::default())
//!     .unwrap()
//!     .with_scheduler(&scheduler);
//!
//! carousel.begin_drag();
//! carousel.drag(-80.0);
//! carousel.end_drag();
//!
//! while carousel.is_settling() {
//!     scheduler.lock().unwrap().step(1.0 / 60.0);
//! }
//! assert_eq!(carousel.labels()[0], 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use drift_animation::{move_towards, AnimationScheduler, FrameTask, TaskHandle, TaskStatus};
use drift_core::{DragHandler, PointerEvent, Size};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

const MAX_ITEM_COUNT: usize = 9;
const MAX_SIZE_BASE: f32 = 5.0;
const MAX_SPEED: u32 = 10;

// ============================================================================
// Configuration
// ============================================================================

/// Carousel tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Number of pooled items
    pub item_count: usize,
    /// Height growth per falloff unit of distance from the edges
    pub size_base: f32,
    /// Settle speed multiplier, zero snaps immediately
    pub speed: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            item_count: 9,
            size_base: 1.2,
            speed: 2,
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_ITEM_COUNT).contains(&self.item_count) {
            return Err(ConfigError::ItemCountOutOfRange(self.item_count));
        }
        if !(0.0..=MAX_SIZE_BASE).contains(&self.size_base) {
            return Err(ConfigError::SizeBaseOutOfRange(self.size_base));
        }
        if self.speed > MAX_SPEED {
            return Err(ConfigError::SpeedOutOfRange(self.speed));
        }
        Ok(())
    }
}

/// Measured layout the carousel is placed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselLayout {
    /// Width of the carousel viewport
    pub viewport_width: f32,
    /// Width of the row the items are distributed across
    pub layout_width: f32,
    /// Width of the moving content
    pub content_width: f32,
    pub item_width: f32,
    pub item_height: f32,
    /// Resting x position of the content
    pub content_start_x: f32,
}

impl Default for CarouselLayout {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            layout_width: 1160.0,
            content_width: 1160.0,
            item_width: 100.0,
            item_height: 160.0,
            content_start_x: 0.0,
        }
    }
}

impl CarouselLayout {
    pub fn item_size(&self) -> Size {
        Size::new(self.item_width, self.item_height)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.viewport_width.is_finite() || self.viewport_width <= 0.0 {
            return Err(ConfigError::InvalidLayout(format!(
                "carousel viewport width must be positive, got {}",
                self.viewport_width
            )));
        }
        if self.item_size().is_degenerate() {
            return Err(ConfigError::InvalidLayout(format!(
                "carousel item size must be positive, got {}x{}",
                self.item_width, self.item_height
            )));
        }
        if !self.content_width.is_finite() || self.content_width < 0.0 {
            return Err(ConfigError::InvalidLayout(format!(
                "carousel content width must be finite and non-negative, got {}",
                self.content_width
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Derived spacing, boundaries and falloff of a carousel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselMetrics {
    pub viewport_width: f32,
    pub content_width: f32,
    pub item_size: Size,
    pub spacing: f32,
    /// Distance between the left edges of neighbouring items
    pub delta: f32,
    /// Virtual left boundary
    pub left: f32,
    /// Virtual right boundary
    pub right: f32,
    /// Distance over which the size grows by one `size_base` factor
    pub falloff: f32,
    pub start: f32,
    pub size_base: f32,
}

impl CarouselMetrics {
    pub fn compute(config: &CarouselConfig, layout: &CarouselLayout) -> Self {
        let n = config.item_count;
        let spacing = if n == 1 {
            layout.viewport_width
        } else {
            (layout.layout_width - n as f32 * layout.item_width) / (n - 1) as f32
        };
        let delta = layout.item_width + spacing;
        let reach = layout.content_width / 2.0 + delta;
        let halves = n / 2;
        let falloff = if halves == 0 {
            f32::INFINITY
        } else {
            reach / halves as f32
        };
        let start = layout.content_start_x;

        Self {
            viewport_width: layout.viewport_width,
            content_width: layout.content_width,
            item_size: layout.item_size(),
            spacing,
            delta,
            left: start - reach,
            right: start + reach,
            falloff,
            start,
            size_base: config.size_base,
        }
    }

    /// Reject layouts whose items leave no positive step to wrap on
    pub fn validate(&self) -> Result<()> {
        if !self.delta.is_finite() || self.delta <= 0.0 {
            return Err(ConfigError::InvalidLayout(format!(
                "carousel item step must be positive, got {} (layout width too small for the items)",
                self.delta
            )));
        }
        Ok(())
    }

    /// Center of the item in pool slot `slot` when the content sits at `x`
    pub fn item_center(&self, slot: usize, x: f32) -> f32 {
        x - self.content_width / 2.0 + slot as f32 * self.delta + self.item_size.width / 2.0
    }

    /// Distance from `center` to the nearer virtual boundary
    pub fn distance(&self, center: f32) -> f32 {
        (center - self.left).abs().min((center - self.right).abs())
    }

    pub fn size_at(&self, distance: f32) -> Size {
        if self.falloff == 0.0 || !self.falloff.is_finite() {
            return self.item_size;
        }
        Size::new(
            self.item_size.width,
            self.item_size.height * self.size_base.powf(distance / self.falloff),
        )
    }

    pub fn opacity_at(&self, distance: f32) -> f32 {
        if self.content_width <= 0.0 {
            return 1.0;
        }
        (distance / (self.content_width / 3.0)).clamp(0.0, 1.0)
    }
}

// ============================================================================
// Track state
// ============================================================================

/// Snapshot of one pooled item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselItem {
    /// Stable index assigned when the pool was created
    pub label: usize,
    pub size: Size,
    pub opacity: f32,
}

/// Pool rotation performed when the row wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// The first item moved to the end (row moved left)
    FirstToLast,
    /// The last item moved to the front (row moved right)
    LastToFirst,
}

struct CarouselTrack {
    items: VecDeque<CarouselItem>,
    x: f32,
    metrics: CarouselMetrics,
}

impl CarouselTrack {
    fn refresh_visuals(&mut self) {
        let metrics = self.metrics;
        let x = self.x;
        for (slot, item) in self.items.iter_mut().enumerate() {
            let distance = metrics.distance(metrics.item_center(slot, x));
            item.size = metrics.size_at(distance);
            item.opacity = metrics.opacity_at(distance);
        }
    }

    fn rotate(&mut self, rotation: Rotation) {
        match rotation {
            Rotation::FirstToLast => self.items.rotate_left(1),
            Rotation::LastToFirst => self.items.rotate_right(1),
        }
        self.x = self.metrics.start;
        tracing::debug!(
            "carousel rotated {:?}, front label={:?}",
            rotation,
            self.items.front().map(|item| item.label)
        );
    }

    fn offset(&self) -> f32 {
        self.x - self.metrics.start
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Frame task moving the row to a settle target
struct SettleAnimation {
    track: Arc<Mutex<CarouselTrack>>,
    target: f32,
    step: f32,
    /// Rotation applied on arrival when the target is a full step away
    normalize: Option<Rotation>,
}

impl FrameTask for SettleAnimation {
    fn resume(&mut self, _dt: f32) -> TaskStatus {
        let mut track = lock(&self.track);
        track.x = move_towards(track.x, self.target, self.step);
        track.refresh_visuals();

        if track.x != self.target {
            return TaskStatus::Pending;
        }
        if let Some(rotation) = self.normalize {
            track.rotate(rotation);
            track.refresh_visuals();
        }
        tracing::debug!("carousel settled at {:.1}", track.x);
        TaskStatus::Complete
    }
}

// ============================================================================
// Carousel
// ============================================================================

/// Looping carousel of a fixed item pool
pub struct Carousel {
    config: CarouselConfig,
    metrics: CarouselMetrics,
    track: Arc<Mutex<CarouselTrack>>,
    /// Weak reference to the scheduler that steps settle animations
    scheduler: Weak<Mutex<AnimationScheduler>>,
    settle: Option<TaskHandle>,
}

impl Carousel {
    pub fn new(config: CarouselConfig, layout: CarouselLayout) -> Result<Self> {
        config.validate()?;
        layout.validate()?;

        let metrics = CarouselMetrics::compute(&config, &layout);
        metrics.validate()?;
        let items = (0..config.item_count)
            .map(|label| CarouselItem {
                label,
                size: metrics.item_size,
                opacity: 1.0,
            })
            .collect();
        let mut track = CarouselTrack {
            items,
            x: metrics.start,
            metrics,
        };
        track.refresh_visuals();

        tracing::debug!(
            "carousel items={} spacing={:.1} delta={:.1} falloff={:.1}",
            config.item_count,
            metrics.spacing,
            metrics.delta,
            metrics.falloff
        );

        Ok(Self {
            config,
            metrics,
            track: Arc::new(Mutex::new(track)),
            scheduler: Weak::new(),
            settle: None,
        })
    }

    /// Attach the scheduler used for settle animations
    pub fn with_scheduler(mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) -> Self {
        self.set_scheduler(scheduler);
        self
    }

    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn metrics(&self) -> &CarouselMetrics {
        &self.metrics
    }

    /// Current content x position
    pub fn position(&self) -> f32 {
        lock(&self.track).x
    }

    /// Items in pool order
    pub fn items(&self) -> Vec<CarouselItem> {
        lock(&self.track).items.iter().copied().collect()
    }

    /// Item labels in pool order
    pub fn labels(&self) -> Vec<usize> {
        lock(&self.track).items.iter().map(|item| item.label).collect()
    }

    /// Whether a settle animation is still in flight
    pub fn is_settling(&self) -> bool {
        self.settle
            .as_ref()
            .is_some_and(|handle| !handle.is_disposed())
    }

    /// Stop any settle animation so the pointer owns the row
    pub fn begin_drag(&mut self) {
        self.cancel_settle();
    }

    /// Move the row by a horizontal pointer delta
    ///
    /// Returns the pool rotation when the row wrapped.
    pub fn drag(&mut self, pointer_delta: f32) -> Option<Rotation> {
        let width = self.metrics.viewport_width;
        let pointer_delta = pointer_delta.clamp(-width, width);

        let mut track = lock(&self.track);
        track.x += pointer_delta;

        let offset = track.offset();
        let rotation = if self.metrics.delta <= 0.0 {
            None
        } else if offset <= -self.metrics.delta {
            Some(Rotation::FirstToLast)
        } else if offset >= self.metrics.delta {
            Some(Rotation::LastToFirst)
        } else {
            None
        };
        if let Some(rotation) = rotation {
            track.rotate(rotation);
        }
        track.refresh_visuals();

        tracing::trace!("carousel drag {:.1} -> x={:.1}", pointer_delta, track.x);
        rotation
    }

    /// Release the row and settle it on the nearest step
    pub fn end_drag(&mut self) {
        let (x, target, normalize) = {
            let mut track = lock(&self.track);
            track.refresh_visuals();

            let offset = track.offset();
            let half_item = self.metrics.item_size.width / 2.0;
            let (target, normalize) = if offset < -half_item {
                (self.metrics.start - self.metrics.delta, Some(Rotation::FirstToLast))
            } else if offset > half_item {
                (self.metrics.start + self.metrics.delta, Some(Rotation::LastToFirst))
            } else {
                (self.metrics.start, None)
            };
            (track.x, target, normalize)
        };

        let speed = (x - target).abs() * self.config.speed as f32;
        let scheduler = self.scheduler.upgrade();

        match scheduler {
            Some(scheduler) if speed > 0.0 => {
                self.cancel_settle();
                let task = SettleAnimation {
                    track: Arc::clone(&self.track),
                    target,
                    step: speed / 100.0,
                    normalize,
                };
                let handle = lock(&scheduler).spawn(Box::new(task));
                tracing::debug!("carousel settle {:.1} -> {:.1} speed={:.1}", x, target, speed);
                self.settle = Some(handle);
            }
            _ => {
                self.cancel_settle();
                let mut track = lock(&self.track);
                track.x = target;
                if let Some(rotation) = normalize {
                    track.rotate(rotation);
                }
                track.refresh_visuals();
                tracing::debug!("carousel snapped to {:.1}", track.x);
            }
        }
    }

    fn cancel_settle(&mut self) {
        let Some(handle) = self.settle.take() else {
            return;
        };
        if handle.is_disposed() {
            return;
        }
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                lock(&scheduler).cancel(&handle);
            }
            None => handle.request_cancel(),
        }
        tracing::debug!("carousel settle cancelled");
    }
}

impl DragHandler for Carousel {
    fn on_begin_drag(&mut self, _event: &PointerEvent<'_>) {
        self.begin_drag();
    }

    fn on_drag(&mut self, event: &PointerEvent<'_>) {
        self.drag(event.delta.x);
    }

    fn on_end_drag(&mut self, _event: &PointerEvent<'_>) {
        self.end_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn carousel() -> Carousel {
        Carousel::new(CarouselConfig::default(), CarouselLayout::default()).unwrap()
    }

    fn scheduled() -> (Carousel, Arc<Mutex<AnimationScheduler>>) {
        let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));
        let carousel = carousel().with_scheduler(&scheduler);
        (carousel, scheduler)
    }

    fn step(scheduler: &Arc<Mutex<AnimationScheduler>>, frames: usize) {
        for _ in 0..frames {
            scheduler.lock().unwrap().step(DT);
        }
    }

    #[test]
    fn test_metrics_for_nine_items() {
        let metrics = CarouselMetrics::compute(&CarouselConfig::default(), &CarouselLayout::default());
        assert_eq!(metrics.spacing, 32.5);
        assert_eq!(metrics.delta, 132.5);
        assert_eq!(metrics.left, -712.5);
        assert_eq!(metrics.right, 712.5);
        assert_eq!(metrics.falloff, 712.5 / 4.0);
    }

    #[test]
    fn test_falloff_visuals() {
        let metrics = carousel().metrics;
        assert_eq!(metrics.size_at(0.0), metrics.item_size);
        assert_eq!(metrics.opacity_at(0.0), 0.0);
        assert_eq!(metrics.opacity_at(metrics.content_width / 3.0), 1.0);
        assert_eq!(metrics.opacity_at(5000.0), 1.0);
        assert!(metrics.size_at(300.0).height > metrics.item_size.height);
        assert_eq!(metrics.size_at(300.0).width, metrics.item_size.width);
    }

    #[test]
    fn test_middle_item_is_largest_and_opaque() {
        let items = carousel().items();
        let middle = items[4];
        assert_eq!(middle.opacity, 1.0);
        for item in &items {
            assert!(item.size.height <= middle.size.height);
        }
        assert!(items[0].opacity < 1.0);
    }

    #[test]
    fn test_drag_left_past_step_rotates_once() {
        let mut carousel = carousel();
        carousel.begin_drag();
        assert_eq!(carousel.drag(-140.0), Some(Rotation::FirstToLast));

        assert_eq!(carousel.position(), 0.0);
        assert_eq!(carousel.labels(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
    }

    #[test]
    fn test_drag_right_past_step_rotates_once() {
        let mut carousel = carousel();
        assert_eq!(carousel.drag(90.0), None);
        assert_eq!(carousel.drag(50.0), Some(Rotation::LastToFirst));

        assert_eq!(carousel.position(), 0.0);
        assert_eq!(carousel.labels(), vec![8, 0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_huge_pointer_delta_is_clamped() {
        let mut carousel = carousel();
        assert_eq!(carousel.drag(-5000.0), Some(Rotation::FirstToLast));
        assert_eq!(carousel.labels()[0], 1);
        assert_eq!(carousel.position(), 0.0);
    }

    #[test]
    fn test_release_without_scheduler_snaps() {
        let mut carousel = carousel();
        carousel.drag(-80.0);
        carousel.end_drag();

        assert!(!carousel.is_settling());
        assert_eq!(carousel.position(), 0.0);
        assert_eq!(carousel.labels()[0], 1);
    }

    #[test]
    fn test_settle_to_next_step() {
        let (mut carousel, scheduler) = scheduled();
        carousel.begin_drag();
        carousel.drag(-80.0);
        carousel.end_drag();
        assert!(carousel.is_settling());

        step(&scheduler, 1);
        assert!((carousel.position() - (-81.05)).abs() < 1e-3);

        step(&scheduler, 60);
        assert!(!carousel.is_settling());
        assert_eq!(carousel.position(), 0.0);
        assert_eq!(carousel.labels(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
    }

    #[test]
    fn test_settle_back_to_start() {
        let (mut carousel, scheduler) = scheduled();
        carousel.drag(30.0);
        carousel.end_drag();

        step(&scheduler, 60);
        assert!(!carousel.is_settling());
        assert_eq!(carousel.position(), 0.0);
        assert_eq!(carousel.labels()[0], 0);
    }

    #[test]
    fn test_begin_drag_cancels_settle() {
        let (mut carousel, scheduler) = scheduled();
        carousel.drag(-30.0);
        carousel.end_drag();
        step(&scheduler, 1);

        let settle = carousel.settle.clone().unwrap();
        carousel.begin_drag();
        assert!(settle.is_cancelled());
        assert!(settle.is_disposed());
        assert!(!carousel.is_settling());

        let held = carousel.position();
        step(&scheduler, 10);
        assert_eq!(carousel.position(), held);
        assert!(!scheduler.lock().unwrap().has_active_tasks());
    }

    #[test]
    fn test_new_settle_replaces_previous() {
        let (mut carousel, scheduler) = scheduled();
        carousel.drag(-30.0);
        carousel.end_drag();
        let first = carousel.settle.clone().unwrap();

        carousel.drag(-10.0);
        carousel.end_drag();
        assert!(first.is_disposed());
        assert_eq!(scheduler.lock().unwrap().task_count(), 1);
    }

    #[test]
    fn test_zero_speed_snaps() {
        let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));
        let config = CarouselConfig {
            speed: 0,
            ..Default::default()
        };
        let mut carousel = Carousel::new(config, CarouselLayout::default())
            .unwrap()
            .with_scheduler(&scheduler);
        carousel.drag(70.0);
        carousel.end_drag();

        assert!(!carousel.is_settling());
        assert_eq!(carousel.position(), 0.0);
        assert_eq!(carousel.labels()[0], 8);
    }

    #[test]
    fn test_single_item_has_no_falloff() {
        let config = CarouselConfig {
            item_count: 1,
            ..Default::default()
        };
        let carousel = Carousel::new(config, CarouselLayout::default()).unwrap();
        let metrics = carousel.metrics();
        assert_eq!(metrics.spacing, 800.0);
        assert!(metrics.falloff.is_infinite());
        assert_eq!(carousel.items()[0].size, metrics.item_size);
    }

    #[test]
    fn test_config_validation() {
        assert!(CarouselConfig::default().validate().is_ok());
        let bad = CarouselConfig {
            item_count: 10,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ItemCountOutOfRange(10)));
        let bad = CarouselConfig {
            size_base: 6.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::SizeBaseOutOfRange(_))));
        let bad = CarouselConfig {
            speed: 11,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let layout = CarouselLayout {
            item_width: 0.0,
            ..Default::default()
        };
        assert!(Carousel::new(CarouselConfig::default(), layout).is_err());
    }

    #[test]
    fn test_layout_without_item_step_is_rejected() {
        // Nine 100-wide items squeezed into 100 units leave a negative step
        let layout = CarouselLayout {
            layout_width: 100.0,
            ..Default::default()
        };
        let metrics = CarouselMetrics::compute(&CarouselConfig::default(), &layout);
        assert!(metrics.delta <= 0.0);
        assert!(matches!(
            Carousel::new(CarouselConfig::default(), layout),
            Err(ConfigError::InvalidLayout(_))
        ));

        // Items exactly filling the row with no spacing still step by their width
        let layout = CarouselLayout {
            layout_width: 900.0,
            ..Default::default()
        };
        let mut carousel = Carousel::new(CarouselConfig::default(), layout).unwrap();
        assert_eq!(carousel.metrics().delta, 100.0);
        assert_eq!(carousel.drag(0.0), None);
        assert_eq!(carousel.labels(), (0..9).collect::<Vec<_>>());
    }
}
