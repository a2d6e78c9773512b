//! Scripted drag replays
//!
//! Each run feeds a straight drag into a widget over a number of frames,
//! releases it and keeps stepping frames until the widget comes to rest.

use anyhow::{anyhow, Result};
use drift_animation::AnimationScheduler;
use drift_core::{dispatch, DragPhase, Point, PointerEvent, ScreenSpace, Vec2};
use drift_layout::{Carousel, InfiniteScroll, ScrollPhase};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::DriftConfig;

/// Drag script shared by every run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Script {
    /// Frame time in seconds
    pub dt: f32,
    /// Total pointer travel
    pub drag: f32,
    /// Frames the drag is spread over
    pub drag_frames: usize,
    /// Upper bound on frames stepped after release
    pub frames: usize,
}

impl Script {
    pub fn new(fps: f32, drag: f32, drag_frames: usize, frames: usize) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            anyhow::bail!("fps must be positive, got {fps}");
        }
        Ok(Self {
            dt: 1.0 / fps,
            drag,
            drag_frames: drag_frames.max(1),
            frames,
        })
    }

    fn step(&self) -> f32 {
        self.drag / self.drag_frames as f32
    }
}

/// Result of a list replay
#[derive(Debug, Clone, Serialize)]
pub struct ListSummary {
    pub target_index: usize,
    pub position_y: f32,
    pub moved_up: usize,
    pub moved_down: usize,
    pub frames: usize,
}

/// Result of a carousel replay
#[derive(Debug, Clone, Serialize)]
pub struct CarouselSummary {
    pub position_x: f32,
    pub items: Vec<ItemSummary>,
    pub rotations: usize,
    pub frames: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub label: usize,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
}

fn event(phase: DragPhase, position: Point, delta: Vec2) -> PointerEvent<'static> {
    PointerEvent {
        phase,
        position,
        delta,
        projection: &ScreenSpace,
    }
}

/// Drag the list vertically, release it and let it settle
pub fn run_list(config: &DriftConfig, script: &Script) -> Result<ListSummary> {
    let mut list = InfiniteScroll::from_config(&config.list, config.scroll)?;
    tracing::info!(
        "list rows={} columns={} row_height={:.1} count={}",
        list.rows(),
        list.columns(),
        list.row_height(),
        list.count()
    );

    let moved_up = Arc::new(AtomicUsize::new(0));
    let moved_down = Arc::new(AtomicUsize::new(0));
    let up = moved_up.clone();
    list.on_moving_up(move |target_index| {
        up.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("row recycled to bottom, target_index={}", target_index);
    });
    let down = moved_down.clone();
    list.on_moving_down(move |target_index| {
        down.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("row recycled to top, target_index={}", target_index);
    });

    let step = script.step();
    let mut pointer = Point::ZERO;
    dispatch(&mut list, &event(DragPhase::Begin, pointer, Vec2::ZERO));

    let mut frames = 0;
    for _ in 0..script.drag_frames {
        pointer.y += step;
        dispatch(&mut list, &event(DragPhase::Move, pointer, Vec2::new(0.0, step)));
        list.late_update(script.dt);
        frames += 1;
    }
    dispatch(&mut list, &event(DragPhase::End, pointer, Vec2::ZERO));
    tracing::info!(
        "released at y={:.1} velocity={:.1}",
        list.content_position().y,
        list.velocity().y
    );

    for _ in 0..script.frames {
        if list.phase() == ScrollPhase::Idle {
            break;
        }
        list.late_update(script.dt);
        frames += 1;
        tracing::trace!(
            "frame {} y={:.2} target_index={}",
            frames,
            list.content_position().y,
            list.target_index()
        );
    }

    Ok(ListSummary {
        target_index: list.target_index(),
        position_y: list.content_position().y,
        moved_up: moved_up.load(Ordering::Relaxed),
        moved_down: moved_down.load(Ordering::Relaxed),
        frames,
    })
}

/// Drag the carousel horizontally, release it and step the settle animation
pub fn run_carousel(config: &DriftConfig, script: &Script) -> Result<CarouselSummary> {
    let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));
    let mut carousel =
        Carousel::new(config.carousel, config.carousel_layout)?.with_scheduler(&scheduler);
    tracing::info!(
        "carousel items={} delta={:.1}",
        config.carousel.item_count,
        carousel.metrics().delta
    );

    let step = script.step();
    let mut rotations = 0;
    let mut pointer = Point::ZERO;
    dispatch(&mut carousel, &event(DragPhase::Begin, pointer, Vec2::ZERO));

    let mut frames = 0;
    let mut labels = carousel.labels();
    for _ in 0..script.drag_frames {
        pointer.x += step;
        dispatch(&mut carousel, &event(DragPhase::Move, pointer, Vec2::new(step, 0.0)));
        let moved = carousel.labels();
        if moved != labels {
            rotations += 1;
            labels = moved;
        }
        frames += 1;
    }
    dispatch(&mut carousel, &event(DragPhase::End, pointer, Vec2::ZERO));

    for _ in 0..script.frames {
        if !carousel.is_settling() {
            break;
        }
        scheduler
            .lock()
            .map_err(|_| anyhow!("animation scheduler lock poisoned"))?
            .step(script.dt);
        frames += 1;
    }
    if carousel.labels() != labels {
        rotations += 1;
    }
    if carousel.is_settling() {
        tracing::warn!("carousel still settling after {} frames", frames);
    }

    let items = carousel
        .items()
        .into_iter()
        .map(|item| ItemSummary {
            label: item.label,
            width: item.size.width,
            height: item.size.height,
            opacity: item.opacity,
        })
        .collect();

    Ok(CarouselSummary {
        position_x: carousel.position(),
        items,
        rotations,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_run_shifts_rows() {
        let script = Script::new(60.0, 400.0, 20, 600).unwrap();
        let summary = run_list(&DriftConfig::default(), &script).unwrap();

        assert!(summary.target_index > 6);
        assert_eq!(summary.moved_up - summary.moved_down, summary.target_index - 6);
        assert!(summary.position_y >= 0.0 && summary.position_y <= 128.0);
    }

    #[test]
    fn test_carousel_run_settles() {
        let script = Script::new(60.0, -80.0, 1, 600).unwrap();
        let summary = run_carousel(&DriftConfig::default(), &script).unwrap();

        assert_eq!(summary.position_x, 0.0);
        assert_eq!(summary.rotations, 1);
        assert_eq!(summary.items[0].label, 1);
        assert_eq!(summary.items.len(), 9);
    }

    #[test]
    fn test_carousel_run_counts_rotations_from_pointer_moves() {
        // Five moves of -30: the fifth wraps, leaving the row at rest on its start
        let script = Script::new(60.0, -150.0, 5, 600).unwrap();
        let summary = run_carousel(&DriftConfig::default(), &script).unwrap();

        assert_eq!(summary.rotations, 1);
        assert_eq!(summary.items[0].label, 1);
        assert_eq!(summary.position_x, 0.0);
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        assert!(Script::new(0.0, 100.0, 10, 10).is_err());
    }
}
