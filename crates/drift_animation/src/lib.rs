//! Drift Animation System
//!
//! Frame-stepped motion primitives and cooperative task scheduling.
//!
//! # Features
//!
//! - **Damping**: critically damped `smooth_damp`, `move_towards` and clamped `lerp`
//! - **Frame tasks**: work resumed once per frame until it completes
//! - **Cancellation**: tokens checked before every resumption, disposal is observable

pub mod damping;
pub mod scheduler;
pub mod task;

pub use damping::{lerp, lerp_vec2, move_towards, smooth_damp};
pub use scheduler::{AnimationScheduler, TaskHandle, TaskId};
pub use task::{CancellationToken, FrameTask, TaskStatus};
