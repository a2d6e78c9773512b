//! Animation scheduler
//!
//! Owns all in-flight frame tasks and resumes them once per frame.

use crate::task::{CancellationToken, FrameTask, TaskStatus};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::Instant;

new_key_type! {
    pub struct TaskId;
}

/// Handle returned when a task is spawned
#[derive(Clone, Debug)]
pub struct TaskHandle {
    pub id: TaskId,
    pub token: CancellationToken,
}

impl TaskHandle {
    /// Request cooperative cancellation; the task will not be resumed again
    pub fn request_cancel(&self) {
        self.token.request_cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_disposed()
    }
}

struct ScheduledTask {
    task: Box<dyn FrameTask>,
    token: CancellationToken,
}

/// The animation scheduler that resumes all active tasks each frame
pub struct AnimationScheduler {
    tasks: SlotMap<TaskId, ScheduledTask>,
    last_frame: Instant,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            last_frame: Instant::now(),
        }
    }

    /// Schedule a task; it is first resumed on the next frame
    pub fn spawn(&mut self, task: Box<dyn FrameTask>) -> TaskHandle {
        let token = CancellationToken::new();
        let id = self.tasks.insert(ScheduledTask {
            task,
            token: token.clone(),
        });
        tracing::debug!("spawned frame task {:?}", id);
        TaskHandle { id, token }
    }

    /// Cancel a task and dispose it immediately
    ///
    /// Returns false if the task had already finished.
    pub fn cancel(&mut self, handle: &TaskHandle) -> bool {
        handle.request_cancel();
        match self.tasks.remove(handle.id) {
            Some(entry) => {
                entry.token.dispose();
                tracing::debug!("cancelled frame task {:?}", handle.id);
                true
            }
            None => false,
        }
    }

    /// Check whether a task is still scheduled
    pub fn is_running(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Tick all tasks using wall-clock frame time
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.step(dt);
    }

    /// Resume every task once with a fixed frame time
    pub fn step(&mut self, dt: f32) {
        let mut finished: SmallVec<[TaskId; 4]> = SmallVec::new();

        for (id, entry) in self.tasks.iter_mut() {
            // Cancellation is observed at the top of each resumption
            if entry.token.is_cancelled() {
                finished.push(id);
                continue;
            }
            if entry.task.resume(dt) == TaskStatus::Complete {
                finished.push(id);
            }
        }

        for id in finished {
            if let Some(entry) = self.tasks.remove(id) {
                entry.token.dispose();
                tracing::debug!("disposed frame task {:?}", id);
            }
        }
    }

    /// Check if any tasks are still active
    pub fn has_active_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of scheduled tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Countdown {
        frames_left: usize,
        resumed: Arc<AtomicUsize>,
    }

    impl FrameTask for Countdown {
        fn resume(&mut self, _dt: f32) -> TaskStatus {
            self.resumed.fetch_add(1, Ordering::SeqCst);
            self.frames_left -= 1;
            if self.frames_left == 0 {
                TaskStatus::Complete
            } else {
                TaskStatus::Pending
            }
        }
    }

    fn countdown(frames: usize) -> (Box<dyn FrameTask>, Arc<AtomicUsize>) {
        let resumed = Arc::new(AtomicUsize::new(0));
        let task = Countdown {
            frames_left: frames,
            resumed: resumed.clone(),
        };
        (Box::new(task), resumed)
    }

    #[test]
    fn test_task_runs_until_complete() {
        let mut scheduler = AnimationScheduler::new();
        let (task, resumed) = countdown(3);
        let handle = scheduler.spawn(task);

        scheduler.step(1.0 / 60.0);
        scheduler.step(1.0 / 60.0);
        assert!(scheduler.is_running(handle.id));
        scheduler.step(1.0 / 60.0);

        assert!(!scheduler.is_running(handle.id));
        assert!(handle.is_disposed());
        assert_eq!(resumed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_requested_cancel_skips_next_resumption() {
        let mut scheduler = AnimationScheduler::new();
        let (task, resumed) = countdown(10);
        let handle = scheduler.spawn(task);

        scheduler.step(1.0 / 60.0);
        handle.request_cancel();
        assert!(!handle.is_disposed());
        scheduler.step(1.0 / 60.0);

        assert_eq!(resumed.load(Ordering::SeqCst), 1);
        assert!(handle.is_disposed());
        assert!(!scheduler.has_active_tasks());
    }

    #[test]
    fn test_cancel_disposes_synchronously() {
        let mut scheduler = AnimationScheduler::new();
        let (task, resumed) = countdown(10);
        let handle = scheduler.spawn(task);

        assert!(scheduler.cancel(&handle));
        assert!(handle.is_cancelled());
        assert!(handle.is_disposed());
        assert!(!scheduler.cancel(&handle));

        scheduler.step(1.0 / 60.0);
        assert_eq!(resumed.load(Ordering::SeqCst), 0);
    }
}
