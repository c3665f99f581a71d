//! Frame clock: the "request next frame" scheduler.
//!
//! A [`FrameTask`] is queued with [`FrameClock::request_frame`] and runs once
//! on the next [`FrameClock::tick`]. Returning [`TaskStatus::Continue`]
//! re-queues it for the following tick; returning [`TaskStatus::Finished`]
//! drops it, after which it never runs again. Tasks run in the order they
//! were first requested.

use tracing::debug;

use crate::surface::DrawSurface;

/// Unique identifier for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// What a task wants after running a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Run again next frame.
    Continue,
    /// Done; drop the task.
    Finished,
}

/// Work driven once per frame.
pub trait FrameTask {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Advances one frame and draws onto the surface.
    fn on_frame(&mut self, surface: &mut dyn DrawSurface) -> TaskStatus;

    /// Number of live entities the task currently owns.
    fn live_entities(&self) -> usize {
        0
    }
}

struct ScheduledTask {
    id: TaskId,
    task: Box<dyn FrameTask>,
}

/// Result of one clock tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Tasks that ran this tick.
    pub ran: usize,
    /// Tasks that finished this tick, in run order.
    pub finished: Vec<TaskId>,
}

/// Single-threaded frame scheduler.
#[derive(Default)]
pub struct FrameClock {
    queued: Vec<ScheduledTask>,
    next_id: u64,
    frame: u64,
}

impl FrameClock {
    /// Creates an empty clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task to run on the next tick.
    pub fn request_frame(&mut self, task: Box<dyn FrameTask>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        debug!("Scheduled task {} ({})", id.raw(), task.name());
        self.queued.push(ScheduledTask { id, task });
        id
    }

    /// Runs every queued task once.
    pub fn tick(&mut self, surface: &mut dyn DrawSurface) -> TickSummary {
        self.frame += 1;
        let due = std::mem::take(&mut self.queued);
        let mut summary = TickSummary {
            ran: due.len(),
            finished: Vec::new(),
        };

        for mut scheduled in due {
            match scheduled.task.on_frame(surface) {
                TaskStatus::Continue => self.queued.push(scheduled),
                TaskStatus::Finished => {
                    debug!(
                        "Task {} ({}) finished on frame {}",
                        scheduled.id.raw(),
                        scheduled.task.name(),
                        self.frame
                    );
                    summary.finished.push(scheduled.id);
                },
            }
        }

        summary
    }

    /// Number of tasks waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Whether any task is waiting for the next tick.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.queued.is_empty()
    }

    /// Whether the given task is still scheduled.
    #[must_use]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.queued.iter().any(|t| t.id == id)
    }

    /// Number of ticks so far.
    #[must_use]
    pub const fn frame_number(&self) -> u64 {
        self.frame
    }

    /// Sum of live entities over all queued tasks.
    #[must_use]
    pub fn live_entities(&self) -> usize {
        self.queued.iter().map(|t| t.task.live_entities()).sum()
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("frame", &self.frame)
            .field("pending", &self.queued.len())
            .finish_non_exhaustive()
    }
}
