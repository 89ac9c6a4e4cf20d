use std::fmt;
use std::time::Duration;

use tracing::trace;

type DeferredFn = Box<dyn FnOnce()>;

struct DeferredTask {
    due: Duration,
    sequence: u64,
    label: &'static str,
    run: DeferredFn,
}

/// Host-driven timer queue for fire-once continuations.
///
/// Time only moves when the host calls `advance`. Tasks are never cancelled;
/// a task that must not act on stale state has to check for it itself.
#[derive(Default)]
pub struct DeferredQueue {
    now: Duration,
    next_sequence: u64,
    tasks: Vec<DeferredTask>,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Labels of pending tasks in firing order.
    #[must_use]
    pub fn pending_labels(&self) -> Vec<&'static str> {
        let mut order: Vec<&DeferredTask> = self.tasks.iter().collect();
        order.sort_by_key(|task| (task.due, task.sequence));
        order.into_iter().map(|task| task.label).collect()
    }

    pub fn schedule(
        &mut self,
        delay: Duration,
        label: &'static str,
        task: impl FnOnce() + 'static,
    ) {
        let due = self.now.saturating_add(delay);
        trace!(label, delay_ms = delay.as_millis() as u64, "schedule deferred task");
        self.tasks.push(DeferredTask {
            due,
            sequence: self.next_sequence,
            label,
            run: Box::new(task),
        });
        self.next_sequence += 1;
    }

    /// Moves the clock forward and runs every task that came due, earliest
    /// first. Returns the number of tasks run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.now = self.now.saturating_add(elapsed);
        let now = self.now;
        self.run_where(|task| task.due <= now)
    }

    /// Runs every pending task regardless of its due time.
    pub fn flush(&mut self) -> usize {
        if let Some(latest) = self.tasks.iter().map(|task| task.due).max() {
            self.now = self.now.max(latest);
        }
        self.run_where(|_| true)
    }

    fn run_where(&mut self, is_due: impl Fn(&DeferredTask) -> bool) -> usize {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tasks).into_iter().partition(|task| is_due(task));
        self.tasks = pending;
        due.sort_by_key(|task| (task.due, task.sequence));
        let count = due.len();
        for task in due {
            trace!(label = task.label, "run deferred task");
            (task.run)();
        }
        count
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("now", &self.now)
            .field("pending", &self.pending_labels())
            .finish()
    }
}
