//! Repeating timer abstraction
//!
//! The feed never talks to a clock directly. It registers a repeating task
//! with a [`Scheduler`] and keeps the returned [`TimerHandle`]; dropping or
//! cancelling the handle stops the task.
//!
//! - [`TokioScheduler`]: real timer on a Tokio runtime
//! - [`ManualScheduler`]: virtual clock advanced explicitly, for tests and
//!   deterministic replays

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Work executed on every period
pub type Task = Box<dyn FnMut() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` every `period`, first run one period from now
    ///
    /// A zero period schedules nothing and returns an inert handle.
    fn schedule_repeating(&self, period: Duration, task: Task) -> TimerHandle;
}

// =============================================================================
// TimerHandle
// =============================================================================

/// Owning handle for a scheduled task. Cancels the task when dropped.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle with nothing to cancel
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Cancel future runs
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

// =============================================================================
// TokioScheduler
// =============================================================================

/// Scheduler backed by `tokio::time::interval`
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime of the calling context, if any
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut task: Task) -> TimerHandle {
        if period.is_zero() {
            warn!("[Scheduler] Ignoring repeating task with zero period");
            return TimerHandle::inert();
        }

        let handle = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // Skip the immediate first tick - wait one full period
            ticker.tick().await;
            // If a run is late, skip missed ticks rather than bursting
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                task();
            }
        });

        debug!("[Scheduler] Repeating task every {:?}", period);

        TimerHandle::new(move || handle.abort())
    }
}

// =============================================================================
// ManualScheduler
// =============================================================================

struct ManualEntry {
    period: Duration,
    next_due: Duration,
    /// Taken out while the task is running
    task: Option<Task>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    entries: HashMap<u64, ManualEntry>,
}

/// Virtual-time scheduler: nothing runs until [`ManualScheduler::advance`]
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of scheduled, uncancelled tasks
    pub fn active_timers(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Move the clock forward, running every task that falls due in order
    pub fn advance(&self, by: Duration) {
        let target = self.inner.lock().now + by;

        loop {
            // Pick the earliest due task and take it out so it can run unlocked
            let due = {
                let mut inner = self.inner.lock();
                let next = inner
                    .entries
                    .iter()
                    .filter(|(_, e)| e.task.is_some() && e.next_due <= target)
                    .min_by_key(|(id, e)| (e.next_due, **id))
                    .map(|(id, e)| (*id, e.next_due));

                match next {
                    Some((id, due_at)) => {
                        inner.now = due_at;
                        let entry = inner.entries.get_mut(&id).map(|e| {
                            e.next_due += e.period;
                            e.task.take()
                        });
                        entry.flatten().map(|task| (id, task))
                    }
                    None => None,
                }
            };

            let Some((id, mut task)) = due else {
                break;
            };

            task();

            // Put it back unless the task was cancelled while running
            if let Some(entry) = self.inner.lock().entries.get_mut(&id) {
                entry.task = Some(task);
            }
        }

        self.inner.lock().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, task: Task) -> TimerHandle {
        if period.is_zero() {
            warn!("[Scheduler] Ignoring repeating task with zero period");
            return TimerHandle::inert();
        }

        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            let next_due = inner.now + period;
            inner.entries.insert(
                id,
                ManualEntry {
                    period,
                    next_due,
                    task: Some(task),
                },
            );
            id
        };

        let inner = Arc::clone(&self.inner);
        TimerHandle::new(move || {
            inner.lock().entries.remove(&id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_task(count: &Arc<AtomicUsize>) -> Task {
        let count = Arc::clone(count);
        Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_runs_on_period_boundaries() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule_repeating(Duration::from_millis(2000), counter_task(&count));

        scheduler.advance(Duration::from_millis(1999));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        scheduler.advance(Duration::from_millis(6000));
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(scheduler.now(), Duration::from_millis(8000));
    }

    #[test]
    fn test_manual_cancel_on_drop() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule_repeating(Duration::from_millis(100), counter_task(&count));
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.advance(Duration::from_millis(100));
        handle.cancel();
        scheduler.advance(Duration::from_millis(1000));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_manual_task_can_cancel_itself() {
        let scheduler = ManualScheduler::new();
        let slot: Arc<Mutex<Option<TimerHandle>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));

        let task_slot = Arc::clone(&slot);
        let task_count = Arc::clone(&count);
        let handle = scheduler.schedule_repeating(
            Duration::from_millis(10),
            Box::new(move || {
                task_count.fetch_add(1, Ordering::SeqCst);
                task_slot.lock().take();
            }),
        );
        *slot.lock() = Some(handle);

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_manual_interleaves_tasks_by_due_time() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let fast = Arc::clone(&order);
        let _a = scheduler.schedule_repeating(
            Duration::from_millis(30),
            Box::new(move || fast.lock().push("fast")),
        );
        let slow = Arc::clone(&order);
        let _b = scheduler.schedule_repeating(
            Duration::from_millis(50),
            Box::new(move || slow.lock().push("slow")),
        );

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(*order.lock(), vec!["fast", "slow", "fast", "fast", "slow"]);
    }

    #[test]
    fn test_manual_zero_period_is_ignored() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule_repeating(Duration::ZERO, counter_task(&count));

        assert_eq!(scheduler.active_timers(), 0);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_zero_period_is_ignored() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule_repeating(Duration::ZERO, counter_task(&count));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_ticks_and_aborts() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule_repeating(Duration::from_millis(2000), counter_task(&count));

        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
