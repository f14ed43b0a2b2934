//! Delayed-callback scheduling for timeout rules.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Callback run when a scheduled delay elapses.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Identifies one scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Service that runs a callback once a delay has elapsed.
///
/// `schedule` must return before the callback runs; a machine holds its
/// lock while scheduling. `cancel` of a handle that already fired or was
/// already cancelled does nothing.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, callback: Callback) -> TimerHandle;

    fn cancel(&self, handle: TimerHandle);
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), Callback>,
    due: HashMap<u64, Duration>,
}

/// Scheduler driven by a virtual clock.
///
/// Nothing fires until [`advance`](ManualScheduler::advance) moves the clock.
/// Callbacks run in due-time order, ties in the order they were scheduled,
/// and a callback scheduled by another callback fires in the same call if it
/// falls due within the advanced window. Clones share one clock.
///
/// # Example
///
/// ```
/// use stoplight::effects::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
/// clock.schedule(Duration::from_millis(100), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// clock.advance(Duration::from_millis(99));
/// assert!(!fired.load(Ordering::SeqCst));
/// clock.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timeline: Arc<Mutex<Timeline>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.timeline.lock().now
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.timeline.lock().queue.len()
    }

    /// Virtual time at which the next callback falls due.
    pub fn next_due(&self) -> Option<Duration> {
        self.timeline
            .lock()
            .queue
            .first_key_value()
            .map(|((due, _), _)| *due)
    }

    /// Move the clock forward by `by`, running every callback that falls due.
    ///
    /// Returns the number of callbacks run. The clock lock is released while
    /// a callback runs, so callbacks may schedule and cancel freely.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.timeline.lock().now + by;
        let mut fired = 0;
        loop {
            let callback = {
                let mut timeline = self.timeline.lock();
                let next_due = timeline.queue.first_key_value().map(|((due, _), _)| *due);
                if !next_due.is_some_and(|due| due <= target) {
                    // Another thread may have advanced further meanwhile.
                    timeline.now = timeline.now.max(target);
                    break;
                }
                let Some(((due, id), callback)) = timeline.queue.pop_first() else {
                    break;
                };
                timeline.due.remove(&id);
                timeline.now = timeline.now.max(due);
                callback
            };
            callback();
            fired += 1;
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> TimerHandle {
        let mut timeline = self.timeline.lock();
        let id = timeline.next_id;
        timeline.next_id += 1;
        let due = timeline.now + delay;
        timeline.queue.insert((due, id), callback);
        timeline.due.insert(id, due);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut timeline = self.timeline.lock();
        if let Some(due) = timeline.due.remove(&handle.id()) {
            timeline.queue.remove(&(due, handle.id()));
        }
    }
}
