//! State machine that applies table transitions and timed auto-transitions.

use crate::core::{Event, State, StateHistory, TransitionRecord, Trigger};
use crate::effects::scheduler::{Scheduler, TimerHandle};
use crate::effects::transition::{Dispatch, PendingTimeout, TransitionTable};
use crate::timing::{FixedTiming, TimingPolicy};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};
use uuid::Uuid;

/// Callback informed after every transition.
pub type Listener<S, E> = Arc<dyn Fn(&TransitionRecord<S, E>) + Send + Sync>;

/// Identifies a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Counters of what a machine has done since it was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Events that matched a rule
    pub accepted: u64,
    /// Events with no rule for the state they arrived in
    pub ignored: u64,
    /// Timeout rules that fired
    pub timeouts: u64,
}

struct ArmedTimer<S: State> {
    handle: TimerHandle,
    generation: u64,
    timeout: PendingTimeout<S>,
}

struct Core<S: State, E: Event> {
    current: S,
    pending: Option<ArmedTimer<S>>,
    generation: u64,
    history: StateHistory<S, E>,
    stats: DispatchStats,
    outbox: VecDeque<TransitionRecord<S, E>>,
    delivering: bool,
}

struct Shared<S: State, E: Event> {
    id: Uuid,
    table: TransitionTable<S, E>,
    scheduler: Box<dyn Scheduler>,
    timing: RwLock<Arc<dyn TimingPolicy<S>>>,
    core: Mutex<Core<S, E>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S, E>)>>,
    next_subscription: AtomicU64,
}

/// Table-driven state machine with at most one pending timed transition.
///
/// `dispatch` and timer firings are serialised on one lock. Every transition
/// cancels the pending timer before arming the next one, and a timer that
/// fires after being superseded is discarded. Clones are handles to the same
/// machine; the pending timer is cancelled when the last handle is dropped.
///
/// # Example
///
/// ```
/// use stoplight::effects::{ManualScheduler, TimedMachine};
/// use stoplight::traffic::{self, LightEvent, LightState};
/// use std::time::Duration;
///
/// let clock = ManualScheduler::new();
/// let machine = TimedMachine::new(traffic::table(), clock.clone());
///
/// assert_eq!(machine.state(), LightState::Red);
/// clock.advance(Duration::from_millis(3000));
/// assert_eq!(machine.state(), LightState::Green);
///
/// let outcome = machine.dispatch(LightEvent::ResetFault);
/// assert!(!outcome.is_accepted());
/// assert_eq!(outcome.state(), &LightState::Green);
/// ```
pub struct TimedMachine<S: State, E: Event> {
    shared: Arc<Shared<S, E>>,
}

impl<S: State, E: Event> Clone for TimedMachine<S, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Non-owning handle to a [`TimedMachine`].
///
/// Listeners that dispatch back into their machine should capture one of
/// these. A captured `TimedMachine` keeps the machine alive through its own
/// listener list, so its timer would never be cancelled.
pub struct WeakMachine<S: State, E: Event> {
    shared: Weak<Shared<S, E>>,
}

impl<S: State, E: Event> Clone for WeakMachine<S, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S: State, E: Event> WeakMachine<S, E> {
    /// The machine, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<TimedMachine<S, E>> {
        self.shared.upgrade().map(|shared| TimedMachine { shared })
    }
}

impl<S: State, E: Event> TimedMachine<S, E> {
    /// Create a machine in the table's initial state, arming its timeout.
    pub fn new(table: TransitionTable<S, E>, scheduler: impl Scheduler + 'static) -> Self {
        Self::with_timing(table, scheduler, FixedTiming)
    }

    /// Create a machine whose timeout delays pass through `timing`.
    pub fn with_timing(
        table: TransitionTable<S, E>,
        scheduler: impl Scheduler + 'static,
        timing: impl TimingPolicy<S> + 'static,
    ) -> Self {
        let initial = table.initial().clone();
        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            table,
            scheduler: Box::new(scheduler),
            timing: RwLock::new(Arc::new(timing)),
            core: Mutex::new(Core {
                current: initial,
                pending: None,
                generation: 0,
                history: StateHistory::new(),
                stats: DispatchStats::default(),
                outbox: VecDeque::new(),
                delivering: false,
            }),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        });

        {
            let mut core = shared.core.lock();
            debug!(machine = %shared.id, state = core.current.name(), "machine started");
            shared.arm(&mut core);
        }

        Self { shared }
    }

    /// Instance id, also carried on every log event as `machine`.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Current state (pure).
    pub fn state(&self) -> S {
        self.shared.core.lock().current.clone()
    }

    /// Handle that does not keep the machine alive.
    pub fn downgrade(&self) -> WeakMachine<S, E> {
        WeakMachine {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Table this machine runs.
    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.shared.table
    }

    /// The timer currently armed, if the current state has a timeout rule.
    pub fn pending_timeout(&self) -> Option<PendingTimeout<S>> {
        self.shared
            .core
            .lock()
            .pending
            .as_ref()
            .map(|armed| armed.timeout.clone())
    }

    /// Most recent transitions, oldest first.
    pub fn history(&self) -> StateHistory<S, E> {
        self.shared.core.lock().history.clone()
    }

    pub fn stats(&self) -> DispatchStats {
        self.shared.core.lock().stats
    }

    /// Offer an event to the machine.
    ///
    /// With a rule for `(state, event)` the machine cancels its pending timer,
    /// enters the target (re-arming if it has a timeout) and notifies
    /// listeners. Without one nothing changes and `Dispatch::Ignored` is
    /// returned.
    pub fn dispatch(&self, event: E) -> Dispatch<S> {
        let shared = &self.shared;
        let outcome = {
            let mut core = shared.core.lock();
            let from = core.current.clone();
            match shared.table.next(&from, &event).cloned() {
                Some(to) => {
                    core.stats.accepted += 1;
                    shared.transition(&mut core, to.clone(), Trigger::Event(event));
                    Dispatch::Accepted { from, to }
                }
                None => {
                    core.stats.ignored += 1;
                    trace!(
                        machine = %shared.id,
                        state = from.name(),
                        event = event.name(),
                        "event ignored"
                    );
                    Dispatch::Ignored { state: from }
                }
            }
        };
        shared.flush();
        outcome
    }

    /// Register a listener called after each transition with its record.
    ///
    /// Listeners run outside the machine lock, in transition order, and may
    /// dispatch further events through a [`WeakMachine`]. The listener list
    /// is owned by the machine, so a listener holding a `TimedMachine` clone
    /// keeps it alive until it is unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&TransitionRecord<S, E>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.shared.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.shared.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.shared.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Replace the timing policy. The pending timer keeps its delay; the
    /// policy applies from the next timer armed.
    pub fn set_timing(&self, timing: impl TimingPolicy<S> + 'static) {
        *self.shared.timing.write() = Arc::new(timing);
    }
}

impl<S: State, E: Event> Shared<S, E> {
    fn transition(self: &Arc<Self>, core: &mut Core<S, E>, to: S, trigger: Trigger<E>) {
        let from = std::mem::replace(&mut core.current, to.clone());
        debug!(
            machine = %self.id,
            from = from.name(),
            to = to.name(),
            trigger = trigger.label(),
            "transition"
        );

        let record = TransitionRecord {
            from,
            to,
            trigger,
            timestamp: Utc::now(),
        };
        core.history = core.history.record(record.clone());
        core.outbox.push_back(record);
        self.arm(core);
    }

    /// Cancel the pending timer, then schedule the current state's timeout.
    fn arm(self: &Arc<Self>, core: &mut Core<S, E>) {
        if let Some(armed) = core.pending.take() {
            self.scheduler.cancel(armed.handle);
        }
        core.generation += 1;

        let Some(rule) = self.table.timeout(&core.current) else {
            return;
        };
        let delay = self.timing.read().delay(&core.current, rule.delay);
        let generation = core.generation;
        let machine = Arc::downgrade(self);
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(shared) = machine.upgrade() {
                    shared.fire(generation);
                }
            }),
        );

        core.pending = Some(ArmedTimer {
            handle,
            generation,
            timeout: PendingTimeout {
                state: core.current.clone(),
                target: rule.target.clone(),
                delay,
            },
        });
    }

    fn fire(self: &Arc<Self>, generation: u64) {
        {
            let mut core = self.core.lock();
            let due = match &core.pending {
                Some(armed) if armed.generation == generation => {
                    Some((armed.timeout.target.clone(), armed.timeout.delay))
                }
                _ => None,
            };
            let Some((target, after)) = due else {
                trace!(machine = %self.id, generation, "stale timer discarded");
                return;
            };

            core.pending = None;
            core.stats.timeouts += 1;
            self.transition(&mut core, target, Trigger::Timeout { after });
        }
        self.flush();
    }

    /// Deliver queued records to listeners, one delivering thread at a time.
    fn flush(&self) {
        {
            let mut core = self.core.lock();
            if core.delivering || core.outbox.is_empty() {
                return;
            }
            core.delivering = true;
        }

        let mut guard = DeliveryGuard {
            shared: self,
            finished: false,
        };
        loop {
            let record = {
                let mut core = self.core.lock();
                match core.outbox.pop_front() {
                    Some(record) => record,
                    None => {
                        core.delivering = false;
                        guard.finished = true;
                        return;
                    }
                }
            };

            let listeners: Vec<Listener<S, E>> = self
                .listeners
                .lock()
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in &listeners {
                listener(&record);
            }
        }
    }
}

impl<S: State, E: Event> Drop for Shared<S, E> {
    fn drop(&mut self) {
        if let Some(armed) = self.core.get_mut().pending.take() {
            self.scheduler.cancel(armed.handle);
        }
    }
}

/// Releases the delivery slot if a listener panics mid-flush.
struct DeliveryGuard<'a, S: State, E: Event> {
    shared: &'a Shared<S, E>,
    finished: bool,
}

impl<S: State, E: Event> Drop for DeliveryGuard<'_, S, E> {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.core.lock().delivering = false;
        }
    }
}

impl<S: State, E: Event> std::fmt::Debug for TimedMachine<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.shared.core.lock();
        f.debug_struct("TimedMachine")
            .field("id", &self.shared.id)
            .field("state", &core.current)
            .field("pending", &core.pending.as_ref().map(|armed| &armed.timeout))
            .field("stats", &core.stats)
            .finish()
    }
}
