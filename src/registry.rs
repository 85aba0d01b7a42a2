use crate::models::TaskId;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Name of a timer slot. At most one timer is live per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    /// One-second countdown of a running wellness task.
    Task(TaskId),
    /// Delay before a completed task returns to idle.
    TaskWindow(TaskId),
    /// Countdown of the study session.
    Study,
}

/// One scheduled incarnation of a key. The generation tells a firing of the
/// current timer apart from a late firing of one that was already replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    pub key: TimerKey,
    pub generation: u64,
}

/// Source of timer firings.
///
/// Implementations deliver `TimerId`s back to whoever drives the registry,
/// either repeatedly every `period` or once after `delay`.
pub trait Scheduler {
    type Handle;

    fn repeat(&mut self, timer: TimerId, period: Duration) -> Self::Handle;
    fn once(&mut self, timer: TimerId, delay: Duration) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug)]
struct Entry<H> {
    generation: u64,
    handle: H,
    repeating: bool,
}

/// Owns every live timer and its cancellation handle.
pub struct TimerRegistry<S: Scheduler> {
    scheduler: S,
    entries: HashMap<TimerKey, Entry<S::Handle>>,
    next_generation: u64,
}

impl<S: Scheduler> TimerRegistry<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            entries: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Starts a repeating timer for `key`, replacing any live one.
    pub fn start(&mut self, key: TimerKey, period: Duration) -> TimerId {
        self.schedule(key, true, |scheduler, timer| scheduler.repeat(timer, period))
    }

    /// Starts a one-shot timer for `key`, replacing any live one.
    pub fn start_once(&mut self, key: TimerKey, delay: Duration) -> TimerId {
        self.schedule(key, false, |scheduler, timer| scheduler.once(timer, delay))
    }

    fn schedule(
        &mut self,
        key: TimerKey,
        repeating: bool,
        create: impl FnOnce(&mut S, TimerId) -> S::Handle,
    ) -> TimerId {
        if self.cancel(key) {
            debug!(?key, "replaced live timer");
        }

        self.next_generation += 1;
        let timer = TimerId {
            key,
            generation: self.next_generation,
        };
        let handle = create(&mut self.scheduler, timer);
        self.entries.insert(
            key,
            Entry {
                generation: timer.generation,
                handle,
                repeating,
            },
        );
        timer
    }

    /// Cancels the live timer for `key`. Returns false when there was none.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.entries.remove(&key) {
            Some(entry) => {
                self.scheduler.cancel(entry.handle);
                true
            }
            None => false,
        }
    }

    pub fn has(&self, key: TimerKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn current(&self, key: TimerKey) -> Option<TimerId> {
        self.entries.get(&key).map(|entry| TimerId {
            key,
            generation: entry.generation,
        })
    }

    /// Checks a firing against the live entries.
    ///
    /// Returns false for firings of cancelled or replaced timers. A one-shot
    /// timer is released here, since it will not fire again.
    pub fn accept(&mut self, timer: TimerId) -> bool {
        let Some(entry) = self.entries.get(&timer.key) else {
            return false;
        };
        if entry.generation != timer.generation {
            return false;
        }
        if !entry.repeating {
            self.cancel(timer.key);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        for (_, entry) in self.entries.drain() {
            self.scheduler.cancel(entry.handle);
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: Scheduler> Drop for TimerRegistry<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Scheduler that never fires on its own.
///
/// The embedder fires timers by passing `TimerRegistry::current` ids to the
/// dashboard; the scheduler only tracks which handles are still alive.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    live: HashMap<u64, (TimerId, Option<Duration>)>,
}

impl ManualScheduler {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, timer: TimerId) -> bool {
        self.live.values().any(|(live, _)| *live == timer)
    }

    /// Period of a live repeating timer, `None` for one-shots or dead ids.
    pub fn period_of(&self, timer: TimerId) -> Option<Duration> {
        self.live
            .values()
            .find(|(live, _)| *live == timer)
            .and_then(|(_, period)| *period)
    }

    fn track(&mut self, timer: TimerId, period: Option<Duration>) -> u64 {
        self.next_handle += 1;
        self.live.insert(self.next_handle, (timer, period));
        self.next_handle
    }
}

impl Scheduler for ManualScheduler {
    type Handle = u64;

    fn repeat(&mut self, timer: TimerId, period: Duration) -> u64 {
        self.track(timer, Some(period))
    }

    fn once(&mut self, timer: TimerId, _delay: Duration) -> u64 {
        self.track(timer, None)
    }

    fn cancel(&mut self, handle: u64) {
        self.live.remove(&handle);
    }
}
