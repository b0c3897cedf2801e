//! Single-slot-per-class debounce scheduler.
//!
//! Timers are plain deadlines: nothing runs on its own. The owner calls [`Debouncer::poll`]
//! on every tick and gets back the jobs whose quiet period elapsed, and uses
//! [`Debouncer::next_deadline`] to decide how long it may sleep.

use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Pending<J> {
    deadline: Instant,
    job: J,
}

pub struct Debouncer<C, J> {
    slots: FxHashMap<C, Pending<J>>,
}

impl<C, J> Debouncer<C, J>
where
    C: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            slots: FxHashMap::default(),
        }
    }

    /// Arms `class` to fire `job` after `delay`, replacing whatever was pending for it.
    /// Returns true when a previous job was superseded.
    pub fn schedule(&mut self, class: C, job: J, delay: Duration, now: Instant) -> bool {
        let deadline = now + delay;
        self.slots.insert(class, Pending { deadline, job }).is_some()
    }

    /// Drops the pending job for `class`. Cancelling an empty slot is a no-op.
    pub fn cancel(&mut self, class: C) -> Option<J> {
        self.slots.remove(&class).map(|pending| pending.job)
    }

    pub fn is_pending(&self, class: C) -> bool {
        self.slots.contains_key(&class)
    }

    /// Removes and returns every job whose deadline is at or before `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<(C, J)> {
        let mut due: Vec<C> = self
            .slots
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(class, _)| *class)
            .collect();
        if due.is_empty() {
            return Vec::new();
        }

        let mut fired: Vec<(Instant, C, J)> = Vec::with_capacity(due.len());
        for class in due.drain(..) {
            if let Some(pending) = self.slots.remove(&class) {
                fired.push((pending.deadline, class, pending.job));
            }
        }
        fired.sort_by_key(|(deadline, _, _)| *deadline);
        fired.into_iter().map(|(_, class, job)| (class, job)).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().map(|pending| pending.deadline).min()
    }
}

impl<C, J> Default for Debouncer<C, J>
where
    C: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/debounce.rs"]
mod tests;
