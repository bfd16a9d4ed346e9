/// Deferred task scheduler
///
/// A virtual clock plus a queue of keyed tasks. Scheduling a task under a key
/// that already has one pending replaces it, so a newer transition always
/// supersedes the cleanup of an older one on the same element.
///
/// Nothing runs on its own: the owner advances the clock and executes
/// whatever [`Scheduler::advance`] hands back.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::Duration;

type Slot = (Duration, u64);

#[derive(Debug)]
pub struct Scheduler<K, T> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<Slot, (K, T)>,
    slots: HashMap<K, Slot>,
}

impl<K: Hash + Eq + Copy, T> Scheduler<K, T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to run `delay` from now.
    /// Returns true when it superseded a pending task with the same key.
    pub fn schedule(&mut self, key: K, delay: Duration, task: T) -> bool {
        let superseded = self.cancel(key).is_some();

        let slot = (self.now + delay, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(slot, (key, task));
        self.slots.insert(key, slot);

        superseded
    }

    pub fn cancel(&mut self, key: K) -> Option<T> {
        let slot = self.slots.remove(&key)?;
        self.queue.remove(&slot).map(|(_, task)| task)
    }

    /// Cancel every pending task whose key matches. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut matches: impl FnMut(&K) -> bool) -> usize {
        let keys: Vec<K> = self.slots.keys().filter(|k| matches(k)).copied().collect();
        keys.into_iter().filter(|k| self.cancel(*k).is_some()).count()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Move the clock forward and return the tasks that fell due, in order
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        self.now += by;
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            let (key, task) = entry.remove();
            self.slots.remove(&key);
            due.push(task);
        }
        due
    }

    /// Run the clock until nothing is pending
    pub fn drain(&mut self) -> Vec<T> {
        let last = self.queue.keys().next_back().map(|(at, _)| *at);
        match last {
            Some(at) if at > self.now => {
                let by = at - self.now;
                self.advance(by)
            }
            Some(_) => self.advance(Duration::ZERO),
            None => Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Copy, T> Default for Scheduler<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_tasks_run_when_due() {
        let mut scheduler: Scheduler<u32, &str> = Scheduler::new();
        scheduler.schedule(1, ms(300), "cleanup");
        scheduler.schedule(2, ms(0), "focus");

        assert_eq!(scheduler.advance(ms(0)), vec!["focus"]);
        assert!(scheduler.advance(ms(299)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec!["cleanup"]);
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.now(), ms(300));
    }

    #[test]
    fn test_same_due_time_keeps_schedule_order() {
        let mut scheduler: Scheduler<u32, u32> = Scheduler::new();
        scheduler.schedule(3, ms(10), 3);
        scheduler.schedule(1, ms(10), 1);
        scheduler.schedule(2, ms(10), 2);

        assert_eq!(scheduler.advance(ms(10)), vec![3, 1, 2]);
    }

    #[test]
    fn test_same_key_supersedes() {
        let mut scheduler: Scheduler<u32, &str> = Scheduler::new();
        assert!(!scheduler.schedule(7, ms(300), "old"));
        scheduler.advance(ms(200));
        assert!(scheduler.schedule(7, ms(300), "new"));

        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.advance(ms(100)).is_empty());
        assert_eq!(scheduler.advance(ms(200)), vec!["new"]);
    }

    #[test]
    fn test_cancel_where() {
        let mut scheduler: Scheduler<u32, u32> = Scheduler::new();
        for key in 0..6 {
            scheduler.schedule(key, ms(5), key);
        }

        assert_eq!(scheduler.cancel_where(|k| k % 2 == 0), 3);
        assert!(!scheduler.is_pending(2));
        assert!(scheduler.is_pending(3));
        assert_eq!(scheduler.drain(), vec![1, 3, 5]);
    }

    #[test]
    fn test_drain_runs_everything() {
        let mut scheduler: Scheduler<u32, u32> = Scheduler::new();
        scheduler.schedule(1, ms(300), 1);
        scheduler.schedule(2, ms(0), 2);

        assert_eq!(scheduler.drain(), vec![2, 1]);
        assert!(scheduler.drain().is_empty());
    }
}
