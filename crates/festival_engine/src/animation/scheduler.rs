//! Cancellable one-shot task scheduler
//!
//! Scenes schedule delayed effects (staggered lamp lighting, highlight
//! fade-outs, delayed particle disposal) as plain payload values. The owner
//! polls [`Scheduler::advance`] each frame and handles the payloads that came
//! due; [`Scheduler::drain`] cancels everything at once so a disposed owner
//! never receives a late task.

use crate::foundation::collections::{SlotMap, TaskId};

#[derive(Debug, Clone)]
struct Pending<T> {
    due: f32,
    sequence: u64,
    payload: T,
}

/// Owned set of cancellable delayed tasks
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: SlotMap<TaskId, Pending<T>>,
    now: f32,
    sequence: u64,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            now: 0.0,
            sequence: 0,
        }
    }

    /// Schedule `payload` to come due after `delay` seconds
    pub fn schedule(&mut self, delay: f32, payload: T) -> TaskId {
        self.sequence += 1;
        self.tasks.insert(Pending {
            due: self.now + delay.max(0.0),
            sequence: self.sequence,
            payload,
        })
    }

    /// Cancel a pending task, returning its payload
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        self.tasks.remove(id).map(|p| p.payload)
    }

    /// Whether a task is still pending
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of pending tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Seconds elapsed on this scheduler's clock
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Advance the clock and remove every task that came due
    ///
    /// Payloads are returned in due-time order; ties keep scheduling order.
    pub fn advance(&mut self, delta_time: f32) -> Vec<T> {
        self.now += delta_time.max(0.0);
        let now = self.now;
        let due: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(id, _)| id)
            .collect();

        let mut fired: Vec<Pending<T>> = due.into_iter().filter_map(|id| self.tasks.remove(id)).collect();
        fired.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.sequence.cmp(&b.sequence)));
        fired.into_iter().map(|p| p.payload).collect()
    }

    /// Cancel every pending task, returning how many were cancelled
    pub fn drain(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.3, "c");
        scheduler.schedule(0.1, "a");
        scheduler.schedule(0.2, "b");

        assert!(scheduler.advance(0.05).is_empty());
        assert_eq!(scheduler.advance(0.5), vec!["a", "b", "c"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_ties_keep_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.1, 1);
        scheduler.schedule(0.1, 2);
        scheduler.schedule(0.1, 3);
        assert_eq!(scheduler.advance(0.1), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule(1.0, "keep");
        let drop = scheduler.schedule(1.0, "drop");
        assert_eq!(scheduler.cancel(drop), Some("drop"));
        assert_eq!(scheduler.cancel(drop), None);
        assert!(scheduler.is_pending(keep));
        assert_eq!(scheduler.advance(1.0), vec!["keep"]);
    }

    #[test]
    fn test_delay_is_relative_to_current_time() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(5.0);
        scheduler.schedule(1.0, ());
        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5).len(), 1);
    }

    #[test]
    fn test_drain_cancels_everything() {
        let mut scheduler = Scheduler::new();
        for i in 0..5 {
            scheduler.schedule(i as f32, i);
        }
        assert_eq!(scheduler.drain(), 5);
        assert!(scheduler.advance(100.0).is_empty());
    }
}
