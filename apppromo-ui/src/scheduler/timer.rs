use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Timer entry with wake time (since the clock origin) and task ID
#[derive(Debug, Clone)]
pub struct TimerEntry {
    pub wake_time: Duration,
    pub task_id: u64,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.wake_time == other.wake_time && self.task_id == other.task_id
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; equal wake times pop in scheduling order
        other
            .wake_time
            .cmp(&self.wake_time)
            .then_with(|| other.task_id.cmp(&self.task_id))
    }
}

/// Timer queue using BinaryHeap for efficient scheduling
#[derive(Debug)]
pub struct TimerQueue {
    heap: BinaryHeap<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Schedule a task to wake at `wake_time`
    pub fn schedule(&mut self, task_id: u64, wake_time: Duration) {
        self.heap.push(TimerEntry { wake_time, task_id });
    }

    /// Pop the earliest timer if it is due at `now`
    pub fn pop_next_ready(&mut self, now: Duration) -> Option<TimerEntry> {
        if self.heap.peek()?.wake_time <= now {
            self.heap.pop()
        } else {
            None
        }
    }
}

impl Default for TimerQueue {
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

    fn drain(queue: &mut TimerQueue, now: Duration) -> Vec<u64> {
        std::iter::from_fn(|| queue.pop_next_ready(now))
            .map(|entry| entry.task_id)
            .collect()
    }

    #[test]
    fn test_timer_queue_order() {
        let mut queue = TimerQueue::new();

        queue.schedule(1, ms(300));
        queue.schedule(2, ms(100));
        queue.schedule(3, ms(200));

        assert_eq!(drain(&mut queue, ms(150)), vec![2]);
        assert_eq!(drain(&mut queue, ms(250)), vec![3]);
        assert_eq!(drain(&mut queue, ms(350)), vec![1]);
        assert!(queue.pop_next_ready(ms(10_000)).is_none());
    }

    #[test]
    fn test_equal_wake_times_pop_fifo() {
        let mut queue = TimerQueue::new();
        queue.schedule(1, ms(500));
        queue.schedule(2, ms(500));
        queue.schedule(3, ms(500));

        assert_eq!(drain(&mut queue, ms(499)), Vec::<u64>::new());
        assert_eq!(drain(&mut queue, ms(500)), vec![1, 2, 3]);
    }

    #[test]
    fn test_entry_keeps_wake_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(7, ms(100));

        let entry = queue.pop_next_ready(ms(120)).unwrap();
        assert_eq!(entry.task_id, 7);
        assert_eq!(entry.wake_time, ms(100));
    }
}
