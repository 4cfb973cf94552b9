mod timer;

pub use timer::{TimerEntry, TimerQueue};

use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

/// One-shot deferred work
pub type TimerTask = Box<dyn FnOnce()>;

/// Fire-and-forget one-shot timers (`setTimeout`).
pub trait Timer {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> Result<()>;
}

/// Virtual-time timer driven explicitly by [`ManualTimer::advance`].
///
/// Tasks due at the same instant run in the order they were scheduled.
/// Tasks scheduled while advancing run in the same call if they fall due
/// before the target time.
pub struct ManualTimer {
    queue: RefCell<TimerQueue>,
    tasks: RefCell<HashMap<u64, TimerTask>>,
    now: Cell<Duration>,
    next_id: Cell<u64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self {
            queue: RefCell::new(TimerQueue::new()),
            tasks: RefCell::new(HashMap::new()),
            now: Cell::new(Duration::ZERO),
            next_id: Cell::new(1),
        }
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn has_pending(&self) -> bool {
        !self.tasks.borrow().is_empty()
    }

    /// Move the clock forward by `by`, running every task that falls due.
    /// Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut ran = 0;

        loop {
            let entry = self.queue.borrow_mut().pop_next_ready(target);
            let Some(entry) = entry else {
                break;
            };

            self.now.set(entry.wake_time.max(self.now.get()));
            let task = self.tasks.borrow_mut().remove(&entry.task_id);
            if let Some(task) = task {
                task();
                ran += 1;
            }
        }

        self.now.set(target);
        ran
    }

    pub fn advance_ms(&self, ms: u64) -> usize {
        self.advance(Duration::from_millis(ms))
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for ManualTimer {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> Result<()> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.queue.borrow_mut().schedule(id, self.now.get() + delay);
        self.tasks.borrow_mut().insert(id, task);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_when_due() {
        let timer = ManualTimer::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        timer
            .set_timeout(Duration::from_millis(500), Box::new(move || l.borrow_mut().push("a")))
            .unwrap();
        let l = log.clone();
        timer
            .set_timeout(Duration::from_millis(100), Box::new(move || l.borrow_mut().push("b")))
            .unwrap();
        assert_eq!(timer.pending_count(), 2);

        assert_eq!(timer.advance_ms(99), 0);
        assert_eq!(timer.advance_ms(1), 1);
        assert_eq!(*log.borrow(), vec!["b"]);

        assert_eq!(timer.advance_ms(400), 1);
        assert_eq!(*log.borrow(), vec!["b", "a"]);
        assert_eq!(timer.now(), Duration::from_millis(500));
        assert!(!timer.has_pending());
    }

    #[test]
    fn test_task_scheduled_from_task_runs_in_same_advance() {
        let timer = Rc::new(ManualTimer::new());
        let fired = Rc::new(Cell::new(false));

        let (t, f) = (timer.clone(), fired.clone());
        timer
            .set_timeout(
                Duration::from_millis(10),
                Box::new(move || {
                    let f = f.clone();
                    t.set_timeout(Duration::from_millis(10), Box::new(move || f.set(true)))
                        .unwrap();
                }),
            )
            .unwrap();

        assert_eq!(timer.advance_ms(30), 2);
        assert!(fired.get());
    }
}
