//! Cancellable timeouts and intervals driven by an external clock.
//!
//! Nothing here sleeps: the owner calls [`TimerQueue::poll`] with the current
//! time (seconds, monotonic) and receives the payloads of every timer that
//! came due. Intervals reschedule themselves; timeouts fire once.

/// Handle identifying a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due: f64,
    period: Option<f64>,
    payload: T,
}

/// A set of pending timers carrying payloads of type `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

fn ms_to_secs(ms: u32) -> f64 {
    ms as f64 / 1000.0
}

impl<T: Clone> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, due: f64, period: Option<f64>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due,
            period,
            payload,
        });
        id
    }

    /// Schedules `payload` to fire once, `delay_ms` after `now`.
    pub fn set_timeout(&mut self, now: f64, delay_ms: u32, payload: T) -> TimerId {
        self.push(now + ms_to_secs(delay_ms), None, payload)
    }

    /// Schedules `payload` to fire every `period_ms`, first at `now + period_ms`.
    ///
    /// A zero period is treated as one millisecond.
    pub fn set_interval(&mut self, now: f64, period_ms: u32, payload: T) -> TimerId {
        let period = ms_to_secs(period_ms.max(1));
        self.push(now + period, Some(period), payload)
    }

    /// Cancels a timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Whether the given timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns true if no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Time of the earliest pending timer.
    pub fn next_due(&self) -> Option<f64> {
        self.timers.iter().map(|timer| timer.due).reduce(f64::min)
    }

    /// Fires every timer due at `now`, in due order.
    ///
    /// An interval fires at most once per poll and is rescheduled one period
    /// after `now`, so a stalled clock never causes a burst of catch-up ticks.
    pub fn poll(&mut self, now: f64) -> Vec<T> {
        let mut fired: Vec<(f64, TimerId, T)> = Vec::new();
        self.timers.retain_mut(|timer| {
            if timer.due > now {
                return true;
            }
            fired.push((timer.due, timer.id, timer.payload.clone()));
            match timer.period {
                Some(period) => {
                    timer.due = now + period;
                    true
                }
                None => false,
            }
        });
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, payload)| payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_fires_once() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(0.0, 1000, "render");
        assert!(queue.poll(0.5).is_empty());
        assert_eq!(queue.poll(1.0), vec!["render"]);
        assert!(queue.poll(5.0).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let mut queue = TimerQueue::new();
        let id = queue.set_interval(0.0, 200, 7);
        assert_eq!(queue.poll(0.2), vec![7]);
        assert_eq!(queue.poll(0.3), Vec::<i32>::new());
        assert_eq!(queue.poll(0.4), vec![7]);
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.poll(10.0).is_empty());
    }

    #[test]
    fn interval_does_not_burst_after_a_stall() {
        let mut queue = TimerQueue::new();
        queue.set_interval(0.0, 100, ());
        assert_eq!(queue.poll(5.0).len(), 1);
        assert_eq!(queue.next_due(), Some(5.1));
    }

    #[test]
    fn fired_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(0.0, 300, "c");
        queue.set_timeout(0.0, 100, "a");
        queue.set_timeout(0.0, 200, "b");
        assert_eq!(queue.poll(1.0), vec!["a", "b", "c"]);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut queue = TimerQueue::new();
        let a = queue.set_interval(0.0, 500, 1);
        queue.set_timeout(0.0, 500, 2);
        assert!(queue.is_pending(a));
        queue.cancel_all();
        assert!(!queue.is_pending(a));
        assert_eq!(queue.next_due(), None);
        assert!(queue.poll(1.0).is_empty());
    }
}
