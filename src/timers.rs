/// Identifies a scheduled timer. Handles are never reused within one queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

struct PendingTimer<T> {
    handle: TimerHandle,
    due: f64,
    payload: T
}

/// One-shot timers driven by the frame clock.
///
/// Timers cannot be cancelled: once scheduled, a payload is handed back by
/// exactly one call to [`TimerQueue::advance`], the first one that moves the
/// clock to or past its due time.
pub struct TimerQueue<T> {
    now: f64,
    next_id: u64,
    pending: Vec<PendingTimer<T>>
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new()
        }
    }

    /// Seconds elapsed on this queue's clock.
    pub fn now(&self) -> f64 { self.now }

    pub fn pending_count(&self) -> usize { self.pending.len() }

    pub fn schedule_once(&mut self, delay_secs: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            due: self.now + delay_secs.max(0.0) as f64,
            payload
        });
        handle
    }

    /// Moves the clock forward and returns expired timers ordered by due time,
    /// ties broken by scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerHandle, T)> {
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let mut expired = Vec::new();
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].due <= now {
                expired.push(self.pending.swap_remove(idx));
            } else {
                idx += 1;
            }
        }
        expired.sort_by(|lhs, rhs| {
            lhs.due
                .partial_cmp(&rhs.due)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(lhs.handle.cmp(&rhs.handle))
        });
        expired.into_iter().map(|it| (it.handle, it.payload)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once_when_due() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule_once(1.0, "boom");

        assert!(timers.advance(0.5).is_empty());
        assert!(timers.advance(0.25).is_empty());
        assert_eq!(timers.advance(0.25), vec![(handle, "boom")]);
        assert!(timers.advance(10.0).is_empty());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn delay_counts_from_scheduling_time() {
        let mut timers = TimerQueue::new();
        timers.advance(3.0);
        timers.schedule_once(1.0, ());
        assert!(timers.advance(0.75).is_empty());
        assert_eq!(timers.advance(0.25).len(), 1);
        assert_eq!(timers.now(), 4.0);
    }

    #[test]
    fn expired_timers_come_back_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_once(2.0, 'c');
        timers.schedule_once(0.5, 'a');
        timers.schedule_once(0.5, 'b');

        let fired: Vec<char> = timers.advance(5.0).into_iter().map(|(_, it)| it).collect();
        assert_eq!(fired, vec!['a', 'b', 'c']);
    }
}
