//! Timer queue driven by frame time
//!
//! Stands in for wall-clock callbacks: effect layers schedule payloads with a
//! delay in seconds and collect them as the game loop advances time. A payload
//! popped by `pop_due` moves the queue's clock to its due time, so anything
//! scheduled while handling it is measured from that instant and repeating
//! patterns keep their period regardless of frame rate.

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A timer that has come due
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// Time (seconds on the queue's clock) the timer was due
    pub due: f64,
    pub payload: T,
}

struct Timer<T> {
    id: TimerId,
    due: f64,
    payload: T,
}

/// Ordered set of pending timers with its own clock
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    now: f64,
    horizon: f64,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            now: 0.0,
            horizon: 0.0,
            next_id: 0,
        }
    }

    /// Current time on the queue's clock, in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `payload` to fire `delay` seconds from now (negative delays fire next pop)
    pub fn schedule(&mut self, delay: f64, payload: T) -> TimerId {
        let due = self.now + delay.max(0.0);
        self.schedule_at(due, payload)
    }

    /// Schedule `payload` at an absolute time on the queue's clock
    pub fn schedule_at(&mut self, due: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { id, due, payload });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Whether a timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Extend the horizon by `dt` seconds. Follow with `pop_due` until it returns None.
    pub fn advance(&mut self, dt: f64) {
        self.horizon = self.now.max(self.horizon) + dt.max(0.0);
    }

    /// Pop the earliest timer due at or before the horizon.
    ///
    /// Ties fire in scheduling order. When nothing is left to fire the clock
    /// settles on the horizon.
    pub fn pop_due(&mut self) -> Option<Fired<T>> {
        let next = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.horizon)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.0.cmp(&b.id.0)))
            .map(|(i, _)| i);

        match next {
            Some(index) => {
                let timer = self.timers.remove(index);
                self.now = self.now.max(timer.due);
                Some(Fired {
                    id: timer.id,
                    due: timer.due,
                    payload: timer.payload,
                })
            }
            None => {
                self.now = self.horizon;
                None
            }
        }
    }

    /// Advance by `dt` and return every payload that came due, in order.
    ///
    /// Use `advance` + `pop_due` instead when handlers reschedule.
    pub fn drain_due(&mut self, dt: f64) -> Vec<T> {
        self.advance(dt);
        let mut fired = Vec::new();
        while let Some(timer) = self.pop_due() {
            fired.push(timer.payload);
        }
        fired
    }
}
