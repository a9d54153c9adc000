//! Clocks and the single-threaded timer queue.
//!
//! Nothing here spawns threads or sleeps. The host calls [`Timers::run_due`]
//! from its frame loop (or event loop tick) and due callbacks run inline.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, t: Instant) {
        *self.now.lock() = t;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

new_key_type! {
    pub struct TimerId;
}

struct Entry {
    deadline: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

struct Queue {
    clock: Arc<dyn Clock>,
    entries: SlotMap<TimerId, Entry>,
    next_seq: u64,
}

/// Cloneable handle to a shared timer queue.
#[derive(Clone)]
pub struct Timers(Rc<RefCell<Queue>>);

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Timers {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self(Rc::new(RefCell::new(Queue {
            clock,
            entries: SlotMap::with_key(),
            next_seq: 0,
        })))
    }

    pub fn now(&self) -> Instant {
        self.0.borrow().clock.now()
    }

    pub fn schedule(&self, delay: Duration, f: impl FnOnce() + 'static) -> TimerId {
        let mut q = self.0.borrow_mut();
        let deadline = q.clock.now() + delay;
        let seq = q.next_seq;
        q.next_seq += 1;
        q.entries.insert(Entry {
            deadline,
            seq,
            callback: Box::new(f),
        })
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.0.borrow_mut().entries.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.0.borrow().entries.contains_key(id)
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.0.borrow().entries.values().map(|e| e.deadline).min()
    }

    /// Fire every timer whose deadline has passed, earliest first (ties in
    /// scheduling order). Timers scheduled by a callback wait for the next call.
    pub fn run_due(&self) -> usize {
        let (now, horizon) = {
            let q = self.0.borrow();
            (q.clock.now(), q.next_seq)
        };

        let mut fired = 0;
        loop {
            let entry = {
                let mut q = self.0.borrow_mut();
                let next = q
                    .entries
                    .iter()
                    .filter(|(_, e)| e.deadline <= now && e.seq < horizon)
                    .min_by_key(|(_, e)| (e.deadline, e.seq))
                    .map(|(id, _)| id);
                match next {
                    Some(id) => q.entries.remove(id),
                    None => break,
                }
            };
            // queue borrow released: callbacks may schedule or cancel
            if let Some(entry) = entry {
                (entry.callback)();
                fired += 1;
            }
        }

        if fired > 0 {
            log::trace!("timers: fired {fired}, {} pending", self.pending());
        }
        fired
    }
}
