//! Delayed show/hide, independent of how often the host re-renders.
//!
//! ```text
//!            show (delay > 0)              timer
//!   Hidden ───────────────────▶ PendingShow ─────▶ Visible
//!     ▲                              │ hide           │
//!     │ timer                        ▼                │ hide (delay > 0)
//!   PendingHide ◀─────────────────────────────────────┘
//! ```
//!
//! `show` while `PendingHide` and `hide` while `PendingShow` cancel the pending
//! timer and start the opposite delay from scratch. The machine never
//! terminates; `destroy` (or drop) cancels whatever is pending.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::time::{TimerId, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityState {
    Hidden,
    PendingShow,
    Visible,
    PendingHide,
}

impl VisibilityState {
    /// Whether the widget is currently on screen.
    pub fn is_rendered(self) -> bool {
        matches!(self, VisibilityState::Visible | VisibilityState::PendingHide)
    }
}

type Listener = Rc<dyn Fn(VisibilityState)>;

struct Inner {
    state: VisibilityState,
    delay: Duration,
    pending: Option<TimerId>,
    listeners: Vec<Listener>,
    destroyed: bool,
}

pub struct VisibilityStateMachine {
    inner: Rc<RefCell<Inner>>,
    timers: Timers,
}

impl std::fmt::Debug for VisibilityStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("VisibilityStateMachine")
            .field("state", &inner.state)
            .field("delay", &inner.delay)
            .field("pending", &inner.pending.is_some())
            .field("destroyed", &inner.destroyed)
            .finish()
    }
}

impl VisibilityStateMachine {
    pub fn new(timers: Timers, delay: Duration) -> Self {
        Self::with_state(timers, delay, VisibilityState::Hidden)
    }

    /// Start settled in `Visible` or `Hidden` without running any delay.
    pub fn with_initial(timers: Timers, delay: Duration, visible: bool) -> Self {
        let state = if visible {
            VisibilityState::Visible
        } else {
            VisibilityState::Hidden
        };
        Self::with_state(timers, delay, state)
    }

    fn with_state(timers: Timers, delay: Duration, state: VisibilityState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state,
                delay,
                pending: None,
                listeners: Vec::new(),
                destroyed: false,
            })),
            timers,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.inner.borrow().state
    }

    pub fn is_visible(&self) -> bool {
        self.state().is_rendered()
    }

    pub fn delay(&self) -> Duration {
        self.inner.borrow().delay
    }

    /// Takes effect for the next `show`/`hide`; a pending timer keeps its deadline.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.borrow_mut().delay = delay;
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    /// Called with the new state on every change.
    pub fn subscribe(&self, f: impl Fn(VisibilityState) + 'static) {
        let mut inner = self.inner.borrow_mut();
        if !inner.destroyed {
            inner.listeners.push(Rc::new(f));
        }
    }

    pub fn show(&self) {
        if self.is_destroyed() {
            return;
        }
        match self.state() {
            VisibilityState::Visible | VisibilityState::PendingShow => {}
            VisibilityState::Hidden | VisibilityState::PendingHide => {
                self.cancel_pending();
                self.transition_after_delay(VisibilityState::PendingShow, VisibilityState::Visible)
            }
        }
    }

    pub fn hide(&self) {
        if self.is_destroyed() {
            return;
        }
        match self.state() {
            VisibilityState::Hidden | VisibilityState::PendingHide => {}
            VisibilityState::Visible | VisibilityState::PendingShow => {
                self.cancel_pending();
                self.transition_after_delay(VisibilityState::PendingHide, VisibilityState::Hidden)
            }
        }
    }

    pub fn show_immediate(&self) {
        if self.is_destroyed() {
            return;
        }
        self.cancel_pending();
        set_state(&self.inner, VisibilityState::Visible);
    }

    pub fn hide_immediate(&self) {
        if self.is_destroyed() {
            return;
        }
        self.cancel_pending();
        set_state(&self.inner, VisibilityState::Hidden);
    }

    /// Cancel pending timers and drop listeners. Idempotent.
    pub fn destroy(&self) {
        self.cancel_pending();
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.destroyed = true;
    }

    fn transition_after_delay(&self, pending: VisibilityState, target: VisibilityState) {
        let delay = self.delay();
        if delay.is_zero() {
            set_state(&self.inner, target);
            return;
        }

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let id = self.timers.schedule(delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            {
                let mut i = inner.borrow_mut();
                i.pending = None;
                if i.destroyed {
                    return;
                }
            }
            set_state(&inner, target);
        });
        self.inner.borrow_mut().pending = Some(id);
        set_state(&self.inner, pending);
    }

    fn cancel_pending(&self) {
        let pending = self.inner.borrow_mut().pending.take();
        if let Some(id) = pending {
            self.timers.cancel(id);
        }
    }
}

impl Drop for VisibilityStateMachine {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn set_state(inner: &Rc<RefCell<Inner>>, next: VisibilityState) {
    let listeners = {
        let mut i = inner.borrow_mut();
        if i.state == next {
            return;
        }
        log::trace!("visibility: {:?} -> {:?}", i.state, next);
        i.state = next;
        i.listeners.clone()
    };
    for l in listeners {
        l(next);
    }
}
