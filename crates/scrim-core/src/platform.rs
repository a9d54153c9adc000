//! Platform capability queries.
//!
//! Browser hosts back this with `matchMedia('(prefers-reduced-motion: reduce)')`,
//! `'ontouchstart' in window` and `matchMedia('(hover: hover)')`. Everything
//! else in the workspace asks through this trait, so the layout and collision
//! math runs unchanged in tests or under a non-DOM renderer.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};

use crate::dispose::Dispose;

pub trait Platform {
    fn prefers_reduced_motion(&self) -> bool;
    fn has_touch(&self) -> bool;
    /// Whether the primary input can hover (`(hover: hover)`).
    fn can_hover(&self) -> bool;

    fn is_touch_only(&self) -> bool {
        self.has_touch() && !self.can_hover()
    }

    /// Call `listener` whenever the reduced-motion preference flips.
    /// Dropping the listener is done by running the returned guard.
    fn watch_reduced_motion(&self, listener: Box<dyn Fn(bool)>) -> Dispose;
}

new_key_type! {
    struct ListenerKey;
}

struct HeadlessInner {
    reduced_motion: Cell<bool>,
    touch: Cell<bool>,
    hover: Cell<bool>,
    listeners: RefCell<SlotMap<ListenerKey, Rc<dyn Fn(bool)>>>,
}

/// In-process platform with settable capabilities.
#[derive(Clone)]
pub struct HeadlessPlatform {
    inner: Rc<HeadlessInner>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::desktop()
    }
}

impl HeadlessPlatform {
    fn with_caps(touch: bool, hover: bool) -> Self {
        Self {
            inner: Rc::new(HeadlessInner {
                reduced_motion: Cell::new(false),
                touch: Cell::new(touch),
                hover: Cell::new(hover),
                listeners: RefCell::new(SlotMap::with_key()),
            }),
        }
    }

    /// Mouse, hover-capable, no touch.
    pub fn desktop() -> Self {
        Self::with_caps(false, true)
    }

    /// Touch screen without any hover-capable pointer.
    pub fn touch_only() -> Self {
        Self::with_caps(true, false)
    }

    pub fn set_touch(&self, touch: bool, hover: bool) {
        self.inner.touch.set(touch);
        self.inner.hover.set(hover);
    }

    pub fn set_reduced_motion(&self, reduce: bool) {
        if self.inner.reduced_motion.replace(reduce) == reduce {
            return;
        }
        let listeners: Vec<_> = self.inner.listeners.borrow().values().cloned().collect();
        log::debug!(
            "platform: prefers-reduced-motion={reduce}, notifying {}",
            listeners.len()
        );
        for l in listeners {
            l(reduce);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl Platform for HeadlessPlatform {
    fn prefers_reduced_motion(&self) -> bool {
        self.inner.reduced_motion.get()
    }

    fn has_touch(&self) -> bool {
        self.inner.touch.get()
    }

    fn can_hover(&self) -> bool {
        self.inner.hover.get()
    }

    fn watch_reduced_motion(&self, listener: Box<dyn Fn(bool)>) -> Dispose {
        let key = self.inner.listeners.borrow_mut().insert(Rc::from(listener));
        let weak: Weak<HeadlessInner> = Rc::downgrade(&self.inner);
        Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().remove(key);
            }
        })
    }
}
