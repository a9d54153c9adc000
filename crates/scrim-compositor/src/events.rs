//! Interaction events and the per-widget state derived from them.

use std::collections::{HashMap, HashSet};

use scrim_core::{Interaction, InteractionState};

/// Input routed into the compositor by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayEvent {
    ContainerEnter,
    ContainerLeave,
    ContainerFocus,
    ContainerBlur,
    WidgetEnter(String),
    WidgetLeave(String),
    WidgetFocus(String),
    WidgetBlur(String),
    WidgetPress(String),
    WidgetRelease(String),
    /// Set a named condition for `{ "condition": .. }` triggers.
    SetCondition { name: String, value: bool },
}

/// Keys that may activate a focused widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

impl Key {
    pub fn activates(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[derive(Clone, Debug, Default)]
pub struct InteractionTracker {
    container_hovered: bool,
    container_focused: bool,
    hovered: Option<String>,
    focused: Option<String>,
    pressed: HashSet<String>,
    conditions: HashMap<String, bool>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether anything changed.
    pub fn apply(&mut self, event: &OverlayEvent) -> bool {
        match event {
            OverlayEvent::ContainerEnter => replace(&mut self.container_hovered, true),
            OverlayEvent::ContainerLeave => {
                let mut changed = replace(&mut self.container_hovered, false);
                // the pointer cannot be over a widget outside the container
                changed |= self.hovered.take().is_some();
                changed
            }
            OverlayEvent::ContainerFocus => replace(&mut self.container_focused, true),
            OverlayEvent::ContainerBlur => replace(&mut self.container_focused, false),
            OverlayEvent::WidgetEnter(id) => set_id(&mut self.hovered, id),
            OverlayEvent::WidgetLeave(id) => clear_id(&mut self.hovered, id),
            OverlayEvent::WidgetFocus(id) => set_id(&mut self.focused, id),
            OverlayEvent::WidgetBlur(id) => clear_id(&mut self.focused, id),
            OverlayEvent::WidgetPress(id) => self.pressed.insert(id.clone()),
            OverlayEvent::WidgetRelease(id) => self.pressed.remove(id),
            OverlayEvent::SetCondition { name, value } => {
                self.conditions.insert(name.clone(), *value) != Some(*value)
            }
        }
    }

    pub fn is_container_hovered(&self) -> bool {
        self.container_hovered
    }

    pub fn is_container_focused(&self) -> bool {
        self.container_focused
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Drop per-widget state for widgets that no longer exist.
    pub fn retain_widgets(&mut self, live: &HashSet<&str>) {
        if self.hovered.as_deref().is_some_and(|h| !live.contains(h)) {
            self.hovered = None;
        }
        if self.focused.as_deref().is_some_and(|f| !live.contains(f)) {
            self.focused = None;
        }
        self.pressed.retain(|p| live.contains(p.as_str()));
    }

    /// Interaction state as seen by widget `id`.
    ///
    /// Container focus counts as focus for every widget, so keyboard users
    /// tabbing into the overlay see `focus` widgets.
    pub fn state_for(&self, id: &str) -> InteractionState {
        let mut flags = Interaction::empty();
        flags.set(Interaction::CONTAINER_HOVERED, self.container_hovered);
        match self.hovered.as_deref() {
            Some(h) if h == id => flags |= Interaction::HOVERED,
            Some(_) => flags |= Interaction::SIBLING_HOVERED,
            None => {}
        }
        flags.set(
            Interaction::FOCUSED,
            self.container_focused || self.focused.as_deref() == Some(id),
        );
        flags.set(Interaction::ACTIVE, self.pressed.contains(id));
        InteractionState {
            flags,
            conditions: self.conditions.clone(),
        }
    }
}

fn replace(slot: &mut bool, value: bool) -> bool {
    std::mem::replace(slot, value) != value
}

fn set_id(slot: &mut Option<String>, id: &str) -> bool {
    if slot.as_deref() == Some(id) {
        return false;
    }
    *slot = Some(id.to_string());
    true
}

fn clear_id(slot: &mut Option<String>, id: &str) -> bool {
    if slot.as_deref() == Some(id) {
        *slot = None;
        true
    } else {
        false
    }
}
