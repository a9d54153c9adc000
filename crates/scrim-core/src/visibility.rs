//! # Visibility
//!
//! Whether a widget is shown is a pure function of its [`Trigger`] and the
//! current [`InteractionState`]; how it appears and disappears is a pure
//! function of its [`VisibilityConfig`], the target visibility and the
//! platform's reduced-motion preference.
//!
//! ```rust
//! use scrim_core::visibility::*;
//!
//! let state = InteractionState::new().with(Interaction::CONTAINER_HOVERED);
//! assert!(should_show(&Trigger::named(NamedTrigger::HoverContainer), &state));
//! assert!(!should_show(&Trigger::condition("paused"), &state));
//! ```
//!
//! Timed show/hide lives in [`crate::state_machine`].

use std::collections::HashMap;
use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedTrigger {
    Always,
    Hover,
    HoverContainer,
    HoverSibling,
    Focus,
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Trigger {
    Named(NamedTrigger),
    Condition {
        condition: String,
    },
    /// Any other string found in configuration. Never shown.
    Unrecognized(String),
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::ALWAYS
    }
}

impl Trigger {
    pub const ALWAYS: Trigger = Trigger::Named(NamedTrigger::Always);

    pub fn named(t: NamedTrigger) -> Self {
        Trigger::Named(t)
    }

    pub fn condition(name: impl Into<String>) -> Self {
        Trigger::Condition {
            condition: name.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    None,
    #[default]
    Fade,
    Slide,
    Scale,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// CSS timing-function keyword.
    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisibilityConfig {
    pub trigger: Trigger,
    pub transition: Transition,
    /// Milliseconds.
    pub transition_duration: u64,
    /// Milliseconds before a show or hide takes effect.
    pub delay: u64,
    pub easing: Easing,
    /// Honour the platform's prefers-reduced-motion setting.
    pub reduce_motion: bool,
    /// Trigger used instead of `trigger` on touch-only devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch_fallback: Option<Trigger>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            trigger: Trigger::ALWAYS,
            transition: Transition::Fade,
            transition_duration: 200,
            delay: 0,
            easing: Easing::EaseOut,
            reduce_motion: true,
            touch_fallback: None,
        }
    }
}

impl VisibilityConfig {
    pub fn with_trigger(trigger: Trigger) -> Self {
        Self {
            trigger,
            ..Self::default()
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration)
    }

    pub fn delay_duration(&self) -> Duration {
        Duration::from_millis(self.delay)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Interaction: u8 {
        /// Pointer is over this widget.
        const HOVERED = 1 << 0;
        /// Pointer is anywhere over the overlay container.
        const CONTAINER_HOVERED = 1 << 1;
        /// Pointer is over some other widget in the same overlay.
        const SIBLING_HOVERED = 1 << 2;
        const FOCUSED = 1 << 3;
        /// Widget is being pressed.
        const ACTIVE = 1 << 4;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub flags: Interaction,
    pub conditions: HashMap<String, bool>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: Interaction) -> Self {
        self.flags |= flag;
        self
    }

    pub fn with_condition(mut self, name: impl Into<String>, value: bool) -> Self {
        self.conditions.insert(name.into(), value);
        self
    }

    /// Missing conditions read as `false`.
    pub fn condition(&self, name: &str) -> bool {
        self.conditions.get(name).copied().unwrap_or(false)
    }
}

/// Fail-closed trigger evaluation.
pub fn should_show(trigger: &Trigger, state: &InteractionState) -> bool {
    match trigger {
        Trigger::Named(named) => match named {
            NamedTrigger::Always => true,
            NamedTrigger::Hover => state.flags.contains(Interaction::HOVERED),
            NamedTrigger::HoverContainer => state.flags.contains(Interaction::CONTAINER_HOVERED),
            NamedTrigger::HoverSibling => state.flags.contains(Interaction::SIBLING_HOVERED),
            NamedTrigger::Focus => state.flags.contains(Interaction::FOCUSED),
            NamedTrigger::Active => state.flags.contains(Interaction::ACTIVE),
        },
        Trigger::Condition { condition } => state.condition(condition),
        Trigger::Unrecognized(_) => false,
    }
}

/// Touch-only devices cannot hover, so plain `hover` widgets become `always`
/// unless the author set an explicit `touch_fallback`. Every other trigger,
/// including `hover-container`, is left alone without a fallback.
pub fn adapt_for_touch(config: &VisibilityConfig, platform: &dyn Platform) -> VisibilityConfig {
    if platform.is_touch_only() {
        adapt_for_touch_only(config)
    } else {
        config.clone()
    }
}

pub fn adapt_for_touch_only(config: &VisibilityConfig) -> VisibilityConfig {
    let mut adapted = config.clone();
    if let Some(fallback) = &config.touch_fallback {
        adapted.trigger = fallback.clone();
    } else if adapted.trigger == Trigger::Named(NamedTrigger::Hover) {
        adapted.trigger = Trigger::ALWAYS;
    }
    adapted
}

/// Vertical distance a `slide` widget travels while hidden.
pub const SLIDE_DISTANCE_PX: f32 = 8.0;
/// Scale of a hidden `scale` widget.
pub const HIDDEN_SCALE: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvents {
    Auto,
    None,
}

impl PointerEvents {
    pub fn css(self) -> &'static str {
        match self {
            PointerEvents::Auto => "auto",
            PointerEvents::None => "none",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionTransform {
    TranslateY(f32),
    Scale(f32),
}

impl MotionTransform {
    pub fn css(&self) -> String {
        match self {
            MotionTransform::TranslateY(px) => format!("translateY({px}px)"),
            MotionTransform::Scale(s) => format!("scale({s})"),
        }
    }
}

/// In-flight style for a widget's current visibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionStyle {
    pub display_none: bool,
    pub opacity: Option<f32>,
    pub pointer_events: Option<PointerEvents>,
    pub transform: Option<MotionTransform>,
    /// CSS `transition` shorthand.
    pub transition: Option<String>,
}

impl TransitionStyle {
    /// Whether the styled element can receive pointer input.
    pub fn accepts_input(&self) -> bool {
        !self.display_none && self.pointer_events != Some(PointerEvents::None)
    }
}

pub fn motion_enabled(config: &VisibilityConfig, prefers_reduced_motion: bool) -> bool {
    config.transition != Transition::None && !(config.reduce_motion && prefers_reduced_motion)
}

pub fn transition_style(
    config: &VisibilityConfig,
    visible: bool,
    prefers_reduced_motion: bool,
) -> TransitionStyle {
    if !motion_enabled(config, prefers_reduced_motion) {
        return if visible {
            TransitionStyle::default()
        } else {
            TransitionStyle {
                display_none: true,
                pointer_events: Some(PointerEvents::None),
                ..TransitionStyle::default()
            }
        };
    }

    let timing = format!("{}ms {}", config.transition_duration, config.easing.css());
    let opacity = Some(if visible { 1.0 } else { 0.0 });
    let pointer_events = Some(if visible {
        PointerEvents::Auto
    } else {
        PointerEvents::None
    });

    let transform = match config.transition {
        Transition::Slide => Some(MotionTransform::TranslateY(if visible {
            0.0
        } else {
            SLIDE_DISTANCE_PX
        })),
        Transition::Scale => Some(MotionTransform::Scale(if visible {
            1.0
        } else {
            HIDDEN_SCALE
        })),
        Transition::Fade | Transition::None => None,
    };

    let transition = if transform.is_some() {
        format!("opacity {timing}, transform {timing}")
    } else {
        format!("opacity {timing}")
    };

    TransitionStyle {
        display_none: false,
        opacity,
        pointer_events,
        transform,
        transition: Some(transition),
    }
}
