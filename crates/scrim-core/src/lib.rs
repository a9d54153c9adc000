//! # Overlay core
//!
//! Scrim composes small floating widgets (badges, buttons, scrubbers) on top
//! of media. This crate holds the parts that do not need a DOM:
//!
//! - `position`: anchor / region / absolute placement to CSS insets.
//! - `visibility`: trigger evaluation, transition styles, touch adaptation.
//! - `state_machine`: timed show/hide per widget.
//! - `collision` and `resolver`: overlap detection and priority-greedy
//!   repositioning.
//! - `time` and `platform`: the clock, timer queue and capability queries the
//!   above are driven by.
//!
//! ## Resolving collisions
//!
//! ```rust
//! use scrim_core::*;
//!
//! let container = Size::new(640.0, 360.0);
//! let widgets = vec![
//!     Widget::new("live", Position::anchor(Anchor::TopRight)).priority(5),
//!     Widget::new("viewers", Position::anchor(Anchor::TopRight)),
//! ];
//! let bounds: BoundsMap = widgets
//!     .iter()
//!     .map(|w| {
//!         let rect = nominal_rect(&w.position, container, DEFAULT_WIDGET_SIZE);
//!         (w.id.clone(), WidgetBounds::new(w.id.clone(), rect))
//!     })
//!     .collect();
//!
//! let result = CollisionResolver::new().resolve(&widgets, &bounds, container);
//! assert!(result.has_collisions);
//! assert!(!result.adjusted_positions.contains_key("live"));
//! assert_eq!(
//!     result.adjusted_positions["viewers"].anchor_point(),
//!     Some(Anchor::TopCenter)
//! );
//! ```
//!
//! ## Timers
//!
//! There is no background thread. Delays are scheduled on a [`Timers`] queue
//! and fire when the host calls [`Timers::run_due`] from its event loop, so
//! tests can drive everything with a [`ManualClock`].
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use scrim_core::*;
//!
//! let clock = Arc::new(ManualClock::new());
//! let timers = Timers::new(clock.clone());
//! let machine = VisibilityStateMachine::new(timers.clone(), Duration::from_millis(150));
//!
//! machine.show();
//! assert_eq!(machine.state(), VisibilityState::PendingShow);
//! clock.advance(Duration::from_millis(150));
//! timers.run_due();
//! assert_eq!(machine.state(), VisibilityState::Visible);
//! ```

pub mod collision;
pub mod config;
pub mod dispose;
pub mod error;
pub mod geometry;
pub mod platform;
pub mod position;
pub mod resolver;
pub mod state_machine;
pub mod tests;
pub mod time;
pub mod visibility;
pub mod widget;

pub use collision::{
    BoundsMap, Collision, Overlap, WidgetBounds, bounds_overlap, calculate_overlap,
    detect_collisions,
};
pub use config::{
    CollisionSettings, DEFAULT_SETTLE_DELAY_MS, DEFAULT_WIDGET_SIZE, OverlayConfig,
    SettleStrategy,
};
pub use dispose::Dispose;
pub use error::ConfigError;
pub use geometry::{Length, Offset, Rect, Size, Vec2};
pub use platform::{HeadlessPlatform, Platform};
pub use position::{Anchor, Edge, Insets, Position, Region, nominal_rect, resolve};
pub use resolver::{CollisionResolver, CollisionResult, DEFAULT_OFFSET_LADDER};
pub use state_machine::{VisibilityState, VisibilityStateMachine};
pub use time::{Clock, ManualClock, SystemClock, TimerId, Timers};
pub use visibility::{
    Easing, Interaction, InteractionState, MotionTransform, NamedTrigger, PointerEvents,
    Transition, TransitionStyle, Trigger, VisibilityConfig, adapt_for_touch, should_show,
    transition_style,
};
pub use widget::{Widget, WidgetStyle};
