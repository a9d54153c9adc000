//! # Overlay compositor
//!
//! Drives a set of [`scrim_core::Widget`]s on one overlay surface:
//!
//! - tracks container and widget interaction through explicit
//!   [`OverlayEvent`]s and feeds each widget's trigger into its
//!   [`scrim_core::VisibilityStateMachine`];
//! - runs one collision pass after each widget-list change, either after a
//!   settle delay or when the host reports committed layout, and substitutes
//!   the adjusted positions into what gets rendered;
//! - dispatches clicks and Enter/Space to `on_widget_click` for interactive
//!   widgets that do not handle their own input.
//!
//! ```rust
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use scrim_compositor::*;
//! use scrim_core::*;
//!
//! let clock = Arc::new(ManualClock::new());
//! let timers = Timers::new(clock.clone());
//! let mut overlay: OverlayCompositor = OverlayCompositor::new(
//!     Rc::new(WidgetRegistry::new()),
//!     Rc::new(HeadlessPlatform::desktop()),
//!     timers,
//!     CollisionSettings::default(),
//! );
//! overlay.set_widgets(vec![
//!     Widget::new("live", Position::anchor(Anchor::TopRight)).priority(1),
//!     Widget::new("viewers", Position::anchor(Anchor::TopRight)),
//! ]);
//!
//! let layout = MeasureSnapshot::new(Rect::new(0.0, 0.0, 640.0, 360.0));
//! clock.advance(Duration::from_millis(100));
//! assert!(overlay.tick(&layout));
//!
//! let frame = overlay.frame();
//! assert_eq!(frame[1].widget.position.anchor_point(), Some(Anchor::TopCenter));
//! ```

pub mod compositor;
pub mod events;
pub mod measure;
pub mod registry;
pub mod style;

pub use compositor::{ClickHandler, OverlayCompositor, WidgetFrame};
pub use events::{InteractionTracker, Key, OverlayEvent};
pub use measure::{Measure, MeasureSnapshot};
pub use registry::{WidgetDefinition, WidgetRegistry};
pub use style::RenderStyle;
