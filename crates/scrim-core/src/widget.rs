use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::position::Position;
use crate::visibility::VisibilityConfig;

/// Size, opacity, stacking and padding overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
}

impl WidgetStyle {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Configured size, with unset dimensions taken from `fallback`.
    pub fn size_or(&self, fallback: Size) -> Size {
        Size::new(
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        )
    }

    pub fn has_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// An overlay element descriptor. Immutable for a render pass; the compositor
/// derives effective copies with substituted positions instead of mutating it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    /// Registry key for the widget type (badge, button, scrubber, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub style: WidgetStyle,
    /// Higher stays put during collision resolution.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub interactive: bool,
    /// The widget consumes its own input (e.g. a video scrubber), so generic
    /// click/keyboard handling is skipped.
    #[serde(default)]
    pub handles_own_interaction: bool,
}

impl Widget {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            kind: None,
            position,
            visibility: VisibilityConfig::default(),
            style: WidgetStyle::default(),
            priority: 0,
            interactive: false,
            handles_own_interaction: false,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn visibility(mut self, visibility: VisibilityConfig) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn style(mut self, style: WidgetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn handles_own_interaction(mut self, own: bool) -> Self {
        self.handles_own_interaction = own;
        self
    }

    /// Copy of this widget placed at `position`.
    pub fn with_position(&self, position: Position) -> Widget {
        Widget {
            position,
            ..self.clone()
        }
    }
}
