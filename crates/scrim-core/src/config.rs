//! Overlay configuration as loaded from JSON presets.
//!
//! ```json
//! {
//!   "widgets": [
//!     { "id": "live", "position": { "mode": "anchor", "anchor": "top-right",
//!                                   "offset": { "x": 8, "y": "8px" } },
//!       "priority": 5 },
//!     { "id": "controls", "position": { "mode": "region", "region": "bottom" },
//!       "visibility": { "trigger": "hover-container", "transition": "slide" } }
//!   ],
//!   "collision": { "offsetLadder": [16, 32, 48, 64],
//!                  "settle": { "strategy": "delay", "ms": 100 } }
//! }
//! ```

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Size;
use crate::resolver::{CollisionResolver, DEFAULT_OFFSET_LADDER};
use crate::visibility::Trigger;
use crate::widget::Widget;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;
pub const DEFAULT_WIDGET_SIZE: Size = Size::new(32.0, 32.0);

/// When the compositor runs a collision pass after the widget list changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum SettleStrategy {
    /// Wait a fixed time for layout to settle.
    Delay { ms: u64 },
    /// Wait for the host to report that layout has been committed.
    LayoutCommit,
}

impl Default for SettleStrategy {
    fn default() -> Self {
        SettleStrategy::Delay {
            ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl SettleStrategy {
    pub fn delay(&self) -> Option<Duration> {
        match self {
            SettleStrategy::Delay { ms } => Some(Duration::from_millis(*ms)),
            SettleStrategy::LayoutCommit => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollisionSettings {
    pub enabled: bool,
    pub offset_ladder: Vec<f32>,
    /// Estimated size for widgets that are neither measured nor sized.
    pub default_widget_size: Size,
    pub settle: SettleStrategy,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            offset_ladder: DEFAULT_OFFSET_LADDER.to_vec(),
            default_widget_size: DEFAULT_WIDGET_SIZE,
            settle: SettleStrategy::default(),
        }
    }
}

impl CollisionSettings {
    pub fn resolver(&self) -> CollisionResolver {
        CollisionResolver::with_offset_ladder(self.offset_ladder.iter().copied())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub collision: CollisionSettings,
}

impl OverlayConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: OverlayConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject what the runtime cannot express; warn about what it will
    /// silently treat as hidden.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(step) = self
            .collision
            .offset_ladder
            .iter()
            .copied()
            .find(|s| !(s.is_finite() && *s > 0.0))
        {
            return Err(ConfigError::InvalidOffsetStep(step));
        }

        let fallback = self.collision.default_widget_size;
        if !fallback.is_valid() {
            return Err(ConfigError::InvalidWidgetSize {
                widget: "<default>".to_string(),
                width: fallback.width,
                height: fallback.height,
            });
        }

        let mut seen = HashSet::new();
        for widget in &self.widgets {
            if !seen.insert(widget.id.as_str()) {
                return Err(ConfigError::DuplicateWidgetId(widget.id.clone()));
            }

            let triggers = std::iter::once(&widget.visibility.trigger)
                .chain(widget.visibility.touch_fallback.as_ref());
            for trigger in triggers {
                match trigger {
                    Trigger::Condition { condition } if condition.trim().is_empty() => {
                        return Err(ConfigError::EmptyCondition {
                            widget: widget.id.clone(),
                        });
                    }
                    Trigger::Unrecognized(name) => {
                        log::warn!(
                            "widget `{}`: unrecognized trigger `{name}`, it will never show",
                            widget.id
                        );
                    }
                    _ => {}
                }
            }

            if widget.style.has_size() {
                let size = widget.style.size_or(fallback);
                if !size.is_valid() {
                    return Err(ConfigError::InvalidWidgetSize {
                        widget: widget.id.clone(),
                        width: size.width,
                        height: size.height,
                    });
                }
            }
        }
        Ok(())
    }
}
