//! Widget kinds known to a compositor.
//!
//! A registry is built by the host and handed to each compositor, so two
//! overlays on one page can disagree about what a "badge" is.

use std::collections::HashMap;

use scrim_core::{Size, Widget};

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetDefinition {
    pub kind: String,
    /// Size used for bound estimation when the widget sets none.
    pub default_size: Option<Size>,
    pub interactive: bool,
    pub handles_own_interaction: bool,
}

impl WidgetDefinition {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            default_size: None,
            interactive: false,
            handles_own_interaction: false,
        }
    }

    pub fn default_size(mut self, width: f32, height: f32) -> Self {
        self.default_size = Some(Size::new(width, height));
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
}

#[derive(Clone, Debug, Default)]
pub struct WidgetRegistry {
    definitions: HashMap<String, WidgetDefinition>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`WidgetRegistry::register`].
    pub fn with(mut self, definition: WidgetDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Returns the definition previously registered under the same kind.
    pub fn register(&mut self, definition: WidgetDefinition) -> Option<WidgetDefinition> {
        let previous = self
            .definitions
            .insert(definition.kind.clone(), definition);
        if let Some(prev) = &previous {
            log::warn!("registry: widget kind `{}` registered twice", prev.kind);
        }
        previous
    }

    pub fn get(&self, kind: &str) -> Option<&WidgetDefinition> {
        self.definitions.get(kind)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definition_for(&self, widget: &Widget) -> Option<&WidgetDefinition> {
        widget.kind.as_deref().and_then(|k| self.get(k))
    }

    /// Widget style, then the kind's default, then `fallback`, per dimension.
    pub fn estimated_size(&self, widget: &Widget, fallback: Size) -> Size {
        let base = self
            .definition_for(widget)
            .and_then(|d| d.default_size)
            .unwrap_or(fallback);
        widget.style.size_or(base)
    }

    pub fn is_interactive(&self, widget: &Widget) -> bool {
        widget.interactive || self.definition_for(widget).is_some_and(|d| d.interactive)
    }

    pub fn handles_own_interaction(&self, widget: &Widget) -> bool {
        widget.handles_own_interaction
            || self
                .definition_for(widget)
                .is_some_and(|d| d.handles_own_interaction)
    }

    /// Whether generic click and keyboard activation applies to `widget`.
    pub fn accepts_generic_input(&self, widget: &Widget) -> bool {
        self.is_interactive(widget) && !self.handles_own_interaction(widget)
    }
}
