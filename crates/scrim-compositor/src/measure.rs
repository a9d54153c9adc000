use std::collections::HashMap;

use scrim_core::Rect;

/// Read access to laid-out element rectangles.
///
/// All rects share one coordinate space (page space in a browser host); the
/// compositor converts widget rects to container-local coordinates itself.
/// `None` means "not laid out yet" and falls back to estimation.
pub trait Measure {
    fn container_rect(&self) -> Option<Rect>;
    fn widget_rect(&self, id: &str) -> Option<Rect>;
}

/// A fixed set of measurements, for headless hosts and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureSnapshot {
    pub container: Option<Rect>,
    pub widgets: HashMap<String, Rect>,
}

impl MeasureSnapshot {
    pub fn new(container: Rect) -> Self {
        Self {
            container: Some(container),
            widgets: HashMap::new(),
        }
    }

    pub fn with_widget(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.widgets.insert(id.into(), rect);
        self
    }

    pub fn set_widget(&mut self, id: impl Into<String>, rect: Rect) {
        self.widgets.insert(id.into(), rect);
    }

    pub fn remove_widget(&mut self, id: &str) -> Option<Rect> {
        self.widgets.remove(id)
    }
}

impl Measure for MeasureSnapshot {
    fn container_rect(&self) -> Option<Rect> {
        self.container
    }

    fn widget_rect(&self, id: &str) -> Option<Rect> {
        self.widgets.get(id).copied()
    }
}
