//! Axis-aligned overlap detection between overlay widgets.

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::widget::Widget;

/// Container-local bounds of one widget, measured or estimated.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetBounds {
    pub id: String,
    pub rect: Rect,
}

impl WidgetBounds {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }
}

pub type BoundsMap = HashMap<String, WidgetBounds>;

/// Extent of an overlap: `x`/`y` are the overlapping width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Overlap {
    pub x: f32,
    pub y: f32,
    pub area: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    pub widget1_id: String,
    pub widget2_id: String,
    pub overlap: Overlap,
}

/// Touching edges do not count.
pub fn bounds_overlap(a: &WidgetBounds, b: &WidgetBounds) -> bool {
    a.rect.overlaps(&b.rect)
}

pub fn calculate_overlap(a: &WidgetBounds, b: &WidgetBounds) -> Overlap {
    a.rect
        .intersection(&b.rect)
        .map(|r| Overlap {
            x: r.w,
            y: r.h,
            area: r.w * r.h,
        })
        .unwrap_or_default()
}

/// Every overlapping pair, in widget order. Widgets without bounds are skipped.
pub fn detect_collisions(widgets: &[Widget], bounds: &BoundsMap) -> Vec<Collision> {
    let placed: Vec<&WidgetBounds> = widgets.iter().filter_map(|w| bounds.get(&w.id)).collect();

    let mut collisions = Vec::new();
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if bounds_overlap(a, b) {
                collisions.push(Collision {
                    widget1_id: a.id.clone(),
                    widget2_id: b.id.clone(),
                    overlap: calculate_overlap(a, b),
                });
            }
        }
    }
    collisions
}
