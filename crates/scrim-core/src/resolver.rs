//! Priority-greedy collision resolution.
//!
//! Widgets are visited from highest to lowest priority (stable for ties).
//! Each one keeps its nominal spot if that is free; otherwise it tries the
//! adjacent anchors with the same offset, then its own anchor with the offset
//! grown through the ladder. If nothing is free it stays where it was.
//! Both candidate lists are finite, so a pass always terminates.
//!
//! Only anchor widgets move. Absolute widgets hold their ground and block
//! others; region widgets take no part at all.

use std::cmp::Reverse;
use std::collections::HashMap;

use smallvec::SmallVec;

use crate::collision::{BoundsMap, Collision, detect_collisions};
use crate::geometry::{Rect, Size};
use crate::position::{Position, nominal_rect};
use crate::widget::Widget;

pub const DEFAULT_OFFSET_LADDER: [f32; 4] = [16.0, 32.0, 48.0, 64.0];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionResult {
    pub has_collisions: bool,
    /// Overlaps among the input bounds, before any adjustment.
    pub collisions: Vec<Collision>,
    /// Replacement positions for widgets that were moved.
    pub adjusted_positions: HashMap<String, Position>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollisionResolver {
    ladder: SmallVec<[f32; 4]>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self {
            ladder: SmallVec::from_buf(DEFAULT_OFFSET_LADDER),
        }
    }

    /// Steps that are not finite and positive are dropped.
    pub fn with_offset_ladder(steps: impl IntoIterator<Item = f32>) -> Self {
        let ladder = steps
            .into_iter()
            .filter(|s| {
                let ok = s.is_finite() && *s > 0.0;
                if !ok {
                    log::warn!("resolver: ignoring offset step {s}");
                }
                ok
            })
            .collect();
        Self { ladder }
    }

    pub fn offset_ladder(&self) -> &[f32] {
        &self.ladder
    }

    pub fn resolve(&self, widgets: &[Widget], bounds: &BoundsMap, container: Size) -> CollisionResult {
        let collisions = detect_collisions(widgets, bounds);
        if collisions.is_empty() {
            return CollisionResult::default();
        }

        let mut order: Vec<&Widget> = widgets.iter().collect();
        order.sort_by_key(|w| Reverse(w.priority));

        let mut occupied: Vec<Rect> = Vec::with_capacity(order.len());
        let mut adjusted = HashMap::new();

        for widget in order {
            let Some(current) = bounds.get(&widget.id) else {
                log::trace!("resolver: `{}` has no bounds, skipping", widget.id);
                continue;
            };
            match widget.position {
                Position::Region { .. } => continue,
                Position::Absolute { .. } => {
                    occupied.push(current.rect);
                    continue;
                }
                Position::Anchor { .. } => {}
            }

            if !collides(&current.rect, &occupied) {
                occupied.push(current.rect);
                continue;
            }

            match self.relocate(&widget.position, current.rect.size(), container, &occupied) {
                Some((position, rect)) => {
                    log::debug!("resolver: moved `{}` to {:?}", widget.id, position);
                    adjusted.insert(widget.id.clone(), position);
                    occupied.push(rect);
                }
                None => {
                    log::debug!("resolver: no free spot for `{}`, leaving it", widget.id);
                    occupied.push(current.rect);
                }
            }
        }

        CollisionResult {
            has_collisions: true,
            collisions,
            adjusted_positions: adjusted,
        }
    }

    fn relocate(
        &self,
        position: &Position,
        size: Size,
        container: Size,
        occupied: &[Rect],
    ) -> Option<(Position, Rect)> {
        let Position::Anchor {
            anchor,
            offset,
            order,
        } = *position
        else {
            return None;
        };

        let by_anchor = anchor.adjacent().into_iter().map(move |a| Position::Anchor {
            anchor: a,
            offset,
            order,
        });
        let by_offset = self.ladder.iter().map(move |step| Position::Anchor {
            anchor,
            offset: offset.grow(*step),
            order,
        });

        by_anchor
            .chain(by_offset)
            .map(|p| (p, nominal_rect(&p, container, size)))
            .find(|(_, rect)| !collides(rect, occupied))
    }
}

fn collides(rect: &Rect, occupied: &[Rect]) -> bool {
    occupied.iter().any(|o| rect.overlaps(o))
}
