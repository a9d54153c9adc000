//! # Positioning
//!
//! A widget's placement is declared as a [`Position`]:
//!
//! - `anchor`: one of nine grid points on the container plus an offset.
//! - `region`: an edge band (toolbars, chrome); exempt from collision
//!   resolution.
//! - `absolute`: explicit container-space coordinates.
//!
//! [`resolve`] turns a position into CSS-style [`Insets`]; [`nominal_rect`]
//! computes the pixel rectangle the same insets describe, for bound
//! estimation and collision candidates.
//!
//! Offsets always move a widget *inward* from the edge it is attached to:
//! `bottom-right` with offset `{x: 8, y: 8}` becomes `right: 8px; bottom: 8px`.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::{Length, Offset, Rect, Size, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Which side of an axis an anchor attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// top / left
    Start,
    Center,
    /// bottom / right
    End,
}

impl Edge {
    fn from_index(i: u8) -> Edge {
        match i {
            0 => Edge::Start,
            1 => Edge::Center,
            _ => Edge::End,
        }
    }

    /// Pixel coordinate of a box of `size` placed on this edge of `extent`.
    fn place(self, offset: f32, extent: f32, size: f32) -> f32 {
        match self {
            Edge::Start => offset,
            Edge::Center => extent / 2.0 + offset - size / 2.0,
            Edge::End => extent - size - offset,
        }
    }
}

// Edge-sharing neighbours first (same row, then same column), then corners.
const NEIGHBOURS: [(i8, i8); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

impl Anchor {
    /// Row-major, top-left first.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// `(row, column)` in the 3×3 grid.
    pub const fn grid(self) -> (u8, u8) {
        let i = self as u8;
        (i / 3, i % 3)
    }

    pub fn from_grid(row: u8, col: u8) -> Option<Anchor> {
        if row < 3 && col < 3 {
            Some(Self::ALL[(row * 3 + col) as usize])
        } else {
            None
        }
    }

    pub fn vertical(self) -> Edge {
        Edge::from_index(self.grid().0)
    }

    pub fn horizontal(self) -> Edge {
        Edge::from_index(self.grid().1)
    }

    /// Anchors that share an edge or a corner with this one in the grid.
    pub fn adjacent(self) -> SmallVec<[Anchor; 8]> {
        let (row, col) = self.grid();
        NEIGHBOURS
            .iter()
            .filter_map(|(dr, dc)| {
                let r = row as i8 + dr;
                let c = col as i8 + dc;
                if (0..3).contains(&r) && (0..3).contains(&c) {
                    Anchor::from_grid(r as u8, c as u8)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopCenter => "top-center",
            Anchor::TopRight => "top-right",
            Anchor::CenterLeft => "center-left",
            Anchor::Center => "center",
            Anchor::CenterRight => "center-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomCenter => "bottom-center",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Top,
    Bottom,
    Left,
    Right,
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Position {
    Anchor {
        anchor: Anchor,
        #[serde(default)]
        offset: Offset,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
    },
    Region {
        region: Region,
        #[serde(default)]
        offset: Offset,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
    },
    Absolute {
        x: Length,
        y: Length,
    },
}

impl Position {
    pub fn anchor(anchor: Anchor) -> Self {
        Position::Anchor {
            anchor,
            offset: Offset::ZERO,
            order: None,
        }
    }

    pub fn region(region: Region) -> Self {
        Position::Region {
            region,
            offset: Offset::ZERO,
            order: None,
        }
    }

    pub fn absolute(x: f32, y: f32) -> Self {
        Position::Absolute {
            x: Length::px(x),
            y: Length::px(y),
        }
    }

    /// Replace the offset. Absolute positions carry their own coordinates and
    /// are returned unchanged.
    pub fn with_offset(self, new_offset: Offset) -> Self {
        match self {
            Position::Anchor { anchor, order, .. } => Position::Anchor {
                anchor,
                offset: new_offset,
                order,
            },
            Position::Region { region, order, .. } => Position::Region {
                region,
                offset: new_offset,
                order,
            },
            abs @ Position::Absolute { .. } => abs,
        }
    }

    pub fn with_order(self, new_order: i32) -> Self {
        match self {
            Position::Anchor { anchor, offset, .. } => Position::Anchor {
                anchor,
                offset,
                order: Some(new_order),
            },
            Position::Region { region, offset, .. } => Position::Region {
                region,
                offset,
                order: Some(new_order),
            },
            abs @ Position::Absolute { .. } => abs,
        }
    }

    pub fn anchor_point(&self) -> Option<Anchor> {
        match self {
            Position::Anchor { anchor, .. } => Some(*anchor),
            _ => None,
        }
    }

    pub fn offset(&self) -> Option<Offset> {
        match self {
            Position::Anchor { offset, .. } | Position::Region { offset, .. } => Some(*offset),
            Position::Absolute { .. } => None,
        }
    }

    /// Stacking order within a shared anchor or region.
    pub fn order(&self) -> Option<i32> {
        match self {
            Position::Anchor { order, .. } | Position::Region { order, .. } => *order,
            Position::Absolute { .. } => None,
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Position::Anchor { .. })
    }
}

/// CSS-style placement of an absolutely positioned box.
///
/// `shift` is a self-relative translation in percent of the box's own size;
/// center anchors use `-50` on their centered axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
    pub shift: Vec2,
}

impl Insets {
    /// `(property, value)` pairs in `top, right, bottom, left` order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v.to_string())))
        .collect()
    }

    /// `translate(..)` for the centering shift, if any.
    pub fn shift_transform(&self) -> Option<String> {
        if self.shift == Vec2::default() {
            None
        } else {
            Some(format!("translate({}%, {}%)", self.shift.x, self.shift.y))
        }
    }
}

/// Convert a declarative position into CSS insets.
pub fn resolve(position: &Position) -> Insets {
    let mut insets = Insets::default();
    match *position {
        Position::Anchor { anchor, offset, .. } => {
            let half = Length::percent(50.0);
            match anchor.vertical() {
                Edge::Start => insets.top = Some(offset.y),
                Edge::End => insets.bottom = Some(offset.y),
                Edge::Center => {
                    insets.top = Some(half + offset.y);
                    insets.shift.y = -50.0;
                }
            }
            match anchor.horizontal() {
                Edge::Start => insets.left = Some(offset.x),
                Edge::End => insets.right = Some(offset.x),
                Edge::Center => {
                    insets.left = Some(half + offset.x);
                    insets.shift.x = -50.0;
                }
            }
        }
        Position::Region { region, offset, .. } => match region {
            Region::Top => {
                insets.top = Some(offset.y);
                insets.left = Some(offset.x);
                insets.right = Some(Length::ZERO);
            }
            Region::Bottom => {
                insets.bottom = Some(offset.y);
                insets.left = Some(offset.x);
                insets.right = Some(Length::ZERO);
            }
            Region::Left => {
                insets.left = Some(offset.x);
                insets.top = Some(offset.y);
                insets.bottom = Some(Length::ZERO);
            }
            Region::Right => {
                insets.right = Some(offset.x);
                insets.top = Some(offset.y);
                insets.bottom = Some(Length::ZERO);
            }
            Region::Overlay => {
                insets.top = Some(offset.y);
                insets.left = Some(offset.x);
                insets.right = Some(Length::ZERO);
                insets.bottom = Some(Length::ZERO);
            }
        },
        Position::Absolute { x, y } => {
            insets.left = Some(x);
            insets.top = Some(y);
        }
    }
    insets
}

/// Container-local pixel rectangle that `position` places a box of `size` at.
///
/// Region bands stretch along their edge, so the band's long side comes from
/// the container rather than `size`.
pub fn nominal_rect(position: &Position, container: Size, size: Size) -> Rect {
    let (cw, ch) = (container.width, container.height);
    let (w, h) = (size.width, size.height);
    match *position {
        Position::Anchor { anchor, offset, .. } => {
            let x = anchor.horizontal().place(offset.x.resolve(cw), cw, w);
            let y = anchor.vertical().place(offset.y.resolve(ch), ch, h);
            Rect::new(x, y, w, h)
        }
        Position::Region { region, offset, .. } => {
            let ox = offset.x.resolve(cw);
            let oy = offset.y.resolve(ch);
            let band_w = (cw - ox).max(0.0);
            let band_h = (ch - oy).max(0.0);
            match region {
                Region::Top => Rect::new(ox, oy, band_w, h),
                Region::Bottom => Rect::new(ox, ch - h - oy, band_w, h),
                Region::Left => Rect::new(ox, oy, w, band_h),
                Region::Right => Rect::new(cw - w - ox, oy, w, band_h),
                Region::Overlay => Rect::new(ox, oy, band_w, band_h),
            }
        }
        Position::Absolute { x, y } => Rect::new(x.resolve(cw), y.resolve(ch), w, h),
    }
}
