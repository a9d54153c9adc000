use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Strict separating-axis test. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect {
            x,
            y,
            w: self.right().min(other.right()) - x,
            h: self.bottom().min(other.bottom()) - y,
        })
    }
}

/// A CSS length of the form `calc(<percent>% + <px>px)`.
///
/// Plain pixel and plain percentage lengths are the special cases where the
/// other term is zero. Percentages resolve against the container dimension on
/// the same axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub struct Length {
    pub px: f32,
    pub percent: f32,
}

impl Length {
    pub const ZERO: Length = Length::px(0.0);

    pub const fn px(px: f32) -> Self {
        Self { px, percent: 0.0 }
    }

    pub const fn percent(percent: f32) -> Self {
        Self { px: 0.0, percent }
    }

    pub fn is_zero(&self) -> bool {
        self.px == 0.0 && self.percent == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.px.is_finite() && self.percent.is_finite()
    }

    /// Pixel value of this length against `basis` (the container extent).
    pub fn resolve(&self, basis: f32) -> f32 {
        self.px + self.percent * basis / 100.0
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length {
            px: self.px + rhs.px,
            percent: self.percent + rhs.percent,
        }
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        self + (-rhs)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length {
            px: -self.px,
            percent: -self.percent,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `+ 0.0` folds -0.0 so we never print "-0px"
        let px = self.px + 0.0;
        let percent = self.percent + 0.0;
        if percent == 0.0 {
            write!(f, "{px}px")
        } else if px == 0.0 {
            write!(f, "{percent}%")
        } else if px < 0.0 {
            write!(f, "calc({percent}% - {}px)", -px)
        } else {
            write!(f, "calc({percent}% + {px}px)")
        }
    }
}

impl FromStr for Length {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidLength(s.to_string());
        let number = |v: &str| v.trim().parse::<f32>().ok().filter(|v| v.is_finite());

        if let Some(inner) = s.strip_prefix("calc(").and_then(|r| r.strip_suffix(')')) {
            if let Some((lhs, rhs)) = inner.split_once(" + ") {
                return Ok(lhs.parse::<Length>()? + rhs.parse::<Length>()?);
            }
            if let Some((lhs, rhs)) = inner.split_once(" - ") {
                return Ok(lhs.parse::<Length>()? - rhs.parse::<Length>()?);
            }
            return Err(invalid());
        }

        if let Some(v) = s.strip_suffix('%') {
            number(v).map(Length::percent).ok_or_else(invalid)
        } else if let Some(v) = s.strip_suffix("px") {
            number(v).map(Length::px).ok_or_else(invalid)
        } else {
            number(s).map(Length::px).ok_or_else(invalid)
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f32),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = ConfigError;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Number(px) if px.is_finite() => Ok(Length::px(px)),
            LengthRepr::Number(px) => Err(ConfigError::InvalidLength(px.to_string())),
            LengthRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(len: Length) -> Self {
        if len.percent == 0.0 {
            LengthRepr::Number(len.px)
        } else {
            LengthRepr::Text(len.to_string())
        }
    }
}

/// Displacement of a widget from its anchor or region edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offset {
    pub x: Length,
    pub y: Length,
}

impl Offset {
    pub const ZERO: Offset = Offset {
        x: Length::ZERO,
        y: Length::ZERO,
    };

    pub const fn px(x: f32, y: f32) -> Self {
        Self {
            x: Length::px(x),
            y: Length::px(y),
        }
    }

    /// Grow both axes by `step` pixels.
    pub fn grow(self, step: f32) -> Offset {
        Offset {
            x: self.x + Length::px(step),
            y: self.y + Length::px(step),
        }
    }
}
