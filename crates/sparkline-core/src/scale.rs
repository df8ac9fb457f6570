// File: crates/sparkline-core/src/scale.rs
// Summary: Value ranges and the value-to-pixel transforms charts lay out with.

use crate::geometry::{max_of, min_of, round_px};

/// Value-space bounds used for scaling. `min <= max` is expected; a zero
/// span is tolerated and reported as 1 by [`Range::span`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds of the given values, `None` when empty.
    pub fn from_values(values: impl IntoIterator<Item = f64> + Clone) -> Option<Self> {
        Some(Self { min: min_of(values.clone())?, max: max_of(values)? })
    }

    /// `max - min`, or 1 when the range is degenerate.
    #[inline]
    pub fn span(&self) -> f64 {
        let s = self.max - self.min;
        if s == 0.0 { 1.0 } else { s }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Fraction of the way from `min` to `max` (unclamped).
    #[inline]
    pub fn fraction(&self, v: f64) -> f64 {
        (v - self.min) / self.span()
    }

    /// Widen to include `v`.
    pub fn include(&mut self, v: f64) {
        if v < self.min { self.min = v; }
        if v > self.max { self.max = v; }
    }

    /// Apply explicit chart-range options: a bound replaces the data bound when
    /// clipping is on or when it widens the range.
    pub fn apply_overrides(&mut self, min: Option<f64>, max: Option<f64>, clip: bool) {
        if let Some(m) = min {
            if clip || m < self.min { self.min = m; }
        }
        if let Some(m) = max {
            if clip || m > self.max { self.max = m; }
        }
    }
}

/// Clamp `v` into `[min, max]`.
#[inline]
pub fn clip_value(v: f64, min: f64, max: f64) -> f64 {
    if v < min { min } else if v > max { max } else { v }
}

/// Vertical value scale mapping a range onto `[top, top + height]` pixels,
/// larger values higher up.
#[derive(Clone, Copy, Debug)]
pub struct ValueScale {
    pub top_px: f64,
    pub height_px: f64,
    pub range: Range,
}

impl ValueScale {
    pub fn new(top_px: f64, height_px: f64, range: Range) -> Self {
        Self { top_px, height_px, range }
    }

    #[inline]
    pub fn to_px(&self, y: f64) -> f64 {
        self.top_px + round_px(self.height_px - self.height_px * self.range.fraction(y))
    }

    #[inline]
    pub fn bottom_px(&self) -> f64 {
        self.top_px + self.height_px
    }
}

/// Horizontal scale mapping a range onto `[left, left + width]` pixels.
#[derive(Clone, Copy, Debug)]
pub struct PositionScale {
    pub left_px: f64,
    pub width_px: f64,
    pub range: Range,
}

impl PositionScale {
    pub fn new(left_px: f64, width_px: f64, range: Range) -> Self {
        Self { left_px, width_px, range }
    }

    #[inline]
    pub fn to_px(&self, x: f64) -> f64 {
        self.left_px + round_px((x - self.range.min) * (self.width_px / self.range.span()))
    }
}
