// File: crates/sparkline-core/src/types.rs
// Summary: Shared data types: series values, regions, sizes and tooltip fields.

use std::fmt;
use std::str::FromStr;

use skia_safe as skia;

use crate::error::{Result, SparklineError};

/// Pixels per value for `auto`-width line charts.
pub const DEFAULT_PIXELS_PER_VALUE: u32 = 3;
/// Width used for `auto`-width bullet and box charts (4em at 16px).
pub const DEFAULT_EM_WIDTH: u32 = 64;

/// One element of a series.
#[derive(Clone, Debug, PartialEq)]
pub enum SeriesValue {
    Null,
    Number(f64),
    /// Stacked sub-values (bar) or an `[x, y]` pair (line).
    Stack(Vec<Option<f64>>),
    Point { x: f64, y: f64 },
    /// Raw text such as `"4"`, `"null"`, `"1:2:3"` or `"x:y"`; coerced by the
    /// chart that consumes it.
    Text(String),
}

impl SeriesValue {
    /// Plain numeric view: numbers and numeric text. `None` for nulls.
    pub fn to_number(&self, index: usize) -> Result<Option<f64>> {
        match self {
            SeriesValue::Null => Ok(None),
            SeriesValue::Number(v) => Ok(Some(*v)),
            SeriesValue::Text(s) => parse_number(s, index),
            other => Err(SparklineError::InvalidValue { index, raw: format!("{other:?}") }),
        }
    }

    /// Stack view when the value is an array or `a:b:c` text.
    pub fn to_stack(&self, index: usize) -> Result<Option<Vec<Option<f64>>>> {
        match self {
            SeriesValue::Stack(v) => Ok(Some(v.clone())),
            SeriesValue::Text(s) if s.contains(':') => s
                .split(':')
                .map(|part| parse_number(part, index))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            _ => Ok(None),
        }
    }

    pub fn is_stack(&self) -> bool {
        match self {
            SeriesValue::Stack(_) => true,
            SeriesValue::Text(s) => s.contains(':'),
            _ => false,
        }
    }
}

fn parse_number(s: &str, index: usize) -> Result<Option<f64>> {
    let t = s.trim();
    if t.is_empty() || t == "null" {
        return Ok(None);
    }
    t.parse::<f64>()
        .map(Some)
        .map_err(|_| SparklineError::InvalidValue { index, raw: s.to_string() })
}

impl From<f64> for SeriesValue {
    fn from(v: f64) -> Self { SeriesValue::Number(v) }
}

impl From<i32> for SeriesValue {
    fn from(v: i32) -> Self { SeriesValue::Number(v as f64) }
}

impl From<Option<f64>> for SeriesValue {
    fn from(v: Option<f64>) -> Self { v.map_or(SeriesValue::Null, SeriesValue::Number) }
}

impl From<Vec<Option<f64>>> for SeriesValue {
    fn from(v: Vec<Option<f64>>) -> Self { SeriesValue::Stack(v) }
}

impl From<(f64, f64)> for SeriesValue {
    fn from((x, y): (f64, f64)) -> Self { SeriesValue::Point { x, y } }
}

impl From<&str> for SeriesValue {
    fn from(s: &str) -> Self { SeriesValue::Text(s.to_string()) }
}

/// Convenience: `values(&[1.0, 2.0])`.
pub fn values(raw: &[f64]) -> Vec<SeriesValue> {
    raw.iter().copied().map(SeriesValue::Number).collect()
}

/// Convenience for series with gaps.
pub fn sparse(raw: &[Option<f64>]) -> Vec<SeriesValue> {
    raw.iter().copied().map(SeriesValue::from).collect()
}

/// Parse a comma separated series (`"1,2,null,3:4"`).
pub fn parse_series(s: &str) -> Vec<SeriesValue> {
    s.split(',')
        .map(str::trim)
        .map(|part| {
            if part.is_empty() || part == "null" {
                SeriesValue::Null
            } else if let Ok(v) = part.parse::<f64>() {
                SeriesValue::Number(v)
            } else {
                SeriesValue::Text(part.to_string())
            }
        })
        .collect()
}

/// What the pointer is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Index(usize),
    /// Bullet target marker (value index 0).
    Target,
    /// Bullet performance bar (value index 1).
    Performance,
    /// Bullet background range, by value index (2..).
    Range(usize),
}

impl Region {
    /// Index into the series the region refers to.
    pub fn value_index(&self) -> usize {
        match *self {
            Region::Index(i) | Region::Range(i) => i,
            Region::Target => 0,
            Region::Performance => 1,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Index(i) => write!(f, "{i}"),
            Region::Target => write!(f, "t0"),
            Region::Performance => write!(f, "p1"),
            Region::Range(i) => write!(f, "r{i}"),
        }
    }
}

/// Requested chart size along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Dimension {
    Px(u32),
    #[default]
    Auto,
}

impl Dimension {
    /// Parse `"12"`, `"12px"` or `"auto"`. Anything else (percentages, em
    /// sizes, garbage) resolves against the host box, like `auto`.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        let number = lower.strip_suffix("px").unwrap_or(&lower).trim();
        match number.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Dimension::Px(v.round() as u32),
            _ => Dimension::Auto,
        }
    }

    /// Pixel size, using `host` for `Auto`.
    pub fn resolve(self, host: u32) -> u32 {
        match self {
            Dimension::Px(v) => v,
            Dimension::Auto => host,
        }
    }
}

impl FromStr for Dimension {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Dimension::parse(s))
    }
}

/// Name of a box-plot or bullet statistic in a tooltip field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKey {
    LowerQuartile,
    Median,
    UpperQuartile,
    LowerOutlier,
    UpperOutlier,
    LowerWhisker,
    UpperWhisker,
    Target,
    Performance,
    Range,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::LowerQuartile => "lq",
            FieldKey::Median => "med",
            FieldKey::UpperQuartile => "uq",
            FieldKey::LowerOutlier => "lo",
            FieldKey::UpperOutlier => "ro",
            FieldKey::LowerWhisker => "lw",
            FieldKey::UpperWhisker => "rw",
            FieldKey::Target => "t",
            FieldKey::Performance => "p",
            FieldKey::Range => "r",
        }
    }
}

/// Data handed to a tooltip formatter for the active region. Charts fill the
/// members that make sense for them and leave the rest unset.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RegionField {
    pub is_null: bool,
    pub offset: Option<usize>,
    pub value: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<skia::Color>,
    pub fill_color: Option<skia::Color>,
    pub percent: Option<f64>,
    pub key: Option<FieldKey>,
    pub region: Option<Region>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_parsing() {
        assert_eq!(Dimension::parse("40px"), Dimension::Px(40));
        assert_eq!(Dimension::parse(" 12 "), Dimension::Px(12));
        assert_eq!(Dimension::parse("auto"), Dimension::Auto);
        assert_eq!(Dimension::parse("50%"), Dimension::Auto);
        assert_eq!(Dimension::parse("1.5em").resolve(20), 20);
    }

    #[test]
    fn stack_text_expands() {
        let v = SeriesValue::from("1:null:-2");
        assert_eq!(v.to_stack(0).unwrap(), Some(vec![Some(1.0), None, Some(-2.0)]));
        assert!(SeriesValue::from("x").to_number(3).is_err());
        assert_eq!(SeriesValue::from("null").to_number(0).unwrap(), None);
    }

    #[test]
    fn series_parsing() {
        let s = parse_series("1, null,2:3");
        assert_eq!(s[0], SeriesValue::Number(1.0));
        assert_eq!(s[1], SeriesValue::Null);
        assert!(s[2].is_stack());
    }

    #[test]
    fn region_display() {
        assert_eq!(Region::Range(3).to_string(), "r3");
        assert_eq!(Region::Performance.to_string(), "p1");
        assert_eq!(Region::Index(4).value_index(), 4);
    }
}
