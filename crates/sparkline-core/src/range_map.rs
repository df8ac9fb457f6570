// File: crates/sparkline-core/src/range_map.rs
// Summary: Value-to-color lookup tables (exact values and inclusive ranges).

use skia_safe as skia;

use crate::error::{Result, SparklineError};

/// Maps values to colors. Keys are either exact (`"3"`) or inclusive ranges
/// (`"1:5"`, `":0"` for up to zero, `"10:"` for ten and above). Exact keys
/// win; among ranges the most recently inserted match wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeMap {
    exact: Vec<(f64, skia::Color)>,
    ranges: Vec<(f64, f64, skia::Color)>,
}

impl RangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry from its textual key.
    pub fn insert(&mut self, key: &str, color: skia::Color) -> Result<()> {
        let bad = || SparklineError::InvalidRangeKey(key.to_string());
        match key.split_once(':') {
            Some((lo, hi)) => {
                let lo = lo.trim();
                let hi = hi.trim();
                let lo = if lo.is_empty() { f64::NEG_INFINITY } else { lo.parse().map_err(|_| bad())? };
                let hi = if hi.is_empty() { f64::INFINITY } else { hi.parse().map_err(|_| bad())? };
                self.ranges.push((lo, hi, color));
            }
            None => {
                let v: f64 = key.trim().parse().map_err(|_| bad())?;
                self.exact.push((v, color));
            }
        }
        Ok(())
    }

    /// Builder form of [`RangeMap::insert`].
    pub fn with(mut self, key: &str, color: skia::Color) -> Result<Self> {
        self.insert(key, color)?;
        Ok(self)
    }

    pub fn get(&self, value: f64) -> Option<skia::Color> {
        if let Some(&(_, c)) = self.exact.iter().find(|(v, _)| *v == value) {
            return Some(c);
        }
        self.ranges
            .iter()
            .rev()
            .find(|(lo, hi, _)| *lo <= value && *hi >= value)
            .map(|&(_, _, c)| c)
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.ranges.is_empty()
    }
}

/// Color overrides for bar-like charts. A by-index entry applies when the
/// list is long enough; `None` entries mean "draw nothing" for tri-state and
/// "no override" elsewhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    pub by_index: Option<Vec<Option<skia::Color>>>,
    pub by_value: Option<RangeMap>,
}

impl ColorMap {
    pub fn by_index(colors: Vec<Option<skia::Color>>) -> Self {
        Self { by_index: Some(colors), by_value: None }
    }

    pub fn by_value(map: RangeMap) -> Self {
        Self { by_index: None, by_value: Some(map) }
    }

    /// Entry for a given index, if the index map covers it.
    pub fn index_entry(&self, index: usize) -> Option<Option<skia::Color>> {
        self.by_index.as_ref().and_then(|m| m.get(index).copied())
    }

    pub fn value_entry(&self, value: f64) -> Option<skia::Color> {
        self.by_value.as_ref().and_then(|m| m.get(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(v: u8) -> skia::Color {
        skia::Color::from_rgb(v, v, v)
    }

    #[test]
    fn exact_beats_range() {
        let m = RangeMap::new().with("1:5", c(1)).unwrap().with("3", c(3)).unwrap();
        assert_eq!(m.get(3.0), Some(c(3)));
        assert_eq!(m.get(4.0), Some(c(1)));
        assert_eq!(m.get(6.0), None);
    }

    #[test]
    fn open_ended_ranges() {
        let m = RangeMap::new().with(":0", c(1)).unwrap().with("10:", c(2)).unwrap();
        assert_eq!(m.get(-100.0), Some(c(1)));
        assert_eq!(m.get(0.0), Some(c(1)));
        assert_eq!(m.get(1e9), Some(c(2)));
        assert_eq!(m.get(5.0), None);
    }

    #[test]
    fn later_ranges_win() {
        let m = RangeMap::new().with("0:10", c(1)).unwrap().with("5:10", c(2)).unwrap();
        assert_eq!(m.get(7.0), Some(c(2)));
        assert_eq!(m.get(2.0), Some(c(1)));
    }

    #[test]
    fn bad_keys_rejected() {
        assert!(RangeMap::new().insert("a:b", c(0)).is_err());
        assert!(RangeMap::new().insert("x", c(0)).is_err());
    }

    #[test]
    fn index_entries() {
        let m = ColorMap::by_index(vec![Some(c(1)), None]);
        assert_eq!(m.index_entry(0), Some(Some(c(1))));
        assert_eq!(m.index_entry(1), Some(None));
        assert_eq!(m.index_entry(2), None);
    }
}
