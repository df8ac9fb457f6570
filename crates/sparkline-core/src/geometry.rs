// File: crates/sparkline-core/src/geometry.rs
// Summary: Lightweight helpers for pixel math.

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Round half up (`-2.5 -> -2`, `2.5 -> 3`). Layout math depends on this
/// rather than `f64::round`, which rounds half away from zero.
#[inline]
pub fn round_px(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Minimum of the finite values, `None` when there are none.
pub fn min_of(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    })
}

/// Maximum of the finite values, `None` when there are none.
pub fn max_of(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}
