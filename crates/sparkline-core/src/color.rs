// File: crates/sparkline-core/src/color.rs
// Summary: CSS color parsing into Skia colors and highlight lightening.

use skia_safe as skia;

use crate::error::{Result, SparklineError};
use crate::geometry::{clamp, round_px};

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` or a basic
/// color name.
pub fn parse_color(s: &str) -> Result<skia::Color> {
    parse(s).ok_or_else(|| SparklineError::InvalidColor(s.to_string()))
}

/// Parse a color literal known at compile time. Falls back to black; only
/// used for built-in palettes.
pub(crate) fn css(s: &str) -> skia::Color {
    parse(s).unwrap_or(skia::Color::BLACK)
}

fn parse(s: &str) -> Option<skia::Color> {
    let s = s.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        let channel = |i: usize, w: usize| -> Option<u8> {
            let raw = hex.get(i..i + w)?;
            let v = u8::from_str_radix(raw, 16).ok()?;
            Some(if w == 1 { v * 17 } else { v })
        };
        return match hex.len() {
            3 => Some(skia::Color::from_rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Some(skia::Color::from_rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            8 => Some(skia::Color::from_argb(channel(6, 2)?, channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            _ => None,
        };
    }

    if s.starts_with("rgb") {
        let inner = s
            .trim_start_matches("rgba(")
            .trim_start_matches("rgb(")
            .trim_end_matches(')');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let r: u8 = parts[0].parse().ok()?;
        let g: u8 = parts[1].parse().ok()?;
        let b: u8 = parts[2].parse().ok()?;
        let a: f64 = match parts.get(3) {
            Some(p) => p.parse().ok()?,
            None => 1.0,
        };
        let a = round_px(clamp(a, 0.0, 1.0) * 255.0) as u8;
        return Some(skia::Color::from_argb(a, r, g, b));
    }

    match s.as_str() {
        "black" => Some(skia::Color::from_rgb(0, 0, 0)),
        "white" => Some(skia::Color::from_rgb(255, 255, 255)),
        "red" => Some(skia::Color::from_rgb(255, 0, 0)),
        "green" => Some(skia::Color::from_rgb(0, 128, 0)),
        "blue" => Some(skia::Color::from_rgb(0, 0, 255)),
        "gray" | "grey" => Some(skia::Color::from_rgb(128, 128, 128)),
        "orange" => Some(skia::Color::from_rgb(255, 165, 0)),
        "transparent" => Some(skia::Color::TRANSPARENT),
        _ => None,
    }
}

/// Multiply each RGB channel by `factor`, clipping to 255. Alpha is kept.
pub fn lighten(color: skia::Color, factor: f32) -> skia::Color {
    let scale = |c: u8| clamp(round_px(c as f64 * factor as f64), 0.0, 255.0) as u8;
    skia::Color::from_argb(color.a(), scale(color.r()), scale(color.g()), scale(color.b()))
}

/// `#rrggbb` form, with alpha appended when not opaque.
pub fn to_hex(color: skia::Color) -> String {
    if color.a() == 255 {
        format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", color.r(), color.g(), color.b(), color.a())
    }
}
