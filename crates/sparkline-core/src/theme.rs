// File: crates/sparkline-core/src/theme.rs
// Summary: Color palettes that seed the default chart options.

use skia_safe as skia;

use crate::color::css;

#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub line: skia::Color,
    pub fill: skia::Color,
    pub spot: skia::Color,
    pub highlight_spot: skia::Color,
    pub highlight_line: skia::Color,
    pub normal_range: skia::Color,
    pub bar: skia::Color,
    pub neg_bar: skia::Color,
    pub pos_bar: skia::Color,
    pub zero_bar: skia::Color,
    pub stacked_bars: Vec<skia::Color>,
    pub slices: Vec<skia::Color>,
    pub bullet_ranges: Vec<skia::Color>,
    pub bullet_target: skia::Color,
    pub bullet_performance: skia::Color,
    pub box_line: skia::Color,
    pub box_fill: skia::Color,
    pub whisker: skia::Color,
    pub median: skia::Color,
    pub outlier_line: skia::Color,
    pub outlier_fill: skia::Color,
    pub box_target: skia::Color,
}

impl Theme {
    /// The long-standing sparkline palette (blue lines, light blue fill).
    pub fn classic() -> Self {
        let palette = ["#3366cc", "#dc3912", "#ff9900", "#109618", "#66aa00",
            "#dd4477", "#0099c6", "#990099"];
        Self {
            name: "classic",
            line: css("#00f"),
            fill: css("#cdf"),
            spot: css("#f80"),
            highlight_spot: css("#5f5"),
            highlight_line: css("#f22"),
            normal_range: css("#ccc"),
            bar: css("#3366cc"),
            neg_bar: css("#f44"),
            pos_bar: css("#6f6"),
            zero_bar: css("#999"),
            stacked_bars: palette.iter().map(|c| css(c)).collect(),
            slices: palette.iter().map(|c| css(c)).collect(),
            bullet_ranges: vec![css("#d3dafe"), css("#a8b6ff"), css("#7f94ff")],
            bullet_target: css("#f33"),
            bullet_performance: css("#33f"),
            box_line: css("#000"),
            box_fill: css("#cdf"),
            whisker: css("#000"),
            median: css("#f00"),
            outlier_line: css("#333"),
            outlier_fill: css("#fff"),
            box_target: css("#4a2"),
        }
    }

    /// Light-on-dark variant for dark host pages.
    pub fn dark() -> Self {
        let palette = ["#40a0ff", "#ff6e4a", "#ffc640", "#4ade80", "#a3e635",
            "#f472b6", "#22d3ee", "#c084fc"];
        Self {
            name: "dark",
            line: css("#40a0ff"),
            fill: css("#1e3a5f"),
            spot: css("#ffe646"),
            highlight_spot: css("#4ade80"),
            highlight_line: css("#ff5050"),
            normal_range: css("#3a3a40"),
            bar: css("#609cff"),
            neg_bar: css("#dc5050"),
            pos_bar: css("#28c878"),
            zero_bar: css("#96969f"),
            stacked_bars: palette.iter().map(|c| css(c)).collect(),
            slices: palette.iter().map(|c| css(c)).collect(),
            bullet_ranges: vec![css("#2a2f45"), css("#3b4466"), css("#4f5d8c")],
            bullet_target: css("#ff5050"),
            bullet_performance: css("#40a0ff"),
            box_line: css("#b4b4be"),
            box_fill: css("#1e3a5f"),
            whisker: css("#b4b4be"),
            median: css("#ff5050"),
            outlier_line: css("#d2d2dc"),
            outlier_fill: css("#121214"),
            box_target: css("#28c878"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::classic(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to classic.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::classic)
}
