// File: crates/sparkline-core/src/options.rs
// Summary: Typed, fully merged chart options with theme-seeded defaults.

use std::rc::Rc;

use skia_safe as skia;

use crate::gradient::GradientSpec;
use crate::range_map::{ColorMap, RangeMap};
use crate::theme::Theme;
use crate::types::Dimension;

/// Options every chart type understands.
#[derive(Clone, Debug, PartialEq)]
pub struct CommonOptions {
    pub width: Dimension,
    pub height: Dimension,
    pub chart_range_min: Option<f64>,
    pub chart_range_max: Option<f64>,
    /// Clamp values into the chart range instead of only widening it.
    pub chart_range_clip: bool,
    pub color_map: ColorMap,
    pub disable_highlight: bool,
    /// Build a non-interactive backend: shapes are dropped after painting.
    pub disable_interaction: bool,
    pub highlight_color: Option<skia::Color>,
    /// Channel multiplier used when `highlight_color` is unset.
    pub highlight_lighten: f32,
    pub tooltip_skip_null: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            width: Dimension::Auto,
            height: Dimension::Auto,
            chart_range_min: None,
            chart_range_max: None,
            chart_range_clip: false,
            color_map: ColorMap::default(),
            disable_highlight: false,
            disable_interaction: false,
            highlight_color: None,
            highlight_lighten: 1.4,
            tooltip_skip_null: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineOptions {
    pub common: CommonOptions,
    pub line_color: skia::Color,
    pub fill_color: Option<skia::Color>,
    /// Replaces `line_color` with a value-aligned gradient.
    pub line_gradient: Option<Rc<GradientSpec>>,
    /// Replaces `fill_color` with a value-aligned gradient.
    pub fill_gradient: Option<Rc<GradientSpec>>,
    pub line_width: f64,
    pub spot_color: Option<skia::Color>,
    pub min_spot_color: Option<skia::Color>,
    pub max_spot_color: Option<skia::Color>,
    pub highlight_spot_color: Option<skia::Color>,
    pub highlight_line_color: Option<skia::Color>,
    pub spot_radius: f64,
    /// Per-value spot colors drawn on every matching vertex.
    pub value_spots: Option<RangeMap>,
    pub normal_range_min: Option<f64>,
    pub normal_range_max: Option<f64>,
    pub normal_range_color: skia::Color,
    pub draw_normal_on_top: bool,
    pub x_values: Option<Vec<f64>>,
    pub chart_range_min_x: Option<f64>,
    pub chart_range_max_x: Option<f64>,
    pub chart_range_clip_x: bool,
}

impl LineOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            line_color: theme.line,
            fill_color: Some(theme.fill),
            line_gradient: None,
            fill_gradient: None,
            line_width: 1.0,
            spot_color: Some(theme.spot),
            min_spot_color: Some(theme.spot),
            max_spot_color: Some(theme.spot),
            highlight_spot_color: Some(theme.highlight_spot),
            highlight_line_color: Some(theme.highlight_line),
            spot_radius: 1.5,
            value_spots: None,
            normal_range_min: None,
            normal_range_max: None,
            normal_range_color: theme.normal_range,
            draw_normal_on_top: false,
            x_values: None,
            chart_range_min_x: None,
            chart_range_max_x: None,
            chart_range_clip_x: false,
        }
    }
}

impl Default for LineOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarOptions {
    pub common: CommonOptions,
    pub bar_color: skia::Color,
    pub neg_bar_color: skia::Color,
    /// Palette cycled through stack segments.
    pub stacked_bar_colors: Vec<skia::Color>,
    pub zero_color: Option<skia::Color>,
    /// Draws a flat marker for null values when set.
    pub null_color: Option<skia::Color>,
    pub zero_axis: bool,
    pub bar_width: u32,
    pub bar_spacing: u32,
    /// Per-bar widths; the last entry repeats for longer series.
    pub bar_widths: Option<Vec<u32>>,
}

impl BarOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            bar_color: theme.bar,
            neg_bar_color: theme.neg_bar,
            stacked_bar_colors: theme.stacked_bars.clone(),
            zero_color: None,
            null_color: None,
            zero_axis: true,
            bar_width: 4,
            bar_spacing: 1,
            bar_widths: None,
        }
    }
}

impl Default for BarOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorLineOptions {
    pub common: CommonOptions,
    /// Strip colors sampled from this ramp at each value when set.
    pub gradient: Option<Rc<GradientSpec>>,
    pub bar_color: skia::Color,
    pub neg_bar_color: skia::Color,
    pub zero_color: Option<skia::Color>,
    pub null_color: Option<skia::Color>,
}

impl ColorLineOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            gradient: None,
            bar_color: theme.bar,
            neg_bar_color: theme.neg_bar,
            zero_color: None,
            null_color: None,
        }
    }
}

impl Default for ColorLineOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TriStateOptions {
    pub common: CommonOptions,
    pub pos_bar_color: skia::Color,
    pub neg_bar_color: skia::Color,
    pub zero_bar_color: skia::Color,
    pub bar_width: u32,
    pub bar_spacing: u32,
}

impl TriStateOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            pos_bar_color: theme.pos_bar,
            neg_bar_color: theme.neg_bar,
            zero_bar_color: theme.zero_bar,
            bar_width: 4,
            bar_spacing: 1,
        }
    }
}

impl Default for TriStateOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteOptions {
    pub common: CommonOptions,
    pub line_color: skia::Color,
    /// Tick length; 30% of the height when unset.
    pub line_height: Option<u32>,
    pub threshold_value: f64,
    /// Color of ticks below `threshold_value`; no threshold when unset.
    pub threshold_color: Option<skia::Color>,
}

impl DiscreteOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            line_color: theme.line,
            line_height: None,
            threshold_value: 0.0,
            threshold_color: None,
        }
    }
}

impl Default for DiscreteOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BulletOptions {
    pub common: CommonOptions,
    pub target_color: skia::Color,
    pub target_width: u32,
    pub performance_color: skia::Color,
    /// Cycled across the background ranges.
    pub range_colors: Vec<skia::Color>,
    /// Left edge value; defaults to `min(data, 0)`.
    pub base: Option<f64>,
}

impl BulletOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            target_color: theme.bullet_target,
            target_width: 3,
            performance_color: theme.bullet_performance,
            range_colors: theme.bullet_ranges.clone(),
            base: None,
        }
    }
}

impl Default for BulletOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PieOptions {
    pub common: CommonOptions,
    pub slice_colors: Vec<skia::Color>,
    /// Rotation of the first slice, in degrees clockwise from 3 o'clock.
    pub offset: f64,
    pub border_width: f64,
    pub border_color: skia::Color,
}

impl PieOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            slice_colors: theme.slices.clone(),
            offset: 0.0,
            border_width: 0.0,
            border_color: theme.box_line,
        }
    }
}

impl Default for PieOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoxOptions {
    pub common: CommonOptions,
    /// Values are precomputed statistics rather than samples.
    pub raw: bool,
    pub box_line_color: skia::Color,
    pub box_fill_color: skia::Color,
    pub whisker_color: skia::Color,
    pub outlier_line_color: skia::Color,
    pub outlier_fill_color: skia::Color,
    pub median_color: skia::Color,
    pub show_outliers: bool,
    /// Whisker reach in multiples of the interquartile range.
    pub outlier_iqr: f64,
    pub spot_radius: f64,
    pub target: Option<f64>,
    pub target_color: skia::Color,
}

impl BoxOptions {
    pub fn themed(theme: &Theme) -> Self {
        Self {
            common: CommonOptions::default(),
            raw: false,
            box_line_color: theme.box_line,
            box_fill_color: theme.box_fill,
            whisker_color: theme.whisker,
            outlier_line_color: theme.outlier_line,
            outlier_fill_color: theme.outlier_fill,
            median_color: theme.median,
            show_outliers: true,
            outlier_iqr: 1.5,
            spot_radius: 1.5,
            target: None,
            target_color: theme.box_target,
        }
    }
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self::themed(&Theme::classic())
    }
}

/// Chart type plus its options.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartOptions {
    Line(LineOptions),
    Bar(BarOptions),
    ColorLine(ColorLineOptions),
    TriState(TriStateOptions),
    Discrete(DiscreteOptions),
    Bullet(BulletOptions),
    Pie(PieOptions),
    Box(BoxOptions),
}

impl ChartOptions {
    pub fn common(&self) -> &CommonOptions {
        match self {
            ChartOptions::Line(o) => &o.common,
            ChartOptions::Bar(o) => &o.common,
            ChartOptions::ColorLine(o) => &o.common,
            ChartOptions::TriState(o) => &o.common,
            ChartOptions::Discrete(o) => &o.common,
            ChartOptions::Bullet(o) => &o.common,
            ChartOptions::Pie(o) => &o.common,
            ChartOptions::Box(o) => &o.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonOptions {
        match self {
            ChartOptions::Line(o) => &mut o.common,
            ChartOptions::Bar(o) => &mut o.common,
            ChartOptions::ColorLine(o) => &mut o.common,
            ChartOptions::TriState(o) => &mut o.common,
            ChartOptions::Discrete(o) => &mut o.common,
            ChartOptions::Bullet(o) => &mut o.common,
            ChartOptions::Pie(o) => &mut o.common,
            ChartOptions::Box(o) => &mut o.common,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChartOptions::Line(_) => "line",
            ChartOptions::Bar(_) => "bar",
            ChartOptions::ColorLine(_) => "colorline",
            ChartOptions::TriState(_) => "tristate",
            ChartOptions::Discrete(_) => "discrete",
            ChartOptions::Bullet(_) => "bullet",
            ChartOptions::Pie(_) => "pie",
            ChartOptions::Box(_) => "box",
        }
    }

    /// Default options for a chart type by name, using `theme` colors.
    pub fn for_kind(kind: &str, theme: &Theme) -> Option<Self> {
        Some(match kind.to_ascii_lowercase().as_str() {
            "line" => ChartOptions::Line(LineOptions::themed(theme)),
            "bar" => ChartOptions::Bar(BarOptions::themed(theme)),
            "colorline" => ChartOptions::ColorLine(ColorLineOptions::themed(theme)),
            "tristate" => ChartOptions::TriState(TriStateOptions::themed(theme)),
            "discrete" => ChartOptions::Discrete(DiscreteOptions::themed(theme)),
            "bullet" => ChartOptions::Bullet(BulletOptions::themed(theme)),
            "pie" => ChartOptions::Pie(PieOptions::themed(theme)),
            "box" => ChartOptions::Box(BoxOptions::themed(theme)),
            _ => return None,
        })
    }
}
