// File: crates/sparkline-core/src/chart/colorline.rs
// Summary: Color line: a bar chart collapsed into adjacent full-height
// strips, one per value, colored by value.

use skia_safe as skia;

use crate::canvas::VCanvas;
use crate::chart::{render_with_highlight_diff, ChartBase, RegionRenderer};
use crate::error::{Result, SparklineError};
use crate::geometry::round_px;
use crate::gradient::GradientSampler;
use crate::options::ColorLineOptions;
use crate::scale::{clip_value, Range};
use crate::shape::{Shape, ShapeId};
use crate::types::{Region, RegionField, SeriesValue};

pub struct ColorLineChart {
    base: ChartBase,
    options: ColorLineOptions,
    values: Vec<Option<f64>>,
    range: Range,
    /// Resolved plain color per value; `None` paints nothing.
    colors: Vec<Option<skia::Color>>,
    /// Left edge and width of each strip.
    strips: Vec<(f64, f64)>,
    region_shapes: Vec<Vec<ShapeId>>,
}

impl ColorLineChart {
    /// Fails on stacked input, which a single strip cannot show.
    pub fn new(values: &[SeriesValue], options: ColorLineOptions, canvas: &VCanvas) -> Result<Self> {
        let base = ChartBase::new(canvas, options.common.clone());
        if let Some(index) = values.iter().position(SeriesValue::is_stack) {
            return Err(SparklineError::StackedNotSupported { chart: "colorline", index });
        }
        let common = &options.common;
        let mut values = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_number(i))
            .collect::<Result<Vec<_>>>()?;

        let mut range = Range::from_values(values.iter().flatten().copied()).unwrap_or(Range::new(0.0, 0.0));
        range.apply_overrides(common.chart_range_min, common.chart_range_max, common.chart_range_clip);
        if common.chart_range_clip {
            for v in values.iter_mut().flatten() {
                *v = clip_value(*v, range.min, range.max);
            }
        }

        let colors = {
            let sampler = options.gradient.as_deref().map(GradientSampler::raster);
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| match v {
                    None => options.null_color,
                    Some(v) => Some(match &sampler {
                        Some(s) => s.color_at(v),
                        None => strip_color(&options, i, v),
                    }),
                })
                .collect()
        };

        let count = values.len();
        let width = base.width;
        let strips = (0..count)
            .map(|i| {
                let left = round_px(i as f64 * width / count as f64);
                let right = round_px((i + 1) as f64 * width / count as f64);
                (left, right - left)
            })
            .collect();

        Ok(Self { base, options, values, range, colors, strips, region_shapes: Vec::new() })
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Left edge and width of every strip.
    pub fn strips(&self) -> &[(f64, f64)] {
        &self.strips
    }

    pub fn color(&self, index: usize) -> Option<skia::Color> {
        self.colors.get(index).copied().flatten()
    }
}

/// Color map by value, then by index, then the sign colors.
fn strip_color(options: &ColorLineOptions, index: usize, value: f64) -> skia::Color {
    let map = &options.common.color_map;
    if let Some(c) = map.value_entry(value) {
        return c;
    }
    if let Some(Some(c)) = map.index_entry(index) {
        return c;
    }
    match options.zero_color {
        Some(zero) if value == 0.0 => zero,
        _ if value < 0.0 => options.neg_bar_color,
        _ => options.bar_color,
    }
}

impl RegionRenderer for ColorLineChart {
    fn kind(&self) -> &'static str {
        "colorline"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, _canvas: &mut VCanvas, x: f64, _y: f64) -> Option<Region> {
        self.strips
            .iter()
            .position(|&(left, width)| x >= left && x < left + width)
            .map(Region::Index)
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let Some(Region::Index(i)) = self.base.current_region else {
            return Vec::new();
        };
        let value = self.values.get(i).copied().flatten();
        vec![RegionField {
            is_null: value.is_none(),
            value,
            color: self.color(i),
            offset: Some(i),
            region: self.base.current_region,
            ..RegionField::default()
        }]
    }

    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape> {
        let i = region.value_index();
        let (Some(color), Some(&(x, width))) = (self.color(i), self.strips.get(i)) else {
            return Vec::new();
        };
        if width < 1.0 {
            return Vec::new();
        }
        let color = self.base.maybe_highlight(color, highlight);
        vec![canvas.draw_rect(x, 0.0, width - 1.0, self.base.height - 1.0, Some(color.into()), Some(color.into()))]
    }

    fn change_highlight(&mut self, canvas: &mut VCanvas, highlight: bool) {
        let Some(region) = self.base.current_region else {
            return;
        };
        let mut shapes = std::mem::take(&mut self.region_shapes);
        render_with_highlight_diff(canvas, &mut shapes, self.values.len(), Some((region.value_index(), highlight)), |c, i, h| {
            self.render_region(c, Region::Index(i), h)
        });
        self.region_shapes = shapes;
    }

    fn render(&mut self, canvas: &mut VCanvas) -> bool {
        if !self.base.begin_render("colorline") {
            return false;
        }
        let mut shapes = std::mem::take(&mut self.region_shapes);
        render_with_highlight_diff(canvas, &mut shapes, self.values.len(), None, |c, i, h| {
            self.render_region(c, Region::Index(i), h)
        });
        self.region_shapes = shapes;
        true
    }
}
