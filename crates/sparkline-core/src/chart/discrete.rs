// File: crates/sparkline-core/src/chart/discrete.rs
// Summary: Discrete tick strip: one short vertical line per value at a
// height proportional to the value.

use skia_safe as skia;

use crate::canvas::VCanvas;
use crate::chart::{render_with_highlight_diff, ChartBase, RegionRenderer};
use crate::error::Result;
use crate::geometry::round_px;
use crate::options::DiscreteOptions;
use crate::scale::{clip_value, Range};
use crate::shape::{Shape, ShapeId};
use crate::types::{Region, RegionField, SeriesValue};

pub struct DiscreteChart {
    base: ChartBase,
    options: DiscreteOptions,
    values: Vec<Option<f64>>,
    range: Range,
    /// Whole-pixel step between ticks.
    interval: f64,
    /// Exact width per value, used for hit testing.
    item_width: f64,
    line_height: f64,
    region_shapes: Vec<Vec<ShapeId>>,
}

impl DiscreteChart {
    pub fn new(values: &[SeriesValue], options: DiscreteOptions, canvas: &VCanvas) -> Result<Self> {
        let base = ChartBase::new(canvas, options.common.clone());
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_number(i))
            .collect::<Result<Vec<_>>>()?;
        let common = &options.common;
        let mut range = Range::from_values(values.iter().flatten().copied()).unwrap_or(Range::new(0.0, 0.0));
        range.apply_overrides(common.chart_range_min, common.chart_range_max, common.chart_range_clip);

        let count = values.len().max(1) as f64;
        let interval = (base.width / count).floor();
        let item_width = base.width / count;
        let line_height = match options.line_height {
            Some(h) => h as f64,
            None => round_px(base.height * 0.3),
        };
        Ok(Self { base, options, values, range, interval, item_width, line_height, region_shapes: Vec::new() })
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    fn tick_color(&self, value: f64) -> skia::Color {
        match self.options.threshold_color {
            Some(c) if value < self.options.threshold_value => c,
            _ => self.options.line_color,
        }
    }
}

/// Auto width for discrete strips: two pixels per value.
pub fn auto_width(count: usize) -> u32 {
    count as u32 * 2
}

impl RegionRenderer for DiscreteChart {
    fn kind(&self) -> &'static str {
        "discrete"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, _canvas: &mut VCanvas, x: f64, _y: f64) -> Option<Region> {
        if self.item_width <= 0.0 {
            return None;
        }
        let index = (x / self.item_width).floor();
        (index >= 0.0 && (index as usize) < self.values.len()).then(|| Region::Index(index as usize))
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let Some(Region::Index(i)) = self.base.current_region else {
            return Vec::new();
        };
        let value = self.values.get(i).copied().flatten();
        vec![RegionField {
            is_null: value.is_none(),
            value,
            color: value.map(|v| self.tick_color(v)),
            offset: Some(i),
            region: self.base.current_region,
            ..RegionField::default()
        }]
    }

    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape> {
        let i = region.value_index();
        let Some(Some(value)) = self.values.get(i).copied() else {
            return Vec::new();
        };
        let value = clip_value(value, self.range.min, self.range.max);
        let plot_height = self.base.height - self.line_height;
        let ytop = round_px(plot_height - plot_height * self.range.fraction(value));
        let x = i as f64 * self.interval;
        let color = self.base.maybe_highlight(self.tick_color(value), highlight);
        vec![canvas.draw_line(x, ytop, x, ytop + self.line_height, color, 1.0)]
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
        if !self.base.begin_render("discrete") {
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
