// File: crates/sparkline-core/src/chart/bar.rs
// Summary: Bar sparkline with stacked, mixed-sign and zero-axis handling.
//
// Heights are measured from the axis offset: zero when the data straddles
// zero, else the nearest data bound. Stacks accumulate positive segments
// upward and negative segments downward from the same offset.

use skia_safe as skia;

use crate::canvas::VCanvas;
use crate::chart::{render_with_highlight_diff, ChartBase, RegionRenderer};
use crate::error::Result;
use crate::geometry::{max_of, min_of};
use crate::options::BarOptions;
use crate::scale::clip_value;
use crate::shape::{Shape, ShapeId};
use crate::types::{Region, RegionField, SeriesValue};

pub struct BarChart {
    base: ChartBase,
    options: BarOptions,
    /// Sub-values per index; a single entry when not stacked.
    values: Vec<Vec<Option<f64>>>,
    stacked: bool,
    min: f64,
    max: f64,
    xaxis_offset: f64,
    range: f64,
    canvas_height_ef: f64,
    yoffset: f64,
    /// Left edge and width of each bar.
    slots: Vec<(f64, f64)>,
    region_shapes: Vec<Vec<ShapeId>>,
}

impl BarChart {
    pub fn new(values: &[SeriesValue], options: BarOptions, canvas: &VCanvas) -> Result<Self> {
        let base = ChartBase::new(canvas, options.common.clone());
        let common = &options.common;

        let stacked = values.iter().any(SeriesValue::is_stack);
        let mut raw: Vec<Vec<Option<f64>>> = Vec::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            let entry = match v.to_stack(i)? {
                Some(stack) => stack,
                None if stacked && *v == SeriesValue::Null => Vec::new(),
                None => vec![v.to_number(i)?],
            };
            raw.push(entry);
        }

        // Stack bounds come from the unclipped sub-values.
        let all = || raw.iter().flatten().flatten().copied();
        let stack_min = if stacked { min_of(all()).unwrap_or(0.0) } else { 0.0 };
        let stack_max = if stacked { max_of(all()).unwrap_or(0.0) } else { 0.0 };

        let clip = |v: Option<f64>| match (v, common.chart_range_clip) {
            (Some(v), true) => Some(clip_value(
                v,
                common.chart_range_min.unwrap_or(f64::NEG_INFINITY),
                common.chart_range_max.unwrap_or(f64::INFINITY),
            )),
            (v, _) => v,
        };
        let values: Vec<Vec<Option<f64>>> =
            raw.into_iter().map(|stack| stack.into_iter().map(clip).collect()).collect();

        let mixed = stack_min < 0.0 && stack_max > 0.0;
        let mut stack_ranges = Vec::with_capacity(values.len());
        let mut stack_ranges_neg = Vec::with_capacity(values.len());
        let mut stack_totals = Vec::with_capacity(values.len());
        for stack in &values {
            let (mut pos, mut neg, mut total) = (0.0, 0.0, 0.0);
            for v in stack.iter().flatten().copied() {
                if v > 0.0 {
                    total += v;
                }
                if mixed {
                    if v < 0.0 { neg += v.abs() } else { pos += v }
                } else {
                    pos += (v - if v < 0.0 { stack_max } else { stack_min }).abs();
                }
            }
            stack_ranges.push(pos);
            stack_ranges_neg.push(neg);
            stack_totals.push(total);
        }

        let data = || values.iter().flatten().flatten().copied();
        let data_max = max_of(data()).unwrap_or(0.0);
        let data_min = min_of(data()).unwrap_or(0.0);
        let stack_total_max = if stacked { max_of(stack_totals.iter().copied()).unwrap_or(0.0) } else { data_max };

        let mut min = data_min;
        let mut max = data_max;
        if let Some(m) = common.chart_range_min {
            if common.chart_range_clip || m < min { min = m; }
        }
        if let Some(m) = common.chart_range_max {
            if common.chart_range_clip || m > max { max = m; }
        }

        let zero_axis = options.zero_axis;
        let xaxis_offset = if min <= 0.0 && max >= 0.0 && zero_axis {
            0.0
        } else if !zero_axis || min > 0.0 {
            min
        } else {
            max
        };

        let range = if stacked {
            max_of(stack_ranges.iter().copied()).unwrap_or(0.0) + max_of(stack_ranges_neg.iter().copied()).unwrap_or(0.0)
        } else {
            max - min
        };

        let canvas_height = base.height;
        let mut canvas_height_ef = if zero_axis && min < 0.0 { canvas_height - 2.0 } else { canvas_height - 1.0 };
        let yoffset = if min < xaxis_offset && range > 0.0 {
            let top = if stacked && max >= 0.0 { stack_total_max } else { max };
            let exact = (top - xaxis_offset) / range * canvas_height;
            if exact != exact.ceil() {
                canvas_height_ef -= 2.0;
            }
            exact.ceil()
        } else {
            canvas_height
        };

        let slots = bar_slots(values.len(), &options);
        tracing::debug!(bars = values.len(), stacked, xaxis_offset, range, "bar chart laid out");

        Ok(Self {
            base,
            options,
            values,
            stacked,
            min,
            max,
            xaxis_offset,
            range,
            canvas_height_ef,
            yoffset,
            slots,
            region_shapes: Vec::new(),
        })
    }

    pub fn is_stacked(&self) -> bool {
        self.stacked
    }

    /// Baseline value bar heights are measured from.
    pub fn xaxis_offset(&self) -> f64 {
        self.xaxis_offset
    }

    /// Pixel row of the axis offset.
    pub fn yoffset(&self) -> f64 {
        self.yoffset
    }

    /// Value span mapped onto `canvas_height_ef` pixels.
    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn canvas_height_ef(&self) -> f64 {
        self.canvas_height_ef
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    /// Shape ids per region as of the last render.
    pub fn region_shape_ids(&self) -> &[Vec<ShapeId>] {
        &self.region_shapes
    }

    fn calc_color(&self, stack_index: usize, value: Option<f64>, value_index: usize) -> skia::Color {
        let o = &self.options;
        let mut color = if self.stacked {
            let palette = &o.stacked_bar_colors;
            if palette.is_empty() { o.bar_color } else { palette[stack_index % palette.len()] }
        } else if value.is_some_and(|v| v < 0.0) {
            o.neg_bar_color
        } else {
            o.bar_color
        };
        if value == Some(0.0) {
            if let Some(zero) = o.zero_color {
                color = zero;
            }
        }
        let map = &o.common.color_map;
        if let Some(mapped) = value.and_then(|v| map.value_entry(v)) {
            color = mapped;
        } else if let Some(Some(mapped)) = map.index_entry(value_index) {
            color = mapped;
        }
        color
    }
}

/// Left edge and width of every bar, honoring per-bar widths.
fn bar_slots(count: usize, options: &BarOptions) -> Vec<(f64, f64)> {
    let spacing = options.bar_spacing as f64;
    let mut x = 0.0;
    (0..count)
        .map(|i| {
            let width = match options.bar_widths.as_deref() {
                Some(widths) if !widths.is_empty() => widths[i.min(widths.len() - 1)],
                _ => options.bar_width,
            } as f64;
            let slot = (x, width);
            x += width + spacing;
            slot
        })
        .collect()
}

/// Auto width: every bar plus the spacing between them.
pub fn auto_width(count: usize, options: &BarOptions) -> u32 {
    match bar_slots(count, options).last() {
        Some(&(x, w)) => (x + w) as u32,
        None => 0,
    }
}

impl RegionRenderer for BarChart {
    fn kind(&self) -> &'static str {
        "bar"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, _canvas: &mut VCanvas, x: f64, _y: f64) -> Option<Region> {
        let spacing = self.options.bar_spacing as f64;
        self.slots
            .iter()
            .position(|&(left, width)| x >= left && x < left + width + spacing)
            .map(Region::Index)
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let Some(Region::Index(index)) = self.base.current_region else {
            return Vec::new();
        };
        let Some(stack) = self.values.get(index) else {
            return Vec::new();
        };
        let stack: &[Option<f64>] = if stack.is_empty() { &[None] } else { stack };
        stack
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &value)| RegionField {
                is_null: value.is_none(),
                value,
                color: Some(self.calc_color(i, value, index)),
                offset: Some(index),
                region: self.base.current_region,
                ..RegionField::default()
            })
            .collect()
    }

    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape> {
        let index = region.value_index();
        let (Some(stack), Some(&(x, bar_width))) = (self.values.get(index), self.slots.get(index)) else {
            return Vec::new();
        };
        let mut yoffset = self.yoffset;

        if stack.iter().all(Option::is_none) {
            let Some(null_color) = self.options.null_color else {
                return Vec::new();
            };
            let color = self.base.maybe_highlight(null_color, highlight);
            let y = if yoffset > 0.0 { yoffset - 1.0 } else { yoffset };
            return vec![canvas.draw_rect(x, y, bar_width - 1.0, 0.0, Some(color.into()), Some(color.into()))];
        }

        let offset = self.xaxis_offset;
        let all_min = stack.iter().flatten().all(|&v| v == offset);
        let mut min_plotted = false;
        let mut yoffset_neg = yoffset;
        let mut shapes = Vec::with_capacity(stack.len());
        for (i, value) in stack.iter().enumerate() {
            let Some(val) = *value else { continue };
            if self.stacked && val == offset {
                if !all_min || min_plotted {
                    continue;
                }
                min_plotted = true;
            }
            let height = if self.range > 0.0 {
                (self.canvas_height_ef * ((val - offset).abs() / self.range)).floor() + 1.0
            } else {
                1.0
            };
            let y = if val < offset || (val == offset && yoffset == 0.0) {
                let y = yoffset_neg;
                yoffset_neg += height;
                y
            } else {
                yoffset -= height;
                yoffset
            };
            let color = self.base.maybe_highlight(self.calc_color(i, Some(val), index), highlight);
            shapes.push(canvas.draw_rect(x, y, bar_width - 1.0, height - 1.0, Some(color.into()), Some(color.into())));
        }
        shapes
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
        if !self.base.begin_render("bar") {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_series, values};

    #[test]
    fn all_positive_uses_min_as_offset() {
        let canvas = VCanvas::new(20, 10, 1.0, true);
        let c = BarChart::new(&values(&[1.0, 2.0, 3.0]), BarOptions::default(), &canvas).unwrap();
        assert_eq!(c.xaxis_offset(), 1.0);
        assert_eq!(c.yoffset(), 10.0);
        assert_eq!(c.range(), 2.0);
    }

    #[test]
    fn all_negative_uses_max_as_offset() {
        let canvas = VCanvas::new(20, 10, 1.0, true);
        let c = BarChart::new(&values(&[-1.0, -2.0, -3.0]), BarOptions::default(), &canvas).unwrap();
        assert_eq!(c.xaxis_offset(), -1.0);
    }

    #[test]
    fn zero_axis_off_measures_from_min() {
        let canvas = VCanvas::new(20, 10, 1.0, true);
        let opts = BarOptions { zero_axis: false, ..BarOptions::default() };
        let c = BarChart::new(&values(&[-2.0, 1.0, 3.0]), opts, &canvas).unwrap();
        assert_eq!(c.xaxis_offset(), -2.0);
        assert_eq!(c.canvas_height_ef(), 9.0);
        let opts = BarOptions { zero_axis: false, ..BarOptions::default() };
        let c = BarChart::new(&values(&[-3.0, -1.0]), opts, &canvas).unwrap();
        assert_eq!(c.xaxis_offset(), -3.0);
    }

    #[test]
    fn stack_text_detected() {
        let canvas = VCanvas::new(20, 10, 1.0, true);
        let c = BarChart::new(&parse_series("1:2,3:-1"), BarOptions::default(), &canvas).unwrap();
        assert!(c.is_stacked());
        // Positive segments reach 3, negative ones 1.
        assert_eq!(c.range(), 4.0);
    }

    #[test]
    fn variable_widths_drive_regions() {
        let mut canvas = VCanvas::new(30, 10, 1.0, true);
        let opts = BarOptions { bar_widths: Some(vec![2, 8]), ..BarOptions::default() };
        assert_eq!(auto_width(3, &opts), 2 + 1 + 8 + 1 + 8);
        let c = BarChart::new(&values(&[1.0, 2.0, 3.0]), opts, &canvas).unwrap();
        assert_eq!(c.region_at(&mut canvas, 1.0, 0.0), Some(Region::Index(0)));
        assert_eq!(c.region_at(&mut canvas, 3.0, 0.0), Some(Region::Index(1)));
        assert_eq!(c.region_at(&mut canvas, 12.0, 0.0), Some(Region::Index(2)));
        assert_eq!(c.region_at(&mut canvas, 25.0, 0.0), None);
    }

    #[test]
    fn null_marker_only_with_null_color() {
        let canvas = VCanvas::new(20, 10, 1.0, true);
        let vals = vec![SeriesValue::Null, SeriesValue::Number(1.0)];
        let c = BarChart::new(&vals, BarOptions::default(), &canvas).unwrap();
        assert!(c.render_region(&canvas, Region::Index(0), false).is_empty());
        let opts = BarOptions { null_color: Some(skia::Color::BLACK), ..BarOptions::default() };
        let c = BarChart::new(&vals, opts, &canvas).unwrap();
        assert_eq!(c.render_region(&canvas, Region::Index(0), false).len(), 1);
    }

    #[test]
    fn color_map_by_value_then_index() {
        let canvas = VCanvas::new(20, 10, 1.0, true);
        let mut opts = BarOptions::default();
        opts.common.color_map = crate::range_map::ColorMap {
            by_index: Some(vec![None, Some(skia::Color::GREEN)]),
            by_value: Some(crate::range_map::RangeMap::new().with("3", skia::Color::RED).unwrap()),
        };
        let c = BarChart::new(&values(&[1.0, 2.0, 3.0]), opts, &canvas).unwrap();
        assert_eq!(c.calc_color(0, Some(1.0), 0), BarOptions::default().bar_color);
        assert_eq!(c.calc_color(0, Some(2.0), 1), skia::Color::GREEN);
        assert_eq!(c.calc_color(0, Some(3.0), 2), skia::Color::RED);
    }
}
