// File: crates/sparkline-core/src/chart/tristate.rs
// Summary: Win/loss strip: half-height bars up for positive values, down
// for negative ones and a centered tick for zero.

use skia_safe as skia;

use crate::canvas::VCanvas;
use crate::chart::{render_with_highlight_diff, ChartBase, RegionRenderer};
use crate::error::Result;
use crate::geometry::round_px;
use crate::options::TriStateOptions;
use crate::shape::{Shape, ShapeId};
use crate::types::{Region, RegionField, SeriesValue};

pub struct TriStateChart {
    base: ChartBase,
    options: TriStateOptions,
    values: Vec<Option<f64>>,
    region_shapes: Vec<Vec<ShapeId>>,
}

impl TriStateChart {
    pub fn new(values: &[SeriesValue], options: TriStateOptions, canvas: &VCanvas) -> Result<Self> {
        let base = ChartBase::new(canvas, options.common.clone());
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_number(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { base, options, values, region_shapes: Vec::new() })
    }

    fn total_bar_width(&self) -> f64 {
        (self.options.bar_width + self.options.bar_spacing) as f64
    }

    /// Index map, then value map, then sign. `None` when an index entry
    /// blanks the bar.
    pub fn calc_color(&self, value: f64, index: usize) -> Option<skia::Color> {
        let map = &self.options.common.color_map;
        if let Some(entry) = map.index_entry(index) {
            return entry;
        }
        if let Some(c) = map.value_entry(value) {
            return Some(c);
        }
        Some(if value < 0.0 {
            self.options.neg_bar_color
        } else if value > 0.0 {
            self.options.pos_bar_color
        } else {
            self.options.zero_bar_color
        })
    }
}

/// Auto width for tri-state strips: fixed bars plus spacing.
pub fn auto_width(count: usize, options: &TriStateOptions) -> u32 {
    if count == 0 {
        return 0;
    }
    count as u32 * options.bar_width + (count as u32 - 1) * options.bar_spacing
}

impl RegionRenderer for TriStateChart {
    fn kind(&self) -> &'static str {
        "tristate"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, _canvas: &mut VCanvas, x: f64, _y: f64) -> Option<Region> {
        let index = (x / self.total_bar_width()).floor();
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
            color: value.and_then(|v| self.calc_color(v, i)),
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
        let Some(color) = self.calc_color(value, i) else {
            return Vec::new();
        };
        let half = round_px(self.base.height / 2.0);
        let (y, height) = if value < 0.0 {
            (half, half - 1.0)
        } else if value > 0.0 {
            (0.0, half - 1.0)
        } else {
            (half - 1.0, 2.0)
        };
        let color = self.base.maybe_highlight(color, highlight);
        let x = i as f64 * self.total_bar_width();
        let width = self.options.bar_width as f64 - 1.0;
        vec![canvas.draw_rect(x, y, width, height - 1.0, Some(color.into()), Some(color.into()))]
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
        if !self.base.begin_render("tristate") {
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
