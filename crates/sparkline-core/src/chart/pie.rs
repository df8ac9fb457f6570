// File: crates/sparkline-core/src/chart/pie.rs
// Summary: Pie sparkline; zero-valued slices are skipped entirely.

use std::f64::consts::PI;

use skia_safe as skia;

use crate::canvas::VCanvas;
use crate::chart::{ChartBase, RegionRenderer};
use crate::error::Result;
use crate::options::PieOptions;
use crate::shape::{Shape, ShapeId};
use crate::types::{Region, RegionField, SeriesValue};

pub struct PieChart {
    base: ChartBase,
    options: PieOptions,
    values: Vec<Option<f64>>,
    total: f64,
    radius: f64,
    ring: Option<ShapeId>,
    region_shapes: Vec<(usize, ShapeId)>,
}

impl PieChart {
    pub fn new(values: &[SeriesValue], options: PieOptions, canvas: &VCanvas) -> Result<Self> {
        let base = ChartBase::new(canvas, options.common.clone());
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_number(i))
            .collect::<Result<Vec<_>>>()?;
        let total = values.iter().flatten().sum();
        let radius = (base.width.min(base.height) / 2.0).floor();
        Ok(Self { base, options, values, total, radius, ring: None, region_shapes: Vec::new() })
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn slice_color(&self, index: usize) -> Option<skia::Color> {
        let colors = &self.options.slice_colors;
        (!colors.is_empty()).then(|| colors[index % colors.len()])
    }

    /// Start and end angle of slice `index`, in radians.
    pub fn slice_angles(&self, index: usize) -> Option<(f64, f64)> {
        let mut next = self.options.offset.to_radians();
        for (i, v) in self.values.iter().enumerate() {
            let start = next;
            let end = if self.total > 0.0 { next + 2.0 * PI * (v.unwrap_or(0.0) / self.total) } else { next };
            if i == index {
                return Some((start, end));
            }
            next = end;
        }
        None
    }

    fn slice(&self, canvas: &VCanvas, index: usize, highlight: bool) -> Option<Shape> {
        let (start, end) = self.slice_angles(index)?;
        let color = self.base.maybe_highlight(self.slice_color(index)?, highlight);
        let r = self.radius;
        Some(canvas.draw_pie_slice(r, r, r - self.options.border_width, start, end, None, Some(color.into())))
    }
}

impl RegionRenderer for PieChart {
    fn kind(&self) -> &'static str {
        "pie"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, canvas: &mut VCanvas, x: f64, y: f64) -> Option<Region> {
        let id = canvas.shape_at(x, y)?;
        self.region_shapes.iter().find(|(_, s)| *s == id).map(|&(i, _)| Region::Index(i))
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let Some(Region::Index(i)) = self.base.current_region else {
            return Vec::new();
        };
        let value = self.values.get(i).copied().flatten();
        vec![RegionField {
            is_null: value.is_none(),
            value,
            percent: value.filter(|_| self.total > 0.0).map(|v| v / self.total * 100.0),
            color: self.slice_color(i),
            offset: Some(i),
            region: self.base.current_region,
            ..RegionField::default()
        }]
    }

    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape> {
        match self.values.get(region.value_index()) {
            Some(Some(v)) if *v != 0.0 => self.slice(canvas, region.value_index(), highlight).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn change_highlight(&mut self, canvas: &mut VCanvas, highlight: bool) {
        let Some(Region::Index(i)) = self.base.current_region else {
            return;
        };
        let Some(pos) = self.region_shapes.iter().position(|&(r, _)| r == i) else {
            return;
        };
        let Some(shape) = self.slice(canvas, i, highlight) else {
            return;
        };
        if let Some(id) = canvas.replace_with_shape(self.region_shapes[pos].1, shape) {
            self.region_shapes[pos].1 = id;
        }
    }

    fn render(&mut self, canvas: &mut VCanvas) -> bool {
        if let Some(id) = self.ring.take() {
            canvas.remove_shape_id(id);
        }
        for (_, id) in self.region_shapes.drain(..) {
            canvas.remove_shape_id(id);
        }
        if !self.base.begin_render("pie") {
            return false;
        }
        let border = self.options.border_width;
        if border > 0.0 {
            let r = self.radius;
            let ring = canvas.draw_circle(r, r, (r - border / 2.0).floor(), Some(self.options.border_color.into()), None, border);
            self.ring = Some(canvas.append_shape(ring));
        }
        for i in (0..self.values.len()).rev() {
            if let Some(shape) = self.render_region(canvas, Region::Index(i), false).pop() {
                let id = canvas.append_shape(shape);
                self.region_shapes.push((i, id));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::values;

    #[test]
    fn slices_cover_the_circle() {
        let canvas = VCanvas::new(20, 20, 1.0, true);
        let c = PieChart::new(&values(&[1.0, 1.0, 2.0]), PieOptions::default(), &canvas).unwrap();
        assert_eq!(c.radius(), 10.0);
        let (s0, e0) = c.slice_angles(0).unwrap();
        let (_, e2) = c.slice_angles(2).unwrap();
        assert_eq!(s0, 0.0);
        assert!((e0 - PI / 2.0).abs() < 1e-9);
        assert!((e2 - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn offset_rotates_start() {
        let canvas = VCanvas::new(20, 20, 1.0, true);
        let opts = PieOptions { offset: 90.0, ..PieOptions::default() };
        let c = PieChart::new(&values(&[1.0]), opts, &canvas).unwrap();
        assert!((c.slice_angles(0).unwrap().0 - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn percent_field() {
        let mut canvas = VCanvas::new(20, 20, 1.0, true);
        let mut c = PieChart::new(&values(&[1.0, 3.0]), PieOptions::default(), &canvas).unwrap();
        c.render(&mut canvas);
        // Lower right quadrant belongs to the first slice.
        assert!(c.set_region_highlight(&mut canvas, 15.0, 14.0));
        let fields = c.current_region_fields();
        assert_eq!(fields[0].offset, Some(0));
        assert_eq!(fields[0].percent, Some(25.0));
    }
}
