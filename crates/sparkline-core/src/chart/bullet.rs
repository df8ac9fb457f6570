// File: crates/sparkline-core/src/chart/bullet.rs
// Summary: Bullet gauge: background ranges, a performance bar and a target
// marker, each hit-tested through the backend.

use crate::canvas::VCanvas;
use crate::chart::{ChartBase, RegionRenderer};
use crate::error::Result;
use crate::geometry::{max_of, min_of, round_px};
use crate::options::BulletOptions;
use crate::shape::{Shape, ShapeId};
use crate::types::{FieldKey, Region, RegionField, SeriesValue};

/// Values are `[target, performance, range, range, ...]`.
pub struct BulletChart {
    base: ChartBase,
    options: BulletOptions,
    values: Vec<Option<f64>>,
    min: f64,
    max: f64,
    range: f64,
    /// Live shape for every painted region.
    region_shapes: Vec<(Region, ShapeId)>,
}

impl BulletChart {
    pub fn new(values: &[SeriesValue], options: BulletOptions, canvas: &VCanvas) -> Result<Self> {
        let mut base = ChartBase::new(canvas, options.common.clone());
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| v.to_number(i))
            .collect::<Result<Vec<_>>>()?;
        if values.is_empty() {
            base.disabled = true;
        }

        // A missing target or performance value scans as the first range.
        let mut scan = values.clone();
        let first_range = values.get(2).copied().flatten();
        for v in scan.iter_mut().take(2) {
            if v.is_none() {
                *v = first_range;
            }
        }
        let max = max_of(scan.iter().flatten().copied()).unwrap_or(0.0);
        let data_min = min_of(scan.iter().flatten().copied()).unwrap_or(0.0);
        let min = options.base.unwrap_or(data_min.min(0.0));
        let range = max - min;

        Ok(Self { base, options, values, min, max, range, region_shapes: Vec::new() })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn span(&self) -> f64 {
        if self.range == 0.0 { 1.0 } else { self.range }
    }

    fn width_for(&self, value: f64) -> f64 {
        round_px(self.base.width * ((value - self.min) / self.span()))
    }

    fn shape_for(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Option<Shape> {
        let (w, h) = (self.base.width, self.base.height);
        let value = self.values.get(region.value_index()).copied().flatten()?;
        let o = &self.options;
        let (x, y, width, height, color) = match region {
            Region::Range(i) => {
                if o.range_colors.is_empty() || i < 2 {
                    return None;
                }
                let color = o.range_colors[(i - 2) % o.range_colors.len()];
                (0.0, 0.0, self.width_for(value) - 1.0, h - 1.0, color)
            }
            Region::Performance => {
                (0.0, round_px(h * 0.3), self.width_for(value) - 1.0, round_px(h * 0.4) - 1.0, o.performance_color)
            }
            Region::Target => {
                let x = round_px(w * ((value - self.min) / self.span()) - o.target_width as f64 / 2.0);
                let top = round_px(h * 0.1);
                (x, top, o.target_width as f64 - 1.0, h - top * 2.0 - 1.0, o.target_color)
            }
            Region::Index(_) => return None,
        };
        let color = self.base.maybe_highlight(color, highlight);
        Some(canvas.draw_rect(x, y, width, height, Some(color.into()), Some(color.into())))
    }

    fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        (2..self.values.len())
            .map(Region::Range)
            .chain([Region::Performance, Region::Target])
    }
}

impl RegionRenderer for BulletChart {
    fn kind(&self) -> &'static str {
        "bullet"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, canvas: &mut VCanvas, x: f64, y: f64) -> Option<Region> {
        let id = canvas.shape_at(x, y)?;
        self.region_shapes.iter().find(|(_, s)| *s == id).map(|(r, _)| *r)
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let Some(region) = self.base.current_region else {
            return Vec::new();
        };
        let key = match region {
            Region::Target => FieldKey::Target,
            Region::Performance => FieldKey::Performance,
            Region::Range(_) => FieldKey::Range,
            Region::Index(_) => return Vec::new(),
        };
        let value = self.values.get(region.value_index()).copied().flatten();
        vec![RegionField {
            is_null: value.is_none(),
            key: Some(key),
            value,
            offset: Some(region.value_index()),
            region: Some(region),
            ..RegionField::default()
        }]
    }

    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape> {
        self.shape_for(canvas, region, highlight).into_iter().collect()
    }

    fn change_highlight(&mut self, canvas: &mut VCanvas, highlight: bool) {
        let Some(region) = self.base.current_region else {
            return;
        };
        let Some(pos) = self.region_shapes.iter().position(|(r, _)| *r == region) else {
            return;
        };
        let Some(shape) = self.shape_for(canvas, region, highlight) else {
            return;
        };
        if let Some(id) = canvas.replace_with_shape(self.region_shapes[pos].1, shape) {
            self.region_shapes[pos].1 = id;
        }
    }

    fn render(&mut self, canvas: &mut VCanvas) -> bool {
        for (_, id) in self.region_shapes.drain(..) {
            canvas.remove_shape_id(id);
        }
        if !self.base.begin_render("bullet") {
            return false;
        }
        let regions: Vec<Region> = self.regions().collect();
        for region in regions {
            if let Some(shape) = self.shape_for(canvas, region, false) {
                let id = canvas.append_shape(shape);
                self.region_shapes.push((region, id));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sparse;

    fn canvas() -> VCanvas {
        VCanvas::new(100, 20, 1.0, true)
    }

    #[test]
    fn null_target_scans_as_first_range() {
        let c = BulletChart::new(&sparse(&[None, Some(50.0), Some(80.0), Some(60.0)]), BulletOptions::default(), &canvas()).unwrap();
        assert_eq!(c.min(), 0.0);
        assert_eq!(c.max(), 80.0);
    }

    #[test]
    fn base_overrides_min() {
        let opts = BulletOptions { base: Some(20.0), ..BulletOptions::default() };
        let c = BulletChart::new(&sparse(&[Some(70.0), Some(50.0), Some(100.0)]), opts, &canvas()).unwrap();
        assert_eq!(c.min(), 20.0);
    }

    #[test]
    fn empty_series_disables() {
        let c = BulletChart::new(&[], BulletOptions::default(), &canvas()).unwrap();
        assert!(c.is_disabled());
    }

    #[test]
    fn hit_test_finds_target_over_ranges() {
        let mut canvas = canvas();
        let mut c = BulletChart::new(&sparse(&[Some(50.0), Some(30.0), Some(100.0)]), BulletOptions::default(), &canvas).unwrap();
        assert!(c.render(&mut canvas));
        assert_eq!(canvas.shape_len(), 3);
        assert_eq!(c.region_at(&mut canvas, 50.0, 10.0), Some(Region::Target));
        assert_eq!(c.region_at(&mut canvas, 10.0, 10.0), Some(Region::Performance));
        assert_eq!(c.region_at(&mut canvas, 80.0, 2.0), Some(Region::Range(2)));
    }

    #[test]
    fn highlight_swaps_only_the_region_shape() {
        let mut canvas = canvas();
        let mut c = BulletChart::new(&sparse(&[Some(50.0), Some(30.0), Some(100.0)]), BulletOptions::default(), &canvas).unwrap();
        c.render(&mut canvas);
        let before = canvas.shape_ids().to_vec();
        assert!(c.set_region_highlight(&mut canvas, 80.0, 2.0));
        let after = canvas.shape_ids().to_vec();
        assert_ne!(before[0], after[0]);
        assert_eq!(before[1..], after[1..]);
        let fields = c.current_region_fields();
        assert_eq!(fields[0].key, Some(FieldKey::Range));
        assert_eq!(fields[0].value, Some(100.0));
    }
}
