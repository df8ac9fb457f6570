// File: crates/sparkline-core/src/chart/boxplot.rs
// Summary: Box plot from samples or precomputed statistics, with whiskers,
// outlier spots and an optional target cross.

use crate::canvas::VCanvas;
use crate::chart::{ChartBase, RegionRenderer};
use crate::error::Result;
use crate::geometry::{max_of, min_of, round_px};
use crate::options::BoxOptions;
use crate::shape::{Shape, ShapeId};
use crate::types::{FieldKey, Region, RegionField, SeriesValue};

/// Quartile `q` (1, 2 or 3) of `sorted`.
///
/// Quartiles 1 and 3 are Tukey hinges: the medians of the lower and upper
/// halves, each half including the median when the length is odd. No
/// interpolation between samples happens, so `[1, 2, 3, 4, 5]` gives
/// q1 = 2 and q3 = 4 rather than the interpolated 1.5 and 4.5. Even lengths
/// split cleanly, so `[1, 2, 3, 4]` gives q1 = 1.5 and q3 = 3.5.
pub fn quartile(sorted: &[f64], q: u8) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let half = n.div_ceil(2);
    match q {
        1 => median(&sorted[..half]),
        3 => median(&sorted[n - half..]),
        _ => median(sorted),
    }
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 { sorted[mid] } else { (sorted[mid - 1] + sorted[mid]) / 2.0 }
}

/// Five-number summary plus outliers.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStats {
    pub lq: f64,
    pub med: f64,
    pub uq: f64,
    pub lwhisker: f64,
    pub rwhisker: f64,
    pub loutlier: Option<f64>,
    pub routlier: Option<f64>,
    /// Every sample outside the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Statistics of unsorted samples. Whiskers reach the most extreme
    /// samples within `k * IQR` of the box.
    pub fn from_samples(samples: &[f64], k: f64, show_outliers: bool) -> Option<Self> {
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (&first, &last) = (sorted.first()?, sorted.last()?);
        let (lq, med, uq) = (quartile(&sorted, 1), quartile(&sorted, 2), quartile(&sorted, 3));
        if !show_outliers {
            return Some(Self { lq, med, uq, lwhisker: first, rwhisker: last, loutlier: None, routlier: None, outliers: Vec::new() });
        }
        let iqr = uq - lq;
        let (lo_fence, hi_fence) = (lq - k * iqr, uq + k * iqr);
        let inside = || sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let lwhisker = min_of(inside()).unwrap_or(lq);
        let rwhisker = max_of(inside()).unwrap_or(uq);
        let outliers: Vec<f64> = sorted.iter().copied().filter(|v| *v < lwhisker || *v > rwhisker).collect();
        Some(Self {
            lq,
            med,
            uq,
            lwhisker,
            rwhisker,
            loutlier: (first < lwhisker).then_some(first),
            routlier: (last > rwhisker).then_some(last),
            outliers,
        })
    }

    /// Precomputed statistics: `[lo, lw, lq, med, uq, rw, ro]` when outliers
    /// are shown and seven values are given, else `[lw, lq, med, uq, rw]`.
    pub fn from_raw(values: &[f64], show_outliers: bool) -> Option<Self> {
        if show_outliers && values.len() > 5 {
            let &[lo, lw, lq, med, uq, rw, ro] = values.get(..7)? else {
                return None;
            };
            let outliers = [lo, ro].into_iter().filter(|v| *v < lw || *v > rw).collect();
            Some(Self {
                lq,
                med,
                uq,
                lwhisker: lw,
                rwhisker: rw,
                loutlier: (lo < lw).then_some(lo),
                routlier: (ro > rw).then_some(ro),
                outliers,
            })
        } else {
            let &[lw, lq, med, uq, rw] = values.get(..5)? else {
                return None;
            };
            Some(Self { lq, med, uq, lwhisker: lw, rwhisker: rw, loutlier: None, routlier: None, outliers: Vec::new() })
        }
    }
}

pub struct BoxChart {
    base: ChartBase,
    options: BoxOptions,
    stats: Option<BoxStats>,
    min: f64,
    max: f64,
    shape_ids: Vec<ShapeId>,
}

impl BoxChart {
    pub fn new(values: &[SeriesValue], options: BoxOptions, canvas: &VCanvas) -> Result<Self> {
        let mut base = ChartBase::new(canvas, options.common.clone());
        let mut samples = Vec::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            if let Some(n) = v.to_number(i)? {
                samples.push(n);
            }
        }
        if samples.is_empty() {
            base.disabled = true;
        }
        let stats = if options.raw {
            BoxStats::from_raw(&samples, options.show_outliers)
        } else {
            BoxStats::from_samples(&samples, options.outlier_iqr, options.show_outliers)
        };
        let min = options.common.chart_range_min.or_else(|| min_of(samples.iter().copied())).unwrap_or(0.0);
        let max = options.common.chart_range_max.or_else(|| max_of(samples.iter().copied())).unwrap_or(0.0);
        Ok(Self { base, options, stats, min, max, shape_ids: Vec::new() })
    }

    pub fn stats(&self) -> Option<&BoxStats> {
        self.stats.as_ref()
    }
}

impl RegionRenderer for BoxChart {
    fn kind(&self) -> &'static str {
        "box"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    /// The whole plot is one region.
    fn region_at(&self, _canvas: &mut VCanvas, _x: f64, _y: f64) -> Option<Region> {
        self.stats.as_ref().map(|_| Region::Index(1))
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let (Some(region), Some(s)) = (self.base.current_region, self.stats.as_ref()) else {
            return Vec::new();
        };
        let field = |key, value| RegionField {
            key: Some(key),
            value: Some(value),
            region: Some(region),
            ..RegionField::default()
        };
        let mut fields = vec![
            field(FieldKey::LowerQuartile, s.lq),
            field(FieldKey::Median, s.med),
            field(FieldKey::UpperQuartile, s.uq),
        ];
        if let Some(lo) = s.loutlier {
            fields.push(field(FieldKey::LowerOutlier, lo));
        }
        if let Some(ro) = s.routlier {
            fields.push(field(FieldKey::UpperOutlier, ro));
        }
        fields.push(field(FieldKey::LowerWhisker, s.lwhisker));
        fields.push(field(FieldKey::UpperWhisker, s.rwhisker));
        fields
    }

    /// Every shape of the plot; highlighting does not restyle it.
    fn render_region(&self, canvas: &VCanvas, _region: Region, _highlight: bool) -> Vec<Shape> {
        let Some(s) = self.stats.as_ref() else {
            return Vec::new();
        };
        let o = &self.options;
        let h = self.base.height;
        let mut width = self.base.width;
        let mut left = 0.0;
        if o.show_outliers {
            let margin = o.spot_radius.ceil();
            left = margin;
            width -= 2.0 * margin;
        }
        let unit = width / (self.max - self.min + 1.0);
        let x = |v: f64| (v - self.min) * unit + left;
        let px = |v: f64| round_px(x(v));
        let mid = round_px(h / 2.0);
        let mut shapes = Vec::new();

        if o.show_outliers {
            for &v in &s.outliers {
                shapes.push(canvas.draw_circle(
                    x(v),
                    h / 2.0,
                    o.spot_radius,
                    Some(o.outlier_line_color.into()),
                    Some(o.outlier_fill_color.into()),
                    1.0,
                ));
            }
        }
        shapes.push(canvas.draw_rect(
            px(s.lq),
            round_px(h * 0.1),
            round_px((s.uq - s.lq) * unit),
            round_px(h * 0.8),
            Some(o.box_line_color.into()),
            Some(o.box_fill_color.into()),
        ));
        let (quarter, three_quarters) = (round_px(h / 4.0), round_px(h - h / 4.0));
        for (whisker, edge) in [(s.lwhisker, s.lq), (s.rwhisker, s.uq)] {
            shapes.push(canvas.draw_line(px(whisker), mid, px(edge), mid, o.box_line_color, 1.0));
            shapes.push(canvas.draw_line(px(whisker), quarter, px(whisker), three_quarters, o.whisker_color, 1.0));
        }
        shapes.push(canvas.draw_line(px(s.med), round_px(h * 0.1), px(s.med), round_px(h * 0.9), o.median_color, 1.0));
        if let Some(target) = o.target {
            let size = o.spot_radius.ceil();
            let tx = px(target);
            shapes.push(canvas.draw_line(tx, round_px(h / 2.0 - size), tx, round_px(h / 2.0 + size), o.target_color, 1.0));
            shapes.push(canvas.draw_line(round_px(x(target) - size), mid, round_px(x(target) + size), mid, o.target_color, 1.0));
        }
        shapes
    }

    fn change_highlight(&mut self, _canvas: &mut VCanvas, _highlight: bool) {}

    fn render(&mut self, canvas: &mut VCanvas) -> bool {
        for id in self.shape_ids.drain(..) {
            canvas.remove_shape_id(id);
        }
        if !self.base.begin_render("box") {
            return false;
        }
        self.shape_ids = self
            .render_region(canvas, Region::Index(1), false)
            .into_iter()
            .map(|shape| canvas.append_shape(shape))
            .collect();
        true
    }
}
