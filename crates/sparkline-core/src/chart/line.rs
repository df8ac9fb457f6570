// File: crates/sparkline-core/src/chart/line.rs
// Summary: Line sparkline: polylines split on nulls, optional fill and
// normal-range band, end/min/max/value spots and a hover spot + rule.

use crate::canvas::VCanvas;
use crate::chart::{ChartBase, RegionRenderer};
use crate::error::{Result, SparklineError};
use crate::options::LineOptions;
use crate::scale::{clip_value, PositionScale, Range, ValueScale};
use crate::shape::{Brush, Shape, ShapeId};
use crate::types::{Region, RegionField, SeriesValue};

type Point = (f64, f64);

/// Pixel geometry resolved at construction.
#[derive(Clone, Debug, Default)]
struct LineLayout {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    spot_radius: f64,
    /// One entry per value; `None` at nulls.
    vertices: Vec<Option<Point>>,
    /// `(from_x, to_x)` hover bucket per value.
    region_map: Vec<(f64, f64)>,
    line_paths: Vec<Vec<Point>>,
    fill_paths: Vec<Vec<Point>>,
}

pub struct LineChart {
    base: ChartBase,
    options: LineOptions,
    xvalues: Vec<f64>,
    yvalues: Vec<Option<f64>>,
    x_range: Range,
    y_range: Range,
    /// Bounds of the data before range options were applied.
    data_range: Option<Range>,
    layout: Option<LineLayout>,
    /// Shapes appended by the last render, bottom first.
    shape_ids: Vec<ShapeId>,
    highlight_ids: Vec<ShapeId>,
}

impl LineChart {
    pub fn new(values: &[SeriesValue], options: LineOptions, canvas: &VCanvas) -> Result<Self> {
        let base = ChartBase::new(canvas, options.common.clone());
        let (xvalues, yvalues) = scan_values(values, options.x_values.as_deref())?;

        let data_range = Range::from_values(yvalues.iter().flatten().copied());
        let mut y_range = data_range.unwrap_or(Range::new(0.0, 0.0));
        let mut x_range = Range::from_values(xvalues.iter().copied()).unwrap_or(Range::new(0.0, 0.0));

        if let (Some(lo), Some(hi)) = (options.normal_range_min, options.normal_range_max) {
            y_range.include(lo);
            y_range.include(hi);
        }
        y_range.apply_overrides(
            options.common.chart_range_min,
            options.common.chart_range_max,
            options.common.chart_range_clip,
        );
        x_range.apply_overrides(options.chart_range_min_x, options.chart_range_max_x, options.chart_range_clip_x);

        let mut chart = Self {
            base,
            options,
            xvalues,
            yvalues,
            x_range,
            y_range,
            data_range,
            layout: None,
            shape_ids: Vec::new(),
            highlight_ids: Vec::new(),
        };
        if chart.data_range.is_some() && chart.yvalues.len() >= 2 {
            chart.layout = Some(chart.compute_layout());
        }
        Ok(chart)
    }

    fn compute_layout(&self) -> LineLayout {
        let o = &self.options;
        let (miny, maxy) = (self.y_range.min, self.y_range.max);
        let mut width = self.base.width;
        let mut height = self.base.height;
        let (mut left, mut top) = (0.0, 0.0);

        let mut spot_radius = o.spot_radius;
        if spot_radius > 0.0 && (width < spot_radius * 4.0 || height < spot_radius * 4.0) {
            spot_radius = 0.0;
        }
        if spot_radius > 0.0 {
            let margin = spot_radius.ceil();
            let first = self.yvalues.first().copied().flatten();
            let last = self.yvalues.last().copied().flatten();
            let hl = o.highlight_spot_color.is_some() && !o.common.disable_interaction;
            let (spot, min_spot, max_spot) =
                (o.spot_color.is_some(), o.min_spot_color.is_some(), o.max_spot_color.is_some());
            let at_extreme = |v: Option<f64>| v == Some(miny) || v == Some(maxy);

            if hl || min_spot || (spot && last == Some(miny)) {
                height -= margin;
            }
            if hl || max_spot || (spot && last == Some(maxy)) {
                height -= margin;
                top += margin;
            }
            if hl || ((min_spot || max_spot) && at_extreme(first)) {
                left += margin;
                width -= margin;
            }
            if hl || spot || min_spot || (max_spot && at_extreme(last)) {
                width -= margin;
            }
        }
        height -= 1.0;

        let xs = PositionScale::new(left, width, self.x_range);
        let ys = ValueScale::new(top, height, self.y_range);
        let floor = top + height;
        let count = self.yvalues.len();

        let mut vertices = Vec::with_capacity(count);
        let mut region_map = Vec::with_capacity(count);
        let mut paths: Vec<Vec<Point>> = Vec::new();
        let mut path: Vec<Point> = Vec::new();
        let mut last_edge: Option<f64> = None;

        for (i, y) in self.yvalues.iter().enumerate() {
            let xpos = xs.to_px(self.xvalues[i]);
            let xposnext = if i + 1 < count { xs.to_px(self.xvalues[i + 1]) } else { width };
            let next = xpos + (xposnext - xpos) / 2.0;
            region_map.push((last_edge.unwrap_or(0.0), next));
            last_edge = Some(next);

            match *y {
                None => {
                    if !path.is_empty() {
                        paths.push(std::mem::take(&mut path));
                    }
                    vertices.push(None);
                }
                Some(y) => {
                    let y = clip_value(y, miny, maxy);
                    if path.is_empty() {
                        path.push((xpos, floor));
                    }
                    let vertex = (xpos, ys.to_px(y));
                    path.push(vertex);
                    vertices.push(Some(vertex));
                }
            }
        }
        if !path.is_empty() {
            paths.push(path);
        }

        let fill = o.fill_color.is_some() || o.fill_gradient.is_some();
        let mut line_paths = Vec::new();
        let mut fill_paths = Vec::new();
        for mut path in paths {
            if fill {
                let mut closed = path.clone();
                if let Some(&(x, _)) = path.last() {
                    closed.push((x, floor));
                }
                fill_paths.push(closed);
            }
            // A lone point keeps its floor anchor and shows as a vertical line.
            if path.len() > 2 {
                path[0] = (path[0].0, path[1].1);
            }
            line_paths.push(path);
        }

        LineLayout { left, top, width, height, spot_radius, vertices, region_map, line_paths, fill_paths }
    }

    pub fn x_values(&self) -> &[f64] {
        &self.xvalues
    }

    pub fn y_values(&self) -> &[Option<f64>] {
        &self.yvalues
    }

    /// Value range after normal-range and chart-range options.
    pub fn y_range(&self) -> Range {
        self.y_range
    }

    pub fn x_range(&self) -> Range {
        self.x_range
    }

    /// Stroked polylines, one per run of non-null values.
    pub fn line_paths(&self) -> &[Vec<Point>] {
        self.layout.as_ref().map_or(&[][..], |l| l.line_paths.as_slice())
    }

    pub fn fill_paths(&self) -> &[Vec<Point>] {
        self.layout.as_ref().map_or(&[][..], |l| l.fill_paths.as_slice())
    }

    pub fn vertices(&self) -> &[Option<Point>] {
        self.layout.as_ref().map_or(&[][..], |l| l.vertices.as_slice())
    }

    pub fn spot_radius(&self) -> f64 {
        self.layout.as_ref().map_or(0.0, |l| l.spot_radius)
    }

    pub fn highlight_shape_ids(&self) -> &[ShapeId] {
        &self.highlight_ids
    }

    fn stroke_brush(&self) -> Brush {
        match &self.options.line_gradient {
            Some(g) => Brush::Gradient(g.clone()),
            None => self.options.line_color.into(),
        }
    }

    fn fill_brush(&self) -> Option<Brush> {
        match &self.options.fill_gradient {
            Some(g) => Some(Brush::Gradient(g.clone())),
            None => self.options.fill_color.map(Brush::from),
        }
    }

    fn spot(&self, canvas: &VCanvas, layout: &LineLayout, x: f64, y: f64, color: skia_safe::Color) -> Shape {
        let xs = PositionScale::new(layout.left, layout.width, self.x_range);
        let ys = ValueScale::new(layout.top, layout.height, self.y_range);
        canvas.draw_circle(xs.to_px(x), ys.to_px(y), layout.spot_radius, None, Some(color.into()), 1.0)
    }

    fn draw_normal_range(&self, canvas: &mut VCanvas, layout: &LineLayout) {
        let (Some(lo), Some(hi)) = (self.options.normal_range_min, self.options.normal_range_max) else {
            return;
        };
        let ys = ValueScale::new(layout.top, layout.height, self.y_range);
        let height = crate::geometry::round_px(layout.height * (hi - lo) / self.y_range.span());
        let rect = canvas.draw_rect(
            layout.left,
            ys.to_px(hi),
            layout.width,
            height,
            None,
            Some(self.options.normal_range_color.into()),
        );
        canvas.append_shape(rect);
    }
}

/// Split raw values into x and y series. Plain numbers use their index as x.
fn scan_values(values: &[SeriesValue], x_values: Option<&[f64]>) -> Result<(Vec<f64>, Vec<Option<f64>>)> {
    let mut xs = Vec::with_capacity(values.len());
    let mut ys = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        match v {
            SeriesValue::Point { x, y } => {
                xs.push(*x);
                ys.push(Some(*y));
            }
            SeriesValue::Stack(_) | SeriesValue::Text(_) if v.is_stack() => {
                let pair = v.to_stack(i)?.unwrap_or_default();
                match pair.as_slice() {
                    [Some(x), y] => {
                        xs.push(*x);
                        ys.push(*y);
                    }
                    _ => return Err(SparklineError::InvalidValue { index: i, raw: format!("{v:?}") }),
                }
            }
            other => {
                xs.push(i as f64);
                ys.push(other.to_number(i)?);
            }
        }
    }
    if let Some(explicit) = x_values {
        for (i, x) in xs.iter_mut().enumerate() {
            *x = explicit.get(i).copied().unwrap_or(i as f64);
        }
    }
    Ok((xs, ys))
}

impl RegionRenderer for LineChart {
    fn kind(&self) -> &'static str {
        "line"
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn region_at(&self, _canvas: &mut VCanvas, x: f64, _y: f64) -> Option<Region> {
        let layout = self.layout.as_ref()?;
        layout
            .region_map
            .iter()
            .enumerate()
            .rev()
            .find(|(_, &(lo, hi))| x >= lo && x <= hi)
            .map(|(i, _)| Region::Index(i))
    }

    fn current_region_fields(&self) -> Vec<RegionField> {
        let Some(Region::Index(i)) = self.base.current_region else {
            return Vec::new();
        };
        let y = self.yvalues.get(i).copied().flatten();
        vec![RegionField {
            is_null: y.is_none(),
            offset: Some(i),
            value: y,
            x: self.xvalues.get(i).copied(),
            y,
            color: Some(self.options.line_color),
            fill_color: self.options.fill_color,
            region: self.base.current_region,
            ..RegionField::default()
        }]
    }

    /// Hover overlay for one vertex: the vertical rule, then the spot.
    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape> {
        let Some(layout) = self.layout.as_ref() else {
            return Vec::new();
        };
        let Some(&Some((vx, vy))) = layout.vertices.get(region.value_index()) else {
            return Vec::new();
        };
        if !highlight {
            return Vec::new();
        }
        let mut shapes = Vec::with_capacity(2);
        if let Some(color) = self.options.highlight_line_color {
            shapes.push(canvas.draw_line(vx, layout.top, vx, layout.top + layout.height, color, 1.0));
        }
        if let (true, Some(color)) = (layout.spot_radius > 0.0, self.options.highlight_spot_color) {
            shapes.push(canvas.draw_circle(vx, vy, layout.spot_radius, None, Some(color.into()), 1.0));
        }
        shapes
    }

    fn change_highlight(&mut self, canvas: &mut VCanvas, highlight: bool) {
        for id in self.highlight_ids.drain(..) {
            canvas.remove_shape_id(id);
        }
        if !highlight {
            return;
        }
        let (Some(region), Some(mut anchor)) = (self.base.current_region, self.shape_ids.last().copied()) else {
            return;
        };
        for shape in self.render_region(canvas, region, true) {
            match canvas.insert_after_shape(anchor, shape) {
                Some(id) => {
                    self.highlight_ids.push(id);
                    anchor = id;
                }
                None => break,
            }
        }
    }

    fn render(&mut self, canvas: &mut VCanvas) -> bool {
        for id in self.highlight_ids.drain(..).chain(self.shape_ids.drain(..)) {
            canvas.remove_shape_id(id);
        }
        let kind = self.kind();
        if !self.base.begin_render(kind) {
            return false;
        }
        let Some(layout) = self.layout.clone() else {
            return true;
        };
        canvas.set_min_max(self.y_range, layout.top, layout.top + layout.height);
        let start = canvas.shape_len();
        let o = &self.options;

        if !o.draw_normal_on_top {
            self.draw_normal_range(canvas, &layout);
        }
        if let Some(fill) = self.fill_brush() {
            for path in &layout.fill_paths {
                let shape = canvas.draw_shape(path.clone(), Some(fill.clone()), Some(fill.clone()), 1.0);
                canvas.append_shape(shape);
            }
        }
        if o.draw_normal_on_top {
            self.draw_normal_range(canvas, &layout);
        }
        let stroke = self.stroke_brush();
        for path in &layout.line_paths {
            let shape = canvas.draw_shape(path.clone(), Some(stroke.clone()), None, o.line_width);
            canvas.append_shape(shape);
        }

        if layout.spot_radius > 0.0 {
            if let Some(spots) = &o.value_spots {
                for (i, y) in self.yvalues.iter().enumerate() {
                    let Some(y) = *y else { continue };
                    if let Some(color) = spots.get(y) {
                        let shape = self.spot(canvas, &layout, self.xvalues[i], y, color);
                        canvas.append_shape(shape);
                    }
                }
            }
            if let (Some(color), Some(Some(y)), Some(&x)) =
                (o.spot_color, self.yvalues.last(), self.xvalues.last())
            {
                let shape = self.spot(canvas, &layout, x, *y, color);
                canvas.append_shape(shape);
            }
            if let Some(data) = self.data_range {
                if self.y_range.max != data.min {
                    for (extreme, color) in [(data.min, o.min_spot_color), (data.max, o.max_spot_color)] {
                        let Some(color) = color else { continue };
                        let Some(i) = self.yvalues.iter().position(|&y| y == Some(extreme)) else {
                            continue;
                        };
                        let shape = self.spot(canvas, &layout, self.xvalues[i], extreme, color);
                        canvas.append_shape(shape);
                    }
                }
            }
        }

        self.shape_ids = canvas.shape_ids()[start..].to_vec();
        tracing::trace!(paths = layout.line_paths.len(), "line chart rendered");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_series, sparse};

    fn chart(values: &[SeriesValue]) -> LineChart {
        let canvas = VCanvas::new(60, 20, 1.0, true);
        LineChart::new(values, LineOptions::default(), &canvas).unwrap()
    }

    #[test]
    fn xy_text_and_pairs() {
        let c = chart(&parse_series("1:5,2:7,4:6"));
        assert_eq!(c.x_values(), &[1.0, 2.0, 4.0]);
        assert_eq!(c.y_values(), &[Some(5.0), Some(7.0), Some(6.0)]);
        assert_eq!(c.x_range(), Range::new(1.0, 4.0));
    }

    #[test]
    fn leading_null_keeps_vertex_alignment() {
        let c = chart(&sparse(&[None, Some(1.0), Some(2.0)]));
        assert_eq!(c.vertices().len(), 3);
        assert!(c.vertices()[0].is_none());
        assert_eq!(c.line_paths().len(), 1);
    }

    #[test]
    fn spot_radius_dropped_on_tiny_canvas() {
        let canvas = VCanvas::new(5, 5, 1.0, true);
        let c = LineChart::new(&sparse(&[Some(1.0), Some(2.0)]), LineOptions::default(), &canvas).unwrap();
        assert_eq!(c.spot_radius(), 0.0);
    }

    #[test]
    fn normal_range_widens_y() {
        let canvas = VCanvas::new(60, 20, 1.0, true);
        let opts = LineOptions { normal_range_min: Some(-5.0), normal_range_max: Some(20.0), ..LineOptions::default() };
        let c = LineChart::new(&sparse(&[Some(1.0), Some(2.0)]), opts, &canvas).unwrap();
        assert_eq!(c.y_range(), Range::new(-5.0, 20.0));
    }

    #[test]
    fn malformed_pair_rejected() {
        let values = vec![SeriesValue::Stack(vec![Some(1.0), Some(2.0), Some(3.0)])];
        let canvas = VCanvas::new(60, 20, 1.0, true);
        assert!(LineChart::new(&values, LineOptions::default(), &canvas).is_err());
    }
}
