// File: crates/sparkline-core/src/chart/mod.rs
// Summary: Shared renderer contract, highlight bookkeeping and the bar-like
// region diffing helper.

use skia_safe as skia;

use crate::canvas::VCanvas;
use crate::color::lighten;
use crate::options::CommonOptions;
use crate::shape::{Shape, ShapeId};
use crate::types::{Region, RegionField};

pub mod bar;
pub mod boxplot;
pub mod bullet;
pub mod colorline;
pub mod discrete;
pub mod line;
pub mod pie;
pub mod tristate;

pub use bar::BarChart;
pub use boxplot::BoxChart;
pub use bullet::BulletChart;
pub use colorline::ColorLineChart;
pub use discrete::DiscreteChart;
pub use line::LineChart;
pub use pie::PieChart;
pub use tristate::TriStateChart;

/// Turns the active region's fields into display text.
pub trait TooltipFormatter {
    fn format(&self, fields: &[RegionField]) -> String;
}

impl<F> TooltipFormatter for F
where
    F: Fn(&[RegionField]) -> String,
{
    fn format(&self, fields: &[RegionField]) -> String {
        self(fields)
    }
}

/// State every renderer carries: disabled flag, active region and the
/// options shared by all chart types.
#[derive(Clone, Debug)]
pub struct ChartBase {
    pub(crate) disabled: bool,
    pub(crate) current_region: Option<Region>,
    pub(crate) common: CommonOptions,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl ChartBase {
    pub fn new(canvas: &VCanvas, common: CommonOptions) -> Self {
        Self {
            disabled: canvas.is_disabled(),
            current_region: None,
            common,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        }
    }

    /// Start of every `render`: false when there is nothing to paint.
    pub(crate) fn begin_render(&mut self, kind: &str) -> bool {
        self.current_region = None;
        if self.disabled {
            tracing::debug!(chart = kind, "renderer disabled, skipping paint");
        }
        !self.disabled
    }

    /// Explicit highlight color, or `color` lightened channel by channel.
    pub fn highlight_color(&self, color: skia::Color) -> skia::Color {
        self.common
            .highlight_color
            .unwrap_or_else(|| lighten(color, self.common.highlight_lighten))
    }

    /// Pick the plain or highlighted form of `color`.
    pub fn maybe_highlight(&self, color: skia::Color, highlight: bool) -> skia::Color {
        if highlight { self.highlight_color(color) } else { color }
    }
}

/// Interface each chart type implements. Renderers borrow the backend per
/// call so several layers can share one surface.
pub trait RegionRenderer {
    fn kind(&self) -> &'static str;
    fn base(&self) -> &ChartBase;
    fn base_mut(&mut self) -> &mut ChartBase;

    /// Region under `(x, y)` in CSS pixels.
    fn region_at(&self, canvas: &mut VCanvas, x: f64, y: f64) -> Option<Region>;

    /// Tooltip data for the active region; empty when none is active.
    fn current_region_fields(&self) -> Vec<RegionField>;

    /// Shapes for one region. Pure and repeatable; empty when the region
    /// paints nothing.
    fn render_region(&self, canvas: &VCanvas, region: Region, highlight: bool) -> Vec<Shape>;

    /// Swap the active region's shapes for their highlighted (or plain) form.
    /// Never repaints the backend.
    fn change_highlight(&mut self, canvas: &mut VCanvas, highlight: bool);

    /// Emit every shape onto `canvas`. Returns false when disabled.
    fn render(&mut self, canvas: &mut VCanvas) -> bool;

    fn is_disabled(&self) -> bool {
        self.base().disabled
    }

    fn current_region(&self) -> Option<Region> {
        self.base().current_region
    }

    /// Move the highlight to the region under `(x, y)`. True when the region
    /// changed and the caller should repaint.
    fn set_region_highlight(&mut self, canvas: &mut VCanvas, x: f64, y: f64) -> bool {
        let base = self.base();
        if base.disabled || x < 0.0 || y < 0.0 || x > base.width || y > base.height {
            return false;
        }
        let new_region = self.region_at(canvas, x, y);
        let old_region = self.base().current_region;
        if new_region == old_region {
            return false;
        }
        let highlight = !self.base().common.disable_highlight;
        if old_region.is_some() && highlight {
            self.change_highlight(canvas, false);
        }
        self.base_mut().current_region = new_region;
        if new_region.is_some() && highlight {
            self.change_highlight(canvas, true);
        }
        tracing::trace!(chart = self.kind(), region = ?new_region, "region highlight moved");
        true
    }

    /// Drop the highlight. True when one was active.
    fn clear_region_highlight(&mut self, canvas: &mut VCanvas) -> bool {
        if self.base().current_region.is_none() {
            return false;
        }
        if !self.base().common.disable_highlight {
            self.change_highlight(canvas, false);
        }
        self.base_mut().current_region = None;
        true
    }

    /// Format the active region, honoring `tooltip_skip_null`.
    fn tooltip(&self, formatter: &dyn TooltipFormatter) -> Option<String> {
        self.base().current_region?;
        let mut fields = self.current_region_fields();
        if self.base().common.tooltip_skip_null {
            fields.retain(|f| !f.is_null);
        }
        if fields.is_empty() {
            return None;
        }
        Some(formatter.format(&fields))
    }
}

/// Paint or repaint bar-like regions.
///
/// With `change == None` the shapes in `region_shapes` are removed, every
/// region `0..count` is rendered, highest index first, and `region_shapes` is
/// rebuilt. With `Some((index, highlight))` only
/// that region's shapes are swapped in place.
pub fn render_with_highlight_diff<F>(
    canvas: &mut VCanvas,
    region_shapes: &mut Vec<Vec<ShapeId>>,
    count: usize,
    change: Option<(usize, bool)>,
    render_region: F,
) where
    F: Fn(&VCanvas, usize, bool) -> Vec<Shape>,
{
    match change {
        None => {
            for &id in region_shapes.iter().flatten() {
                canvas.remove_shape_id(id);
            }
            region_shapes.clear();
            region_shapes.resize(count, Vec::new());
            for index in (0..count).rev() {
                let shapes = render_region(canvas, index, false);
                region_shapes[index] = shapes.into_iter().map(|s| canvas.append_shape(s)).collect();
            }
        }
        Some((index, highlight)) => {
            let Some(old) = region_shapes.get(index).filter(|ids| !ids.is_empty()) else {
                return;
            };
            let old = old.clone();
            let shapes = render_region(canvas, index, highlight);
            region_shapes[index] = canvas.replace_with_shapes(&old, shapes);
        }
    }
}
