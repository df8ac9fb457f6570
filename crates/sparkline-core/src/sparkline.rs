// File: crates/sparkline-core/src/sparkline.rs
// Summary: Composite sparkline: one backend shared by ordered chart layers,
// with pointer handling and tooltip assembly.

use crate::canvas::VCanvas;
use crate::chart::{
    bar, discrete, tristate, BarChart, BoxChart, BulletChart, ColorLineChart, DiscreteChart, LineChart, PieChart,
    RegionRenderer, TooltipFormatter, TriStateChart,
};
use crate::error::Result;
use crate::options::ChartOptions;
use crate::types::{Dimension, SeriesValue, DEFAULT_EM_WIDTH, DEFAULT_PIXELS_PER_VALUE};

/// Build the renderer `options` selects, against `canvas`.
pub fn build_layer(values: &[SeriesValue], options: ChartOptions, canvas: &VCanvas) -> Result<Box<dyn RegionRenderer>> {
    let layer: Box<dyn RegionRenderer> = match options {
        ChartOptions::Line(o) => Box::new(LineChart::new(values, o, canvas)?),
        ChartOptions::Bar(o) => Box::new(BarChart::new(values, o, canvas)?),
        ChartOptions::ColorLine(o) => Box::new(ColorLineChart::new(values, o, canvas)?),
        ChartOptions::TriState(o) => Box::new(TriStateChart::new(values, o, canvas)?),
        ChartOptions::Discrete(o) => Box::new(DiscreteChart::new(values, o, canvas)?),
        ChartOptions::Bullet(o) => Box::new(BulletChart::new(values, o, canvas)?),
        ChartOptions::Pie(o) => Box::new(PieChart::new(values, o, canvas)?),
        ChartOptions::Box(o) => Box::new(BoxChart::new(values, o, canvas)?),
    };
    Ok(layer)
}

/// CSS pixel size of a chart. `Auto` widths follow the chart type; `Auto`
/// heights take the host height.
pub fn resolve_size(count: usize, options: &ChartOptions, host: (u32, u32)) -> (u32, u32) {
    let common = options.common();
    let height = common.height.resolve(host.1);
    let width = match common.width {
        Dimension::Px(w) => w,
        Dimension::Auto => match options {
            ChartOptions::Line(_) => count as u32 * DEFAULT_PIXELS_PER_VALUE,
            ChartOptions::Bar(o) => bar::auto_width(count, o),
            ChartOptions::TriState(o) => tristate::auto_width(count, o),
            ChartOptions::Discrete(_) => discrete::auto_width(count),
            ChartOptions::Pie(_) => height,
            ChartOptions::Bullet(_) | ChartOptions::Box(_) => DEFAULT_EM_WIDTH,
            ChartOptions::ColorLine(_) => host.0,
        },
    };
    (width, height)
}

pub struct Sparkline {
    canvas: VCanvas,
    layers: Vec<Box<dyn RegionRenderer>>,
}

impl Sparkline {
    /// Size the backend from the first layer's options and build that layer.
    /// `host` is the box `auto` sizes resolve against; `scale` is the display
    /// pixel ratio.
    pub fn new(values: &[SeriesValue], options: ChartOptions, host: (u32, u32), scale: f32) -> Result<Self> {
        let (width, height) = resolve_size(values.len(), &options, host);
        let interactive = !options.common().disable_interaction;
        tracing::debug!(kind = options.kind(), width, height, scale, "creating sparkline");
        let canvas = VCanvas::new(width, height, scale, interactive);
        let layer = build_layer(values, options, &canvas)?;
        Ok(Self { canvas, layers: vec![layer] })
    }

    /// Overlay another chart on the same backend. Later layers paint on top.
    pub fn add_layer(&mut self, values: &[SeriesValue], options: ChartOptions) -> Result<()> {
        let layer = build_layer(values, options, &self.canvas)?;
        self.layers.push(layer);
        Ok(())
    }

    pub fn canvas(&self) -> &VCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut VCanvas {
        &mut self.canvas
    }

    pub fn layers(&self) -> &[Box<dyn RegionRenderer>] {
        &self.layers
    }

    pub fn is_disabled(&self) -> bool {
        self.canvas.is_disabled()
    }

    /// Clear the backend, emit every layer back to front and rasterize.
    /// False when nothing could be painted.
    pub fn render(&mut self) -> bool {
        self.canvas.reset();
        let mut painted = false;
        for layer in &mut self.layers {
            painted |= layer.render(&mut self.canvas);
        }
        self.canvas.render();
        tracing::trace!(layers = self.layers.len(), shapes = self.canvas.shape_len(), "sparkline rendered");
        painted
    }

    /// Move highlights to whatever is under `(x, y)`. Repaints once and
    /// returns true if any layer changed.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        if !self.canvas.is_interactive() {
            return false;
        }
        let mut changed = false;
        for layer in &mut self.layers {
            changed |= layer.set_region_highlight(&mut self.canvas, x, y);
        }
        if changed {
            self.canvas.render();
        }
        changed
    }

    pub fn pointer_left(&mut self) -> bool {
        let mut changed = false;
        for layer in &mut self.layers {
            changed |= layer.clear_region_highlight(&mut self.canvas);
        }
        if changed {
            self.canvas.render();
        }
        changed
    }

    /// Tooltip text of every layer with an active region, one per line.
    pub fn tooltip(&self, formatter: &dyn TooltipFormatter) -> Option<String> {
        let parts: Vec<String> = self.layers.iter().filter_map(|l| l.tooltip(formatter)).collect();
        (!parts.is_empty()).then(|| parts.join("\n"))
    }

    pub fn pixels_rgba8(&mut self) -> anyhow::Result<Vec<u8>> {
        self.canvas.pixels_rgba8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{BarOptions, BoxOptions, LineOptions, PieOptions};
    use crate::types::values;

    #[test]
    fn auto_sizes_per_chart_type() {
        let host = (100, 16);
        assert_eq!(resolve_size(10, &ChartOptions::Line(LineOptions::default()), host), (30, 16));
        assert_eq!(resolve_size(3, &ChartOptions::Bar(BarOptions::default()), host), (14, 16));
        assert_eq!(resolve_size(3, &ChartOptions::Pie(PieOptions::default()), host), (16, 16));
        assert_eq!(resolve_size(3, &ChartOptions::Box(BoxOptions::default()), host), (64, 16));
        let mut fixed = LineOptions::default();
        fixed.common.width = Dimension::Px(50);
        fixed.common.height = Dimension::Px(20);
        assert_eq!(resolve_size(10, &ChartOptions::Line(fixed), host), (50, 20));
    }

    #[test]
    fn composite_layers_share_the_backend() {
        let data = values(&[1.0, 3.0, 2.0, 5.0]);
        let mut opts = BarOptions::default();
        opts.common.width = Dimension::Px(40);
        let mut spark = Sparkline::new(&data, ChartOptions::Bar(opts), (40, 16), 1.0).unwrap();
        spark.add_layer(&data, ChartOptions::Line(LineOptions::default())).unwrap();
        assert!(spark.render());
        assert_eq!(spark.layers().len(), 2);
        assert!(spark.canvas().shape_len() > 4);
    }

    #[test]
    fn pointer_moves_and_leaves() {
        let data = values(&[1.0, 3.0, 2.0]);
        let mut spark = Sparkline::new(&data, ChartOptions::Bar(BarOptions::default()), (40, 16), 1.0).unwrap();
        spark.render();
        assert!(spark.pointer_moved(1.0, 5.0));
        assert!(!spark.pointer_moved(1.0, 6.0));
        let text = spark.tooltip(&|fields: &[crate::types::RegionField]| format!("{:?}", fields[0].value));
        assert_eq!(text.as_deref(), Some("Some(1.0)"));
        assert!(spark.pointer_left());
        assert!(!spark.pointer_left());
        assert!(spark.tooltip(&|_: &[crate::types::RegionField]| String::new()).is_none());
    }
}
