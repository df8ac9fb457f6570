// File: crates/sparkline-core/src/lib.rs
// Summary: Core library entry point; exports the sparkline renderers, the
// retained canvas and the option types.

pub mod canvas;
pub mod chart;
pub mod color;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod options;
pub mod range_map;
pub mod scale;
pub mod shape;
pub mod sparkline;
pub mod theme;
pub mod types;

pub use canvas::VCanvas;
pub use chart::{
    BarChart, BoxChart, BulletChart, ColorLineChart, DiscreteChart, LineChart, PieChart, RegionRenderer,
    TooltipFormatter, TriStateChart,
};
pub use color::{lighten, parse_color, to_hex};
pub use error::{Result, SparklineError};
pub use gradient::{GradientSpec, GradientStop};
pub use options::{
    BarOptions, BoxOptions, BulletOptions, ChartOptions, ColorLineOptions, CommonOptions, DiscreteOptions,
    LineOptions, PieOptions, TriStateOptions,
};
pub use range_map::{ColorMap, RangeMap};
pub use scale::Range;
pub use shape::{Brush, Shape, ShapeId};
pub use sparkline::Sparkline;
pub use theme::Theme;
pub use types::{Dimension, FieldKey, Region, RegionField, SeriesValue};
