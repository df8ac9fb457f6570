// File: crates/sparkline-core/src/shape.rs
// Summary: Drawing instructions held by the canvas backend, and their Skia paths.

use std::f64::consts::PI;
use std::rc::Rc;

use skia_safe as skia;

use crate::gradient::GradientSpec;

/// Handle to a shape stored in a [`crate::canvas::VCanvas`]. The generation
/// makes ids of removed shapes resolve to nothing once their slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Paint source for a stroke or fill.
#[derive(Clone, Debug)]
pub enum Brush {
    Solid(skia::Color),
    /// Vertical gradient resampled against the canvas' current range.
    Gradient(Rc<GradientSpec>),
}

impl PartialEq for Brush {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Brush::Solid(a), Brush::Solid(b)) => a == b,
            (Brush::Gradient(a), Brush::Gradient(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<skia::Color> for Brush {
    fn from(c: skia::Color) -> Self {
        Brush::Solid(c)
    }
}

impl Brush {
    pub fn solid_color(&self) -> Option<skia::Color> {
        match self {
            Brush::Solid(c) => Some(*c),
            Brush::Gradient(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Polyline through `points`; closed implicitly when filled.
    Path {
        points: Vec<(f64, f64)>,
        stroke: Option<Brush>,
        fill: Option<Brush>,
        line_width: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        stroke: Option<Brush>,
        fill: Option<Brush>,
        line_width: f64,
    },
    /// Angles in radians, clockwise from the positive x axis.
    PieSlice {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Option<Brush>,
        fill: Option<Brush>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        stroke: Option<Brush>,
        fill: Option<Brush>,
    },
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Path { .. } => "path",
            Shape::Circle { .. } => "circle",
            Shape::PieSlice { .. } => "pie-slice",
            Shape::Rect { .. } => "rect",
        }
    }

    pub fn stroke(&self) -> Option<&Brush> {
        match self {
            Shape::Path { stroke, .. }
            | Shape::Circle { stroke, .. }
            | Shape::PieSlice { stroke, .. }
            | Shape::Rect { stroke, .. } => stroke.as_ref(),
        }
    }

    pub fn fill(&self) -> Option<&Brush> {
        match self {
            Shape::Path { fill, .. }
            | Shape::Circle { fill, .. }
            | Shape::PieSlice { fill, .. }
            | Shape::Rect { fill, .. } => fill.as_ref(),
        }
    }

    pub fn line_width(&self) -> f64 {
        match self {
            Shape::Path { line_width, .. } | Shape::Circle { line_width, .. } => *line_width,
            _ => 1.0,
        }
    }

    /// Geometry as a Skia path. Paths and rects are offset by half a pixel so
    /// one pixel strokes land on pixel centers.
    pub fn to_path(&self) -> skia::Path {
        let mut path = skia::Path::new();
        match self {
            Shape::Path { points, .. } => polyline(&mut path, points),
            Shape::Rect { x, y, width, height, .. } => {
                let (x, y, w, h) = (*x, *y, *width, *height);
                polyline(&mut path, &[(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)]);
            }
            Shape::Circle { x, y, radius, .. } => {
                path.add_circle((*x as f32, *y as f32), *radius as f32, None);
            }
            Shape::PieSlice { x, y, radius, start, end, .. } => {
                let sweep = end - start;
                if sweep >= 2.0 * PI {
                    path.add_circle((*x as f32, *y as f32), *radius as f32, None);
                } else {
                    let r = *radius as f32;
                    let (cx, cy) = (*x as f32, *y as f32);
                    let oval = skia::Rect::from_ltrb(cx - r, cy - r, cx + r, cy + r);
                    path.move_to((cx, cy));
                    path.arc_to(oval, start.to_degrees() as f32, sweep.to_degrees() as f32, false);
                    path.line_to((cx, cy));
                    path.close();
                }
            }
        }
        path
    }
}

fn polyline(path: &mut skia::Path, points: &[(f64, f64)]) {
    let mut it = points.iter();
    if let Some(&(x, y)) = it.next() {
        path.move_to(((x + 0.5) as f32, (y + 0.5) as f32));
        for &(x, y) in it {
            path.line_to(((x + 0.5) as f32, (y + 0.5) as f32));
        }
    }
}
