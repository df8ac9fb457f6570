// File: crates/sparkline-core/src/canvas.rs
// Summary: Retained-mode canvas backend: a shape arena with paint order,
// replayed onto a Skia CPU raster surface.
//
// Charts append shapes and later swap them in place to toggle highlights;
// nothing reaches pixels until `render()` replays the list. Hit testing is a
// replay too: `shape_at` renders with a target point and reports the last
// (topmost) shape whose path contained it.

use anyhow::{anyhow, Result};
use skia_safe as skia;

use crate::gradient::GradientCache;
use crate::scale::Range;
use crate::shape::{Brush, Shape, ShapeId};

struct Slot {
    generation: u32,
    shape: Option<Shape>,
}

pub struct VCanvas {
    css_width: u32,
    css_height: u32,
    scale: f32,
    pixel_width: i32,
    pixel_height: i32,
    interactive: bool,
    surface: Option<skia::Surface>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<ShapeId>,
    last_shape_id: Option<ShapeId>,
    shape_count: u64,
    target: Option<(f64, f64)>,
    current_target: Option<ShapeId>,
    /// Value range and `(top, bottom)` CSS pixel extent gradients align to.
    gradient_frame: Option<(Range, (f32, f32))>,
    gradients: GradientCache,
}

impl VCanvas {
    /// Backend for a `css_width x css_height` box on a display with the given
    /// scale factor. Without a raster surface the backend is disabled and all
    /// rendering is a no-op.
    pub fn new(css_width: u32, css_height: u32, scale: f32, interactive: bool) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let pixel_width = (css_width as f32 * scale).round() as i32;
        let pixel_height = (css_height as f32 * scale).round() as i32;
        let surface = skia::surfaces::raster_n32_premul((pixel_width, pixel_height));
        if surface.is_none() {
            tracing::warn!(css_width, css_height, scale, "no raster surface, sparkline canvas disabled");
        } else {
            tracing::debug!(pixel_width, pixel_height, interactive, "created sparkline canvas");
        }
        Self {
            css_width,
            css_height,
            scale,
            pixel_width,
            pixel_height,
            interactive,
            surface,
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            last_shape_id: None,
            shape_count: 0,
            target: None,
            current_target: None,
            gradient_frame: None,
            gradients: GradientCache::default(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.surface.is_none()
    }

    /// Layout width in CSS pixels.
    pub fn width(&self) -> u32 { self.css_width }
    /// Layout height in CSS pixels.
    pub fn height(&self) -> u32 { self.css_height }
    pub fn pixel_width(&self) -> i32 { self.pixel_width }
    pub fn pixel_height(&self) -> i32 { self.pixel_height }
    pub fn scale_factor(&self) -> f32 { self.scale }
    pub fn is_interactive(&self) -> bool { self.interactive }

    // ---- shape factories ----------------------------------------------------

    pub fn draw_line(&self, x1: f64, y1: f64, x2: f64, y2: f64, color: impl Into<Brush>, line_width: f64) -> Shape {
        self.draw_shape(vec![(x1, y1), (x2, y2)], Some(color.into()), None, line_width)
    }

    pub fn draw_shape(&self, points: Vec<(f64, f64)>, stroke: Option<Brush>, fill: Option<Brush>, line_width: f64) -> Shape {
        Shape::Path { points, stroke, fill, line_width }
    }

    pub fn draw_circle(&self, x: f64, y: f64, radius: f64, stroke: Option<Brush>, fill: Option<Brush>, line_width: f64) -> Shape {
        Shape::Circle { x, y, radius, stroke, fill, line_width }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_pie_slice(&self, x: f64, y: f64, radius: f64, start: f64, end: f64, stroke: Option<Brush>, fill: Option<Brush>) -> Shape {
        Shape::PieSlice { x, y, radius, start, end, stroke, fill }
    }

    pub fn draw_rect(&self, x: f64, y: f64, width: f64, height: f64, stroke: Option<Brush>, fill: Option<Brush>) -> Shape {
        Shape::Rect { x, y, width, height, stroke, fill }
    }

    // ---- shape list ---------------------------------------------------------

    fn alloc(&mut self, shape: Shape) -> ShapeId {
        self.shape_count += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.shape = Some(shape);
                ShapeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, shape: Some(shape) });
                ShapeId { index, generation: 0 }
            }
        }
    }

    fn release(&mut self, id: ShapeId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.shape.is_some() => {
                slot.shape = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        lookup(&self.slots, id)
    }

    /// Push onto the top of the paint order.
    pub fn append_shape(&mut self, shape: Shape) -> ShapeId {
        let id = self.alloc(shape);
        self.order.push(id);
        self.last_shape_id = Some(id);
        id
    }

    pub fn last_shape_id(&self) -> Option<ShapeId> {
        self.last_shape_id
    }

    /// Swap one shape for another at the same paint position. `None` when
    /// `old` is not in the list.
    pub fn replace_with_shape(&mut self, old: ShapeId, shape: Shape) -> Option<ShapeId> {
        let pos = self.order.iter().position(|&id| id == old)?;
        self.release(old);
        let id = self.alloc(shape);
        self.order[pos] = id;
        Some(id)
    }

    /// Remove every id in `old` and insert `shapes`, in order, where the
    /// first of the removed ids sat.
    pub fn replace_with_shapes(&mut self, old: &[ShapeId], shapes: Vec<Shape>) -> Vec<ShapeId> {
        let first = self.order.iter().position(|id| old.contains(id));
        self.order.retain(|id| !old.contains(id));
        for &id in old {
            self.release(id);
        }
        let at = first.unwrap_or(self.order.len());
        let ids: Vec<ShapeId> = shapes.into_iter().map(|s| self.alloc(s)).collect();
        self.order.splice(at..at, ids.iter().copied());
        ids
    }

    /// Insert directly above `anchor`. `None` when the anchor is unknown.
    pub fn insert_after_shape(&mut self, anchor: ShapeId, shape: Shape) -> Option<ShapeId> {
        let pos = self.order.iter().position(|&id| id == anchor)?;
        let id = self.alloc(shape);
        self.order.insert(pos + 1, id);
        Some(id)
    }

    pub fn remove_shape_id(&mut self, id: ShapeId) -> bool {
        if let Some(pos) = self.order.iter().position(|&s| s == id) {
            self.order.remove(pos);
        }
        self.release(id)
    }

    /// Ids in paint order, bottom first.
    pub fn shape_ids(&self) -> &[ShapeId] {
        &self.order
    }

    /// Shapes in paint order, bottom first.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.order.iter().filter_map(move |&id| lookup(&self.slots, id))
    }

    pub fn shape_len(&self) -> usize {
        self.order.len()
    }

    /// Total number of shapes ever stored.
    pub fn shape_count(&self) -> u64 {
        self.shape_count
    }

    /// Record the value range gradients built during the next render should
    /// align to: `range.min` sits at CSS row `bottom` and `range.max` at
    /// `top`. A different frame drops cached gradients.
    pub fn set_min_max(&mut self, range: Range, top: f64, bottom: f64) {
        let frame = (range, (top as f32, bottom as f32));
        if self.gradient_frame != Some(frame) {
            self.gradients.invalidate();
        }
        self.gradient_frame = Some(frame);
    }

    pub fn gradient_frame(&self) -> Option<(Range, (f32, f32))> {
        self.gradient_frame
    }

    /// Drop every shape and clear the surface.
    pub fn reset(&mut self) {
        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            if slot.shape.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.order.clear();
        self.last_shape_id = None;
        self.current_target = None;
        if let Some(surface) = self.surface.as_mut() {
            surface.canvas().clear(skia::Color::TRANSPARENT);
        }
    }

    // ---- rasterization ------------------------------------------------------

    /// Topmost shape whose geometry contains `(x, y)` (CSS pixels). Forces a
    /// full render.
    pub fn shape_at(&mut self, x: f64, y: f64) -> Option<ShapeId> {
        self.target = Some((x, y));
        self.render();
        self.target = None;
        self.current_target
    }

    /// Clear the surface and replay every shape in paint order.
    pub fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let frame = self.gradient_frame;
        let height = self.css_height as f32;
        let canvas = surface.canvas();
        canvas.clear(skia::Color::TRANSPARENT);
        canvas.save();
        canvas.scale((self.scale, self.scale));

        let mut hit = None;
        for &id in &self.order {
            let Some(shape) = lookup(&self.slots, id) else {
                continue;
            };
            let path = shape.to_path();
            let stroke = shape.stroke().and_then(|b| {
                paint_for(b, &mut self.gradients, frame, height, skia::paint::Style::Stroke, shape.line_width())
            });
            let fill = shape.fill().and_then(|b| {
                paint_for(b, &mut self.gradients, frame, height, skia::paint::Style::Fill, 1.0)
            });
            if let Some(p) = &stroke {
                canvas.draw_path(&path, p);
            }
            if let Some(p) = &fill {
                canvas.draw_path(&path, p);
            }
            if let Some((x, y)) = self.target {
                if path.contains((x as f32, y as f32)) {
                    hit = Some(id);
                }
            }
        }
        canvas.restore();
        self.current_target = hit;
        tracing::trace!(shapes = self.order.len(), "rendered sparkline canvas");

        if !self.interactive {
            let ids: Vec<ShapeId> = self.order.drain(..).collect();
            for id in ids {
                self.release(id);
            }
        }
    }

    /// Unpremultiplied RGBA pixels of the surface, row-major.
    pub fn pixels_rgba8(&mut self) -> Result<Vec<u8>> {
        let (w, h) = (self.pixel_width, self.pixel_height);
        let surface = self.surface.as_mut().ok_or_else(|| anyhow!("canvas is disabled"))?;
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            return Err(anyhow!("failed to read back canvas pixels"));
        }
        Ok(pixels)
    }

    /// Color of one device pixel.
    pub fn pixel(&mut self, x: i32, y: i32) -> Option<skia::Color> {
        if x < 0 || y < 0 || x >= self.pixel_width || y >= self.pixel_height {
            return None;
        }
        let pixels = self.pixels_rgba8().ok()?;
        let i = (y as usize * self.pixel_width as usize + x as usize) * 4;
        Some(skia::Color::from_argb(pixels[i + 3], pixels[i], pixels[i + 1], pixels[i + 2]))
    }
}

fn lookup(slots: &[Slot], id: ShapeId) -> Option<&Shape> {
    slots
        .get(id.index as usize)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.shape.as_ref())
}

fn paint_for(
    brush: &Brush,
    gradients: &mut GradientCache,
    frame: Option<(Range, (f32, f32))>,
    height: f32,
    style: skia::paint::Style,
    line_width: f64,
) -> Option<skia::Paint> {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(style);
    paint.set_stroke_width(line_width as f32);
    match brush {
        Brush::Solid(c) => {
            paint.set_color(*c);
        }
        Brush::Gradient(spec) => {
            let (range, extent) = frame.unwrap_or_else(|| (spec.reference(), (0.0, height)));
            let shader = gradients.shader(spec, range, extent)?;
            paint.set_shader(shader);
        }
    }
    Some(paint)
}
