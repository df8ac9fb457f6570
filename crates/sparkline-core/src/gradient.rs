// File: crates/sparkline-core/src/gradient.rs
// Summary: Color ramps built from {value, color} stops and resampled against
// a chart's current range.
//
// The raster ramp draws the declared stops into a reference strip and reads
// the interpolated pixels back; the linear ramp computes the same colors
// directly. Either one feeds the sampler, which walks the chart's own range
// and emits a dense stop list clipped to the reference range.

use std::rc::Rc;

use skia_safe as skia;

use crate::error::{Result, SparklineError};
use crate::geometry::{clamp, round_px};
use crate::scale::Range;

/// Reference strip length per declared stop.
pub const STRIP_PX_PER_STOP: usize = 100;
/// Samples taken across the target range per declared stop.
pub const SAMPLES_PER_STOP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub value: f64,
    pub color: skia::Color,
}

/// Immutable gradient description. Shared through `Rc` so caches can key on
/// identity.
#[derive(Debug, PartialEq)]
pub struct GradientSpec {
    stops: Vec<GradientStop>,
    alpha_min: f32,
    alpha_max: f32,
}

impl GradientSpec {
    /// Build from stops in any order; they are sorted by value. Alpha bounds
    /// come from the lowest and highest stops.
    pub fn new(stops: impl IntoIterator<Item = (f64, skia::Color)>) -> Result<Rc<Self>> {
        let mut stops: Vec<GradientStop> = stops
            .into_iter()
            .map(|(value, color)| GradientStop { value, color })
            .collect();
        if stops.is_empty() {
            return Err(SparklineError::EmptyGradient);
        }
        stops.sort_by(|a, b| a.value.total_cmp(&b.value));
        let alpha_min = stops[0].color.a() as f32 / 255.0;
        let alpha_max = stops[stops.len() - 1].color.a() as f32 / 255.0;
        Ok(Rc::new(Self { stops, alpha_min, alpha_max }))
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// `[lowest stop value, highest stop value]`.
    pub fn reference(&self) -> Range {
        Range::new(self.stops[0].value, self.stops[self.stops.len() - 1].value)
    }

    pub fn alpha_bounds(&self) -> (f32, f32) {
        (self.alpha_min, self.alpha_max)
    }

    /// Position of each stop within the reference range.
    fn positions(&self) -> Vec<f32> {
        let reference = self.reference();
        self.stops
            .iter()
            .map(|s| if reference.is_degenerate() { 0.0 } else { reference.fraction(s.value) as f32 })
            .collect()
    }
}

/// Source of interpolated RGB along a normalized `[0, 1]` reference ramp.
pub trait ColorRamp {
    fn color_at(&self, pct: f64) -> skia::Color;
}

/// Interpolates the declared stops arithmetically.
pub struct LinearRamp {
    stops: Vec<(f64, skia::Color)>,
}

impl LinearRamp {
    pub fn new(spec: &GradientSpec) -> Self {
        let stops = spec
            .positions()
            .into_iter()
            .zip(spec.stops())
            .map(|(p, s)| (p as f64, s.color))
            .collect();
        Self { stops }
    }
}

impl ColorRamp for LinearRamp {
    fn color_at(&self, pct: f64) -> skia::Color {
        let opaque = |c: skia::Color| skia::Color::from_rgb(c.r(), c.g(), c.b());
        let first = self.stops[0];
        if pct <= first.0 {
            return opaque(first.1);
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if pct <= p1 {
                let t = if p1 > p0 { (pct - p0) / (p1 - p0) } else { 1.0 };
                let lerp = |a: u8, b: u8| round_px(a as f64 + (b as f64 - a as f64) * t) as u8;
                return skia::Color::from_rgb(lerp(c0.r(), c1.r()), lerp(c0.g(), c1.g()), lerp(c0.b(), c1.b()));
            }
        }
        opaque(self.stops[self.stops.len() - 1].1)
    }
}

/// Renders the stops into a `(100 * stops) x 1` raster strip and reads the
/// interpolated pixels back.
pub struct RasterRamp {
    pixels: Vec<u8>,
    len: usize,
}

impl RasterRamp {
    /// `None` when no raster surface is available.
    pub fn new(spec: &GradientSpec) -> Option<Self> {
        let len = STRIP_PX_PER_STOP * spec.stops().len();
        let mut surface = skia::surfaces::raster_n32_premul((len as i32, 1))?;

        let mut colors: Vec<skia::Color> = spec
            .stops()
            .iter()
            .map(|s| skia::Color::from_rgb(s.color.r(), s.color.g(), s.color.b()))
            .collect();
        let mut positions = spec.positions();
        if colors.len() == 1 {
            colors.push(colors[0]);
            positions = vec![0.0, 1.0];
        }

        let shader = skia::Shader::linear_gradient(
            ((0.0f32, 0.0f32), (len as f32, 0.0f32)),
            colors.as_slice(),
            Some(positions.as_slice()),
            skia::TileMode::Clamp,
            None,
            None,
        )?;
        let mut paint = skia::Paint::default();
        paint.set_shader(shader);
        let canvas = surface.canvas();
        canvas.clear(skia::Color::TRANSPARENT);
        canvas.draw_rect(skia::Rect::from_wh(len as f32, 1.0), &paint);

        let info = skia::ImageInfo::new(
            (len as i32, 1),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let mut pixels = vec![0u8; len * 4];
        if !surface.read_pixels(&info, &mut pixels, len * 4, (0, 0)) {
            tracing::warn!("gradient strip read-back failed");
            return None;
        }
        Some(Self { pixels, len })
    }
}

impl ColorRamp for RasterRamp {
    fn color_at(&self, pct: f64) -> skia::Color {
        let idx = round_px(clamp(pct, 0.0, 1.0) * (self.len - 1) as f64) as usize;
        let px = &self.pixels[idx * 4..idx * 4 + 3];
        skia::Color::from_rgb(px[0], px[1], px[2])
    }
}

/// Dense resampling of a gradient over a target range.
#[derive(Clone, Debug, PartialEq)]
pub struct SampledGradient {
    pub stops: Vec<(f32, skia::Color)>,
}

impl SampledGradient {
    /// Linear shader running from `start` (range min) to `end` (range max).
    pub fn to_shader(&self, start: (f32, f32), end: (f32, f32)) -> Option<skia::Shader> {
        let mut colors: Vec<skia::Color> = self.stops.iter().map(|s| s.1).collect();
        let mut positions: Vec<f32> = self.stops.iter().map(|s| s.0).collect();
        if colors.len() == 1 {
            colors.push(colors[0]);
            positions = vec![0.0, 1.0];
        }
        skia::Shader::linear_gradient(
            (start, end),
            colors.as_slice(),
            Some(positions.as_slice()),
            skia::TileMode::Clamp,
            None,
            None,
        )
    }
}

pub struct GradientSampler<'a> {
    spec: &'a GradientSpec,
    ramp: Box<dyn ColorRamp>,
}

impl<'a> GradientSampler<'a> {
    pub fn new(spec: &'a GradientSpec, ramp: Box<dyn ColorRamp>) -> Self {
        Self { spec, ramp }
    }

    /// Sampler over a raster reference strip, falling back to arithmetic
    /// interpolation when no surface can be created.
    pub fn raster(spec: &'a GradientSpec) -> Self {
        match RasterRamp::new(spec) {
            Some(ramp) => Self::new(spec, Box::new(ramp)),
            None => Self::linear(spec),
        }
    }

    pub fn linear(spec: &'a GradientSpec) -> Self {
        Self::new(spec, Box::new(LinearRamp::new(spec)))
    }

    /// Position of `value` within the reference range, clamped to `[0, 1]`.
    pub fn safe_pct(&self, value: f64) -> f64 {
        let reference = self.spec.reference();
        if reference.is_degenerate() {
            return 0.0;
        }
        clamp(reference.fraction(value), 0.0, 1.0)
    }

    /// Ramp color at one value, alpha interpolated between the endpoint stops.
    pub fn color_at(&self, value: f64) -> skia::Color {
        if self.spec.reference().is_degenerate() {
            return self.spec.stops()[0].color;
        }
        let pct = self.safe_pct(value);
        let rgb = self.ramp.color_at(pct);
        let (lo, hi) = self.spec.alpha_bounds();
        let alpha = round_px(((lo + (hi - lo) * pct as f32) * 255.0) as f64) as u8;
        skia::Color::from_argb(alpha, rgb.r(), rgb.g(), rgb.b())
    }

    /// Walk `target` in `stops * 5` samples, one output stop per sample.
    pub fn sample(&self, target: Range) -> SampledGradient {
        if self.spec.reference().is_degenerate() {
            return SampledGradient { stops: vec![(0.0, self.spec.stops()[0].color)] };
        }
        let count = (self.spec.stops().len() * SAMPLES_PER_STOP).max(2);
        let step = (target.max - target.min) / (count - 1) as f64;
        let stops = (0..count)
            .map(|i| {
                let pos = i as f32 / (count - 1) as f32;
                (pos, self.color_at(target.min + step * i as f64))
            })
            .collect();
        SampledGradient { stops }
    }
}

/// Shaders built during renders, keyed by spec identity. Entries encode the
/// range and pixel extent they were built for, so any change drops them.
#[derive(Default)]
pub(crate) struct GradientCache {
    key: Option<(Range, (f32, f32))>,
    entries: Vec<(Rc<GradientSpec>, skia::Shader)>,
}

impl GradientCache {
    pub fn invalidate(&mut self) {
        self.key = None;
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Vertical shader mapping `range.min` to row `bottom` and `range.max`
    /// to row `top`, where `extent` is `(top, bottom)`.
    pub fn shader(&mut self, spec: &Rc<GradientSpec>, range: Range, extent: (f32, f32)) -> Option<skia::Shader> {
        if self.key != Some((range, extent)) {
            self.invalidate();
            self.key = Some((range, extent));
        }
        if let Some((_, shader)) = self.entries.iter().find(|(s, _)| Rc::ptr_eq(s, spec)) {
            return Some(shader.clone());
        }
        tracing::trace!(stops = spec.stops().len(), min = range.min, max = range.max, "building gradient");
        let sampled = GradientSampler::raster(spec).sample(range);
        let (top, bottom) = extent;
        let shader = sampled.to_shader((0.0, bottom), (0.0, top))?;
        self.entries.push((Rc::clone(spec), shader.clone()));
        Some(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Rc<GradientSpec> {
        GradientSpec::new([(100.0, skia::Color::WHITE), (0.0, skia::Color::BLACK)]).unwrap()
    }

    fn near(c: skia::Color, v: u8) -> bool {
        [c.r(), c.g(), c.b()].iter().all(|&ch| (ch as i32 - v as i32).abs() <= 2)
    }

    #[test]
    fn stops_are_sorted() {
        let spec = bw();
        assert_eq!(spec.stops()[0].value, 0.0);
        assert_eq!(spec.reference(), Range::new(0.0, 100.0));
    }

    #[test]
    fn empty_spec_rejected() {
        assert_eq!(GradientSpec::new(Vec::new()).unwrap_err(), SparklineError::EmptyGradient);
    }

    #[test]
    fn linear_midpoint_is_mid_gray() {
        let spec = bw();
        let sampler = GradientSampler::linear(&spec);
        assert!(near(sampler.color_at(50.0), 0x7f));
    }

    #[test]
    fn raster_midpoint_is_mid_gray() {
        let spec = bw();
        let sampler = GradientSampler::raster(&spec);
        assert!(near(sampler.color_at(50.0), 0x7f));
    }

    #[test]
    fn out_of_reference_values_clamp() {
        let spec = bw();
        let sampler = GradientSampler::linear(&spec);
        assert_eq!(sampler.safe_pct(-50.0), 0.0);
        assert_eq!(sampler.safe_pct(500.0), 1.0);
        assert!(near(sampler.color_at(1000.0), 255));
    }

    #[test]
    fn sample_count_and_clipping() {
        let spec = bw();
        let sampled = GradientSampler::linear(&spec).sample(Range::new(50.0, 200.0));
        assert_eq!(sampled.stops.len(), 10);
        assert_eq!(sampled.stops[0].0, 0.0);
        assert_eq!(sampled.stops[9].0, 1.0);
        assert!(near(sampled.stops[0].1, 0x7f));
        assert!(near(sampled.stops[9].1, 255));
    }

    #[test]
    fn zero_width_reference_is_flat() {
        let red = skia::Color::from_rgb(255, 0, 0);
        let spec = GradientSpec::new([(5.0, red), (5.0, skia::Color::BLUE)]).unwrap();
        let sampled = GradientSampler::linear(&spec).sample(Range::new(0.0, 10.0));
        assert_eq!(sampled.stops.len(), 1);
        assert_eq!(GradientSampler::linear(&spec).color_at(9.0), spec.stops()[0].color);
    }

    #[test]
    fn alpha_interpolates_between_endpoints() {
        let spec = GradientSpec::new([
            (0.0, skia::Color::from_argb(0, 0, 0, 0)),
            (10.0, skia::Color::from_argb(255, 0, 0, 0)),
        ])
        .unwrap();
        let c = GradientSampler::linear(&spec).color_at(5.0);
        assert!((c.a() as i32 - 128).abs() <= 1);
    }

    #[test]
    fn cache_keys_on_identity_and_range() {
        let spec = bw();
        let mut cache = GradientCache::default();
        assert!(cache.shader(&spec, Range::new(0.0, 100.0), (0.0, 20.0)).is_some());
        assert!(cache.shader(&spec, Range::new(0.0, 100.0), (0.0, 20.0)).is_some());
        assert_eq!(cache.len(), 1);
        let other = bw();
        cache.shader(&other, Range::new(0.0, 100.0), (0.0, 20.0));
        assert_eq!(cache.len(), 2);
        cache.shader(&spec, Range::new(0.0, 50.0), (0.0, 20.0));
        assert_eq!(cache.len(), 1);
        cache.shader(&spec, Range::new(0.0, 50.0), (3.0, 16.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.key, Some((Range::new(0.0, 50.0), (3.0, 16.0))));
    }
}
