// File: crates/sparkline-core/tests/properties.rs
// Purpose: End-to-end behavior of the renderers through the public API.

use sparkline_core::chart::boxplot::BoxStats;
use sparkline_core::sparkline::build_layer;
use sparkline_core::types::{parse_series, sparse, values};
use sparkline_core::{
    BarChart, BarOptions, BoxOptions, Brush, BulletOptions, ChartOptions, ColorLineChart, ColorLineOptions, Dimension,
    DiscreteOptions, GradientSpec, LineChart, LineOptions, PieChart, PieOptions, Range, Region, RegionRenderer,
    SeriesValue, Shape, Sparkline, SparklineError, TriStateOptions, VCanvas,
};

fn rect_of(canvas: &VCanvas, id: sparkline_core::ShapeId) -> (f64, f64, f64, f64) {
    match canvas.get(id) {
        Some(Shape::Rect { x, y, width, height, .. }) => (*x, *y, *width, *height),
        other => panic!("expected rect, got {other:?}"),
    }
}

#[test]
fn rendering_twice_gives_identical_pixels() {
    let data = parse_series("1,4,null,2,8,5");
    let mut spark = Sparkline::new(&data, ChartOptions::Line(LineOptions::default()), (60, 20), 1.0).unwrap();
    assert!(spark.render());
    let first = spark.pixels_rgba8().expect("pixels");
    let shapes = spark.canvas().shape_len();
    assert!(spark.render());
    assert_eq!(spark.pixels_rgba8().expect("pixels"), first);
    assert_eq!(spark.canvas().shape_len(), shapes);
}

#[test]
fn mixed_sign_stack_segments_are_proportional() {
    let mut canvas = VCanvas::new(20, 20, 1.0, true);
    let data = parse_series("2:-3,-1:4");
    let mut chart = BarChart::new(&data, BarOptions::default(), &canvas).unwrap();
    assert!(chart.is_stacked());
    assert!(chart.render(&mut canvas));

    for (stack, ids) in chart.values().iter().zip(chart.region_shape_ids()) {
        assert_eq!(stack.len(), ids.len());
        for (value, id) in stack.iter().zip(ids) {
            let value = value.expect("no nulls in this series");
            let (_, y, _, h) = rect_of(&canvas, *id);
            let expected = chart.canvas_height_ef() * value.abs() / chart.range();
            // Rects are drawn one pixel short of the segment height.
            assert!((h + 1.0 - expected).abs() <= 1.0, "segment {value}: {} vs {expected}", h + 1.0);
            if value > 0.0 {
                assert!(y + h <= chart.yoffset(), "positive segment crosses the axis");
            } else {
                assert!(y >= chart.yoffset(), "negative segment crosses the axis");
            }
        }
    }
}

#[test]
fn symmetric_bars_hang_from_the_zero_axis() {
    let mut canvas = VCanvas::new(30, 20, 1.0, true);
    let mut chart = BarChart::new(&values(&[-2.0, -1.0, 0.0, 1.0, 2.0]), BarOptions::default(), &canvas).unwrap();
    assert_eq!(chart.xaxis_offset(), 0.0);
    chart.render(&mut canvas);
    let ids = chart.region_shape_ids();
    let (_, y0, _, _) = rect_of(&canvas, ids[0][0]);
    let (_, y4, _, h4) = rect_of(&canvas, ids[4][0]);
    assert!(y0 >= chart.yoffset());
    assert!(y4 + h4 <= chart.yoffset());
}

#[test]
fn line_splits_on_nulls() {
    let mut canvas = VCanvas::new(70, 20, 1.0, true);
    let data = sparse(&[Some(1.0), None, Some(3.0), Some(4.0), None, None, Some(2.0)]);
    let mut chart = LineChart::new(&data, LineOptions::default(), &canvas).unwrap();
    assert_eq!(chart.line_paths().len(), 3);
    assert_eq!(chart.vertices().iter().filter(|v| v.is_none()).count(), 3);

    chart.render(&mut canvas);
    let (Some(a), Some(b)) = (chart.vertices()[0], chart.vertices()[2]) else {
        panic!("vertices 0 and 2 are plotted");
    };
    assert!(chart.set_region_highlight(&mut canvas, (a.0 + b.0) / 2.0, 5.0));
    assert_eq!(chart.current_region(), Some(Region::Index(1)));
    let fields = chart.current_region_fields();
    assert!(fields[0].is_null);
    assert!(chart.highlight_shape_ids().is_empty());
}

#[test]
fn box_plot_flags_the_far_sample() {
    let stats = BoxStats::from_samples(&[1.0, 2.0, 3.0, 4.0, 100.0], 1.5, true).unwrap();
    assert_eq!(stats.med, 3.0);
    assert_eq!(stats.routlier, Some(100.0));
    assert_eq!(stats.rwhisker, 4.0);
}

#[test]
fn gradient_midpoint_paints_mid_gray() {
    let mut canvas = VCanvas::new(10, 101, 1.0, true);
    let spec = GradientSpec::new([(0.0, skia_safe::Color::BLACK), (100.0, skia_safe::Color::WHITE)]).unwrap();
    canvas.set_min_max(Range::new(0.0, 100.0), 0.0, 101.0);
    let rect = canvas.draw_rect(0.0, 0.0, 10.0, 101.0, None, Some(Brush::Gradient(spec)));
    canvas.append_shape(rect);
    canvas.render();
    let px = canvas.pixel(5, 50).expect("pixel in bounds");
    for ch in [px.r(), px.g(), px.b()] {
        assert!((ch as i32 - 0x7f).abs() <= 2, "channel {ch} is not mid gray");
    }
}

#[test]
fn gradient_spans_only_the_given_extent() {
    let mut canvas = VCanvas::new(10, 40, 1.0, true);
    let spec = GradientSpec::new([(0.0, skia_safe::Color::BLACK), (100.0, skia_safe::Color::WHITE)]).unwrap();
    canvas.set_min_max(Range::new(0.0, 100.0), 10.0, 30.0);
    let rect = canvas.draw_rect(0.0, 0.0, 10.0, 40.0, None, Some(Brush::Gradient(spec)));
    canvas.append_shape(rect);
    canvas.render();

    // Rows above the extent clamp to the max color, rows below to the min.
    let above = canvas.pixel(5, 5).expect("pixel in bounds");
    assert!(above.r() >= 250, "row above extent is {}", above.r());
    let below = canvas.pixel(5, 35).expect("pixel in bounds");
    assert!(below.r() <= 5, "row below extent is {}", below.r());
    let mid = canvas.pixel(5, 20).expect("pixel in bounds");
    assert!((100..=140).contains(&mid.r()), "row inside extent is {}", mid.r());
}

#[test]
fn line_gradient_frame_matches_plotted_extremes() {
    let mut canvas = VCanvas::new(40, 20, 1.0, true);
    let mut chart = LineChart::new(&values(&[1.0, 5.0, 3.0]), LineOptions::default(), &canvas).unwrap();
    assert!(chart.render(&mut canvas));
    let (range, (top, bottom)) = canvas.gradient_frame().expect("line sets a gradient frame");
    assert_eq!(range, chart.y_range());
    let ys: Vec<f64> = chart.vertices().iter().flatten().map(|v| v.1).collect();
    let highest = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let lowest = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(highest as f32, top);
    assert_eq!(lowest as f32, bottom);
    assert!(top > 0.0, "spot margin keeps the max off the canvas edge");
}

#[test]
fn direct_renders_do_not_accumulate_shapes() {
    let data = values(&[4.0, 6.0, 10.0, 8.0, 3.0]);
    let pie = PieOptions { border_width: 1.0, ..PieOptions::default() };
    let layers = [
        ChartOptions::Line(LineOptions::default()),
        ChartOptions::Bar(BarOptions::default()),
        ChartOptions::ColorLine(ColorLineOptions::default()),
        ChartOptions::TriState(TriStateOptions::default()),
        ChartOptions::Discrete(DiscreteOptions::default()),
        ChartOptions::Bullet(BulletOptions::default()),
        ChartOptions::Pie(pie),
        ChartOptions::Box(BoxOptions::default()),
    ];
    for options in layers {
        let kind = options.kind();
        let mut canvas = VCanvas::new(40, 20, 1.0, true);
        let mut chart = build_layer(&data, options, &canvas).unwrap();
        assert!(chart.render(&mut canvas), "{kind}");
        let painted = canvas.shape_len();
        assert!(painted > 0, "{kind} painted nothing");

        chart.set_region_highlight(&mut canvas, 20.0, 10.0);
        assert!(chart.render(&mut canvas), "{kind}");
        assert_eq!(canvas.shape_len(), painted, "{kind} grew on the second render");
    }
}

#[test]
fn bar_render_twice_keeps_one_rect_per_value() {
    let mut canvas = VCanvas::new(30, 20, 1.0, true);
    let mut chart = BarChart::new(&parse_series("1,2,3"), BarOptions::default(), &canvas).unwrap();
    chart.render(&mut canvas);
    let first: Vec<_> = canvas.shape_ids().to_vec();
    assert_eq!(first.len(), 3);
    chart.render(&mut canvas);
    assert_eq!(canvas.shape_len(), 3);
    assert!(first.iter().all(|id| !canvas.contains(*id)));
}

fn fixed_width(data: &[SeriesValue], options: ChartOptions) -> Sparkline {
    Sparkline::new(data, options, (40, 20), 1.0).unwrap()
}

fn line_px() -> ChartOptions {
    let mut opts = LineOptions::default();
    opts.common.width = Dimension::Px(40);
    ChartOptions::Line(opts)
}

fn bar_px() -> ChartOptions {
    let mut opts = BarOptions::default();
    opts.common.width = Dimension::Px(40);
    ChartOptions::Bar(opts)
}

#[test]
fn line_degenerate_series_render_without_shapes() {
    for text in ["5", "null,null"] {
        let mut spark = fixed_width(&parse_series(text), line_px());
        assert!(spark.render(), "{text}");
        assert_eq!(spark.canvas().shape_len(), 0, "{text}");
        assert!(!spark.pointer_moved(10.0, 10.0), "{text}");
        assert!(spark.tooltip(&|_: &[sparkline_core::RegionField]| String::from("x")).is_none());
    }

    let mut empty = fixed_width(&[], line_px());
    assert!(empty.render());
    assert_eq!(empty.canvas().shape_len(), 0);

    // Auto width from zero values leaves nothing to paint on.
    let mut auto = Sparkline::new(&[], ChartOptions::Line(LineOptions::default()), (40, 20), 1.0).unwrap();
    assert!(auto.is_disabled());
    assert!(!auto.render());
}

#[test]
fn flat_line_is_drawn_level() {
    let data = parse_series("3,3,3");
    let mut spark = fixed_width(&data, line_px());
    assert!(spark.render());
    // Fill, stroke and the last-value spot. Min and max spots coincide and are skipped.
    assert_eq!(spark.canvas().shape_len(), 3);

    let mut canvas = VCanvas::new(40, 20, 1.0, true);
    let mut chart = LineChart::new(&data, LineOptions::default(), &canvas).unwrap();
    assert!(chart.render(&mut canvas));
    let ys: Vec<f64> = chart.vertices().iter().flatten().map(|v| v.1).collect();
    assert_eq!(ys.len(), 3);
    assert!(ys.iter().all(|y| y.is_finite() && *y == ys[0]));
}

#[test]
fn bar_degenerate_series_render() {
    let cases = [
        (parse_series("5"), 1),
        (parse_series("null,null"), 0),
        (parse_series("3,3,3"), 3),
        (Vec::new(), 0),
    ];
    for (data, shapes) in cases {
        let mut spark = fixed_width(&data, bar_px());
        assert!(spark.render(), "{data:?}");
        assert_eq!(spark.canvas().shape_len(), shapes, "{data:?}");
        spark.pointer_moved(2.0, 10.0);
        spark.pointer_left();
    }

    let canvas = VCanvas::new(40, 20, 1.0, true);
    let flat = BarChart::new(&parse_series("3,3,3"), BarOptions::default(), &canvas).unwrap();
    assert_eq!(flat.range(), 0.0);
}

#[test]
fn all_zero_pie_paints_nothing() {
    let mut canvas = VCanvas::new(20, 20, 1.0, true);
    let mut chart = PieChart::new(&values(&[0.0, 0.0]), PieOptions::default(), &canvas).unwrap();
    assert!(chart.render(&mut canvas));
    assert_eq!(canvas.shape_len(), 0);
    assert!(!chart.set_region_highlight(&mut canvas, 10.0, 10.0));
    assert_eq!(chart.current_region(), None);
}

#[test]
fn highlighting_the_same_region_twice_is_a_no_op() {
    let mut canvas = VCanvas::new(30, 20, 1.0, true);
    let mut chart = BarChart::new(&values(&[1.0, 2.0, 3.0]), BarOptions::default(), &canvas).unwrap();
    chart.render(&mut canvas);
    assert!(chart.set_region_highlight(&mut canvas, 6.0, 10.0));
    let ids = canvas.shape_ids().to_vec();
    assert!(!chart.set_region_highlight(&mut canvas, 7.0, 12.0));
    assert_eq!(canvas.shape_ids(), ids.as_slice());
}

#[test]
fn colorline_rejects_stacked_values() {
    let canvas = VCanvas::new(20, 10, 1.0, true);
    let err = ColorLineChart::new(&parse_series("1,2:3"), ColorLineOptions::default(), &canvas).err();
    assert_eq!(err, Some(SparklineError::StackedNotSupported { chart: "colorline", index: 1 }));
}

#[test]
fn zero_sized_sparkline_is_disabled() {
    let mut opts = LineOptions::default();
    opts.common.width = Dimension::Px(0);
    let mut spark = Sparkline::new(&values(&[1.0, 2.0]), ChartOptions::Line(opts), (0, 0), 1.0).unwrap();
    assert!(spark.is_disabled());
    assert!(!spark.render());
    assert!(!spark.pointer_moved(1.0, 1.0));
    assert!(spark.pixels_rgba8().is_err());
}

#[test]
fn non_interactive_canvas_drops_shapes_after_paint() {
    let mut opts = BarOptions::default();
    opts.common.disable_interaction = true;
    let mut spark = Sparkline::new(&values(&[1.0, 2.0]), ChartOptions::Bar(opts), (20, 10), 1.0).unwrap();
    assert!(spark.render());
    assert_eq!(spark.canvas().shape_len(), 0);
    assert!(spark.canvas().shape_count() > 0);
    assert!(!spark.pointer_moved(1.0, 5.0));
}

#[test]
fn high_density_display_scales_the_surface() {
    let spark = Sparkline::new(&values(&[1.0, 2.0]), ChartOptions::Bar(BarOptions::default()), (20, 10), 2.0).unwrap();
    assert_eq!(spark.canvas().width(), 9);
    assert_eq!(spark.canvas().pixel_width(), 18);
    assert_eq!(spark.canvas().pixel_height(), 20);
}
