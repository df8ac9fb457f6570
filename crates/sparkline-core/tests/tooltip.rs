// File: crates/sparkline-core/tests/tooltip.rs
// Purpose: Tooltip fields and formatting for pointer interaction.

use sparkline_core::types::{parse_series, sparse, values};
use sparkline_core::{
    to_hex, BoxOptions, BulletOptions, ChartOptions, Dimension, FieldKey, PieOptions, RegionField, Sparkline,
    TriStateOptions,
};

fn plain(fields: &[RegionField]) -> String {
    fields
        .iter()
        .map(|f| match (f.key, f.value) {
            (Some(k), Some(v)) => format!("{}={v}", k.as_str()),
            (None, Some(v)) => format!("{v}"),
            (_, None) => "null".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn box_plot_lists_its_statistics() {
    let mut opts = BoxOptions::default();
    opts.common.width = Dimension::Px(100);
    let mut spark = Sparkline::new(&values(&[1.0, 2.0, 3.0, 4.0, 100.0]), ChartOptions::Box(opts), (100, 20), 1.0).unwrap();
    spark.render();
    assert!(spark.pointer_moved(50.0, 10.0));
    assert_eq!(spark.tooltip(&plain).as_deref(), Some("lq=2 med=3 uq=4 ro=100 lw=1 rw=4"));
}

#[test]
fn bullet_reports_the_hovered_part() {
    let mut opts = BulletOptions::default();
    opts.common.width = Dimension::Px(100);
    let mut spark = Sparkline::new(&sparse(&[Some(50.0), Some(30.0), Some(100.0)]), ChartOptions::Bullet(opts), (100, 20), 1.0).unwrap();
    spark.render();
    assert!(spark.pointer_moved(10.0, 10.0));
    assert_eq!(spark.tooltip(&plain).as_deref(), Some("p=30"));
    assert!(spark.pointer_moved(50.0, 10.0));
    assert_eq!(spark.tooltip(&plain).as_deref(), Some("t=50"));
}

#[test]
fn null_values_are_skipped_unless_asked_for() {
    let data = parse_series("1,null,-1");
    let mut spark = Sparkline::new(&data, ChartOptions::TriState(TriStateOptions::default()), (20, 10), 1.0).unwrap();
    spark.render();
    assert!(spark.pointer_moved(6.0, 5.0));
    assert_eq!(spark.tooltip(&plain), None);

    let mut opts = TriStateOptions::default();
    opts.common.tooltip_skip_null = false;
    let mut spark = Sparkline::new(&data, ChartOptions::TriState(opts), (20, 10), 1.0).unwrap();
    spark.render();
    assert!(spark.pointer_moved(6.0, 5.0));
    assert_eq!(spark.tooltip(&plain).as_deref(), Some("null"));
}

#[test]
fn pie_slice_carries_color_and_percent() {
    let opts = PieOptions::default();
    let first = opts.slice_colors[0];
    let mut spark = Sparkline::new(&values(&[1.0, 3.0]), ChartOptions::Pie(opts), (20, 20), 1.0).unwrap();
    spark.render();
    assert!(spark.pointer_moved(15.0, 14.0));
    let text = spark.tooltip(&|fields: &[RegionField]| {
        let f = &fields[0];
        format!("{} {:.0}%", f.color.map(to_hex).unwrap_or_default(), f.percent.unwrap_or(0.0))
    });
    assert_eq!(text, Some(format!("{} 25%", to_hex(first))));
}

#[test]
fn keys_are_short_names() {
    assert_eq!(FieldKey::LowerQuartile.as_str(), "lq");
    assert_eq!(FieldKey::Performance.as_str(), "p");
}
