// File: crates/sparkline-demo/src/main.rs
// Summary: Demo loads a CSV of named series and renders each one to a PNG,
// then sweeps a pointer across it and prints the tooltips it produces.

use anyhow::{bail, Context, Result};
use sparkline_core::theme;
use sparkline_core::types::{parse_series, SeriesValue};
use sparkline_core::{ChartOptions, Dimension, RegionField, Sparkline};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// One row of the input table.
struct Row {
    name: String,
    kind: String,
    values: Vec<SeriesValue>,
    theme: String,
    width: Dimension,
    height: Dimension,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let input = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample.csv"));
    let out_dir = std::env::args()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/sparklines"));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let rows = load_rows(&input).with_context(|| format!("failed to load CSV '{}'", input.display()))?;
    tracing::info!(rows = rows.len(), input = %input.display(), "loaded sparkline table");
    if rows.is_empty() {
        bail!("no rows loaded, check the header line");
    }

    for row in &rows {
        match render_row(row, &out_dir) {
            Ok(path) => println!("Wrote {}", path.display()),
            Err(err) => tracing::warn!(name = %row.name, error = %err, "skipping row"),
        }
    }
    Ok(())
}

fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    tracing::debug!(?headers, "csv headers");
    let idx = |name: &str| headers.iter().position(|h| h == name);
    let (Some(i_name), Some(i_type), Some(i_values)) = (idx("name"), idx("type"), idx("values")) else {
        bail!("expected name, type and values columns, found {headers:?}");
    };
    let (i_theme, i_width, i_height) = (idx("theme"), idx("width"), idx("height"));

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let field = |i: Option<usize>| i.and_then(|ix| rec.get(ix)).map(str::trim).unwrap_or("");
        out.push(Row {
            name: field(Some(i_name)).to_string(),
            kind: field(Some(i_type)).to_string(),
            values: parse_series(field(Some(i_values))),
            theme: field(i_theme).to_string(),
            width: field(i_width).parse().unwrap_or(Dimension::Auto),
            height: field(i_height).parse().unwrap_or(Dimension::Auto),
        });
    }
    Ok(out)
}

fn render_row(row: &Row, out_dir: &Path) -> Result<PathBuf> {
    let theme = theme::find(&row.theme);
    let Some(mut options) = ChartOptions::for_kind(&row.kind, &theme) else {
        bail!("unknown chart type '{}'", row.kind);
    };
    options.common_mut().width = row.width;
    options.common_mut().height = row.height;

    let mut spark = Sparkline::new(&row.values, options, (100, 20), 2.0)?;
    if !spark.render() {
        bail!("nothing to draw for '{}'", row.name);
    }

    let (w, h) = (spark.canvas().pixel_width() as u32, spark.canvas().pixel_height() as u32);
    let pixels = spark.pixels_rgba8()?;
    let img = image::RgbaImage::from_raw(w, h, pixels).context("pixel buffer does not match the surface")?;
    let out = out_dir.join(format!("{}.png", row.name));
    img.save(&out).with_context(|| format!("writing {}", out.display()))?;

    // Sweep the pointer along the vertical middle and report each change.
    let mid = spark.canvas().height() as f64 / 2.0;
    for x in 0..spark.canvas().width() {
        if spark.pointer_moved(x as f64, mid) {
            if let Some(text) = spark.tooltip(&format_fields) {
                println!("  {} @ x={x}: {text}", row.name);
            }
        }
    }
    spark.pointer_left();
    Ok(out)
}

fn format_fields(fields: &[RegionField]) -> String {
    fields
        .iter()
        .map(|f| {
            let value = f.value.map_or_else(|| "null".to_string(), |v| format!("{v}"));
            match (f.key, f.percent) {
                (Some(key), _) => format!("{}: {value}", key.as_str()),
                (None, Some(pct)) => format!("{value} ({pct:.1}%)"),
                (None, None) => value,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
