// ============================================================
// Layer 6 — Plot Renderer
// ============================================================
// Rasterises a numeric series to an image file:
//
//   plot_1d   y = data[i] against x = 1..=len
//   plot_2d   y[i] against x[i] for two paired series
//
// Layout of the canvas:
//
//   ┌──────────────────────────────┐
//   │ y_label                      │
//   │ ymax ┌───────────────────┐   │
//   │      │   ·  ·    ·       │   │
//   │      │ ·      ·    ·  ·  │   │
//   │ ymin └───────────────────┘   │
//   │      xmin   x_label   xmax   │
//   └──────────────────────────────┘
//
// Rendering settings come from an explicit PlotConfig. There is
// no global backend state. The canvas is an owned RgbImage that
// is dropped on every exit path, whether or not saving succeeds.
//
// Reference: Rust Book §15 (Drop trait)
//            image crate documentation

use anyhow::{ensure, Context, Result};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::raster::{self, GLYPH_HEIGHT};

/// Canvas and styling for rendered plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub width:        u32,
    pub height:       u32,
    /// Space left for tick values and axis labels
    pub margin:       u32,
    /// Radius of scatter markers in pixels
    pub point_radius: u32,
    /// Integer scale of the 5×7 label font
    pub font_scale:   u32,
    /// File extension, which also selects the encoder ("jpg", "png", …)
    pub format:       String,
    pub background:   [u8; 3],
    pub foreground:   [u8; 3],
    pub series:       [u8; 3],
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width:        640,
            height:       480,
            margin:       64,
            point_radius: 2,
            font_scale:   2,
            format:       "jpg".to_string(),
            background:   [255, 255, 255],
            foreground:   [0, 0, 0],
            series:       [31, 119, 180],
        }
    }
}

/// Optional axis titles
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisLabels<'a> {
    pub x: Option<&'a str>,
    pub y: Option<&'a str>,
}

/// Plot `data` against its 1-based position and save it as
/// `<dir>/<name>.<format>`. Returns the written path.
pub fn plot_1d(
    cfg:     &PlotConfig,
    dir:     &Path,
    name:    &str,
    data:    &[f64],
    scatter: bool,
    labels:  AxisLabels<'_>,
) -> Result<PathBuf> {
    let xs: Vec<f64> = (1..=data.len()).map(|i| i as f64).collect();
    plot_2d(cfg, dir, name, &xs, data, scatter, labels)
}

/// Plot `y` against `x`. Both series must have the same length.
pub fn plot_2d(
    cfg:     &PlotConfig,
    dir:     &Path,
    name:    &str,
    x:       &[f64],
    y:       &[f64],
    scatter: bool,
    labels:  AxisLabels<'_>,
) -> Result<PathBuf> {
    ensure!(
        x.len() == y.len(),
        "cannot plot {} x values against {} y values",
        x.len(),
        y.len()
    );

    let canvas = render(cfg, x, y, scatter, labels)?;
    let path = dir.join(format!("{name}.{}", cfg.format));
    canvas
        .save(&path)
        .with_context(|| format!("Cannot save plot to '{}'", path.display()))?;

    tracing::debug!("Saved {} point plot to '{}'", x.len(), path.display());
    Ok(path)
}

/// Draw the plot into a fresh canvas.
pub fn render(
    cfg:     &PlotConfig,
    x:       &[f64],
    y:       &[f64],
    scatter: bool,
    labels:  AxisLabels<'_>,
) -> Result<RgbImage> {
    ensure!(
        cfg.width > 2 * cfg.margin && cfg.height > 2 * cfg.margin,
        "plot of {}x{} leaves no room inside a {} px margin",
        cfg.width,
        cfg.height,
        cfg.margin
    );

    let fg     = Rgb(cfg.foreground);
    let series = Rgb(cfg.series);
    let mut img = RgbImage::from_pixel(cfg.width, cfg.height, Rgb(cfg.background));

    let area = PlotArea {
        left:   cfg.margin as i64,
        right:  (cfg.width - cfg.margin / 2) as i64,
        top:    (cfg.margin / 2) as i64,
        bottom: (cfg.height - cfg.margin) as i64,
    };

    // Axes box
    let corners = [
        (area.left, area.top),
        (area.right, area.top),
        (area.right, area.bottom),
        (area.left, area.bottom),
    ];
    for i in 0..4 {
        raster::draw_line(&mut img, corners[i], corners[(i + 1) % 4], fg);
    }

    // Only finite pairs take part in scaling and drawing
    let points: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .map(|(&a, &b)| (a, b))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect();
    if points.len() < x.len() {
        tracing::warn!("Skipping {} non-finite points", x.len() - points.len());
    }

    let xr = Span::of(points.iter().map(|p| p.0));
    let yr = Span::of(points.iter().map(|p| p.1));

    let pixels: Vec<(i64, i64)> = points
        .iter()
        .map(|&(a, b)| {
            (
                area.left + (xr.fraction(a) * (area.right - area.left) as f64).round() as i64,
                area.bottom - (yr.fraction(b) * (area.bottom - area.top) as f64).round() as i64,
            )
        })
        .collect();

    if scatter {
        for &p in &pixels {
            raster::fill_disc(&mut img, p, cfg.point_radius as i64, series);
        }
    } else {
        for pair in pixels.windows(2) {
            raster::draw_line(&mut img, pair[0], pair[1], series);
        }
        if let [only] = pixels.as_slice() {
            raster::fill_disc(&mut img, *only, 0, series);
        }
    }

    // Tick values and titles
    let s = cfg.font_scale;
    let glyph_h = (GLYPH_HEIGHT * s.max(1)) as i64;
    let gap = 4;
    if !points.is_empty() {
        let (xmin, xmax) = (format_tick(xr.lo), format_tick(xr.hi));
        let (ymin, ymax) = (format_tick(yr.lo), format_tick(yr.hi));
        let below = area.bottom + gap;

        raster::draw_text(&mut img, (area.left, below), &xmin, s, fg);
        raster::draw_text(&mut img, (area.right - raster::text_width(&xmax, s) as i64, below), &xmax, s, fg);
        raster::draw_text(&mut img, (area.left - gap - raster::text_width(&ymin, s) as i64, area.bottom - glyph_h), &ymin, s, fg);
        raster::draw_text(&mut img, (area.left - gap - raster::text_width(&ymax, s) as i64, area.top), &ymax, s, fg);
    }
    if let Some(label) = labels.x {
        let mid = (area.left + area.right) / 2 - raster::text_width(label, s) as i64 / 2;
        raster::draw_text(&mut img, (mid, area.bottom + gap * 2 + glyph_h), label, s, fg);
    }
    if let Some(label) = labels.y {
        raster::draw_text(&mut img, (gap, (area.top - glyph_h) / 2), label, s, fg);
    }

    Ok(img)
}

struct PlotArea {
    left:   i64,
    right:  i64,
    top:    i64,
    bottom: i64,
}

/// Closed value range of one axis
struct Span {
    lo: f64,
    hi: f64,
}

impl Span {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo > hi {
            // No values at all
            Span { lo: 0.0, hi: 1.0 }
        } else if lo == hi {
            Span { lo: lo - 0.5, hi: hi + 0.5 }
        } else {
            Span { lo, hi }
        }
    }

    /// Position of `v` within the span, in [0, 1]
    fn fraction(&self, v: f64) -> f64 {
        (v - self.lo) / (self.hi - self.lo)
    }
}

/// Short tick text: plain decimals for ordinary magnitudes,
/// scientific notation for very large or very small ones.
fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) {
        format!("{v:.2e}")
    } else {
        let s = format!("{v:.3}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    }
}
