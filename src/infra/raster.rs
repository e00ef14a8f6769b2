// ============================================================
// Layer 6 — Raster Primitives
// ============================================================
// Pixel-level drawing on image::RgbImage shared by the plot
// renderer and the landmark overlay:
//
//   draw_line        1-px Bresenham segment
//   draw_thick_line  segment stamped with a disc at every step
//   fill_disc        filled circle
//   draw_text        5×7 bitmap glyphs, scaled by an integer
//
// Coordinates are signed. Segments are clipped to the image
// (Liang–Barsky) before they are walked, and single pixels are
// clipped again on write, so callers never need to pre-clip.

use image::{Rgb, RgbImage};

/// Width of one glyph cell in font pixels (5 + 1 spacing)
pub const GLYPH_ADVANCE: u32 = 6;

/// Height of one glyph in font pixels
pub const GLYPH_HEIGHT: u32 = 7;

/// Set one pixel if it lies inside the image.
pub fn put_clipped(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < img.width() as u64 && (y as u64) < img.height() as u64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line from (x0, y0) to (x1, y1), both ends included.
pub fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let Some((from, to)) = clip_to_image(img, from, to, 0) else { return };
    for_each_line_point(from, to, |x, y| put_clipped(img, x, y, color));
}

/// Line of the given thickness. A thickness of 1 is a plain line.
pub fn draw_thick_line(
    img: &mut RgbImage,
    from: (i64, i64),
    to: (i64, i64),
    color: Rgb<u8>,
    thickness: u32,
) {
    if thickness <= 1 {
        draw_line(img, from, to, color);
        return;
    }
    let radius = (thickness / 2) as i64;
    let Some((from, to)) = clip_to_image(img, from, to, radius) else { return };
    for_each_line_point(from, to, |x, y| fill_disc(img, (x, y), radius, color));
}

/// Filled circle of `radius` around `center`. Radius 0 is one pixel.
pub fn fill_disc(img: &mut RgbImage, (cx, cy): (i64, i64), radius: i64, color: Rgb<u8>) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put_clipped(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Draw `text` with its top-left corner at `origin`.
///
/// Lowercase letters render as uppercase; characters without a
/// glyph render as '?'.
pub fn draw_text(img: &mut RgbImage, origin: (i64, i64), text: &str, scale: u32, color: Rgb<u8>) {
    let scale = scale.max(1) as i64;
    let mut pen_x = origin.0;

    for ch in text.chars() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let px = pen_x + col as i64 * scale;
                let py = origin.1 + row as i64 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        put_clipped(img, px + sx, py + sy, color);
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE as i64 * scale;
    }
}

/// Pixel width of `text` at `scale`
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_ADVANCE * scale.max(1)
}

/// Clip a segment to the image grown by `pad` pixels on each side.
/// `None` when no part of it can touch the image.
fn clip_to_image(
    img: &RgbImage,
    from: (i64, i64),
    to: (i64, i64),
    pad: i64,
) -> Option<((i64, i64), (i64, i64))> {
    if img.width() == 0 || img.height() == 0 {
        return None;
    }
    let (xmin, ymin) = (-pad as f64, -pad as f64);
    let xmax = (img.width() as i64 - 1 + pad) as f64;
    let ymax = (img.height() as i64 - 1 + pad) as f64;

    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [(-dx, x0 - xmin), (dx, xmax - x0), (-dy, y0 - ymin), (dy, ymax - y0)] {
        if p == 0.0 {
            // Parallel to this edge and outside it
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    let start = if t0 == 0.0 { from } else { at(t0) };
    let end   = if t1 == 1.0 { to } else { at(t1) };
    Some((start, end))
}

fn for_each_line_point(
    (x0, y0): (i64, i64),
    (x1, y1): (i64, i64),
    mut plot: impl FnMut(i64, i64),
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// 5×7 glyph rows, most significant of the low five bits on the left.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        ' ' => [0x00; 7],
        _   => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}
