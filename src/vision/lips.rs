// ============================================================
// Layer 7 — Lip Overlay
// ============================================================
// Draws the mouth of a 68-point facial landmark set (iBUG
// layout) onto an RgbImage:
//
//   48 ─ 49 ─ … ─ 59 ─ 48     outer lip contour
//   60 ─ 61 ─ … ─ 67 ─ 60     inner lip contour
//   48 ─ 60,  54 ─ 64         mouth corners joined
//
// A 20-point input is taken to be points 48..=67 alone.

use anyhow::{bail, Result};
use image::{Rgb, RgbImage};

use crate::infra::raster;

/// Number of points in a full facial landmark set
pub const FULL_LANDMARKS: usize = 68;

/// Index of the first mouth point in a full set
pub const MOUTH_START: usize = 48;

/// Number of mouth points
pub const MOUTH_POINTS: usize = 20;

/// Colour and stroke width of overlay lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color:     Rgb<u8>,
    pub thickness: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self { color: Rgb([255, 255, 255]), thickness: 1 }
    }
}

/// Segments of the mouth, as absolute landmark indices.
pub fn lip_segments() -> Vec<(usize, usize)> {
    let mut segments: Vec<(usize, usize)> = (48..59).map(|i| (i, i + 1)).collect();
    segments.extend([(48, 59), (48, 60), (54, 64), (67, 60)]);
    segments.extend((60..67).map(|i| (i, i + 1)));
    segments
}

/// Draw the mouth topology onto `img` and hand the buffer back.
///
/// `keypoints` is either the full 68-point set or just the 20
/// mouth points in order.
pub fn draw_lips<'a>(
    keypoints: &[[i32; 2]],
    img: &'a mut RgbImage,
    style: LineStyle,
) -> Result<&'a mut RgbImage> {
    let offset = match keypoints.len() {
        FULL_LANDMARKS => 0,
        MOUTH_POINTS => MOUTH_START,
        n => bail!(
            "expected {} landmarks or {} mouth points, got {}",
            FULL_LANDMARKS,
            MOUTH_POINTS,
            n
        ),
    };

    let point = |i: usize| {
        let [x, y] = keypoints[i - offset];
        (x as i64, y as i64)
    };
    for (a, b) in lip_segments() {
        raster::draw_thick_line(img, point(a), point(b), style.color, style.thickness);
    }

    Ok(img)
}
