// ============================================================
// Layer 7 — Keypoint Restoration
// ============================================================
// Landmark targets are stored normalised: centred on a mean
// position, rotated to remove head tilt and scaled to unit
// size. Undoing that gives pixel coordinates again:
//
//   features × scale ──► [x₀ … xₙ₋₁ | y₀ … yₙ₋₁]
//        │
//        ▼  rotate by tilt
//   x' =  x·cos θ + y·sin θ
//   y' = −x·sin θ + y·cos θ
//        │
//        ▼  translate
//   (x' + mean.x, y' + mean.y) ──► truncate to i32
//
// Reference: Rust Book §13 (Iterators)

use anyhow::{ensure, Result};

/// Map normalised landmark features back to integer pixel
/// positions. The first half of `features` holds x values, the
/// second half y values. `tilt` is in radians.
pub fn original_keypoints(
    features: &[f64],
    scale:    f64,
    tilt:     f64,
    mean:     [f64; 2],
) -> Result<Vec<[i32; 2]>> {
    ensure!(
        features.len() % 2 == 0,
        "landmark features must split into x and y halves, got {} values",
        features.len()
    );

    let half = features.len() / 2;
    let (xs, ys) = features.split_at(half);
    let (sin, cos) = tilt.sin_cos();

    Ok(xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let (x, y) = (x * scale, y * scale);
            let rx = x * cos + y * sin;
            let ry = -x * sin + y * cos;
            // `as` truncates toward zero
            [(rx + mean[0]) as i32, (ry + mean[1]) as i32]
        })
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_transform() {
        let pts = original_keypoints(&[1.0, 2.0, 3.0, 4.0], 1.0, 0.0, [0.0, 0.0]).unwrap();
        assert_eq!(pts, vec![[1, 3], [2, 4]]);
    }

    #[test]
    fn test_scale_and_translate() {
        let pts = original_keypoints(&[0.5, -0.5, 0.25, 0.0], 10.0, 0.0, [100.0, 50.0]).unwrap();
        assert_eq!(pts, vec![[105, 52], [95, 50]]);
    }

    #[test]
    fn test_quarter_turn() {
        // (1, 0) rotated by +90° becomes (0, -1)
        let pts = original_keypoints(&[1.0, 0.0], 1.0, FRAC_PI_2, [10.0, 10.0]).unwrap();
        assert_eq!(pts, vec![[10, 9]]);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let pts = original_keypoints(&[-1.7, 2.9], 1.0, 0.0, [0.0, 0.0]).unwrap();
        assert_eq!(pts, vec![[-1, 2]]);
    }

    #[test]
    fn test_odd_length_fails() {
        assert!(original_keypoints(&[1.0, 2.0, 3.0], 1.0, 0.0, [0.0, 0.0]).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(original_keypoints(&[], 1.0, 0.3, [5.0, 5.0]).unwrap().is_empty());
    }
}
