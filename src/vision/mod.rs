// ============================================================
// Layer 7 — Vision Layer
// ============================================================
// Face landmark helpers for the landmark dataset:
//
//   transform.rs — Normalised features → pixel keypoints
//   lips.rs      — Mouth contour overlay on an RgbImage

/// Undo landmark normalisation
pub mod transform;

/// Lip contour drawing
pub mod lips;
