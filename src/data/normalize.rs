// ============================================================
// Layer 4 — Graph Normalisation
// ============================================================
// Closed-form preprocessing applied before a graph is fed to a
// graph convolutional network:
//
//   symmetrize          A' = A + Aᵗ·(Aᵗ>A) − A·(Aᵗ>A)
//   add_self_loops      Ã  = A + I
//   normalize_adj       Â  = D^-1/2 Ã D^-1/2,  D = diag(rowsum(Ã))
//   normalize_features  X' = D^-1 X,           D = diag(rowsum(X))
//
// Degenerate rows never produce NaN or Inf: a zero row sum
// maps to a zero inverse, so the row stays all zeros.
//
// Reference: Kipf & Welling (2017), §2 "renormalization trick"

use anyhow::{ensure, Result};
use ndarray::{Array1, Array2, Axis};

/// Symmetric degree normalisation D^-1/2 A D^-1/2.
///
/// Rows whose sum is not positive get an inverse-sqrt-degree of 0,
/// so isolated nodes end up with an all-zero row and column.
pub fn normalize_adj(adj: &Array2<f32>) -> Array2<f32> {
    let inv_sqrt: Array1<f32> = adj
        .sum_axis(Axis(1))
        .mapv(|d| if d > 0.0 { d.powf(-0.5) } else { 0.0 });

    let mut out = adj.clone();
    for ((i, j), w) in out.indexed_iter_mut() {
        *w *= inv_sqrt[i] * inv_sqrt[j];
    }
    out
}

/// Row-stochastic normalisation: every row is divided by its sum.
///
/// Zero-sum rows are left as zeros.
pub fn normalize_features(features: &Array2<f32>) -> Array2<f32> {
    let inv: Array1<f32> = features
        .sum_axis(Axis(1))
        .mapv(|s| if s == 0.0 { 0.0 } else { 1.0 / s });

    let mut out = features.clone();
    for (mut row, &r) in out.axis_iter_mut(Axis(0)).zip(inv.iter()) {
        row *= r;
    }
    out
}

/// Make a directed adjacency undirected.
///
/// Wherever Aᵗ > A the transposed weight replaces the original,
/// which is the elementwise maximum of A and Aᵗ.
pub fn symmetrize(adj: &Array2<f32>) -> Result<Array2<f32>> {
    ensure!(
        adj.is_square(),
        "adjacency must be square, got {}x{}",
        adj.nrows(),
        adj.ncols()
    );

    let t = adj.t();
    let mut out = adj.clone();
    for ((i, j), w) in out.indexed_iter_mut() {
        let tw = t[[i, j]];
        if tw > *w {
            *w = tw;
        }
    }
    Ok(out)
}

/// A + I
pub fn add_self_loops(adj: &Array2<f32>) -> Array2<f32> {
    let mut out = adj.clone();
    out.diag_mut().mapv_inplace(|w| w + 1.0);
    out
}
