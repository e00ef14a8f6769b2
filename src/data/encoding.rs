// ============================================================
// Layer 4 — Label Encoding
// ============================================================
// Converts string class labels into a one-hot matrix and back
// into dense class indices.
//
// The class-to-column mapping follows the sorted order of the
// distinct labels, so a given label file always encodes the
// same way.

use ndarray::Array2;
use std::collections::BTreeMap;

/// One-hot encode `labels`.
///
/// Returns the `[labels.len(), num_classes]` matrix together with
/// the class names in column order.
pub fn encode_onehot(labels: &[String]) -> (Array2<f32>, Vec<String>) {
    let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        columns.entry(label.as_str()).or_insert(0);
    }
    for (col, slot) in columns.values_mut().enumerate() {
        *slot = col;
    }

    let mut onehot = Array2::<f32>::zeros((labels.len(), columns.len()));
    for (row, label) in labels.iter().enumerate() {
        onehot[[row, columns[label.as_str()]]] = 1.0;
    }

    let classes = columns.keys().map(|c| c.to_string()).collect();
    (onehot, classes)
}

/// Column of the first nonzero entry of every row.
///
/// An all-zero row maps to class 0.
pub fn onehot_to_indices(onehot: &Array2<f32>) -> Vec<usize> {
    onehot
        .rows()
        .into_iter()
        .map(|row| row.iter().position(|&v| v != 0.0).unwrap_or(0))
        .collect()
}
