// ============================================================
// Layer 5 — ML / Tensor Layer (Burn)
// ============================================================
// Everything that touches burn lives here. Other layers hand
// over ndarray matrices and index lists and get tensors back.
//
//   tensors.rs — GraphDataset → burn tensors
//                (adjacency, features, labels, split indices)
//
//   metrics.rs — Classification accuracy and prediction/answer
//                agreement counts on tensors
//
// Reference: Burn Book §3 (Building Blocks)

/// Dataset-to-tensor conversion
pub mod tensors;

/// Accuracy and agreement counts
pub mod metrics;

/// CPU backend used by the command-line tools
pub type CpuBackend = burn::backend::NdArray;
