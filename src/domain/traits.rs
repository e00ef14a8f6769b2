// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to dataset loaders and metric
// listeners through these traits only.
//
//   GraphSource    — anything that can produce a GraphDataset
//   UpdateListener — anything that observes a metric tracker
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::dataset::GraphDataset;

// ─── GraphSource ──────────────────────────────────────────────────────────────
/// Any component that can load a preprocessed graph dataset.
///
/// Implementations:
///   - CitationLoader → `.content` / `.cites` text files
///   - LandmarkLoader → JSON node/edge/index blobs
pub trait GraphSource {
    /// Read, parse and preprocess the dataset.
    fn load(&self) -> Result<GraphDataset>;
}

// ─── UpdateListener ───────────────────────────────────────────────────────────
/// State of a metric tracker captured around one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSnapshot {
    pub val:   f64,
    pub avg:   f64,
    pub sum:   f64,
    pub count: f64,
    pub max:   f64,
    pub min:   f64,
}

/// Receives `(previous, new)` snapshots once per tracker update.
///
/// Any `FnMut(&MeterSnapshot, &MeterSnapshot)` closure is a listener.
pub trait UpdateListener {
    fn notify(&mut self, prev: &MeterSnapshot, new: &MeterSnapshot);
}

impl<F> UpdateListener for F
where
    F: FnMut(&MeterSnapshot, &MeterSnapshot),
{
    fn notify(&mut self, prev: &MeterSnapshot, new: &MeterSnapshot) {
        self(prev, new)
    }
}
