// ============================================================
// Layer 3 — Graph Dataset Domain Types
// ============================================================
// The shapes every loader produces and every consumer reads:
//
//   DatasetKind   — which on-disk format a dataset uses
//   Labels        — class indices or regression targets
//   SplitRanges   — configured train/val/test index ranges
//   Splits        — the resolved index lists
//   GraphDataset  — adjacency + features + labels + splits
//
// All matrices are dense ndarray::Array2<f32>. The citation
// graphs this crate targets (a few thousand nodes) fit
// comfortably in memory once densified.
//
// Reference: Kipf & Welling (2017) Semi-Supervised
//            Classification with Graph Convolutional Networks

use anyhow::{bail, ensure, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range, str::FromStr};

// ─── DatasetKind ──────────────────────────────────────────────────────────────
/// Every dataset identifier the loaders know about.
///
/// Matching on this enum is exhaustive, so a new dataset cannot
/// silently slip past the loader dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Citation graph in `.content` / `.cites` text format
    Cora,
    /// Facial landmark graph stored as JSON blobs
    Face,
    /// Recognised identifier with no loader yet
    Citeseer,
}

impl DatasetKind {
    /// Directory and file stem used on disk
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Cora     => "cora",
            DatasetKind::Face     => "face",
            DatasetKind::Citeseer => "citeseer",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cora"     => Ok(DatasetKind::Cora),
            "face"     => Ok(DatasetKind::Face),
            "citeseer" => Ok(DatasetKind::Citeseer),
            other      => bail!("unknown dataset '{other}' (expected cora, face or citeseer)"),
        }
    }
}

// ─── Labels ───────────────────────────────────────────────────────────────────
/// Node labels: either one class index per node, or a row of
/// continuous targets per node.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// Citation path — the class index of each node
    Classes(Vec<usize>),
    /// Face path — shape [num_nodes, target_width]
    Targets(Array2<f32>),
}

impl Labels {
    /// Number of labelled nodes
    pub fn len(&self) -> usize {
        match self {
            Labels::Classes(c) => c.len(),
            Labels::Targets(t) => t.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Splits ───────────────────────────────────────────────────────────────────
/// Half-open index ranges used to carve nodes into
/// train / validation / test subsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRanges {
    pub train: Range<usize>,
    pub val:   Range<usize>,
    pub test:  Range<usize>,
}

impl Default for SplitRanges {
    /// The fixed split used by the GCN citation benchmarks:
    /// 140 training nodes, 300 validation nodes, 1000 test nodes.
    fn default() -> Self {
        Self {
            train: 0..140,
            val:   200..500,
            test:  500..1500,
        }
    }
}

impl SplitRanges {
    /// Resolve the ranges against a graph of `num_nodes` nodes.
    pub fn resolve(&self, num_nodes: usize) -> Result<Splits> {
        for (label, range) in [("train", &self.train), ("val", &self.val), ("test", &self.test)] {
            ensure!(
                range.start <= range.end,
                "{label} split {}..{} is reversed",
                range.start,
                range.end
            );
            ensure!(
                range.end <= num_nodes,
                "{label} split {}..{} exceeds the {num_nodes} nodes in the graph",
                range.start,
                range.end
            );
        }

        Ok(Splits {
            train: self.train.clone().collect(),
            val:   self.val.clone().collect(),
            test:  self.test.clone().collect(),
        })
    }
}

/// Resolved node indices for each subset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splits {
    pub train: Vec<usize>,
    pub val:   Vec<usize>,
    pub test:  Vec<usize>,
}

// ─── GraphDataset ─────────────────────────────────────────────────────────────
/// A fully preprocessed graph ready to be turned into tensors.
#[derive(Debug, Clone)]
pub struct GraphDataset {
    pub kind:      DatasetKind,
    /// Shape [num_nodes, num_nodes]
    pub adjacency: Array2<f32>,
    /// Shape [num_nodes, feature_dim]
    pub features:  Array2<f32>,
    pub labels:    Labels,
    pub splits:    Splits,
}

impl GraphDataset {
    pub fn num_nodes(&self) -> usize {
        self.adjacency.nrows()
    }

    pub fn feature_dim(&self) -> usize {
        self.features.ncols()
    }

    /// Compact description for logs and checkpoints
    pub fn summary(&self) -> DatasetSummary {
        let (num_classes, target_width) = match &self.labels {
            Labels::Classes(c) => (c.iter().max().map(|m| m + 1), None),
            Labels::Targets(t) => (None, Some(t.ncols())),
        };

        DatasetSummary {
            dataset:      self.kind,
            num_nodes:    self.num_nodes(),
            num_edges:    self.adjacency.iter().filter(|&&w| w != 0.0).count(),
            feature_dim:  self.feature_dim(),
            num_classes,
            target_width,
            train_size:   self.splits.train.len(),
            val_size:     self.splits.val.len(),
            test_size:    self.splits.test.len(),
        }
    }
}

/// Serialisable overview of a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataset:      DatasetKind,
    pub num_nodes:    usize,
    /// Nonzero adjacency entries (self loops included)
    pub num_edges:    usize,
    pub feature_dim:  usize,
    pub num_classes:  Option<usize>,
    pub target_width: Option<usize>,
    pub train_size:   usize,
    pub val_size:     usize,
    pub test_size:    usize,
}
