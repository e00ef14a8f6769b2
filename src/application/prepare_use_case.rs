// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Runs the dataset pipeline once and reports what came out:
//
//   Step 1: Load and preprocess the dataset  (Layer 4 - data)
//   Step 2: Summarise it                     (Layer 3 - domain)
//   Step 3: Convert to burn tensors          (Layer 5 - ml)
//   Step 4: Save the summary (optional)      (Layer 6 - infra)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::load_dataset;
use crate::domain::dataset::{DatasetKind, DatasetSummary, SplitRanges};
use crate::infra::{checkpoint::CheckpointStore, experiment::ExperimentConfig};
use crate::ml::{tensors::LabelTensor, CpuBackend};

/// Checkpoint label the summary is stored under
pub const SUMMARY_LABEL: &str = "dataset_summary";

// ─── Prepare Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub dataset:      DatasetKind,
    pub data_root:    PathBuf,
    pub splits:       SplitRanges,
    pub experiment:   ExperimentConfig,
    pub save_summary: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset:      DatasetKind::Cora,
            data_root:    PathBuf::from("data"),
            splits:       SplitRanges::default(),
            experiment:   ExperimentConfig::default(),
            save_summary: false,
        }
    }
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<DatasetSummary> {
        let cfg = &self.config;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        let dataset = load_dataset(cfg.dataset, &cfg.data_root, &cfg.splits)?;

        // ── Step 2: Summarise ─────────────────────────────────────────────────
        let summary = dataset.summary();
        tracing::info!(
            "{}: {} edges, splits {}/{}/{}",
            summary.dataset,
            summary.num_edges,
            summary.train_size,
            summary.val_size,
            summary.test_size
        );

        // ── Step 3: Tensors ───────────────────────────────────────────────────
        let device = Default::default();
        let tensors = dataset.to_tensors::<CpuBackend>(&device);
        let n = dataset.num_nodes();

        ensure!(
            tensors.adjacency.dims() == [n, n],
            "adjacency tensor has shape {:?}, expected [{n}, {n}]",
            tensors.adjacency.dims()
        );
        ensure!(
            tensors.features.dims() == [n, dataset.feature_dim()],
            "feature tensor has shape {:?}",
            tensors.features.dims()
        );
        let label_rows = match &tensors.labels {
            LabelTensor::Classes(t) => t.dims()[0],
            LabelTensor::Targets(t) => t.dims()[0],
        };
        ensure!(label_rows == n, "{} label rows for {} nodes", label_rows, n);
        tracing::debug!("Tensors built for {} nodes", n);

        // ── Step 4: Persist ───────────────────────────────────────────────────
        if cfg.save_summary {
            cfg.experiment.ensure_dirs(".")?;
            let store = CheckpointStore::new(&cfg.experiment);
            store.save(SUMMARY_LABEL, &summary)?;
            tracing::info!("Summary saved to '{}'", store.path_for(SUMMARY_LABEL).display());
        }

        Ok(summary)
    }
}
