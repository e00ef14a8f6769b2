// ============================================================
// Layer 6 — Checkpoint Store
// ============================================================
// Saves and restores arbitrary serialisable training state
// (optimiser settings, dataset summaries, epoch counters, …)
// as pretty-printed JSON.
//
// File naming convention:
//   <root>/<ckpt_dir>/<name>/
//     <label>.json      ← one file per caller-chosen label
//
// Saving and loading resolve the same directory, so whatever
// was written under a label can be read back under it.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::PathBuf};

use crate::infra::experiment::ExperimentConfig;

/// Reads and writes labelled checkpoints in one directory.
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    /// Store rooted at the experiment's checkpoint directory.
    pub fn new(cfg: &ExperimentConfig) -> Self {
        Self { dir: cfg.checkpoint_dir() }
    }

    /// Path of the file for `label`
    pub fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.json"))
    }

    /// Serialise `state` under `label`, replacing any earlier file.
    ///
    /// The directory must already exist.
    pub fn save<T: Serialize>(&self, label: &str, state: &T) -> Result<()> {
        let path = self.path_for(label);
        let json = serde_json::to_string_pretty(state)
            .with_context(|| format!("Cannot serialise checkpoint '{label}'"))?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint '{}'", path.display());
        Ok(())
    }

    /// Restore the state saved under `label`.
    pub fn load<T: DeserializeOwned>(&self, label: &str) -> Result<T> {
        let path = self.path_for(label);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read checkpoint '{}'", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Checkpoint '{}' does not match the expected type", path.display()))
    }
}
