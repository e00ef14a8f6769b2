// ============================================================
// Layer 6 — Experiment Layout
// ============================================================
// Every artefact of a run lives under one root, split by kind
// and keyed by experiment name:
//
//   <root>/
//     <result_dir>/<name>/<sub>/   ← metric summaries, histories, plots
//     <ckpt_dir>/<name>/           ← checkpoints (JSON)
//
// Writers never create these directories on their own.
// Call ensure_dirs() once at startup; after that a missing
// directory surfaces as an I/O error naming the path.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Where a run writes its results and checkpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub root:       PathBuf,
    pub result_dir: String,
    pub ckpt_dir:   String,
    pub name:       String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            root:       PathBuf::from("."),
            result_dir: "results".to_string(),
            ckpt_dir:   "checkpoints".to_string(),
            name:       "default".to_string(),
        }
    }
}

impl ExperimentConfig {
    /// `<root>/<result_dir>/<name>/<sub>`
    ///
    /// `.` components of `sub` are dropped, so `"."` and `""` name the
    /// experiment's results directory itself.
    pub fn results_dir(&self, sub: &str) -> PathBuf {
        let base = self.root.join(&self.result_dir).join(&self.name);
        Path::new(sub)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .fold(base, |dir, c| dir.join(c))
    }

    /// `<root>/<ckpt_dir>/<name>`
    pub fn checkpoint_dir(&self) -> PathBuf {
        self.root.join(&self.ckpt_dir).join(&self.name)
    }

    /// Create the results sub-directory and the checkpoint directory.
    pub fn ensure_dirs(&self, sub: &str) -> Result<()> {
        for dir in [self.results_dir(sub), self.checkpoint_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        }
        tracing::debug!("Experiment directories ready under '{}'", self.root.display());
        Ok(())
    }
}
