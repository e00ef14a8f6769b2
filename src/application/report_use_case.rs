// ============================================================
// Layer 2 — ReportUseCase
// ============================================================
// Rebuilds a metric from a saved history file and writes its
// report next to the other results of the experiment:
//
//   <metric>.csv ──► MetricTracker::load_array
//                        │
//                        ├──► <metric>.txt  (max / min)
//                        ├──► <metric>.csv  (history)
//                        └──► <metric>.jpg  (plot)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::traits::MeterSnapshot;
use crate::infra::{
    experiment::ExperimentConfig,
    metrics::{read_history, MetricTracker},
    plot::PlotConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// CSV with one value per line
    pub history:    PathBuf,
    /// Metric name; defaults to the history file's stem
    pub metric:     Option<String>,
    pub sub_dir:    String,
    pub x_label:    Option<String>,
    pub scatter:    bool,
    pub experiment: ExperimentConfig,
    pub plot:       PlotConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            history:    PathBuf::from("loss.csv"),
            metric:     None,
            sub_dir:    ".".to_string(),
            x_label:    Some("epoch".to_string()),
            scatter:    false,
            experiment: ExperimentConfig::default(),
            plot:       PlotConfig::default(),
        }
    }
}

pub struct ReportUseCase {
    config: ReportConfig,
}

impl ReportUseCase {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<MeterSnapshot> {
        let cfg = &self.config;

        let name = match &cfg.metric {
            Some(name) => name.clone(),
            None => cfg
                .history
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .with_context(|| format!("Cannot derive a metric name from '{}'", cfg.history.display()))?,
        };

        let values = read_history(&cfg.history)?;
        tracing::info!("Read {} values of '{}'", values.len(), name);

        let mut tracker = MetricTracker::new(&name, &cfg.experiment)
            .keep_history(true)
            .sub_dir(&cfg.sub_dir)
            .plot_config(cfg.plot.clone());
        if let Some(label) = &cfg.x_label {
            tracker = tracker.x_label(label);
        }

        cfg.experiment.ensure_dirs(&cfg.sub_dir)?;
        tracker.load_array(&values)?;
        tracker.save()?;
        tracker.plot(cfg.scatter)?;

        let snapshot = tracker.snapshot();
        tracing::info!("{}: max {:.4}, min {:.4}, avg {:.4}", name, snapshot.max, snapshot.min, snapshot.avg);
        Ok(snapshot)
    }
}
