// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `prepare`, `report` and
// `landmarks`, and all their configurable flags.
//
// Split ranges are written `start:end` (half-open), e.g.
//   --train 0:140 --val 200:500 --test 500:1500
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::{ops::Range, path::PathBuf};

use crate::application::{
    landmark_use_case::LandmarkConfig,
    prepare_use_case::PrepareConfig,
    report_use_case::ReportConfig,
};
use crate::domain::dataset::{DatasetKind, SplitRanges};
use crate::infra::{experiment::ExperimentConfig, plot::PlotConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and preprocess a graph dataset, then report its shape
    Prepare(PrepareArgs),

    /// Summarise and plot a saved metric history
    Report(ReportArgs),

    /// Restore mouth landmarks and draw them onto an image
    Landmarks(LandmarkArgs),
}

/// Where results and checkpoints go. Shared by `prepare` and `report`.
#[derive(Args, Debug)]
pub struct ExperimentArgs {
    /// Root directory of all experiment output
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Results directory under the root
    #[arg(long, default_value = "results")]
    pub result_dir: String,

    /// Checkpoint directory under the root
    #[arg(long, default_value = "checkpoints")]
    pub ckpt_dir: String,

    /// Experiment name, one directory level below results and checkpoints
    #[arg(long, default_value = "default")]
    pub name: String,
}

impl From<ExperimentArgs> for ExperimentConfig {
    fn from(a: ExperimentArgs) -> Self {
        ExperimentConfig {
            root:       a.root,
            result_dir: a.result_dir,
            ckpt_dir:   a.ckpt_dir,
            name:       a.name,
        }
    }
}

/// All arguments for the `prepare` command
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Dataset name: cora, face or citeseer
    #[arg(long, default_value = "cora")]
    pub dataset: DatasetKind,

    /// Directory holding one sub-directory per dataset
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    /// Training node range
    #[arg(long, default_value = "0:140", value_parser = parse_range)]
    pub train: Range<usize>,

    /// Validation node range
    #[arg(long, default_value = "200:500", value_parser = parse_range)]
    pub val: Range<usize>,

    /// Test node range
    #[arg(long, default_value = "500:1500", value_parser = parse_range)]
    pub test: Range<usize>,

    /// Save the dataset summary as a checkpoint
    #[arg(long)]
    pub save_summary: bool,

    #[command(flatten)]
    pub experiment: ExperimentArgs,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            dataset:      a.dataset,
            data_root:    a.data_root,
            splits:       SplitRanges { train: a.train, val: a.val, test: a.test },
            experiment:   a.experiment.into(),
            save_summary: a.save_summary,
        }
    }
}

/// All arguments for the `report` command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// History file, one value per line
    #[arg(long)]
    pub history: PathBuf,

    /// Metric name (defaults to the history file name)
    #[arg(long)]
    pub metric: Option<String>,

    /// Sub-directory below the experiment's results directory
    #[arg(long, default_value = ".")]
    pub sub_dir: String,

    /// Title of the x axis
    #[arg(long, default_value = "epoch")]
    pub x_label: String,

    /// Draw markers instead of a line
    #[arg(long)]
    pub scatter: bool,

    /// Plot image format (file extension)
    #[arg(long, default_value = "jpg")]
    pub format: String,

    #[command(flatten)]
    pub experiment: ExperimentArgs,
}

impl From<ReportArgs> for ReportConfig {
    fn from(a: ReportArgs) -> Self {
        ReportConfig {
            history:    a.history,
            metric:     a.metric,
            sub_dir:    a.sub_dir,
            x_label:    Some(a.x_label),
            scatter:    a.scatter,
            experiment: a.experiment.into(),
            plot:       PlotConfig { format: a.format, ..Default::default() },
        }
    }
}

/// All arguments for the `landmarks` command
#[derive(Args, Debug)]
pub struct LandmarkArgs {
    /// JSON array of normalised features (x values, then y values)
    #[arg(long)]
    pub features: PathBuf,

    /// Image to draw on
    #[arg(long)]
    pub image: PathBuf,

    /// Where to write the annotated image
    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Head tilt in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub tilt: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub mean_x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub mean_y: f64,

    /// Line thickness in pixels
    #[arg(long, default_value_t = 1)]
    pub thickness: u32,
}

impl From<LandmarkArgs> for LandmarkConfig {
    fn from(a: LandmarkArgs) -> Self {
        LandmarkConfig {
            features:  a.features,
            image:     a.image,
            output:    a.output,
            scale:     a.scale,
            tilt:      a.tilt,
            mean:      [a.mean_x, a.mean_y],
            thickness: a.thickness,
            ..Default::default()
        }
    }
}

/// Parse `start:end` into a half-open range.
fn parse_range(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected start:end, got '{s}'"))?;
    let start: usize = start.trim().parse().map_err(|e| format!("bad start '{start}': {e}"))?;
    let end: usize = end.trim().parse().map_err(|e| format!("bad end '{end}': {e}"))?;
    if start > end {
        return Err(format!("range {start}:{end} is reversed"));
    }
    Ok(start..end)
}
