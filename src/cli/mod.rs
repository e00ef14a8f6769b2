// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands a config struct to the matching use case.
//
// Three commands are supported:
//   1. `prepare`   — load a graph dataset and summarise it
//   2. `report`    — summarise and plot a metric history
//   3. `landmarks` — draw restored mouth landmarks on an image
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, LandmarkArgs, PrepareArgs, ReportArgs};

#[derive(Parser, Debug)]
#[command(
    name = "graph-lab",
    version,
    about = "Prepare graph datasets, report training metrics and draw face landmarks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the use case for the chosen subcommand.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args)   => run_prepare(args),
            Commands::Report(args)    => run_report(args),
            Commands::Landmarks(args) => run_landmarks(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let summary = PrepareUseCase::new(args.into()).execute()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    use crate::application::report_use_case::ReportUseCase;

    let s = ReportUseCase::new(args.into()).execute()?;
    println!("max: {:.4}\nmin: {:.4}\navg: {:.4}", s.max, s.min, s.avg);
    Ok(())
}

fn run_landmarks(args: LandmarkArgs) -> Result<()> {
    use crate::application::landmark_use_case::LandmarkUseCase;

    let output = args.output.clone();
    let keypoints = LandmarkUseCase::new(args.into()).execute()?;
    println!("Drew {} keypoints to {}", keypoints.len(), output.display());
    Ok(())
}
