// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   experiment.rs — Directory layout of a run
//                   (<root>/<result_dir>/<name>/…,
//                    <root>/<ckpt_dir>/<name>/…)
//
//   checkpoint.rs — Saving and loading arbitrary serialisable
//                   state as JSON, keyed by a label
//
//   metrics.rs    — Running metric tracker with optional full
//                   history, listeners, text/CSV persistence
//                   and plotting
//
//   plot.rs       — Scatter and line plots rendered to image files
//
//   raster.rs     — Lines, discs and bitmap text on RgbImage,
//                   shared by plots and landmark overlays
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Experiment directory layout
pub mod experiment;

/// Labelled JSON checkpoints
pub mod checkpoint;

/// Metric tracker and listeners
pub mod metrics;

/// Plot rendering
pub mod plot;

/// Pixel drawing primitives
pub mod raster;
