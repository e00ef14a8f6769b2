// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case wires the lower layers together for one
// command-line task. No parsing, maths or drawing happens here.
//
//   prepare_use_case.rs  — load a dataset, check it converts to
//                          tensors, optionally save its summary
//
//   report_use_case.rs   — turn a saved metric history into a
//                          max/min summary and a plot
//
//   landmark_use_case.rs — restore mouth keypoints and draw them
//                          onto an image
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

pub mod prepare_use_case;

pub mod report_use_case;

pub mod landmark_use_case;
