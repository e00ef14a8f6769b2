//! Graph dataset preparation, metric tracking and face landmark
//! drawing for graph neural network experiments.
//!
//! Layers, outermost first:
//!
//! | module        | role                                        |
//! |---------------|---------------------------------------------|
//! | `cli`         | clap argument parsing and dispatch          |
//! | `application` | one use case per command                    |
//! | `domain`      | dataset types and the loader/listener seams |
//! | `data`        | file formats, normalisation, encodings      |
//! | `ml`          | burn tensors and accuracy                   |
//! | `infra`       | experiment layout, checkpoints, metrics     |
//! | `vision`      | landmark geometry and lip overlay           |

#![recursion_limit = "256"]

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;
pub mod vision;
