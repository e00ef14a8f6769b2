// ============================================================
// Layer 4 — Facial Landmark Graph Loader
// ============================================================
// Loads the face-landmark graph, which ships already split and
// serialised as JSON blobs:
//
//   nodes.json         [[id, feat_1 … feat_k, target_1 … target_20], …]
//   edges.json         [n_0^0, n_0^1, n_0^2, n_0^3, n_1^0, …]
//   train_indice.json  [i, …]
//   eval_indice.json   [i, …]
//   test_indice.json   [i, …]
//
// Every node has a fixed number of neighbours (4 by default), so
// the edge blob is a flattened [num_nodes × degree] array.
// The adjacency is a plain 0/1 matrix. Unlike the citation path it
// is not symmetrised or degree-normalised.

use anyhow::{bail, ensure, Context, Result};
use ndarray::{s, Array2};
use serde::de::DeserializeOwned;
use std::{fs, path::{Path, PathBuf}};

use crate::data::normalize;
use crate::domain::dataset::{DatasetKind, GraphDataset, Labels, Splits};
use crate::domain::traits::GraphSource;

/// Width of the regression target block at the end of each node row
pub const DEFAULT_LABEL_WIDTH: usize = 20;

/// Neighbours listed per node in `edges.json`
pub const DEFAULT_DEGREE: usize = 4;

pub struct LandmarkLoader {
    dir:         PathBuf,
    label_width: usize,
    degree:      usize,
}

impl LandmarkLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir:         dir.into(),
            label_width: DEFAULT_LABEL_WIDTH,
            degree:      DEFAULT_DEGREE,
        }
    }

    pub fn with_label_width(mut self, label_width: usize) -> Self {
        self.label_width = label_width;
        self
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    fn read_indices(&self, file: &str, num_nodes: usize) -> Result<Vec<usize>> {
        let path = self.dir.join(file);
        let indices: Vec<usize> = read_json(&path)?;
        if let Some(&bad) = indices.iter().find(|&&i| i >= num_nodes) {
            bail!(
                "'{}' refers to node {} but the graph has {} nodes",
                path.display(),
                bad,
                num_nodes
            );
        }
        Ok(indices)
    }
}

impl GraphSource for LandmarkLoader {
    fn load(&self) -> Result<GraphDataset> {
        let nodes_path = self.dir.join("nodes.json");
        let rows: Vec<Vec<f32>> = read_json(&nodes_path)?;
        let num_nodes = rows.len();

        let width = rows.first().map(Vec::len).unwrap_or(0);
        ensure!(
            width > self.label_width,
            "'{}': rows have {} columns, need an id column plus {} targets",
            nodes_path.display(),
            width,
            self.label_width
        );
        if let Some(row) = rows.iter().position(|r| r.len() != width) {
            bail!(
                "'{}': row {} has {} columns, expected {}",
                nodes_path.display(),
                row,
                rows[row].len(),
                width
            );
        }

        let table = Array2::from_shape_vec(
            (num_nodes, width),
            rows.into_iter().flatten().collect(),
        )?;
        let feature_end = width.saturating_sub(self.label_width);
        let features = normalize::normalize_features(&table.slice(s![.., 1..feature_end]).to_owned());
        let targets  = table.slice(s![.., feature_end..]).to_owned();

        let edges_path = self.dir.join("edges.json");
        let edges: Vec<usize> = read_json(&edges_path)?;
        let adjacency = neighbour_adjacency(num_nodes, self.degree, &edges)
            .with_context(|| format!("Bad neighbour list in '{}'", edges_path.display()))?;

        let splits = Splits {
            train: self.read_indices("train_indice.json", num_nodes)?,
            val:   self.read_indices("eval_indice.json", num_nodes)?,
            test:  self.read_indices("test_indice.json", num_nodes)?,
        };

        tracing::debug!(
            "Face graph: {} nodes, {} features, {} targets",
            num_nodes,
            features.ncols(),
            targets.ncols()
        );

        Ok(GraphDataset {
            kind: DatasetKind::Face,
            adjacency,
            features,
            labels: Labels::Targets(targets),
            splits,
        })
    }
}

/// Dense 0/1 adjacency from a flattened fixed-degree neighbour array:
/// `adj[i, edges[i * degree + k]] = 1` for every k < degree.
pub fn neighbour_adjacency(num_nodes: usize, degree: usize, edges: &[usize]) -> Result<Array2<f32>> {
    ensure!(
        edges.len() == num_nodes * degree,
        "expected {} x {} = {} neighbour entries, found {}",
        num_nodes,
        degree,
        num_nodes * degree,
        edges.len()
    );

    let mut adj = Array2::<f32>::zeros((num_nodes, num_nodes));
    if degree == 0 {
        return Ok(adj);
    }
    for (node, neighbours) in edges.chunks(degree).enumerate() {
        for &n in neighbours {
            ensure!(n < num_nodes, "node {} lists neighbour {} out of range", node, n);
            adj[[node, n]] = 1.0;
        }
    }
    Ok(adj)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Cannot parse '{}'", path.display()))
}
