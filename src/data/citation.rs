// ============================================================
// Layer 4 — Citation Graph Loader
// ============================================================
// Loads citation datasets stored as two whitespace-delimited
// text files inside one directory:
//
//   <name>.content   <paper_id> <feat_1> … <feat_k> <class_label>
//   <name>.cites     <paper_id> <paper_id>
//
// Pipeline:
//
//   .content ──► features (sparse bag-of-words, dense here)
//            ──► labels   (one-hot → class index)
//            ──► id map   (external paper id → 0..N-1)
//   .cites   ──► directed adjacency (duplicate edges accumulate)
//       │
//       ▼
//   symmetrize → normalize_features → add_self_loops → normalize_adj
//       │
//       ▼
//   GraphDataset with train/val/test from SplitRanges
//
// Neither file has a header. Column layout is implied by position.
//
// Reference: Sen et al. (2008) Collective Classification in
//            Network Data (Cora / CiteSeer)

use anyhow::{ensure, Context, Result};
use ndarray::Array2;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::data::{encoding, normalize};
use crate::domain::dataset::{DatasetKind, GraphDataset, Labels, SplitRanges};
use crate::domain::traits::GraphSource;

/// Loads `<dir>/<name>.content` and `<dir>/<name>.cites`.
///
/// `name` defaults to the dataset kind's name ("cora" → `cora.content`).
pub struct CitationLoader {
    dir:    PathBuf,
    kind:   DatasetKind,
    name:   String,
    splits: SplitRanges,
}

impl CitationLoader {
    pub fn new(dir: impl Into<PathBuf>, kind: DatasetKind, splits: SplitRanges) -> Self {
        Self {
            dir:  dir.into(),
            kind,
            name: kind.name().to_string(),
            splits,
        }
    }

    /// Read `<name>.content` / `<name>.cites` instead of the kind's default.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn content_path(&self) -> PathBuf {
        self.dir.join(format!("{}.content", self.name))
    }

    fn cites_path(&self) -> PathBuf {
        self.dir.join(format!("{}.cites", self.name))
    }
}

impl GraphSource for CitationLoader {
    fn load(&self) -> Result<GraphDataset> {
        let content = parse_content(&self.content_path())?;
        let num_nodes = content.ids.len();

        let id_map: HashMap<i64, usize> = content
            .ids
            .iter()
            .enumerate()
            .map(|(row, &id)| (id, row))
            .collect();
        if id_map.len() != num_nodes {
            tracing::warn!(
                "{} contains {} duplicate paper ids; later rows win",
                self.content_path().display(),
                num_nodes - id_map.len()
            );
        }

        let edges = parse_cites(&self.cites_path(), &id_map)?;
        tracing::debug!("Parsed {} nodes and {} citation edges", num_nodes, edges.len());

        // Duplicate citations accumulate, like summing a COO matrix
        let mut adj = Array2::<f32>::zeros((num_nodes, num_nodes));
        for &(src, dst) in &edges {
            adj[[src, dst]] += 1.0;
        }

        let adj      = normalize::symmetrize(&adj)?;
        let features = normalize::normalize_features(&content.features);
        let adj      = normalize::normalize_adj(&normalize::add_self_loops(&adj));

        let (onehot, classes) = encoding::encode_onehot(&content.labels);
        tracing::debug!("Found {} classes: {:?}", classes.len(), classes);
        let labels = Labels::Classes(encoding::onehot_to_indices(&onehot));

        let splits = self
            .splits
            .resolve(num_nodes)
            .with_context(|| format!("Invalid splits for dataset '{}'", self.name))?;

        Ok(GraphDataset {
            kind: self.kind,
            adjacency: adj,
            features,
            labels,
            splits,
        })
    }
}

/// Raw columns of a `.content` file
struct ContentTable {
    ids:      Vec<i64>,
    features: Array2<f32>,
    labels:   Vec<String>,
}

fn parse_content(path: &Path) -> Result<ContentTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut ids    = Vec::new();
    let mut flat   = Vec::new();
    let mut labels = Vec::new();
    let mut width: Option<usize> = None;

    for (lineno, line) in text.lines().enumerate() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.is_empty() {
            continue;
        }
        let at = || format!("{}:{}", path.display(), lineno + 1);

        ensure!(
            cols.len() >= 3,
            "{}: expected id, features and label, found {} columns",
            at(),
            cols.len()
        );

        let feats = &cols[1..cols.len() - 1];
        let expected = *width.get_or_insert(feats.len());
        ensure!(
            expected == feats.len(),
            "{}: expected {} features, found {}",
            at(),
            expected,
            feats.len()
        );

        ids.push(
            cols[0]
                .parse::<i64>()
                .with_context(|| format!("{}: paper id '{}' is not an integer", at(), cols[0]))?,
        );
        for f in feats {
            flat.push(
                f.parse::<f32>()
                    .with_context(|| format!("{}: feature '{}' is not numeric", at(), f))?,
            );
        }
        labels.push(cols[cols.len() - 1].to_string());
    }

    let width = width.unwrap_or(0);
    let features = Array2::from_shape_vec((ids.len(), width), flat)
        .with_context(|| format!("Feature matrix of '{}' is malformed", path.display()))?;

    Ok(ContentTable { ids, features, labels })
}

fn parse_cites(path: &Path, id_map: &HashMap<i64, usize>) -> Result<Vec<(usize, usize)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut edges = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.is_empty() {
            continue;
        }
        let at = || format!("{}:{}", path.display(), lineno + 1);

        ensure!(cols.len() == 2, "{}: expected 2 paper ids, found {}", at(), cols.len());

        let mut ends = [0usize; 2];
        for (slot, raw) in ends.iter_mut().zip(&cols) {
            let id: i64 = raw
                .parse()
                .with_context(|| format!("{}: paper id '{}' is not an integer", at(), raw))?;
            *slot = *id_map
                .get(&id)
                .with_context(|| format!("{}: paper id {} is not in the content file", at(), id))?;
        }
        edges.push((ends[0], ends[1]));
    }

    Ok(edges)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;
    use tempfile::TempDir;

    /// Four papers, two classes, a chain of citations 10 → 20 → 30
    /// plus a duplicate of the first one. Paper 40 is isolated.
    fn write_fixture(dir: &Path) {
        fs::write(
            dir.join("tiny.content"),
            "10\t1\t0\t1\tNeural\n\
             20\t0\t1\t0\tTheory\n\
             30\t1\t1\t0\tNeural\n\
             40\t0\t0\t0\tTheory\n",
        )
        .unwrap();
        fs::write(dir.join("tiny.cites"), "10\t20\n20\t30\n10\t20\n").unwrap();
    }

    fn small_splits() -> SplitRanges {
        SplitRanges { train: 0..2, val: 2..3, test: 3..4 }
    }

    #[test]
    fn test_loads_and_normalises() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());

        let ds = CitationLoader::new(tmp.path(), DatasetKind::Cora, small_splits()).with_name("tiny").load().unwrap();

        assert_eq!(ds.num_nodes(), 4);
        assert_eq!(ds.feature_dim(), 3);
        assert_eq!(ds.labels, Labels::Classes(vec![0, 1, 0, 1]));
        assert_eq!(ds.splits.train, vec![0, 1]);
        assert_eq!(ds.splits.test, vec![3]);

        // Feature rows sum to 1, the all-zero row stays zero
        assert_abs_diff_eq!(ds.features.row(0).sum(), 1.0, epsilon = 1e-6);
        assert!(ds.features.row(3).iter().all(|&v| v == 0.0));

        // Adjacency is symmetric after normalisation
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(ds.adjacency[[i, j]], ds.adjacency[[j, i]], epsilon = 1e-6);
            }
        }

        // Duplicate edge 10→20 counts twice: rowsum(0) = 2 + 1 = 3,
        // rowsum(1) = 2 + 1 + 1 = 4
        assert_abs_diff_eq!(ds.adjacency[[0, 1]], 2.0 / (3.0f32 * 4.0).sqrt(), epsilon = 1e-6);

        // The isolated paper only keeps its self loop
        assert_abs_diff_eq!(ds.adjacency[[3, 3]], 1.0, epsilon = 1e-6);
        assert_eq!(ds.adjacency[[3, 0]], 0.0);
    }

    #[test]
    fn test_unknown_cited_id_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        fs::write(tmp.path().join("tiny.cites"), "10\t99\n").unwrap();

        let err = CitationLoader::new(tmp.path(), DatasetKind::Cora, small_splits()).with_name("tiny")
            .load()
            .unwrap_err();
        assert!(format!("{err:#}").contains("99"));
    }

    #[test]
    fn test_ragged_feature_rows_are_rejected() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        fs::write(tmp.path().join("tiny.content"), "1 0 1 A\n2 1 B\n").unwrap();

        let err = CitationLoader::new(tmp.path(), DatasetKind::Cora, small_splits()).with_name("tiny")
            .load()
            .unwrap_err();
        assert!(format!("{err:#}").contains(":2"));
    }

    #[test]
    fn test_missing_files_fail() {
        let tmp = TempDir::new().unwrap();
        let loader = CitationLoader::new(tmp.path(), DatasetKind::Cora, small_splits()).with_name("absent");
        assert!(loader.load().is_err());
    }

    #[test]
    fn test_split_larger_than_graph_fails() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        // Default splits need 1500 nodes
        let loader = CitationLoader::new(tmp.path(), DatasetKind::Cora, SplitRanges::default()).with_name("tiny");
        assert!(loader.load().is_err());
    }

    #[test]
    fn test_dataset_kind_is_carried_through() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        let ds = CitationLoader::new(tmp.path(), DatasetKind::Citeseer, small_splits())
            .with_name("tiny")
            .load()
            .unwrap();
        assert_eq!(ds.kind, DatasetKind::Citeseer);
    }

    #[test]
    fn test_file_name_defaults_to_kind() {
        let tmp = TempDir::new().unwrap();
        write_fixture(tmp.path());
        fs::rename(tmp.path().join("tiny.content"), tmp.path().join("cora.content")).unwrap();
        fs::rename(tmp.path().join("tiny.cites"), tmp.path().join("cora.cites")).unwrap();

        let ds = CitationLoader::new(tmp.path(), DatasetKind::Cora, small_splits()).load().unwrap();
        assert_eq!(ds.kind, DatasetKind::Cora);
        assert_eq!(ds.num_nodes(), 4);
    }
}
