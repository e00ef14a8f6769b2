// ============================================================
// Layer 5 — Graph → Burn Tensors
// ============================================================
// Densifies a preprocessed GraphDataset into burn tensors on a
// chosen device, ready for a GCN forward pass.
//
//   adjacency  [N, N]      Float
//   features   [N, F]      Float
//   labels     [N]         Int     (class indices)
//          or  [N, T]      Float   (regression targets)
//   idx_*      [len]       Int
//
// Tensors are built flat with from_floats / from_ints and then
// reshaped to their final shape.
//
// Reference: Burn Book §3 (Tensors)

use burn::prelude::*;

use crate::domain::dataset::{GraphDataset, Labels};

/// Label tensor for either label flavour
#[derive(Debug, Clone)]
pub enum LabelTensor<B: Backend> {
    Classes(Tensor<B, 1, Int>),
    Targets(Tensor<B, 2>),
}

/// All tensors of one graph dataset on one device
#[derive(Debug, Clone)]
pub struct GraphTensors<B: Backend> {
    pub adjacency: Tensor<B, 2>,
    pub features:  Tensor<B, 2>,
    pub labels:    LabelTensor<B>,
    pub idx_train: Tensor<B, 1, Int>,
    pub idx_val:   Tensor<B, 1, Int>,
    pub idx_test:  Tensor<B, 1, Int>,
}

impl GraphDataset {
    /// Copy every matrix and index list onto `device`.
    pub fn to_tensors<B: Backend>(&self, device: &B::Device) -> GraphTensors<B> {
        let labels = match &self.labels {
            Labels::Classes(classes) => LabelTensor::Classes(index_tensor(classes, device)),
            Labels::Targets(targets) => LabelTensor::Targets(matrix_tensor(targets, device)),
        };

        GraphTensors {
            adjacency: matrix_tensor(&self.adjacency, device),
            features:  matrix_tensor(&self.features, device),
            labels,
            idx_train: index_tensor(&self.splits.train, device),
            idx_val:   index_tensor(&self.splits.val, device),
            idx_test:  index_tensor(&self.splits.test, device),
        }
    }
}

/// Row-major copy of a dense matrix
pub fn matrix_tensor<B: Backend>(m: &ndarray::Array2<f32>, device: &B::Device) -> Tensor<B, 2> {
    let (rows, cols) = m.dim();
    // iter() walks in logical (row-major) order regardless of layout
    let flat: Vec<f32> = m.iter().copied().collect();
    Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([rows, cols])
}

/// 1-D Int tensor from node indices
pub fn index_tensor<B: Backend>(indices: &[usize], device: &B::Device) -> Tensor<B, 1, Int> {
    let ints: Vec<i32> = indices.iter().map(|&i| i as i32).collect();
    Tensor::<B, 1, Int>::from_ints(ints.as_slice(), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{DatasetKind, Splits};
    use burn::backend::NdArray;
    use ndarray::array;

    type TestBackend = NdArray;

    fn dataset(labels: Labels) -> GraphDataset {
        GraphDataset {
            kind:      DatasetKind::Cora,
            adjacency: array![[0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, 0.0, 1.0]],
            features:  array![[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]],
            labels,
            splits:    Splits { train: vec![0, 1], val: vec![2], test: vec![] },
        }
    }

    #[test]
    fn test_shapes_and_values() {
        let device = Default::default();
        let t = dataset(Labels::Classes(vec![1, 0, 1])).to_tensors::<TestBackend>(&device);

        assert_eq!(t.adjacency.dims(), [3, 3]);
        assert_eq!(t.features.dims(), [3, 2]);
        assert_eq!(t.idx_train.dims(), [2]);
        assert_eq!(t.idx_test.dims(), [0]);

        let feats = t.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(feats, vec![1.0, 0.0, 0.0, 1.0, 0.5, 0.5]);

        match t.labels {
            LabelTensor::Classes(c) => {
                let c: Vec<i64> = c.into_data().convert::<i64>().to_vec().unwrap();
                assert_eq!(c, vec![1, 0, 1]);
            }
            LabelTensor::Targets(_) => panic!("expected class labels"),
        }
    }

    #[test]
    fn test_target_labels() {
        let device = Default::default();
        let targets = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];
        let t = dataset(Labels::Targets(targets)).to_tensors::<TestBackend>(&device);

        match t.labels {
            LabelTensor::Targets(x) => assert_eq!(x.dims(), [3, 2]),
            LabelTensor::Classes(_) => panic!("expected targets"),
        }
    }

    #[test]
    fn test_transposed_layout_is_copied_row_major() {
        let device = Default::default();
        let m = array![[1.0f32, 2.0], [3.0, 4.0]].reversed_axes();
        let t = matrix_tensor::<TestBackend>(&m, &device);
        assert_eq!(t.into_data().to_vec::<f32>().unwrap(), vec![1.0, 3.0, 2.0, 4.0]);
    }
}
