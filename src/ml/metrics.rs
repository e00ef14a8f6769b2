// ============================================================
// Layer 5 — Evaluation Metrics
// ============================================================
// Metrics computed directly on burn tensors:
//
//   accuracy   — arg-max class per row vs. integer labels
//   val_check  — token-level matches in a [batch, length] grid
//
// Both return an error instead of dividing by zero or comparing
// tensors of mismatched shape.

use anyhow::{ensure, Result};
use burn::prelude::*;

/// Fraction of rows of `output` whose arg-max column equals `labels`.
///
/// `output` has shape [samples, classes]; `labels` has shape [samples].
pub fn accuracy<B: Backend>(output: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> Result<f64> {
    let [rows, _] = output.dims();
    let [n] = labels.dims();
    ensure!(n > 0, "accuracy is undefined for an empty label set");
    ensure!(rows == n, "output has {} rows but there are {} labels", rows, n);

    // argmax(1) returns [rows, 1]; flatten to [rows] before comparing
    let preds = output.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = preds.equal(labels).int().sum().into_scalar().elem::<i64>();

    Ok(correct as f64 / n as f64)
}

/// Count positions where `pred` equals `ans`.
///
/// Returns `(num_correct, batch * length)`.
pub fn val_check<B: Backend>(pred: Tensor<B, 2, Int>, ans: Tensor<B, 2, Int>) -> Result<(usize, usize)> {
    let [batch, length] = pred.dims();
    ensure!(
        ans.dims() == [batch, length],
        "prediction shape {:?} does not match answer shape {:?}",
        [batch, length],
        ans.dims()
    );

    let correct: i64 = pred.equal(ans).int().sum().into_scalar().elem::<i64>();
    Ok((correct as usize, batch * length))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn scores(rows: [[f32; 3]; 4]) -> Tensor<TestBackend, 2> {
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        Tensor::<TestBackend, 1>::from_floats(flat.as_slice(), &Default::default()).reshape([4, 3])
    }

    fn ints(values: &[i32]) -> Tensor<TestBackend, 1, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(values, &Default::default())
    }

    #[test]
    fn test_three_of_four_correct() {
        let output = scores([
            [0.9, 0.05, 0.05], // 0
            [0.1, 0.80, 0.10], // 1
            [0.2, 0.30, 0.50], // 2
            [0.7, 0.20, 0.10], // 0, label says 2
        ]);
        let acc = accuracy(output, ints(&[0, 1, 2, 2])).unwrap();
        assert!((acc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_rejects_empty_labels() {
        let output = Tensor::<TestBackend, 2>::zeros([0, 3], &Default::default());
        assert!(accuracy(output, ints(&[])).is_err());
    }

    #[test]
    fn test_accuracy_rejects_row_mismatch() {
        let output = scores([[1.0, 0.0, 0.0]; 4]);
        assert!(accuracy(output, ints(&[0, 0])).is_err());
    }

    #[test]
    fn test_val_check_counts_tokens() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 3, 4, 5, 6].as_slice(), &device).reshape([2, 3]);
        let ans  = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 3, 4, 5, 0].as_slice(), &device).reshape([2, 3]);

        assert_eq!(val_check(pred, ans).unwrap(), (4, 6));
    }

    #[test]
    fn test_val_check_shape_mismatch() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 2, Int>::zeros([2, 3], &device);
        let ans  = Tensor::<TestBackend, 2, Int>::zeros([3, 2], &device);
        assert!(val_check(pred, ans).is_err());
    }
}
