use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, Result};

/// Dense row-major matrix of `f64`.
///
/// Every transformation returns a new `Matrix`; operands are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Uniform samples in `[-1, 1]` drawn from the thread-local generator.
    pub fn random(rows: usize, cols: usize) -> Matrix {
        Matrix::random_with(rows, cols, &mut rand::thread_rng())
    }

    /// Uniform samples in `[-1, 1]` drawn from `rng`.
    pub fn random_with<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Wraps existing row data. Fails on empty input or rows of unequal length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(NetworkError::EmptyMatrix),
        };

        if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(NetworkError::RaggedRows {
                row,
                expected: cols,
                actual: r.len(),
            });
        }

        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// Column vector `[values.len() x 1]`.
    pub fn column(values: &[f64]) -> Result<Matrix> {
        Ok(Matrix::from_data(vec![values.to_vec()])?.transpose())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Row-major flatten.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(self.mismatch("multiply", other));
        }

        let mut res = Matrix::zeros(self.rows, other.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * other.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with("add", other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", other, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn dot_multiply(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with("dot_multiply", other, |a, b| a * b)
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// JSON form `{"rows": .., "cols": .., "data": [[..], ..]}`.
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses the form written by `serialize`, rejecting data whose shape
    /// disagrees with the declared `rows`/`cols`.
    pub fn deserialize(serialized: &str) -> Result<Matrix> {
        let raw: Matrix = serde_json::from_str(serialized)
            .map_err(|e| NetworkError::Format(e.to_string()))?;
        raw.validate()?;
        Ok(raw)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(NetworkError::Format(format!(
                "matrix must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.data.len() != self.rows {
            return Err(NetworkError::Format(format!(
                "declared {} rows but data has {}",
                self.rows,
                self.data.len()
            )));
        }
        if let Some((i, row)) = self.data.iter().enumerate().find(|(_, r)| r.len() != self.cols) {
            return Err(NetworkError::Format(format!(
                "declared {} cols but row {} has {}",
                self.cols,
                i,
                row.len()
            )));
        }
        Ok(())
    }

    fn zip_with<F>(&self, op: &'static str, other: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != other.shape() {
            return Err(self.mismatch(op, other));
        }

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect())
            .collect();

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    fn mismatch(&self, op: &'static str, other: &Matrix) -> NetworkError {
        NetworkError::DimensionMismatch {
            op,
            left: self.shape(),
            right: other.shape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.to_vec().iter().zip(b.to_vec().iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn zeros_has_requested_shape() {
        let z = Matrix::zeros(3, 2);
        assert_eq!(z.shape(), (3, 2));
        assert!(z.to_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn random_values_lie_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = Matrix::random_with(10, 10, &mut rng);
        assert!(r.to_vec().iter().all(|x| (-1.0..=1.0).contains(x)));
        // Not every cell in a row carries the same draw.
        assert!(r.data()[0].iter().any(|&x| x != r.data()[0][0]));
    }

    #[test]
    fn random_with_same_seed_is_deterministic() {
        let a = Matrix::random_with(4, 3, &mut StdRng::seed_from_u64(42));
        let b = Matrix::random_with(4, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn from_data_rejects_empty_and_ragged() {
        assert!(matches!(Matrix::from_data(vec![]), Err(NetworkError::EmptyMatrix)));
        assert!(matches!(Matrix::from_data(vec![vec![]]), Err(NetworkError::EmptyMatrix)));
        assert!(matches!(
            Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(NetworkError::RaggedRows { row: 1, expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn multiply_produces_expected_product() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c, m(vec![vec![58.0, 64.0], vec![139.0, 154.0]]));
    }

    #[test]
    fn multiply_shape_and_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = Matrix::random_with(3, 4, &mut rng);
        let b = Matrix::random_with(4, 5, &mut rng);
        assert_eq!(a.multiply(&b).unwrap().shape(), (3, 5));
        assert_eq!(a.multiply(&Matrix::identity(4)).unwrap(), a);
        assert_eq!(Matrix::identity(3).multiply(&a).unwrap(), a);
    }

    #[test]
    fn multiply_rejects_incompatible_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        match a.multiply(&b) {
            Err(NetworkError::DimensionMismatch { op, left, right }) => {
                assert_eq!(op, "multiply");
                assert_eq!(left, (2, 3));
                assert_eq!(right, (2, 3));
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn elementwise_ops_require_equal_shapes() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(a.add(&b), Err(NetworkError::DimensionMismatch { .. })));
        assert!(matches!(a.subtract(&b), Err(NetworkError::DimensionMismatch { .. })));
        assert!(matches!(a.dot_multiply(&b), Err(NetworkError::DimensionMismatch { .. })));
    }

    #[test]
    fn add_then_subtract_restores_original() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = Matrix::random_with(3, 3, &mut rng);
        let b = Matrix::random_with(3, 3, &mut rng);
        let back = a.add(&b).unwrap().subtract(&b).unwrap();
        assert_close(&back, &a);
    }

    #[test]
    fn dot_multiply_is_elementwise() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
        assert_eq!(a.dot_multiply(&b).unwrap(), m(vec![vec![5.0, 12.0], vec![21.0, 32.0]]));
    }

    #[test]
    fn map_leaves_source_untouched() {
        let a = m(vec![vec![1.0, -2.0]]);
        let doubled = a.map(|x| x * 2.0);
        assert_eq!(doubled, m(vec![vec![2.0, -4.0]]));
        assert_eq!(a, m(vec![vec![1.0, -2.0]]));
    }

    #[test]
    fn transpose_swaps_and_is_an_involution() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), Some(6.0));
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn column_builds_vertical_vector() {
        let c = Matrix::column(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(c.shape(), (3, 1));
        assert_eq!(c.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn serialize_round_trips() {
        let a = Matrix::random_with(2, 3, &mut StdRng::seed_from_u64(9));
        let json = a.serialize().unwrap();
        assert!(json.contains("\"rows\":2"));
        assert!(json.contains("\"cols\":3"));
        assert_eq!(Matrix::deserialize(&json).unwrap(), a);
    }

    #[test]
    fn deserialize_rejects_malformed_input() {
        assert!(matches!(Matrix::deserialize("not json"), Err(NetworkError::Format(_))));
        assert!(matches!(
            Matrix::deserialize(r#"{"rows":2,"cols":1,"data":[[1.0]]}"#),
            Err(NetworkError::Format(_))
        ));
        assert!(matches!(
            Matrix::deserialize(r#"{"rows":1,"cols":2,"data":[[1.0]]}"#),
            Err(NetworkError::Format(_))
        ));
        assert!(matches!(
            Matrix::deserialize(r#"{"rows":0,"cols":3,"data":[]}"#),
            Err(NetworkError::Format(_))
        ));
        assert!(matches!(
            Matrix::deserialize(r#"{"rows":2,"cols":0,"data":[[],[]]}"#),
            Err(NetworkError::Format(_))
        ));
    }
}
