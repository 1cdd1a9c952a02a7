// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Small `f64` linear solvers for the handle systems.
//!
//! Points are stored as `f32`, but the systems are solved in double precision:
//! the closed-curve matrix is dense and long anchor runs accumulate error.

/// Pivots smaller than this are treated as zero.
const SINGULAR_PIVOT: f64 = 1e-12;

/// Returned when elimination hits a zero pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Singular;

/// A square matrix with `lower` sub-diagonals and `upper` super-diagonals.
///
/// Each row stores columns `i - lower ..= i + lower + upper`; the extra
/// `lower` columns on the right absorb fill-in from row swaps during
/// partially pivoted elimination.
#[derive(Debug, Clone)]
pub(crate) struct BandedMatrix {
    n: usize,
    lower: usize,
    upper: usize,
    rows: Vec<Vec<f64>>,
}

impl BandedMatrix {
    pub(crate) fn new(n: usize, lower: usize, upper: usize) -> Self {
        let width = 2 * lower + upper + 1;
        Self {
            n,
            lower,
            upper,
            rows: vec![vec![0.0; width]; n],
        }
    }

    #[inline]
    fn slot(&self, i: usize, j: usize) -> Option<usize> {
        let offset = (j + self.lower).checked_sub(i)?;
        (offset < self.rows.first().map_or(0, Vec::len)).then_some(offset)
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.slot(i, j).map_or(0.0, |s| self.rows[i][s])
    }

    /// Sets an entry. Entries outside the declared band are ignored.
    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        if i >= self.n || j >= self.n || j + self.lower < i || j > i + self.upper {
            return;
        }
        if let Some(s) = self.slot(i, j) {
            self.rows[i][s] = value;
        }
    }

    pub(crate) fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.n);
        for i in 0..self.n {
            let start = i.saturating_sub(self.lower);
            let end = (i + self.upper + 1).min(self.n);
            for j in start..end {
                dense.set(i, j, self.get(i, j));
            }
        }
        dense
    }

    /// Solves `A x = rhs` by Gaussian elimination with partial pivoting,
    /// touching only the band.
    pub(crate) fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, Singular> {
        let n = self.n;
        let reach = self.lower + self.upper;
        let mut a = self.clone();
        let mut b = rhs.to_vec();

        for k in 0..n {
            let last_row = (k + self.lower).min(n - 1);
            let last_col = (k + reach).min(n - 1);

            let pivot_row = (k..=last_row)
                .max_by(|&p, &q| a.get(p, k).abs().total_cmp(&a.get(q, k).abs()))
                .unwrap_or(k);
            if a.get(pivot_row, k).abs() < SINGULAR_PIVOT {
                return Err(Singular);
            }
            if pivot_row != k {
                for j in k..=last_col {
                    let upper_value = a.get(k, j);
                    let lower_value = a.get(pivot_row, j);
                    a.write(k, j, lower_value);
                    a.write(pivot_row, j, upper_value);
                }
                b.swap(k, pivot_row);
            }

            let pivot = a.get(k, k);
            for i in (k + 1)..=last_row {
                let factor = a.get(i, k) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..=last_col {
                    let value = a.get(i, j) - factor * a.get(k, j);
                    a.write(i, j, value);
                }
                b[i] -= factor * b[k];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let last_col = (i + reach).min(n - 1);
            let sum: f64 = ((i + 1)..=last_col).map(|j| a.get(i, j) * x[j]).sum();
            x[i] = (b[i] - sum) / a.get(i, i);
        }
        Ok(x)
    }

    /// Unchecked write used during elimination, where fill-in may extend the
    /// upper band up to `lower + upper`.
    #[inline]
    fn write(&mut self, i: usize, j: usize, value: f64) {
        if let Some(s) = self.slot(i, j) {
            self.rows[i][s] = value;
        }
    }
}

/// A dense row-major square matrix.
#[derive(Debug, Clone)]
pub(crate) struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub(crate) fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    pub(crate) fn clear_row(&mut self, i: usize) {
        let n = self.n;
        self.data[i * n..(i + 1) * n].fill(0.0);
    }

    /// Solves `A x = rhs` by Gaussian elimination with partial pivoting.
    pub(crate) fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, Singular> {
        let n = self.n;
        let mut a = self.data.clone();
        let mut b = rhs.to_vec();

        for k in 0..n {
            let pivot_row = (k..n)
                .max_by(|&p, &q| a[p * n + k].abs().total_cmp(&a[q * n + k].abs()))
                .unwrap_or(k);
            if a[pivot_row * n + k].abs() < SINGULAR_PIVOT {
                return Err(Singular);
            }
            if pivot_row != k {
                for j in 0..n {
                    a.swap(k * n + j, pivot_row * n + j);
                }
                b.swap(k, pivot_row);
            }
            let pivot = a[k * n + k];
            for i in (k + 1)..n {
                let factor = a[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..n {
                    a[i * n + j] -= factor * a[k * n + j];
                }
                b[i] -= factor * b[k];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let sum: f64 = ((i + 1)..n).map(|j| a[i * n + j] * x[j]).sum();
            x[i] = (b[i] - sum) / a[i * n + i];
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_banded_tridiagonal_solve() {
        // [2 -1 0; -1 2 -1; 0 -1 2] x = [1, 0, 1]  =>  x = [1, 1, 1]
        let mut m = BandedMatrix::new(3, 1, 1);
        for i in 0..3 {
            m.set(i, i, 2.0);
            if i > 0 {
                m.set(i, i - 1, -1.0);
                m.set(i - 1, i, -1.0);
            }
        }
        let x = m.solve(&[1.0, 0.0, 1.0]).unwrap();
        assert_close(&x, &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_banded_solve_needs_pivoting() {
        // Zero on the leading diagonal forces a row swap inside the band.
        let mut m = BandedMatrix::new(3, 1, 1);
        m.set(0, 0, 0.0);
        m.set(0, 1, 1.0);
        m.set(1, 0, 1.0);
        m.set(1, 1, 1.0);
        m.set(1, 2, 1.0);
        m.set(2, 1, 1.0);
        m.set(2, 2, 3.0);
        // x = [1, 2, 3]
        let x = m.solve(&[2.0, 6.0, 11.0]).unwrap();
        assert_close(&x, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_banded_ignores_out_of_band_writes() {
        let mut m = BandedMatrix::new(4, 1, 1);
        m.set(0, 3, 9.0);
        assert_eq!(m.get(0, 3), 0.0);
        assert_eq!(m.to_dense().get(0, 3), 0.0);
    }

    #[test]
    fn test_dense_solve_and_singular() {
        let mut m = DenseMatrix::zeros(2);
        m.set(0, 0, 1.0);
        m.set(0, 1, 1.0);
        m.set(1, 0, 1.0);
        m.set(1, 1, -2.0);
        let x = m.solve(&[3.0, 0.0]).unwrap();
        assert_close(&x, &[2.0, 1.0]);

        m.clear_row(1);
        assert_eq!(m.solve(&[3.0, 0.0]), Err(Singular));
    }
}
