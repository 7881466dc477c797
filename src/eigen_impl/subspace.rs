//! Growable column store for the Davidson subspace
//!
//! `V` and `VA = H V` live in flat column-major buffers whose capacity is
//! reserved up front for the maximum subspace dimension, so appending a
//! column never reallocates. A collapse rewrites the buffers in place.

extern crate nalgebra as na;

use na::{DMatrix, DMatrixView, DVector};

#[derive(Debug, Clone)]
pub struct SubspaceStore {
    dim: usize,
    capacity: usize,
    v: Vec<f64>,
    va: Vec<f64>,
    /// Projected matrix `S = V^T VA`
    s: DMatrix<f64>,
}

impl SubspaceStore {
    /// # Arguments
    ///
    /// * `dim` - Length of every column
    /// * `capacity` - Maximum number of columns
    pub fn new(dim: usize, capacity: usize) -> Self {
        SubspaceStore {
            dim,
            capacity,
            v: Vec::with_capacity(dim * capacity),
            va: Vec::with_capacity(dim * capacity),
            s: DMatrix::zeros(0, 0),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.v.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn v(&self) -> DMatrixView<'_, f64> {
        DMatrixView::from_slice(&self.v, self.dim, self.len())
    }

    pub fn va(&self) -> DMatrixView<'_, f64> {
        DMatrixView::from_slice(&self.va, self.dim, self.len())
    }

    pub fn s(&self) -> &DMatrix<f64> {
        &self.s
    }

    fn v_column(&self, i: usize) -> &[f64] {
        &self.v[i * self.dim..(i + 1) * self.dim]
    }

    fn va_column(&self, i: usize) -> &[f64] {
        &self.va[i * self.dim..(i + 1) * self.dim]
    }

    /// Append a column of `V` with its image, extending `S` by one row and column
    ///
    /// Returns false when the store is full.
    pub fn push(&mut self, v: &DVector<f64>, va: &DVector<f64>) -> bool {
        if self.is_full() {
            return false;
        }
        let m = self.len();
        self.v.extend_from_slice(v.as_slice());
        self.va.extend_from_slice(va.as_slice());

        self.s.resize_mut(m + 1, m + 1, 0.0);
        for j in 0..=m {
            self.s[(m, j)] = dot(self.v_column(m), self.va_column(j));
            self.s[(j, m)] = dot(self.v_column(j), self.va_column(m));
        }
        true
    }

    /// Replace the subspace by `ritz_vectors` with images `ritz_images` and recompute `S`
    pub fn collapse(&mut self, ritz_vectors: &DMatrix<f64>, ritz_images: &DMatrix<f64>) {
        self.v.clear();
        self.va.clear();
        self.v.extend_from_slice(ritz_vectors.as_slice());
        self.va.extend_from_slice(ritz_images.as_slice());
        self.s = ritz_vectors.transpose() * ritz_images;
    }

    /// Remove the components of `vector` along every column of `V`
    pub fn project_out(&self, vector: &mut DVector<f64>) {
        for i in 0..self.len() {
            let column = self.v_column(i);
            let overlap = dot(column, vector.as_slice());
            for (x, c) in vector.iter_mut().zip(column) {
                *x -= overlap * c;
            }
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
