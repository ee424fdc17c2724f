//! Sparse vectors in sorted-index form.

use super::error::{VectorError, VectorResult};

/// A sparse vector: sorted, unique indices with their non-zero values.
///
/// Duplicate indices passed to [`SparseVector::new`] are summed, the same way a
/// CSR matrix collapses duplicate entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dimension: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    pub fn new(dimension: usize, indices: Vec<u32>, values: Vec<f32>) -> VectorResult<Self> {
        if indices.len() != values.len() {
            return Err(VectorError::InvalidSparse {
                reason: format!(
                    "{} indices but {} values",
                    indices.len(),
                    values.len()
                ),
            });
        }

        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= dimension) {
            return Err(VectorError::InvalidSparse {
                reason: format!("index {bad} out of bounds for dimension {dimension}"),
            });
        }

        let mut pairs: Vec<(u32, f32)> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|(i, _)| *i);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }

        Ok(Self {
            dimension,
            indices,
            values,
        })
    }

    /// Rows sliced out of a stacked matrix are already sorted and unique.
    pub(crate) fn from_sorted_parts(dimension: usize, indices: Vec<u32>, values: Vec<f32>) -> Self {
        Self {
            dimension,
            indices,
            values,
        }
    }

    /// Builds a sparse vector from the non-zero entries of a dense slice.
    pub fn from_dense(dense: &[f32]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i as u32, *v))
            .unzip();

        Self {
            dimension: dense.len(),
            indices,
            values,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn norm(&self) -> f32 {
        super::similarity::l2_norm(&self.values)
    }

    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dimension];
        for (&i, &v) in self.indices.iter().zip(&self.values) {
            dense[i as usize] = v;
        }
        dense
    }
}
