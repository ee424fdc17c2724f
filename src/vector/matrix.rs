//! Stacked training vectors.

use rkyv::{Archive, Deserialize, Serialize};

use super::error::{VectorError, VectorResult};
use super::similarity::{cosine_from_parts, dot, l2_norm, sparse_dot};
use super::sparse::SparseVector;
use super::{QueryVector, VectorKind, batch_kind};

/// All training vectors of a fitted classifier, stacked into one structure.
///
/// Dense rows are stored row-major in a single buffer; sparse rows use CSR
/// layout (`indptr` delimits each row's slice of `indices`/`values`).
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum FeatureMatrix {
    Dense {
        rows: u64,
        dimension: u64,
        data: Vec<f32>,
    },
    Sparse {
        dimension: u64,
        indptr: Vec<u64>,
        indices: Vec<u32>,
        values: Vec<f32>,
    },
}

impl FeatureMatrix {
    /// Stacks a homogeneous sequence of dense or sparse vectors.
    ///
    /// The empty sentinel is not a training vector and is rejected, as are
    /// mixed representations and rows of differing dimensionality.
    pub fn stack(vectors: &[QueryVector]) -> VectorResult<Self> {
        match batch_kind(vectors)? {
            None => Err(VectorError::UnsupportedType {
                reason: "cannot stack an empty vector sequence".to_string(),
            }),
            Some(VectorKind::Empty) => Err(VectorError::UnsupportedType {
                reason: "empty sentinel is not a valid training vector".to_string(),
            }),
            Some(VectorKind::Dense) => {
                let rows: Vec<&[f32]> = vectors
                    .iter()
                    .filter_map(|v| match v {
                        QueryVector::Dense(d) => Some(d.as_slice()),
                        _ => None,
                    })
                    .collect();
                Self::stack_dense(&rows)
            }
            Some(VectorKind::Sparse) => {
                let rows: Vec<&SparseVector> = vectors
                    .iter()
                    .filter_map(|v| match v {
                        QueryVector::Sparse(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                Self::stack_sparse(&rows)
            }
        }
    }

    pub fn stack_dense(rows: &[&[f32]]) -> VectorResult<Self> {
        let dimension = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(dimension * rows.len());

        for row in rows {
            if row.len() != dimension {
                return Err(VectorError::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(FeatureMatrix::Dense {
            rows: rows.len() as u64,
            dimension: dimension as u64,
            data,
        })
    }

    pub fn stack_sparse(rows: &[&SparseVector]) -> VectorResult<Self> {
        let dimension = rows.first().map(|r| r.dimension()).unwrap_or(0);
        let nnz: usize = rows.iter().map(|r| r.nnz()).sum();

        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        indptr.push(0u64);

        for row in rows {
            if row.dimension() != dimension {
                return Err(VectorError::DimensionMismatch {
                    expected: dimension,
                    actual: row.dimension(),
                });
            }
            indices.extend_from_slice(row.indices());
            values.extend_from_slice(row.values());
            indptr.push(indices.len() as u64);
        }

        Ok(FeatureMatrix::Sparse {
            dimension: dimension as u64,
            indptr,
            indices,
            values,
        })
    }

    pub fn kind(&self) -> VectorKind {
        match self {
            FeatureMatrix::Dense { .. } => VectorKind::Dense,
            FeatureMatrix::Sparse { .. } => VectorKind::Sparse,
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            FeatureMatrix::Dense { rows, .. } => *rows as usize,
            FeatureMatrix::Sparse { indptr, .. } => indptr.len().saturating_sub(1),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            FeatureMatrix::Dense { dimension, .. } | FeatureMatrix::Sparse { dimension, .. } => {
                *dimension as usize
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// Checks the buffers are mutually consistent. Matrices from `stack_*`
    /// always are; deserialized ones may not be.
    pub fn validate(&self) -> VectorResult<()> {
        let invalid = |reason: String| Err(VectorError::InvalidSparse { reason });

        match self {
            FeatureMatrix::Dense {
                rows,
                dimension,
                data,
            } => {
                let expected = (*rows as usize).saturating_mul(*dimension as usize);
                if data.len() != expected {
                    return Err(VectorError::DimensionMismatch {
                        expected,
                        actual: data.len(),
                    });
                }
            }
            FeatureMatrix::Sparse {
                dimension,
                indptr,
                indices,
                values,
            } => {
                if indptr.first() != Some(&0) {
                    return invalid("indptr must start at 0".to_string());
                }
                if indptr.windows(2).any(|w| w[0] > w[1]) {
                    return invalid("indptr must be non-decreasing".to_string());
                }
                if indices.len() != values.len()
                    || indptr.last().map(|&n| n as usize) != Some(indices.len())
                {
                    return invalid(format!(
                        "indptr ends at {:?} with {} indices and {} values",
                        indptr.last(),
                        indices.len(),
                        values.len()
                    ));
                }
                if let Some(&bad) = indices.iter().find(|&&i| u64::from(i) >= *dimension) {
                    return invalid(format!(
                        "index {bad} out of bounds for dimension {dimension}"
                    ));
                }
            }
        }

        Ok(())
    }

    fn dense_row(data: &[f32], dimension: usize, row: usize) -> &[f32] {
        &data[row * dimension..(row + 1) * dimension]
    }

    fn sparse_row<'a>(
        indptr: &[u64],
        indices: &'a [u32],
        values: &'a [f32],
        row: usize,
    ) -> (&'a [u32], &'a [f32]) {
        let start = indptr[row] as usize;
        let end = indptr[row + 1] as usize;
        (&indices[start..end], &values[start..end])
    }

    /// Returns row `row` as a standalone vector, or `None` when out of range.
    pub fn row(&self, row: usize) -> Option<QueryVector> {
        if row >= self.rows() {
            return None;
        }

        Some(match self {
            FeatureMatrix::Dense {
                dimension, data, ..
            } => QueryVector::Dense(Self::dense_row(data, *dimension as usize, row).to_vec()),
            FeatureMatrix::Sparse {
                dimension,
                indptr,
                indices,
                values,
            } => {
                let (idx, val) = Self::sparse_row(indptr, indices, values, row);
                QueryVector::Sparse(SparseVector::from_sorted_parts(
                    *dimension as usize,
                    idx.to_vec(),
                    val.to_vec(),
                ))
            }
        })
    }

    /// L2 norm of every row, in row order.
    pub fn row_norms(&self) -> Vec<f32> {
        match self {
            FeatureMatrix::Dense {
                rows,
                dimension,
                data,
            } => (0..*rows as usize)
                .map(|r| l2_norm(Self::dense_row(data, *dimension as usize, r)))
                .collect(),
            FeatureMatrix::Sparse {
                indptr,
                indices,
                values,
                ..
            } => (0..self.rows())
                .map(|r| l2_norm(Self::sparse_row(indptr, indices, values, r).1))
                .collect(),
        }
    }

    /// Cosine similarity of `query` against every row.
    ///
    /// `row_norms` must come from [`FeatureMatrix::row_norms`] on this matrix.
    /// The empty sentinel scores 0 against every row. A query whose family
    /// differs from the matrix (dense against sparse) is rejected.
    pub fn similarities(&self, query: &QueryVector, row_norms: &[f32]) -> VectorResult<Vec<f32>> {
        let expected = self.dimension();

        match (self, query) {
            (_, QueryVector::Empty) => Ok(vec![0.0; self.rows()]),
            (
                FeatureMatrix::Dense {
                    rows,
                    dimension,
                    data,
                },
                QueryVector::Dense(q),
            ) => {
                if q.len() != expected {
                    return Err(VectorError::DimensionMismatch {
                        expected,
                        actual: q.len(),
                    });
                }
                let q_norm = l2_norm(q);
                Ok((0..*rows as usize)
                    .map(|r| {
                        let row = Self::dense_row(data, *dimension as usize, r);
                        cosine_from_parts(dot(q, row), q_norm, row_norms[r])
                    })
                    .collect())
            }
            (
                FeatureMatrix::Sparse {
                    indptr,
                    indices,
                    values,
                    ..
                },
                QueryVector::Sparse(q),
            ) => {
                if q.dimension() != expected {
                    return Err(VectorError::DimensionMismatch {
                        expected,
                        actual: q.dimension(),
                    });
                }
                let q_norm = q.norm();
                Ok((0..self.rows())
                    .map(|r| {
                        let (idx, val) = Self::sparse_row(indptr, indices, values, r);
                        let d = sparse_dot(q.indices(), q.values(), idx, val);
                        cosine_from_parts(d, q_norm, row_norms[r])
                    })
                    .collect())
            }
            (matrix, query) => Err(VectorError::UnsupportedType {
                reason: format!(
                    "{} query against {} training vectors",
                    query.kind(),
                    matrix.kind()
                ),
            }),
        }
    }
}
