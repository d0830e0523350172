//! Exact nearest-neighbour index over one fixed dimensionality.
//!
//! Vectors are stored back to back in a single buffer; search is a linear
//! scan computing squared Euclidean distance against every row.
use std::cmp::Ordering;

use mmrag_core::error::{Error, Result};
use mmrag_core::types::{EntryId, SearchHit};

use crate::VectorIndex;

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dim: usize) -> Self { Self { dim, data: Vec::new() } }

    pub fn vector(&self, id: EntryId) -> Option<&[f32]> {
        let start = id.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    fn check_dim(&self, v: &[f32]) -> Result<()> {
        if v.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: v.len() });
        }
        Ok(())
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| { let d = x - y; d * d }).sum()
}

/// Ascending distance, lower id first on ties.
fn rank(a: &SearchHit, b: &SearchHit) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id))
}

impl VectorIndex for FlatIndex {
    fn dim(&self) -> usize { self.dim }

    fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    fn add(&mut self, vector: &[f32]) -> Result<EntryId> {
        self.check_dim(vector)?;
        if self.dim == 0 {
            return Err(Error::InvalidConfiguration("index dimensionality must be greater than zero".into()));
        }
        let id = self.len();
        self.data.extend_from_slice(vector);
        Ok(id)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        self.check_dim(query)?;
        if k == 0 || self.data.is_empty() { return Ok(Vec::new()); }
        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(id, row)| SearchHit { id, distance: squared_l2(row, query) })
            .collect();
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, rank);
            hits.truncate(k);
        }
        hits.sort_by(rank);
        Ok(hits)
    }

    fn reset(&mut self) { self.data.clear(); }
}
