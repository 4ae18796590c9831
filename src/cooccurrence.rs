
// imports
use crate::config::Params;
use crate::document::Document;
use crate::error::Result;

use ndarray::Array2;
use rayon::prelude::*;
use sprs::{CsMat, TriMat};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use tracing::debug;

// focus positions handled per task. fixed (not derived from the thread count)
// so the merge order, and with it every sum, is the same on any pool
const CHUNK_POSITIONS: usize = 4096;

/// Symmetric `vocab × vocab` co-occurrence weights in CSR layout.
#[derive(Clone, Debug)]
pub struct CooccurrenceMatrix {
    mat: CsMat<f64>,
}

impl CooccurrenceMatrix {

    pub(crate) fn from_csr(mat: CsMat<f64>) -> Self {
        Self { mat }
    }

    /// Read-only access for diagnostics.
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.mat
    }

    pub fn dim(&self) -> usize {
        self.mat.rows()
    }

    pub fn nnz(&self) -> usize {
        self.mat.nnz()
    }

    /// Stored weight, 0.0 for cells with no evidence.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.mat.get(i, j).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.mat.get(i, j).is_some()
    }

    /// Present cells as `(row, col, value)`, row major.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.mat.iter().map(|(&v, (i, j))| (i, j, v))
    }

    pub fn is_symmetric(&self) -> bool {
        self.triplets().all(|(i, j, v)| self.mat.get(j, i) == Some(&v))
    }

    pub fn to_dense(&self) -> Array2<f64> {
        self.mat.to_dense()
    }
}

pub struct Counts {}

impl Counts {

    fn count(ids: &[usize], window_size: usize, focus: Range<usize>) -> HashMap<(usize, usize), f64> {

        // weights every (focus, context) pair by the inverse of their distance, for distances
        // 1..=window_size on both sides. each pair is added in both directions, which keeps the
        // matrix symmetric. `focus` must leave a full window on each side.
        let mut tup2cooc: HashMap<(usize, usize), f64> = HashMap::new();

        for i in focus {

            let token_i = ids[i];

            for distance in 1..=window_size {

                let dis_count = 1.0 / distance as f64;

                for context_j in [ids[i - distance], ids[i + distance]] {
                    *tup2cooc.entry((token_i, context_j)).or_insert(0.0) += dis_count;
                    *tup2cooc.entry((context_j, token_i)).or_insert(0.0) += dis_count;
                }
            }
        }

        tup2cooc
    }

    fn merge(parts: Vec<HashMap<(usize, usize), f64>>) -> BTreeMap<(usize, usize), f64> {

        // partial sums are folded in chunk order, a cell sees its contributions in the same
        // sequence no matter how the chunks were scheduled
        let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for part in parts {
            for (cell, v) in part {
                *merged.entry(cell).or_insert(0.0) += v;
            }
        }
        merged
    }

    /// Focus positions that have a full window on both sides.
    pub fn focus_range(token_count: usize, window_size: usize) -> Range<usize> {
        let end = token_count.saturating_sub(window_size);
        if end <= window_size {
            return 0..0;
        }
        window_size..end
    }

    /// Builds one pool for the whole stage and counts on it.
    pub fn run(doc: &Document, params: &Params) -> Result<CooccurrenceMatrix> {
        params.validate()?;
        let pool = params.thread_pool()?;
        pool.install(|| Counts::accumulate(doc, params))
    }

    /// Counts on whatever pool the caller is running in.
    pub(crate) fn accumulate(doc: &Document, params: &Params) -> Result<CooccurrenceMatrix> {

        params.validate()?;
        let window_size = params.max_juxt;
        let n = doc.len();
        let ids = doc.ids();

        let focus = Counts::focus_range(ids.len(), window_size);
        let slices: Vec<Range<usize>> = focus
            .clone()
            .step_by(CHUNK_POSITIONS)
            .map(|i| i..(i + CHUNK_POSITIONS).min(focus.end))
            .collect();

        let parts: Vec<HashMap<(usize, usize), f64>> = if slices.len() > 1 {
            slices
                .par_iter()
                .map(|slice| Counts::count(&ids, window_size, slice.clone()))
                .collect()
        } else {
            slices
                .iter()
                .map(|slice| Counts::count(&ids, window_size, slice.clone()))
                .collect()
        };

        // density normalization by the total number of tokens
        let total = doc.token_count() as f64;
        let mut tri: TriMat<f64> = TriMat::new((n, n));
        for ((i, j), v) in Counts::merge(parts) {
            tri.add_triplet(i, j, v / total);
        }
        let mat: CsMat<f64> = tri.to_csr();

        debug!(vocab = n, focus = focus.len(), chunks = slices.len(), nnz = mat.nnz(), "counted cooccurrences");
        Ok(CooccurrenceMatrix::from_csr(mat))
    }
}
