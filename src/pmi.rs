
// imports
use crate::config::Params;
use crate::cooccurrence::{CooccurrenceMatrix, Counts};
use crate::document::Document;
use crate::error::{Error, Result};

use ndarray::{Array2, ArrayView1};
use sprs::{CsMat, TriMat};
use tracing::debug;

/// Log pointwise mutual information over the co-occurrence pattern.
///
/// Only cells with co-occurrence evidence are stored; an absent cell means
/// "no evidence", never `log(0)`. Cells whose value comes out exactly zero are
/// dropped too, which includes every negative value when PPMI is on.
#[derive(Clone, Debug)]
pub struct PmiMatrix {
    mat: CsMat<f64>,
    positive: bool,
}

impl PmiMatrix {

    pub fn of(doc: &Document, params: &Params) -> Result<PmiMatrix> {
        params.validate()?;
        let pool = params.thread_pool()?;
        pool.install(|| PmiMatrix::accumulate(doc, params))
    }

    /// Same as `of`, on the pool the caller is running in.
    pub(crate) fn accumulate(doc: &Document, params: &Params) -> Result<PmiMatrix> {
        let cooc = Counts::accumulate(doc, params)?;
        let unigrams = doc.unigram_probabilities();
        PmiMatrix::from_cooccurrence(&cooc, unigrams.view(), params.positive_pmi)
    }

    pub(crate) fn from_cooccurrence(
        cooc: &CooccurrenceMatrix,
        unigrams: ArrayView1<f64>,
        positive: bool,
    ) -> Result<PmiMatrix> {

        let n = cooc.dim();
        let mut tri: TriMat<f64> = TriMat::new((n, n));
        let mut floored = 0usize;

        for (i, j, v) in cooc.triplets() {

            let independent = unigrams[i] * unigrams[j];
            if independent == 0.0 || !independent.is_finite() {
                return Err(Error::ZeroDivision("pmi normalization"));
            }

            let ratio = v / independent;
            if !(ratio > 0.0 && ratio.is_finite()) {
                return Err(Error::NonFinite { row: i, col: j });
            }

            let mut pmi = ratio.ln();
            if positive && pmi < 0.0 {
                pmi = 0.0;
                floored += 1;
            }
            if pmi != 0.0 {
                tri.add_triplet(i, j, pmi);
            }
        }

        let mat: CsMat<f64> = tri.to_csr();
        debug!(vocab = n, nnz = mat.nnz(), floored, "built pmi matrix");
        Ok(PmiMatrix { mat, positive })
    }

    pub fn matrix(&self) -> &CsMat<f64> {
        &self.mat
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    pub fn dim(&self) -> usize {
        self.mat.rows()
    }

    pub fn nnz(&self) -> usize {
        self.mat.nnz()
    }

    /// `None` where there is no evidence.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.mat.get(i, j).copied()
    }

    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.mat.iter().map(|(&v, (i, j))| (i, j, v))
    }

    /// Sum of the stored values of row `i`.
    pub fn row_sum(&self, i: usize) -> f64 {
        self.mat
            .outer_view(i)
            .map(|row| row.data().iter().sum())
            .unwrap_or(0.0)
    }

    pub fn to_dense(&self) -> Array2<f64> {
        self.mat.to_dense()
    }
}


#[cfg(test)]
mod tests {

    use super::PmiMatrix;
    use crate::config::Params;
    use crate::cooccurrence::Counts;
    use crate::document::Document;
    use crate::error::Error;
    use crate::text::parse;
    use ndarray::array;

    fn toy() -> Document {
        Document::new(parse("the cat sat on the mat the cat ran"))
    }

    #[test]
    fn pmi_of_the_cat() {
        let pmi = PmiMatrix::of(&toy(), &Params::new(2)).unwrap();
        // (1/9) / ((3/9) * (2/9))
        let the_cat = pmi.get(0, 1).unwrap();
        assert!(the_cat.is_finite());
        assert!((the_cat - 1.5f64.ln()).abs() < 1e-12);
        assert!(pmi.get(1, 5).is_none());
    }

    #[test]
    fn pattern_is_a_subset_of_cooccurrence() {
        let doc = Document::new(parse(
            "it was the best of times it was the worst of times it was the age of wisdom",
        ));
        let params = Params::new(2);
        let cooc = Counts::run(&doc, &params).unwrap();
        let pmi = PmiMatrix::of(&doc, &params).unwrap();

        assert!(pmi.nnz() <= cooc.nnz());
        for (i, j, v) in pmi.triplets() {
            assert!(cooc.contains(i, j));
            assert!(v.is_finite());
        }
        // only exact zeros may be missing
        for (i, j, v) in cooc.triplets() {
            if pmi.get(i, j).is_none() {
                let u = doc.unigram_probabilities();
                assert!((v / (u[i] * u[j])).ln().abs() < 1e-12);
            }
        }
    }

    #[test]
    fn positive_pmi_floors_negatives() {
        // two frequent words that only meet once, at the seam
        let doc = Document::new(parse("x x x x x x x x x x y y y y y y y y y y"));
        let plain = PmiMatrix::of(&doc, &Params::new(1)).unwrap();
        let positive = PmiMatrix::of(&doc, &Params::new(1).with_positive_pmi(true)).unwrap();

        // raw x-y weight is 2, so the ratio is 2 * 20 / (10 * 10)
        assert!((plain.get(0, 1).unwrap() - 0.4f64.ln()).abs() < 1e-12);
        assert!(positive.get(0, 1).is_none());

        assert!(plain.triplets().any(|(_, _, v)| v < 0.0));
        assert!(positive.is_positive());
        assert!(positive.triplets().all(|(_, _, v)| v > 0.0));
        for (i, j, v) in positive.triplets() {
            assert_eq!(plain.get(i, j), Some(v));
        }
    }

    #[test]
    fn row_sum_adds_stored_values() {
        let pmi = PmiMatrix::of(&toy(), &Params::new(2)).unwrap();
        for i in 0..pmi.dim() {
            let expected: f64 = pmi.triplets().filter(|(r, _, _)| *r == i).map(|(_, _, v)| v).sum();
            assert!((pmi.row_sum(i) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_probability_is_reported() {
        let doc = toy();
        let cooc = Counts::run(&doc, &Params::new(2)).unwrap();
        let unigrams = array![0.0, 0.2, 0.2, 0.2, 0.2, 0.2];
        let err = PmiMatrix::from_cooccurrence(&cooc, unigrams.view(), false).unwrap_err();
        assert!(matches!(err, Error::ZeroDivision(_)));
    }

    #[test]
    fn empty_document() {
        let pmi = PmiMatrix::of(&Document::new(Vec::new()), &Params::new(3)).unwrap();
        assert_eq!(pmi.dim(), 0);
        assert_eq!(pmi.nnz(), 0);
    }
}
