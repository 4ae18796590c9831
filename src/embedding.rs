
// imports
use crate::config::Params;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::factorize::left_singular_vectors;
use crate::pmi::PmiMatrix;
use crate::text::Tokenizer;

use indexmap::IndexMap;
use ndarray::{Array1, Array2, ArrayView1};
use std::sync::Arc;
use tracing::info;

/// Number of results a ranked query returns: everything for `None`, otherwise
/// `n` wrapped around the collection size, so `n == len` selects nothing.
pub(crate) fn cutoff(n: Option<usize>, len: usize) -> usize {
    match n {
        None => len,
        Some(_) if len == 0 => 0,
        Some(n) => n % len,
    }
}

/// The factorized PMI matrix of one corpus.
#[derive(Clone, Debug)]
pub struct Model {
    mapping: Mapping,
    singular_values: Array1<f64>,
}

impl Model {

    pub fn build(doc: &Document, params: &Params) -> Result<Model> {
        let pmi = PmiMatrix::of(doc, params)?;
        Model::from_pmi(doc.vocab(), &pmi, params.max_dim)
    }

    /// Row `i` of the left singular vectors becomes the vector of `vocab[i]`.
    pub fn from_pmi(vocab: &[String], pmi: &PmiMatrix, max_dim: Option<usize>) -> Result<Model> {

        if vocab.len() != pmi.dim() {
            return Err(Error::ShapeMismatch { terms: vocab.len(), rows: pmi.dim() });
        }

        let svd = left_singular_vectors(pmi.to_dense().view(), max_dim)?;
        info!(vocab = vocab.len(), dim = svd.u.ncols(), "built word vectors");

        Ok(Model {
            mapping: Mapping::new(vocab.to_vec(), svd.u)?,
            singular_values: svd.singular_values,
        })
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> Mapping {
        self.mapping
    }

    pub fn singular_values(&self) -> &Array1<f64> {
        &self.singular_values
    }

    pub fn dim(&self) -> usize {
        self.mapping.dim()
    }

    /// The whole `vocab × dim` matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.mapping.w
    }
}

/// Term to vector lookup over a shared matrix; every vector is a row view.
#[derive(Clone, Debug)]
pub struct Mapping {
    w: Arc<Array2<f64>>,
    t2i: IndexMap<String, usize>,
}

impl Mapping {

    /// `terms[i]` names row `i` of `w`.
    pub fn new(terms: Vec<String>, w: Array2<f64>) -> Result<Mapping> {

        if terms.len() != w.nrows() {
            return Err(Error::ShapeMismatch { terms: terms.len(), rows: w.nrows() });
        }

        let t2i = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
        Ok(Mapping { w: Arc::new(w), t2i })
    }

    pub fn len(&self) -> usize {
        self.t2i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t2i.is_empty()
    }

    /// Vector length.
    pub fn dim(&self) -> usize {
        self.w.ncols()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.t2i.contains_key(term)
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.t2i.keys().map(String::as_str)
    }

    pub fn vector(&self, term: &str) -> Result<ArrayView1<'_, f64>> {
        match self.t2i.get(term) {
            Some(i) => Ok(self.w.row(*i)),
            None => Err(Error::UnknownTerm(term.to_string())),
        }
    }

    /// Dot product of the two vectors. Not normalized.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        Ok(self.vector(a)?.dot(&self.vector(b)?))
    }

    fn scored(&self, term: &str) -> Result<Vec<(&str, f64)>> {
        let vec = self.vector(term)?;
        Ok(self
            .t2i
            .iter()
            .map(|(t, i)| (t.as_str(), self.w.row(*i).dot(&vec)))
            .collect())
    }

    /// Terms ordered by *ascending* similarity to `term`, so the least similar come
    /// first, cut to `n` wrapped around the vocabulary size. See [`Mapping::most_similar`]
    /// for the closest terms.
    pub fn nearest_neighbors(&self, term: &str, n: Option<usize>) -> Result<Vec<String>> {

        let mut scored = self.scored(term)?;
        scored.sort_by(|(_, s), (_, t)| s.total_cmp(t));

        let k = cutoff(n, scored.len());
        Ok(scored.into_iter().take(k).map(|(t, _)| t.to_string()).collect())
    }

    /// The `k` terms most similar to `term` with their scores, best first.
    /// `term` itself takes part in the ranking.
    pub fn most_similar(&self, term: &str, k: usize) -> Result<Vec<(String, f64)>> {

        // sort by most similar in descending order
        let mut scored = self.scored(term)?;
        scored.sort_by(|(_, s), (_, t)| t.total_cmp(s));

        Ok(scored.into_iter().take(k).map(|(t, s)| (t.to_string(), s)).collect())
    }

    /// Mean of the vectors of `tokens`.
    pub fn embed<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Array1<f64>> {

        if tokens.is_empty() {
            return Err(Error::EmptyInput("embedding of an empty token list"));
        }

        let mut acc: Array1<f64> = Array1::zeros(self.dim());
        for tok in tokens {
            acc += &self.vector(tok.as_ref())?;
        }
        acc /= tokens.len() as f64;
        Ok(acc)
    }

    pub fn embed_str<T: Tokenizer>(&self, raw: &str, tokenizer: &T) -> Result<Array1<f64>> {
        self.embed(&tokenizer.tokenize(raw))
    }

    /// Keeps the listed terms, in the order given. Terms not present are skipped.
    /// The underlying matrix is shared, not copied.
    pub fn restrict<S: AsRef<str>>(&self, terms: &[S]) -> Mapping {
        let t2i = terms
            .iter()
            .filter_map(|t| self.t2i.get_key_value(t.as_ref()))
            .map(|(t, i)| (t.clone(), *i))
            .collect();
        Mapping { w: Arc::clone(&self.w), t2i }
    }
}
