
// imports
use crate::config::Params;
use crate::document::Document;
use crate::embedding::cutoff;
use crate::error::{Error, Result};
use crate::pmi::PmiMatrix;

use indexmap::IndexMap;
use tracing::debug;

/// Per-term importance derived from how much PMI mass a term carries.
///
/// The score is the inverse of the term's PMI row sum averaged over the
/// vocabulary, so terms with broad, generic co-occurrence get small values.
/// Terms with no PMI mass at all have no finite score and are left out.
#[derive(Clone, Debug, Default)]
pub struct Incidence {
    scores: IndexMap<String, f64>,
    vocab_size: usize,
}

impl Incidence {

    pub fn of(doc: &Document, params: &Params) -> Result<Incidence> {
        let pmi = PmiMatrix::of(doc, params)?;
        Incidence::from_pmi(doc.vocab(), &pmi)
    }

    pub fn from_pmi(vocab: &[String], pmi: &PmiMatrix) -> Result<Incidence> {

        if vocab.len() != pmi.dim() {
            return Err(Error::ShapeMismatch { terms: vocab.len(), rows: pmi.dim() });
        }

        let n = vocab.len() as f64;
        let mut scores: IndexMap<String, f64> = IndexMap::with_capacity(vocab.len());

        for (i, term) in vocab.iter().enumerate() {
            let mass = pmi.row_sum(i) / n;
            if mass == 0.0 {
                debug!(term = %term, "no pmi mass, left out of incidence");
                continue;
            }
            scores.insert(term.to_owned(), 1.0 / mass);
        }

        Ok(Incidence { scores, vocab_size: vocab.len() })
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.scores.get(term).copied()
    }

    /// Scored terms, in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(t, s)| (t.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Size of the vocabulary the scores were computed over, left-out terms included.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Terms by ascending incidence, ties in vocabulary order, at most `n mod vocab_size`
    /// of them. `None` returns every scored term.
    pub fn keywords(&self, n: Option<usize>) -> Vec<String> {

        let mut ranked: Vec<(&String, &f64)> = self.scores.iter().collect();
        ranked.sort_by(|(_, s), (_, t)| s.total_cmp(t));

        let k = cutoff(n, self.vocab_size);
        ranked.into_iter().take(k).map(|(t, _)| t.to_owned()).collect()
    }
}
