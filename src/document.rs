
// imports
use crate::config::Params;
use crate::cooccurrence::{CooccurrenceMatrix, Counts};
use crate::embedding::{Mapping, Model};
use crate::error::Result;
use crate::incidence::Incidence;
use crate::pmi::PmiMatrix;
use crate::text::Text;

use ndarray::Array1;
use std::collections::HashMap;
use tracing::debug;

/// A fixed corpus together with its vocabulary index.
///
/// Ids are handed out in order of first appearance, so `vocab()[id(t)] == t`
/// and the ids cover `0..len()` without gaps. There is no way to add tokens
/// once the document is built.
#[derive(Clone, Debug, Default)]
pub struct Document {
    tokens: Text,
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
}

impl Document {

    pub fn new(tokens: Text) -> Self {

        let mut t2i: HashMap<String, usize> = HashMap::new();
        let mut i2t: Vec<String> = Vec::new();
        for tok in &tokens {
            if !t2i.contains_key(tok) {
                t2i.insert(tok.to_owned(), i2t.len());
                i2t.push(tok.to_owned());
            }
        }

        debug!(tokens = tokens.len(), vocab = i2t.len(), "indexed document");
        Self { tokens, t2i, i2t }
    }

    /// Terms ordered by id.
    pub fn vocab(&self) -> &[String] {
        &self.i2t
    }

    /// Vocabulary size.
    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }

    pub fn id(&self, term: &str) -> Option<usize> {
        self.t2i.get(term).copied()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Token sequence as ids.
    pub fn ids(&self) -> Vec<usize> {
        // every token was indexed in `new`
        self.tokens.iter().map(|t| self.t2i[t]).collect()
    }

    /// Term frequency over total token count, indexed by id.
    pub fn unigram_probabilities(&self) -> Array1<f64> {
        let mut probs: Array1<f64> = Array1::zeros(self.len());
        for tok in &self.tokens {
            probs[self.t2i[tok]] += 1.0;
        }
        let total = self.token_count() as f64;
        if total > 0.0 {
            probs.mapv_inplace(|count| count / total);
        }
        probs
    }

    pub fn cooccurrence(&self, params: &Params) -> Result<CooccurrenceMatrix> {
        Counts::run(self, params)
    }

    pub fn pmi(&self, params: &Params) -> Result<PmiMatrix> {
        PmiMatrix::of(self, params)
    }

    pub fn word_vectors(&self, params: &Params) -> Result<Model> {
        Model::build(self, params)
    }

    pub fn incidence(&self, params: &Params) -> Result<Incidence> {
        Incidence::of(self, params)
    }

    /// The embedding mapping restricted to the `params.max_dim` strongest keywords.
    /// Keywords and vectors come from one PMI matrix.
    pub fn key_vectors(&self, params: &Params) -> Result<Mapping> {
        let pmi = self.pmi(params)?;
        let keywords = Incidence::from_pmi(self.vocab(), &pmi)?.keywords(params.max_dim);
        let model = Model::from_pmi(self.vocab(), &pmi, params.max_dim)?;
        Ok(model.into_mapping().restrict(&keywords))
    }
}

impl From<Text> for Document {
    fn from(tokens: Text) -> Self {
        Self::new(tokens)
    }
}
