
// imports
use crate::config::Params;
use crate::document::Document;
use crate::embedding::{Mapping, Model};
use crate::error::{Error, Result};
use crate::pmi::PmiMatrix;

use indexmap::IndexMap;
use ndarray::{s, Array1};
use rayon::prelude::*;
use tracing::{debug, info};

/// Cross-corpus agreement of every term the corpora share.
///
/// For an ordered pair of corpora `(P, Q)` and a shared term `k`, the score is
/// `<P[k], Q[k]> / (|P[k]| |Q[k]|)`: how well `k` lines up across the two
/// corpora, measured against the agreement it would reach if its two vectors
/// were aligned. Identical corpora score 1 for every term, truncated or not.
/// Scores of all ordered pairs are combined by running mean. Vectors of
/// different length are compared on their leading components.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    scores: IndexMap<String, f64>,
}

impl Adjacency {

    pub fn between(mappings: &[&Mapping]) -> Result<Adjacency> {

        if mappings.len() < 2 {
            return Err(Error::TooFewCorpora(mappings.len()));
        }

        // terms present in every corpus, in the order of the first one
        let shared: Vec<&str> = mappings[0]
            .vocabulary()
            .filter(|t| mappings[1..].iter().all(|m| m.contains(t)))
            .collect();
        let mut scores: IndexMap<String, f64> = shared.iter().map(|t| (t.to_string(), 0.0)).collect();

        debug!(corpora = mappings.len(), shared = shared.len(), "computing adjacency");
        if shared.is_empty() {
            return Ok(Adjacency { scores });
        }

        let mut pairs_seen = 0usize;
        for (p, p_map) in mappings.iter().enumerate() {
            for (q, q_map) in mappings.iter().enumerate() {

                if p == q {
                    continue;
                }
                let dim = p_map.dim().min(q_map.dim());

                let n = pairs_seen as f64;
                for t in &shared {
                    let a = p_map.vector(t)?.slice_move(s![..dim]);
                    let b = q_map.vector(t)?.slice_move(s![..dim]);
                    let scale = (a.dot(&a) * b.dot(&b)).sqrt();
                    if scale == 0.0 || !scale.is_finite() {
                        return Err(Error::ZeroDivision("adjacency"));
                    }
                    let sigma = a.dot(&b) / scale;
                    if let Some(score) = scores.get_mut(*t) {
                        *score = (*score * n + sigma) / (n + 1.0);
                    }
                }
                pairs_seen += 1;
            }
        }

        Ok(Adjacency { scores })
    }

    /// Builds one model per document, in parallel, and compares them. One pool
    /// serves both the per-document builds and the counting inside each.
    pub fn of_documents(docs: &[Document], params: &Params) -> Result<Adjacency> {

        if docs.len() < 2 {
            return Err(Error::TooFewCorpora(docs.len()));
        }

        params.validate()?;
        let pool = params.thread_pool()?;
        let models: Vec<Model> = pool.install(|| {
            docs.par_iter()
                .map(|doc| {
                    let pmi = PmiMatrix::accumulate(doc, params)?;
                    Model::from_pmi(doc.vocab(), &pmi, params.max_dim)
                })
                .collect::<Result<Vec<Model>>>()
        })?;
        info!(corpora = models.len(), "built models for adjacency");

        let mappings: Vec<&Mapping> = models.iter().map(Model::mapping).collect();
        Adjacency::between(&mappings)
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.scores.get(term).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(t, s)| (t.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean score over the shared vocabulary.
    pub fn doc_sim(&self) -> Result<f64> {
        let scores: Array1<f64> = self.scores.values().copied().collect();
        scores.mean().ok_or(Error::EmptyInput("adjacency has no shared terms"))
    }
}
