//! Count-based word vectors: skip-gram co-occurrence, PMI, and an SVD of the
//! PMI matrix, plus incidence keywords and cross-corpus adjacency.

pub mod adjacency;
pub mod config;
pub mod cooccurrence;
pub mod document;
pub mod embedding;
mod error;
pub mod factorize;
pub mod incidence;
pub mod pmi;
mod run;
pub mod text;

pub use adjacency::Adjacency;
pub use config::{Config, Params};
pub use cooccurrence::CooccurrenceMatrix;
pub use document::Document;
pub use embedding::{Mapping, Model};
pub use error::{Error, Result};
pub use incidence::Incidence;
pub use pmi::PmiMatrix;
pub use run::Run;
pub use text::{Text, Tokenizer, WordTokenizer};
