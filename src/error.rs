
/// Errors raised by the embedding pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {

    /// A stage was handed an empty collection it cannot reduce.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Adjacency needs at least two corpora.
    #[error("at least two corpora are needed, got {0}")]
    TooFewCorpora(usize),

    /// A NaN or infinite value reached the factorization.
    #[error("non-finite value at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    /// A denominator was zero (or not finite).
    #[error("division by zero in {0}")]
    ZeroDivision(&'static str),

    #[error("factorization failed: {0}")]
    Factorization(String),

    #[error("inconsistent number of entries: {terms} terms for {rows} rows")]
    ShapeMismatch { terms: usize, rows: usize },

    /// Term is not in the vocabulary of the mapping.
    #[error("token: {0} is not in the vocabulary")]
    UnknownTerm(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
