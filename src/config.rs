
use crate::error::{Error, Result};

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde_json::Value;
use std::{fmt::Display, fs::File, io::BufReader};

/// Hyper parameters shared by every stage of the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    /// Window radius: number of neighbours considered on each side.
    pub max_juxt: usize,
    /// Cap on embedding dimensionality, also the keyword cut-off for key vectors.
    pub max_dim: Option<usize>,
    /// Floor negative PMI values to zero (PPMI).
    pub positive_pmi: bool,
    /// Worker threads for co-occurrence counting and per-corpus builds, 0 lets rayon decide.
    pub num_threads: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_juxt: 5,
            max_dim: None,
            positive_pmi: false,
            num_threads: 0,
        }
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        max_juxt: {}
        max_dim: {:?}
        positive_pmi: {}
        num_threads: {}",
        self.max_juxt, self.max_dim, self.positive_pmi, self.num_threads)
    }
}

impl Params {

    pub fn new(max_juxt: usize) -> Self {
        Self { max_juxt, ..Self::default() }
    }

    pub fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = Some(max_dim);
        self
    }

    pub fn with_positive_pmi(mut self, positive_pmi: bool) -> Self {
        self.positive_pmi = positive_pmi;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_juxt == 0 {
            return Err(Error::InvalidConfig("max_juxt must be a positive integer".into()));
        }
        Ok(())
    }

    /// A local pool, so repeated pipeline runs never touch the global one.
    pub fn thread_pool(&self) -> Result<ThreadPool> {
        Ok(ThreadPoolBuilder::new().num_threads(self.num_threads).build()?)
    }

    /// Reads parameters from a json object, keys that are missing take their default.
    pub fn from_json(json: &Value) -> Result<Self> {

        let defaults = Self::default();

        let max_juxt = match json.get("max_juxt") {
            Some(max_juxt) => as_usize(max_juxt, "max_juxt")?,
            None => defaults.max_juxt
        };
        let max_dim = match json.get("max_dim") {
            Some(Value::Null) | None => defaults.max_dim,
            Some(max_dim) => Some(as_usize(max_dim, "max_dim")?)
        };
        let positive_pmi = match json.get("positive_pmi") {
            Some(positive_pmi) => positive_pmi.as_bool().ok_or_else(|| {
                Error::InvalidConfig("given positive_pmi is not boolean".into())
            })?,
            None => defaults.positive_pmi
        };
        let num_threads = match json.get("num_threads") {
            Some(num_threads) => as_usize(num_threads, "num_threads")?,
            None => defaults.num_threads
        };

        let params = Self { max_juxt, max_dim, positive_pmi, num_threads };
        params.validate()?;
        Ok(params)
    }
}

fn as_usize(value: &Value, key: &str) -> Result<usize> {
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| Error::InvalidConfig(format!("given {} is not a non-negative integer", key)))
}

/// Everything the driver needs: where the corpora live and how much to print.
#[derive(Clone, Debug)]
pub struct RunParams {
    pub corpus_files: Vec<String>,
    pub top_n: Option<usize>,
    pub params: Params,
}

impl Display for RunParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "corpus_files: {:?}
        top_n: {:?}
        {}",
        self.corpus_files, self.top_n, self.params)
    }
}

pub struct Config {
    params: RunParams
}

impl Config {

    pub fn get_params(&self) -> RunParams {
        self.params.clone()
    }

    /// Expects the program name followed by a path to a json file.
    pub fn new(args: &[String]) -> Result<Config> {

        if args.len() != 2 {
            return Err(Error::InvalidConfig("input should be a path to json file only".into()));
        }

        let f = BufReader::new(File::open(&args[1])?);
        let json: Value = serde_json::from_reader(f)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config> {

        // corpus files are required, either one path or a list of paths
        let corpus_files = match json.get("corpus_files") {
            Some(Value::String(path)) => vec![path.to_owned()],
            Some(Value::Array(paths)) => paths
                .iter()
                .map(|p| p.as_str().map(str::to_owned).ok_or_else(|| {
                    Error::InvalidConfig("corpus_files entries must be strings".into())
                }))
                .collect::<Result<Vec<String>>>()?,
            Some(_) => return Err(Error::InvalidConfig("cannot cast corpus_files to paths".into())),
            None => return Err(Error::InvalidConfig("corpus_files was not supplied through json".into()))
        };
        if corpus_files.is_empty() {
            return Err(Error::InvalidConfig("corpus_files is empty".into()));
        }

        let top_n = match json.get("top_n") {
            Some(Value::Null) | None => None,
            Some(top_n) => Some(as_usize(top_n, "top_n")?)
        };

        let params = RunParams {
            corpus_files,
            top_n,
            params: Params::from_json(json)?,
        };

        Ok(Self { params })
    }
}
