
use crate::adjacency::Adjacency;
use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::text::{Tokenizer, WordTokenizer};

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use tracing::{info, warn};

pub struct Run {}

impl Run {

    // reads the json configuration given as the only argument, then
    // -> tokenizes and indexes every corpus
    // -> prints its keywords
    // -> compares the corpora when there is more than one

    pub fn run() -> Result<()> {

        info!("entering program...");
        let args: Vec<String> = env::args().collect();

        info!("building parameters...");
        let params = Config::new(&args)?.get_params();
        info!("{}", params);

        let mut docs: Vec<Document> = Vec::with_capacity(params.corpus_files.len());
        for path in &params.corpus_files {

            let timer = Instant::now();
            let tokens = WordTokenizer.read(BufReader::new(File::open(path)?))?;
            let doc = Document::new(tokens);

            let keywords = doc.incidence(&params.params)?.keywords(params.top_n);
            println!("{}: {} tokens, {} terms", path, doc.token_count(), doc.len());
            println!("keywords: {}", keywords.join(" "));

            info!("finished {}, took {} ms ...", path, timer.elapsed().as_millis());
            docs.push(doc);
        }

        if docs.len() > 1 {
            let timer = Instant::now();
            let adjacency = Adjacency::of_documents(&docs, &params.params)?;
            match adjacency.doc_sim() {
                Ok(sim) => println!("doc sim over {} shared terms: {}", adjacency.len(), sim),
                Err(e) => warn!("no document similarity: {}", e),
            }
            info!("finished adjacency, took {} ms ...", timer.elapsed().as_millis());
        }

        Ok(())
    }
}
