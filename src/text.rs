
use crate::error::Result;

use std::io::Read;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// A normalized corpus: the ordered word sequence, repeats included.
pub type Text = Vec<String>;

// defines the behavior needed for tokenizing a corpus
pub trait Tokenizer {

    fn tokenize(&self, raw: &str) -> Text;

    /// Reads the whole stream as utf-8 and tokenizes it.
    fn read<R: Read>(&self, mut raw: R) -> Result<Text>
    where
        Self: Sized,
    {
        let mut buf = String::new();
        raw.read_to_string(&mut buf)?;
        Ok(self.tokenize(&buf))
    }
}

/// Canonical decomposition, combining marks dropped, lower cased, split on
/// anything that is not alphanumeric.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, raw: &str) -> Text {
        let folded: String = raw
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();

        folded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Shorthand for the default tokenizer over an in-memory string.
pub fn parse(raw: &str) -> Text {
    WordTokenizer.tokenize(raw)
}
