// End-to-end runs of the pipeline: tokens -> vocabulary -> co-occurrence ->
// pmi -> word vectors -> keywords / adjacency.

use pmi_embedder::text::parse;
use pmi_embedder::{Adjacency, Document, Error, Incidence, Params, Tokenizer, WordTokenizer};

const TOY: &str = "the cat sat on the mat the cat ran";

// ============================================================
// the cat sat on the mat, window 2
// ============================================================

#[test]
fn toy_vocabulary() {
    let doc = Document::new(parse(TOY));
    assert_eq!(doc.len(), 6);
    let mut vocab: Vec<&str> = doc.vocab().iter().map(String::as_str).collect();
    vocab.sort_unstable();
    assert_eq!(vocab, vec!["cat", "mat", "on", "ran", "sat", "the"]);
}

#[test]
fn toy_cooccurrence_prefers_close_pairs() {
    let doc = Document::new(parse(TOY));
    let cooc = doc.cooccurrence(&Params::new(2)).unwrap();
    let the = doc.id("the").unwrap();
    let cat = doc.id("cat").unwrap();
    let ran = doc.id("ran").unwrap();
    assert!(cooc.get(the, cat) > cooc.get(the, ran));
    assert!(cooc.is_symmetric());
}

#[test]
fn toy_pmi_and_vectors() {
    let doc = Document::new(parse(TOY));
    let params = Params::new(2);

    let pmi = doc.pmi(&params).unwrap();
    let the_cat = pmi.get(doc.id("the").unwrap(), doc.id("cat").unwrap()).unwrap();
    assert!(the_cat.is_finite());

    let model = doc.word_vectors(&params).unwrap();
    let mapping = model.mapping();
    let dims: Vec<usize> = doc.vocab().iter().map(|t| mapping.vector(t).unwrap().len()).collect();
    assert_eq!(dims.len(), 6);
    assert!(dims.iter().all(|d| *d == dims[0]));

    for a in doc.vocab() {
        for b in doc.vocab() {
            assert_eq!(mapping.similarity(a, b).unwrap(), mapping.similarity(b, a).unwrap());
        }
    }
}

#[test]
fn vectors_are_reproducible() {
    let params = Params::new(2);
    let x = Document::new(parse(TOY)).word_vectors(&params).unwrap();
    let y = Document::new(parse(TOY)).word_vectors(&params).unwrap();
    assert_eq!(x.matrix(), y.matrix());
}

// ============================================================
// degenerate input
// ============================================================

#[test]
fn empty_corpus_degrades_to_empty_results() {
    let doc = Document::new(WordTokenizer.read("".as_bytes()).unwrap());
    let params = Params::new(2);
    assert_eq!(doc.len(), 0);

    let model = doc.word_vectors(&params).unwrap();
    assert!(model.mapping().is_empty());

    let incidence = Incidence::of(&doc, &params).unwrap();
    for n in [None, Some(0), Some(3), Some(100)] {
        assert!(incidence.keywords(n).is_empty());
    }
    assert!(doc.key_vectors(&params).unwrap().is_empty());
}

#[test]
fn unknown_term_is_a_lookup_error() {
    let model = Document::new(parse(TOY)).word_vectors(&Params::new(2)).unwrap();
    assert!(matches!(model.mapping().similarity("cat", "dog"), Err(Error::UnknownTerm(_))));
}

// ============================================================
// keywords
// ============================================================

#[test]
fn key_vectors_follow_keywords() {
    let doc = Document::new(parse(
        "rust gives memory safety without garbage collection and rust gives fearless \
         concurrency through ownership while the borrow checker enforces ownership rules",
    ));
    let params = Params::new(2).with_max_dim(4);
    let keywords = doc.incidence(&params).unwrap().keywords(Some(4));
    let keyed = doc.key_vectors(&params).unwrap();

    assert!(keyed.len() <= 4);
    assert_eq!(keyed.vocabulary().collect::<Vec<_>>(), keywords.iter().map(String::as_str).collect::<Vec<_>>());
    // max_dim caps both the keyword count and the vector length
    assert_eq!(keyed.dim(), 4);
}

// ============================================================
// adjacency
// ============================================================

#[test]
fn identical_corpora_have_finite_doc_sim() {
    let doc = Document::new(parse(TOY));
    let adjacency = Adjacency::of_documents(&[doc.clone(), doc], &Params::new(2)).unwrap();
    let sim = adjacency.doc_sim().unwrap();
    assert!(sim.is_finite());
}

#[test]
fn self_similarity_beats_unrelated() {
    let params = Params::new(2);
    // the same thirteen words, so both models have square vector matrices of one size
    let a = Document::new(parse("the old man fished alone in a small boat and the old man caught no fish"));
    let b = Document::new(parse("no fish caught the man in a small old boat and alone the man fished old"));
    assert_eq!(a.len(), b.len());

    let same = Adjacency::of_documents(&[a.clone(), a.clone()], &params).unwrap();
    let other = Adjacency::of_documents(&[a, b], &params).unwrap();
    assert!(!other.is_empty());
    assert!(other.doc_sim().unwrap() < same.doc_sim().unwrap());
}

// ============================================================
// natural text, where the pmi matrix is rank deficient
// ============================================================

const DICKENS: &str = "It was the best of times, it was the worst of times, it was the age of wisdom, \
    it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity, \
    it was the season of Light, it was the season of Darkness, it was the spring of hope, \
    it was the winter of despair. We had everything before us, we had nothing before us, \
    we were all going direct to Heaven, we were all going direct the other way.";

const REPETITIVE: &str = "the cat sat on the mat the dog sat on the log \
    the cat sat on the log the dog sat on the mat";

#[test]
fn natural_text_factorizes_for_every_window() {
    for text in [DICKENS, REPETITIVE] {
        let doc = Document::new(parse(text));
        for window in 1..=3 {
            for positive in [false, true] {
                let params = Params::new(window).with_positive_pmi(positive);

                let model = doc.word_vectors(&params).unwrap();
                let mapping = model.mapping();
                assert_eq!(mapping.len(), doc.len());
                // columns of U are orthonormal, so every row has norm at most 1
                for term in doc.vocab() {
                    let v = mapping.vector(term).unwrap();
                    assert!(v.iter().all(|x| x.is_finite()));
                    assert!(v.dot(&v) <= 1.0 + 1e-9);
                }

                let keyed = doc.key_vectors(&params.clone().with_max_dim(5)).unwrap();
                assert!(keyed.len() <= 5);
            }
        }
    }
}

#[test]
fn natural_text_adjacency() {
    let doc = Document::new(parse(DICKENS));
    let other = Document::new(parse(REPETITIVE));
    for window in 1..=3 {
        let params = Params::new(window);

        let same = Adjacency::of_documents(&[doc.clone(), doc.clone()], &params).unwrap();
        assert!((same.doc_sim().unwrap() - 1.0).abs() < 1e-8);

        // only "the" is shared
        let mixed = Adjacency::of_documents(&[doc.clone(), other.clone()], &params).unwrap();
        assert_eq!(mixed.len(), 1);
        assert!(mixed.doc_sim().unwrap().abs() <= 1.0 + 1e-12);
    }
}
