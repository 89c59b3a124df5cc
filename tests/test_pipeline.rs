//! Integration tests for the authorship pipeline.
//!
//! Exercises the complete chain: converter, reservoir, aggregation,
//! reduction, ranking and rasterization through the public API.

use std::collections::HashSet;

use echotext::convert::onehot::{OneHotConverter, Vocabulary};
use echotext::convert::tags::TagConverter;
use echotext::convert::Converter;
use echotext::engine::{cluster_two_authors, AuthorshipEngine};
use echotext::errors::EchoError;
use echotext::rank::similar_documents;
use echotext::reduce::{LinearReducer, ManifoldReducer, Pca};
use echotext::reservoir::ReservoirConfig;

// ---------------------------------------------------------------------------
// Test corpus
// ---------------------------------------------------------------------------

/// Short narrative sentences: frequent determiners and simple clauses.
fn narrative_author() -> Vec<&'static str> {
    vec![
        "The cat sat on the mat and watched the quiet garden.",
        "The dog ran across the field while the boy laughed loudly.",
        "The bird flew over the tall tree and sang a bright song.",
        "The girl walked to the river and threw a small stone.",
    ]
}

/// Discursive sentences: adverbs, subordination, almost no articles.
fn discursive_author() -> Vec<&'static str> {
    vec![
        "Consequently, analysis requires patience, and results emerge slowly.",
        "Certainly, arguments fail when assumptions remain carelessly unexamined.",
        "Therefore, conclusions follow only from carefully verified premises.",
        "Evidently, reasoning improves when claims are repeatedly questioned.",
    ]
}

fn small_engine(converter: Converter, size: usize, startup: usize) -> AuthorshipEngine {
    let mut config = ReservoirConfig::clustering_profile(converter.input_dim(), 42);
    config.size = size;
    AuthorshipEngine::new(converter, config, startup).unwrap()
}

// ---------------------------------------------------------------------------
// Step 1: converter + reservoir
// ---------------------------------------------------------------------------

#[test]
fn test_tag_pipeline_state_shapes() {
    let engine = small_engine(Converter::PosTags(TagConverter::new()), 25, 0);
    let text = narrative_author().join(" ");

    let inputs = engine.converter.convert(&text, &HashSet::new()).unwrap();
    let trajectory = engine.document_states(&text, &HashSet::new()).unwrap();

    assert_eq!(trajectory.len(), inputs.len(), "one state per input vector");
    for state in &trajectory {
        assert_eq!(state.len(), 25);
    }
}

#[test]
fn test_onehot_pipeline_round_trip() {
    let corpus: Vec<String> = narrative_author().iter().map(|s| s.to_string()).collect();
    let vocab = Vocabulary::from_corpus(&corpus, 50).unwrap();
    let engine = small_engine(Converter::OneHotWords(OneHotConverter::new(vocab)), 20, 1);

    // Same document, same seeded engine: embeddings must be identical.
    let e1 = engine.document_embedding(&corpus[0], &HashSet::new()).unwrap();
    let e2 = engine.document_embedding(&corpus[0], &HashSet::new()).unwrap();
    assert_eq!(e1, e2);
}

#[test]
fn test_round_trip_through_deterministic_reducer() {
    let corpus: Vec<String> = narrative_author().iter().map(|s| s.to_string()).collect();
    let vocab = Vocabulary::from_corpus(&corpus, 50).unwrap();
    let engine = small_engine(Converter::OneHotWords(OneHotConverter::new(vocab)), 20, 1);

    let run = || {
        let embeddings = engine.embed_documents(&corpus, &HashSet::new()).unwrap();
        let mut pca = Pca::new(2, 7).unwrap();
        pca.fit_transform(&embeddings.to_rows()).unwrap()
    };
    assert_eq!(run(), run(), "converter + reservoir + PCA must be reproducible");
}

// ---------------------------------------------------------------------------
// Step 2: document embeddings + ranking
// ---------------------------------------------------------------------------

#[test]
fn test_same_author_documents_rank_closer() {
    let mut documents: Vec<String> = Vec::new();
    documents.extend(narrative_author().iter().map(|s| s.to_string()));
    documents.extend(discursive_author().iter().map(|s| s.to_string()));

    let engine = small_engine(Converter::PosTags(TagConverter::new()), 40, 1);
    let embeddings = engine.embed_documents(&documents, &HashSet::new()).unwrap();
    assert_eq!(embeddings.n_documents, 8);

    let ranking = similar_documents(&embeddings, 0).unwrap();
    assert_eq!(ranking.len(), 7, "every other document is ranked");
    for window in ranking.windows(2) {
        assert!(window[0].1 <= window[1].1, "distances must ascend");
    }

    // The nearest neighbor of a narrative document should be narrative.
    assert!(
        ranking[0].0 < 4,
        "nearest neighbor of document 0 was {} at distance {}",
        ranking[0].0,
        ranking[0].1
    );
}

// ---------------------------------------------------------------------------
// Step 3: two-author clustering
// ---------------------------------------------------------------------------

#[test]
fn test_clustering_outcome_shapes_and_ink() {
    let engine = small_engine(Converter::PosTags(TagConverter::new()), 30, 2);
    let text1 = narrative_author().join(" ");
    let text2 = discursive_author().join(" ");

    let outcome =
        cluster_two_authors(&engine, &text1, &text2, 3, 42, &HashSet::new()).unwrap();

    for row in outcome.reduced_first.iter().chain(&outcome.reduced_second) {
        assert_eq!(row.len(), 3);
    }

    let ink: f64 = outcome.image.channels[0].iter().sum::<f64>()
        + outcome.image.channels[1].iter().sum::<f64>();
    assert!((ink - 256.0).abs() < 1e-6);
}

#[test]
fn test_shared_basis_matches_joint_transform() {
    let engine = small_engine(Converter::PosTags(TagConverter::new()), 20, 0);
    let text1 = narrative_author().join(" ");
    let text2 = discursive_author().join(" ");

    let first = engine.document_states(&text1, &HashSet::new()).unwrap();
    let second = engine.document_states(&text2, &HashSet::new()).unwrap();

    let mut joined = first.clone();
    joined.extend(second.clone());

    let mut pca = Pca::new(2, 42).unwrap();
    pca.fit(&joined).unwrap();

    let whole = pca.transform(&joined).unwrap();
    let split_a = pca.transform(&first).unwrap();
    let split_b = pca.transform(&second).unwrap();

    assert_eq!(whole[..first.len()], split_a[..]);
    assert_eq!(whole[first.len()..], split_b[..]);
}

// ---------------------------------------------------------------------------
// Step 4: fail-fast behavior
// ---------------------------------------------------------------------------

#[test]
fn test_fully_excluded_document_aborts() {
    let engine = small_engine(Converter::PosTags(TagConverter::new()), 20, 0);
    let exclude: HashSet<String> = ["DT".to_string(), "NN".to_string()].into_iter().collect();

    // "the" is a determiner and "cat" a noun; nothing survives.
    let result = engine.embed_documents(&["the cat"], &exclude);
    assert!(matches!(result, Err(EchoError::Data(_))));
}

#[test]
fn test_startup_longer_than_document_aborts() {
    let engine = small_engine(Converter::PosTags(TagConverter::new()), 20, 500);
    let result = engine.document_states("the cat sat", &HashSet::new());
    assert!(matches!(result, Err(EchoError::Config(_))));
}
