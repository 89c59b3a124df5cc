//! Text → vector-sequence converters.
//!
//! A converter maps a raw document to an ordered sequence of fixed-width
//! numeric vectors, one per retained token, filtered by an exclusion set
//! over the converter's own symbol domain (tags for the POS converter,
//! words for the lexical converters). The vector width is constant per
//! experiment.
//!
//! The supported kinds are a closed enum resolved once at startup, not
//! string flags branched at call sites.

pub mod onehot;
pub mod tags;
pub mod vectors;

use std::collections::HashSet;

use crate::errors::Result;

/// The converter kinds supported by the pipeline.
#[derive(Clone, Debug)]
pub enum Converter {
    /// Part-of-speech tag one-hot codes
    PosTags(tags::TagConverter),
    /// Word one-hot codes over a capped vocabulary
    OneHotWords(onehot::OneHotConverter),
    /// Dense pre-trained word vectors
    WordVectors(vectors::VectorConverter),
}

impl Converter {
    /// Width of every vector this converter produces.
    pub fn input_dim(&self) -> usize {
        match self {
            Self::PosTags(c) => c.input_dim(),
            Self::OneHotWords(c) => c.input_dim(),
            Self::WordVectors(c) => c.input_dim(),
        }
    }

    /// Convert one document. Fails with a data error if nothing survives
    /// the exclusion filter — downstream aggregation cannot handle an
    /// empty sequence.
    pub fn convert(&self, text: &str, exclude: &HashSet<String>) -> Result<Vec<Vec<f64>>> {
        match self {
            Self::PosTags(c) => c.convert(text, exclude),
            Self::OneHotWords(c) => c.convert(text, exclude),
            Self::WordVectors(c) => c.convert(text, exclude),
        }
    }
}

/// Whitespace tokenizer with trailing-punctuation splitting. Case is
/// preserved; lexical converters lowercase on lookup.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let trimmed = word.trim_end_matches(|c: char| c.is_ascii_punctuation());
        let punct = &word[trimmed.len()..];

        if !trimmed.is_empty() {
            tokens.push(trimmed.to_string());
        }
        for c in punct.chars() {
            tokens.push(c.to_string());
        }
    }
    tokens
}
