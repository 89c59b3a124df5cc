//! Part-of-speech tag converter.
//!
//! Maps each token to a one-hot code over an explicit, versioned tagset
//! table owned by this module — the table is a constant, never inferred
//! from a tagging library at runtime. The bundled tagger is a small
//! lexicon + suffix heuristic standing in for a real tagging collaborator;
//! anything it cannot place falls back to NN.

use std::collections::HashSet;

use crate::convert::tokenize;
use crate::errors::{EchoError, Result};

/// Tagset revision the one-hot layout is pinned to.
pub const TAGSET_VERSION: &str = "penn-treebank-3";

/// Penn Treebank tagset. Index in this table = one-hot component.
pub const PENN_TAGS: [&str; 44] = [
    "''", ",", ":", ".", "``", "-LRB-", "-RRB-", "AFX", "CC", "CD", "DT", "EX", "FW", "IN", "JJ",
    "JJR", "JJS", "LS", "MD", "NN", "NNS", "NNP", "NNPS", "PDT", "POS", "PRP", "PRP$", "RB",
    "RBR", "RBS", "RP", "SYM", "TO", "UH", "VB", "VBZ", "VBP", "VBD", "VBN", "VBG", "WDT", "WP",
    "WP$", "WRB",
];

// ---------------------------------------------------------------------------
// TagConverter
// ---------------------------------------------------------------------------

/// Converts text to a sequence of one-hot tag codes, one per retained
/// token. Tokens whose tag is in the exclusion set are dropped.
#[derive(Clone, Debug)]
pub struct TagConverter;

impl TagConverter {
    pub fn new() -> Self {
        Self
    }

    /// One-hot width: the tagset size.
    pub fn input_dim(&self) -> usize {
        PENN_TAGS.len()
    }

    /// Index of a tag in the table.
    pub fn tag_index(&self, tag: &str) -> Option<usize> {
        PENN_TAGS.iter().position(|t| *t == tag)
    }

    pub fn convert(&self, text: &str, exclude: &HashSet<String>) -> Result<Vec<Vec<f64>>> {
        let width = self.input_dim();
        let mut rows = Vec::new();

        for token in tokenize(text) {
            let tag = tag_token(&token);
            if exclude.contains(tag) {
                continue;
            }
            // Tags come from tag_token, which only emits table entries.
            let index = self
                .tag_index(tag)
                .ok_or_else(|| EchoError::Data(format!("tag '{tag}' not in tagset")))?;
            let mut row = vec![0.0f64; width];
            row[index] = 1.0;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(EchoError::Data(
                "document is empty after tag filtering".into(),
            ));
        }
        Ok(rows)
    }
}

impl Default for TagConverter {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Built-in tagger
// ---------------------------------------------------------------------------

/// Tag a single token. Closed-class lexicon first, then shape and suffix
/// heuristics, NN as the fallback.
pub fn tag_token(token: &str) -> &'static str {
    if let Some(tag) = tag_punctuation(token) {
        return tag;
    }

    let lower = token.to_lowercase();
    if let Some(tag) = tag_closed_class(&lower) {
        return tag;
    }

    if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return "CD";
    }
    if token.chars().next().is_some_and(|c| c.is_uppercase()) {
        return "NNP";
    }

    if lower.ends_with("ly") {
        "RB"
    } else if lower.ends_with("ing") {
        "VBG"
    } else if lower.ends_with("ed") {
        "VBD"
    } else if lower.ends_with("est") && lower.len() > 4 {
        "JJS"
    } else if lower.ends_with("ous") || lower.ends_with("ful") || lower.ends_with("ive") {
        "JJ"
    } else if lower.ends_with('s') && !lower.ends_with("ss") {
        "NNS"
    } else {
        "NN"
    }
}

fn tag_punctuation(token: &str) -> Option<&'static str> {
    match token {
        "." | "!" | "?" => Some("."),
        "," => Some(","),
        ":" | ";" | "--" | "..." => Some(":"),
        "''" | "'" | "\"" => Some("''"),
        "``" => Some("``"),
        "(" | "[" | "{" => Some("-LRB-"),
        ")" | "]" | "}" => Some("-RRB-"),
        "$" | "#" | "%" | "&" | "+" | "=" => Some("SYM"),
        _ => None,
    }
}

fn tag_closed_class(lower: &str) -> Option<&'static str> {
    let tag = match lower {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "no" | "every" => "DT",
        "all" | "both" | "half" => "PDT",
        "in" | "on" | "at" | "of" | "for" | "with" | "from" | "by" | "into" | "over" | "under"
        | "about" | "after" | "before" | "between" | "through" | "during" | "against" => "IN",
        "to" => "TO",
        "and" | "or" | "but" | "nor" | "yet" => "CC",
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" => "PRP",
        "my" | "your" | "his" | "its" | "our" | "their" => "PRP$",
        "who" | "whom" => "WP",
        "whose" => "WP$",
        "which" | "whatever" => "WDT",
        "when" | "where" | "why" | "how" => "WRB",
        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must" => "MD",
        "is" | "are" | "was" | "were" | "be" | "been" | "being" | "am" | "has" | "have" | "had"
        | "do" | "does" | "did" => "VB",
        "not" | "never" | "very" | "too" | "also" | "here" | "there" | "now" | "then" | "again" => {
            "RB"
        }
        "oh" | "ah" | "hey" | "wow" | "yes" | "ok" => "UH",
        _ => return None,
    };
    Some(tag)
}
