//! One-hot word converter with a capped, frequency-ranked vocabulary.

use std::collections::{HashMap, HashSet};

use crate::convert::tokenize;
use crate::errors::{EchoError, Result};

/// Index reserved for out-of-vocabulary words.
pub const UNK_ID: usize = 0;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Word-level vocabulary mapping words ↔ integer IDs. The UNK slot comes
/// first, then words in descending corpus frequency, capped at `max_size`.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    pub word_to_id: HashMap<String, usize>,
    pub id_to_word: Vec<String>,
    pub size: usize,
}

impl Vocabulary {
    /// Build a vocabulary from a corpus, keeping the top `max_size - 1`
    /// most frequent words (one slot is reserved for UNK).
    pub fn from_corpus<S: AsRef<str>>(documents: &[S], max_size: usize) -> Result<Self> {
        if max_size < 2 {
            return Err(EchoError::Config(format!(
                "vocabulary size must be >= 2, got {max_size}"
            )));
        }

        let mut freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            for word in tokenize(doc.as_ref()) {
                *freq.entry(word.to_lowercase()).or_insert(0) += 1;
            }
        }

        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        // Descending frequency, alphabetical among ties so the layout is
        // reproducible across runs.
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut word_to_id = HashMap::new();
        let mut id_to_word = vec!["<UNK>".to_string()];
        word_to_id.insert("<UNK>".to_string(), UNK_ID);

        for (word, _count) in words.into_iter().take(max_size - 1) {
            let id = id_to_word.len();
            word_to_id.insert(word.clone(), id);
            id_to_word.push(word);
        }

        let size = id_to_word.len();
        Ok(Self { word_to_id, id_to_word, size })
    }

    /// Encode a word to its ID. Unknown words map to UNK.
    pub fn encode_word(&self, word: &str) -> usize {
        let lower = word.to_lowercase();
        *self.word_to_id.get(&lower).unwrap_or(&UNK_ID)
    }
}

// ---------------------------------------------------------------------------
// OneHotConverter
// ---------------------------------------------------------------------------

/// Converts text to one-hot word codes over a fixed vocabulary. Words in
/// the exclusion set are dropped before encoding.
#[derive(Clone, Debug)]
pub struct OneHotConverter {
    pub vocab: Vocabulary,
}

impl OneHotConverter {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    /// One-hot width: the vocabulary size (UNK included).
    pub fn input_dim(&self) -> usize {
        self.vocab.size
    }

    pub fn convert(&self, text: &str, exclude: &HashSet<String>) -> Result<Vec<Vec<f64>>> {
        let width = self.vocab.size;
        let mut rows = Vec::new();

        for token in tokenize(text) {
            let lower = token.to_lowercase();
            if exclude.contains(&lower) {
                continue;
            }
            let id = self.vocab.encode_word(&lower);
            let mut row = vec![0.0f64; width];
            row[id] = 1.0;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(EchoError::Data(
                "document is empty after word filtering".into(),
            ));
        }
        Ok(rows)
    }
}
