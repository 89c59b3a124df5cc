//! Dense word-vector converter.
//!
//! Loads pre-trained vectors from a whitespace text file (`word v1 v2 ...`,
//! one entry per line, '#' comments skipped). Training embeddings is out of
//! scope; this converter only consumes what an external trainer produced.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::convert::tokenize;
use crate::errors::{EchoError, Result};

// ---------------------------------------------------------------------------
// WordVectors
// ---------------------------------------------------------------------------

/// A table of pre-trained word vectors with a single fixed dimensionality.
#[derive(Clone, Debug)]
pub struct WordVectors {
    pub dim: usize,
    pub table: HashMap<String, Vec<f64>>,
}

impl WordVectors {
    /// Load vectors from a text file. Every line must carry the same
    /// number of components.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut dim = 0usize;
        let mut table = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let word = parts
                .next()
                .ok_or_else(|| EchoError::Data(format!("line {}: missing word", line_no + 1)))?
                .to_lowercase();

            let values: Vec<f64> = parts
                .map(|p| {
                    p.parse::<f64>().map_err(|_| {
                        EchoError::Data(format!("line {}: bad component '{p}'", line_no + 1))
                    })
                })
                .collect::<Result<_>>()?;

            if values.is_empty() {
                return Err(EchoError::Data(format!(
                    "line {}: no components for '{word}'",
                    line_no + 1
                )));
            }
            if dim == 0 {
                dim = values.len();
            } else if values.len() != dim {
                return Err(EchoError::DimensionMismatch { expected: dim, got: values.len() });
            }

            table.insert(word, values);
        }

        if table.is_empty() {
            return Err(EchoError::Data("word vector file holds no entries".into()));
        }
        Ok(Self { dim, table })
    }
}

// ---------------------------------------------------------------------------
// VectorConverter
// ---------------------------------------------------------------------------

/// Converts text to dense embedding rows. Tokens without a vector, like
/// excluded tokens, are dropped.
#[derive(Clone, Debug)]
pub struct VectorConverter {
    pub vectors: WordVectors,
}

impl VectorConverter {
    pub fn new(vectors: WordVectors) -> Self {
        Self { vectors }
    }

    pub fn input_dim(&self) -> usize {
        self.vectors.dim
    }

    pub fn convert(&self, text: &str, exclude: &HashSet<String>) -> Result<Vec<Vec<f64>>> {
        let mut rows = Vec::new();
        for token in tokenize(text) {
            let lower = token.to_lowercase();
            if exclude.contains(&lower) {
                continue;
            }
            if let Some(v) = self.vectors.table.get(&lower) {
                rows.push(v.clone());
            }
        }

        if rows.is_empty() {
            return Err(EchoError::Data(
                "document has no tokens with known vectors".into(),
            ));
        }
        Ok(rows)
    }
}
