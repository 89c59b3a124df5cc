//! Document-embedding storage and similarity ranking.

use crate::errors::{EchoError, Result};

// ---------------------------------------------------------------------------
// DocumentEmbeddings
// ---------------------------------------------------------------------------

/// Fixed-width document embeddings stored columnwise: column j is document
/// j. Shared read-only after construction.
#[derive(Clone, Debug)]
pub struct DocumentEmbeddings {
    /// Embedding width
    pub dim: usize,
    /// Number of documents (columns)
    pub n_documents: usize,
    /// Columnwise data: entry (i, j) at data[j * dim + i]
    data: Vec<f64>,
}

impl DocumentEmbeddings {
    /// Assemble from one column per document. All columns must share one
    /// width.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let first = columns
            .first()
            .ok_or_else(|| EchoError::Data("no document embeddings".into()))?;
        let dim = first.len();
        if dim == 0 {
            return Err(EchoError::Data("zero-width document embedding".into()));
        }

        let n_documents = columns.len();
        let mut data = Vec::with_capacity(dim * n_documents);
        for col in &columns {
            if col.len() != dim {
                return Err(EchoError::DimensionMismatch { expected: dim, got: col.len() });
            }
            data.extend_from_slice(col);
        }
        Ok(Self { dim, n_documents, data })
    }

    pub fn column(&self, j: usize) -> &[f64] {
        &self.data[j * self.dim..(j + 1) * self.dim]
    }

    /// Rows view (one row per document) for reducers that expect
    /// row-per-sample matrices.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_documents).map(|j| self.column(j).to_vec()).collect()
    }
}

// ---------------------------------------------------------------------------
// Similarity ranking
// ---------------------------------------------------------------------------

/// Rank every other document by ascending Euclidean distance to the query
/// column. The sort is stable, so equal distances keep encounter order.
/// Always returns all `n_documents - 1` entries.
pub fn similar_documents(
    embeddings: &DocumentEmbeddings,
    query: usize,
) -> Result<Vec<(usize, f64)>> {
    if embeddings.n_documents < 2 {
        return Err(EchoError::Config(format!(
            "similarity ranking needs at least 2 documents, got {}",
            embeddings.n_documents
        )));
    }
    if query >= embeddings.n_documents {
        return Err(EchoError::Config(format!(
            "query index {} out of range ({} documents)",
            query, embeddings.n_documents
        )));
    }

    let q = embeddings.column(query);
    let mut similarities: Vec<(usize, f64)> = Vec::with_capacity(embeddings.n_documents - 1);
    for j in 0..embeddings.n_documents {
        if j == query {
            continue;
        }
        similarities.push((j, euclidean(q, embeddings.column(j))));
    }

    similarities.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(similarities)
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
