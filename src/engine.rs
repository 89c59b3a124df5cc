//! Authorship analysis engine.
//!
//! Wires converter → reservoir → aggregation → reduction → ranking into
//! the two experiment pipelines:
//!   - two-author clustering: joint PCA over both authors' state
//!     trajectories, rasterized as a two-channel projection image
//!   - document embeddings: one time-averaged state vector per document,
//!     assembled columnwise and ranked by Euclidean distance
//!
//! Everything runs single-threaded to completion; the first failing
//! document aborts the run.

use std::collections::HashSet;

use serde::Serialize;

use crate::convert::Converter;
use crate::errors::{EchoError, Result};
use crate::rank::DocumentEmbeddings;
use crate::raster::ProjectionImage;
use crate::reduce::{LinearReducer, Pca};
use crate::reservoir::{EchoStateReservoir, ReservoirConfig};
use crate::states;

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Experiment-level settings on top of the reservoir parameters.
#[derive(Clone, Debug, Serialize)]
pub struct EngineConfig {
    pub reservoir: ReservoirConfig,
    /// Number of startup states to discard per document
    pub startup: usize,
    /// Reduced dimensionality for PCA stages
    pub n_components: usize,
}

// ---------------------------------------------------------------------------
// AuthorshipEngine
// ---------------------------------------------------------------------------

/// One converter + one reservoir, shared read-only across every document
/// of a run.
pub struct AuthorshipEngine {
    pub converter: Converter,
    pub reservoir: EchoStateReservoir,
    pub startup: usize,
}

impl AuthorshipEngine {
    /// Build an engine; the reservoir's input width must match the
    /// converter's output width.
    pub fn new(converter: Converter, config: ReservoirConfig, startup: usize) -> Result<Self> {
        if config.input_dim != converter.input_dim() {
            return Err(EchoError::DimensionMismatch {
                expected: converter.input_dim(),
                got: config.input_dim,
            });
        }
        let reservoir = EchoStateReservoir::new(config)?;
        Ok(Self { converter, reservoir, startup })
    }

    /// Full post-startup state trajectory of one document.
    pub fn document_states(&self, text: &str, exclude: &HashSet<String>) -> Result<Vec<Vec<f64>>> {
        let inputs = self.converter.convert(text, exclude)?;
        let trajectory = self.reservoir.run(&inputs)?;
        states::discard_startup(trajectory, self.startup)
    }

    /// One fixed-width vector per document: the time average of its
    /// post-startup trajectory.
    pub fn document_embedding(&self, text: &str, exclude: &HashSet<String>) -> Result<Vec<f64>> {
        let trajectory = self.document_states(text, exclude)?;
        states::time_average(&trajectory)
    }

    /// Embed a whole corpus columnwise, in document order.
    pub fn embed_documents<S: AsRef<str>>(
        &self,
        documents: &[S],
        exclude: &HashSet<String>,
    ) -> Result<DocumentEmbeddings> {
        let mut columns = Vec::with_capacity(documents.len());
        for doc in documents {
            columns.push(self.document_embedding(doc.as_ref(), exclude)?);
        }
        DocumentEmbeddings::from_columns(columns)
    }
}

// ---------------------------------------------------------------------------
// Two-author clustering
// ---------------------------------------------------------------------------

/// Everything the clustering pipeline produces, for logging and
/// inspection.
pub struct ClusteringOutcome {
    /// Reduced states of the first author, one row per time step
    pub reduced_first: Vec<Vec<f64>>,
    /// Reduced states of the second author
    pub reduced_second: Vec<Vec<f64>>,
    /// Two-channel projection of the first two components
    pub image: ProjectionImage,
}

/// Run the two-author clustering experiment: both trajectories are
/// reduced in one shared PCA basis (fit on the joined matrix, transform
/// per author) and rasterized.
pub fn cluster_two_authors(
    engine: &AuthorshipEngine,
    first_text: &str,
    second_text: &str,
    n_components: usize,
    seed: u64,
    exclude: &HashSet<String>,
) -> Result<ClusteringOutcome> {
    if n_components < 2 {
        return Err(EchoError::Config(format!(
            "projection needs at least 2 components, got {n_components}"
        )));
    }

    let first = engine.document_states(first_text, exclude)?;
    let second = engine.document_states(second_text, exclude)?;

    let joined = states::join(first.clone(), second.clone());
    let mut pca = Pca::new(n_components, seed)?;
    pca.fit(&joined)?;

    let reduced_first = pca.transform(&first)?;
    let reduced_second = pca.transform(&second)?;

    // PCA projections are unbounded; the rasterizer clamps to [-1, 1].
    let image = ProjectionImage::from_point_sets(&reduced_first, &reduced_second)?;

    Ok(ClusteringOutcome { reduced_first, reduced_second, image })
}
