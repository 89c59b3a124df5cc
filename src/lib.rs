//! echotext — Echo State Network analysis of text authorship.
//!
//! Pipeline:
//!   text → symbol/vector sequence → fixed random leaky reservoir →
//!   state aggregation → dimensionality reduction → similarity ranking /
//!   projection images
//!
//! The reservoir is a feature extractor, not a model: its weights are
//! drawn once from a seed and never trained. Experiments are batch,
//! single-threaded and fail-fast.

pub mod convert;
pub mod corpus;
pub mod engine;
pub mod errors;
pub mod explog;
pub mod rank;
pub mod raster;
pub mod reduce;
pub mod reservoir;
pub mod states;
