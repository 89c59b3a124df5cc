//! Dimensionality reduction of aggregated state matrices.
//!
//! Two collaborator contracts:
//!   - `LinearReducer`: fit once on a joint matrix, transform sub-matrices
//!     separately — both slices land in one shared coordinate frame.
//!   - `ManifoldReducer`: fit and apply in a single `fit_transform` call,
//!     with no held-out transform (the nonlinear case).
//!
//! The bundled `Pca` satisfies both: centered covariance, power iteration
//! with deflation, deterministic start vectors from a seeded RNG, and a
//! sign convention so repeated fits agree component by component.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::{EchoError, Result};

/// Linear reduction: shared basis, fit-then-transform semantics.
pub trait LinearReducer {
    fn fit(&mut self, rows: &[Vec<f64>]) -> Result<()>;
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;
}

/// Nonlinear reduction: one-shot embedding of a single matrix.
pub trait ManifoldReducer {
    fn fit_transform(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;
}

// ---------------------------------------------------------------------------
// Pca
// ---------------------------------------------------------------------------

/// Principal component analysis via power iteration on the covariance
/// matrix, one component at a time with deflation.
#[derive(Clone, Debug)]
pub struct Pca {
    pub n_components: usize,
    pub seed: u64,
    /// Feature means from the fit matrix
    pub mean: Vec<f64>,
    /// Principal axes, one row per component
    pub components: Vec<Vec<f64>>,
}

impl Pca {
    pub fn new(n_components: usize, seed: u64) -> Result<Self> {
        if n_components == 0 {
            return Err(EchoError::Config("n_components must be > 0".into()));
        }
        Ok(Self { n_components, seed, mean: Vec::new(), components: Vec::new() })
    }

    fn fitted(&self) -> bool {
        !self.components.is_empty()
    }
}

impl LinearReducer for Pca {
    fn fit(&mut self, rows: &[Vec<f64>]) -> Result<()> {
        if rows.len() < 2 {
            return Err(EchoError::Data(format!(
                "PCA needs at least 2 rows, got {}",
                rows.len()
            )));
        }
        let dim = rows[0].len();
        if self.n_components > dim {
            return Err(EchoError::Config(format!(
                "n_components ({}) exceeds feature width ({dim})",
                self.n_components
            )));
        }

        // Feature means
        let mut mean = vec![0.0f64; dim];
        for row in rows {
            if row.len() != dim {
                return Err(EchoError::DimensionMismatch { expected: dim, got: row.len() });
            }
            for (m, &v) in mean.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        let n = rows.len() as f64;
        for m in mean.iter_mut() {
            *m /= n;
        }

        // Covariance (dim × dim, row-major)
        let mut cov = vec![0.0f64; dim * dim];
        for row in rows {
            for i in 0..dim {
                let ci = row[i] - mean[i];
                for j in i..dim {
                    cov[i * dim + j] += ci * (row[j] - mean[j]);
                }
            }
        }
        for i in 0..dim {
            for j in i..dim {
                let v = cov[i * dim + j] / (n - 1.0);
                cov[i * dim + j] = v;
                cov[j * dim + i] = v;
            }
        }

        // Leading eigenvectors by power iteration + deflation
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut components = Vec::with_capacity(self.n_components);

        for _ in 0..self.n_components {
            let (v, lambda) = dominant_eigenvector(&cov, dim, &mut rng);
            // Deflate: cov -= λ v vᵀ
            for i in 0..dim {
                for j in 0..dim {
                    cov[i * dim + j] -= lambda * v[i] * v[j];
                }
            }
            components.push(v);
        }

        self.mean = mean;
        self.components = components;
        Ok(())
    }

    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if !self.fitted() {
            return Err(EchoError::Config("PCA transform before fit".into()));
        }
        let dim = self.mean.len();

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != dim {
                return Err(EchoError::DimensionMismatch { expected: dim, got: row.len() });
            }
            let projected: Vec<f64> = self
                .components
                .iter()
                .map(|axis| {
                    row.iter()
                        .zip(axis.iter().zip(self.mean.iter()))
                        .map(|(&x, (&a, &m))| (x - m) * a)
                        .sum()
                })
                .collect();
            out.push(projected);
        }
        Ok(out)
    }
}

impl ManifoldReducer for Pca {
    fn fit_transform(&mut self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.fit(rows)?;
        self.transform(rows)
    }
}

/// Power-iterate to the dominant eigenpair of a symmetric matrix. The sign
/// is fixed so the largest-magnitude entry is positive.
fn dominant_eigenvector(cov: &[f64], dim: usize, rng: &mut ChaCha8Rng) -> (Vec<f64>, f64) {
    let mut v: Vec<f64> = (0..dim).map(|_| rng.gen::<f64>() - 0.5).collect();
    normalize(&mut v);

    for _ in 0..100 {
        let mut u = vec![0.0f64; dim];
        for i in 0..dim {
            let mut sum = 0.0;
            for j in 0..dim {
                sum += cov[i * dim + j] * v[j];
            }
            u[i] = sum;
        }
        if !normalize(&mut u) {
            // Covariance is (numerically) zero in the remaining subspace.
            break;
        }
        v = u;
    }

    // Rayleigh quotient with the unit vector: λ = vᵀ C v
    let mut lambda = 0.0;
    for i in 0..dim {
        let mut sum = 0.0;
        for j in 0..dim {
            sum += cov[i * dim + j] * v[j];
        }
        lambda += v[i] * sum;
    }

    // Sign convention for reproducibility
    let max_idx = v
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().partial_cmp(&b.1.abs()).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if v[max_idx] < 0.0 {
        for x in v.iter_mut() {
            *x = -*x;
        }
    }

    (v, lambda)
}

fn normalize(v: &mut [f64]) -> bool {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return false;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    true
}
