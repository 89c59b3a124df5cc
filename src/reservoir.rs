//! Echo State Network reservoir — a fixed, randomly-weighted leaky-integrator
//! recurrent map used as a feature extractor.
//!
//! The reservoir is never trained. Its two weight structures are drawn once
//! from a seeded RNG and stay immutable for the lifetime of the object:
//!   - `w_in`:  input projection, scaled by `input_scaling`, sparsified by
//!     `input_sparsity`
//!   - `w_rec`: recurrent matrix, rescaled so its spectral radius matches the
//!     configured value, sparsified by `recurrent_sparsity`
//!
//! State update, per input vector x_t (s_0 = zero vector):
//!   pre_t = W_in · x_t + W_rec · s_{t-1}
//!   s_t   = (1 − leak_rate) · s_{t-1} + leak_rate · tanh(pre_t)
//!
//! Leak rate 1.0 means no memory of the prior state; values near 0 smooth
//! heavily. Spectral radius < 1 favors fading memory.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::errors::{EchoError, Result};

// ---------------------------------------------------------------------------
// ReservoirConfig
// ---------------------------------------------------------------------------

/// Reservoir parameters. Immutable after construction; together with the
/// seed they fully determine the weight matrices.
#[derive(Clone, Debug, Serialize)]
pub struct ReservoirConfig {
    /// Width of the input vectors
    pub input_dim: usize,
    /// Number of reservoir units (= state vector width)
    pub size: usize,
    /// Multiplier on the input projection weights
    pub input_scaling: f64,
    /// Mixing coefficient in (0, 1] between previous state and new activation
    pub leak_rate: f64,
    /// Target largest-magnitude eigenvalue of the recurrent matrix
    pub spectral_radius: f64,
    /// Probability that an input weight is retained (nonzero)
    pub input_sparsity: f64,
    /// Probability that a recurrent weight is retained (nonzero)
    pub recurrent_sparsity: f64,
    /// Seed for weight generation
    pub seed: u64,
}

impl ReservoirConfig {
    /// Reference profile for the two-author clustering experiment.
    pub fn clustering_profile(input_dim: usize, seed: u64) -> Self {
        Self {
            input_dim,
            size: 100,
            input_scaling: 0.5,
            leak_rate: 0.05,
            spectral_radius: 0.9,
            input_sparsity: 1.0,
            recurrent_sparsity: 0.5,
            seed,
        }
    }

    /// Reference profile for the document-embeddings experiment.
    pub fn embeddings_profile(input_dim: usize, seed: u64) -> Self {
        Self {
            input_dim,
            size: 2000,
            input_scaling: 1.0,
            leak_rate: 0.5,
            spectral_radius: 0.99,
            input_sparsity: 0.005,
            recurrent_sparsity: 0.1,
            seed,
        }
    }

    /// Check that every parameter is in its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 {
            return Err(EchoError::Config("input_dim must be > 0".into()));
        }
        if self.size == 0 {
            return Err(EchoError::Config("reservoir size must be > 0".into()));
        }
        if !(self.leak_rate > 0.0 && self.leak_rate <= 1.0) {
            return Err(EchoError::Config(format!(
                "leak_rate must be in (0, 1], got {}",
                self.leak_rate
            )));
        }
        if self.spectral_radius <= 0.0 {
            return Err(EchoError::Config(format!(
                "spectral_radius must be > 0, got {}",
                self.spectral_radius
            )));
        }
        for (name, v) in [
            ("input_sparsity", self.input_sparsity),
            ("recurrent_sparsity", self.recurrent_sparsity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(EchoError::Config(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EchoStateReservoir
// ---------------------------------------------------------------------------

/// A fixed random recurrent reservoir. Deterministic function of its seed
/// and the input sequence; no learning ever mutates the weights.
#[derive(Clone, Debug)]
pub struct EchoStateReservoir {
    pub config: ReservoirConfig,
    /// Input projection: size × input_dim (row-major)
    pub w_in: Vec<f64>,
    /// Recurrent matrix: size × size (row-major)
    pub w_rec: Vec<f64>,
}

impl EchoStateReservoir {
    /// Build a reservoir from a validated configuration.
    ///
    /// Input weights are uniform in [-input_scaling, input_scaling], kept
    /// with probability `input_sparsity`. Recurrent weights are uniform in
    /// [-0.5, 0.5], kept with probability `recurrent_sparsity`, then the
    /// whole matrix is rescaled to the configured spectral radius.
    pub fn new(config: ReservoirConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let n = config.size;
        let m = config.input_dim;

        let mut w_in = vec![0.0f64; n * m];
        for w in w_in.iter_mut() {
            let keep = rng.gen::<f64>() < config.input_sparsity;
            let value = (rng.gen::<f64>() * 2.0 - 1.0) * config.input_scaling;
            if keep {
                *w = value;
            }
        }

        let mut w_rec = vec![0.0f64; n * n];
        for w in w_rec.iter_mut() {
            let keep = rng.gen::<f64>() < config.recurrent_sparsity;
            let value = rng.gen::<f64>() - 0.5;
            if keep {
                *w = value;
            }
        }

        // Rescale to the configured spectral radius. A fully pruned matrix
        // has radius 0 and is left untouched.
        let radius = spectral_radius_estimate(&w_rec, n, &mut rng);
        if radius > 1e-12 {
            let scale = config.spectral_radius / radius;
            for w in w_rec.iter_mut() {
                *w *= scale;
            }
        }

        Ok(Self { config, w_in, w_rec })
    }

    /// Drive the reservoir with one input sequence, starting from the zero
    /// state. Returns one state vector per input vector, in input order.
    pub fn run(&self, inputs: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if inputs.is_empty() {
            return Err(EchoError::Data("empty input sequence".into()));
        }

        let n = self.config.size;
        let m = self.config.input_dim;
        let a = self.config.leak_rate;

        let mut state = vec![0.0f64; n];
        let mut states = Vec::with_capacity(inputs.len());

        for x in inputs {
            if x.len() != m {
                return Err(EchoError::DimensionMismatch { expected: m, got: x.len() });
            }

            let mut next = vec![0.0f64; n];
            for i in 0..n {
                let mut pre = 0.0;
                for (j, &xj) in x.iter().enumerate() {
                    pre += self.w_in[i * m + j] * xj;
                }
                for (j, &sj) in state.iter().enumerate() {
                    pre += self.w_rec[i * n + j] * sj;
                }
                next[i] = (1.0 - a) * state[i] + a * pre.tanh();
            }

            state = next;
            states.push(state.clone());
        }

        Ok(states)
    }
}

// ---------------------------------------------------------------------------
// Spectral radius estimation
// ---------------------------------------------------------------------------

/// Estimate the largest-magnitude eigenvalue of an n×n matrix by power
/// iteration. The last few norm estimates are averaged since a complex
/// leading pair makes single-step estimates oscillate.
fn spectral_radius_estimate(w: &[f64], n: usize, rng: &mut ChaCha8Rng) -> f64 {
    let mut v: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return 0.0;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }

    let iterations = 80;
    let tail = 10;
    let mut tail_sum = 0.0;
    let mut tail_count = 0usize;

    for it in 0..iterations {
        let mut u = vec![0.0f64; n];
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                sum += w[i * n + j] * v[j];
            }
            u[i] = sum;
        }

        let norm: f64 = u.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < 1e-12 {
            return 0.0;
        }
        if it >= iterations - tail {
            tail_sum += norm;
            tail_count += 1;
        }
        for x in u.iter_mut() {
            *x /= norm;
        }
        v = u;
    }

    tail_sum / tail_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(input_dim: usize, size: usize) -> ReservoirConfig {
        ReservoirConfig {
            input_dim,
            size,
            input_scaling: 0.5,
            leak_rate: 0.3,
            spectral_radius: 0.9,
            input_sparsity: 1.0,
            recurrent_sparsity: 0.5,
            seed: 42,
        }
    }

    fn test_inputs(len: usize, dim: usize) -> Vec<Vec<f64>> {
        (0..len)
            .map(|t| (0..dim).map(|j| ((t * dim + j) as f64 * 0.37).sin()).collect())
            .collect()
    }

    #[test]
    fn test_rejects_invalid_spectral_radius() {
        let mut config = test_config(4, 10);
        config.spectral_radius = 0.0;
        assert!(matches!(EchoStateReservoir::new(config), Err(EchoError::Config(_))));

        let mut config = test_config(4, 10);
        config.spectral_radius = -1.0;
        assert!(matches!(EchoStateReservoir::new(config), Err(EchoError::Config(_))));
    }

    #[test]
    fn test_rejects_invalid_leak_rate() {
        let mut config = test_config(4, 10);
        config.leak_rate = 0.0;
        assert!(EchoStateReservoir::new(config).is_err());

        let mut config = test_config(4, 10);
        config.leak_rate = 1.5;
        assert!(EchoStateReservoir::new(config).is_err());
    }

    #[test]
    fn test_one_state_per_input() {
        let reservoir = EchoStateReservoir::new(test_config(4, 20)).unwrap();
        let inputs = test_inputs(17, 4);
        let states = reservoir.run(&inputs).unwrap();

        assert_eq!(states.len(), inputs.len());
        for s in &states {
            assert_eq!(s.len(), 20, "state width must equal reservoir size");
        }
    }

    #[test]
    fn test_seed_determinism() {
        let r1 = EchoStateReservoir::new(test_config(4, 20)).unwrap();
        let r2 = EchoStateReservoir::new(test_config(4, 20)).unwrap();
        assert_eq!(r1.w_in, r2.w_in);
        assert_eq!(r1.w_rec, r2.w_rec);

        let inputs = test_inputs(12, 4);
        let s1 = r1.run(&inputs).unwrap();
        let s2 = r2.run(&inputs).unwrap();
        assert_eq!(s1, s2, "same seed + same inputs must give identical states");
    }

    #[test]
    fn test_different_seed_different_weights() {
        let mut config = test_config(4, 20);
        config.seed = 7;
        let r1 = EchoStateReservoir::new(config).unwrap();
        let r2 = EchoStateReservoir::new(test_config(4, 20)).unwrap();
        assert_ne!(r1.w_rec, r2.w_rec);
    }

    #[test]
    fn test_leak_rate_one_is_pure_tanh() {
        let mut config = test_config(3, 8);
        config.leak_rate = 1.0;
        let reservoir = EchoStateReservoir::new(config).unwrap();

        let inputs = test_inputs(2, 3);
        let states = reservoir.run(&inputs).unwrap();

        // First step from s_0 = 0: s_1 = tanh(W_in · x_0)
        let n = 8;
        let m = 3;
        for i in 0..n {
            let mut pre = 0.0;
            for j in 0..m {
                pre += reservoir.w_in[i * m + j] * inputs[0][j];
            }
            assert!(
                (states[0][i] - pre.tanh()).abs() < 1e-12,
                "unit {}: {} vs {}",
                i,
                states[0][i],
                pre.tanh()
            );
        }

        // Second step: s_2 = tanh(W_in · x_1 + W_rec · s_1), no leaky term.
        for i in 0..n {
            let mut pre = 0.0;
            for j in 0..m {
                pre += reservoir.w_in[i * m + j] * inputs[1][j];
            }
            for j in 0..n {
                pre += reservoir.w_rec[i * n + j] * states[0][j];
            }
            assert!((states[1][i] - pre.tanh()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_sequence_is_data_error() {
        let reservoir = EchoStateReservoir::new(test_config(4, 10)).unwrap();
        assert!(matches!(reservoir.run(&[]), Err(EchoError::Data(_))));
    }

    #[test]
    fn test_input_width_mismatch() {
        let reservoir = EchoStateReservoir::new(test_config(4, 10)).unwrap();
        let bad = vec![vec![0.1, 0.2]];
        assert!(matches!(
            reservoir.run(&bad),
            Err(EchoError::DimensionMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn test_spectral_rescale() {
        let reservoir = EchoStateReservoir::new(test_config(4, 40)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let estimate = spectral_radius_estimate(&reservoir.w_rec, 40, &mut rng);
        assert!(
            (estimate - 0.9).abs() < 0.1,
            "rescaled radius should be near 0.9: {}",
            estimate
        );
    }

    #[test]
    fn test_input_sparsity_prunes_weights() {
        let mut config = test_config(10, 50);
        config.input_sparsity = 0.1;
        let reservoir = EchoStateReservoir::new(config).unwrap();
        let nonzero = reservoir.w_in.iter().filter(|w| **w != 0.0).count();
        let ratio = nonzero as f64 / reservoir.w_in.len() as f64;
        assert!(ratio < 0.25, "~10% of input weights should survive: {}", ratio);
    }
}
