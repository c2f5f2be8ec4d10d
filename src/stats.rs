// src/stats.rs
//! Running (pooled-variance) statistics for the adaptive Monte Carlo driver (C5).
//!
//! Batches are not i.i.d. draws from a single distribution in the strict
//! sense: each batch comes from a path matrix of a different size than the
//! pilot run, and antithetic quadrupling makes within-batch observations
//! correlated. [[RunningStats]] nonetheless pools variance across batches
//! with the textbook recurrence, matching the original engine's semantics
//! rather than a textbook i.i.d. estimator — this is a deliberate choice,
//! not an oversight; see the driver's module docs.

use ndarray::Array1;

/// Accumulates a running mean and pooled variance across Monte Carlo batches.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningStats {
    n: u64,
    sum: f64,
    sigma2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        RunningStats {
            n: 0,
            sum: 0.0,
            sigma2: 0.0,
        }
    }

    /// Total number of observations folded in so far.
    pub fn count(&self) -> u64 {
        self.n
    }

    /// Running sample mean.
    pub fn mean(&self) -> f64 {
        self.sum / self.n as f64
    }

    /// Pooled variance estimate.
    pub fn variance(&self) -> f64 {
        self.sigma2
    }

    /// Fold a new batch of (possibly correlated) observations into the
    /// running mean and pooled variance.
    ///
    /// `sigma2_new = (sigma2 * (n - 1) + var(batch) * (m - 1)) / (n + m - 1)`
    /// where `n` is the observation count *before* this batch and `m` is the
    /// batch size. `var(batch)` is the population (not sample) variance of
    /// the batch, matching the reference driver.
    pub fn update(&mut self, batch: &Array1<f64>) {
        let m = batch.len() as f64;
        let n = self.n as f64;
        let batch_mean = batch.sum() / m;
        let batch_var = batch.iter().map(|x| (x - batch_mean).powi(2)).sum::<f64>() / m;

        self.sigma2 = (self.sigma2 * (n - 1.0) + batch_var * (m - 1.0)) / (n + m - 1.0);
        self.sum += batch.sum();
        self.n += batch.len() as u64;
    }

    /// Half-width of the `(1 - alpha)` confidence interval around the
    /// running mean, for a critical value `c` (typically `-2 * Phi^-1(alpha
    /// / 2)` for a two-sided normal interval).
    pub fn half_width(&self, c: f64) -> f64 {
        c * (self.sigma2 / self.n as f64).sqrt()
    }
}
