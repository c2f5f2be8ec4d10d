// src/driver.rs
//! Adaptive-batching Monte Carlo driver (C6).
//!
//! Draws successive batches of antithetic paths, folds each batch's payoff
//! values into a running pooled-variance estimate (see [[crate::stats]]),
//! and stops once the half-width of the `(1 - alpha)` confidence interval
//! drops below `abs_err` or `max_iter` batches have been drawn. An optional
//! control variate is calibrated once, from a pilot batch, before the main
//! loop starts — mirroring the original engine's two-pass structure rather
//! than re-estimating the coefficient online.

use crate::error::{SdeError, SdeResult};
use crate::params::{HestonParameters, MarketState};
use crate::rng::HestonRng;
use crate::scheme::{self, PathMatrix, SchemeOptions};
use crate::stats::RunningStats;
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, Normal};

/// A payoff function: reduces a path matrix to one value per row.
pub type Payoff = dyn Fn(&PathMatrix) -> Array1<f64> + Sync;

/// Tuning knobs for [[mc_price]].
pub struct McOptions<'a> {
    pub scheme: SchemeOptions,
    /// Target half-width of the confidence interval.
    pub abs_err: f64,
    /// Confidence-interval significance level (0.05 for a 95% CI).
    pub alpha: f64,
    /// Number of base paths per batch (yields `4 * batch_size` rows).
    pub batch_size: usize,
    /// Hard cap on the number of batches drawn.
    pub max_iter: usize,
    /// Number of base paths in the pilot run used to calibrate a control
    /// variate, if one is supplied.
    pub cv_iter: usize,
    /// Fixed seed for reproducible pricing; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Optional control-variate payoff. Supplying this without `mu` is a
    /// [[crate::error::SdeError::MissingControlVariateMean]] error, not a
    /// silently ignored control variate — the two are independent knobs
    /// precisely so that mistake is representable and caught.
    pub cv_payoff: Option<&'a Payoff>,
    /// Analytic mean of `cv_payoff` under the model, required whenever
    /// `cv_payoff` is supplied.
    pub mu: Option<f64>,
}

impl<'a> Default for McOptions<'a> {
    fn default() -> Self {
        McOptions {
            scheme: SchemeOptions::Euler,
            abs_err: 0.01,
            alpha: 0.05,
            batch_size: 10_000,
            max_iter: 100_000,
            cv_iter: 1_000,
            seed: None,
            cv_payoff: None,
            mu: None,
        }
    }
}

/// Outcome of a completed pricing run.
#[derive(Clone, Copy, Debug)]
pub struct PriceEstimate {
    pub price: f64,
    pub half_width: f64,
    pub n_observations: u64,
    pub batches: usize,
}

fn sample_covariance(s1: &Array1<f64>, s2: &Array1<f64>) -> (f64, f64) {
    let n = s1.len() as f64;
    let m1 = s1.sum() / n;
    let m2 = s2.sum() / n;
    let cov = s1
        .iter()
        .zip(s2.iter())
        .map(|(a, b)| (a - m1) * (b - m2))
        .sum::<f64>()
        / (n - 1.0);
    let var2 = s2.iter().map(|b| (b - m2).powi(2)).sum::<f64>() / (n - 1.0);
    (cov, var2)
}

/// Price an option under the Heston model via adaptive-batch Monte Carlo.
///
/// `payoff` maps a simulated path matrix to one value per row; `state` and
/// `params` fix the market and model inputs; `t`/`n_t` fix the simulation
/// horizon and time grid.
pub fn mc_price(
    payoff: &Payoff,
    state: &MarketState,
    params: &HestonParameters,
    t: f64,
    n_t: usize,
    opts: &McOptions,
) -> SdeResult<PriceEstimate> {
    let mut rng = match opts.seed {
        Some(seed) => HestonRng::seed(seed),
        None => HestonRng::from_entropy(),
    };

    let theta = match (opts.cv_payoff, opts.mu) {
        (Some(cv_payoff), Some(_mu)) => {
            log::debug!(
                "calibrating control variate from a {}-path pilot run",
                opts.cv_iter
            );
            let (s_pilot, _v_pilot) =
                scheme::simulate(&opts.scheme, state, params, t, n_t, opts.cv_iter, &mut rng)?;
            let s1 = payoff(&s_pilot);
            let s2 = cv_payoff(&s_pilot);
            let (cov, var2) = sample_covariance(&s1, &s2);
            Some(if var2.abs() > 1e-300 { cov / var2 } else { 0.0 })
        }
        (Some(_), None) => return Err(SdeError::MissingControlVariateMean),
        (None, _) => None,
    };

    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are always valid");
    let c = -2.0 * normal.inverse_cdf(opts.alpha / 2.0);

    let mut stats = RunningStats::new();
    let mut half_width = f64::INFINITY;
    let mut batches = 0usize;

    log::info!(
        "mc_price: scheme batches of {} base paths, abs_err={}, alpha={}, max_iter={}",
        opts.batch_size,
        opts.abs_err,
        opts.alpha,
        opts.max_iter
    );

    while half_width > opts.abs_err && batches < opts.max_iter {
        let (s_batch, _v_batch) =
            scheme::simulate(&opts.scheme, state, params, t, n_t, opts.batch_size, &mut rng)?;

        let values = match (theta, opts.cv_payoff, opts.mu) {
            (Some(theta), Some(cv_payoff), Some(mu)) => {
                let p = payoff(&s_batch);
                let cv = cv_payoff(&s_batch);
                p - (cv - mu) * theta
            }
            _ => payoff(&s_batch),
        };

        stats.update(&values);
        batches += 1;
        half_width = stats.half_width(c);

        log::debug!(
            "batch {}: n={} mean={:.6} half_width={:.6}",
            batches,
            stats.count(),
            stats.mean(),
            half_width
        );
    }

    log::info!(
        "mc_price converged after {} batches: price={:.6}, half_width={:.6}",
        batches,
        stats.mean(),
        half_width
    );

    Ok(PriceEstimate {
        price: stats.mean(),
        half_width,
        n_observations: stats.count(),
        batches,
    })
}
