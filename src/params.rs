// src/params.rs
//! Immutable parameter carriers for the Heston model (C1).
//!
//! `HestonParameters` and `MarketState` are read-only for the lifetime of a
//! pricing call: constructed once, validated once, then shared freely across
//! the parallel scheme kernels.

use crate::error::{validation::*, SdeResult};

/// Heston stochastic-volatility model parameters.
///
/// ```text
/// dV_t = kappa (vbar - V_t) dt + gamma sqrt(V_t) dW_t^(2)
/// ```
/// with `rho` the correlation between the price and variance Brownian
/// motions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonParameters {
    /// Mean-reversion speed of the variance process (> 0)
    pub kappa: f64,
    /// Volatility of variance ("vol-of-vol", > 0)
    pub gamma: f64,
    /// Correlation between price and variance Brownian motions, in [-1, 1]
    pub rho: f64,
    /// Long-run variance level (> 0)
    pub vbar: f64,
    /// Initial variance (>= 0)
    pub v0: f64,
}

impl HestonParameters {
    pub fn new(kappa: f64, gamma: f64, rho: f64, vbar: f64, v0: f64) -> SdeResult<Self> {
        validate_positive("kappa", kappa)?;
        validate_positive("gamma", gamma)?;
        validate_correlation("rho", rho)?;
        validate_positive("vbar", vbar)?;
        validate_non_negative("v0", v0)?;
        Ok(HestonParameters {
            kappa,
            gamma,
            rho,
            vbar,
            v0,
        })
    }

    /// The Feller ratio 2*kappa*vbar / gamma^2; below 1 the CIR variance
    /// process can reach zero. Not enforced — the discretization schemes
    /// are explicitly designed to remain stable when this is violated.
    pub fn feller_ratio(&self) -> f64 {
        2.0 * self.kappa * self.vbar / (self.gamma * self.gamma)
    }
}

/// Market state observed at pricing time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarketState {
    /// Spot price of the underlying (> 0)
    pub stock_price: f64,
    /// Continuously-compounded risk-free rate
    pub interest_rate: f64,
}

impl MarketState {
    pub fn new(stock_price: f64, interest_rate: f64) -> SdeResult<Self> {
        validate_positive("stock_price", stock_price)?;
        validate_finite("interest_rate", interest_rate)?;
        Ok(MarketState {
            stock_price,
            interest_rate,
        })
    }
}
