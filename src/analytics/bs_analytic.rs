// src/analytics/bs_analytic.rs
//! Analytic Black-Scholes price, used as the zero-vol-of-vol reference value
//! for the Heston Monte Carlo engine: when `gamma -> 0`, the Heston variance
//! process is deterministic and the model collapses onto Black-Scholes with
//! `sigma = sqrt(v0)`.
//!
//! ```text
//! C(S,K,r,sigma,T) = S*Phi(d1) - K*e^(-rT)*Phi(d2)
//! d1 = [ln(S/K) + (r + sigma^2/2)T] / (sigma sqrt(T))
//! d2 = d1 - sigma sqrt(T)
//! ```

use crate::math_utils::norm_cdf;

fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> (f64, f64) {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    (d1, d2)
}

/// Black-Scholes European call price.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put price, via put-call parity.
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_call_price_atm_reference_value() {
        // S=100, K=100, r=0.05, sigma=0.2, T=1 -> well-known reference ~10.45
        let price = bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0);
        assert_relative_eq!(price, 10.4506, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity() {
        let c = bs_call_price(100.0, 95.0, 0.03, 0.25, 0.5);
        let p = bs_put_price(100.0, 95.0, 0.03, 0.25, 0.5);
        let parity = c - p - (100.0 - 95.0 * (-0.03_f64 * 0.5).exp());
        assert_relative_eq!(parity, 0.0, epsilon = 1e-9);
    }
}
