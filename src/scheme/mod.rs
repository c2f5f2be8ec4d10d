// src/scheme/mod.rs
//! Discretization kernels for the Heston SDE (C3).
//!
//! Each kernel turns one seeded draw of the `(2, n_simulations, N_T)` normal
//! tensor into a `(4 * n_simulations, N_T)` path matrix via antithetic
//! quadrupling: every base path `n` produces four rows, built from the same
//! `(Z1[n, :], Z2[n, :])` under the sign patterns `(+,+), (-,-), (+,-),
//! (-,+)` (the exact assignment differs per scheme and is documented on each
//! kernel). Rows are written through disjoint 4-row chunks so the rayon
//! parallelization over base paths never aliases.

pub mod euler;
pub mod qe;
pub mod tg;

use crate::error::SdeResult;
use crate::params::{HestonParameters, MarketState};
use crate::rng::HestonRng;
use crate::tg_solver::TgGrids;
use ndarray::Array2;
use std::sync::Arc;

/// A matrix of simulated paths: row `i` is one path, column `j` is the
/// value at step `j`, `j = 0..=N_T-1`.
pub type PathMatrix = Array2<f64>;

/// Default QE switching threshold.
pub const DEFAULT_PSI_C: f64 = 1.5;
/// Default QE/TG log-price integration weight.
pub const DEFAULT_GAMMA_1: f64 = 0.0;

/// Selects a discretization scheme and carries its scheme-specific tuning
/// knobs.
#[derive(Clone, Debug)]
pub enum SchemeOptions {
    /// Full-truncation Euler.
    Euler,
    /// Andersen (2008) Quadratic-Exponential scheme.
    AndersenQe { psi_c: f64, gamma_1: f64 },
    /// Andersen (2008) Truncated-Gaussian scheme, with a precomputed grid.
    AndersenTg { gamma_1: f64, grids: Arc<TgGrids> },
}

impl Default for SchemeOptions {
    fn default() -> Self {
        SchemeOptions::Euler
    }
}

impl SchemeOptions {
    /// Andersen QE with the spec's default `psi_c = 1.5`, `gamma_1 = 0`.
    pub fn andersen_qe_default() -> Self {
        SchemeOptions::AndersenQe {
            psi_c: DEFAULT_PSI_C,
            gamma_1: DEFAULT_GAMMA_1,
        }
    }

    fn validate(&self) -> SdeResult<()> {
        match self {
            SchemeOptions::Euler => Ok(()),
            SchemeOptions::AndersenQe { psi_c, gamma_1 } => {
                if !(1.0..=2.0).contains(psi_c) {
                    return Err(crate::error::SdeError::InvalidPsiC { psi_c: *psi_c });
                }
                if !(0.0..=1.0).contains(gamma_1) {
                    return Err(crate::error::SdeError::InvalidGamma1 { gamma_1: *gamma_1 });
                }
                Ok(())
            }
            SchemeOptions::AndersenTg { gamma_1, .. } => {
                if !(0.0..=1.0).contains(gamma_1) {
                    return Err(crate::error::SdeError::InvalidGamma1 { gamma_1: *gamma_1 });
                }
                Ok(())
            }
        }
    }
}

fn validate_common(t: f64, n_t: usize, n_simulations: usize) -> SdeResult<()> {
    if t <= 0.0 {
        return Err(crate::error::SdeError::InvalidTimeHorizon { t });
    }
    if n_t < 2 {
        return Err(crate::error::SdeError::InvalidParameters {
            parameter: "n_t".to_string(),
            value: n_t as f64,
            constraint: "must be at least 2 (one time step)".to_string(),
        });
    }
    if n_simulations < 1 {
        return Err(crate::error::SdeError::InvalidParameters {
            parameter: "n_simulations".to_string(),
            value: n_simulations as f64,
            constraint: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Simulate `4 * n_simulations` antithetic price and variance paths over
/// `n_t` time points spanning `[0, t]`, dispatching to the kernel named by
/// `options`.
///
/// Returns `(log_price_paths_exponentiated, variance_paths)`: the first
/// matrix holds the simulated stock price `S_t`, the second the simulated
/// instantaneous variance `V_t`.
pub fn simulate(
    options: &SchemeOptions,
    state: &MarketState,
    params: &HestonParameters,
    t: f64,
    n_t: usize,
    n_simulations: usize,
    rng: &mut HestonRng,
) -> SdeResult<(PathMatrix, PathMatrix)> {
    validate_common(t, n_t, n_simulations)?;
    options.validate()?;

    match options {
        SchemeOptions::Euler => euler::simulate(state, params, t, n_t, n_simulations, rng),
        SchemeOptions::AndersenQe { psi_c, gamma_1 } => {
            qe::simulate(state, params, t, n_t, n_simulations, *psi_c, *gamma_1, rng)
        }
        SchemeOptions::AndersenTg { gamma_1, grids } => {
            tg::simulate(state, params, t, n_t, n_simulations, *gamma_1, grids, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_common_rejects_bad_inputs() {
        assert!(validate_common(1.0, 2, 10).is_ok());
        assert!(validate_common(0.0, 2, 10).is_err());
        assert!(validate_common(1.0, 1, 10).is_err());
        assert!(validate_common(1.0, 2, 0).is_err());
    }

    #[test]
    fn test_validate_common_raises_invalid_time_horizon() {
        assert!(matches!(
            validate_common(0.0, 2, 10),
            Err(crate::error::SdeError::InvalidTimeHorizon { t }) if t == 0.0
        ));
        assert!(matches!(
            validate_common(-1.0, 2, 10),
            Err(crate::error::SdeError::InvalidTimeHorizon { t }) if t == -1.0
        ));
    }

    #[test]
    fn test_qe_options_validate_bounds() {
        let ok = SchemeOptions::AndersenQe {
            psi_c: 1.5,
            gamma_1: 0.5,
        };
        assert!(ok.validate().is_ok());
        let bad = SchemeOptions::AndersenQe {
            psi_c: 3.0,
            gamma_1: 0.5,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_qe_options_raise_invalid_psi_c_and_gamma_1() {
        let bad_psi_c = SchemeOptions::AndersenQe {
            psi_c: 3.0,
            gamma_1: 0.5,
        };
        assert!(matches!(
            bad_psi_c.validate(),
            Err(crate::error::SdeError::InvalidPsiC { psi_c }) if psi_c == 3.0
        ));

        let bad_gamma_1 = SchemeOptions::AndersenQe {
            psi_c: 1.5,
            gamma_1: 1.2,
        };
        assert!(matches!(
            bad_gamma_1.validate(),
            Err(crate::error::SdeError::InvalidGamma1 { gamma_1 }) if gamma_1 == 1.2
        ));
    }

    #[test]
    fn test_tg_options_raise_invalid_gamma_1() {
        let grids = Arc::new(crate::tg_solver::build_tg_grids(50.0, 51, 100, 1e-5).unwrap());
        let bad = SchemeOptions::AndersenTg {
            gamma_1: -0.1,
            grids,
        };
        assert!(matches!(
            bad.validate(),
            Err(crate::error::SdeError::InvalidGamma1 { gamma_1 }) if gamma_1 == -0.1
        ));
    }
}
