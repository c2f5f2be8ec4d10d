// src/scheme/tg.rs
//! Andersen (2008) Truncated-Gaussian discretization of the Heston SDE.
//!
//! Shares the QE scheme's log-price step and moment parameters `(m, s2,
//! psi)`, but advances variance by mapping `psi` through a precomputed grid
//! of truncated-normal moment coefficients `(f_nu, f_sigma)` instead of
//! switching between a quadratic and exponential branch. Each antithetic row
//! recomputes `(m, s2, psi)` from its own current variance rather than
//! sharing it with a neighboring row — the reference engine instead computes
//! these once per base path and reuses them across its four antithetic rows,
//! leaving which rows recompute ambiguous in spec terms; per-row
//! recomputation is the resolution spec §9 recommends for that ambiguity.

use super::PathMatrix;
use crate::params::{HestonParameters, MarketState};
use crate::rng::HestonRng;
use crate::tg_solver::TgGrids;
use ndarray::parallel::prelude::*;
use ndarray::{s, Array2, Axis};

const EPS1: [f64; 4] = [1.0, -1.0, 1.0, -1.0];
const EPS2: [f64; 4] = [1.0, -1.0, -1.0, 1.0];

#[allow(clippy::too_many_arguments)]
pub fn simulate(
    state: &MarketState,
    params: &HestonParameters,
    t: f64,
    n_t: usize,
    n_simulations: usize,
    gamma_1: f64,
    grids: &TgGrids,
    rng: &mut HestonRng,
) -> crate::error::SdeResult<(PathMatrix, PathMatrix)> {
    let dt = t / n_t as f64;
    let n_rows = 4 * n_simulations;
    let gamma_2 = 1.0 - gamma_1;

    let z = rng.draw_normal_tensor(n_simulations, n_t);

    let mut log_s = Array2::<f64>::zeros((n_rows, n_t));
    let mut v = Array2::<f64>::zeros((n_rows, n_t));
    log_s.slice_mut(s![.., 0]).fill(state.stock_price.ln());
    v.slice_mut(s![.., 0]).fill(params.v0);

    let r = state.interest_rate;
    let kappa = params.kappa;
    let vbar = params.vbar;
    let gamma = params.gamma;
    let rho = params.rho;

    let big_e = (-kappa * dt).exp();
    let p1 = (1.0 - big_e) * gamma * gamma * big_e / kappa;
    let p2 = vbar * gamma * gamma * (1.0 - big_e).powi(2) / (2.0 * kappa);
    let p3 = vbar * (1.0 - big_e);

    let k0 = -rho * kappa * vbar * dt / gamma;
    let k1 = gamma_1 * dt * (rho * kappa / gamma - 0.5) - rho / gamma;
    let k2 = gamma_2 * dt * (rho * kappa / gamma - 0.5) + rho / gamma;
    let k3 = gamma_1 * dt * (1.0 - rho * rho);
    let k4 = gamma_2 * dt * (1.0 - rho * rho);
    let r_dt_k0 = r * dt + k0;

    log_s
        .axis_chunks_iter_mut(Axis(0), 4)
        .into_par_iter()
        .zip(v.axis_chunks_iter_mut(Axis(0), 4).into_par_iter())
        .enumerate()
        .for_each(|(n, (mut s_chunk, mut v_chunk))| {
            for i in 0..n_t - 1 {
                let z1 = z[[0, n, i]];
                let z2 = z[[1, n, i]];

                for row in 0..4 {
                    let v_i = v_chunk[[row, i]];
                    let m = p3 + v_i * big_e;
                    let s2 = v_i * p1 + p2;
                    let psi = s2 / (m * m);

                    let idx = grids.index_for(psi);
                    let nu = m * grids.f_nu_grid[idx];
                    let sigma = s2.max(0.0).sqrt() * grids.f_sigma_grid[idx];

                    let v_next = (nu + EPS2[row] * sigma * z2).max(0.0);

                    s_chunk[[row, i + 1]] = s_chunk[[row, i]]
                        + r_dt_k0
                        + k1 * v_i
                        + k2 * v_next
                        + EPS1[row] * (k3 * v_i + k4 * v_next).max(0.0).sqrt() * z1;

                    v_chunk[[row, i + 1]] = v_next;
                }
            }
        });

    let s_paths = log_s.mapv(f64::exp);
    Ok((s_paths, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HestonParameters, MarketState};
    use crate::rng::HestonRng;
    use crate::tg_solver::build_tg_grids;

    #[test]
    fn test_output_shape_and_nonnegative_variance() {
        let state = MarketState::new(100.0, 0.03).unwrap();
        let params = HestonParameters::new(2.0, 0.3, -0.7, 0.04, 0.04).unwrap();
        let grids = build_tg_grids(50.0, 501, 2500, 1e-5).unwrap();
        let mut rng = HestonRng::seed(6);
        let (s, v) = simulate(&state, &params, 1.0, 50, 16, 0.5, &grids, &mut rng).unwrap();
        assert_eq!(s.shape(), &[64, 50]);
        assert!(v.iter().all(|&x| x >= 0.0));
        assert!(s.iter().all(|&x| x.is_finite() && x > 0.0));
    }

    #[test]
    fn test_reproducible_given_seed() {
        let state = MarketState::new(100.0, 0.03).unwrap();
        let params = HestonParameters::new(2.0, 0.3, -0.7, 0.04, 0.04).unwrap();
        let grids = build_tg_grids(50.0, 501, 2500, 1e-5).unwrap();
        let mut rng_a = HestonRng::seed(21);
        let mut rng_b = HestonRng::seed(21);
        let (s_a, _) = simulate(&state, &params, 1.0, 30, 12, 0.5, &grids, &mut rng_a).unwrap();
        let (s_b, _) = simulate(&state, &params, 1.0, 30, 12, 0.5, &grids, &mut rng_b).unwrap();
        assert_eq!(s_a, s_b);
    }
}
