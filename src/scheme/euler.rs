// src/scheme/euler.rs
//! Full-truncation Euler discretization of the Heston SDE.
//!
//! ```text
//! v+          = max(V_i, 0)
//! logS_{i+1}  = logS_i + (r - v+/2) dt + eps1 * sqrt(v+ dt) * Z1
//! V_{i+1}     = V_i + kappa (vbar - v+) dt
//!             + gamma * sqrt(v+ dt) * (eps1 * rho * Z1 + eps2 * sqrt(1 - rho^2) * Z2)
//! ```
//!
//! Antithetic quadrupling assigns `(eps1, eps2)` per row within a base-path
//! group of four as `(+,+), (-,+), (+,-), (-,-)`.

use super::PathMatrix;
use crate::params::{HestonParameters, MarketState};
use crate::rng::HestonRng;
use ndarray::{s, Array2, Axis};
use ndarray::parallel::prelude::*;

const SIGNS: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];

pub fn simulate(
    state: &MarketState,
    params: &HestonParameters,
    t: f64,
    n_t: usize,
    n_simulations: usize,
    rng: &mut HestonRng,
) -> crate::error::SdeResult<(PathMatrix, PathMatrix)> {
    let dt = t / n_t as f64;
    let n_rows = 4 * n_simulations;

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
    let sqrt_one_minus_rho2 = (1.0 - rho * rho).sqrt();

    log_s
        .axis_chunks_iter_mut(Axis(0), 4)
        .into_par_iter()
        .zip(v.axis_chunks_iter_mut(Axis(0), 4).into_par_iter())
        .enumerate()
        .for_each(|(n, (mut s_chunk, mut v_chunk))| {
            for i in 0..n_t - 1 {
                let z1 = z[[0, n, i]];
                let z2 = z[[1, n, i]];
                for (row, &(eps1, eps2)) in SIGNS.iter().enumerate() {
                    let v_i = v_chunk[[row, i]].max(0.0);
                    let sqrt_v_dt = (v_i * dt).sqrt();

                    s_chunk[[row, i + 1]] = s_chunk[[row, i]]
                        + (r - 0.5 * v_i) * dt
                        + eps1 * sqrt_v_dt * z1;

                    v_chunk[[row, i + 1]] = v_chunk[[row, i]]
                        + kappa * (vbar - v_i) * dt
                        + gamma
                            * sqrt_v_dt
                            * (eps1 * rho * z1 + eps2 * sqrt_one_minus_rho2 * z2);
                }
            }
        });

    let s_paths = log_s.mapv(f64::exp);
    Ok((s_paths, v))
}
