// src/payoff.rs
//! Named payoffs over a simulated path matrix.
//!
//! A payoff is any `Fn(&PathMatrix) -> Array1<f64>` that reduces each row of
//! a `(4 * n_simulations, N_T)` path matrix to a single terminal value. The
//! driver (C6) is agnostic to which payoff it is handed; this module ships
//! the handful of closures the crate's own tests and examples need, adapted
//! from the teacher's `Payoff` enum to operate on whole path matrices rather
//! than single-path slices.

use crate::scheme::PathMatrix;
use ndarray::{Array1, Axis};

/// European call, struck at `k`, paid on the terminal column.
pub fn european_call(k: f64) -> impl Fn(&PathMatrix) -> Array1<f64> + Sync {
    move |paths: &PathMatrix| {
        let last = paths.column(paths.ncols() - 1);
        last.mapv(|s_t| (s_t - k).max(0.0))
    }
}

/// European put, struck at `k`, paid on the terminal column.
pub fn european_put(k: f64) -> impl Fn(&PathMatrix) -> Array1<f64> + Sync {
    move |paths: &PathMatrix| {
        let last = paths.column(paths.ncols() - 1);
        last.mapv(|s_t| (k - s_t).max(0.0))
    }
}

/// The undiscounted terminal spot itself, used as a zero-cost control
/// variate payoff (its analytic mean under the risk-neutral measure is
/// `s0 * exp(r * t)`).
pub fn terminal_spot() -> impl Fn(&PathMatrix) -> Array1<f64> + Sync {
    |paths: &PathMatrix| paths.column(paths.ncols() - 1).to_owned()
}

/// Arithmetic-average Asian call, struck at `k`, averaged over every
/// simulated time point including `t = 0`.
pub fn asian_call(k: f64) -> impl Fn(&PathMatrix) -> Array1<f64> + Sync {
    move |paths: &PathMatrix| {
        let avg = paths.mean_axis(Axis(1)).expect("path matrix has at least one column");
        avg.mapv(|a| (a - k).max(0.0))
    }
}

/// Up-and-out barrier call: struck at `k`, knocked out if any simulated
/// value along the path meets or exceeds the barrier `h`.
pub fn up_and_out_call(k: f64, h: f64) -> impl Fn(&PathMatrix) -> Array1<f64> + Sync {
    move |paths: &PathMatrix| {
        let n_cols = paths.ncols();
        Array1::from_iter(paths.axis_iter(Axis(0)).map(|row| {
            let breached = row.iter().any(|&x| x >= h);
            if breached {
                0.0
            } else {
                (row[n_cols - 1] - k).max(0.0)
            }
        }))
    }
}
