// src/tg_solver.rs
//! Truncated-Gaussian coefficient solver (C4).
//!
//! The TG scheme maps a central-moment ratio `psi = s2/m^2` onto a pair of
//! grid coefficients `(f_nu, f_sigma)` via a truncated-normal moment match.
//! For a given `psi` this requires the root `r` of
//!
//! ```text
//! foo(x) = x*phi(x) + Phi(x)*(1+x^2) - (1+psi)*(phi(x)+x*Phi(x))^2 = 0
//! ```
//!
//! solved here by a Newton/Halley hybrid with analytic first and second
//! derivatives, translated term-for-term from the reference root finder
//! rather than re-derived, so the iteration count and failure modes match
//! the original. [[build_tg_grids]] tabulates `(f_nu, f_sigma)` on a uniform
//! `psi` grid once, up front; the scheme kernels only ever index into that
//! table.

use crate::error::{SdeError, SdeResult};
use crate::math_utils::{norm_cdf, norm_pdf};
use ndarray::Array1;

/// Default upper bound of the tabulated `psi` grid.
pub const DEFAULT_PSI_MAX: f64 = 50.0;
/// Default number of grid points (including `psi = 0`).
pub const DEFAULT_GRID_POINTS: usize = 2001;
/// Default Newton/Halley iteration cap for a single root.
pub const DEFAULT_MAXITER: usize = 2500;
/// Default convergence tolerance on `|foo(x)|`.
pub const DEFAULT_TOL: f64 = 1e-5;

fn foo(x: f64, psi: f64) -> f64 {
    let phi = norm_pdf(x);
    let cap_phi = norm_cdf(x);
    x * phi + cap_phi * (1.0 + x * x) - (1.0 + psi) * (phi + x * cap_phi).powi(2)
}

fn foo_dif(x: f64, psi: f64) -> f64 {
    let phi = norm_pdf(x);
    let cap_phi = norm_cdf(x);
    phi - x * x * phi + phi * (1.0 + x * x) + 2.0 * cap_phi * x
        - 2.0 * (1.0 + psi) * (phi + x * cap_phi) * (-phi * x + cap_phi + x * phi)
}

fn foo_dif2(x: f64, psi: f64) -> f64 {
    let phi = norm_pdf(x);
    let cap_phi = norm_cdf(x);
    -x * phi - 2.0 * x * phi + x.powi(3) * phi - x * phi * (1.0 + x * x)
        + 2.0 * cap_phi * x
        + 2.0 * phi * x
        + 2.0 * cap_phi
        + 2.0 * (1.0 + psi) * (-phi * x + cap_phi + x * phi).powi(2)
        + 2.0 * (1.0 + psi)
            * (phi + x * cap_phi)
            * (x * x * phi + phi + phi - x * phi)
}

/// Solve for the TG root `r(psi)` by Halley's method, falling back to a
/// plain Newton step whenever the Halley denominator is too small to trust.
///
/// `psi` must be strictly positive: at `psi = 0` the moment-match equation
/// degenerates and callers should use the analytic limit instead (see
/// [[build_tg_grids]]).
pub fn calculate_r_for_andersen_tg(psi: f64, maxiter: usize, tol: f64) -> SdeResult<f64> {
    if !(psi > 0.0) {
        return Err(SdeError::InvalidParameters {
            parameter: "psi".to_string(),
            value: psi,
            constraint: "must be strictly positive for the TG root solver".to_string(),
        });
    }

    let mut x = 1.0 / psi;
    let mut last_value = foo(x, psi);

    for _ in 0..maxiter {
        if last_value.abs() < tol {
            return Ok(x);
        }
        let f = foo(x, psi);
        let fp = foo_dif(x, psi);
        let fpp = foo_dif2(x, psi);

        let denom = 2.0 * fp * fp - f * fpp;
        let step = if denom.abs() > 1e-14 {
            2.0 * f * fp / denom
        } else if fp.abs() > 1e-14 {
            f / fp
        } else {
            break;
        };

        x -= step;
        last_value = foo(x, psi);
    }

    if last_value.abs() < tol {
        Ok(x)
    } else {
        Err(SdeError::NewtonNonConvergence {
            psi,
            maxiter,
            tol,
            last_value,
        })
    }
}

/// Tabulated TG grid coefficients, indexed by `floor(psi / dx)`.
#[derive(Clone, Debug)]
pub struct TgGrids {
    pub x_grid: Array1<f64>,
    pub f_nu_grid: Array1<f64>,
    pub f_sigma_grid: Array1<f64>,
}

impl TgGrids {
    /// Look up the grid index for a given `psi`, clamped to the last cell.
    pub fn index_for(&self, psi: f64) -> usize {
        let dx = self.x_grid[1] - self.x_grid[0];
        let raw = (psi / dx).floor();
        if raw < 0.0 {
            0
        } else {
            (raw as usize).min(self.x_grid.len() - 1)
        }
    }
}

/// Build the `(f_nu, f_sigma)` lookup table on a uniform `psi` grid covering
/// `[0, psi_max]` with `n_points` points.
///
/// At `psi = 0` the moment-match has the analytic limit `f_nu = 1, f_sigma =
/// 0` (the truncated normal collapses onto its mean); every other grid point
/// is obtained by solving for the root `r(psi)` and mapping it through the
/// Andersen (2008) truncated-moment relation `D(r) = phi(r) + r*Phi(r)`,
/// `f_nu = r / D(r)`, `f_sigma = 1 / D(r)`.
pub fn build_tg_grids(psi_max: f64, n_points: usize, maxiter: usize, tol: f64) -> SdeResult<TgGrids> {
    if n_points < 2 {
        return Err(SdeError::InvalidParameters {
            parameter: "n_points".to_string(),
            value: n_points as f64,
            constraint: "must be at least 2".to_string(),
        });
    }
    if !(psi_max > 0.0) {
        return Err(SdeError::InvalidParameters {
            parameter: "psi_max".to_string(),
            value: psi_max,
            constraint: "must be strictly positive".to_string(),
        });
    }

    let dx = psi_max / (n_points - 1) as f64;
    let mut x_grid = Array1::<f64>::zeros(n_points);
    let mut f_nu_grid = Array1::<f64>::zeros(n_points);
    let mut f_sigma_grid = Array1::<f64>::zeros(n_points);

    for k in 0..n_points {
        let psi = k as f64 * dx;
        x_grid[k] = psi;
        if k == 0 {
            f_nu_grid[k] = 1.0;
            f_sigma_grid[k] = 0.0;
            continue;
        }
        let r = calculate_r_for_andersen_tg(psi, maxiter, tol)?;
        let d = norm_pdf(r) + r * norm_cdf(r);
        f_nu_grid[k] = r / d;
        f_sigma_grid[k] = 1.0 / d;
    }

    Ok(TgGrids {
        x_grid,
        f_nu_grid,
        f_sigma_grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_solver_converges_mid_range() {
        let r = calculate_r_for_andersen_tg(0.5, DEFAULT_MAXITER, DEFAULT_TOL).unwrap();
        assert!(foo(r, 0.5).abs() < DEFAULT_TOL);
    }

    #[test]
    fn test_root_solver_rejects_zero_psi() {
        assert!(calculate_r_for_andersen_tg(0.0, DEFAULT_MAXITER, DEFAULT_TOL).is_err());
    }

    #[test]
    fn test_build_tg_grids_monotone_and_finite() {
        let grids = build_tg_grids(10.0, 401, DEFAULT_MAXITER, DEFAULT_TOL).unwrap();
        assert_eq!(grids.x_grid[0], 0.0);
        assert_eq!(grids.f_nu_grid[0], 1.0);
        assert_eq!(grids.f_sigma_grid[0], 0.0);
        for i in 0..grids.x_grid.len() {
            assert!(grids.f_nu_grid[i].is_finite());
            assert!(grids.f_sigma_grid[i].is_finite());
            assert!(grids.f_sigma_grid[i] >= 0.0);
        }
    }

    #[test]
    fn test_index_for_clamps() {
        let grids = build_tg_grids(5.0, 11, DEFAULT_MAXITER, DEFAULT_TOL).unwrap();
        assert_eq!(grids.index_for(-1.0), 0);
        assert_eq!(grids.index_for(1000.0), grids.x_grid.len() - 1);
    }
}
