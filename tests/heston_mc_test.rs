// tests/heston_mc_test.rs
use heston_mc::analytics::bs_analytic::bs_call_price;
use heston_mc::driver::{mc_price, McOptions};
use heston_mc::params::{HestonParameters, MarketState};
use heston_mc::payoff::{european_call, terminal_spot};
use heston_mc::scheme::SchemeOptions;

#[test]
fn test_euler_zero_vol_of_vol_matches_black_scholes() {
    let s0 = 100.0;
    let k = 100.0;
    let r = 0.03;
    let v0 = 0.04;
    let t = 1.0;

    let state = MarketState::new(s0, r).unwrap();
    // gamma -> 0 collapses the variance process onto a deterministic path,
    // recovering Black-Scholes with sigma = sqrt(v0).
    let params = HestonParameters::new(2.0, 1e-6, -0.5, v0, v0).unwrap();
    let payoff = european_call(k);

    let opts = McOptions {
        scheme: SchemeOptions::Euler,
        abs_err: 0.03,
        alpha: 0.05,
        batch_size: 20_000,
        max_iter: 30,
        cv_iter: 0,
        seed: Some(42),
        cv_payoff: None,
        mu: None,
    };

    let estimate = mc_price(&payoff, &state, &params, t, 100, &opts).unwrap();
    let analytic = bs_call_price(s0, k, r, v0.sqrt(), t);

    assert!(
        (estimate.price - analytic).abs() < 0.10,
        "mc price {} too far from analytic {}",
        estimate.price,
        analytic
    );
}

#[test]
fn test_qe_and_tg_agree() {
    let state = MarketState::new(100.0, 0.03).unwrap();
    let params = HestonParameters::new(2.0, 0.3, -0.7, 0.04, 0.04).unwrap();
    let payoff = european_call(100.0);

    let qe_opts = McOptions {
        scheme: SchemeOptions::AndersenQe {
            psi_c: 1.5,
            gamma_1: 0.5,
        },
        abs_err: 0.05,
        alpha: 0.05,
        batch_size: 20_000,
        max_iter: 30,
        cv_iter: 0,
        seed: Some(7),
        cv_payoff: None,
        mu: None,
    };
    let grids = std::sync::Arc::new(
        heston_mc::tg_solver::build_tg_grids(50.0, 2001, 2500, 1e-5).unwrap(),
    );
    let tg_opts = McOptions {
        scheme: SchemeOptions::AndersenTg {
            gamma_1: 0.5,
            grids,
        },
        abs_err: 0.05,
        alpha: 0.05,
        batch_size: 20_000,
        max_iter: 30,
        cv_iter: 0,
        seed: Some(7),
        cv_payoff: None,
        mu: None,
    };

    let qe_estimate = mc_price(&payoff, &state, &params, 1.0, 50, &qe_opts).unwrap();
    let tg_estimate = mc_price(&payoff, &state, &params, 1.0, 50, &tg_opts).unwrap();

    assert!(
        (qe_estimate.price - tg_estimate.price).abs() < 0.5,
        "QE price {} and TG price {} disagree by more than expected",
        qe_estimate.price,
        tg_estimate.price
    );
}

#[test]
fn test_driver_stops_within_target_half_width() {
    let state = MarketState::new(100.0, 0.03).unwrap();
    let params = HestonParameters::new(2.0, 0.3, -0.7, 0.04, 0.04).unwrap();
    let payoff = european_call(100.0);

    let opts = McOptions {
        scheme: SchemeOptions::Euler,
        abs_err: 0.05,
        alpha: 0.05,
        batch_size: 5_000,
        max_iter: 200,
        cv_iter: 0,
        seed: Some(11),
        cv_payoff: None,
        mu: None,
    };

    let estimate = mc_price(&payoff, &state, &params, 1.0, 50, &opts).unwrap();
    assert!(estimate.half_width <= opts.abs_err || estimate.batches == opts.max_iter);
}

#[test]
fn test_control_variate_reduces_variance() {
    let state = MarketState::new(100.0, 0.03).unwrap();
    let params = HestonParameters::new(2.0, 0.3, -0.7, 0.04, 0.04).unwrap();
    let payoff = european_call(100.0);
    let cv_payoff = terminal_spot();
    let analytic_cv_mean = 100.0 * (0.03_f64 * 1.0).exp();

    let opts_plain = McOptions {
        scheme: SchemeOptions::Euler,
        abs_err: 1e-9,
        alpha: 0.05,
        batch_size: 20_000,
        max_iter: 1,
        cv_iter: 0,
        seed: Some(5),
        cv_payoff: None,
        mu: None,
    };
    let opts_cv = McOptions {
        scheme: SchemeOptions::Euler,
        abs_err: 1e-9,
        alpha: 0.05,
        batch_size: 20_000,
        max_iter: 1,
        cv_iter: 5_000,
        seed: Some(5),
        cv_payoff: Some(&cv_payoff),
        mu: Some(analytic_cv_mean),
    };

    let plain = mc_price(&payoff, &state, &params, 1.0, 50, &opts_plain).unwrap();
    let with_cv = mc_price(&payoff, &state, &params, 1.0, 50, &opts_cv).unwrap();

    assert!(with_cv.half_width <= plain.half_width * 1.5);
}
