// src/error.rs
use std::fmt;

/// Error type for the heston-mc library
#[derive(Debug, Clone)]
pub enum SdeError {
    /// Contract time horizon T is not strictly positive
    InvalidTimeHorizon { t: f64 },

    /// Psi_c (QE scheme switching threshold) outside [1, 2]
    InvalidPsiC { psi_c: f64 },

    /// gamma_1 (QE/TG integration weight) outside [0, 1]
    InvalidGamma1 { gamma_1: f64 },

    /// A control-variate payoff was supplied without its analytic mean mu
    MissingControlVariateMean,

    /// The TG root solver exceeded maxiter without reaching tol
    NewtonNonConvergence {
        psi: f64,
        maxiter: usize,
        tol: f64,
        last_value: f64,
    },

    /// Invalid parameter values on a parameter record
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Numerical instability or non-finite intermediate value in a hot loop
    NumericalInstability { method: String, reason: String },
}

impl fmt::Display for SdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdeError::InvalidTimeHorizon { t } => {
                write!(f, "contract time horizon T = {} must be positive", t)
            }
            SdeError::InvalidPsiC { psi_c } => {
                write!(f, "psi_c = {} must lie in [1, 2]", psi_c)
            }
            SdeError::InvalidGamma1 { gamma_1 } => {
                write!(f, "gamma_1 = {} must lie in [0, 1]", gamma_1)
            }
            SdeError::MissingControlVariateMean => {
                write!(
                    f,
                    "control-variate payoff supplied without its analytic mean mu"
                )
            }
            SdeError::NewtonNonConvergence {
                psi,
                maxiter,
                tol,
                last_value,
            } => write!(
                f,
                "TG root solver failed to converge for psi = {} after {} iterations (tol = {}, last |f(x)| = {})",
                psi, maxiter, tol, last_value
            ),
            SdeError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => write!(
                f,
                "invalid parameter '{}' = {}: {}",
                parameter, value, constraint
            ),
            SdeError::NumericalInstability { method, reason } => {
                write!(f, "numerical instability in {}: {}", method, reason)
            }
        }
    }
}

impl std::error::Error for SdeError {}

/// Result type alias for heston-mc operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities, mirroring the parameter-record checks used throughout the crate
pub mod validation {
    use super::{SdeError, SdeResult};

    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        if value <= 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    pub fn validate_non_negative(name: &str, value: f64) -> SdeResult<()> {
        if value < 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (>= 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> SdeResult<()> {
        if value < min || value > max {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    pub fn validate_correlation(name: &str, rho: f64) -> SdeResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("gamma", 0.2).is_ok());
        assert!(validate_positive("gamma", 0.0).is_err());
        assert!(validate_positive("gamma", -0.1).is_err());
    }

    #[test]
    fn test_validate_correlation() {
        assert!(validate_correlation("rho", 0.5).is_ok());
        assert!(validate_correlation("rho", 1.0).is_ok());
        assert!(validate_correlation("rho", -1.0).is_ok());
        assert!(validate_correlation("rho", 1.1).is_err());
    }

    #[test]
    fn test_invalid_time_horizon_display() {
        let err = SdeError::InvalidTimeHorizon { t: -1.0 };
        let msg = format!("{}", err);
        assert!(msg.contains("positive"));
    }

    #[test]
    fn test_missing_cv_mean_display() {
        let err = SdeError::MissingControlVariateMean;
        assert!(format!("{}", err).contains("mu"));
    }
}
