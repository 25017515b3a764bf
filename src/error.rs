// Error type shared by channel construction, sampling and the cascade driver

use thiserror::Error;

use crate::nuclear_data::Parity;

/// Failures raised while building exit channels or sampling a decay step.
///
/// None of these are retried internally. A failure aborts the cascade of the
/// current event; regenerating the event is up to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecayError {
    /// Partial width was negative or not finite.
    #[error("invalid partial width {width} MeV (must be finite and >= 0)")]
    InvalidWidth { width: f64 },

    /// Continuum bounds were reversed or not finite.
    #[error("invalid continuum excitation range [{e_min}, {e_max}] MeV")]
    InvalidEnergyRange { e_min: f64, e_max: f64 },

    /// The excitation-energy density returned a value that cannot be used.
    #[error("excitation-energy density evaluated to {value} at Ex = {ex} MeV")]
    DensityViolation { ex: f64, value: f64 },

    /// The density is zero everywhere on the continuum interval.
    #[error("excitation-energy density vanishes on [{e_min}, {e_max}] MeV")]
    VanishingDensity { e_min: f64, e_max: f64 },

    /// Inverting the cumulative distribution did not converge.
    #[error("CDF inversion failed to converge for target {target} after {iterations} iterations")]
    NumericalConvergenceFailure { target: f64, iterations: usize },

    /// No spin-parity (or channel) with non-zero width is reachable.
    #[error("no accessible decay channel at Ex = {ex} MeV, 2J = {two_j}, parity {parity}")]
    NoAccessibleChannel { ex: f64, two_j: u32, parity: Parity },

    /// The parent state is too light to produce the requested final state.
    #[error("decay forbidden: parent mass {parent_mass} MeV below product mass {product_mass} MeV")]
    KinematicallyForbidden { parent_mass: f64, product_mass: f64 },

    /// The cascade did not reach a terminal state within the step limit.
    #[error("cascade exceeded {steps} decay steps")]
    CascadeLimitExceeded { steps: usize },

    /// Configuration could not be read or failed validation.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DecayError>;

/// Reject widths that could not serve as sampling weights.
pub(crate) fn check_width(width: f64) -> Result<f64> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(DecayError::InvalidWidth { width })
    }
}
