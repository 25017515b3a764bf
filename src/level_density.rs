// Nuclear level density models used to weight continuum spin-parity sub-channels

use crate::nuclear_data::Parity;

/// Density of nuclear levels per MeV at a given excitation energy, spin and
/// parity.
pub trait LevelDensityModel: Send + Sync {
    /// Density of levels with spin `two_j / 2` and parity `parity` at
    /// excitation energy `ex` (MeV^-1). Never negative.
    fn level_density(&self, ex: f64, two_j: u32, parity: Parity) -> f64;

    /// Density of levels of all spins and parities at `ex` (MeV^-1)
    fn total_level_density(&self, ex: f64) -> f64;
}

/// Back-shifted Fermi gas model with a rigid-body spin cutoff and
/// equiprobable parities.
///
/// ρ(U) = exp(2√(aU)) / (12√2 σ a^¼ U^⁵⁄₄),  U = Ex − δ
///
/// ρ(U, J, π) = ½ ρ(U) (2J + 1) / (2σ²) exp(−(J + ½)² / (2σ²))
#[derive(Debug, Clone, PartialEq)]
pub struct BackshiftedFermiGas {
    /// Level density parameter a (MeV^-1)
    pub a_param: f64,
    /// Energy back-shift δ (MeV)
    pub delta: f64,
    pub mass_number: u32,
}

/// Lowest effective excitation energy used in the Fermi gas formulas (MeV)
const MIN_EFFECTIVE_ENERGY: f64 = 0.05;

impl BackshiftedFermiGas {
    /// Global systematics for a nucleus with `z` protons and `a` nucleons.
    pub fn new(z: u32, a: u32) -> Self {
        let af = a.max(1) as f64;
        let a_param = af * (0.0722396 + 0.195267 * af.powf(-1.0 / 3.0));

        // even-even nuclei are shifted up, odd-odd down
        let n = a.saturating_sub(z);
        let pairing = 12.0 / af.sqrt();
        let delta = match (z % 2 == 0, n % 2 == 0) {
            (true, true) => 0.5 * pairing,
            (false, false) => -0.5 * pairing,
            _ => 0.0,
        } - 0.381;

        Self {
            a_param,
            delta,
            mass_number: a,
        }
    }

    pub fn with_parameters(a_param: f64, delta: f64, mass_number: u32) -> Self {
        Self {
            a_param,
            delta,
            mass_number,
        }
    }

    fn effective_energy(&self, ex: f64) -> f64 {
        (ex - self.delta).max(MIN_EFFECTIVE_ENERGY)
    }

    /// Squared spin cutoff parameter σ² at excitation energy `ex`
    pub fn spin_cutoff_squared(&self, ex: f64) -> f64 {
        let u = self.effective_energy(ex);
        let a = self.a_param;
        let af = self.mass_number as f64;
        0.0146 * af.powf(5.0 / 3.0) * (1.0 + (1.0 + 4.0 * a * u).sqrt()) / (2.0 * a)
    }
}

impl LevelDensityModel for BackshiftedFermiGas {
    fn level_density(&self, ex: f64, two_j: u32, _parity: Parity) -> f64 {
        let sigma2 = self.spin_cutoff_squared(ex);
        let j = two_j as f64 / 2.0;
        let spin_fraction =
            (2.0 * j + 1.0) / (2.0 * sigma2) * (-(j + 0.5).powi(2) / (2.0 * sigma2)).exp();
        0.5 * self.total_level_density(ex) * spin_fraction
    }

    fn total_level_density(&self, ex: f64) -> f64 {
        let u = self.effective_energy(ex);
        let a = self.a_param;
        let sigma = self.spin_cutoff_squared(ex).sqrt();
        (2.0 * (a * u).sqrt()).exp()
            / (12.0 * std::f64::consts::SQRT_2 * sigma * a.powf(0.25) * u.powf(1.25))
    }
}

/// Level density that is the same for every energy, spin and parity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantLevelDensity(pub f64);

impl LevelDensityModel for ConstantLevelDensity {
    fn level_density(&self, _ex: f64, _two_j: u32, _parity: Parity) -> f64 {
        self.0.max(0.0)
    }

    fn total_level_density(&self, _ex: f64) -> f64 {
        self.0.max(0.0)
    }
}
