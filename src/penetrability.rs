// Fragment transmission coefficients through the Coulomb + centrifugal barrier

use crate::data::MEV_PER_AMU;
use crate::nuclear_data::Fragment;

/// hbar * c (MeV fm)
const HBAR_C: f64 = 197.3269804;
/// e^2 / (4 pi eps0) (MeV fm)
const COULOMB_CONSTANT: f64 = 1.439964547;

/// Source of transmission coefficients for fragment emission.
pub trait FragmentTransmissionModel: Send + Sync {
    /// Transmission coefficient for a fragment leaving with kinetic energy
    /// `kinetic_energy` (MeV), orbital angular momentum `l` and total
    /// angular momentum `two_j / 2`. Between 0 and 1.
    fn transmission_coefficient(
        &self,
        kinetic_energy: f64,
        fragment: &Fragment,
        two_j: u32,
        l: u32,
    ) -> f64;
}

/// Parabolic (Hill-Wheeler) barrier penetrability.
///
/// The barrier height for partial wave l is the Coulomb energy at the touching
/// radius plus the centrifugal term there,
/// V_l = Z₁Z₂e²/R + ħ²l(l+1)/(2μR²), and
/// T_l(E) = 1 / (1 + exp(2π(V_l − E)/ħω)).
/// Spin-orbit splitting is ignored, so `two_j` does not enter.
#[derive(Debug, Clone, PartialEq)]
pub struct HillWheelerBarrier {
    /// Atomic number of the residual nucleus
    pub z_residue: u32,
    /// Mass number of the residual nucleus
    pub a_residue: u32,
    /// Radius parameter r₀ in R = r₀ (A₁^⅓ + A₂^⅓) (fm)
    pub radius_parameter: f64,
    /// Barrier curvature ħω (MeV)
    pub curvature: f64,
}

impl HillWheelerBarrier {
    pub fn new(z_residue: u32, a_residue: u32) -> Self {
        Self {
            z_residue,
            a_residue,
            radius_parameter: 1.5,
            curvature: 1.0,
        }
    }

    pub fn with_shape(mut self, radius_parameter: f64, curvature: f64) -> Self {
        self.radius_parameter = radius_parameter;
        self.curvature = curvature;
        self
    }

    fn touching_radius(&self, fragment: &Fragment) -> f64 {
        let a1 = (self.a_residue as f64).cbrt();
        let a2 = (fragment.mass_number as f64).cbrt();
        self.radius_parameter * (a1 + a2)
    }

    /// Height of the barrier seen by `fragment` in partial wave `l` (MeV)
    pub fn barrier_height(&self, fragment: &Fragment, l: u32) -> f64 {
        let radius = self.touching_radius(fragment);
        let coulomb = COULOMB_CONSTANT * self.z_residue as f64 * fragment.charge.max(0) as f64 / radius;

        let m1 = self.a_residue as f64 * MEV_PER_AMU;
        let reduced_mass = m1 * fragment.mass / (m1 + fragment.mass);
        let lf = l as f64;
        let centrifugal = HBAR_C * HBAR_C * lf * (lf + 1.0) / (2.0 * reduced_mass * radius * radius);

        coulomb + centrifugal
    }
}

impl FragmentTransmissionModel for HillWheelerBarrier {
    fn transmission_coefficient(
        &self,
        kinetic_energy: f64,
        fragment: &Fragment,
        _two_j: u32,
        l: u32,
    ) -> f64 {
        if kinetic_energy <= 0.0 {
            return 0.0;
        }
        let height = self.barrier_height(fragment, l);
        let exponent = 2.0 * std::f64::consts::PI * (height - kinetic_energy) / self.curvature;
        // exp overflow just gives T = 0
        1.0 / (1.0 + exponent.exp())
    }
}
