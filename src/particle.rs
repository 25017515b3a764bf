use nalgebra::Vector3;

/// A final-state particle: PDG code, rest mass and four-momentum (MeV).
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pdg: i32,
    pub mass: f64,
    /// Electric charge in units of e
    pub charge: i32,
    pub momentum: Vector3<f64>,
    pub total_energy: f64,
}

impl Particle {
    /// A particle at rest
    pub fn new(pdg: i32, mass: f64, charge: i32) -> Self {
        Self {
            pdg,
            mass,
            charge,
            momentum: Vector3::zeros(),
            total_energy: mass,
        }
    }

    /// Set the three-momentum and recompute the total energy on shell.
    pub fn set_momentum(&mut self, momentum: Vector3<f64>) {
        self.total_energy = (momentum.norm_squared() + self.mass * self.mass).sqrt();
        self.momentum = momentum;
    }

    /// Change the rest mass, keeping the three-momentum.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.total_energy = (self.momentum.norm_squared() + mass * mass).sqrt();
    }

    pub fn kinetic_energy(&self) -> f64 {
        (self.total_energy - self.mass).max(0.0)
    }

    pub fn px(&self) -> f64 {
        self.momentum.x
    }

    pub fn py(&self) -> f64 {
        self.momentum.y
    }

    pub fn pz(&self) -> f64 {
        self.momentum.z
    }
}
