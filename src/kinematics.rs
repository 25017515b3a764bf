// Two-body decay kinematics in the rest frame of the decaying nucleus

use nalgebra::Vector3;
use rand::Rng;

use crate::error::{DecayError, Result};
use crate::particle::Particle;

/// Sample a unit vector uniformly on the sphere. Consumes two uniform draws
/// (polar cosine first, then azimuth).
pub fn sample_isotropic_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f64> {
    let xi1: f64 = rng.gen();
    let xi2: f64 = rng.gen();

    let mu = 2.0 * xi1 - 1.0;
    let phi = 2.0 * std::f64::consts::PI * xi2;
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();

    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), mu)
}

/// Magnitude of the momentum of either product when a particle of mass
/// `parent_mass` at rest decays into masses `m1` and `m2` (all MeV).
///
/// The Källén function is evaluated in factored form to avoid cancellation
/// when the parent is heavy and the energy release small.
pub fn two_body_momentum(parent_mass: f64, m1: f64, m2: f64) -> Result<f64> {
    let threshold = m1 + m2;
    // allow for roundoff in masses assembled from ground state + excitation
    let slack = 1e-12 * parent_mass.abs().max(threshold.abs());
    if !(parent_mass.is_finite() && threshold.is_finite()) || parent_mass + slack < threshold {
        return Err(DecayError::KinematicallyForbidden {
            parent_mass,
            product_mass: threshold,
        });
    }

    let product = (parent_mass - m1 - m2).max(0.0)
        * (parent_mass + m1 + m2)
        * (parent_mass - m1 + m2)
        * (parent_mass + m1 - m2);
    Ok(product.max(0.0).sqrt() / (2.0 * parent_mass))
}

/// Isotropic two-body decay of a parent of mass `parent_mass` at rest.
///
/// Loads `emitted` and `residue` with back-to-back momenta; their rest masses
/// must already be set. Consumes exactly two uniform draws.
pub fn two_body_decay<R: Rng + ?Sized>(
    parent_mass: f64,
    emitted: &mut Particle,
    residue: &mut Particle,
    rng: &mut R,
) -> Result<()> {
    let p = two_body_momentum(parent_mass, emitted.mass, residue.mass)?;
    let direction = sample_isotropic_direction(rng);
    emitted.set_momentum(p * direction);
    residue.set_momentum(-p * direction);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_isotropic_direction_is_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut mean = Vector3::zeros();
        let n = 20_000;
        for _ in 0..n {
            let d = sample_isotropic_direction(&mut rng);
            assert!((d.norm() - 1.0).abs() < 1e-12);
            mean += d;
        }
        mean /= n as f64;
        // each component of the mean has sigma = 1/sqrt(3n) ≈ 0.004
        assert!(mean.norm() < 0.03, "mean direction {:?}", mean);
    }

    #[test]
    fn test_two_body_momentum_massless_pair() {
        let p = two_body_momentum(10.0, 0.0, 0.0).unwrap();
        assert!((p - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_two_body_momentum_heavy_parent_small_q() {
        // gamma of 1 MeV from a nucleus of ~37 GeV: p ≈ Q (1 - Q / 2M)
        let m_res = 37_000.0;
        let q = 1.0;
        let p = two_body_momentum(m_res + q, 0.0, m_res).unwrap();
        let expected = q * (2.0 * m_res + q) / (2.0 * (m_res + q));
        assert!((p - expected).abs() < 1e-9);
    }

    #[test]
    fn test_below_threshold_is_forbidden() {
        let err = two_body_momentum(100.0, 60.0, 50.0);
        assert!(matches!(err, Err(DecayError::KinematicallyForbidden { .. })));
        assert_eq!(two_body_momentum(110.0, 60.0, 50.0).unwrap(), 0.0);
    }

    #[test]
    fn test_decay_conserves_four_momentum() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut emitted = Particle::new(2112, 939.565, 0);
        let mut residue = Particle::new(1000180390, 36_295.0, 18);
        let parent = 939.565 + 36_295.0 + 3.2;
        two_body_decay(parent, &mut emitted, &mut residue, &mut rng).unwrap();
        let total = emitted.momentum + residue.momentum;
        assert!(total.norm() < 1e-9);
        assert!((emitted.total_energy + residue.total_energy - parent).abs() < 1e-7);
        assert!((emitted.kinetic_energy() + residue.kinetic_energy() - 3.2).abs() < 1e-7);
    }
}
