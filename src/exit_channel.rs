// Exit channels for one de-excitation step of an excited nucleus
//
// An exit channel is one way the nucleus can decay: emit a light fragment or
// a gamma ray, leaving the residue either in a known discrete level or
// somewhere in the unbound continuum. Every channel carries a partial width
// used to pick among competing channels.

use rand::Rng;
use std::sync::Arc;

use crate::continuum::{ContinuumFragmentChannel, ContinuumGammaChannel};
use crate::error::{check_width, Result};
use crate::kinematics::two_body_decay;
use crate::nuclear_data::{Fragment, Level, NuclearState, PHOTON};
use crate::particle::Particle;
use crate::weighted::Weighted;

pub use crate::continuum::{SamplingMode, SpinParityWidth};

/// Emission of a fragment leaving the residue in a discrete level.
#[derive(Debug, Clone)]
pub struct DiscreteFragmentChannel {
    width: f64,
    level: Arc<Level>,
    residue: Particle,
    fragment: Arc<Fragment>,
}

impl DiscreteFragmentChannel {
    /// `gs_residue` is the residual nucleus in its ground state; the stored
    /// residue has its mass raised by the level energy.
    pub fn new(width: f64, level: Arc<Level>, gs_residue: Particle, fragment: Arc<Fragment>) -> Result<Self> {
        let width = check_width(width)?;
        let mut residue = gs_residue;
        residue.set_mass(residue.mass + level.energy);
        Ok(Self {
            width,
            level,
            residue,
            fragment,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// Residual nucleus at rest in the final level
    pub fn residue(&self) -> &Particle {
        &self.residue
    }

    /// Two draws, both for the emission direction.
    pub fn decay<R: Rng + ?Sized>(&self, state: &mut NuclearState, rng: &mut R) -> Result<(Particle, Particle)> {
        let emitted = Particle::new(self.fragment.pdg, self.fragment.mass, self.fragment.charge);
        decay_to_level(state, emitted, &self.residue, &self.level, rng)
    }
}

/// Gamma emission to a discrete level of the same nucleus.
#[derive(Debug, Clone)]
pub struct DiscreteGammaChannel {
    width: f64,
    level: Arc<Level>,
    residue: Particle,
}

impl DiscreteGammaChannel {
    pub fn new(width: f64, level: Arc<Level>, gs_residue: Particle) -> Result<Self> {
        let width = check_width(width)?;
        let mut residue = gs_residue;
        residue.set_mass(residue.mass + level.energy);
        Ok(Self { width, level, residue })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn residue(&self) -> &Particle {
        &self.residue
    }

    /// Two draws, both for the emission direction.
    pub fn decay<R: Rng + ?Sized>(&self, state: &mut NuclearState, rng: &mut R) -> Result<(Particle, Particle)> {
        let photon = Particle::new(PHOTON, 0.0, 0);
        decay_to_level(state, photon, &self.residue, &self.level, rng)
    }
}

fn decay_to_level<R: Rng + ?Sized>(
    state: &mut NuclearState,
    mut emitted: Particle,
    prepared_residue: &Particle,
    level: &Level,
    rng: &mut R,
) -> Result<(Particle, Particle)> {
    let mut residue = prepared_residue.clone();
    two_body_decay(state.mass(), &mut emitted, &mut residue, rng)?;

    state.pdg = residue.pdg;
    state.gs_mass = residue.mass - level.energy;
    state.ex = level.energy;
    state.two_j = level.two_j;
    state.parity = level.parity;
    Ok((emitted, residue))
}

/// One candidate decay of the current nuclear state.
#[derive(Debug, Clone)]
pub enum ExitChannel {
    DiscreteFragment(DiscreteFragmentChannel),
    DiscreteGamma(DiscreteGammaChannel),
    ContinuumFragment(ContinuumFragmentChannel),
    ContinuumGamma(ContinuumGammaChannel),
}

impl ExitChannel {
    /// Partial width (MeV), exactly as given at construction
    pub fn width(&self) -> f64 {
        match self {
            ExitChannel::DiscreteFragment(c) => c.width(),
            ExitChannel::DiscreteGamma(c) => c.width(),
            ExitChannel::ContinuumFragment(c) => c.width(),
            ExitChannel::ContinuumGamma(c) => c.width(),
        }
    }

    pub fn is_continuum(&self) -> bool {
        matches!(self, ExitChannel::ContinuumFragment(_) | ExitChannel::ContinuumGamma(_))
    }

    pub fn emits_fragment(&self) -> bool {
        matches!(self, ExitChannel::DiscreteFragment(_) | ExitChannel::ContinuumFragment(_))
    }

    /// PDG code of the emitted particle
    pub fn emitted_particle_pdg(&self) -> i32 {
        match self {
            ExitChannel::DiscreteFragment(c) => c.fragment().pdg,
            ExitChannel::ContinuumFragment(c) => c.fragment().pdg,
            ExitChannel::DiscreteGamma(_) | ExitChannel::ContinuumGamma(_) => PHOTON,
        }
    }

    /// Sample one decay of the nucleus described by `state`.
    ///
    /// Returns `(emitted, residue)` with momenta in the parent rest frame and
    /// overwrites `state` with the residual nucleus. On error `state` is left
    /// as it was. `mode` only affects continuum channels.
    pub fn decay<R: Rng + ?Sized>(
        &self,
        state: &mut NuclearState,
        rng: &mut R,
        mode: SamplingMode,
    ) -> Result<(Particle, Particle)> {
        match self {
            ExitChannel::DiscreteFragment(c) => c.decay(state, rng),
            ExitChannel::DiscreteGamma(c) => c.decay(state, rng),
            ExitChannel::ContinuumFragment(c) => c.decay(state, rng, mode),
            ExitChannel::ContinuumGamma(c) => c.decay(state, rng, mode),
        }
    }

    /// Drop any lazily built samplers. Discrete channels have none.
    pub fn invalidate_caches(&mut self) {
        match self {
            ExitChannel::ContinuumFragment(c) => c.invalidate_caches(),
            ExitChannel::ContinuumGamma(c) => c.invalidate_caches(),
            _ => {}
        }
    }
}

impl Weighted for ExitChannel {
    fn weight(&self) -> f64 {
        self.width()
    }
}

impl From<DiscreteFragmentChannel> for ExitChannel {
    fn from(c: DiscreteFragmentChannel) -> Self {
        ExitChannel::DiscreteFragment(c)
    }
}

impl From<DiscreteGammaChannel> for ExitChannel {
    fn from(c: DiscreteGammaChannel) -> Self {
        ExitChannel::DiscreteGamma(c)
    }
}

impl From<ContinuumFragmentChannel> for ExitChannel {
    fn from(c: ContinuumFragmentChannel) -> Self {
        ExitChannel::ContinuumFragment(c)
    }
}

impl From<ContinuumGammaChannel> for ExitChannel {
    fn from(c: ContinuumGammaChannel) -> Self {
        ExitChannel::ContinuumGamma(c)
    }
}
