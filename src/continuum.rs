// Continuum exit channels: lazy excitation-energy inversion and spin-parity sampling
//
// Phase 1 samples the final excitation energy by inverting the cumulative
// distribution of the channel's density. Phase 2 samples a final spin-parity
// from a table of partial widths built from transmission coefficients and a
// level density. Both the interpolant and the table are built on first use
// only, since most channels offered to the selector are never chosen.

use once_cell::sync::OnceCell;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{check_width, DecayError, Result};
use crate::gamma_strength::{GammaStrengthModel, TransitionType};
use crate::interpolation::ChebyshevInterpolant;
use crate::kinematics::two_body_decay;
use crate::level_density::LevelDensityModel;
use crate::nuclear_data::{Fragment, NuclearState, Parity, PHOTON};
use crate::particle::Particle;
use crate::penetrability::FragmentTransmissionModel;
use crate::weighted::{self, Weighted};

/// Density of final excitation energies for gamma emission (MeV^-1)
pub type GammaDensity = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Density of final excitation energies for fragment emission. Returns the
/// density (MeV^-1) together with the fragment kinetic energy (MeV) fixed by
/// energy conservation at that excitation energy.
pub type FragmentDensity = Arc<dyn Fn(f64) -> (f64, f64) + Send + Sync>;

/// Whether a continuum decay samples a final spin-parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Sample the excitation energy and then the spin-parity
    #[default]
    Full,
    /// Sample only the excitation energy and leave spin and parity as they
    /// were. Not physically meaningful: only for tests that isolate the
    /// energy sampling.
    SkipSpinParity,
}

/// One spin-parity sub-channel of a continuum channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinParityWidth {
    /// Two times the final nuclear spin
    pub two_j: u32,
    pub parity: Parity,
    /// Partial width (MeV)
    pub width: f64,
}

impl Weighted for SpinParityWidth {
    fn weight(&self) -> f64 {
        self.width
    }
}

/// Accessible range of final excitation energies [e_min, e_max] (MeV)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitationRange {
    pub e_min: f64,
    pub e_max: f64,
}

impl ExcitationRange {
    pub fn new(e_min: f64, e_max: f64) -> Result<Self> {
        if !(e_min.is_finite() && e_max.is_finite()) || e_min > e_max {
            return Err(DecayError::InvalidEnergyRange { e_min, e_max });
        }
        Ok(Self { e_min, e_max })
    }

    pub fn width(&self) -> f64 {
        self.e_max - self.e_min
    }

    pub fn contains(&self, ex: f64) -> bool {
        ex >= self.e_min && ex <= self.e_max
    }
}

/// Cached CDF of the excitation-energy density
#[derive(Debug, Clone)]
struct EnergySampler {
    pdf: ChebyshevInterpolant,
    cdf: ChebyshevInterpolant,
    total: f64,
}

/// Validate one density value. Negative values mark an inaccessible region
/// and count as zero; non-finite values are an error.
fn checked_density(ex: f64, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(DecayError::DensityViolation { ex, value });
    }
    if value < 0.0 {
        log::warn!(
            "{}; treating it as zero",
            DecayError::DensityViolation { ex, value }
        );
        return Ok(0.0);
    }
    Ok(value)
}

fn build_energy_sampler<F>(range: ExcitationRange, config: &Config, mut density: F) -> Result<EnergySampler>
where
    F: FnMut(f64) -> f64,
{
    let build = ChebyshevInterpolant::build_adaptive(
        |ex| checked_density(ex, density(ex)),
        range.e_min,
        range.e_max,
        config.initial_degree,
        config.max_degree,
        config.interpolation_tolerance,
    )?;
    if build.converged {
        log::debug!(
            "built excitation-energy interpolant on [{}, {}] MeV with degree {}",
            range.e_min,
            range.e_max,
            build.interpolant.degree()
        );
    } else {
        log::warn!(
            "excitation-energy interpolant on [{}, {}] MeV not converged at degree {}",
            range.e_min,
            range.e_max,
            build.interpolant.degree()
        );
    }

    let pdf = build.interpolant;
    let cdf = pdf.cdf();
    let total = cdf.evaluate(range.e_max);
    if !(total > 0.0 && total.is_finite()) {
        return Err(DecayError::VanishingDensity {
            e_min: range.e_min,
            e_max: range.e_max,
        });
    }
    Ok(EnergySampler { pdf, cdf, total })
}

/// Phase 1 shared by both continuum channels. Always consumes one draw.
fn sample_excitation<F, R>(
    cell: &OnceCell<EnergySampler>,
    range: ExcitationRange,
    config: &Config,
    density: F,
    rng: &mut R,
) -> Result<f64>
where
    F: FnMut(f64) -> f64,
    R: Rng + ?Sized,
{
    let u: f64 = rng.gen();
    if range.width() == 0.0 {
        return Ok(range.e_min);
    }

    let sampler = cell.get_or_try_init(|| build_energy_sampler(range, config, density))?;
    let ex = sampler.cdf.invert(
        u * sampler.total,
        &sampler.pdf,
        config.root_tolerance,
        config.max_root_iterations,
    )?;
    log::trace!("sampled continuum Ex = {} MeV (u = {})", ex, u);
    Ok(ex.clamp(range.e_min, range.e_max))
}

/// Phase 2 draw shared by both continuum channels.
fn sample_spin_parity<R: Rng + ?Sized>(
    table: &[SpinParityWidth],
    ex_final: f64,
    state: &NuclearState,
    rng: &mut R,
) -> Result<(u32, Parity)> {
    weighted::select(table, rng)
        .map(|entry| (entry.two_j, entry.parity))
        .ok_or(DecayError::NoAccessibleChannel {
            ex: ex_final,
            two_j: state.two_j,
            parity: state.parity,
        })
}

/// Emit `emitted` from the parent in `state`, leaving a residue built from
/// `gs_residue` at excitation `ex_final`, then overwrite `state`.
fn finish_decay<R: Rng + ?Sized>(
    state: &mut NuclearState,
    mut emitted: Particle,
    gs_residue: &Particle,
    ex_final: f64,
    two_j: u32,
    parity: Parity,
    rng: &mut R,
) -> Result<(Particle, Particle)> {
    let mut residue = gs_residue.clone();
    residue.set_mass(gs_residue.mass + ex_final);
    two_body_decay(state.mass(), &mut emitted, &mut residue, rng)?;

    state.pdg = gs_residue.pdg;
    state.gs_mass = gs_residue.mass;
    state.ex = ex_final;
    state.two_j = two_j;
    state.parity = parity;
    Ok((emitted, residue))
}

/// Values of 2J that differ from `two_j` by at most `two_delta`, keeping the
/// same integer / half-integer character and never going negative.
fn coupled_spins(two_j: u32, two_delta: u32) -> impl Iterator<Item = u32> {
    let low = if two_delta > two_j {
        (two_delta - two_j) % 2
    } else {
        two_j - two_delta
    };
    (low..=two_j + two_delta).step_by(2)
}

/// Gamma emission into the unbound continuum of the same nucleus.
#[derive(Clone)]
pub struct ContinuumGammaChannel {
    width: f64,
    range: ExcitationRange,
    gs_residue: Particle,
    density: GammaDensity,
    level_density: Arc<dyn LevelDensityModel>,
    strength: Arc<dyn GammaStrengthModel>,
    config: Config,
    energy_sampler: OnceCell<EnergySampler>,
    spin_parity_table: OnceCell<Vec<SpinParityWidth>>,
}

impl ContinuumGammaChannel {
    /// # Arguments
    /// * `width` - Partial width (MeV)
    /// * `e_min`, `e_max` - Accessible final excitation energies (MeV)
    /// * `density` - Final excitation-energy density on `[e_min, e_max]`
    /// * `gs_residue` - Residual nucleus in its ground state; its mass plus
    ///   the sampled excitation energy gives the final-state mass
    /// * `level_density`, `strength` - Models used for the spin-parity table
    pub fn new<F>(
        width: f64,
        e_min: f64,
        e_max: f64,
        density: F,
        gs_residue: Particle,
        level_density: Arc<dyn LevelDensityModel>,
        strength: Arc<dyn GammaStrengthModel>,
    ) -> Result<Self>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Ok(Self {
            width: check_width(width)?,
            range: ExcitationRange::new(e_min, e_max)?,
            gs_residue,
            density: Arc::new(density),
            level_density,
            strength,
            config: Config::snapshot(),
            energy_sampler: OnceCell::new(),
            spin_parity_table: OnceCell::new(),
        })
    }

    /// Use `config` instead of the global settings. Fails if `config` does
    /// not pass [`Config::validate`].
    pub fn with_config(mut self, config: Config) -> Result<Self> {
        config.validate()?;
        self.config = config;
        self.invalidate_caches();
        Ok(self)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn range(&self) -> ExcitationRange {
        self.range
    }

    pub fn gs_residue(&self) -> &Particle {
        &self.gs_residue
    }

    /// Spin-parity table, if a decay has built it
    pub fn spin_parity_table(&self) -> Option<&[SpinParityWidth]> {
        self.spin_parity_table.get().map(Vec::as_slice)
    }

    /// Whether the excitation-energy interpolant has been built
    pub fn has_energy_sampler(&self) -> bool {
        self.energy_sampler.get().is_some()
    }

    /// Drop the cached interpolant and spin-parity table so the next decay
    /// rebuilds them.
    pub fn invalidate_caches(&mut self) {
        self.energy_sampler.take();
        self.spin_parity_table.take();
    }

    /// Sample a final excitation energy (phase 1 only). One draw.
    pub fn sample_excitation<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        let density = &self.density;
        sample_excitation(&self.energy_sampler, self.range, &self.config, |ex| density(ex), rng)
    }

    /// Partial widths for gamma transitions from the state `initial` to
    /// levels at `ex_final`.
    ///
    /// For each reachable final spin the lowest allowed multipolarity λ is
    /// used; the final parity matching electric λ radiation gets T_Eλ and the
    /// opposite parity gets T_Mλ. 0 → 0 transitions are excluded.
    pub fn build_spin_parity_table(&self, initial: &NuclearState, ex_final: f64) -> Vec<SpinParityWidth> {
        let l_max = self.config.max_gamma_multipolarity;
        let e_gamma = initial.ex - ex_final;
        let transmission: Vec<(f64, f64)> = (0..=l_max)
            .map(|l| {
                (
                    self.strength.transmission_coefficient(TransitionType::Electric, l, e_gamma),
                    self.strength.transmission_coefficient(TransitionType::Magnetic, l, e_gamma),
                )
            })
            .collect();

        let mut table = Vec::new();
        for two_jf in coupled_spins(initial.two_j, 2 * l_max) {
            if initial.two_j == 0 && two_jf == 0 {
                continue;
            }
            let multipolarity = (initial.two_j.abs_diff(two_jf) / 2).max(1);
            // only missing when max_gamma_multipolarity was set to 0 without validation
            let Some(&(t_electric, t_magnetic)) = transmission.get(multipolarity as usize) else {
                continue;
            };
            let electric_parity = initial.parity * Parity::from_orbital(multipolarity);

            for (parity, t) in [(electric_parity, t_electric), (-electric_parity, t_magnetic)] {
                let width = t * self.level_density.level_density(ex_final, two_jf, parity);
                if width > 0.0 {
                    table.push(SpinParityWidth {
                        two_j: two_jf,
                        parity,
                        width,
                    });
                }
            }
        }
        table
    }

    /// Sample one gamma emission into the continuum.
    ///
    /// Draws: one for the excitation energy, one for the spin-parity (unless
    /// `mode` skips it), two for the emission direction.
    pub fn decay<R: Rng + ?Sized>(
        &self,
        state: &mut NuclearState,
        rng: &mut R,
        mode: SamplingMode,
    ) -> Result<(Particle, Particle)> {
        let ex_final = self.sample_excitation(rng)?;

        let (two_j, parity) = match mode {
            SamplingMode::Full => {
                let table = self.spin_parity_table.get_or_init(|| {
                    let table = self.build_spin_parity_table(state, ex_final);
                    log::debug!(
                        "built gamma spin-parity table with {} entries at Ex = {} MeV",
                        table.len(),
                        ex_final
                    );
                    table
                });
                sample_spin_parity(table, ex_final, state, rng)?
            }
            SamplingMode::SkipSpinParity => (state.two_j, state.parity),
        };

        let photon = Particle::new(PHOTON, 0.0, 0);
        finish_decay(state, photon, &self.gs_residue, ex_final, two_j, parity, rng)
    }
}

impl fmt::Debug for ContinuumGammaChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuumGammaChannel")
            .field("width", &self.width)
            .field("range", &self.range)
            .field("gs_residue", &self.gs_residue)
            .field("energy_sampler_built", &self.has_energy_sampler())
            .field("spin_parity_table", &self.spin_parity_table.get())
            .finish_non_exhaustive()
    }
}

/// Fragment emission into the unbound continuum of the residual nucleus.
#[derive(Clone)]
pub struct ContinuumFragmentChannel {
    width: f64,
    range: ExcitationRange,
    gs_residue: Particle,
    fragment: Arc<Fragment>,
    density: FragmentDensity,
    level_density: Arc<dyn LevelDensityModel>,
    transmission: Arc<dyn FragmentTransmissionModel>,
    config: Config,
    energy_sampler: OnceCell<EnergySampler>,
    spin_parity_table: OnceCell<Vec<SpinParityWidth>>,
}

impl ContinuumFragmentChannel {
    /// # Arguments
    /// * `width` - Partial width (MeV)
    /// * `e_min`, `e_max` - Accessible final excitation energies (MeV)
    /// * `density` - Final excitation-energy density; also returns the
    ///   fragment kinetic energy at that excitation energy
    /// * `fragment` - Emitted fragment
    /// * `gs_residue` - Residual nucleus in its ground state
    /// * `level_density`, `transmission` - Models used for the spin-parity table
    #[allow(clippy::too_many_arguments)]
    pub fn new<F>(
        width: f64,
        e_min: f64,
        e_max: f64,
        density: F,
        fragment: Arc<Fragment>,
        gs_residue: Particle,
        level_density: Arc<dyn LevelDensityModel>,
        transmission: Arc<dyn FragmentTransmissionModel>,
    ) -> Result<Self>
    where
        F: Fn(f64) -> (f64, f64) + Send + Sync + 'static,
    {
        Ok(Self {
            width: check_width(width)?,
            range: ExcitationRange::new(e_min, e_max)?,
            gs_residue,
            fragment,
            density: Arc::new(density),
            level_density,
            transmission,
            config: Config::snapshot(),
            energy_sampler: OnceCell::new(),
            spin_parity_table: OnceCell::new(),
        })
    }

    /// Use `config` instead of the global settings. Fails if `config` does
    /// not pass [`Config::validate`].
    pub fn with_config(mut self, config: Config) -> Result<Self> {
        config.validate()?;
        self.config = config;
        self.invalidate_caches();
        Ok(self)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn range(&self) -> ExcitationRange {
        self.range
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn gs_residue(&self) -> &Particle {
        &self.gs_residue
    }

    pub fn spin_parity_table(&self) -> Option<&[SpinParityWidth]> {
        self.spin_parity_table.get().map(Vec::as_slice)
    }

    pub fn has_energy_sampler(&self) -> bool {
        self.energy_sampler.get().is_some()
    }

    pub fn invalidate_caches(&mut self) {
        self.energy_sampler.take();
        self.spin_parity_table.take();
    }

    /// Sample a final excitation energy (phase 1 only). One draw.
    pub fn sample_excitation<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        let density = &self.density;
        sample_excitation(&self.energy_sampler, self.range, &self.config, |ex| density(ex).0, rng)
    }

    /// Fragment kinetic energy at final excitation `ex_final`, as reported by
    /// the density function
    pub fn fragment_kinetic_energy(&self, ex_final: f64) -> f64 {
        (self.density)(ex_final).1
    }

    /// Partial widths for emitting the fragment with kinetic energy
    /// `kinetic_energy` from `initial` to levels at `ex_final`.
    ///
    /// Orbital l runs over 0..=l_max and the fragment's total j over
    /// |l − s|..=l + s; every final spin coupling J_i to j is weighted by
    /// T_lj times the level density at parity Pi · Pa · (−1)^l.
    pub fn build_spin_parity_table(
        &self,
        initial: &NuclearState,
        ex_final: f64,
        kinetic_energy: f64,
    ) -> Vec<SpinParityWidth> {
        let two_s = self.fragment.two_s;
        let mut table = Vec::new();

        for l in 0..=self.config.fragment_l_max {
            let parity = initial.parity * self.fragment.parity * Parity::from_orbital(l);
            let two_l = 2 * l;
            for two_j in (two_l.abs_diff(two_s)..=two_l + two_s).step_by(2) {
                let t = self
                    .transmission
                    .transmission_coefficient(kinetic_energy, &self.fragment, two_j, l);
                if t <= 0.0 {
                    continue;
                }
                for two_jf in (initial.two_j.abs_diff(two_j)..=initial.two_j + two_j).step_by(2) {
                    let width = t * self.level_density.level_density(ex_final, two_jf, parity);
                    if width > 0.0 {
                        table.push(SpinParityWidth {
                            two_j: two_jf,
                            parity,
                            width,
                        });
                    }
                }
            }
        }
        table
    }

    /// Sample one fragment emission into the continuum.
    ///
    /// Draws: one for the excitation energy, one for the spin-parity (unless
    /// `mode` skips it), two for the emission direction.
    pub fn decay<R: Rng + ?Sized>(
        &self,
        state: &mut NuclearState,
        rng: &mut R,
        mode: SamplingMode,
    ) -> Result<(Particle, Particle)> {
        let ex_final = self.sample_excitation(rng)?;

        let (two_j, parity) = match mode {
            SamplingMode::Full => {
                let table = self.spin_parity_table.get_or_init(|| {
                    let kinetic_energy = self.fragment_kinetic_energy(ex_final);
                    let table = self.build_spin_parity_table(state, ex_final, kinetic_energy);
                    log::debug!(
                        "built fragment {} spin-parity table with {} entries at Ex = {} MeV",
                        self.fragment.pdg,
                        table.len(),
                        ex_final
                    );
                    table
                });
                sample_spin_parity(table, ex_final, state, rng)?
            }
            SamplingMode::SkipSpinParity => (state.two_j, state.parity),
        };

        let emitted = Particle::new(self.fragment.pdg, self.fragment.mass, self.fragment.charge);
        finish_decay(state, emitted, &self.gs_residue, ex_final, two_j, parity, rng)
    }
}

impl fmt::Debug for ContinuumFragmentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuumFragmentChannel")
            .field("width", &self.width)
            .field("range", &self.range)
            .field("fragment", &self.fragment)
            .field("gs_residue", &self.gs_residue)
            .field("energy_sampler_built", &self.has_energy_sampler())
            .field("spin_parity_table", &self.spin_parity_table.get())
            .finish_non_exhaustive()
    }
}
