// Discrete level schemes with tabulated gamma-ray branches
//
// Low-lying levels of a residual nucleus decay by gamma emission with
// measured relative intensities. A `DecayScheme` turns those intensities into
// discrete gamma exit channels for the cascade driver.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::cascade::ChannelBuilder;
use crate::error::{check_width, DecayError, Result};
use crate::exit_channel::{DiscreteGammaChannel, ExitChannel};
use crate::nuclear_data::{Level, NuclearState};
use crate::particle::Particle;

/// Largest difference between a state's excitation energy and a tabulated
/// level energy that still counts as sitting on that level (MeV)
pub const LEVEL_MATCH_TOLERANCE: f64 = 1e-6;

/// A gamma transition from one level to a lower one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaBranch {
    /// Index of the final level in the scheme
    pub end_level: usize,
    /// Relative intensity, used directly as the channel width
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SchemeLevel {
    #[serde(flatten)]
    level: Level,
    #[serde(default)]
    gammas: Vec<GammaBranch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemeFile {
    pdg: i32,
    charge: i32,
    gs_mass: f64,
    levels: Vec<SchemeLevel>,
}

/// Discrete levels of one nucleus, sorted by energy, with their gamma branches
#[derive(Debug, Clone)]
pub struct DecayScheme {
    pdg: i32,
    charge: i32,
    gs_mass: f64,
    levels: Vec<Arc<Level>>,
    branches: Vec<Vec<GammaBranch>>,
}

impl DecayScheme {
    /// Build a scheme for the nucleus `pdg` with ground-state mass `gs_mass`
    /// (MeV). The first level must be the ground state.
    pub fn new(pdg: i32, charge: i32, gs_mass: f64, levels: Vec<(Level, Vec<GammaBranch>)>) -> Result<Self> {
        let (levels, branches): (Vec<_>, Vec<_>) = levels
            .into_iter()
            .map(|(level, gammas)| (Arc::new(level), gammas))
            .unzip();
        let scheme = Self {
            pdg,
            charge,
            gs_mass,
            levels,
            branches,
        };
        scheme.validate()?;
        Ok(scheme)
    }

    /// Parse a scheme from JSON of the form
    /// `{"pdg": .., "charge": .., "gs_mass": .., "levels": [{"energy": .., "two_j": .., "parity": "+", "gammas": [..]}]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: SchemeFile = serde_json::from_str(json).map_err(|e| DecayError::Config(e.to_string()))?;
        let levels = file.levels.into_iter().map(|l| (l.level, l.gammas)).collect();
        Self::new(file.pdg, file.charge, file.gs_mass, levels)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DecayError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        match self.levels.first() {
            Some(gs) if gs.energy == 0.0 => {}
            _ => {
                return Err(DecayError::Config(
                    "decay scheme must start with the ground state".to_string(),
                ))
            }
        }
        for (i, pair) in self.levels.windows(2).enumerate() {
            if !(pair[1].energy > pair[0].energy) {
                return Err(DecayError::Config(format!(
                    "level {} at {} MeV is not above level {} at {} MeV",
                    i + 1,
                    pair[1].energy,
                    i,
                    pair[0].energy
                )));
            }
        }
        for (i, gammas) in self.branches.iter().enumerate() {
            for gamma in gammas {
                if gamma.end_level >= i {
                    return Err(DecayError::Config(format!(
                        "gamma from level {} ends on level {}, which is not below it",
                        i, gamma.end_level
                    )));
                }
                check_width(gamma.intensity)?;
            }
        }
        Ok(())
    }

    pub fn pdg(&self) -> i32 {
        self.pdg
    }

    pub fn gs_mass(&self) -> f64 {
        self.gs_mass
    }

    pub fn levels(&self) -> &[Arc<Level>] {
        &self.levels
    }

    /// Index of the level at excitation energy `ex`, if any
    pub fn find_level(&self, ex: f64) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| (level.energy - ex).abs() <= LEVEL_MATCH_TOLERANCE)
    }

    /// Index of the highest level at or below `ex`
    pub fn level_below(&self, ex: f64) -> Option<usize> {
        self.levels
            .iter()
            .rposition(|level| level.energy <= ex + LEVEL_MATCH_TOLERANCE)
    }

    /// Ground-state residue at rest
    pub fn gs_residue(&self) -> Particle {
        Particle::new(self.pdg, self.gs_mass, self.charge)
    }

    /// Discrete gamma channels out of level `index`
    pub fn gamma_channels(&self, index: usize) -> Result<Vec<ExitChannel>> {
        let Some(gammas) = self.branches.get(index) else {
            return Ok(Vec::new());
        };
        gammas
            .iter()
            .map(|gamma| {
                let level = Arc::clone(&self.levels[gamma.end_level]);
                DiscreteGammaChannel::new(gamma.intensity, level, self.gs_residue()).map(ExitChannel::from)
            })
            .collect()
    }
}

impl ChannelBuilder for DecayScheme {
    /// Gamma channels of the tabulated level the state sits on. States of
    /// other nuclei, off-level states and levels without branches are
    /// terminal.
    fn channels(&self, state: &NuclearState) -> Result<Vec<ExitChannel>> {
        if state.pdg != self.pdg {
            return Ok(Vec::new());
        }
        match self.find_level(state.ex) {
            Some(index) => self.gamma_channels(index),
            None => {
                log::warn!(
                    "no level of nucleus {} at Ex = {} MeV; treating it as terminal",
                    self.pdg,
                    state.ex
                );
                Ok(Vec::new())
            }
        }
    }
}
