// De-excitation cascade driver: select a channel by width, decay, repeat

use rand::Rng;

use crate::config::Config;
use crate::error::{DecayError, Result};
use crate::event::Event;
use crate::exit_channel::{ExitChannel, SamplingMode};
use crate::nuclear_data::NuclearState;
use crate::weighted;

/// Supplies the competing exit channels of a nuclear state.
///
/// An empty list (or one with zero total width) marks the state as terminal.
pub trait ChannelBuilder {
    fn channels(&self, state: &NuclearState) -> Result<Vec<ExitChannel>>;
}

impl<F> ChannelBuilder for F
where
    F: Fn(&NuclearState) -> Result<Vec<ExitChannel>>,
{
    fn channels(&self, state: &NuclearState) -> Result<Vec<ExitChannel>> {
        self(state)
    }
}

/// Runs the decay of an excited residue until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct Cascade {
    pub max_steps: usize,
    pub mode: SamplingMode,
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    /// Step limit taken from the global configuration
    pub fn new() -> Self {
        Self::from_config(&Config::snapshot())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_steps: config.max_cascade_steps,
            mode: SamplingMode::Full,
        }
    }

    pub fn with_mode(mut self, mode: SamplingMode) -> Self {
        self.mode = mode;
        self
    }

    /// De-excite `state`, appending each emitted particle to `event` and
    /// replacing the event residue after every step.
    ///
    /// Returns the number of decay steps taken. Any channel failure aborts
    /// the cascade; `state` then holds the last successfully reached state.
    pub fn run<B, R>(&self, event: &mut Event, state: &mut NuclearState, builder: &B, rng: &mut R) -> Result<usize>
    where
        B: ChannelBuilder + ?Sized,
        R: Rng + ?Sized,
    {
        let mut steps = 0;
        loop {
            let channels = builder.channels(state)?;
            let chosen = match weighted::select(&channels, rng) {
                Some(channel) => channel,
                None => {
                    log::debug!(
                        "cascade stopped after {} steps at Ex = {} MeV, 2J = {}, parity {}",
                        steps,
                        state.ex,
                        state.two_j,
                        state.parity
                    );
                    return Ok(steps);
                }
            };

            if steps >= self.max_steps {
                return Err(DecayError::CascadeLimitExceeded { steps });
            }

            let (emitted, residue) = chosen.decay(state, rng, self.mode)?;
            steps += 1;
            log::debug!(
                "step {}: emitted {} with KE = {} MeV, residue at Ex = {} MeV",
                steps,
                emitted.pdg,
                emitted.kinetic_energy(),
                state.ex
            );
            event.add_final_particle(emitted);
            event.set_residue(residue);
        }
    }
}
