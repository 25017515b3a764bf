// Exit-channel sampling for the statistical de-excitation of excited nuclei
pub mod data;
pub mod config;
pub mod error;
pub mod nuclear_data;
pub mod particle;
pub mod generator;
pub mod weighted;
pub mod interpolation;
pub mod level_density;
pub mod gamma_strength;
pub mod penetrability;
pub mod kinematics;
pub mod continuum;
pub mod exit_channel;
pub mod event;
pub mod decay_scheme;
pub mod cascade;

pub use cascade::{Cascade, ChannelBuilder};
pub use config::Config;
pub use continuum::{ContinuumFragmentChannel, ContinuumGammaChannel, ExcitationRange};
pub use decay_scheme::{DecayScheme, GammaBranch};
pub use error::{DecayError, Result};
pub use event::Event;
pub use exit_channel::{
    DiscreteFragmentChannel, DiscreteGammaChannel, ExitChannel, SamplingMode, SpinParityWidth,
};
pub use gamma_strength::{GammaStrengthModel, StandardLorentzian, TransitionType};
pub use generator::Generator;
pub use interpolation::ChebyshevInterpolant;
pub use level_density::{BackshiftedFermiGas, ConstantLevelDensity, LevelDensityModel};
pub use nuclear_data::{Fragment, Level, NuclearState, Parity, PHOTON};
pub use particle::Particle;
pub use penetrability::{FragmentTransmissionModel, HillWheelerBarrier};
pub use weighted::Weighted;
