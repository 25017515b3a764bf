// Nuclear-structure value records: parity, discrete levels and emitted fragments
//
// These are owned by whatever structure database builds the channels. Channels
// only hold `Arc` handles, so a record always outlives every channel that
// refers to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Mul, Neg};

/// PDG code used for emitted gamma rays.
pub const PHOTON: i32 = 22;

/// Intrinsic or nuclear parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    #[serde(rename = "+")]
    Positive,
    #[serde(rename = "-")]
    Negative,
}

impl Parity {
    /// Parity of an orbital angular momentum `l`, i.e. (-1)^l
    pub fn from_orbital(l: u32) -> Self {
        if l % 2 == 0 {
            Parity::Positive
        } else {
            Parity::Negative
        }
    }

    /// Build from the conventional +1 / -1 integer form.
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Parity::Positive),
            -1 => Some(Parity::Negative),
            _ => None,
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Parity::Positive => 1,
            Parity::Negative => -1,
        }
    }
}

impl Mul for Parity {
    type Output = Parity;

    fn mul(self, rhs: Parity) -> Parity {
        if self == rhs {
            Parity::Positive
        } else {
            Parity::Negative
        }
    }
}

impl Neg for Parity {
    type Output = Parity;

    fn neg(self) -> Parity {
        self * Parity::Negative
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Positive => write!(f, "+"),
            Parity::Negative => write!(f, "-"),
        }
    }
}

/// A discrete nuclear level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Excitation energy above the ground state (MeV)
    pub energy: f64,
    /// Two times the level spin
    pub two_j: u32,
    pub parity: Parity,
}

impl Level {
    pub fn new(energy: f64, two_j: u32, parity: Parity) -> Self {
        Self {
            energy,
            two_j,
            parity,
        }
    }

    /// Spin-parity label in the usual notation, e.g. `2+` or `3/2-`
    pub fn spin_parity_label(&self) -> String {
        if self.two_j % 2 == 0 {
            format!("{}{}", self.two_j / 2, self.parity)
        } else {
            format!("{}/2{}", self.two_j, self.parity)
        }
    }
}

/// A light nuclear fragment that can be emitted in a decay (n, p, d, t, h, a).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// PDG particle code
    pub pdg: i32,
    /// Rest mass (MeV)
    pub mass: f64,
    /// Two times the intrinsic spin
    pub two_s: u32,
    pub parity: Parity,
    /// Electric charge in units of e
    pub charge: i32,
    /// Mass number
    pub mass_number: u32,
}

impl Fragment {
    pub fn new(pdg: i32, mass: f64, two_s: u32, parity: Parity, charge: i32, mass_number: u32) -> Self {
        Self {
            pdg,
            mass,
            two_s,
            parity,
            charge,
            mass_number,
        }
    }
}

/// State of the decaying nucleus, read on entry to a decay step and
/// overwritten with the residual state on return.
#[derive(Debug, Clone, PartialEq)]
pub struct NuclearState {
    /// PDG code of the nucleus
    pub pdg: i32,
    /// Ground-state rest mass (MeV)
    pub gs_mass: f64,
    /// Excitation energy (MeV)
    pub ex: f64,
    /// Two times the nuclear spin
    pub two_j: u32,
    pub parity: Parity,
}

impl NuclearState {
    pub fn new(pdg: i32, gs_mass: f64, ex: f64, two_j: u32, parity: Parity) -> Self {
        Self {
            pdg,
            gs_mass,
            ex,
            two_j,
            parity,
        }
    }

    /// Invariant mass of the excited nucleus
    pub fn mass(&self) -> f64 {
        self.gs_mass + self.ex
    }
}
