// src/data.rs
// Static tables of particle codes and masses used when building channels.
// Masses are rest masses in MeV; nuclear masses exclude electrons.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::nuclear_data::{Fragment, Parity};

pub const NEUTRON: i32 = 2112;
pub const PROTON: i32 = 2212;
pub const DEUTERON: i32 = 1000010020;
pub const TRITON: i32 = 1000010030;
pub const HELION: i32 = 1000020030;
pub const ALPHA: i32 = 1000020040;

/// Atomic mass unit (MeV)
pub const MEV_PER_AMU: f64 = 931.49410242;

/// Light fragments that the statistical model lets a nucleus emit, keyed by
/// PDG code. Order of emission thresholds is irrelevant here; the table only
/// stores the intrinsic properties.
pub static FRAGMENTS: Lazy<HashMap<i32, Fragment>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(NEUTRON, Fragment::new(NEUTRON, 939.56542052, 1, Parity::Positive, 0, 1));
    m.insert(PROTON, Fragment::new(PROTON, 938.27208816, 1, Parity::Positive, 1, 1));
    m.insert(DEUTERON, Fragment::new(DEUTERON, 1875.61294257, 2, Parity::Positive, 1, 2));
    m.insert(TRITON, Fragment::new(TRITON, 2808.92113298, 1, Parity::Positive, 1, 3));
    m.insert(HELION, Fragment::new(HELION, 2808.39160743, 1, Parity::Positive, 2, 3));
    m.insert(ALPHA, Fragment::new(ALPHA, 3727.3794066, 0, Parity::Positive, 2, 4));
    m
});

/// Look up one of the standard light fragments by PDG code.
pub fn fragment(pdg: i32) -> Option<Fragment> {
    FRAGMENTS.get(&pdg).cloned()
}

/// PDG code of a nucleus (10LZZZAAAI convention, ground state, no strangeness)
pub fn nucleus_pdg(z: u32, a: u32) -> i32 {
    1_000_000_000 + (z as i32) * 10_000 + (a as i32) * 10
}

/// Split a nuclear PDG code into (Z, A). Returns `None` for non-nuclear codes,
/// except the proton and neutron which map to (1, 1) and (0, 1).
pub fn nucleus_z_a(pdg: i32) -> Option<(u32, u32)> {
    match pdg {
        PROTON => Some((1, 1)),
        NEUTRON => Some((0, 1)),
        p if p >= 1_000_000_000 => {
            let z = (p / 10_000) % 1000;
            let a = (p / 10) % 1000;
            Some((z as u32, a as u32))
        }
        _ => None,
    }
}
