// Event record: the initial two-body reaction plus every particle emitted
// while the residue de-excites

use std::fmt;
use std::io::{self, Write};

use crate::particle::Particle;

/// A 2 → 2 reaction event. The first two final particles are always the
/// ejectile and the residue; de-excitation products are appended after them.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    projectile: Particle,
    target: Particle,
    final_particles: Vec<Particle>,
    /// Residue excitation energy right after the reaction (MeV)
    ex: f64,
}

impl Event {
    pub fn new(projectile: Particle, target: Particle, ejectile: Particle, residue: Particle, ex: f64) -> Self {
        Self {
            projectile,
            target,
            final_particles: vec![ejectile, residue],
            ex,
        }
    }

    pub fn projectile(&self) -> &Particle {
        &self.projectile
    }

    pub fn target(&self) -> &Particle {
        &self.target
    }

    pub fn ejectile(&self) -> &Particle {
        &self.final_particles[0]
    }

    pub fn residue(&self) -> &Particle {
        &self.final_particles[1]
    }

    /// Replace the residue, e.g. after a de-excitation step
    pub fn set_residue(&mut self, residue: Particle) {
        self.final_particles[1] = residue;
    }

    /// Initial residue excitation energy (MeV)
    pub fn ex(&self) -> f64 {
        self.ex
    }

    pub fn add_final_particle(&mut self, particle: Particle) {
        self.final_particles.push(particle);
    }

    pub fn final_particles(&self) -> &[Particle] {
        &self.final_particles
    }

    /// Particles emitted during de-excitation, after the ejectile and residue
    pub fn emitted_particles(&self) -> &[Particle] {
        &self.final_particles[2..]
    }

    /// Write the event as a HEPEvt record. Energies and momenta are in GeV;
    /// the projectile is listed first with status 0, followed by every final
    /// particle with status 1. All vertices are at the origin.
    pub fn write_hepevt<W: Write>(&self, event_num: usize, out: &mut W) -> io::Result<()> {
        writeln!(out, "{} {}", event_num, self.final_particles.len() + 1)?;
        write_hepevt_particle(&self.projectile, false, out)?;
        for particle in &self.final_particles {
            write_hepevt_particle(particle, true, out)?;
        }
        Ok(())
    }
}

fn write_hepevt_particle<W: Write>(p: &Particle, track: bool, out: &mut W) -> io::Result<()> {
    // MeV -> GeV
    writeln!(
        out,
        "{} {} 0 0 0 0 {} {} {} {} {} 0. 0. 0. 0.",
        u8::from(track),
        p.pdg,
        scientific(p.px() / 1000.0),
        scientific(p.py() / 1000.0),
        scientific(p.pz() / 1000.0),
        scientific(p.total_energy / 1000.0),
        scientific(p.mass / 1000.0),
    )
}

/// 16-digit scientific notation with a signed two-digit exponent, e.g.
/// `1.2500000000000000e-03`
fn scientific(x: f64) -> String {
    let formatted = format!("{:.16e}", x);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in std::iter::once(&self.projectile).chain(&self.final_particles) {
            writeln!(
                f,
                "{} {} {} {} {} {}",
                p.pdg,
                p.total_energy,
                p.px(),
                p.py(),
                p.pz(),
                p.mass
            )?;
        }
        Ok(())
    }
}
