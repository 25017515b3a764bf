mod common;

use std::sync::Arc;

use hf_decay::data::{fragment, nucleus_pdg, NEUTRON};
use hf_decay::{
    BackshiftedFermiGas, ConstantLevelDensity, ContinuumFragmentChannel, ContinuumGammaChannel, DecayError,
    DiscreteFragmentChannel, DiscreteGammaChannel, ExitChannel, Generator, HillWheelerBarrier, Level, NuclearState,
    Parity, Particle, SamplingMode, StandardLorentzian, Weighted, PHOTON,
};

const K39_GS: f64 = 36_284.0;
// 40K ground state, 7.8 MeV below 39K + n
const K40_GS: f64 = K39_GS + 939.565 - 7.8;

fn k40_state(ex: f64) -> NuclearState {
    NuclearState::new(nucleus_pdg(19, 40), K40_GS, ex, 8, Parity::Negative)
}

fn k40_residue() -> Particle {
    Particle::new(nucleus_pdg(19, 40), K40_GS, 19)
}

fn continuum_gamma(width: f64, density: impl Fn(f64) -> f64 + Send + Sync + 'static) -> hf_decay::Result<ContinuumGammaChannel> {
    ContinuumGammaChannel::new(
        width,
        0.0,
        5.0,
        density,
        k40_residue(),
        Arc::new(BackshiftedFermiGas::new(19, 40)),
        Arc::new(StandardLorentzian::new(19, 40)),
    )
}

fn continuum_neutron(width: f64) -> hf_decay::Result<ContinuumFragmentChannel> {
    // 7.2 MeV above the 39K + n threshold when the parent sits at 15 MeV
    ContinuumFragmentChannel::new(
        width,
        0.0,
        5.0,
        |ex| (1.0 + ex, 7.2 - ex),
        Arc::new(fragment(NEUTRON).unwrap()),
        Particle::new(nucleus_pdg(19, 39), K39_GS, 19),
        Arc::new(BackshiftedFermiGas::new(19, 39)),
        Arc::new(HillWheelerBarrier::new(19, 39)),
    )
}

#[test]
fn test_width_is_returned_unchanged() {
    common::init_logging();
    let level = Arc::new(Level::new(1.0, 4, Parity::Positive));
    let neutron = Arc::new(fragment(NEUTRON).unwrap());
    let k39 = Particle::new(nucleus_pdg(19, 39), K39_GS, 19);

    let channels: Vec<ExitChannel> = vec![
        DiscreteFragmentChannel::new(0.125, level.clone(), k39, neutron).unwrap().into(),
        DiscreteGammaChannel::new(3.5e-4, level, k40_residue()).unwrap().into(),
        continuum_neutron(2.75).unwrap().into(),
        continuum_gamma(0.0, |_| 1.0).unwrap().into(),
    ];
    let widths: Vec<f64> = channels.iter().map(Weighted::weight).collect();
    assert_eq!(widths, vec![0.125, 3.5e-4, 2.75, 0.0]);
    assert_eq!(channels[2].width(), 2.75);
}

#[test]
fn test_negative_width_rejected_for_every_variant() {
    common::init_logging();
    let level = Arc::new(Level::new(1.0, 4, Parity::Positive));
    let neutron = Arc::new(fragment(NEUTRON).unwrap());
    let k39 = Particle::new(nucleus_pdg(19, 39), K39_GS, 19);

    assert!(matches!(
        DiscreteFragmentChannel::new(-1.0, level.clone(), k39, neutron),
        Err(DecayError::InvalidWidth { .. })
    ));
    assert!(matches!(
        DiscreteGammaChannel::new(-1.0, level, k40_residue()),
        Err(DecayError::InvalidWidth { .. })
    ));
    assert!(matches!(continuum_neutron(-1.0), Err(DecayError::InvalidWidth { .. })));
    assert!(matches!(continuum_gamma(-1.0, |_| 1.0), Err(DecayError::InvalidWidth { .. })));
    assert!(matches!(continuum_gamma(f64::NAN, |_| 1.0), Err(DecayError::InvalidWidth { .. })));
}

#[test]
fn test_discrete_gamma_always_reaches_its_level() {
    common::init_logging();
    let level = Arc::new(Level::new(1.0, 4, Parity::Positive));
    let channel: ExitChannel = DiscreteGammaChannel::new(1.0, level, k40_residue()).unwrap().into();
    assert_eq!(channel.emitted_particle_pdg(), PHOTON);
    assert!(!channel.emits_fragment());

    let mut rng = Generator::new(42);
    for _ in 0..100 {
        let mut state = k40_state(6.0);
        let (gamma, _) = channel.decay(&mut state, &mut rng, SamplingMode::Full).unwrap();
        assert_eq!(gamma.pdg, PHOTON);
        assert_eq!((state.ex, state.two_j, state.parity), (1.0, 4, Parity::Positive));
    }
}

#[test]
fn test_continuum_samples_in_range_and_reproducible() {
    common::init_logging();
    let run = |seed: u64| -> Vec<f64> {
        let channel = continuum_gamma(1.0, |ex| 1.0 + ex * ex).unwrap();
        let mut rng = Generator::new(seed);
        (0..500)
            .map(|_| {
                let mut state = k40_state(8.0);
                channel.decay(&mut state, &mut rng, SamplingMode::Full).unwrap();
                state.ex
            })
            .collect()
    };

    let first = run(42);
    assert!(first.iter().all(|&ex| (0.0..=5.0).contains(&ex)));
    assert_eq!(first, run(42));
    assert_ne!(first, run(43));
}

#[test]
fn test_uniform_density_passes_chi_square() {
    common::init_logging();
    let channel = continuum_gamma(1.0, |_| 1.0).unwrap();
    let mut rng = Generator::new(42);
    let n_samples = 100_000;
    let n_bins = 50;
    let mut counts = vec![0usize; n_bins];
    for _ in 0..n_samples {
        let ex = channel.sample_excitation(&mut rng).unwrap();
        let bin = ((ex / 5.0) * n_bins as f64).floor() as usize;
        counts[bin.min(n_bins - 1)] += 1;
    }

    let expected = n_samples as f64 / n_bins as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| (c as f64 - expected).powi(2) / expected)
        .sum();
    // 49 degrees of freedom: the 0.1% critical value is about 85
    assert!(chi2 < 85.0, "chi-square {} too large", chi2);
}

#[test]
fn test_skip_spin_parity_keeps_spin() {
    common::init_logging();
    let channel = continuum_gamma(1.0, |_| 1.0).unwrap();
    let mut rng = Generator::new(42);
    for _ in 0..50 {
        let mut state = k40_state(9.0);
        channel
            .decay(&mut state, &mut rng, SamplingMode::SkipSpinParity)
            .unwrap();
        assert_eq!((state.two_j, state.parity), (8, Parity::Negative));
        assert!(state.ex <= 5.0);
    }
    assert!(channel.spin_parity_table().is_none());
}

#[test]
fn test_zero_level_density_has_no_accessible_channel() {
    common::init_logging();
    let channel = ContinuumGammaChannel::new(
        1.0,
        0.0,
        5.0,
        |_| 1.0,
        k40_residue(),
        Arc::new(ConstantLevelDensity(0.0)),
        Arc::new(StandardLorentzian::new(19, 40)),
    )
    .unwrap();
    let mut state = k40_state(9.0);
    let before = state.clone();
    let mut rng = Generator::new(42);
    let err = channel.decay(&mut state, &mut rng, SamplingMode::Full);
    assert!(matches!(err, Err(DecayError::NoAccessibleChannel { two_j: 8, .. })));
    assert_eq!(state, before);
}

#[test]
fn test_continuum_neutron_emission() {
    common::init_logging();
    let channel: ExitChannel = continuum_neutron(1.0).unwrap().into();
    assert!(channel.is_continuum() && channel.emits_fragment());
    assert_eq!(channel.emitted_particle_pdg(), NEUTRON);

    let mut rng = Generator::new(42);
    for _ in 0..200 {
        let mut state = k40_state(15.0);
        let parent_mass = state.mass();
        let (n, residue) = channel.decay(&mut state, &mut rng, SamplingMode::Full).unwrap();
        assert_eq!(n.pdg, NEUTRON);
        assert_eq!(state.pdg, nucleus_pdg(19, 39));
        assert_eq!(state.gs_mass, K39_GS);
        assert!((0.0..=5.0).contains(&state.ex));
        // two_j = 8 coupled to j <= 11/2 leaves an odd 2J for 39K
        assert_eq!(state.two_j % 2, 1);
        assert!((n.momentum + residue.momentum).norm() < 1e-8);
        assert!((n.total_energy + residue.total_energy - parent_mass).abs() < 1e-6);
        assert!((residue.mass - (K39_GS + state.ex)).abs() < 1e-9);
    }
}

#[test]
fn test_selection_follows_widths() {
    common::init_logging();
    let level = Arc::new(Level::new(0.0, 8, Parity::Negative));
    let channels: Vec<ExitChannel> = [1.0, 2.0, 3.0]
        .iter()
        .map(|&w| DiscreteGammaChannel::new(w, level.clone(), k40_residue()).unwrap().into())
        .collect();

    let mut rng = Generator::new(42);
    let n = 60_000;
    let mut counts = [0usize; 3];
    for _ in 0..n {
        let chosen = hf_decay::weighted::select(&channels, &mut rng).unwrap();
        let index = channels.iter().position(|c| std::ptr::eq(c, chosen)).unwrap();
        counts[index] += 1;
    }
    for (i, &c) in counts.iter().enumerate() {
        let expected = (i + 1) as f64 / 6.0;
        let observed = c as f64 / n as f64;
        assert!((observed - expected).abs() < 0.01, "channel {}: {} vs {}", i, observed, expected);
    }
}

#[test]
fn test_closed_fragment_channel_has_no_accessible_channel() {
    common::init_logging();
    // below the barrier everywhere: no kinetic energy left for the neutron
    let channel = ContinuumFragmentChannel::new(
        1.0,
        0.0,
        5.0,
        |_| (1.0, 0.0),
        Arc::new(fragment(NEUTRON).unwrap()),
        Particle::new(nucleus_pdg(19, 39), K39_GS, 19),
        Arc::new(BackshiftedFermiGas::new(19, 39)),
        Arc::new(HillWheelerBarrier::new(19, 39)),
    )
    .unwrap();
    let mut state = k40_state(15.0);
    let before = state.clone();
    let mut rng = Generator::new(42);
    let err = channel.decay(&mut state, &mut rng, SamplingMode::Full);
    assert!(matches!(err, Err(DecayError::NoAccessibleChannel { two_j: 8, parity: Parity::Negative, .. })));
    assert_eq!(state, before);
    assert_eq!(channel.spin_parity_table(), Some(&[][..]));
}

#[test]
fn test_skip_spin_parity_on_fragment_channel() {
    common::init_logging();
    let channel = continuum_neutron(1.0).unwrap();
    let mut rng = Generator::new(42);
    let mut changed_energy = false;
    for _ in 0..50 {
        let mut state = k40_state(15.0);
        channel
            .decay(&mut state, &mut rng, SamplingMode::SkipSpinParity)
            .unwrap();
        assert_eq!((state.two_j, state.parity), (8, Parity::Negative));
        assert_eq!(state.pdg, nucleus_pdg(19, 39));
        assert!((0.0..=5.0).contains(&state.ex));
        changed_energy |= state.ex != 15.0;
    }
    assert!(changed_energy);
    assert!(channel.spin_parity_table().is_none());
}
