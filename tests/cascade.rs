mod common;

use std::sync::Arc;

use hf_decay::data::nucleus_pdg;
use hf_decay::{
    Cascade, ChannelBuilder, Config, DecayScheme, DiscreteGammaChannel, Event, ExitChannel, Generator, NuclearState,
    Parity, Particle, SamplingMode, PHOTON,
};

const K40_GS: f64 = 37_215.5;

const K40_SCHEME: &str = r#"{
    "pdg": 1000190400,
    "charge": 19,
    "gs_mass": 37215.5,
    "levels": [
        {"energy": 0.0, "two_j": 8, "parity": "-"},
        {"energy": 0.0299, "two_j": 6, "parity": "-",
         "gammas": [{"end_level": 0, "intensity": 1.0}]},
        {"energy": 0.8002, "two_j": 4, "parity": "-",
         "gammas": [{"end_level": 0, "intensity": 0.2}, {"end_level": 1, "intensity": 0.8}]},
        {"energy": 0.8913, "two_j": 10, "parity": "-",
         "gammas": [{"end_level": 0, "intensity": 1.0}]},
        {"energy": 1.6437, "two_j": 0, "parity": "+",
         "gammas": [{"end_level": 2, "intensity": 1.0}]}
    ]
}"#;

fn initial_event(ex: f64) -> Event {
    let mut nu = Particle::new(12, 0.0, 0);
    nu.set_momentum(nalgebra::Vector3::new(0.0, 0.0, 20.0));
    Event::new(
        nu,
        Particle::new(nucleus_pdg(18, 40), 37_211.0, 18),
        Particle::new(11, 0.511, -1),
        Particle::new(nucleus_pdg(19, 40), K40_GS + ex, 19),
        ex,
    )
}

/// Above the tabulated levels every level is fed directly; on a level the
/// tabulated gamma branches take over.
struct Feeder {
    scheme: DecayScheme,
}

impl ChannelBuilder for Feeder {
    fn channels(&self, state: &NuclearState) -> hf_decay::Result<Vec<ExitChannel>> {
        if self.scheme.find_level(state.ex).is_some() {
            return self.scheme.channels(state);
        }
        self.scheme
            .levels()
            .iter()
            .filter(|level| level.energy < state.ex)
            .map(|level| {
                DiscreteGammaChannel::new(1.0, Arc::clone(level), self.scheme.gs_residue()).map(ExitChannel::from)
            })
            .collect()
    }
}

#[test]
fn test_cascade_ends_in_ground_state() {
    common::init_logging();
    let feeder = Feeder {
        scheme: DecayScheme::from_json_str(K40_SCHEME).unwrap(),
    };
    let mut rng = Generator::new(42);

    for _ in 0..200 {
        let mut event = initial_event(3.0);
        let mut state = NuclearState::new(nucleus_pdg(19, 40), K40_GS, 3.0, 2, Parity::Positive);
        let steps = Cascade::new().run(&mut event, &mut state, &feeder, &mut rng).unwrap();

        assert!(steps >= 1 && steps <= 4, "{} steps", steps);
        assert_eq!(state.ex, 0.0);
        assert_eq!((state.two_j, state.parity), (8, Parity::Negative));
        assert_eq!(event.emitted_particles().len(), steps);
        assert!(event.emitted_particles().iter().all(|p| p.pdg == PHOTON));
        assert!((event.residue().mass - K40_GS).abs() < 1e-9);

        // photon energies add up to the initial excitation less the recoils
        let e_gamma: f64 = event.emitted_particles().iter().map(|p| p.total_energy).sum();
        assert!((e_gamma - 3.0).abs() < 1e-3, "sum of gamma energies {}", e_gamma);
    }
}

#[test]
fn test_per_event_streams_are_reproducible() {
    common::init_logging();
    let feeder = Feeder {
        scheme: DecayScheme::from_json_str(K40_SCHEME).unwrap(),
    };
    let run_event = |n: u64| {
        let mut rng = Generator::for_event(42, n);
        let mut event = initial_event(3.0);
        let mut state = NuclearState::new(nucleus_pdg(19, 40), K40_GS, 3.0, 2, Parity::Positive);
        Cascade::new().run(&mut event, &mut state, &feeder, &mut rng).unwrap();
        event
    };

    assert_eq!(run_event(3), run_event(3));
    let listings: Vec<String> = (0..20)
        .map(|n| {
            let mut buffer = Vec::new();
            run_event(n).write_hepevt(n as usize, &mut buffer).unwrap();
            String::from_utf8(buffer).unwrap()
        })
        .collect();
    assert!(listings.windows(2).any(|pair| pair[0].lines().skip(1).ne(pair[1].lines().skip(1))));
}

#[test]
fn test_hepevt_record_of_a_cascade() {
    common::init_logging();
    let feeder = Feeder {
        scheme: DecayScheme::from_json_str(K40_SCHEME).unwrap(),
    };
    let mut rng = Generator::new(7);
    let mut event = initial_event(0.8002);
    let mut state = NuclearState::new(nucleus_pdg(19, 40), K40_GS, 0.8002, 4, Parity::Negative);
    let steps = Cascade::new().run(&mut event, &mut state, &feeder, &mut rng).unwrap();

    let mut buffer = Vec::new();
    event.write_hepevt(0, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], format!("0 {}", steps + 3));
    assert_eq!(lines.len(), steps + 4);
    assert!(lines[3].starts_with(&format!("1 {} ", nucleus_pdg(19, 40))));
}

#[test]
fn test_cascade_limit_from_config() {
    common::init_logging();
    let feeder = Feeder {
        scheme: DecayScheme::from_json_str(K40_SCHEME).unwrap(),
    };
    let config = Config {
        max_cascade_steps: 1,
        ..Config::default()
    };
    // 1.6437 -> 0.8002 -> (0.0299 ->) 0 needs at least two steps
    let mut rng = Generator::new(1);
    let mut event = initial_event(1.6437);
    let mut state = NuclearState::new(nucleus_pdg(19, 40), K40_GS, 1.6437, 0, Parity::Positive);
    let result = Cascade::from_config(&config)
        .with_mode(SamplingMode::Full)
        .run(&mut event, &mut state, &feeder, &mut rng);
    assert_eq!(result, Err(hf_decay::DecayError::CascadeLimitExceeded { steps: 1 }));
    assert_eq!(state.ex, 0.8002);
}
