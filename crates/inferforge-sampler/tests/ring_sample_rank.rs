//! SampleRank on the four-variable boolean ring.
//!
//! After training from random full reassignments, the model must rank every
//! pair of the sixteen ring states the way the objective does.

use inferforge_sampler::{
    Acceptance, Mira, Perceptron, Policy, RandomBlockProposer, SampleRank, Sampler, Trainer,
    UpdateRule,
};
use inferforge_scoring::Objective;
use inferforge_test::ring::{ring_model, ring_objective, Ring, STATE_COUNT};

fn train(rule: impl UpdateRule + 'static, seed: u64) -> (Ring, Sampler<RandomBlockProposer>) {
    let mut ring = Ring::new();
    let learner = SampleRank::new(ring_objective(), rule)
        .with_acceptance(Acceptance::metropolis_hastings(1.0).unwrap());
    let mut sampler = Sampler::new(
        ring_model(),
        RandomBlockProposer::new(1),
        Policy::sample_rank(learner),
    )
    .with_seed(seed);

    let contexts = vec![ring.variables.clone()];
    let summary = Trainer::new(200)
        .train(&mut sampler, &mut ring.assignment, &contexts)
        .unwrap();
    assert!(summary.statistics.weight_updates > 0);
    (ring, sampler)
}

fn assert_ranking_matches(ring: &mut Ring, sampler: &Sampler<RandomBlockProposer>) {
    let truth = ring_objective();
    let scores: Vec<(f64, f64)> = (0..STATE_COUNT)
        .map(|state| {
            ring.set_state(state);
            (
                sampler.model().score(&ring.assignment),
                truth.score(&ring.assignment),
            )
        })
        .collect();

    for (i, &(model_i, truth_i)) in scores.iter().enumerate() {
        for (j, &(model_j, truth_j)) in scores.iter().enumerate() {
            if truth_i > truth_j {
                assert!(
                    model_i > model_j,
                    "state {i:04b} (truth {truth_i}, model {model_i}) should outrank \
                     state {j:04b} (truth {truth_j}, model {model_j})"
                );
            }
        }
    }
}

#[test]
fn test_ring_perceptron_ranks_all_pairs() {
    let (mut ring, sampler) = train(Perceptron::new(1.0), 17);
    assert_ranking_matches(&mut ring, &sampler);
}

#[test]
fn test_ring_mira_ranks_all_pairs() {
    let (mut ring, sampler) = train(Mira::new(1.0), 23);
    assert_ranking_matches(&mut ring, &sampler);
}

#[test]
fn test_ring_state_roundtrip() {
    let mut ring = Ring::new();
    for state in 0..STATE_COUNT {
        ring.set_state(state);
        assert_eq!(ring.state(), state);
    }
}
