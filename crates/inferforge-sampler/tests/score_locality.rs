//! Locality-scoped scoring and journal rollback on the labelled chain.

use inferforge_core::{DiffList, VariableId};
use inferforge_sampler::{SettingIterator, VariableSettings};
use inferforge_scoring::{Model, Objective, Weights};
use inferforge_test::chain::{chain_model, LabelChain, CHAIN_LABELS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const OBSERVATIONS: [usize; 12] = [0, 3, 1, 4, 2, 5, 5, 1, 0, 2, 3, 4];

fn weighted_chain(rng: &mut ChaCha8Rng) -> (LabelChain, Model) {
    let mut chain = LabelChain::new(&OBSERVATIONS);
    let mut model = chain_model(&chain);
    for t in 0..model.template_count() {
        let dimension = model.template(t).weights().dimension();
        let weights = (0..dimension).map(|_| rng.random_range(-2.0..2.0)).collect();
        *model.template_mut(t).weights_mut() = Weights::from_vec(weights);
    }
    for &id in &chain.variables {
        chain.assignment.set_randomly(id, rng);
    }
    (chain, model)
}

#[test]
fn test_score_delta_matches_full_rescore() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let (mut chain, model) = weighted_chain(&mut rng);

    for round in 0..200 {
        let before = model.score(&chain.assignment);
        let mut diff = DiffList::new();
        let writes = 1 + round % 4;
        for _ in 0..writes {
            let id = VariableId::from_index(rng.random_range(0..chain.len()));
            chain.assignment.set_randomly_journaled(id, &mut rng, &mut diff);
        }
        let after = model.score(&chain.assignment);

        let delta = model.score_delta(&mut chain.assignment, &diff);
        assert!(
            (delta - (after - before)).abs() < 1e-9,
            "round {round}: local {delta}, full {}",
            after - before
        );

        let statistics = model.statistics_delta(&mut chain.assignment, &diff);
        assert!((model.dot(&statistics) - delta).abs() < 1e-9);

        let truth_delta = chain.gold.score_delta(&mut chain.assignment, &diff);
        let truth_after = chain.gold.score(&chain.assignment);
        diff.undo_all(&mut chain.assignment);
        assert_eq!(truth_after - chain.gold.score(&chain.assignment), truth_delta);
        assert!((model.score(&chain.assignment) - before).abs() < 1e-9);

        // Keep half of the rounds applied so the walk covers many states.
        if round % 2 == 0 {
            diff.redo_all(&mut chain.assignment);
        }
    }
}

#[test]
fn test_rollback_restores_every_value() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (mut chain, _) = weighted_chain(&mut rng);
    let snapshot = chain.assignment.indices();

    for &id in &chain.variables {
        for value in chain.domain.values() {
            let mut diff = DiffList::new();
            chain.assignment.set_journaled(id, value, &mut diff);
            assert_eq!(chain.assignment.value(id), value);
            diff.undo_all(&mut chain.assignment);
            assert_eq!(chain.assignment.indices(), snapshot);
        }
    }
}

#[test]
fn test_single_variable_enumeration() {
    let mut chain = LabelChain::new(&[0]);
    let x = chain.variables[0];
    assert_eq!(chain.assignment.value(x).index(), 0);

    let mut settings = VariableSettings::new(x, &chain.assignment);
    let mut visited = Vec::new();
    while settings.has_next() {
        let diff = settings.next_setting(&mut chain.assignment);
        visited.push(chain.assignment.value(x).index());
        diff.undo_all(&mut chain.assignment);
        assert_eq!(chain.assignment.value(x).index(), 0);
    }
    assert_eq!(visited, (0..CHAIN_LABELS.len()).collect::<Vec<_>>());
}
