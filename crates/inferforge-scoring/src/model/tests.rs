//! Tests for model scoring.

use std::sync::Arc;

use inferforge_core::{Assignment, DiffList, Domain, VariableId};

use super::*;
use crate::{FnTemplate, SparseVector, Weights};

const CHAIN_LEN: usize = 6;

fn bias_template() -> impl FactorTemplate {
    FnTemplate::new(
        "bias",
        3,
        |v, _: &Assignment, out: &mut Vec<Factor>| out.push(Factor::unary(v)),
        |f: &Factor, a: &Assignment| SparseVector::one_hot(a.value(f.variable(0)).index()),
    )
}

// Neighbouring variables on a chain; statistic 0 fires when they agree,
// statistic 1 when they differ.
fn agreement_template() -> impl FactorTemplate {
    FnTemplate::new(
        "agreement",
        2,
        |v: VariableId, _: &Assignment, out: &mut Vec<Factor>| {
            let i = v.index();
            if i > 0 {
                out.push(Factor::pair(VariableId::from_index(i - 1), v));
            }
            if i + 1 < CHAIN_LEN {
                out.push(Factor::pair(v, VariableId::from_index(i + 1)));
            }
        },
        |f: &Factor, a: &Assignment| {
            let same = a.value(f.variable(0)) == a.value(f.variable(1));
            SparseVector::one_hot(if same { 0 } else { 1 })
        },
    )
}

fn chain() -> (Arc<Domain>, Assignment, Model) {
    let domain = Domain::new("tri", 3);
    let mut assignment = Assignment::new();
    for i in 0..CHAIN_LEN {
        assignment.add_variable(&domain, i % 3).unwrap();
    }
    let mut model = Model::new().with_template(bias_template());
    let pair = model.add_template(agreement_template());
    *model.template_mut(0).weights_mut() = Weights::from_vec(vec![0.5, -1.0, 2.0]);
    *model.template_mut(pair).weights_mut() = Weights::from_vec(vec![1.5, -0.25]);
    (domain, assignment, model)
}

#[test]
fn test_full_score() {
    let (_, assignment, model) = chain();
    // Values 0,1,2,0,1,2: bias 2*(0.5 - 1.0 + 2.0) = 3.0, five differing pairs.
    assert!((model.score(&assignment) - (3.0 - 5.0 * 0.25)).abs() < 1e-12);
}

#[test]
fn test_unroll_deduplicates_shared_factors() {
    let (_, assignment, model) = chain();
    let touched = [VariableId::from_index(1), VariableId::from_index(2)];
    let factors = model.unroll(&touched, &assignment);
    assert_eq!(factors[0].len(), 2);
    // (0,1) (1,2) (2,3), with (1,2) reached twice.
    assert_eq!(factors[1].len(), 3);
}

#[test]
fn test_score_delta_matches_full_rescore() {
    let (domain, mut assignment, model) = chain();
    let moves = [
        vec![(0, 2)],
        vec![(3, 1), (4, 1)],
        vec![(5, 0), (5, 1), (0, 0)],
        vec![(2, 2), (1, 2), (2, 0)],
    ];
    for writes in moves {
        let before = model.score(&assignment);
        let snapshot = assignment.indices();
        let mut diff = DiffList::new();
        for (var, index) in writes {
            assignment.set_journaled(
                VariableId::from_index(var),
                domain.value(index).unwrap(),
                &mut diff,
            );
        }
        let after = model.score(&assignment);
        let delta = model.score_delta(&mut assignment, &diff);
        assert!((delta - (after - before)).abs() < 1e-12);

        // score_delta leaves the diff applied
        assert_eq!(model.score(&assignment), after);
        diff.undo_all(&mut assignment);
        assert_eq!(assignment.indices(), snapshot);
    }
}

#[test]
fn test_statistics_delta_dot_equals_score_delta() {
    let (domain, mut assignment, model) = chain();
    let mut diff = DiffList::new();
    assignment.set_journaled(VariableId::from_index(2), domain.value(1).unwrap(), &mut diff);
    assignment.set_journaled(VariableId::from_index(3), domain.value(1).unwrap(), &mut diff);

    let stats = model.statistics_delta(&mut assignment, &diff);
    let delta = model.score_delta(&mut assignment, &diff);
    assert!((model.dot(&stats) - delta).abs() < 1e-12);
    assert!((stats.dot(&model.weights()) - delta).abs() < 1e-12);
}

#[test]
fn test_empty_diff_has_zero_delta() {
    let (_, mut assignment, model) = chain();
    let diff = DiffList::new();
    assert_eq!(model.score_delta(&mut assignment, &diff), 0.0);
    assert!(model.statistics_delta(&mut assignment, &diff).is_zero());
}

#[test]
fn test_apply_delta_and_snapshot() {
    let (_, _, mut model) = chain();
    let mut delta = ModelStatistics::zeros(2);
    delta.template_mut(1).increment(0, 0.5);
    model.apply_delta(&delta);
    assert_eq!(model.template(1).weights().get(0), 2.0);

    let snapshot = model.weights();
    let mut other = model.clone();
    other.apply_delta(&delta);
    other.set_weights(&snapshot).unwrap();
    assert_eq!(other.weights(), snapshot);
}

#[test]
fn test_set_weights_rejects_wrong_shape() {
    let (_, _, mut model) = chain();
    let bad = ModelWeights::new(vec![vec![0.0; 3]]);
    assert_eq!(
        model.set_weights(&bad),
        Err(ScoringError::TemplateCount {
            expected: 2,
            found: 1
        })
    );
    let bad = ModelWeights::new(vec![vec![0.0; 3], vec![0.0; 5]]);
    assert!(matches!(
        model.set_weights(&bad),
        Err(ScoringError::Dimension { .. })
    ));
}
