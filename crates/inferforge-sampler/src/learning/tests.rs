//! Tests for SampleRank and the update rules.

use inferforge_core::{Assignment, Domain, VariableId};
use inferforge_scoring::{
    Factor, FnTemplate, HammingObjective, Model, ModelStatistics, SparseVector,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::settings::VariableSettings;

fn stats(values: &[(usize, f64)]) -> ModelStatistics {
    let mut s = ModelStatistics::zeros(1);
    for &(i, v) in values {
        s.template_mut(0).increment(i, v);
    }
    s
}

fn bias_model(size: usize) -> Model {
    Model::new().with_template(FnTemplate::new(
        "bias",
        size,
        |v, _: &Assignment, out: &mut Vec<Factor>| out.push(Factor::unary(v)),
        |f: &Factor, a: &Assignment| SparseVector::one_hot(a.value(f.variable(0)).index()),
    ))
}

fn single_variable(size: usize, gold: usize) -> (Assignment, VariableId, HammingObjective) {
    let domain = Domain::new("labels", size);
    let mut assignment = Assignment::new();
    let x = assignment.add_variable(&domain, 0).unwrap();
    let mut truth = HammingObjective::new();
    truth.set_gold(x, domain.value(gold).unwrap());
    (assignment, x, truth)
}

#[test]
fn test_perceptron_scales_direction() {
    let preferred = stats(&[(0, 1.0)]);
    let rejected = stats(&[(1, 1.0)]);
    let ranking = Ranking {
        preferred: &preferred,
        rejected: &rejected,
        model_margin: 0.0,
        truth_margin: 1.0,
    };
    let delta = Perceptron::new(0.5).weight_delta(&ranking);
    assert_eq!(delta.template(0).get(0), 0.5);
    assert_eq!(delta.template(0).get(1), -0.5);
}

#[test]
fn test_mira_step_closes_margin() {
    let preferred = stats(&[(0, 1.0)]);
    let rejected = stats(&[(1, 1.0)]);
    let ranking = Ranking {
        preferred: &preferred,
        rejected: &rejected,
        model_margin: -1.0,
        truth_margin: 2.0,
    };
    // Loss 3, squared norm 2: unclipped step 1.5.
    let delta = Mira::new(10.0).weight_delta(&ranking);
    let direction = ranking.direction();
    let mut achieved = 0.0;
    for (i, x) in direction.template(0).iter() {
        achieved += x * delta.template(0).get(i);
    }
    assert!((achieved - 3.0).abs() < 1e-12);

    let clipped = Mira::new(0.25).weight_delta(&ranking);
    assert_eq!(clipped.template(0).get(0), 0.25);
}

#[test]
fn test_mira_zero_direction() {
    let same = stats(&[(0, 1.0)]);
    let ranking = Ranking {
        preferred: &same,
        rejected: &same,
        model_margin: 0.0,
        truth_margin: 1.0,
    };
    assert!(Mira::default().weight_delta(&ranking).is_zero());
}

#[test]
fn test_arow_shrinks_variance() {
    let preferred = stats(&[(0, 1.0)]);
    let rejected = stats(&[(1, 1.0)]);
    let ranking = Ranking {
        preferred: &preferred,
        rejected: &rejected,
        model_margin: 0.0,
        truth_margin: 1.0,
    };
    let mut arow = Arow::new(1.0);
    let first = arow.weight_delta(&ranking);
    assert!(first.template(0).get(0) > 0.0);
    assert!(first.template(0).get(1) < 0.0);
    assert!(arow.variance(0, 0) < 1.0);
    assert_eq!(arow.variance(0, 5), 1.0);

    let second = arow.weight_delta(&ranking);
    assert!(second.template(0).get(0) < first.template(0).get(0));
}

#[test]
fn test_update_on_disagreement_then_follow_model() {
    let (mut assignment, x, truth) = single_variable(2, 1);
    let mut model = bias_model(2);
    let mut learner =
        SampleRank::new(truth, Perceptron::new(1.0)).with_acceptance(Acceptance::GreedyMax);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    // Both candidates score zero; the objective prefers value 1.
    let mut settings = VariableSettings::new(x, &assignment);
    let step = learner.learn(&mut model, &mut settings, &mut assignment, &mut rng);
    assert!(step.updated);
    assert_eq!(step.evaluated, 1);
    // Transition uses pre-update deltas: the model still preferred staying.
    assert!(step.realized.is_empty());
    assert_eq!(assignment.value(x).index(), 0);
    assert!(model.template(0).weights().get(1) > model.template(0).weights().get(0));

    let mut settings = VariableSettings::new(x, &assignment);
    let step = learner.learn(&mut model, &mut settings, &mut assignment, &mut rng);
    assert!(!step.updated);
    assert_eq!(step.realized.len(), 1);
    assert_eq!(assignment.value(x).index(), 1);
    assert_eq!(learner.update_count(), 1);
}

#[test]
fn test_no_update_when_model_agrees() {
    let (mut assignment, x, truth) = single_variable(3, 2);
    let mut model = bias_model(3);
    model.template_mut(0).weights_mut().set(2, 1.0);
    let mut learner = SampleRank::new(truth, Perceptron::default());
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let mut settings = VariableSettings::new(x, &assignment);
    let step = learner.learn(&mut model, &mut settings, &mut assignment, &mut rng);
    assert!(!step.updated);
    assert_eq!(step.evaluated, 2);
    assert_eq!(learner.update_count(), 0);
}

#[test]
fn test_empty_settings_is_noop() {
    let (mut assignment, x, truth) = single_variable(1, 0);
    let mut model = bias_model(1);
    let mut learner = SampleRank::new(truth, Perceptron::default());
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    // The only setting is the current value.
    let mut settings = VariableSettings::new(x, &assignment);
    let step = learner.learn(&mut model, &mut settings, &mut assignment, &mut rng);
    assert!(!step.updated);
    assert_eq!(step.evaluated, 0);
    assert!(step.realized.is_empty());
    assert_eq!(assignment.value(x).index(), 0);
}

#[test]
fn test_candidates_undone_before_transition() {
    let (mut assignment, x, truth) = single_variable(4, 3);
    let mut model = bias_model(4);
    let mut learner = SampleRank::new(truth, Perceptron::default())
        .with_acceptance(Acceptance::MetropolisHastings { temperature: 0.0 });
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let mut settings = VariableSettings::new(x, &assignment);
    let step = learner.learn(&mut model, &mut settings, &mut assignment, &mut rng);
    // Zero deltas are accepted at any temperature; the picked candidate is
    // the only write left applied.
    assert_eq!(step.realized.len(), 1);
    assert_eq!(step.realized.variables(), vec![x]);
    assert_eq!(
        assignment.value(x),
        step.realized.iter().next().unwrap().new_value()
    );
}
