//! Templates and the factors they unroll.
//!
//! A template answers two questions for the model:
//! - which factors could change score when a given variable changes
//!   ([`FactorTemplate::unroll`]),
//! - which sufficient statistics a factor fires under the current
//!   assignment ([`FactorTemplate::statistics`]).
//!
//! The score of a factor is the dot product of those statistics with the
//! template's [`Weights`].

use std::fmt::{self, Debug};
use std::sync::Arc;

use inferforge_core::{Assignment, VariableId};
use smallvec::SmallVec;

use crate::statistics::SparseVector;
use crate::weights::Weights;

/// A scored tuple of co-varying variables.
///
/// Factors are computed on demand and never stored by the model. Two
/// factors are the same factor when they list the same variables and key,
/// which lets the model deduplicate factors reached from several variables.
/// `key` distinguishes factors over the same variables that read different
/// observed data (a position in a sentence, a feature template id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Factor {
    variables: SmallVec<[VariableId; 4]>,
    key: u64,
}

impl Factor {
    pub fn new<I: IntoIterator<Item = VariableId>>(variables: I) -> Self {
        Self {
            variables: variables.into_iter().collect(),
            key: 0,
        }
    }

    pub fn with_key<I: IntoIterator<Item = VariableId>>(variables: I, key: u64) -> Self {
        Self {
            variables: variables.into_iter().collect(),
            key,
        }
    }

    pub fn unary(variable: VariableId) -> Self {
        Self::new([variable])
    }

    pub fn pair(a: VariableId, b: VariableId) -> Self {
        Self::new([a, b])
    }

    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    pub fn variable(&self, position: usize) -> VariableId {
        self.variables[position]
    }

    pub fn key(&self) -> u64 {
        self.key
    }
}

/// Application-supplied scoring rule.
///
/// Implementations must return, from [`unroll`](Self::unroll), every factor
/// whose statistics depend on `variable`; a factor that is missed is silently
/// left out of score deltas. Statistics indices must be below
/// [`dimension`](Self::dimension).
pub trait FactorTemplate: Send + Sync + Debug {
    /// Name used in logs and weight reports.
    fn name(&self) -> &str;

    /// Length of the weight vector.
    fn dimension(&self) -> usize;

    /// Pushes the factors touching `variable` onto `out`.
    fn unroll(&self, variable: VariableId, assignment: &Assignment, out: &mut Vec<Factor>);

    /// Sufficient statistics of `factor` under the current assignment.
    fn statistics(&self, factor: &Factor, assignment: &Assignment) -> SparseVector;
}

/// A [`FactorTemplate`] built from two closures.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain};
/// use inferforge_scoring::{Factor, FnTemplate, Model, SparseVector};
///
/// let domain = Domain::new("bool", 2);
/// let mut assignment = Assignment::new();
/// let x = assignment.add_variable(&domain, 1).unwrap();
///
/// // One bias weight per value.
/// let bias = FnTemplate::new(
///     "bias",
///     2,
///     |v, _: &Assignment, out: &mut Vec<Factor>| out.push(Factor::unary(v)),
///     |f: &Factor, a: &Assignment| SparseVector::one_hot(a.value(f.variable(0)).index()),
/// );
///
/// let mut model = Model::new();
/// let t = model.add_template(bias);
/// model.template_mut(t).weights_mut().set(1, 2.5);
/// assert_eq!(model.score(&assignment), 2.5);
/// # let _ = x;
/// ```
pub struct FnTemplate<U, St> {
    name: String,
    dimension: usize,
    unroll: U,
    statistics: St,
}

impl<U, St> FnTemplate<U, St>
where
    U: Fn(VariableId, &Assignment, &mut Vec<Factor>) + Send + Sync,
    St: Fn(&Factor, &Assignment) -> SparseVector + Send + Sync,
{
    pub fn new(name: impl Into<String>, dimension: usize, unroll: U, statistics: St) -> Self {
        Self {
            name: name.into(),
            dimension,
            unroll,
            statistics,
        }
    }
}

impl<U, St> Debug for FnTemplate<U, St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTemplate")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl<U, St> FactorTemplate for FnTemplate<U, St>
where
    U: Fn(VariableId, &Assignment, &mut Vec<Factor>) + Send + Sync,
    St: Fn(&Factor, &Assignment) -> SparseVector + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn unroll(&self, variable: VariableId, assignment: &Assignment, out: &mut Vec<Factor>) {
        (self.unroll)(variable, assignment, out)
    }

    fn statistics(&self, factor: &Factor, assignment: &Assignment) -> SparseVector {
        (self.statistics)(factor, assignment)
    }
}

/// A scoring rule together with the weights it owns.
///
/// Cloning shares the rule and copies the weights, so each training worker
/// can hold its own weights over the same rules.
#[derive(Clone)]
pub struct Template {
    rule: Arc<dyn FactorTemplate>,
    weights: Weights,
}

impl Template {
    /// Wraps `rule` with zero weights.
    pub fn new(rule: impl FactorTemplate + 'static) -> Self {
        Self::from_arc(Arc::new(rule))
    }

    pub fn from_arc(rule: Arc<dyn FactorTemplate>) -> Self {
        let weights = Weights::zeros(rule.dimension());
        Self { rule, weights }
    }

    pub fn name(&self) -> &str {
        self.rule.name()
    }

    pub fn rule(&self) -> &dyn FactorTemplate {
        self.rule.as_ref()
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut Weights {
        &mut self.weights
    }

    pub fn unroll(&self, variable: VariableId, assignment: &Assignment, out: &mut Vec<Factor>) {
        self.rule.unroll(variable, assignment, out)
    }

    pub fn statistics(&self, factor: &Factor, assignment: &Assignment) -> SparseVector {
        self.rule.statistics(factor, assignment)
    }

    /// Weighted score of one factor under the current assignment.
    pub fn factor_score(&self, factor: &Factor, assignment: &Assignment) -> f64 {
        self.weights.dot(&self.statistics(factor, assignment))
    }
}

impl Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("rule", &self.rule)
            .field("dimension", &self.weights.dimension())
            .finish()
    }
}
