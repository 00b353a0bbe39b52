//! Move generators.
//!
//! A proposer maps an application-defined context (a variable, a block, a
//! sentence position) to the [`SettingIterator`] the sampler should draw
//! candidates from. Proposers see the assignment read-only; candidates are
//! only written by the iterator they return.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use inferforge_config::{SamplerConfig, DEFAULT_BLOCK_LIMIT};
use inferforge_core::{Assignment, VariableId};
use rand::{Rng, RngCore};

use crate::error::SamplerError;
use crate::settings::{BlockSettings, MoveSettings, SettingIterator, VariableSettings};

/// Produces the candidate transitions for a context.
pub trait Proposer: Send + Debug {
    /// What the sampler is asked to process.
    type Context;

    /// Returns a fresh iterator over the candidates for `context`.
    fn settings(
        &mut self,
        context: &Self::Context,
        assignment: &Assignment,
        rng: &mut dyn RngCore,
    ) -> Result<Box<dyn SettingIterator>, SamplerError>;
}

/// Enumerates every value of the context variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableProposer;

impl Proposer for VariableProposer {
    type Context = VariableId;

    fn settings(
        &mut self,
        context: &VariableId,
        assignment: &Assignment,
        _rng: &mut dyn RngCore,
    ) -> Result<Box<dyn SettingIterator>, SamplerError> {
        Ok(Box::new(VariableSettings::new(*context, assignment)))
    }
}

/// Proposes one uniformly drawn value for the context variable.
///
/// The drawn value may equal the current one, in which case the candidate
/// is an empty diff.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomValueProposer;

impl Proposer for RandomValueProposer {
    type Context = VariableId;

    fn settings(
        &mut self,
        context: &VariableId,
        assignment: &Assignment,
        rng: &mut dyn RngCore,
    ) -> Result<Box<dyn SettingIterator>, SamplerError> {
        let domain = assignment.domain(*context);
        if domain.size() == 0 {
            return Ok(Box::new(MoveSettings::new()));
        }
        let value = domain.value(rng.random_range(0..domain.size()))?;
        Ok(Box::new(MoveSettings::new().with_move([(*context, value)])))
    }
}

/// Enumerates the joint settings of the context block.
///
/// Fails for blocks whose cross product exceeds the limit.
#[derive(Debug, Clone, Copy)]
pub struct BlockProposer {
    limit: usize,
}

impl BlockProposer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Uses the configured block limit.
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.block_limit())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for BlockProposer {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_LIMIT)
    }
}

impl Proposer for BlockProposer {
    type Context = Vec<VariableId>;

    fn settings(
        &mut self,
        context: &Vec<VariableId>,
        assignment: &Assignment,
        _rng: &mut dyn RngCore,
    ) -> Result<Box<dyn SettingIterator>, SamplerError> {
        let settings = BlockSettings::new(context.clone(), assignment, self.limit)?;
        Ok(Box::new(settings))
    }
}

/// Proposes `samples` independent random reassignments of the context
/// block, each drawing every variable uniformly.
#[derive(Debug, Clone, Copy)]
pub struct RandomBlockProposer {
    samples: usize,
}

impl RandomBlockProposer {
    pub fn new(samples: usize) -> Self {
        Self { samples }
    }
}

impl Default for RandomBlockProposer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Proposer for RandomBlockProposer {
    type Context = Vec<VariableId>;

    fn settings(
        &mut self,
        context: &Vec<VariableId>,
        assignment: &Assignment,
        rng: &mut dyn RngCore,
    ) -> Result<Box<dyn SettingIterator>, SamplerError> {
        let mut moves = MoveSettings::new();
        for _ in 0..self.samples {
            let mut writes = Vec::with_capacity(context.len());
            for &id in context {
                let domain = assignment.domain(id);
                if domain.size() > 0 {
                    writes.push((id, domain.value(rng.random_range(0..domain.size()))?));
                }
            }
            moves.push_move(writes);
        }
        Ok(Box::new(moves))
    }
}

/// A [`Proposer`] backed by a closure.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain, VariableId};
/// use inferforge_sampler::{FnProposer, MoveSettings, Proposer, SettingIterator};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// // Flip a boolean variable.
/// let mut flip = FnProposer::new(|x: &VariableId, a: &Assignment, _rng: &mut dyn rand::RngCore| {
///     let domain = a.domain(*x);
///     let flipped = domain.value(1 - a.value(*x).index())?;
///     Ok(Box::new(MoveSettings::new().with_move([(*x, flipped)])) as Box<dyn SettingIterator>)
/// });
///
/// let domain = Domain::new("bool", 2);
/// let mut assignment = Assignment::new();
/// let x = assignment.add_variable(&domain, 0).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
/// let settings = flip.settings(&x, &assignment, &mut rng).unwrap();
/// assert_eq!(settings.setting_count(), Some(1));
/// ```
pub struct FnProposer<C, F> {
    propose: F,
    _phantom: PhantomData<fn(&C)>,
}

impl<C, F> FnProposer<C, F>
where
    F: FnMut(&C, &Assignment, &mut dyn RngCore) -> Result<Box<dyn SettingIterator>, SamplerError>
        + Send,
{
    pub fn new(propose: F) -> Self {
        Self {
            propose,
            _phantom: PhantomData,
        }
    }
}

impl<C, F> Debug for FnProposer<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProposer").finish_non_exhaustive()
    }
}

impl<C, F> Proposer for FnProposer<C, F>
where
    F: FnMut(&C, &Assignment, &mut dyn RngCore) -> Result<Box<dyn SettingIterator>, SamplerError>
        + Send,
{
    type Context = C;

    fn settings(
        &mut self,
        context: &C,
        assignment: &Assignment,
        rng: &mut dyn RngCore,
    ) -> Result<Box<dyn SettingIterator>, SamplerError> {
        (self.propose)(context, assignment, rng)
    }
}
