//! Sparse sufficient statistics.

use smallvec::SmallVec;

use crate::weights::ModelWeights;

/// A sparse numeric vector sorted by index.
///
/// Factors usually fire a handful of statistics, so entries live inline
/// until the vector grows past eight.
///
/// # Example
///
/// ```
/// use inferforge_scoring::SparseVector;
///
/// let mut v = SparseVector::new();
/// v.increment(3, 1.0);
/// v.increment(0, 2.0);
/// v.increment(3, 0.5);
/// assert_eq!(v.get(3), 1.5);
/// assert_eq!(v.dot(&[1.0, 0.0, 0.0, 2.0]), 5.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: SmallVec<[(usize, f64); 8]>,
}

impl SparseVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vector with a single `1.0` at `index`.
    pub fn one_hot(index: usize) -> Self {
        let mut v = Self::new();
        v.increment(index, 1.0);
        v
    }

    /// Adds `value` to the entry at `index`.
    pub fn increment(&mut self, index: usize, value: f64) {
        match self.entries.binary_search_by_key(&index, |&(i, _)| i) {
            Ok(pos) => self.entries[pos].1 += value,
            Err(pos) => self.entries.insert(pos, (index, value)),
        }
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Adds `scale * other` into this vector.
    pub fn add_scaled(&mut self, other: &SparseVector, scale: f64) {
        for &(index, value) in &other.entries {
            self.increment(index, scale * value);
        }
    }

    /// Dot product with a dense vector. Indices past its end contribute zero.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(index, value)| dense.get(index).copied().unwrap_or(0.0) * value)
            .sum()
    }

    pub fn norm_squared(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }

    /// Drops entries that cancelled out to exactly zero.
    pub fn prune(&mut self) {
        self.entries.retain(|&mut (_, v)| v != 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of stored entries (explicit zeros included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every stored entry is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, v)| v == 0.0)
    }
}

impl FromIterator<(usize, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        let mut v = Self::new();
        for (index, value) in iter {
            v.increment(index, value);
        }
        v
    }
}

/// Sufficient statistics of a whole model, one sparse vector per template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelStatistics {
    templates: Vec<SparseVector>,
}

impl ModelStatistics {
    /// Empty statistics for a model with `template_count` templates.
    pub fn zeros(template_count: usize) -> Self {
        Self {
            templates: vec![SparseVector::new(); template_count],
        }
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn template(&self, index: usize) -> &SparseVector {
        &self.templates[index]
    }

    pub fn template_mut(&mut self, index: usize) -> &mut SparseVector {
        &mut self.templates[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SparseVector> {
        self.templates.iter()
    }

    /// Adds `scale * other` into these statistics, template by template.
    pub fn add_scaled(&mut self, other: &ModelStatistics, scale: f64) {
        debug_assert_eq!(self.templates.len(), other.templates.len());
        for (mine, theirs) in self.templates.iter_mut().zip(&other.templates) {
            mine.add_scaled(theirs, scale);
        }
    }

    /// Returns `self - other`.
    pub fn difference(&self, other: &ModelStatistics) -> ModelStatistics {
        let mut result = self.clone();
        result.add_scaled(other, -1.0);
        result.prune();
        result
    }

    /// Returns a copy scaled by `scale`.
    pub fn scaled(&self, scale: f64) -> ModelStatistics {
        let mut result = ModelStatistics::zeros(self.templates.len());
        result.add_scaled(self, scale);
        result
    }

    pub fn dot(&self, weights: &ModelWeights) -> f64 {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, v)| v.dot(weights.template(i)))
            .sum()
    }

    pub fn norm_squared(&self) -> f64 {
        self.templates.iter().map(SparseVector::norm_squared).sum()
    }

    pub fn prune(&mut self) {
        for v in &mut self.templates {
            v.prune();
        }
    }

    pub fn is_zero(&self) -> bool {
        self.templates.iter().all(SparseVector::is_zero)
    }
}
