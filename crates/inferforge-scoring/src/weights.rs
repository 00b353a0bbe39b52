//! Dense weight vectors owned by templates.
//!
//! `ModelWeights` is a plain snapshot of every template's weights. It is what
//! training workers hand back for merging and what a serialization
//! collaborator persists.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::statistics::SparseVector;

/// Dense weights of one template, indexed by sufficient-statistic index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    values: Vec<f64>,
}

impl Weights {
    /// Creates `dimension` zero weights.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            values: vec![0.0; dimension],
        }
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn set(&mut self, index: usize, value: f64) {
        self.values[index] = value;
    }

    /// Adds `scale * delta`; statistics past the dimension are ignored.
    pub fn add_scaled(&mut self, delta: &SparseVector, scale: f64) {
        for (index, value) in delta.iter() {
            if let Some(w) = self.values.get_mut(index) {
                *w += scale * value;
            }
        }
    }

    pub fn dot(&self, statistics: &SparseVector) -> f64 {
        statistics.dot(&self.values)
    }
}

/// Snapshot of all template weights of a model, in template order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    templates: Vec<Vec<f64>>,
}

impl ModelWeights {
    pub fn new(templates: Vec<Vec<f64>>) -> Self {
        Self { templates }
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn template(&self, index: usize) -> &[f64] {
        &self.templates[index]
    }

    pub fn into_inner(self) -> Vec<Vec<f64>> {
        self.templates
    }

    /// Element-wise mean of several snapshots of the same shape.
    ///
    /// Returns `Ok(None)` for an empty input.
    ///
    /// # Example
    ///
    /// ```
    /// use inferforge_scoring::ModelWeights;
    ///
    /// let a = ModelWeights::new(vec![vec![1.0, 2.0]]);
    /// let b = ModelWeights::new(vec![vec![3.0, 0.0]]);
    /// let mean = ModelWeights::average([&a, &b]).unwrap().unwrap();
    /// assert_eq!(mean.template(0), &[2.0, 1.0]);
    /// ```
    pub fn average<'a, I>(snapshots: I) -> Result<Option<ModelWeights>, ScoringError>
    where
        I: IntoIterator<Item = &'a ModelWeights>,
    {
        let mut iter = snapshots.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let mut sum = first.clone();
        let mut count = 1usize;
        for snapshot in iter {
            sum.check_shape(snapshot)?;
            for (acc, w) in sum.templates.iter_mut().zip(&snapshot.templates) {
                for (a, b) in acc.iter_mut().zip(w) {
                    *a += b;
                }
            }
            count += 1;
        }
        let scale = 1.0 / count as f64;
        for acc in &mut sum.templates {
            for a in acc.iter_mut() {
                *a *= scale;
            }
        }
        Ok(Some(sum))
    }

    fn check_shape(&self, other: &ModelWeights) -> Result<(), ScoringError> {
        if self.templates.len() != other.templates.len() {
            return Err(ScoringError::TemplateCount {
                expected: self.templates.len(),
                found: other.templates.len(),
            });
        }
        for (i, (a, b)) in self.templates.iter().zip(&other.templates).enumerate() {
            if a.len() != b.len() {
                return Err(ScoringError::Dimension {
                    template: format!("#{i}"),
                    expected: a.len(),
                    found: b.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_scaled_ignores_overflow_index() {
        let mut w = Weights::zeros(2);
        let delta: SparseVector = [(0, 1.0), (5, 1.0)].into_iter().collect();
        w.add_scaled(&delta, 0.5);
        assert_eq!(w.as_slice(), &[0.5, 0.0]);
    }

    #[test]
    fn test_average() {
        let a = ModelWeights::new(vec![vec![1.0, 2.0], vec![0.0]]);
        let b = ModelWeights::new(vec![vec![3.0, 4.0], vec![2.0]]);
        let avg = ModelWeights::average([&a, &b]).unwrap().unwrap();
        assert_eq!(avg, ModelWeights::new(vec![vec![2.0, 3.0], vec![1.0]]));
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(ModelWeights::average(std::iter::empty()).unwrap(), None);
    }

    #[test]
    fn test_average_shape_mismatch() {
        let a = ModelWeights::new(vec![vec![1.0, 2.0]]);
        let b = ModelWeights::new(vec![vec![1.0]]);
        assert!(matches!(
            ModelWeights::average([&a, &b]),
            Err(ScoringError::Dimension { .. })
        ));
    }

    #[test]
    fn test_serde_json_roundtrip() {
        let w = ModelWeights::new(vec![vec![0.25, -1.0]]);
        let json = serde_json::to_string(&w).unwrap();
        let back: ModelWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
