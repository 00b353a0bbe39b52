//! Finite indexed value sets.
//!
//! A [`Domain`] is created once per variable kind and shared by `Arc`
//! between every variable of that kind. [`Value`]s are small `Copy`
//! handles naming a domain and an index, so two values compare equal
//! exactly when they denote the same element of the same domain.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::DomainError;

static NEXT_DOMAIN_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainId(u64);

impl DomainId {
    fn next() -> Self {
        Self(NEXT_DOMAIN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw integer representation.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// An element of a [`Domain`].
///
/// Values are only produced by their domain, so the index is always
/// inside `[0, size)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Value {
    domain: DomainId,
    index: usize,
}

impl Value {
    pub(crate) fn from_parts(domain: DomainId, index: usize) -> Self {
        Self { domain, index }
    }

    /// Returns the position of this value within its domain.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the identity of the owning domain.
    #[inline]
    pub fn domain_id(&self) -> DomainId {
        self.domain
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}#{})", self.domain.0, self.index)
    }
}

/// A finite set of legal values for one kind of variable.
///
/// # Example
///
/// ```
/// use inferforge_core::Domain;
///
/// let tags = Domain::with_labels("pos", ["NN", "VB", "JJ"]);
/// let vb = tags.value_of("VB").unwrap();
/// assert_eq!(vb.index(), 1);
/// assert_eq!(tags.label(vb), Some("VB"));
/// assert!(tags.value(3).is_err());
/// ```
pub struct Domain {
    id: DomainId,
    name: String,
    size: usize,
    labels: Option<Vec<String>>,
    label_index: HashMap<String, usize>,
}

impl Domain {
    /// Creates an unlabelled domain of `size` values.
    pub fn new(name: impl Into<String>, size: usize) -> Arc<Self> {
        Arc::new(Self {
            id: DomainId::next(),
            name: name.into(),
            size,
            labels: None,
            label_index: HashMap::new(),
        })
    }

    /// Creates a categorical domain, one value per label in the given order.
    ///
    /// If a label repeats, lookups by that label resolve to its first index.
    pub fn with_labels<I, L>(name: impl Into<String>, labels: I) -> Arc<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut label_index = HashMap::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            label_index.entry(label.clone()).or_insert(index);
        }
        Arc::new(Self {
            id: DomainId::next(),
            name: name.into(),
            size: labels.len(),
            labels: Some(labels),
            label_index,
        })
    }

    pub fn id(&self) -> DomainId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values in the domain.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Resolves the canonical value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IndexOutOfRange`] if `index >= size`.
    pub fn value(&self, index: usize) -> Result<Value, DomainError> {
        if index < self.size {
            Ok(Value {
                domain: self.id,
                index,
            })
        } else {
            Err(DomainError::IndexOutOfRange {
                domain: self.name.clone(),
                index,
                size: self.size,
            })
        }
    }

    /// Resolves the value carrying `label`.
    pub fn value_of(&self, label: &str) -> Result<Value, DomainError> {
        match self.label_index.get(label) {
            Some(&index) => Ok(Value {
                domain: self.id,
                index,
            }),
            None => Err(DomainError::UnknownLabel {
                domain: self.name.clone(),
                label: label.to_string(),
            }),
        }
    }

    /// Returns the label of `value`, if this domain is labelled and owns it.
    pub fn label(&self, value: Value) -> Option<&str> {
        if !self.contains(value) {
            return None;
        }
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(value.index))
            .map(String::as_str)
    }

    /// Returns true if `value` was produced by this domain.
    #[inline]
    pub fn contains(&self, value: Value) -> bool {
        value.domain == self.id
    }

    /// Iterates all values in index order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = Value> + '_ {
        let domain = self.id;
        (0..self.size).map(move |index| Value { domain, index })
    }
}

impl Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("id", &self.id.0)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("labelled", &self.labels.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_in_range() {
        let domain = Domain::new("digit", 10);
        let v = domain.value(7).unwrap();
        assert_eq!(v.index(), 7);
        assert_eq!(v.domain_id(), domain.id());
    }

    #[test]
    fn test_value_out_of_range() {
        let domain = Domain::new("bool", 2);
        let err = domain.value(2).unwrap_err();
        assert_eq!(
            err,
            DomainError::IndexOutOfRange {
                domain: "bool".to_string(),
                index: 2,
                size: 2
            }
        );
    }

    #[test]
    fn test_values_are_interned() {
        let domain = Domain::new("bool", 2);
        assert_eq!(domain.value(1).unwrap(), domain.value(1).unwrap());
        assert_ne!(domain.value(0).unwrap(), domain.value(1).unwrap());
    }

    #[test]
    fn test_distinct_domains_never_share_values() {
        let a = Domain::new("bool", 2);
        let b = Domain::new("bool", 2);
        assert_ne!(a.id(), b.id());
        assert_ne!(a.value(0).unwrap(), b.value(0).unwrap());
        assert!(!a.contains(b.value(0).unwrap()));
    }

    #[test]
    fn test_labels_roundtrip() {
        let domain = Domain::with_labels("pos", ["NN", "VB"]);
        assert_eq!(domain.size(), 2);
        let nn = domain.value_of("NN").unwrap();
        assert_eq!(domain.label(nn), Some("NN"));
        assert!(matches!(
            domain.value_of("JJ"),
            Err(DomainError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_label_of_foreign_value() {
        let a = Domain::with_labels("pos", ["NN", "VB"]);
        let b = Domain::new("plain", 2);
        assert_eq!(a.label(b.value(0).unwrap()), None);
        assert_eq!(b.label(b.value(0).unwrap()), None);
    }

    #[test]
    fn test_values_iteration() {
        let domain = Domain::new("tri", 3);
        let indices: Vec<usize> = domain.values().map(|v| v.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
