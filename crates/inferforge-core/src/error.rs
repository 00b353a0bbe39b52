//! Error types for InferForge

use thiserror::Error;

/// Raised when a value cannot be resolved inside a [`Domain`](crate::Domain).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The requested index lies outside `[0, size)`.
    #[error("index {index} out of range for domain '{domain}' of size {size}")]
    IndexOutOfRange {
        domain: String,
        index: usize,
        size: usize,
    },

    /// The requested label is not part of the domain.
    #[error("label '{label}' not found in domain '{domain}'")]
    UnknownLabel { domain: String, label: String },
}

/// Raised when a block enumeration would exceed the supported size.
///
/// Large blocks must be explored with a move generator instead of the
/// full cross product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("block enumeration of {settings} settings exceeds the limit of {limit}; supply a move generator")]
pub struct UnsupportedEnumerationError {
    /// Number of settings the cross product would produce.
    pub settings: SettingCount,
    /// Configured upper bound.
    pub limit: usize,
}

/// Size of a cross product, which may not fit in a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingCount {
    Exact(usize),
    Overflow,
}

impl std::fmt::Display for SettingCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingCount::Exact(n) => write!(f, "{n}"),
            SettingCount::Overflow => write!(f, "more than usize::MAX"),
        }
    }
}
