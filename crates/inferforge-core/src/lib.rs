//! InferForge Core - Variables, domains and the mutation journal
//!
//! This crate provides the state layer every other InferForge crate builds on:
//! - [`Domain`] and [`Value`] for finite indexed value sets
//! - [`Assignment`] holding the variables of one problem instance
//! - [`Diff`] and [`DiffList`] for speculative edits with exact rollback
//! - Error types for value resolution and block enumeration

pub mod diff;
pub mod domain;
pub mod error;
pub mod variable;

pub use diff::{Diff, DiffList};
pub use domain::{Domain, DomainId, Value};
pub use error::{DomainError, SettingCount, UnsupportedEnumerationError};
pub use variable::{Assignment, Variable, VariableId};
