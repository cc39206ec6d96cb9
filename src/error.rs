//! Error types for k-dimensional dict operations

use std::fmt;

use thiserror::Error;

use crate::key::Key;

/// What disagreed with the expected dimension count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AritySubject {
    /// A key being stored or constructed
    Key,
    /// A key template passed to a lookup
    Template,
    /// A list or range selector whose candidate count differs from the
    /// first multi-valued selector in the same template
    Selection { dimension: usize },
}

impl fmt::Display for AritySubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySubject::Key => write!(f, "key"),
            AritySubject::Template => write!(f, "key template"),
            AritySubject::Selection { dimension } => {
                write!(f, "selection at dimension {}", dimension)
            }
        }
    }
}

/// Errors raised by [`KDict`](crate::KDict) and the template resolver
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KDictError {
    #[error("Wrong length: {subject} has {found}, expected {expected}")]
    ArityMismatch {
        subject: AritySubject,
        expected: usize,
        found: usize,
    },

    #[error("Key not found: {key}")]
    KeyNotFound { key: Key },

    #[error("Cannot compare {left} with {right}")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("Dimension {dimension} out of range for keys of length {arity}")]
    DimensionOutOfRange { dimension: usize, arity: usize },
}

impl KDictError {
    pub fn is_arity_mismatch(&self) -> bool {
        matches!(self, KDictError::ArityMismatch { .. })
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, KDictError::KeyNotFound { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, KDictError::TypeMismatch { .. })
    }
}

/// Result type for k-dimensional dict operations
pub type KDictResult<T> = Result<T, KDictError>;
