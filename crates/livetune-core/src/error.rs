//! Error and diagnostic types for livetune.

use std::fmt;

use crate::group::Group;
use crate::value::ValueKind;

/// Errors returned by registry lookups and non-owning parameter access.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No parameter was ever declared under this (group, name).
    NotFound { group: Group, name: String },
    /// The parameter existed but its owner has dropped it.
    Destroyed { group: Group, name: String },
    /// The caller asked for a different value type than the parameter holds.
    TypeMismatch {
        group: Group,
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { group, name } => {
                write!(f, "Parameter not found: {}/{}", group, name)
            }
            Self::Destroyed { group, name } => {
                write!(f, "Parameter destroyed: {}/{}", group, name)
            }
            Self::TypeMismatch {
                group,
                name,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch for {}/{}: requested {}, parameter holds {}",
                group, name, expected, found
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failure to turn a control's content into a parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Text could not be parsed as the parameter's type.
    Malformed { text: String, kind: ValueKind },
    /// Text parsed to NaN.
    NotANumber { text: String },
    /// The control returned a value of the wrong shape or type.
    KindMismatch { expected: ValueKind, found: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { text, kind } => {
                write!(f, "Cannot convert {:?} to {}", text, kind)
            }
            Self::NotANumber { text } => write!(f, "Value {:?} is not a number", text),
            Self::KindMismatch { expected, found } => {
                write!(f, "Expected {} from control, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// A warning-level event recorded by the registry.
///
/// Each diagnostic is also logged through the `log` facade. Diagnostics are
/// kept in a bounded ring and can be drained with
/// [`Registry::take_diagnostics`](crate::Registry::take_diagnostics).
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A second parameter was declared under an existing (group, name).
    DuplicateName { group: Group, name: String },
    /// A lookup missed.
    NotFound { group: Group, name: String },
    /// A lookup hit a destroyed parameter.
    Destroyed { group: Group, name: String },
    /// A lookup asked for the wrong value type.
    TypeMismatch {
        group: Group,
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// A control value was rejected during reconciliation.
    ConversionRejected {
        group: Group,
        name: String,
        error: ConversionError,
    },
    /// A bound control no longer exists on the surface.
    ControlMissing { group: Group, name: String },
}

impl Diagnostic {
    pub(crate) fn from_lookup_error(error: &RegistryError) -> Self {
        match error.clone() {
            RegistryError::NotFound { group, name } => Self::NotFound { group, name },
            RegistryError::Destroyed { group, name } => Self::Destroyed { group, name },
            RegistryError::TypeMismatch {
                group,
                name,
                expected,
                found,
            } => Self::TypeMismatch {
                group,
                name,
                expected,
                found,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { group, name } => {
                write!(f, "Duplicate parameter: {}/{}", group, name)
            }
            Self::NotFound { group, name } => {
                write!(f, "Looking for a parameter which doesn't exist: {}/{}", group, name)
            }
            Self::Destroyed { group, name } => {
                write!(f, "Looking for a destroyed parameter: {}/{}", group, name)
            }
            Self::TypeMismatch {
                group,
                name,
                expected,
                found,
            } => write!(
                f,
                "Parameter {}/{} requested as {} but holds {}",
                group, name, expected, found
            ),
            Self::ConversionRejected { group, name, error } => {
                write!(f, "Rejected control value for {}/{}: {}", group, name, error)
            }
            Self::ControlMissing { group, name } => {
                write!(f, "Control for {}/{} is gone from the surface", group, name)
            }
        }
    }
}
