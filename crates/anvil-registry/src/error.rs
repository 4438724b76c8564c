//! Registry and parameter-validation errors.

use std::error::Error as StdError;
use std::fmt;

use anvil_core::{ParamKind, ParamValue};
use thiserror::Error;

/// Boxed error returned by object builders.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// What was wrong with one option.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// A required option was not supplied.
    MissingRequired,
    /// The supplied value has the wrong kind.
    WrongKind {
        /// Kind the schema declares.
        expected: ParamKind,
        /// Kind that was supplied.
        found: ParamKind,
    },
    /// A numeric value lies outside the declared range.
    OutOfRange {
        /// The offending value.
        value: f64,
        /// Inclusive lower bound, if any.
        min: Option<f64>,
        /// Inclusive upper bound, if any.
        max: Option<f64>,
    },
    /// A string is not one of the enumerated choices.
    NotInSet {
        /// The offending value.
        value: String,
        /// Accepted choices, in declaration order.
        allowed: Vec<String>,
    },
    /// The option is not declared by the schema.
    UnknownOption,
    /// A list declared non-empty was empty.
    EmptyList,
    /// Two options declared same-length have different lengths.
    LengthMismatch {
        /// The other option of the pair.
        other: String,
        /// Length of this option.
        len: usize,
        /// Length of the other option.
        other_len: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "required option is missing"),
            Self::WrongKind { expected, found } => {
                write!(f, "expected a {expected} value, got a {found} value")
            }
            Self::OutOfRange { value, min, max } => {
                write!(f, "value {value} is outside ")?;
                match (min, max) {
                    (Some(lo), Some(hi)) => write!(f, "[{lo}, {hi}]"),
                    (Some(lo), None) => write!(f, "[{lo}, inf)"),
                    (None, Some(hi)) => write!(f, "(-inf, {hi}]"),
                    (None, None) => write!(f, "(-inf, inf)"),
                }
            }
            Self::NotInSet { value, allowed } => {
                write!(
                    f,
                    "'{value}' is not one of {}",
                    ParamValue::StrList(allowed.clone())
                )
            }
            Self::UnknownOption => write!(f, "option is not accepted by this type"),
            Self::EmptyList => write!(f, "list must not be empty"),
            Self::LengthMismatch {
                other,
                len,
                other_len,
            } => write!(
                f,
                "has {len} entries but '{other}' has {other_len}; they must match"
            ),
        }
    }
}

/// A single option failed schema validation.
///
/// Produced by [`ParamSchema::validate`](crate::ParamSchema::validate);
/// the registry adds the type and object names.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("option '{option}': {violation}")]
pub struct SchemaViolation {
    /// Option name.
    pub option: String,
    /// What was wrong with it.
    pub violation: Violation,
}

/// Errors from the [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type with this name is already registered.
    #[error("type '{name}' is already registered")]
    DuplicateType {
        /// Type name.
        name: String,
    },
    /// No type with this name is registered.
    #[error("unknown object type '{name}'")]
    UnknownType {
        /// Type name.
        name: String,
    },
    /// The supplied parameters do not satisfy the type's schema.
    #[error("invalid parameters for {type_name} '{object_name}': option '{option}': {violation}")]
    ParameterValidation {
        /// Registered type name.
        type_name: String,
        /// User-facing object name.
        object_name: String,
        /// Offending option.
        option: String,
        /// What was wrong with it.
        violation: Violation,
    },
    /// The builder rejected validated parameters.
    #[error("failed to build {type_name} '{object_name}': {source}")]
    BuildFailed {
        /// Registered type name.
        type_name: String,
        /// User-facing object name.
        object_name: String,
        /// Builder error.
        #[source]
        source: BoxError,
    },
}

impl RegistryError {
    pub(crate) fn validation(type_name: &str, object_name: &str, err: SchemaViolation) -> Self {
        Self::ParameterValidation {
            type_name: type_name.to_string(),
            object_name: object_name.to_string(),
            option: err.option,
            violation: err.violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_violation_renders_bounds() {
        let v = Violation::OutOfRange {
            value: -1.0,
            min: Some(0.0),
            max: None,
        };
        assert_eq!(v.to_string(), "value -1 is outside [0, inf)");
    }

    #[test]
    fn parameter_validation_names_type_object_and_option() {
        let err = RegistryError::ParameterValidation {
            type_name: "Diffusion".into(),
            object_name: "diff".into(),
            option: "variable".into(),
            violation: Violation::MissingRequired,
        };
        assert_eq!(
            err.to_string(),
            "invalid parameters for Diffusion 'diff': option 'variable': required option is missing"
        );
    }

    #[test]
    fn not_in_set_lists_choices() {
        let v = Violation::NotInSet {
            value: "cubic".into(),
            allowed: vec!["linear".into(), "quadratic".into()],
        };
        assert_eq!(v.to_string(), "'cubic' is not one of 'linear quadratic'");
    }
}
