//! Error types for store assembly and field mapping.

use crate::descriptor::PathConstraint;
use crate::value::FieldTypeTag;
use std::path::PathBuf;

/// Failure while resolving `${name}` references.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubstitutionError {
    /// An opened `${` has no matching `}`.
    #[error("\"{value}\" has no closing brace, opening brace at position {position}")]
    UnterminatedVariableReference { value: String, position: usize },

    /// Nested resolution went deeper than the allowed bound.
    #[error("variable substitution in \"{value}\" exceeds {depth} nested levels, likely a cycle")]
    SubstitutionCycleExceeded { value: String, depth: usize },
}

/// Failure while populating a target from a store.
///
/// Every variant is fatal for the whole mapping pass.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("required property is missing '{key}'")]
    MissingRequiredProperty { key: String },

    #[error("invalid property '{key}': expected a number, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("invalid property '{key}': {value} is outside of [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("pattern '{pattern}' mismatch {key}={value}")]
    PatternMismatch {
        key: String,
        pattern: String,
        value: String,
    },

    #[error("{constraint}: {key}={}", path.display())]
    InvalidPath {
        key: String,
        path: PathBuf,
        constraint: PathConstraint,
    },

    #[error("invalid regular expression for '{key}'")]
    InvalidRegex {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("no field handler for '{field}' ({tag:?})")]
    UnresolvedHandler { field: String, tag: FieldTypeTag },

    #[error("cannot assign a {found:?} value to field '{field}' of type {expected:?}")]
    ValueTypeMismatch {
        field: String,
        expected: FieldTypeTag,
        found: FieldTypeTag,
    },

    #[error("failed to substitute variables in '{key}'")]
    Substitution {
        key: String,
        #[source]
        source: SubstitutionError,
    },
}

/// Failure while reading a key/value source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read properties from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedEscape { line: usize },

    #[error("empty key in argument '{token}'")]
    EmptyArgumentKey { token: String },

    #[error("duplicate key '{key}' in arguments")]
    DuplicateArgument { key: String },

    #[error("invalid event id for '{key}': '{value}'")]
    InvalidEventId { key: String, value: String },

    #[error("event id {id} assigned to both '{first}' and '{second}'")]
    DuplicateEventId {
        id: usize,
        first: String,
        second: String,
    },
}
