//! Typed values produced by field handlers.

use crate::errors::MappingError;
use regex::Regex;
use std::path::PathBuf;

/// Declared type of a mappable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldTypeTag {
    Integer,
    Boolean,
    String,
    Path,
    ListOfString,
    ListOfPath,
    RegexPattern,
}

/// A parsed and validated field value.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i32),
    Boolean(bool),
    String(String),
    Path(PathBuf),
    ListOfString(Vec<String>),
    ListOfPath(Vec<PathBuf>),
    RegexPattern(Regex),
}

impl Value {
    /// Type tag matching this value.
    pub fn tag(&self) -> FieldTypeTag {
        match self {
            Value::Integer(_) => FieldTypeTag::Integer,
            Value::Boolean(_) => FieldTypeTag::Boolean,
            Value::String(_) => FieldTypeTag::String,
            Value::Path(_) => FieldTypeTag::Path,
            Value::ListOfString(_) => FieldTypeTag::ListOfString,
            Value::ListOfPath(_) => FieldTypeTag::ListOfPath,
            Value::RegexPattern(_) => FieldTypeTag::RegexPattern,
        }
    }

    /// Convert into the Rust type backing `field`.
    pub fn into_typed<T: FromValue>(self, field: &str) -> Result<T, MappingError> {
        let found = self.tag();
        T::from_value(self).ok_or_else(|| MappingError::ValueTypeMismatch {
            field: field.to_string(),
            expected: T::TAG,
            found,
        })
    }
}

/// Rust types that a [`Value`] can be assigned to.
pub trait FromValue: Sized {
    /// Tag of the values accepted by this type.
    const TAG: FieldTypeTag;

    /// Extract a typed value, or `None` on type mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ( $ty:ty, $variant:ident ) => {
        impl FromValue for $ty {
            const TAG: FieldTypeTag = FieldTypeTag::$variant;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(i32, Integer);
impl_from_value!(bool, Boolean);
impl_from_value!(String, String);
impl_from_value!(PathBuf, Path);
impl_from_value!(Vec<String>, ListOfString);
impl_from_value!(Vec<PathBuf>, ListOfPath);
impl_from_value!(Regex, RegexPattern);

/// Optional fields hold `None` until the mapper assigns them.
impl<T: FromValue> FromValue for Option<T> {
    const TAG: FieldTypeTag = T::TAG;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }
}
