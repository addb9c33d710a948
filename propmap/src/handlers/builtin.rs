//! Handlers for scalar, string-list and regex fields.

use crate::descriptor::PropertyDescriptor;
use crate::errors::MappingError;
use crate::value::Value;
use regex::Regex;

/// Base-10 signed integer within the descriptor's inclusive bounds.
pub fn integer(value: &str, desc: &PropertyDescriptor, key: &str) -> Result<Value, MappingError> {
    let number: i32 = value.parse().map_err(|_| MappingError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })?;

    let (min, max) = desc.bounds();
    if number < min || number > max {
        return Err(MappingError::OutOfRange {
            key: key.to_string(),
            value: number,
            min,
            max,
        });
    }

    Ok(Value::Integer(number))
}

/// `true` in any letter case is true, anything else is false.
pub fn boolean(value: &str, _: &PropertyDescriptor, _: &str) -> Result<Value, MappingError> {
    Ok(Value::Boolean(value.eq_ignore_ascii_case("true")))
}

/// String value, matched as a whole against the declared pattern if any.
pub fn string(value: &str, desc: &PropertyDescriptor, key: &str) -> Result<Value, MappingError> {
    if let Some(pattern) = desc.get_pattern() {
        let anchored = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            MappingError::InvalidRegex {
                key: key.to_string(),
                source,
            }
        })?;
        if !anchored.is_match(value) {
            return Err(MappingError::PatternMismatch {
                key: key.to_string(),
                pattern: pattern.to_string(),
                value: value.to_string(),
            });
        }
    }

    Ok(Value::String(value.to_string()))
}

/// Delimiter-separated strings, trimmed, empty tokens dropped.
pub fn list_of_string(
    value: &str,
    desc: &PropertyDescriptor,
    _: &str,
) -> Result<Value, MappingError> {
    Ok(Value::ListOfString(commons::split_list(
        value,
        desc.get_delimiter(),
    )))
}

/// Compiled regular expression.
pub fn regex_pattern(
    value: &str,
    _: &PropertyDescriptor,
    key: &str,
) -> Result<Value, MappingError> {
    let regex = Regex::new(value).map_err(|source| MappingError::InvalidRegex {
        key: key.to_string(),
        source,
    })?;
    Ok(Value::RegexPattern(regex))
}
