//! `${name}` variable substitution.
//!
//! References are resolved against a [`Store`], recursively, so that a
//! value may point to another value which itself holds references.
//! Unknown names expand to nothing. Lookups are bounded to reject cycles.

use crate::errors::SubstitutionError;
use crate::store::Store;
use std::borrow::Cow;

static DELIM_START: &str = "${";
static DELIM_STOP: char = '}';

/// Maximum number of lookups along one resolution chain before giving up.
///
/// Every resolved reference counts, siblings included, and nested values
/// inherit the count of the lookup that led to them.
pub const MAX_SUBSTITUTION_DEPTH: usize = 100;

/// Substitute all `${name}` references in `value`.
///
/// Input without any reference is returned borrowed, as-is.
pub fn substitute<'a>(value: &'a str, store: &Store) -> Result<Cow<'a, str>, SubstitutionError> {
    substitute_bounded(value, store, 0)
}

fn substitute_bounded<'a>(
    value: &'a str,
    store: &Store,
    depth: usize,
) -> Result<Cow<'a, str>, SubstitutionError> {
    if depth > MAX_SUBSTITUTION_DEPTH {
        return Err(SubstitutionError::SubstitutionCycleExceeded {
            value: value.to_string(),
            depth: MAX_SUBSTITUTION_DEPTH,
        });
    }

    if !value.contains(DELIM_START) {
        return Ok(Cow::Borrowed(value));
    }

    let mut depth = depth;
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;
    while let Some(offset) = value[cursor..].find(DELIM_START) {
        let start = cursor + offset;
        out.push_str(&value[cursor..start]);

        let stop = match value[start..].find(DELIM_STOP) {
            Some(offset) => start + offset,
            None => {
                return Err(SubstitutionError::UnterminatedVariableReference {
                    value: value.to_string(),
                    position: start,
                })
            }
        };

        let key = &value[start + DELIM_START.len()..stop];
        match store.get(key) {
            Some(replacement) => {
                depth += 1;
                let resolved = substitute_bounded(replacement, store, depth)?;
                out.push_str(&resolved);
            }
            None => trace!("no value for variable '{}', dropping reference", key),
        }
        cursor = stop + DELIM_STOP.len_utf8();
    }
    out.push_str(&value[cursor..]);

    Ok(Cow::Owned(out))
}
