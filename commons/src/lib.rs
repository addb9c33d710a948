//! Common utilities shared by the property-mapping crates.

#![deny(missing_docs)]

mod config;
pub use crate::config::MergeOptions;

pub mod de;
pub mod testing;

mod errors;

/// Commonly used imports for error handling.
pub mod prelude_errors {
    pub use crate::errors::prelude::*;
}

/// Parse a delimiter-separated list, trimming entries and dropping empty ones.
///
/// Order is preserved and duplicates are kept.
pub fn split_list<S>(input: S, delimiter: &str) -> Vec<String>
where
    S: AsRef<str>,
{
    input
        .as_ref()
        .split(delimiter)
        .filter_map(|token| {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
