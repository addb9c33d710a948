//! Ad-hoc `key=value` command-line tokens.

use crate::errors::SourceError;
use std::collections::BTreeMap;

/// Collect `key=value` tokens into a map.
///
/// Tokens are split on the first `=`, both sides trimmed. A bare `key`
/// is a flag and maps to `"true"`.
pub fn parse_args<I, S>(tokens: I) -> Result<BTreeMap<String, String>, SourceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = BTreeMap::new();
    for token in tokens {
        let token = token.as_ref();
        let (key, value) = match token.find('=') {
            Some(idx) => (token[..idx].trim(), token[idx + 1..].trim()),
            None => (token.trim(), "true"),
        };

        if key.is_empty() {
            return Err(SourceError::EmptyArgumentKey {
                token: token.to_string(),
            });
        }
        if args.insert(key.to_string(), value.to_string()).is_some() {
            return Err(SourceError::DuplicateArgument {
                key: key.to_string(),
            });
        }
    }
    Ok(args)
}
