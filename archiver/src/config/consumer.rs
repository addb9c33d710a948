//! Consumer-side settings: offset policy and secondary consumer properties.

use commons::prelude_errors::*;
use propmap::{MappingError, PropertyDescriptor, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Accepted values for `consumer.offset`.
pub static OFFSET_POLICIES: &[&str] = &["seektoend", "seektobeginning", "committed"];

/// Handler override for the consumer offset policy, case-insensitive.
pub fn offset_policy(
    value: &str,
    _: &PropertyDescriptor,
    key: &str,
) -> Result<Value, MappingError> {
    let policy = value.to_ascii_lowercase();
    if !OFFSET_POLICIES.contains(&policy.as_str()) {
        return Err(MappingError::PatternMismatch {
            key: key.to_string(),
            pattern: OFFSET_POLICIES.join("|"),
            value: value.to_string(),
        });
    }
    Ok(Value::String(policy))
}

/// Load consumer properties from `consumer_config`, relative to the main config file.
///
/// Without a main config file there is nothing to resolve against, and
/// an empty table is returned.
pub fn load_properties(
    config_path: Option<&Path>,
    consumer_config: &str,
) -> Fallible<BTreeMap<String, String>> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            warn!("config file not provided, not loading consumer properties");
            return Ok(BTreeMap::new());
        }
    };

    let path = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(consumer_config);
    let entries = propmap::properties::read_filepath(&path)
        .with_context(|| format!("failed to load consumer properties {}", path.display()))?;
    debug!("loaded {} consumer properties", entries.len());

    Ok(entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("seektoend", "seektoend"; "seek to end")]
    #[test_case("SeekToBeginning", "seektobeginning"; "mixed case")]
    #[test_case("committed", "committed"; "committed")]
    fn valid_offset_policy(input: &str, expected: &str) {
        let value = offset_policy(input, &PropertyDescriptor::new(), "consumer.offset").unwrap();
        let policy: String = value.into_typed("consumer_offset").unwrap();
        assert_eq!(policy, expected);
    }

    #[test_case("latest"; "unknown policy")]
    #[test_case(""; "empty")]
    #[test_case("seek to end"; "spaced words")]
    fn invalid_offset_policy(input: &str) {
        let err = offset_policy(input, &PropertyDescriptor::new(), "consumer.offset").unwrap_err();
        assert!(matches!(err, MappingError::PatternMismatch { .. }));
    }

    #[test]
    fn properties_relative_to_config() {
        let config = Path::new("tests/fixtures/archiver.properties");
        let props = load_properties(Some(config), "consumer.properties").unwrap();
        assert_eq!(props.get("group.id").map(String::as_str), Some("archiver"));
        assert_eq!(
            props.get("bootstrap.servers").map(String::as_str),
            Some("kafka-1:9092,kafka-2:9092")
        );
    }

    #[test]
    fn no_config_file() {
        let props = load_properties(None, "consumer.properties").unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn missing_consumer_file() {
        let config = Path::new("tests/fixtures/archiver.properties");
        load_properties(Some(config), "missing.properties").unwrap_err();
    }
}
