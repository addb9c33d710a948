//! Dense event table from sparse `event.<name>=<id>` entries.

use crate::errors::SourceError;
use crate::store::Store;

/// Key prefix of event declarations.
pub static EVENT_PREFIX: &str = "event.";

/// Largest accepted event id.
pub const MAX_EVENT_ID: usize = u16::MAX as usize;

/// Build a table indexed by event id, holding event names.
///
/// Ids not declared by any entry are `None`. Ids conventionally start
/// at 1, leaving slot 0 empty.
pub fn event_table(store: &Store) -> Result<Vec<Option<String>>, SourceError> {
    let mut table: Vec<Option<String>> = Vec::new();

    for (name, raw_id) in store.with_prefix(EVENT_PREFIX) {
        let id = raw_id
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|id| *id <= MAX_EVENT_ID)
            .ok_or_else(|| SourceError::InvalidEventId {
                key: format!("{}{}", EVENT_PREFIX, name),
                value: raw_id.to_string(),
            })?;

        if id >= table.len() {
            table.resize(id + 1, None);
        }
        if let Some(first) = &table[id] {
            return Err(SourceError::DuplicateEventId {
                id,
                first: first.clone(),
                second: name.to_string(),
            });
        }
        table[id] = Some(name.to_string());
    }

    debug!("event table has {} slots", table.len());
    Ok(table)
}
