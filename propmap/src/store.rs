//! Merged, read-only key/value store.

use crate::errors::SourceError;
use crate::properties;
use std::collections::{BTreeMap, HashMap};
use std::iter::FromIterator;
use std::path::Path;

/// String-keyed configuration entries assembled from ordered sources.
///
/// Sources are layered in the order they are added to a [`StoreBuilder`];
/// a later source replaces the value of a key already present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Store {
    entries: HashMap<String, String>,
}

impl Store {
    /// Start layering sources into a new store.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Look up a key. Absence is not an error.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose key starts with `prefix`, with the prefix stripped, sorted by key.
    pub fn with_prefix<'a>(&'a self, prefix: &str) -> BTreeMap<&'a str, &'a str> {
        self.entries
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(prefix).map(|rest| (rest, v.as_str())))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Store
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Store::builder().entries(iter).build()
    }
}

/// Accumulates sources for a [`Store`]. Last write wins.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    entries: HashMap<String, String>,
}

impl StoreBuilder {
    /// Layer in-memory entries.
    pub fn entries<I, K, V>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let before = self.entries.len();
        let mut count = 0;
        for (k, v) in iter {
            self.entries.insert(k.into(), v.into());
            count += 1;
        }
        trace!(
            "layered {} entries ({} new keys)",
            count,
            self.entries.len() - before
        );
        self
    }

    /// Layer the entries of a properties file.
    pub fn properties_file<P>(self, path: P) -> Result<Self, SourceError>
    where
        P: AsRef<Path>,
    {
        let entries = properties::read_filepath(&path)?;
        debug!(
            "loaded {} properties from {}",
            entries.len(),
            path.as_ref().display()
        );
        Ok(self.entries(entries))
    }

    /// Layer all process environment variables, keys taken verbatim.
    pub fn environment(self) -> Self {
        // Variables with non-unicode names or values cannot be looked up by key anyway.
        let vars: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        debug!("layering {} environment variables", vars.len());
        self.entries(vars)
    }

    /// Freeze into an immutable store.
    pub fn build(self) -> Store {
        Store {
            entries: self.entries,
        }
    }
}
