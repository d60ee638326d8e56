//! Read-only keyed tables populated once at startup.

use crate::error::{LoadError, LookupError};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Records that know the key they are stored under.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// An immutable string-keyed table that remembers definition order.
///
/// `get_all` and `list_keys` always return entries in the order they were
/// supplied, so formatted output stays reproducible.
#[derive(Debug, Clone)]
pub struct ResourceTable<R> {
    entries: Vec<(String, R)>,
    index: HashMap<String, usize>,
}

impl<R> ResourceTable<R> {
    /// Build a table from `(key, record)` pairs, refusing duplicate keys.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
    {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for (key, record) in entries {
            let key = key.into();
            if table.index.contains_key(&key) {
                return Err(LoadError::DuplicateKey(key));
            }
            table.index.insert(key.clone(), table.entries.len());
            table.entries.push((key, record));
        }
        Ok(table)
    }

    /// The record stored under `key`.
    pub fn get(&self, key: &str) -> Result<&R, LookupError> {
        self.find(key).ok_or_else(|| LookupError::NotFound {
            key: key.to_string(),
            available: self.list_keys(),
        })
    }

    /// Like [`get`](Self::get) for callers that treat absence as normal.
    pub fn find(&self, key: &str) -> Option<&R> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get_all(&self) -> Vec<&R> {
        self.records().collect()
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.keys().map(str::to_string).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Records matching `predicate`, in table order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&R>
    where
        P: FnMut(&R) -> bool,
    {
        self.records().filter(|r| predicate(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R: Keyed> ResourceTable<R> {
    /// Build a table keyed by each record's own key.
    pub fn from_records<I>(records: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = R>,
    {
        let pairs: Vec<(String, R)> = records
            .into_iter()
            .map(|r| (r.key().to_string(), r))
            .collect();
        Self::from_entries(pairs)
    }

    /// Fails if any record is stored under a key other than its own.
    pub fn check_keys(&self) -> Result<(), LoadError> {
        for (key, record) in &self.entries {
            if key != record.key() {
                return Err(LoadError::KeyMismatch {
                    key: key.clone(),
                    name: record.key().to_string(),
                });
            }
        }
        Ok(())
    }
}

// JSON objects are read in document order; serde_json's own map would sort them.
impl<'de, R> Deserialize<'de> for ResourceTable<R>
where
    R: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor<R>(PhantomData<R>);

        impl<'de, R> Visitor<'de> for TableVisitor<R>
        where
            R: Deserialize<'de>,
        {
            type Value = ResourceTable<R>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping keys to records")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, R)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, record)) = map.next_entry::<String, R>()? {
                    entries.push((key, record));
                }
                ResourceTable::from_entries(entries).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}
