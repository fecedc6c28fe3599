//! In-memory registry backend and interpreter source

use async_trait::async_trait;
use interp_platform::{
    Architecture, Hive, InterpreterRecord, InterpreterSource, RegistryBackend, RegistryError,
    RegistryQuery, RegistryValue,
};
use std::collections::HashMap;
use std::sync::Mutex;

type KeyId = (Hive, Option<Architecture>, String);

#[derive(Debug, Default, Clone)]
struct Node {
    subkeys: Vec<String>,
    values: HashMap<String, RegistryValue>,
}

/// [`RegistryBackend`] over an in-memory key tree.
///
/// Keys are matched case-insensitively per `(hive, architecture)` view.
/// A key that was never added answers [`RegistryError::KeyNotFound`];
/// a failing registry answers [`RegistryError::Backend`] for everything.
#[derive(Debug, Default)]
pub struct StubRegistry {
    nodes: HashMap<KeyId, Node>,
    failing: bool,
    queries: Mutex<usize>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Declare `key` with the given subkey names.
    pub fn with_key(
        mut self,
        hive: Hive,
        arch: Option<Architecture>,
        key: &str,
        subkeys: &[&str],
    ) -> Self {
        let node = self.nodes.entry(id(hive, arch, key)).or_default();
        node.subkeys.extend(subkeys.iter().map(|s| s.to_string()));
        self
    }

    /// Set a `REG_SZ` value under `key` (`""` is the default value).
    pub fn with_value(
        self,
        hive: Hive,
        arch: Option<Architecture>,
        key: &str,
        name: &str,
        data: &str,
    ) -> Self {
        self.with_typed_value(hive, arch, key, name, RegistryValue::String(data.to_string()))
    }

    pub fn with_typed_value(
        mut self,
        hive: Hive,
        arch: Option<Architecture>,
        key: &str,
        name: &str,
        value: RegistryValue,
    ) -> Self {
        let node = self.nodes.entry(id(hive, arch, key)).or_default();
        node.values.insert(name.to_ascii_lowercase(), value);
        self
    }

    pub fn query_count(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    fn lookup(&self, query: &RegistryQuery) -> Result<&Node, RegistryError> {
        *self.queries.lock().unwrap() += 1;
        if self.failing {
            return Err(RegistryError::backend(query.full_key(), "stub backend failure"));
        }
        self.nodes
            .get(&id(query.hive, query.arch, &query.key))
            .ok_or_else(|| RegistryError::KeyNotFound {
                key: query.full_key(),
            })
    }
}

fn id(hive: Hive, arch: Option<Architecture>, key: &str) -> KeyId {
    (hive, arch, key.trim_matches('\\').to_ascii_lowercase())
}

#[async_trait]
impl RegistryBackend for StubRegistry {
    async fn subkeys(&self, query: &RegistryQuery) -> Result<Vec<String>, RegistryError> {
        Ok(self.lookup(query)?.subkeys.clone())
    }

    async fn value(
        &self,
        query: &RegistryQuery,
        name: &str,
    ) -> Result<Option<RegistryValue>, RegistryError> {
        Ok(self
            .lookup(query)?
            .values
            .get(&name.to_ascii_lowercase())
            .cloned())
    }
}

/// [`InterpreterSource`] returning a fixed list.
#[derive(Debug, Default)]
pub struct StubInterpreterSource {
    records: Vec<InterpreterRecord>,
    listings: Mutex<usize>,
}

impl StubInterpreterSource {
    pub fn new(records: Vec<InterpreterRecord>) -> Self {
        Self {
            records,
            listings: Mutex::new(0),
        }
    }

    pub fn listing_count(&self) -> usize {
        *self.listings.lock().unwrap()
    }
}

#[async_trait]
impl InterpreterSource for StubInterpreterSource {
    async fn interpreters(&self) -> Vec<InterpreterRecord> {
        *self.listings.lock().unwrap() += 1;
        self.records.clone()
    }
}
