//! Owning storage for clients with a name index and a score index.
//!
//! The name index answers point lookups; the score index is a sorted map
//! of score buckets so range queries walk only the buckets they return.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::client::Client;
use crate::error::{RegistryError, Result};

/// Primary store for every [`Client`].
///
/// Buckets in `by_score` are never empty: removing the last name of a score
/// drops the bucket, so `by_score.len()` is the number of distinct scores.
#[derive(Debug, Default)]
pub struct ClientStore {
    by_name: HashMap<String, Client>,
    by_score: BTreeMap<u32, BTreeSet<String>>,
}

impl ClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new client, refusing to overwrite an existing name.
    pub fn insert(&mut self, client: Client) -> Result<()> {
        if self.by_name.contains_key(client.name()) {
            return Err(RegistryError::DuplicateName(client.name().to_string()));
        }

        self.by_score
            .entry(client.score())
            .or_default()
            .insert(client.name().to_string());
        debug!(name = client.name(), score = client.score(), "client stored");
        self.by_name.insert(client.name().to_string(), client);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Client> {
        self.by_name.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Client> {
        self.by_name.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Looks up a client that must exist.
    pub(crate) fn require(&self, name: &str) -> Result<&Client> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownClient(name.to_string()))
    }

    pub(crate) fn require_mut(&mut self, name: &str) -> Result<&mut Client> {
        self.get_mut(name)
            .ok_or_else(|| RegistryError::UnknownClient(name.to_string()))
    }

    /// Removes a client from both indices, dropping its score bucket if it
    /// becomes empty.
    pub(crate) fn remove(&mut self, name: &str) -> Option<Client> {
        let client = self.by_name.remove(name)?;
        if let Some(bucket) = self.by_score.get_mut(&client.score()) {
            bucket.remove(name);
            if bucket.is_empty() {
                self.by_score.remove(&client.score());
            }
        }
        debug!(name, "client removed");
        Some(client)
    }

    /// Clients with exactly `score`, ordered by name.
    pub fn with_score(&self, score: u32) -> Vec<&Client> {
        self.by_score
            .get(&score)
            .map(|names| self.resolve(names))
            .unwrap_or_default()
    }

    /// Clients whose score lies in `min..=max`, ascending by score.
    ///
    /// An inverted range yields nothing rather than panicking.
    pub fn in_range(&self, min: u32, max: u32) -> Vec<&Client> {
        if min > max {
            return Vec::new();
        }
        self.by_score
            .range(min..=max)
            .flat_map(|(_, names)| self.resolve(names))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Number of distinct scores currently indexed.
    pub fn score_buckets(&self) -> usize {
        self.by_score.len()
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.by_name.values()
    }

    pub(crate) fn clients_mut(&mut self) -> impl Iterator<Item = &mut Client> {
        self.by_name.values_mut()
    }

    pub fn score_index(&self) -> &BTreeMap<u32, BTreeSet<String>> {
        &self.by_score
    }

    fn resolve<'a>(&'a self, names: &'a BTreeSet<String>) -> Vec<&'a Client> {
        names.iter().filter_map(|name| self.by_name.get(name)).collect()
    }
}
