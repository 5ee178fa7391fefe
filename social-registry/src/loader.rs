//! Bulk loading of clients from a JSON document.
//!
//! The document looks like:
//!
//! ```json
//! { "clients": [ { "name": "Ana", "score": 95, "following": ["Bob"], "connections": ["Bob"] } ] }
//! ```
//!
//! A load is all or nothing. Every record is checked before the first client
//! is created, so a bad record leaves the registry untouched. Loaded clients
//! are not recorded in the undo history.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use serde::Deserialize;
use tracing::{info, warn};

use crate::client::MAX_FOLLOWING;
use crate::error::{validate_name, validate_score, RegistryError, Result};
use crate::registry::SocialRegistry;

/// One client as it appears in a load file.
///
/// Files written with Spanish keys (`nombre`, `scoring`, `siguiendo`,
/// `conexiones`) are accepted as well.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientRecord {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "scoring")]
    pub score: i64,
    #[serde(default, alias = "siguiendo")]
    pub following: Vec<String>,
    #[serde(default, alias = "conexiones")]
    pub connections: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoadDocument {
    #[serde(default, alias = "clientes")]
    clients: Option<Vec<ClientRecord>>,
}

/// A reference in a record that pointed at a client that does not exist.
/// The reference is skipped; the rest of the record loads normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    MissingFollow { client: String, target: String },
    MissingConnection { client: String, target: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::MissingFollow { client, target } => {
                write!(f, "client '{client}' follows unknown client '{target}'")
            }
            LoadWarning::MissingConnection { client, target } => {
                write!(f, "client '{client}' is connected to unknown client '{target}'")
            }
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub warnings: Vec<LoadWarning>,
}

/// Parses a load document. A document without a `clients` array is empty.
pub fn parse_records(json: &str) -> AnyResult<Vec<ClientRecord>> {
    let document: Option<LoadDocument> =
        serde_json::from_str(json).context("invalid client data JSON")?;
    Ok(document.and_then(|d| d.clients).unwrap_or_default())
}

/// Reads and loads the JSON file at `path` into `registry`.
pub fn load_file(registry: &mut SocialRegistry, path: impl AsRef<Path>) -> AnyResult<LoadReport> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read client data from {}", path.display()))?;
    let records = parse_records(&json)?;
    let report = registry
        .load_records(records)
        .with_context(|| format!("failed to load client data from {}", path.display()))?;
    Ok(report)
}

impl SocialRegistry {
    /// Creates every client in `records`, then applies their follows, then
    /// their connections.
    ///
    /// Fails without changing anything if any record is invalid: blank
    /// name, negative score, more than [`MAX_FOLLOWING`] follows, a
    /// self-follow or repeated follow, a self-connection, or a name that is
    /// already taken. Follows and connections naming clients that do not
    /// exist after the load are skipped and reported as warnings.
    pub fn load_records(&mut self, records: Vec<ClientRecord>) -> Result<LoadReport> {
        let scores = self.validate_batch(&records)?;

        for (record, score) in records.iter().zip(scores) {
            self.insert_client(&record.name, score)?;
        }

        let mut report = LoadReport {
            loaded: records.len(),
            warnings: Vec::new(),
        };

        for record in &records {
            for target in &record.following {
                if !self.store.contains(target) {
                    report.warnings.push(LoadWarning::MissingFollow {
                        client: record.name.clone(),
                        target: target.clone(),
                    });
                    continue;
                }
                self.store.require_mut(&record.name)?.follow(target)?;
                self.store.require_mut(target)?.increment_followers();
            }
        }

        for record in &records {
            for target in &record.connections {
                if !self.store.contains(target) {
                    report.warnings.push(LoadWarning::MissingConnection {
                        client: record.name.clone(),
                        target: target.clone(),
                    });
                    continue;
                }
                self.connect(&record.name, target)?;
            }
        }

        for warning in &report.warnings {
            warn!(%warning, "skipped reference while loading");
        }
        info!(
            loaded = report.loaded,
            warnings = report.warnings.len(),
            "clients loaded"
        );
        Ok(report)
    }

    fn validate_batch(&self, records: &[ClientRecord]) -> Result<Vec<u32>> {
        let mut seen = HashSet::new();
        let mut scores = Vec::with_capacity(records.len());

        for record in records {
            let name = record.name.as_str();
            validate_name(name)?;
            scores.push(validate_score(name, record.score)?);

            if self.store.contains(name) || !seen.insert(name) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }

            if record.following.len() > MAX_FOLLOWING {
                return Err(RegistryError::TooManyFollows {
                    name: name.to_string(),
                    count: record.following.len(),
                });
            }
            let mut follows = HashSet::new();
            for target in &record.following {
                validate_name(target)?;
                if target == name {
                    return Err(RegistryError::SelfFollow(name.to_string()));
                }
                if !follows.insert(target.as_str()) {
                    return Err(RegistryError::AlreadyFollowing {
                        requester: name.to_string(),
                        target: target.clone(),
                    });
                }
            }

            for target in &record.connections {
                validate_name(target)?;
                if target == name {
                    return Err(RegistryError::SelfConnection(name.to_string()));
                }
            }
        }

        Ok(scores)
    }
}
