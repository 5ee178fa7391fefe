//! The client entity and its local invariants.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{RegistryError, Result};

/// Maximum number of clients a single client may follow.
pub const MAX_FOLLOWING: usize = 2;

/// A registered member of the network.
///
/// Clients refer to each other by name only. The store owns every `Client`;
/// the tree and graph hold names and look clients up when they need data.
///
/// `BTreeSet` keeps `following` and `connections` in a stable order so
/// snapshots and console output do not reshuffle between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    name: String,
    score: u32,
    following: BTreeSet<String>,
    connections: BTreeSet<String>,
    followers: u32,
}

impl Client {
    pub(crate) fn new(name: String, score: u32) -> Self {
        Self {
            name,
            score,
            following: BTreeSet::new(),
            connections: BTreeSet::new(),
            followers: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn following(&self) -> &BTreeSet<String> {
        &self.following
    }

    pub fn connections(&self) -> &BTreeSet<String> {
        &self.connections
    }

    pub fn followers(&self) -> u32 {
        self.followers
    }

    pub fn is_following(&self, name: &str) -> bool {
        self.following.contains(name)
    }

    /// Checks whether `target` could be added to this client's follows
    /// without mutating anything.
    pub(crate) fn check_follow(&self, target: &str) -> Result<()> {
        if self.name == target {
            return Err(RegistryError::SelfFollow(self.name.clone()));
        }
        if self.following.contains(target) {
            return Err(RegistryError::AlreadyFollowing {
                requester: self.name.clone(),
                target: target.to_string(),
            });
        }
        if self.following.len() >= MAX_FOLLOWING {
            return Err(RegistryError::FollowCapacityExceeded(self.name.clone()));
        }
        Ok(())
    }

    pub(crate) fn follow(&mut self, target: &str) -> Result<()> {
        self.check_follow(target)?;
        self.following.insert(target.to_string());
        Ok(())
    }

    pub(crate) fn unfollow(&mut self, target: &str) -> bool {
        self.following.remove(target)
    }

    pub(crate) fn add_connection(&mut self, name: &str) {
        self.connections.insert(name.to_string());
    }

    pub(crate) fn remove_connection(&mut self, name: &str) -> bool {
        self.connections.remove(name)
    }

    pub(crate) fn increment_followers(&mut self) {
        self.followers = self.followers.saturating_add(1);
    }

    pub(crate) fn decrement_followers(&mut self) {
        self.followers = self.followers.saturating_sub(1);
    }
}
