//! Undirected, unweighted graph of client connections.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::{validate_name, RegistryError, Result};

static NO_NEIGHBORS: BTreeSet<String> = BTreeSet::new();

/// Adjacency sets keyed by client name.
///
/// Every edge is stored in both directions and there are no self-loops.
/// A vertex can exist with an empty set, which is how freshly created
/// clients are registered.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    adjacency: HashMap<String, BTreeSet<String>>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex with no edges. Existing vertices are left alone.
    pub fn add_vertex(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.adjacency.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Adds the undirected edge `a`–`b`. Adding an existing edge is a no-op.
    ///
    /// Returns `true` if the edge is new.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<bool> {
        validate_name(a)?;
        validate_name(b)?;
        if a == b {
            return Err(RegistryError::SelfConnection(a.to_string()));
        }

        let added = self
            .adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
        if added {
            debug!(a, b, "connection added");
        }
        Ok(added)
    }

    /// Direct neighbors of `name`; empty when it has no edges.
    pub fn neighbors(&self, name: &str) -> Result<&BTreeSet<String>> {
        validate_name(name)?;
        Ok(self.adjacency.get(name).unwrap_or(&NO_NEIGHBORS))
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(b))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// Fewest hops from `origin` to `destination`, or `None` when they are
    /// in different components.
    ///
    /// Breadth-first search reaches every vertex first along a shortest
    /// path, so the first time `destination` is discovered is the answer.
    pub fn distance(&self, origin: &str, destination: &str) -> Result<Option<usize>> {
        validate_name(origin)?;
        validate_name(destination)?;
        if origin == destination {
            return Ok(Some(0));
        }
        for name in [origin, destination] {
            if !self.contains(name) {
                return Err(RegistryError::UnknownClient(name.to_string()));
            }
        }

        let mut visited = HashSet::from([origin]);
        let mut frontier = VecDeque::from([(origin, 0usize)]);

        while let Some((current, hops)) = frontier.pop_front() {
            for neighbor in self.adjacency.get(current).into_iter().flatten() {
                if !visited.insert(neighbor.as_str()) {
                    continue;
                }
                if neighbor == destination {
                    return Ok(Some(hops + 1));
                }
                frontier.push_back((neighbor.as_str(), hops + 1));
            }
        }

        Ok(None)
    }

    /// Drops a vertex together with every edge touching it.
    pub fn remove_vertex(&mut self, name: &str) -> bool {
        let Some(neighbors) = self.adjacency.remove(name) else {
            return false;
        };
        for neighbor in &neighbors {
            if let Some(back) = self.adjacency.get_mut(neighbor) {
                back.remove(name);
            }
        }
        debug!(name, edges = neighbors.len(), "vertex removed");
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Undirected edges, each counted once.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
