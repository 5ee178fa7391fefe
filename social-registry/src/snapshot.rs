//! Point-in-time report of the whole registry, ready for serialization.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::Client;
use crate::registry::SocialRegistry;
use crate::requests::FollowRequest;

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub client_count: usize,
    pub pending_requests: usize,
    pub history_len: usize,
    pub tree: TreeSummary,
    pub graph: GraphSummary,
    /// Highest score first; equal scores by name.
    pub clients: Vec<&'a Client>,
    pub score_index: BTreeMap<u32, Vec<&'a str>>,
    pub queue: Vec<&'a FollowRequest>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TreeSummary {
    pub size: usize,
    pub nodes: usize,
    pub height: i64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
}

impl SocialRegistry {
    pub fn snapshot(&self) -> Snapshot<'_> {
        let mut clients: Vec<&Client> = self.store().clients().collect();
        clients.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.name().cmp(b.name())));

        let score_index = self
            .store()
            .score_index()
            .iter()
            .map(|(score, names)| (*score, names.iter().map(String::as_str).collect()))
            .collect();

        Snapshot {
            client_count: self.count(),
            pending_requests: self.pending_count(),
            history_len: self.history_len(),
            tree: TreeSummary {
                size: self.tree().len(),
                nodes: self.tree().node_count(),
                height: self.tree_height(),
            },
            graph: GraphSummary {
                vertices: self.graph().vertex_count(),
                edges: self.edge_count(),
            },
            clients,
            score_index,
            queue: self.pending_requests().collect(),
        }
    }
}
