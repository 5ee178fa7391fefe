//! The registry façade: one owner for every structure in the crate.
//!
//! [`SocialRegistry`] is the only type outer layers mutate. Each operation
//! validates its input in full before touching any structure, so a failed
//! call leaves the registry exactly as it was. Operations that can be taken
//! back push an [`Action`] onto the history, and [`SocialRegistry::undo`]
//! reverses the newest one.
//!
//! All mutating methods take `&mut self`. A host that wants to share a
//! registry between tasks has to put the whole thing behind one lock; the
//! structures are not meant to be guarded separately.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::{validate_name, RegistryError, Result};
use crate::graph::ConnectionGraph;
use crate::history::{Action, ActionHistory, ActionKind};
use crate::requests::{FollowRequest, FollowRequestQueue};
use crate::store::ClientStore;
use crate::tree::ScoreTree;

/// Tree depth inspected by [`SocialRegistry::level_four_by_followers`].
pub const FOLLOWER_SHOWCASE_DEPTH: usize = 4;

#[derive(Debug, Default)]
pub struct SocialRegistry {
    pub(crate) store: ClientStore,
    history: ActionHistory,
    requests: FollowRequestQueue,
    pub(crate) tree: ScoreTree,
    pub(crate) graph: ConnectionGraph,
}

impl SocialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- clients ----

    /// Creates a client and records the creation so it can be undone.
    pub fn add_client(&mut self, name: &str, score: u32) -> Result<()> {
        self.insert_client(name, score)?;
        self.history.record(Action::add_client(name));
        info!(name, score, "client added");
        Ok(())
    }

    /// Creates a client in every structure without recording history.
    pub(crate) fn insert_client(&mut self, name: &str, score: u32) -> Result<()> {
        validate_name(name)?;
        if self.store.contains(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        self.store.insert(Client::new(name.to_string(), score))?;
        self.tree.insert(name, score);
        self.graph.add_vertex(name)?;
        Ok(())
    }

    pub fn client(&self, name: &str) -> Option<&Client> {
        self.store.get(name)
    }

    /// Clients scoring between `min` and `max` inclusive, ascending by score.
    pub fn clients_in_range(&self, min: u32, max: u32) -> Vec<&Client> {
        self.store.in_range(min, max)
    }

    pub fn clients_with_score(&self, score: u32) -> Vec<&Client> {
        self.store.with_score(score)
    }

    pub fn count(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &ClientStore {
        &self.store
    }

    // ---- follow requests ----

    /// Queues a request from `requester` to follow `target`.
    ///
    /// Only checks that both clients exist. Follow rules are enforced when
    /// the request is confirmed.
    pub fn request_follow(&mut self, requester: &str, target: &str) -> Result<()> {
        validate_name(requester)?;
        validate_name(target)?;
        self.store.require(requester)?;
        self.store.require(target)?;

        let request = FollowRequest::new(requester, target);
        self.requests.enqueue(request.clone());
        self.history.record(Action::request_follow(request));
        debug!(requester, target, pending = self.requests.len(), "follow requested");
        Ok(())
    }

    /// Takes the oldest pending request off the queue. Not undoable.
    pub fn process_next_request(&mut self) -> Option<FollowRequest> {
        self.requests.dequeue()
    }

    /// Applies a follow: `requester` starts following `target`, whose
    /// follower count goes up by one.
    pub fn confirm_follow(&mut self, requester: &str, target: &str) -> Result<()> {
        validate_name(requester)?;
        validate_name(target)?;
        self.store.require(target)?;
        self.store.require_mut(requester)?.follow(target)?;
        self.store.require_mut(target)?.increment_followers();
        info!(requester, target, "follow confirmed");
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.requests.len()
    }

    pub fn pending_requests(&self) -> impl Iterator<Item = &FollowRequest> {
        self.requests.iter()
    }

    // ---- history ----

    /// Reverses the most recent recorded action and returns it, or
    /// `Ok(None)` when there is nothing left to undo.
    pub fn undo(&mut self) -> Result<Option<Action>> {
        let Some(action) = self.history.pop() else {
            return Ok(None);
        };

        match &action.kind {
            ActionKind::AddClient(name) => self.remove_client(name),
            ActionKind::RequestFollow(request) => self.retract_request(request)?,
        }
        info!(action = action.label(), detail = %action.detail, "undone");
        Ok(Some(action))
    }

    /// Up to `limit` recorded actions, newest first.
    pub fn history(&self, limit: usize) -> Vec<&Action> {
        self.history.recent(limit).collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Removes a client from every structure along with every reference
    /// other clients hold to it.
    fn remove_client(&mut self, name: &str) {
        let Some(removed) = self.store.remove(name) else {
            warn!(name, "undo of a client that is no longer stored");
            return;
        };

        self.tree.remove(name, removed.score());
        self.graph.remove_vertex(name);

        for followed in removed.following() {
            if let Some(client) = self.store.get_mut(followed) {
                client.decrement_followers();
            }
        }
        for client in self.store.clients_mut() {
            client.unfollow(name);
            client.remove_connection(name);
        }
        debug!(name, "client removed by undo");
    }

    fn retract_request(&mut self, expected: &FollowRequest) -> Result<()> {
        let Some(last) = self.requests.retract_last() else {
            warn!(request = %expected, "undo found the follow queue empty");
            return Err(RegistryError::HistoryCorruption(format!(
                "expected to retract '{expected}' but the follow queue is empty"
            )));
        };

        if &last != expected {
            warn!(expected = %expected, found = %last, "follow queue tail does not match history");
            let message =
                format!("expected to retract '{expected}' but the queue tail was '{last}'");
            self.requests.restore_last(last);
            return Err(RegistryError::HistoryCorruption(message));
        }
        Ok(())
    }

    // ---- score tree ----

    /// Clients stored at `depth` of the score tree, left to right.
    pub fn clients_at_depth(&self, depth: usize) -> Vec<&Client> {
        self.resolve(self.tree.at_depth(depth))
    }

    /// Clients at depth four of the score tree, most followed first. Ties
    /// keep their left-to-right tree order.
    pub fn level_four_by_followers(&self) -> Vec<&Client> {
        let mut clients = self.clients_at_depth(FOLLOWER_SHOWCASE_DEPTH);
        clients.sort_by(|a, b| b.followers().cmp(&a.followers()));
        clients
    }

    /// Every client in ascending score order, read from the tree.
    pub fn clients_by_tree_order(&self) -> Vec<&Client> {
        self.resolve(self.tree.inorder())
    }

    pub fn tree_height(&self) -> i64 {
        self.tree.height()
    }

    pub fn tree(&self) -> &ScoreTree {
        &self.tree
    }

    // ---- connections ----

    /// Connects two existing clients in both directions. Returns `false` if
    /// they were already connected.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<bool> {
        validate_name(a)?;
        validate_name(b)?;
        if a == b {
            return Err(RegistryError::SelfConnection(a.to_string()));
        }
        self.store.require(a)?;
        self.store.require(b)?;

        let added = self.graph.connect(a, b)?;
        self.store.require_mut(a)?.add_connection(b);
        self.store.require_mut(b)?.add_connection(a);
        Ok(added)
    }

    pub fn neighbors(&self, name: &str) -> Result<&BTreeSet<String>> {
        self.graph.neighbors(name)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.graph.has_edge(a, b)
    }

    /// Hop count between two clients, `None` if no path joins them.
    pub fn distance(&self, origin: &str, destination: &str) -> Result<Option<usize>> {
        self.graph.distance(origin, destination)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    fn resolve<'a>(&'a self, names: Vec<&str>) -> Vec<&'a Client> {
        names
            .into_iter()
            .filter_map(|name| self.store.get(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn names(clients: Vec<&Client>) -> Vec<&str> {
        clients.into_iter().map(Client::name).collect()
    }

    #[test]
    fn add_validates_before_mutating() {
        let mut registry = SocialRegistry::new();
        assert!(matches!(
            registry.add_client("  ", 10),
            Err(RegistryError::InvalidName(_))
        ));
        registry.add_client("ana", 95).expect("add ana");
        let err = registry.add_client("ana", 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.tree().len(), 1);
        assert_eq!(registry.graph().vertex_count(), 1);
        assert_eq!(registry.history_len(), 1);
    }

    #[test]
    fn request_follow_requires_existing_clients() {
        let mut registry = SocialRegistry::new();
        registry.add_client("ana", 95).expect("add ana");

        assert_eq!(
            registry.request_follow("ana", "bob"),
            Err(RegistryError::UnknownClient("bob".into()))
        );
        assert!(matches!(
            registry.request_follow("", "ana"),
            Err(RegistryError::InvalidName(_))
        ));
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.history_len(), 1);
    }

    #[test]
    fn confirm_follow_updates_both_sides() {
        let mut registry = SocialRegistry::new();
        registry.add_client("ana", 95).expect("add ana");
        registry.add_client("bob", 80).expect("add bob");

        registry.confirm_follow("ana", "bob").expect("confirm");
        assert!(registry.client("ana").expect("ana").is_following("bob"));
        assert_eq!(registry.client("bob").expect("bob").followers(), 1);

        assert!(matches!(
            registry.confirm_follow("ana", "bob"),
            Err(RegistryError::AlreadyFollowing { .. })
        ));
        assert_eq!(registry.client("bob").expect("bob").followers(), 1);
        assert_eq!(
            registry.confirm_follow("ana", "ana"),
            Err(RegistryError::SelfFollow("ana".into()))
        );
    }

    #[test]
    fn undo_of_add_cascades_everywhere() {
        let mut registry = SocialRegistry::new();
        registry.add_client("ana", 95).expect("add ana");
        registry.add_client("bob", 80).expect("add bob");
        registry.add_client("cid", 80).expect("add cid");
        registry.connect("ana", "cid").expect("connect");
        registry.confirm_follow("ana", "cid").expect("ana follows cid");
        registry.confirm_follow("cid", "bob").expect("cid follows bob");

        let undone = registry.undo().expect("undo").expect("an action");
        assert_eq!(undone.kind, ActionKind::AddClient("cid".into()));

        assert!(registry.client("cid").is_none());
        assert_eq!(names(registry.clients_with_score(80)), vec!["bob"]);
        assert_eq!(registry.tree().len(), 2);
        assert!(!registry.graph().contains("cid"));
        assert_eq!(registry.edge_count(), 0);

        let ana = registry.client("ana").expect("ana");
        assert!(ana.following().is_empty());
        assert!(ana.connections().is_empty());
        assert_eq!(registry.client("bob").expect("bob").followers(), 0);
    }

    #[test]
    fn undo_on_empty_history_is_none() {
        let mut registry = SocialRegistry::new();
        assert_eq!(registry.undo(), Ok(None));
    }

    #[test]
    fn undo_request_with_empty_queue_is_corruption() {
        let mut registry = SocialRegistry::new();
        registry.add_client("ana", 95).expect("add ana");
        registry.add_client("bob", 80).expect("add bob");
        registry.request_follow("ana", "bob").expect("request");
        registry.process_next_request().expect("dequeue");

        let err = registry.undo().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HistoryCorruption);
    }

    #[test]
    fn undo_request_with_mismatched_tail_rolls_back() {
        let mut registry = SocialRegistry::new();
        registry.add_client("ana", 95).expect("add ana");
        registry.add_client("bob", 80).expect("add bob");
        registry.request_follow("ana", "bob").expect("first request");
        registry.request_follow("bob", "ana").expect("second request");

        // Deliver the first request, then undo the second: the tail still
        // matches, so this succeeds.
        registry.process_next_request().expect("dequeue");
        registry.undo().expect("undo second request");
        assert_eq!(registry.pending_count(), 0);

        // Plant a request that history does not know about.
        registry.requests.enqueue(FollowRequest::new("bob", "ana"));
        let err = registry.undo().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HistoryCorruption);
        assert_eq!(registry.pending_count(), 1);
    }

    #[test]
    fn connect_checks_names_before_existence() {
        let mut registry = SocialRegistry::new();
        registry.add_client("ana", 95).expect("add ana");
        assert_eq!(
            registry.connect("ana", "ana"),
            Err(RegistryError::SelfConnection("ana".into()))
        );
        assert_eq!(
            registry.connect("ana", "zed"),
            Err(RegistryError::UnknownClient("zed".into()))
        );
        assert!(matches!(
            registry.connect("", "ana"),
            Err(RegistryError::InvalidName(_))
        ));
    }

    #[test]
    fn level_four_orders_by_followers() {
        let mut registry = SocialRegistry::new();
        // Ascending inserts build a chain, so score 50 lands at depth 4.
        for (name, score) in [("r", 10), ("a", 20), ("b", 30), ("c", 40), ("d", 50)] {
            registry.add_client(name, score).expect("add");
        }
        registry.add_client("e", 50).expect("tie with d");
        registry.confirm_follow("a", "e").expect("a follows e");

        assert_eq!(names(registry.clients_at_depth(4)), vec!["d", "e"]);
        assert_eq!(names(registry.level_four_by_followers()), vec!["e", "d"]);
    }
}
