//! Unbalanced binary search tree keyed by score.
//!
//! Nodes live in an arena and link to each other by index, so the tree owns
//! plain `Vec`s and never needs shared pointers. Each node holds every client
//! name that shares its score, in insertion order. Nothing rebalances the
//! tree: its shape, and therefore what sits at a given depth, depends on the
//! order in which scores were inserted.

use std::collections::VecDeque;

use tracing::debug;

type NodeId = usize;

#[derive(Debug)]
struct Node {
    score: u32,
    clients: Vec<String>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Where a node hangs: under the root slot or under a parent's child slot.
type Link = Option<(NodeId, Side)>;

#[derive(Debug, Default)]
pub struct ScoreTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl ScoreTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `name` under `score`, appending to the existing node on ties.
    pub fn insert(&mut self, name: &str, score: u32) {
        let mut link: Link = None;
        let mut cursor = self.root;

        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            if score == node.score {
                node.clients.push(name.to_string());
                self.len += 1;
                return;
            }
            if score < node.score {
                link = Some((id, Side::Left));
                cursor = node.left;
            } else {
                link = Some((id, Side::Right));
                cursor = node.right;
            }
        }

        let id = self.alloc(Node {
            score,
            clients: vec![name.to_string()],
            left: None,
            right: None,
        });
        self.set_link(link, Some(id));
        self.len += 1;
        debug!(score, node = id, "score tree node created");
    }

    /// Removes `name` from the node for `score`. A node left without clients
    /// is unlinked using ordinary BST deletion.
    ///
    /// Returns `false` if the name was not stored under that score.
    pub fn remove(&mut self, name: &str, score: u32) -> bool {
        let Some((id, link)) = self.find(score) else {
            return false;
        };

        let clients = &mut self.nodes[id].clients;
        let Some(position) = clients.iter().position(|c| c == name) else {
            return false;
        };
        clients.remove(position);
        self.len -= 1;

        if self.nodes[id].clients.is_empty() {
            self.unlink(id, link);
            debug!(score, node = id, "score tree node removed");
        }
        true
    }

    /// Names of every client stored at exactly `depth` (root is depth 0),
    /// visiting nodes left to right.
    pub fn at_depth(&self, depth: usize) -> Vec<&str> {
        let mut result = Vec::new();
        let Some(root) = self.root else {
            return result;
        };

        let mut level = VecDeque::from([root]);
        let mut current = 0;
        while !level.is_empty() {
            if current == depth {
                for &id in &level {
                    result.extend(self.nodes[id].clients.iter().map(String::as_str));
                }
                break;
            }
            for _ in 0..level.len() {
                let Some(id) = level.pop_front() else { break };
                level.extend(self.nodes[id].left);
                level.extend(self.nodes[id].right);
            }
            current += 1;
        }
        result
    }

    /// All names in ascending score order.
    pub fn inorder(&self) -> Vec<&str> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut cursor = self.root;

        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.nodes[id].left;
            }
            let Some(id) = stack.pop() else { break };
            result.extend(self.nodes[id].clients.iter().map(String::as_str));
            cursor = self.nodes[id].right;
        }
        result
    }

    /// Edges on the longest root-to-leaf path; `-1` for an empty tree.
    pub fn height(&self) -> i64 {
        let Some(root) = self.root else {
            return -1;
        };

        let mut level = vec![root];
        let mut height = -1;
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&id| [self.nodes[id].left, self.nodes[id].right])
                .flatten()
                .collect();
        }
        height
    }

    /// Number of client names stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of distinct scores in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn find(&self, score: u32) -> Option<(NodeId, Link)> {
        let mut link: Link = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if score == node.score {
                return Some((id, link));
            }
            if score < node.score {
                link = Some((id, Side::Left));
                cursor = node.left;
            } else {
                link = Some((id, Side::Right));
                cursor = node.right;
            }
        }
        None
    }

    fn unlink(&mut self, id: NodeId, link: Link) {
        match (self.nodes[id].left, self.nodes[id].right) {
            (None, child) | (child, None) => {
                self.set_link(link, child);
                self.release(id);
            }
            (Some(_), Some(right)) => {
                // Pull the in-order successor's contents up into this slot,
                // then splice the successor out. It never has a left child.
                let mut successor_link = (id, Side::Right);
                let mut successor = right;
                while let Some(left) = self.nodes[successor].left {
                    successor_link = (successor, Side::Left);
                    successor = left;
                }

                let score = self.nodes[successor].score;
                let clients = std::mem::take(&mut self.nodes[successor].clients);
                let orphan = self.nodes[successor].right;
                self.set_link(Some(successor_link), orphan);
                self.release(successor);

                let node = &mut self.nodes[id];
                node.score = score;
                node.clients = clients;
            }
        }
    }

    fn set_link(&mut self, link: Link, child: Option<NodeId>) {
        match link {
            None => self.root = child,
            Some((parent, Side::Left)) => self.nodes[parent].left = child,
            Some((parent, Side::Right)) => self.nodes[parent].right = child,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.clients.clear();
        node.left = None;
        node.right = None;
        self.free.push(id);
    }
}
