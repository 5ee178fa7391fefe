//! Undo log of reversible registry operations.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::requests::FollowRequest;

/// What an undoable operation did, with exactly the data needed to
/// reverse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// A client was created under this name.
    AddClient(String),
    /// This request was appended to the follow queue.
    RequestFollow(FollowRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

impl Action {
    pub fn add_client(name: &str) -> Self {
        Self {
            kind: ActionKind::AddClient(name.to_string()),
            detail: name.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn request_follow(request: FollowRequest) -> Self {
        Self {
            detail: request.to_string(),
            kind: ActionKind::RequestFollow(request),
            timestamp: Utc::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            ActionKind::AddClient(_) => "ADD_CLIENT",
            ActionKind::RequestFollow(_) => "REQUEST_FOLLOW",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.label(),
            self.detail
        )
    }
}

/// Stack of recorded actions; the top is the next one `undo` reverses.
#[derive(Debug, Default)]
pub struct ActionHistory {
    stack: Vec<Action>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: Action) {
        self.stack.push(action);
    }

    pub fn pop(&mut self) -> Option<Action> {
        self.stack.pop()
    }

    /// Up to `limit` actions, most recent first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Action> {
        self.stack.iter().rev().take(limit)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
