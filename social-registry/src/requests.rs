//! FIFO queue of follow requests awaiting delivery.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An intent from `requester` to follow `target`.
///
/// Two requests are equal only if their timestamps match too, so undo can
/// tell a specific enqueue apart from a later identical one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowRequest {
    pub requester: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
}

impl FollowRequest {
    pub fn new(requester: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            target: target.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for FollowRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.requester, self.target)
    }
}

/// Pending follow requests, delivered head first.
///
/// Normal processing pops from the head. The tail is only touched when an
/// enqueue is undone, which retracts the most recent request.
#[derive(Debug, Default)]
pub struct FollowRequestQueue {
    pending: VecDeque<FollowRequest>,
}

impl FollowRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, request: FollowRequest) {
        self.pending.push_back(request);
    }

    pub fn dequeue(&mut self) -> Option<FollowRequest> {
        self.pending.pop_front()
    }

    pub(crate) fn retract_last(&mut self) -> Option<FollowRequest> {
        self.pending.pop_back()
    }

    /// Puts a request taken by [`retract_last`](Self::retract_last) back.
    pub(crate) fn restore_last(&mut self, request: FollowRequest) {
        self.pending.push_back(request);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Head-to-tail view of the pending requests.
    pub fn iter(&self) -> impl Iterator<Item = &FollowRequest> {
        self.pending.iter()
    }
}
