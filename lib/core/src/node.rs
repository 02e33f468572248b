use crate::edge::EdgeId;
use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable handle of a node inside its [`Graph`](crate::Graph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named vertex with a capacity budget, outgoing edges and the
/// participants currently located on it
#[derive(Debug, Clone)]
pub struct Node {
    key: String,
    budget: i64,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) participants: BTreeSet<ParticipantId>,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn new(key: String, budget: i64) -> Self {
        Self {
            key,
            budget,
            edges: Vec::new(),
            participants: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn budget(&self) -> i64 {
        self.budget
    }

    #[inline]
    pub fn set_budget(&mut self, budget: i64) {
        self.budget = budget;
    }

    /// Outgoing edges in insertion order
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Participants present on this node, in identity order
    #[inline]
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter()
    }

    #[inline]
    pub fn has_participant(&self, id: &str) -> bool {
        self.participants.contains(id)
    }

    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}
