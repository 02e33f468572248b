// Shortest paths over sampled edge weights
use crate::edge::Edge;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::Result;
use std::collections::VecDeque;

/// Shortest distances and predecessors from one source node
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    dist: Vec<f64>,
    previous: Vec<Option<NodeId>>,
}

impl ShortestPathTree {
    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Total weight to reach `node`, `None` if unreachable
    #[inline]
    pub fn distance_to(&self, node: NodeId) -> Option<f64> {
        self.dist.get(node.0).copied().filter(|d| d.is_finite())
    }

    #[inline]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance_to(node).is_some()
    }

    #[inline]
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.previous.get(node.0).copied().flatten()
    }

    /// Full path from the source to `dst`, both ends included.
    /// Empty when `dst` cannot be reached.
    pub fn path_to(&self, dst: NodeId) -> Vec<NodeId> {
        if !self.is_reachable(dst) {
            return Vec::new();
        }

        let mut path = vec![dst];
        let mut current = dst;
        while let Some(prev) = self.predecessor(current) {
            // predecessor links never cycle with non-negative weights
            if path.len() > self.dist.len() {
                break;
            }
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    /// The node right after the source on the way to `dst`
    pub fn first_hop(&self, dst: NodeId) -> Option<NodeId> {
        self.path_to(dst).get(1).copied()
    }
}

impl Graph {
    /// Compute shortest paths from `src` to every node.
    ///
    /// Every edge weight is sampled once up front, so one query sees a
    /// consistent cost per edge while repeated queries over stochastic
    /// edges may disagree. Relaxation runs from a FIFO queue until no
    /// distance improves; a predecessor only changes on a strictly
    /// shorter distance, so ties keep the path discovered first.
    pub fn compute_paths(&mut self, src: NodeId) -> Result<ShortestPathTree> {
        self.check_node(src)?;

        let weights: Vec<f64> = self.edges.iter_mut().map(Edge::weight).collect();
        let n = self.nodes.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut previous = vec![None; n];
        let mut queued = vec![false; n];
        let mut queue = VecDeque::with_capacity(n);

        dist[src.0] = 0.0;
        queue.push_back(src);
        queued[src.0] = true;

        while let Some(node) = queue.pop_front() {
            queued[node.0] = false;
            let base = dist[node.0];

            for edge_id in &self.nodes[node.0].edges {
                let to = self.edges[edge_id.0].destination();
                let candidate = base + weights[edge_id.0];
                if candidate < dist[to.0] {
                    dist[to.0] = candidate;
                    previous[to.0] = Some(node);
                    if !queued[to.0] {
                        queued[to.0] = true;
                        queue.push_back(to);
                    }
                }
            }
        }

        Ok(ShortestPathTree {
            source: src,
            dist,
            previous,
        })
    }

    /// First hop from `src` toward `dst`.
    ///
    /// `None` when `dst` is unreachable or equal to `src`.
    pub fn shortest_path(&mut self, src: NodeId, dst: NodeId) -> Result<Option<NodeId>> {
        self.check_node(dst)?;
        Ok(self.compute_paths(src)?.first_hop(dst))
    }

    /// Ordered path from `src` to `dst`, both included.
    ///
    /// Empty when `dst` is unreachable, `[src]` when `src == dst`.
    pub fn shortest_path_as_list(&mut self, src: NodeId, dst: NodeId) -> Result<Vec<NodeId>> {
        self.check_node(dst)?;
        Ok(self.compute_paths(src)?.path_to(dst))
    }
}
