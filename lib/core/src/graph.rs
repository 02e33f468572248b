use crate::edge::{Edge, EdgeId, EdgeParams, DEFAULT_DISTANCE};
use crate::node::{Node, NodeId};
use crate::participant::ParticipantId;
use crate::probability::ProbabilityModel;
use crate::record::{EdgeRecord, NodeRecord};
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use tracing::{debug, warn};

/// Configuration for a graph
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Distance used for edges that do not specify one
    pub default_distance: f64,
    /// Budgets for nodes without a valid one are drawn uniformly from here
    pub budget_range: Range<i64>,
    /// Seed for every random choice the graph makes. `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_distance: DEFAULT_DISTANCE,
            budget_range: 300..500,
            seed: None,
        }
    }
}

impl GraphConfig {
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.budget_range.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "empty budget range {:?}",
                self.budget_range
            )));
        }
        if !self.default_distance.is_finite() || self.default_distance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "default distance must be finite and non-negative, got {}",
                self.default_distance
            )));
        }
        Ok(())
    }
}

/// Weighted directed graph that participants move across.
///
/// Nodes and edges live in arenas and are addressed by [`NodeId`] and
/// [`EdgeId`]; names map to handles. Handles stay valid for the lifetime
/// of the graph since nothing is ever removed.
#[derive(Debug)]
pub struct Graph {
    config: GraphConfig,
    pub(crate) nodes: Vec<Node>,
    node_index: AHashMap<String, NodeId>,
    pub(crate) edges: Vec<Edge>,
    edge_index: AHashMap<String, EdgeId>,
    /// Dense index -> node, for uniform random selection
    lut: Vec<NodeId>,
    locations: AHashMap<ParticipantId, NodeId>,
    rng: StdRng,
}

impl Graph {
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    /// Default configuration with a fixed seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        // the default configuration always validates
        Self::empty(GraphConfig::default().with_seed(seed))
    }

    fn empty(config: GraphConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            config,
            nodes: Vec::new(),
            node_index: AHashMap::new(),
            edges: Vec::new(),
            edge_index: AHashMap::new(),
            lut: Vec::new(),
            locations: AHashMap::new(),
            rng,
        }
    }

    /// Build a graph from node records followed by edge records.
    ///
    /// Invalid records are skipped; only an invalid `config` fails.
    pub fn from_records<N, E>(config: GraphConfig, nodes: N, edges: E) -> Result<Self>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        let mut graph = Self::new(config)?;
        for record in nodes {
            graph.ingest_node(&record);
        }
        graph.finish_nodes();
        for record in edges {
            graph.ingest_edge(&record);
        }
        debug!(
            "Graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Create the node described by `record` unless its key already exists.
    ///
    /// Call [`Graph::finish_nodes`] after the last node record so random
    /// selection sees the new nodes.
    pub fn ingest_node(&mut self, record: &NodeRecord) -> Option<NodeId> {
        if self.node_index.contains_key(&record.key) {
            debug!("Duplicate node {} ignored", record.key);
            return None;
        }

        let budget = match (record.parsed_budget(), &record.budget) {
            (Some(budget), _) => budget,
            (None, Some(raw)) => {
                warn!(
                    "Node {}: unparsable budget {:?}, using a random one",
                    record.key, raw
                );
                self.random_budget()
            }
            (None, None) => self.random_budget(),
        };

        Some(self.push_node(record.key.clone(), budget))
    }

    /// Rebuild the random-selection index after a batch of node records
    pub fn finish_nodes(&mut self) {
        self.rebuild_index();
    }

    /// Create the edge described by `record`.
    ///
    /// Records naming an unknown endpoint are skipped. Bad distribution
    /// parameters fall back to a fixed-cost edge.
    pub fn ingest_edge(&mut self, record: &EdgeRecord) -> Option<EdgeId> {
        let (from, to) = match (self.node_id(&record.from), self.node_id(&record.to)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                warn!(
                    "Edge {}: endpoint {} -> {} not found, skipping",
                    record.name, record.from, record.to
                );
                return None;
            }
        };

        let distance = match record.distance {
            Some(d) if d.is_finite() => d,
            Some(d) => {
                warn!("Edge {}: invalid distance {}, using default", record.name, d);
                self.config.default_distance
            }
            None => self.config.default_distance,
        };
        let params = EdgeParams {
            distance,
            pdf: record.pdf.clone().unwrap_or_default(),
        };

        match self.construct_edge(&record.name, (from, to), Some(params.clone())) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Edge {}: {}, using a fixed cost", record.name, e);
                self.construct_edge(&record.name, (from, to), Some(EdgeParams::new(params.distance)))
                    .ok()
            }
        }
    }

    /// Add a node at runtime, returning the existing handle if the key is taken
    pub fn add_node(&mut self, key: &str, budget: Option<i64>) -> NodeId {
        if let Some(id) = self.node_id(key) {
            return id;
        }
        let budget = budget.unwrap_or_else(|| self.random_budget());
        let id = self.push_node(key.to_string(), budget);
        self.rebuild_index();
        id
    }

    /// Add an edge at runtime.
    ///
    /// A name that already exists is replaced: the old edge is detached
    /// from its source and the new one takes its handle.
    pub fn construct_edge(
        &mut self,
        name: &str,
        (from, to): (NodeId, NodeId),
        params: Option<EdgeParams>,
    ) -> Result<EdgeId> {
        self.check_node(from)?;
        self.check_node(to)?;

        let params = params.unwrap_or(EdgeParams {
            distance: self.config.default_distance,
            pdf: Vec::new(),
        });
        let model = ProbabilityModel::new(&params.pdf, self.rng.random::<u64>())?;
        let edge = Edge::new(name.to_string(), from, to, params.distance, model);

        let id = match self.edge_index.get(name).copied() {
            Some(id) => {
                let old_source = self.edges[id.0].source();
                self.nodes[old_source.0].edges.retain(|e| *e != id);
                self.edges[id.0] = edge;
                debug!("Edge {} replaced", name);
                id
            }
            None => {
                let id = EdgeId(self.edges.len());
                self.edges.push(edge);
                self.edge_index.insert(name.to_string(), id);
                id
            }
        };
        self.nodes[from.0].edges.push(id);
        Ok(id)
    }

    /// Rebuild the dense index used by [`Graph::random_node`]
    pub fn rebuild_index(&mut self) {
        self.lut.clear();
        self.lut.extend((0..self.nodes.len()).map(NodeId));
    }

    /// Pick a node uniformly at random
    pub fn random_node(&mut self) -> Result<NodeId> {
        if self.lut.is_empty() {
            return Err(Error::EmptyGraph);
        }
        let i = self.rng.random_range(0..self.lut.len());
        Ok(self.lut[i])
    }

    #[inline]
    pub fn has_node(&self, key: &str) -> bool {
        self.node_index.contains_key(key)
    }

    #[inline]
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    #[inline]
    pub fn node_by_key(&self, key: &str) -> Option<&Node> {
        self.node_id(key).and_then(|id| self.node(id))
    }

    /// All nodes in handle order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    #[inline]
    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.edge_index.get(name).copied()
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    #[inline]
    pub fn edge_by_name(&self, name: &str) -> Option<&Edge> {
        self.edge_id(name).and_then(|id| self.edge(id))
    }

    /// All edges in handle order
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Outgoing edges of `id` in insertion order
    pub fn outgoing(&self, id: NodeId) -> Result<impl Iterator<Item = &Edge>> {
        let node = self.node(id).ok_or(Error::UnknownNode(id))?;
        Ok(node.edges.iter().map(move |e| &self.edges[e.0]))
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    /// Size of the random-selection index as of its last rebuild
    #[inline]
    pub fn indexed_count(&self) -> usize {
        self.lut.len()
    }

    /// Every participant on any node except those in `ignore`
    pub fn participants(&self, ignore: &AHashSet<ParticipantId>) -> Vec<&ParticipantId> {
        self.nodes
            .iter()
            .flat_map(|node| node.participants.iter())
            .filter(|p| !ignore.contains(*p))
            .collect()
    }

    /// Participants on nodes one outgoing edge away from `id`
    pub fn adjacent_participants(
        &self,
        id: NodeId,
        ignore: &AHashSet<ParticipantId>,
    ) -> Result<Vec<&ParticipantId>> {
        let node = self.node(id).ok_or(Error::UnknownNode(id))?;
        Ok(node
            .edges
            .iter()
            .map(|e| &self.nodes[self.edges[e.0].destination().0])
            .flat_map(|n| n.participants.iter())
            .filter(|p| !ignore.contains(*p))
            .collect())
    }

    /// Put a participant on `node`, moving it if it is already placed
    pub fn place_participant(&mut self, participant: ParticipantId, node: NodeId) -> Result<()> {
        self.check_node(node)?;
        if let Some(previous) = self.locations.insert(participant.clone(), node) {
            self.nodes[previous.0].participants.remove(&participant);
        }
        self.nodes[node.0].participants.insert(participant);
        Ok(())
    }

    /// Move a placed participant to `to`, returning where it was
    pub fn move_participant(&mut self, participant: &ParticipantId, to: NodeId) -> Result<NodeId> {
        self.check_node(to)?;
        let from = self
            .locations
            .get(participant)
            .copied()
            .ok_or_else(|| Error::ParticipantNotFound(participant.to_string()))?;
        let entry = self.nodes[from.0]
            .participants
            .take(participant)
            .ok_or_else(|| Error::ParticipantNotFound(participant.to_string()))?;
        self.nodes[to.0].participants.insert(entry);
        self.locations.insert(participant.clone(), to);
        Ok(from)
    }

    /// Take a participant off the graph
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> Option<NodeId> {
        let node = self.locations.remove(participant)?;
        self.nodes[node.0].participants.remove(participant);
        Some(node)
    }

    #[inline]
    pub fn locate_participant(&self, participant: &str) -> Option<NodeId> {
        self.locations.get(participant).copied()
    }

    pub(crate) fn check_node(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::UnknownNode(id))
        }
    }

    fn push_node(&mut self, key: String, budget: i64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.node_index.insert(key.clone(), id);
        self.nodes.push(Node::new(key, budget));
        id
    }

    fn random_budget(&mut self) -> i64 {
        self.rng.random_range(self.config.budget_range.clone())
    }
}
