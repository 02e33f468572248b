//! # HopGraph Core
//!
//! Core library for the HopGraph network simulator.
//!
//! This crate provides the graph engine that a simulation driver moves
//! participants across:
//!
//! - [`Graph`] - Arena of [`Node`]s and directed [`Edge`]s addressed by handle
//! - [`ProbabilityModel`] - Stochastic component of an edge's traversal cost
//! - [`ShortestPathTree`] - Result of a shortest-path query from one source
//! - [`SimulationData`] - Per-participant hop history, coverage and clock
//!
//! ## Example
//!
//! ```rust
//! use hopgraph_core::{EdgeRecord, Graph, GraphConfig, NodeRecord, SimulationData};
//!
//! let mut graph = Graph::from_records(
//!     GraphConfig::default().with_seed(7),
//!     vec![NodeRecord::new("A"), NodeRecord::new("B"), NodeRecord::new("C")],
//!     vec![
//!         EdgeRecord::new("ab", "A", "B").with_distance(10.0),
//!         EdgeRecord::new("bc", "B", "C").with_distance(10.0),
//!     ],
//! )
//! .unwrap();
//!
//! let a = graph.node_id("A").unwrap();
//! let b = graph.node_id("B").unwrap();
//! let c = graph.node_id("C").unwrap();
//! assert_eq!(graph.shortest_path_as_list(a, c).unwrap(), vec![a, b, c]);
//! assert_eq!(graph.shortest_path(a, c).unwrap(), Some(b));
//!
//! let mut data = SimulationData::new();
//! data.record_hop(&"walker".into(), (a, b));
//! assert_eq!(data.hop_count("walker"), 1);
//! ```

pub mod error;
pub mod probability;
pub mod node;
pub mod edge;
pub mod graph;
pub mod dijkstra;
pub mod participant;
pub mod record;
pub mod recorder;

pub use error::{Error, Result};
pub use probability::{DistributionKind, ProbabilityModel};
pub use node::{Node, NodeId};
pub use edge::{Edge, EdgeId, EdgeParams, DEFAULT_DISTANCE};
pub use graph::{Graph, GraphConfig};
pub use dijkstra::ShortestPathTree;
pub use participant::ParticipantId;
pub use record::{EdgeRecord, NodeRecord};
pub use recorder::{Hop, SimulationData};
