//! # HopGraph
//!
//! Discrete-time simulation of participants routing over a network
//! topology whose edges carry probabilistic traversal costs.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! hopgraph --map data/map.json --participants 50 --steps 500 --seed 7
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use hopgraph::prelude::*;
//!
//! let (graph, _summary) = load_map("data/map.json", GraphConfig::default()).unwrap();
//! let mut world = World::new(graph, WorldConfig::default());
//!
//! let mut data = SimulationData::new();
//! let report = world.run(&mut data).unwrap();
//! println!("{} hops, {:.1}% coverage", report.hops, report.coverage * 100.0);
//! ```
//!
//! ## Crate Structure
//!
//! - `hopgraph-core` - Graph arena, edge cost models, shortest paths, hop recorder
//! - `hopgraph-topology` - Streaming JSON topology loader
//! - `hopgraph-world` - Participant placement and the time-stepped driver

// Re-export core types
pub use hopgraph_core::{
    DistributionKind, Edge, EdgeId, EdgeParams, EdgeRecord, Error, Graph, GraphConfig, Hop, Node,
    NodeId, NodeRecord, ParticipantId, ProbabilityModel, Result, ShortestPathTree, SimulationData,
};

// Re-export topology loading
pub use hopgraph_topology::{load_map, LoadSummary, TopologyError, TopologyLoader};

// Re-export the driver
pub use hopgraph_world::{Participant, RunReport, World, WorldConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_map, Error, Graph, GraphConfig, Hop, NodeId, ParticipantId, Result, RunReport,
        SimulationData, World, WorldConfig,
    };
}
