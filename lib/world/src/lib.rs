//! # HopGraph World
//!
//! Time-stepped driver for HopGraph simulations.
//!
//! A [`World`] owns a [`Graph`](hopgraph_core::Graph) and a set of
//! participants. Every tick it advances the clock of a
//! [`SimulationData`](hopgraph_core::SimulationData), moves each
//! participant one hop along its current shortest path and reports the
//! hop to the recorder.
//!
//! ```rust
//! use hopgraph_core::{EdgeRecord, Graph, GraphConfig, NodeRecord, SimulationData};
//! use hopgraph_world::{World, WorldConfig};
//!
//! let graph = Graph::from_records(
//!     GraphConfig::default().with_seed(1),
//!     vec![NodeRecord::new("a"), NodeRecord::new("b")],
//!     vec![EdgeRecord::new("ab", "a", "b"), EdgeRecord::new("ba", "b", "a")],
//! )
//! .unwrap();
//!
//! let config = WorldConfig { participants: 2, steps: 10, ..WorldConfig::default() };
//! let mut world = World::new(graph, config);
//!
//! let mut data = SimulationData::new();
//! let report = world.run(&mut data).unwrap();
//! assert_eq!(world.participants().len(), 2);
//! assert_eq!(report.simulated_time, 10.0);
//! ```

pub mod world;

pub use world::{Participant, RunReport, World, WorldConfig};
