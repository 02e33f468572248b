//! # HopGraph Topology
//!
//! Loads graph topologies from JSON map files.
//!
//! A map file points at (or inlines) two record files: one object whose
//! keys are node names, one whose keys are edge names. Record files are
//! streamed one record at a time, so large topologies never sit in
//! memory as a single JSON document.
//!
//! ```json
//! {
//!   "metadata": { "rootDirectory": "data" },
//!   "nodes": { "filePath": "nodes.json" },
//!   "edges": { "filePath": "edges.json" }
//! }
//! ```
//!
//! Malformed individual records are logged and skipped; only unreadable
//! files and broken JSON syntax fail a load.

pub mod error;
pub mod stream;
pub mod loader;

pub use error::{Result, TopologyError};
pub use stream::{ParserState, RecordStream};
pub use loader::{load_map, LoadSummary, MapFile, Metadata, Section, TopologyLoader};
