use crate::stream::RecordStream;
use crate::{Result, TopologyError};
use hopgraph_core::{EdgeRecord, Graph, GraphConfig, NodeRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Top-level map file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFile {
    #[serde(default)]
    pub metadata: Metadata,
    pub nodes: Section,
    pub edges: Section,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Directory record files are resolved against, relative to the map file
    #[serde(rename = "rootDirectory", default, skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
}

/// Where a group of records lives
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Section {
    /// Records are streamed from a separate file
    File {
        #[serde(rename = "filePath")]
        file_path: String,
    },
    /// Records are written directly in the map file, kept as raw text so
    /// they stream in document order like a record file
    Inline(Box<RawValue>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRef {
    #[serde(rename = "filePath")]
    file_path: String,
}

// RawValue cannot pass through an untagged enum's buffered content, so
// capture the raw section first and classify it afterwards
impl<'de> Deserialize<'de> for Section {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        match serde_json::from_str::<FileRef>(raw.get()) {
            Ok(FileRef { file_path }) => Ok(Section::File { file_path }),
            Err(_) => Ok(Section::Inline(raw)),
        }
    }
}

/// Body of a node record; the record name is the node key
#[derive(Debug, Clone, Default, Deserialize)]
struct NodeBody {
    #[serde(default, deserialize_with = "budget_text")]
    budget: Option<String>,
}

/// Body of an edge record; the record name is the edge name
#[derive(Debug, Clone, Deserialize)]
struct EdgeBody {
    from: String,
    to: String,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    pdf: Option<Vec<f64>>,
}

/// Budgets come as strings or bare numbers; either way keep the text and
/// let the graph decide whether it parses
fn budget_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}

/// Counts from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub nodes: usize,
    pub edges: usize,
    pub skipped_nodes: usize,
    pub skipped_edges: usize,
}

/// Feeds node and edge records into a [`Graph`].
///
/// Nodes must all be read before edges so that edge endpoints resolve.
pub struct TopologyLoader {
    graph: Graph,
    summary: LoadSummary,
}

impl TopologyLoader {
    pub fn new(config: GraphConfig) -> Result<Self> {
        Ok(Self {
            graph: Graph::new(config)?,
            summary: LoadSummary::default(),
        })
    }

    /// Add one node record from its name and JSON body
    pub fn add_node(&mut self, key: String, body: Map<String, Value>) {
        match serde_json::from_value::<NodeBody>(Value::Object(body)) {
            Ok(body) => {
                let record = NodeRecord {
                    key,
                    budget: body.budget,
                };
                match self.graph.ingest_node(&record) {
                    Some(_) => self.summary.nodes += 1,
                    None => self.summary.skipped_nodes += 1,
                }
            }
            Err(e) => {
                warn!("Node {}: {}, skipping", key, e);
                self.summary.skipped_nodes += 1;
            }
        }
    }

    /// Add one edge record from its name and JSON body
    pub fn add_edge(&mut self, name: String, body: Map<String, Value>) {
        match serde_json::from_value::<EdgeBody>(Value::Object(body)) {
            Ok(body) => {
                let record = EdgeRecord {
                    name,
                    from: body.from,
                    to: body.to,
                    distance: body.distance,
                    pdf: body.pdf,
                };
                match self.graph.ingest_edge(&record) {
                    Some(_) => self.summary.edges += 1,
                    None => self.summary.skipped_edges += 1,
                }
            }
            Err(e) => {
                warn!("Edge {}: {}, skipping", name, e);
                self.summary.skipped_edges += 1;
            }
        }
    }

    /// Stream node records from `reader`, then index the nodes
    pub fn read_nodes<R: Read>(&mut self, reader: R) -> Result<()> {
        let started = Instant::now();
        RecordStream::new(reader).for_each(|key, body| self.add_node(key, body))?;
        self.graph.finish_nodes();
        debug!(
            "Parsed {} nodes in {:?}",
            self.graph.node_count(),
            started.elapsed()
        );
        Ok(())
    }

    /// Stream edge records from `reader`
    pub fn read_edges<R: Read>(&mut self, reader: R) -> Result<()> {
        let started = Instant::now();
        RecordStream::new(reader).for_each(|name, body| self.add_edge(name, body))?;
        debug!(
            "Parsed {} edges in {:?}",
            self.graph.edge_count(),
            started.elapsed()
        );
        Ok(())
    }

    pub fn summary(&self) -> LoadSummary {
        self.summary
    }

    pub fn finish(self) -> (Graph, LoadSummary) {
        (self.graph, self.summary)
    }
}

/// Load the graph described by the map file at `path`
pub fn load_map<P: AsRef<Path>>(path: P, config: GraphConfig) -> Result<(Graph, LoadSummary)> {
    let path = path.as_ref();
    let map: MapFile = serde_json::from_reader(BufReader::new(open(path)?))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let root = match &map.metadata.root_directory {
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    };

    let mut loader = TopologyLoader::new(config)?;

    match map.nodes {
        Section::File { file_path } => {
            let file = resolve(&root, &file_path);
            debug!("Reading nodes from {}", file.display());
            loader.read_nodes(BufReader::new(open(&file)?))?;
        }
        Section::Inline(records) => {
            debug!("Reading inline nodes");
            loader.read_nodes(records.get().as_bytes())?;
        }
    }

    match map.edges {
        Section::File { file_path } => {
            let file = resolve(&root, &file_path);
            debug!("Reading edges from {}", file.display());
            loader.read_edges(BufReader::new(open(&file)?))?;
        }
        Section::Inline(records) => {
            debug!("Reading inline edges");
            loader.read_edges(records.get().as_bytes())?;
        }
    }

    let (graph, summary) = loader.finish();
    info!(
        "Loaded {}: {} nodes, {} edges ({} node and {} edge records skipped)",
        path.display(),
        graph.node_count(),
        graph.edge_count(),
        summary.skipped_nodes,
        summary.skipped_edges
    );
    Ok((graph, summary))
}

fn resolve(root: &Path, file_path: &str) -> PathBuf {
    root.join(file_path)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| TopologyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> TopologyLoader {
        TopologyLoader::new(GraphConfig::default().with_seed(4)).unwrap()
    }

    #[test]
    fn test_read_nodes_and_edges() {
        let mut loader = loader();
        loader
            .read_nodes(r#"{ "a": {"budget": "320"}, "b": {"budget": 410}, "c": {} }"#.as_bytes())
            .unwrap();
        loader
            .read_edges(
                r#"{
                    "ab": {"from": "a", "to": "b", "distance": 12.5},
                    "bc": {"from": "b", "to": "c", "pdf": [55, 8]}
                }"#
                .as_bytes(),
            )
            .unwrap();

        let (graph, summary) = loader.finish();
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.edges, 2);
        assert_eq!(graph.indexed_count(), 3);
        assert_eq!(graph.node_by_key("a").unwrap().budget(), 320);
        assert_eq!(graph.node_by_key("b").unwrap().budget(), 410);
        assert_eq!(graph.edge_by_name("ab").unwrap().distance(), 12.5);

        let bc = graph.edge_by_name("bc").unwrap();
        assert_eq!(bc.distance(), 50.0);
        assert_eq!(bc.model().params(), &[55.0, 8.0]);
    }

    #[test]
    fn test_malformed_records_skipped() {
        let mut loader = loader();
        loader
            .read_nodes(r#"{ "a": {"budget": "not-a-number"}, "b": {"budget": [1]}, "c": {} }"#.as_bytes())
            .unwrap();
        loader
            .read_edges(
                r#"{
                    "missing_to": {"from": "a"},
                    "bad_distance": {"from": "a", "to": "b", "distance": "far"},
                    "dangling": {"from": "a", "to": "zzz"},
                    "ok": {"from": "a", "to": "c"}
                }"#
                .as_bytes(),
            )
            .unwrap();

        let (graph, summary) = loader.finish();
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.edges, 1);
        assert_eq!(summary.skipped_edges, 3);
        let budget = graph.node_by_key("a").unwrap().budget();
        assert!((300..500).contains(&budget));
        assert!(graph.edge_by_name("ok").is_some());
    }

    #[test]
    fn test_duplicate_node_counted_as_skipped() {
        let mut loader = loader();
        loader.add_node("a".to_string(), Map::new());
        loader.add_node("a".to_string(), Map::new());
        assert_eq!(loader.summary().nodes, 1);
        assert_eq!(loader.summary().skipped_nodes, 1);
    }

    #[test]
    fn test_section_forms() {
        let file: MapFile = serde_json::from_str(
            r#"{ "nodes": {"filePath": "n.json"}, "edges": {"e": {"from": "a", "to": "b"}} }"#,
        )
        .unwrap();
        assert!(matches!(file.nodes, Section::File { ref file_path } if file_path == "n.json"));
        assert!(matches!(file.edges, Section::Inline(ref raw) if raw.get().contains("\"e\"")));
        assert!(file.metadata.root_directory.is_none());
    }

    #[test]
    fn test_inline_section_keeps_document_order() {
        let file: MapFile = serde_json::from_str(
            r#"{
                "nodes": {"s": {"budget": "1"}, "b": {}, "s": {"budget": "2"}},
                "edges": {"filePath": "e.json", "extra": true}
            }"#,
        )
        .unwrap();

        // a filePath object with other keys is an inline section
        assert!(matches!(file.edges, Section::Inline(_)));

        let Section::Inline(raw) = file.nodes else {
            panic!("nodes should be inline");
        };
        let mut loader = loader();
        loader.read_nodes(raw.get().as_bytes()).unwrap();
        let (graph, summary) = loader.finish();

        let keys: Vec<&str> = graph.nodes().map(|(_, n)| n.key()).collect();
        assert_eq!(keys, vec!["s", "b"]);
        assert_eq!(graph.node_by_key("s").unwrap().budget(), 1);
        assert_eq!(summary.skipped_nodes, 1);
    }
}
