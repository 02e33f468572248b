use anyhow::Context;
use clap::Parser;
use hopgraph_core::{GraphConfig, ParticipantId, SimulationData};
use hopgraph_topology::load_map;
use hopgraph_world::{World, WorldConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Simulate participants routing across a weighted network
#[derive(Parser, Debug)]
#[command(name = "hopgraph")]
#[command(about = "Discrete-time routing simulation over a weighted graph", long_about = None)]
struct Args {
    /// Path to the map file
    #[arg(short, long)]
    map: PathBuf,

    /// Number of participants to place
    #[arg(short, long, default_value_t = 10)]
    participants: usize,

    /// Number of clock ticks to simulate
    #[arg(short, long, default_value_t = 100)]
    steps: usize,

    /// Simulated time per tick
    #[arg(long, default_value_t = 1.0)]
    delta_time: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Log every hop of this participant (repeatable)
    #[arg(long = "trace")]
    traced: Vec<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting HopGraph v{}", env!("CARGO_PKG_VERSION"));
    info!("Map: {:?}", args.map);

    let graph_config = GraphConfig {
        seed: args.seed,
        ..GraphConfig::default()
    };
    let (graph, summary) = load_map(&args.map, graph_config)
        .with_context(|| format!("loading map {}", args.map.display()))?;
    info!(
        "Topology ready: {} nodes, {} edges",
        summary.nodes, summary.edges
    );

    let config = WorldConfig {
        participants: args.participants,
        steps: args.steps,
        delta_time: args.delta_time,
        traced: args.traced.iter().map(|id| ParticipantId::from(id.as_str())).collect(),
    };
    let mut world = World::new(graph, config);

    let mut data = SimulationData::new();
    let report = world.run(&mut data)?;

    info!("Simulated {} steps ({:.2} time units) in {:?}", report.steps, report.simulated_time, report.elapsed);
    info!("Total hops: {}", report.hops);
    info!("Coverage: {:.1}%", report.coverage * 100.0);
    for id in &args.traced {
        info!("{}: {} hops", id, data.hop_count(id));
    }

    Ok(())
}
