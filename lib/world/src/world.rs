use ahash::AHashSet;
use hopgraph_core::{Error, Graph, NodeId, ParticipantId, Result, SimulationData};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Participants [`World::run`] places when none have been added
    pub participants: usize,
    /// Clock ticks per run
    pub steps: usize,
    /// Simulated time per tick
    pub delta_time: f64,
    /// Participants whose hops are logged at `info`
    pub traced: Vec<ParticipantId>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            participants: 10,
            steps: 100,
            delta_time: 1.0,
            traced: Vec::new(),
        }
    }
}

/// A participant and the node it is heading for
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub destination: NodeId,
}

/// Outcome of [`World::run`]
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub steps: usize,
    pub hops: usize,
    pub coverage: f64,
    pub simulated_time: f64,
    pub elapsed: Duration,
}

/// Drives participants across a graph one tick at a time.
///
/// Each tick every participant takes one hop along the current shortest
/// path toward its destination. A participant that has arrived, or
/// whose destination cannot be reached, picks a new random destination
/// instead of moving.
pub struct World {
    graph: Graph,
    config: WorldConfig,
    participants: Vec<Participant>,
    traced: AHashSet<ParticipantId>,
}

impl World {
    pub fn new(graph: Graph, config: WorldConfig) -> Self {
        let traced = config.traced.iter().cloned().collect();
        Self {
            graph,
            config,
            participants: Vec::new(),
            traced,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Place a participant on `at` with a random destination
    pub fn add_participant(&mut self, id: ParticipantId, at: NodeId) -> Result<()> {
        let destination = self.graph.random_node()?;
        self.graph.place_participant(id.clone(), at)?;
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(existing) => existing.destination = destination,
            None => self.participants.push(Participant { id, destination }),
        }
        Ok(())
    }

    pub fn set_destination(&mut self, id: &str, destination: NodeId) -> Result<()> {
        if self.graph.node(destination).is_none() {
            return Err(Error::UnknownNode(destination));
        }
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id.as_str() == id)
            .ok_or_else(|| Error::ParticipantNotFound(id.to_string()))?;
        participant.destination = destination;
        Ok(())
    }

    /// Place `count` new participants on random nodes
    pub fn randomize_participants(&mut self, count: usize) -> Result<()> {
        let offset = self.participants.len();
        for i in offset..offset + count {
            let at = self.graph.random_node()?;
            self.add_participant(ParticipantId::new(format!("p{}", i)), at)?;
        }
        debug!("Placed {} participants", count);
        Ok(())
    }

    /// Log every hop `id` takes
    pub fn trace_participant(&mut self, id: &str) {
        self.traced.insert(ParticipantId::from(id));
    }

    pub fn untrace_participant(&mut self, id: &str) {
        self.traced.remove(id);
    }

    #[inline]
    pub fn is_traced(&self, id: &str) -> bool {
        self.traced.contains(id)
    }

    /// Advance the clock by one tick and move every participant once.
    /// Returns the number of hops taken.
    pub fn step(&mut self, data: &mut SimulationData) -> Result<usize> {
        data.advance_clock(self.config.delta_time)?;
        let mut moved = 0;

        for i in 0..self.participants.len() {
            let id = self.participants[i].id.clone();
            let destination = self.participants[i].destination;
            let here = self
                .graph
                .locate_participant(id.as_str())
                .ok_or_else(|| Error::ParticipantNotFound(id.to_string()))?;

            match self.graph.shortest_path(here, destination)? {
                Some(next) => {
                    self.graph.move_participant(&id, next)?;
                    data.record_hop(&id, (here, next));
                    moved += 1;
                    if self.traced.contains(&id) {
                        info!(
                            "t={:.2} {} {} -> {}",
                            data.current_time(),
                            id,
                            self.node_key(here),
                            self.node_key(next)
                        );
                    }
                }
                None => {
                    let next_destination = self.graph.random_node()?;
                    self.participants[i].destination = next_destination;
                    if self.traced.contains(&id) {
                        info!(
                            "t={:.2} {} at {} now heading for {}",
                            data.current_time(),
                            id,
                            self.node_key(here),
                            self.node_key(next_destination)
                        );
                    }
                }
            }
        }

        Ok(moved)
    }

    /// Reset `data` and run the configured number of ticks.
    ///
    /// A world with no participants is first populated with
    /// `config.participants` of them.
    pub fn run(&mut self, data: &mut SimulationData) -> Result<RunReport> {
        if self.graph.node_count() == 0 {
            return Err(Error::EmptyGraph);
        }
        if self.participants.is_empty() {
            self.randomize_participants(self.config.participants)?;
        }

        let started = Instant::now();
        data.reset();
        for _ in 0..self.config.steps {
            self.step(data)?;
        }

        let report = RunReport {
            steps: self.config.steps,
            hops: data.hops(),
            coverage: data.coverage(self.graph.node_count())?,
            simulated_time: data.current_time(),
            elapsed: started.elapsed(),
        };
        debug!("Run finished: {:?}", report);
        Ok(report)
    }

    fn node_key(&self, id: NodeId) -> &str {
        self.graph.node(id).map_or("?", |n| n.key())
    }
}
