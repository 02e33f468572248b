use crate::node::NodeId;
use crate::participant::ParticipantId;
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// One traversal from `origin` to `destination`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub origin: NodeId,
    pub destination: NodeId,
}

impl Hop {
    #[inline]
    #[must_use]
    pub fn new(origin: NodeId, destination: NodeId) -> Self {
        Self { origin, destination }
    }
}

impl From<(NodeId, NodeId)> for Hop {
    fn from((origin, destination): (NodeId, NodeId)) -> Self {
        Self { origin, destination }
    }
}

/// Recorded results of a simulation run: per-participant hop history
/// plus the simulation clock.
///
/// Hops are trusted as reported; nothing checks them against a graph.
#[derive(Debug, Clone, Default)]
pub struct SimulationData {
    hops: AHashMap<ParticipantId, Vec<Hop>>,
    current_timestamp: f64,
    delta_time: f64,
}

impl SimulationData {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hop to the participant's history
    pub fn record_hop(&mut self, participant: &ParticipantId, hop: impl Into<Hop>) {
        self.hops
            .entry(participant.clone())
            .or_default()
            .push(hop.into());
    }

    /// Number of hops recorded for `participant`, 0 if never seen
    #[inline]
    pub fn hop_count(&self, participant: &str) -> usize {
        self.hops.get(participant).map_or(0, Vec::len)
    }

    /// Hops recorded for `participant` in the order they happened
    #[inline]
    pub fn hops_for(&self, participant: &str) -> &[Hop] {
        self.hops.get(participant).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total hops across every participant
    pub fn hops(&self) -> usize {
        self.hops.values().map(Vec::len).sum()
    }

    /// Participants that have at least one recorded hop
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.hops.keys()
    }

    /// Distinct nodes that appear as origin or destination of any hop
    pub fn visited_nodes(&self) -> AHashSet<NodeId> {
        self.hops
            .values()
            .flatten()
            .flat_map(|hop| [hop.origin, hop.destination])
            .collect()
    }

    /// Fraction of `total_nodes` that appear in some hop, capped at 1.
    ///
    /// A `total_nodes` of 0 is rejected.
    pub fn coverage(&self, total_nodes: usize) -> Result<f64> {
        if total_nodes == 0 {
            return Err(Error::InvalidCoverageDenominator(total_nodes));
        }
        let visited = self.visited_nodes().len() as f64;
        Ok((visited / total_nodes as f64).min(1.0))
    }

    /// Move the clock forward by `dt`.
    ///
    /// Negative or non-finite values are rejected and leave the clock
    /// untouched.
    pub fn advance_clock(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::InvalidDeltaTime(dt));
        }
        self.delta_time = dt;
        self.current_timestamp += dt;
        Ok(())
    }

    /// Zero the current timestamp. The last delta time is kept.
    #[inline]
    pub fn reset_clock(&mut self) {
        self.current_timestamp = 0.0;
    }

    /// Clear recorded hops and zero the clock for a new run
    pub fn reset(&mut self) {
        self.hops.clear();
        self.reset_clock();
    }

    #[inline]
    pub fn get_time(&self) -> f64 {
        self.current_timestamp
    }

    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_timestamp
    }

    #[inline]
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::from(s)
    }

    #[test]
    fn test_hop_counts() {
        let mut data = SimulationData::new();
        let (a, b, c) = (NodeId(0), NodeId(1), NodeId(2));

        data.record_hop(&pid("p1"), (a, b));
        data.record_hop(&pid("p1"), (b, c));
        data.record_hop(&pid("p2"), Hop::new(c, a));

        assert_eq!(data.hop_count("p1"), 2);
        assert_eq!(data.hop_count("p2"), 1);
        assert_eq!(data.hop_count("never"), 0);
        assert_eq!(data.hops(), 3);
        assert_eq!(data.hops_for("p1"), &[Hop::new(a, b), Hop::new(b, c)]);
        assert!(data.hops_for("never").is_empty());
        assert_eq!(data.participants().count(), 2);
    }

    #[test]
    fn test_coverage() {
        let mut data = SimulationData::new();
        assert_eq!(data.coverage(4).unwrap(), 0.0);

        data.record_hop(&pid("p"), (NodeId(0), NodeId(1)));
        assert_eq!(data.coverage(4).unwrap(), 0.5);

        data.record_hop(&pid("q"), (NodeId(2), NodeId(3)));
        assert_eq!(data.coverage(4).unwrap(), 1.0);

        // repeated visits do not count twice
        data.record_hop(&pid("q"), (NodeId(3), NodeId(0)));
        assert_eq!(data.coverage(4).unwrap(), 1.0);

        // more distinct nodes than claimed still caps at 1
        assert_eq!(data.coverage(2).unwrap(), 1.0);
    }

    #[test]
    fn test_coverage_rejects_zero_nodes() {
        let data = SimulationData::new();
        assert!(matches!(
            data.coverage(0),
            Err(Error::InvalidCoverageDenominator(0))
        ));
    }

    #[test]
    fn test_clock() {
        let mut data = SimulationData::new();
        data.reset_clock();
        data.advance_clock(5.0).unwrap();
        data.advance_clock(3.0).unwrap();
        assert_eq!(data.current_time(), 8.0);
        assert_eq!(data.get_time(), data.current_time());
        assert_eq!(data.delta_time(), 3.0);

        data.reset_clock();
        assert_eq!(data.current_time(), 0.0);
        assert_eq!(data.delta_time(), 3.0);
    }

    #[test]
    fn test_negative_delta_rejected() {
        let mut data = SimulationData::new();
        data.advance_clock(2.0).unwrap();
        assert!(matches!(data.advance_clock(-1.0), Err(Error::InvalidDeltaTime(_))));
        assert!(data.advance_clock(f64::NAN).is_err());
        assert!(data.advance_clock(f64::INFINITY).is_err());
        assert_eq!(data.current_time(), 2.0);
        assert_eq!(data.delta_time(), 2.0);
    }

    #[test]
    fn test_reset_clears_run() {
        let mut data = SimulationData::new();
        data.record_hop(&pid("p"), (NodeId(0), NodeId(1)));
        data.advance_clock(1.5).unwrap();
        data.reset();
        assert_eq!(data.hops(), 0);
        assert_eq!(data.current_time(), 0.0);
        assert_eq!(data.delta_time(), 1.5);
    }
}
