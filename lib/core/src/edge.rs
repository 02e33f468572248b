use crate::node::NodeId;
use crate::probability::ProbabilityModel;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DISTANCE: f64 = 50.0;

/// Stable handle of an edge inside its [`Graph`](crate::Graph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Parameters for building an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeParams {
    pub distance: f64,
    #[serde(default)]
    pub pdf: Vec<f64>,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            pdf: Vec::new(),
        }
    }
}

impl EdgeParams {
    #[inline]
    #[must_use]
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            pdf: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_pdf(mut self, pdf: Vec<f64>) -> Self {
        self.pdf = pdf;
        self
    }
}

/// Directed connection between two nodes.
///
/// The traversal weight is `distance + sample`, where the sample comes
/// from the edge's [`ProbabilityModel`]. Weights never go below zero.
#[derive(Debug, Clone)]
pub struct Edge {
    name: String,
    source: NodeId,
    destination: NodeId,
    distance: f64,
    model: ProbabilityModel,
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(
        name: String,
        source: NodeId,
        destination: NodeId,
        distance: f64,
        model: ProbabilityModel,
    ) -> Self {
        Self {
            name,
            source,
            destination,
            distance,
            model,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }

    #[inline]
    pub fn model_mut(&mut self) -> &mut ProbabilityModel {
        &mut self.model
    }

    /// Sample a fresh traversal weight
    #[inline]
    pub fn weight(&mut self) -> f64 {
        (self.distance + self.model.sample()).max(0.0)
    }

    /// Weight the edge has on average
    #[inline]
    pub fn expected_weight(&self) -> f64 {
        (self.distance + self.model.mean()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_edge_weight_is_distance() {
        let mut edge = Edge::new(
            "ab".to_string(),
            NodeId(0),
            NodeId(1),
            10.0,
            ProbabilityModel::fixed(),
        );
        assert_eq!(edge.weight(), 10.0);
        assert_eq!(edge.weight(), 10.0);
        assert_eq!(edge.expected_weight(), 10.0);
    }

    #[test]
    fn test_weight_never_negative() {
        let mut edge = Edge::new(
            "neg".to_string(),
            NodeId(0),
            NodeId(1),
            -25.0,
            ProbabilityModel::new(&[5.0], 0).unwrap(),
        );
        assert_eq!(edge.weight(), 0.0);
    }

    #[test]
    fn test_stochastic_weight_adds_sample() {
        let mut edge = Edge::new(
            "s".to_string(),
            NodeId(0),
            NodeId(1),
            50.0,
            ProbabilityModel::new(&[5.0, 1.0], 17).unwrap(),
        );
        for _ in 0..100 {
            assert!(edge.weight() >= 50.0);
        }
        assert_eq!(edge.expected_weight(), 55.0);
    }

    #[test]
    fn test_default_params() {
        let params = EdgeParams::default();
        assert_eq!(params.distance, DEFAULT_DISTANCE);
        assert!(params.pdf.is_empty());
    }
}
