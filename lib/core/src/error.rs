use thiserror::Error;

use crate::node::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown node handle: {0}")]
    UnknownNode(NodeId),

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("Invalid distribution parameters: {0}")]
    InvalidDistribution(String),

    #[error("Coverage requires a positive node count, got {0}")]
    InvalidCoverageDenominator(usize),

    #[error("Delta time must be finite and non-negative, got {0}")]
    InvalidDeltaTime(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),
}
