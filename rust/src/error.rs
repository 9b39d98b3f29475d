//! Error types shared by graph construction, resource validation and the scheduling passes.

use thiserror::Error;

use crate::models::{Cycle, OpKind};

/// Errors that can occur while validating input or scheduling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("Edge {from} -> {to} references a node outside 0..{node_count}")]
    InvalidNodeId {
        from: usize,
        to: usize,
        node_count: usize,
    },
    #[error("Graph has {node_count} nodes, limit is {max_nodes}")]
    CapacityExceeded { node_count: usize, max_nodes: usize },
    #[error("Resource {resource} has latency {latency}, must be at least 1")]
    InvalidLatency { resource: usize, latency: Cycle },
    #[error("No {kind} resource available for nodes {nodes:?}")]
    ResourceStarvation { kind: OpKind, nodes: Vec<usize> },
    #[error("Circular dependency detected among nodes {nodes:?}")]
    CircularDependency { nodes: Vec<usize> },
    #[error("Failed to schedule nodes: {0:?}")]
    FailedToSchedule(Vec<usize>),
    #[error("Unknown tie-break policy: {0}")]
    UnknownTieBreak(String),
    #[error("Mobility covers {actual} nodes, graph has {expected}")]
    MobilityMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SchedulingError::InvalidNodeId {
            from: 0,
            to: 9,
            node_count: 4,
        };
        assert_eq!(
            err.to_string(),
            "Edge 0 -> 9 references a node outside 0..4"
        );

        let err = SchedulingError::ResourceStarvation {
            kind: OpKind::MULTIPLY,
            nodes: vec![2],
        };
        assert_eq!(err.to_string(), "No MULTIPLY resource available for nodes [2]");

        let err = SchedulingError::CircularDependency { nodes: vec![0, 1] };
        assert_eq!(
            err.to_string(),
            "Circular dependency detected among nodes [0, 1]"
        );

        let err = SchedulingError::MobilityMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Mobility covers 3 nodes, graph has 4");
    }
}
