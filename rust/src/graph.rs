//! Data-flow graph of operations and their precedence edges.

use std::collections::VecDeque;

use crate::error::SchedulingError;
use crate::models::OpKind;

/// A single operation (node) of the data-flow graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub id: usize,
    pub kind: OpKind,
    /// Producers that must complete before this operation may start, in edge order.
    pub predecessors: Vec<usize>,
    /// Consumers of this operation, in edge order.
    pub successors: Vec<usize>,
}

impl Operation {
    fn new(id: usize, kind: OpKind) -> Self {
        Self {
            id,
            kind,
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }
}

/// Validated directed acyclic graph of operations.
///
/// Construction rejects out-of-range edge endpoints and cycles, so every pass
/// that receives a `DataFlowGraph` can rely on a topological order existing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataFlowGraph {
    operations: Vec<Operation>,
    edge_count: usize,
}

impl DataFlowGraph {
    /// Build the graph from per-node kinds and an edge list.
    ///
    /// # Errors
    /// * `CapacityExceeded` if `max_nodes` is set and the node count is above it
    /// * `InvalidNodeId` if an edge names a node outside `0..kinds.len()`
    /// * `CircularDependency` if the edges do not form a DAG
    pub fn new(
        kinds: &[OpKind],
        edges: &[(usize, usize)],
        max_nodes: Option<usize>,
    ) -> Result<Self, SchedulingError> {
        let node_count = kinds.len();
        if let Some(max_nodes) = max_nodes {
            if node_count > max_nodes {
                return Err(SchedulingError::CapacityExceeded {
                    node_count,
                    max_nodes,
                });
            }
        }

        let mut operations: Vec<Operation> = kinds
            .iter()
            .enumerate()
            .map(|(id, &kind)| Operation::new(id, kind))
            .collect();

        for &(from, to) in edges {
            if from >= node_count || to >= node_count {
                return Err(SchedulingError::InvalidNodeId {
                    from,
                    to,
                    node_count,
                });
            }
            operations[to].predecessors.push(from);
            operations[from].successors.push(to);
        }

        let graph = Self {
            operations,
            edge_count: edges.len(),
        };
        graph.topological_order()?;
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn operation(&self, id: usize) -> &Operation {
        &self.operations[id]
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn kind(&self, id: usize) -> OpKind {
        self.operations[id].kind
    }

    pub fn predecessors(&self, id: usize) -> &[usize] {
        &self.operations[id].predecessors
    }

    pub fn successors(&self, id: usize) -> &[usize] {
        &self.operations[id].successors
    }

    /// Distinct operation kinds present in the graph, ascending.
    pub fn kinds(&self) -> Vec<OpKind> {
        let mut kinds: Vec<OpKind> = self.operations.iter().map(|op| op.kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }

    /// Node ids of the given kind, in identity order.
    pub fn nodes_of_kind(&self, kind: OpKind) -> Vec<usize> {
        self.operations
            .iter()
            .filter(|op| op.kind == kind)
            .map(|op| op.id)
            .collect()
    }

    /// Order nodes so that every producer precedes its consumers (Kahn's algorithm).
    ///
    /// Ties are resolved by node id, so the order is deterministic.
    ///
    /// # Errors
    /// `CircularDependency` listing every node that could not be ordered.
    pub fn topological_order(&self) -> Result<Vec<usize>, SchedulingError> {
        let mut in_degree: Vec<usize> = self
            .operations
            .iter()
            .map(|op| op.predecessors.len())
            .collect();

        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(id, _)| id)
            .collect();

        let mut order: Vec<usize> = Vec::with_capacity(self.operations.len());

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &succ in &self.operations[id].successors {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() != self.operations.len() {
            let nodes = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &degree)| degree > 0)
                .map(|(id, _)| id)
                .collect();
            return Err(SchedulingError::CircularDependency { nodes });
        }

        Ok(order)
    }
}
