//! Core data types for the scheduling system.

use std::fmt;

/// Discrete time step of the scheduling simulation.
///
/// Signed because the backward pass computes `completion - latency`, which can
/// drop below zero before the horizon check rejects it.
pub type Cycle = i64;

/// Operation kind tag. Each kind is served by exactly one resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpKind(pub u32);

impl OpKind {
    pub const ADD: OpKind = OpKind(1);
    pub const MULTIPLY: OpKind = OpKind(2);

    pub fn tag(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OpKind::ADD => write!(f, "ADD"),
            OpKind::MULTIPLY => write!(f, "MULTIPLY"),
            OpKind(tag) => write!(f, "KIND{}", tag),
        }
    }
}

/// Description of one execution unit in the input resource pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    pub kind: OpKind,
    /// Cycles from start to completion.
    pub latency: Cycle,
}

impl ResourceSpec {
    pub fn new(kind: OpKind, latency: Cycle) -> Self {
        Self { kind, latency }
    }
}

/// Parsed problem: nodes, precedence edges and the resource pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProblemSpec {
    /// Operation kind of each node, indexed by node id.
    pub kinds: Vec<OpKind>,
    /// Producer -> consumer pairs.
    pub edges: Vec<(usize, usize)>,
    pub resources: Vec<ResourceSpec>,
}

/// Placement of a single operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledOp {
    pub start: Cycle,
    pub completion: Cycle,
}

impl ScheduledOp {
    pub fn new(start: Cycle, completion: Cycle) -> Self {
        Self { start, completion }
    }

    pub fn duration(&self) -> Cycle {
        self.completion - self.start
    }

    /// Whether the operation occupies its unit during `cycle` (half-open interval).
    pub fn occupies(&self, cycle: Cycle) -> bool {
        self.start <= cycle && cycle < self.completion
    }
}

/// Result of one scheduling pass: a placement (or none) per node id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<Option<ScheduledOp>>,
}

impl Schedule {
    pub fn new(entries: Vec<Option<ScheduledOp>>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<ScheduledOp> {
        self.entries.get(id).copied().flatten()
    }

    pub fn start(&self, id: usize) -> Option<Cycle> {
        self.get(id).map(|op| op.start)
    }

    pub fn completion(&self, id: usize) -> Option<Cycle> {
        self.get(id).map(|op| op.completion)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<ScheduledOp>)> + '_ {
        self.entries.iter().copied().enumerate()
    }

    /// True when every node received a placement.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    /// Node ids that were never placed.
    pub fn unscheduled(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, op)| op.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Maximum completion time over all placed operations (0 when nothing is placed).
    pub fn makespan(&self) -> Cycle {
        self.entries
            .iter()
            .flatten()
            .map(|op| op.completion)
            .max()
            .unwrap_or(0)
    }
}
