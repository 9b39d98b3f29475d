//! Scheduling slack derived from the ASAP and ALAP passes.

use crate::models::{Cycle, Schedule};

/// Per-node mobility: cycles a node can shift without lengthening the schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mobility {
    values: Vec<Cycle>,
}

impl Mobility {
    pub fn new(values: Vec<Cycle>) -> Self {
        Self { values }
    }

    /// Mobility of every node set to zero; used when no ALAP pass is available.
    pub fn zeros(node_count: usize) -> Self {
        Self {
            values: vec![0; node_count],
        }
    }

    pub fn get(&self, id: usize) -> Cycle {
        self.values[id]
    }

    pub fn values(&self) -> &[Cycle] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Zero slack: the node lies on a critical path.
    pub fn is_critical(&self, id: usize) -> bool {
        self.values[id] == 0
    }

    pub fn critical_nodes(&self) -> Vec<usize> {
        (0..self.values.len())
            .filter(|&id| self.is_critical(id))
            .collect()
    }
}

/// Compute `ALAP start - ASAP start` for every node.
///
/// Greedy backward placement under contention can occasionally start a node
/// earlier than its forward placement; such values are clamped to 0. A node
/// missing from either schedule gets mobility 0.
///
/// Values are only relative to the ALAP horizon. When that horizon is later
/// than the ASAP makespan, a node on the critical path can show nonzero
/// mobility; see `SynthesisResult::horizon_extended`.
pub fn compute_mobility(asap: &Schedule, alap: &Schedule) -> Mobility {
    let values = (0..asap.len())
        .map(|id| match (asap.start(id), alap.start(id)) {
            (Some(early), Some(late)) => (late - early).max(0),
            _ => 0,
        })
        .collect();
    Mobility::new(values)
}
