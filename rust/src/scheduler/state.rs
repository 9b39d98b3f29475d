//! Per-run scheduling state.

use crate::graph::DataFlowGraph;
use crate::models::{Cycle, ScheduledOp, Schedule};
use crate::resources::ResourcePool;

use super::readiness::{all_predecessors_done, all_successors_done};

/// Direction in which a pass walks the time axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Time increases from 0; nodes wait for their predecessors.
    Forward,
    /// Time decreases from the horizon; nodes wait for their successors.
    Backward,
}

/// Mutable state of a single scheduling pass over a read-only graph.
///
/// Built fresh for each pass from a reset copy of the pool.
#[derive(Clone, Debug)]
pub struct ScheduleContext<'g> {
    graph: &'g DataFlowGraph,
    pool: ResourcePool,
    direction: Direction,
    start: Vec<Option<Cycle>>,
    completion: Vec<Option<Cycle>>,
    in_flight: Vec<bool>,
    /// Nodes whose dependents may now become ready.
    done: Vec<bool>,
}

impl<'g> ScheduleContext<'g> {
    /// Create a context with a freshly reset copy of `pool`.
    pub fn new(graph: &'g DataFlowGraph, pool: &ResourcePool, direction: Direction) -> Self {
        let n = graph.len();
        let mut pool = pool.clone();
        pool.reset();
        Self {
            graph,
            pool,
            direction,
            start: vec![None; n],
            completion: vec![None; n],
            in_flight: vec![false; n],
            done: vec![false; n],
        }
    }

    pub fn graph(&self) -> &'g DataFlowGraph {
        self.graph
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_done(&self, id: usize) -> bool {
        self.done[id]
    }

    pub fn is_in_flight(&self, id: usize) -> bool {
        self.in_flight[id]
    }

    pub fn all_done(&self) -> bool {
        self.done.iter().all(|&d| d)
    }

    /// Nodes currently executing, in identity order.
    pub fn in_flight_nodes(&self) -> Vec<usize> {
        (0..self.graph.len())
            .filter(|&id| self.in_flight[id] && !self.done[id])
            .collect()
    }

    /// Release units whose release cycle is `time`, then mark nodes that reach
    /// their boundary at `time` as done. Returns the newly marked nodes.
    ///
    /// The boundary is the completion cycle going forward and the start cycle
    /// going backward.
    pub fn advance_to(&mut self, time: Cycle) -> Vec<usize> {
        self.pool.release_due(time);

        let boundary = match self.direction {
            Direction::Forward => &self.completion,
            Direction::Backward => &self.start,
        };
        let reached: Vec<usize> = (0..self.graph.len())
            .filter(|&id| !self.done[id] && boundary[id] == Some(time))
            .collect();

        for &id in &reached {
            self.done[id] = true;
            self.in_flight[id] = false;
        }
        reached
    }

    /// Structurally ready: not done, not in flight, and every neighbour on the
    /// dependency side already done.
    pub fn is_ready(&self, id: usize) -> bool {
        if self.done[id] || self.in_flight[id] {
            return false;
        }
        let op = self.graph.operation(id);
        match self.direction {
            Direction::Forward => all_predecessors_done(op, &self.done),
            Direction::Backward => all_successors_done(op, &self.done),
        }
    }

    /// Ready and a unit of the matching kind is free.
    pub fn is_eligible(&self, id: usize) -> bool {
        self.is_ready(id) && self.pool.has_available(self.graph.kind(id))
    }

    /// Try to place `id` at `time` on the first free unit of its kind.
    ///
    /// Going forward the node starts at `time`; going backward it completes at
    /// `time`. Returns the placement and the unit used, or `None` when no unit
    /// of the kind is free.
    pub fn try_place(&mut self, id: usize, time: Cycle) -> Option<(ScheduledOp, usize)> {
        let kind = self.graph.kind(id);
        let resource_id = self.pool.find_available(kind)?;
        let latency = self.pool.resource(resource_id).latency;

        let (placed, release_at) = match self.direction {
            Direction::Forward => (ScheduledOp::new(time, time + latency), time + latency),
            Direction::Backward => (ScheduledOp::new(time - latency, time), time - latency),
        };

        self.pool.acquire(resource_id, release_at);
        self.start[id] = Some(placed.start);
        self.completion[id] = Some(placed.completion);
        self.in_flight[id] = true;
        Some((placed, resource_id))
    }

    /// Nodes that have not been marked done.
    pub fn pending(&self) -> Vec<usize> {
        (0..self.graph.len()).filter(|&id| !self.done[id]).collect()
    }

    /// Snapshot of the placements made so far.
    pub fn to_schedule(&self) -> Schedule {
        Schedule::new(
            self.start
                .iter()
                .zip(&self.completion)
                .map(|(start, completion)| match (start, completion) {
                    (Some(s), Some(c)) => Some(ScheduledOp::new(*s, *c)),
                    _ => None,
                })
                .collect(),
        )
    }
}
