//! Typed, latency-tagged execution units and their time-indexed availability.

use rustc_hash::FxHashMap;

use crate::error::SchedulingError;
use crate::graph::DataFlowGraph;
use crate::models::{Cycle, OpKind, ResourceSpec};

/// A single execution unit.
///
/// `next_time` is the cycle at which the unit is released again: the completion
/// cycle in the forward direction, the start cycle in the backward direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub id: usize,
    pub kind: OpKind,
    pub latency: Cycle,
    pub available: bool,
    pub next_time: Cycle,
}

impl Resource {
    fn new(id: usize, spec: ResourceSpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            latency: spec.latency,
            available: true,
            next_time: 0,
        }
    }

    /// Display name, e.g. `MULTIPLY#5`.
    pub fn name(&self) -> String {
        format!("{}#{}", self.kind, self.id)
    }
}

/// Fixed collection of resources, partitioned by kind.
///
/// Units of one kind are kept in input order; acquisition always picks the first
/// free unit, which keeps every pass deterministic.
#[derive(Clone, Debug)]
pub struct ResourcePool {
    resources: Vec<Resource>,
    by_kind: FxHashMap<OpKind, Vec<usize>>,
}

impl ResourcePool {
    /// Build a pool from resource specs.
    ///
    /// # Errors
    /// `InvalidLatency` if any unit has a latency below 1.
    pub fn new(specs: &[ResourceSpec]) -> Result<Self, SchedulingError> {
        let mut resources = Vec::with_capacity(specs.len());
        let mut by_kind: FxHashMap<OpKind, Vec<usize>> = FxHashMap::default();

        for (id, &spec) in specs.iter().enumerate() {
            if spec.latency < 1 {
                return Err(SchedulingError::InvalidLatency {
                    resource: id,
                    latency: spec.latency,
                });
            }
            by_kind.entry(spec.kind).or_default().push(id);
            resources.push(Resource::new(id, spec));
        }

        Ok(Self {
            resources,
            by_kind,
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, id: usize) -> &Resource {
        &self.resources[id]
    }

    /// Number of units serving `kind`.
    pub fn count_of(&self, kind: OpKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Slowest latency among units serving `kind`.
    pub fn max_latency(&self, kind: OpKind) -> Option<Cycle> {
        self.by_kind
            .get(&kind)?
            .iter()
            .map(|&id| self.resources[id].latency)
            .max()
    }

    /// Reject graphs that use a kind no unit can serve.
    pub fn check_coverage(&self, graph: &DataFlowGraph) -> Result<(), SchedulingError> {
        for kind in graph.kinds() {
            if self.count_of(kind) == 0 {
                return Err(SchedulingError::ResourceStarvation {
                    kind,
                    nodes: graph.nodes_of_kind(kind),
                });
            }
        }
        Ok(())
    }

    /// Upper bound on the length of any greedy pass over `graph`.
    ///
    /// At every cycle before completion at least one node is in flight, so the
    /// serial sum of the slowest matching latency per node cannot be exceeded.
    pub fn serial_bound(&self, graph: &DataFlowGraph) -> Cycle {
        graph
            .operations()
            .iter()
            .map(|op| self.max_latency(op.kind).unwrap_or(0))
            .sum()
    }

    /// Return every unit to its initial state (available, next_time = 0).
    pub fn reset(&mut self) {
        for resource in &mut self.resources {
            resource.available = true;
            resource.next_time = 0;
        }
    }

    /// Mark available every unit whose release cycle is `time`.
    pub fn release_due(&mut self, time: Cycle) {
        for resource in &mut self.resources {
            if resource.next_time == time {
                resource.available = true;
            }
        }
    }

    /// First free unit of `kind`, if any.
    pub fn find_available(&self, kind: OpKind) -> Option<usize> {
        self.by_kind
            .get(&kind)?
            .iter()
            .copied()
            .find(|&id| self.resources[id].available)
    }

    pub fn has_available(&self, kind: OpKind) -> bool {
        self.find_available(kind).is_some()
    }

    /// Occupy unit `id` until `next_time`.
    pub fn acquire(&mut self, id: usize, next_time: Cycle) {
        let resource = &mut self.resources[id];
        debug_assert!(resource.available, "{} acquired while busy", resource.name());
        resource.available = false;
        resource.next_time = next_time;
    }

    /// Number of busy units serving `kind`.
    pub fn in_use(&self, kind: OpKind) -> usize {
        self.by_kind.get(&kind).map_or(0, |ids| {
            ids.iter().filter(|&&id| !self.resources[id].available).count()
        })
    }
}
