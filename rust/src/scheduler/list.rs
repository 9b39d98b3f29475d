//! Resource-constrained list scheduling with a per-cycle trace.

use std::collections::BTreeMap;

use crate::config::{SchedulingConfig, TieBreak};
use crate::error::SchedulingError;
use crate::graph::DataFlowGraph;
use crate::mobility::Mobility;
use crate::models::{Cycle, OpKind, Schedule};
use crate::resources::ResourcePool;
use crate::trace::CycleTrace;
use crate::{log_changes, log_debug};

use super::place_ready;
use super::state::{Direction, ScheduleContext};

/// Result of the list scheduling pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOutcome {
    pub schedule: Schedule,
    /// Empty when `record_trace` is off.
    pub trace: Vec<CycleTrace>,
}

/// Order in which ready nodes are offered a unit each cycle.
pub fn priority_order(mobility: &Mobility, tie_break: TieBreak) -> Vec<usize> {
    let mut order: Vec<usize> = (0..mobility.len()).collect();
    if tie_break == TieBreak::LeastMobility {
        order.sort_by_key(|&id| (mobility.get(id), id));
    }
    order
}

/// Ready nodes of each kind that currently have a free unit, in id order.
fn candidates_by_kind(
    ctx: &ScheduleContext<'_>,
    kinds: &[OpKind],
) -> BTreeMap<OpKind, Vec<usize>> {
    let graph = ctx.graph();
    kinds
        .iter()
        .map(|&kind| {
            let nodes = graph
                .nodes_of_kind(kind)
                .into_iter()
                .filter(|&id| ctx.is_eligible(id))
                .collect();
            (kind, nodes)
        })
        .collect()
}

/// Forward list scheduling.
///
/// Same cycle structure as the ASAP pass. Competing ready nodes are visited in
/// the order given by `config.tie_break`: with `NodeOrder` the result matches
/// ASAP exactly, with `LeastMobility` nodes with the least slack are served
/// first. When `config.record_trace` is set, each cycle's candidates,
/// placements and in-flight nodes are recorded.
///
/// # Errors
/// * `ResourceStarvation` if the graph uses a kind the pool cannot serve
/// * `MobilityMismatch` if `mobility` does not have one entry per node
/// * `FailedToSchedule` if the pass runs past its serial bound
pub fn list_schedule(
    graph: &DataFlowGraph,
    pool: &ResourcePool,
    mobility: &Mobility,
    config: &SchedulingConfig,
) -> Result<ListOutcome, SchedulingError> {
    pool.check_coverage(graph)?;
    if mobility.len() != graph.len() {
        return Err(SchedulingError::MobilityMismatch {
            expected: graph.len(),
            actual: mobility.len(),
        });
    }

    let verbosity = config.verbosity;
    let bound = pool.serial_bound(graph);
    let kinds = graph.kinds();
    let order = priority_order(mobility, config.tie_break);
    let mut ctx = ScheduleContext::new(graph, pool, Direction::Forward);
    let mut trace: Vec<CycleTrace> = Vec::new();
    let mut time: Cycle = 0;

    log_changes!(
        verbosity,
        "LIST: {} nodes, tie-break {}, order {:?}",
        graph.len(),
        config.tie_break,
        order
    );

    loop {
        let completed = ctx.advance_to(time);
        log_debug!(verbosity, "LIST cycle {}: completed {:?}", time, completed);

        let candidates = if config.record_trace {
            candidates_by_kind(&ctx, &kinds)
        } else {
            BTreeMap::new()
        };

        let scheduled = place_ready(&mut ctx, &order, time, verbosity, "LIST");

        if config.record_trace {
            trace.push(CycleTrace {
                cycle: time,
                candidates,
                scheduled,
                in_flight: ctx.in_flight_nodes(),
            });
        }

        if ctx.all_done() {
            break;
        }
        if time > bound {
            return Err(SchedulingError::FailedToSchedule(ctx.pending()));
        }
        time += 1;
    }

    let schedule = ctx.to_schedule();
    log_changes!(verbosity, "LIST: makespan {}", schedule.makespan());
    Ok(ListOutcome { schedule, trace })
}
