//! As-Soon-As-Possible scheduling under resource constraints.

use crate::config::SchedulingConfig;
use crate::error::SchedulingError;
use crate::graph::DataFlowGraph;
use crate::models::{Cycle, Schedule};
use crate::resources::ResourcePool;
use crate::{log_changes, log_debug};

use super::place_ready;
use super::state::{Direction, ScheduleContext};

/// Place every operation at the earliest cycle where its predecessors have
/// completed and a unit of its kind is free.
///
/// Competing ready nodes are visited in ascending id order and take the first
/// free unit. A node is never held back once it is ready and a unit is free.
///
/// # Errors
/// * `ResourceStarvation` if the graph uses a kind the pool cannot serve
/// * `FailedToSchedule` if the pass runs past its serial bound
pub fn asap_schedule(
    graph: &DataFlowGraph,
    pool: &ResourcePool,
    config: &SchedulingConfig,
) -> Result<Schedule, SchedulingError> {
    pool.check_coverage(graph)?;

    let verbosity = config.verbosity;
    let bound = pool.serial_bound(graph);
    let order: Vec<usize> = (0..graph.len()).collect();
    let mut ctx = ScheduleContext::new(graph, pool, Direction::Forward);
    let mut time: Cycle = 0;

    log_changes!(verbosity, "ASAP: {} nodes, bound {}", graph.len(), bound);

    loop {
        let completed = ctx.advance_to(time);
        log_debug!(verbosity, "ASAP cycle {}: completed {:?}", time, completed);

        if ctx.all_done() {
            break;
        }
        if time > bound {
            return Err(SchedulingError::FailedToSchedule(ctx.pending()));
        }

        place_ready(&mut ctx, &order, time, verbosity, "ASAP");
        time += 1;
    }

    let schedule = ctx.to_schedule();
    log_changes!(verbosity, "ASAP: makespan {}", schedule.makespan());
    Ok(schedule)
}
