//! As-Late-As-Possible scheduling under resource constraints.

use crate::config::SchedulingConfig;
use crate::error::SchedulingError;
use crate::graph::DataFlowGraph;
use crate::models::{Cycle, Schedule};
use crate::resources::ResourcePool;
use crate::{log_changes, log_debug};

use super::place_ready;
use super::state::{Direction, ScheduleContext};

/// Result of the backward pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlapOutcome {
    pub schedule: Schedule,
    /// Horizon the schedule was built against. Equal to the requested horizon
    /// unless resource contention forced it to grow.
    pub horizon: Cycle,
}

/// Place every operation so that it completes as late as possible without any
/// operation completing after `horizon`.
///
/// Time runs from `horizon` down to 0. A node becomes ready once all of its
/// successors have started; it then completes at the current cycle on the first
/// free unit of its kind. If greedy placement cannot fit every node into
/// `[0, horizon]`, the pass is repeated with the horizon one cycle later, up to
/// the serial bound where a fit is guaranteed.
///
/// # Errors
/// * `ResourceStarvation` if the graph uses a kind the pool cannot serve
/// * `FailedToSchedule` if no horizon up to the serial bound fits
pub fn alap_schedule(
    graph: &DataFlowGraph,
    pool: &ResourcePool,
    horizon: Cycle,
    config: &SchedulingConfig,
) -> Result<AlapOutcome, SchedulingError> {
    pool.check_coverage(graph)?;

    let verbosity = config.verbosity;
    let bound = pool.serial_bound(graph).max(horizon);
    let order: Vec<usize> = (0..graph.len()).collect();
    let mut horizon = horizon.max(0);

    loop {
        log_changes!(verbosity, "ALAP: {} nodes, horizon {}", graph.len(), horizon);
        match run_backward(graph, pool, &order, horizon, verbosity) {
            Ok(schedule) => return Ok(AlapOutcome { schedule, horizon }),
            Err(pending) if horizon >= bound => {
                return Err(SchedulingError::FailedToSchedule(pending));
            }
            Err(pending) => {
                log_changes!(
                    verbosity,
                    "ALAP: nodes {:?} do not fit before cycle 0, extending horizon to {}",
                    pending,
                    horizon + 1
                );
                horizon += 1;
            }
        }
    }
}

/// One backward sweep. Returns the nodes left pending when time runs out.
fn run_backward(
    graph: &DataFlowGraph,
    pool: &ResourcePool,
    order: &[usize],
    horizon: Cycle,
    verbosity: u8,
) -> Result<Schedule, Vec<usize>> {
    let mut ctx = ScheduleContext::new(graph, pool, Direction::Backward);
    let mut time = horizon;

    while time >= 0 {
        let started = ctx.advance_to(time);
        log_debug!(verbosity, "ALAP cycle {}: started {:?}", time, started);

        if ctx.all_done() {
            break;
        }

        place_ready(&mut ctx, order, time, verbosity, "ALAP");
        time -= 1;
    }

    if ctx.all_done() {
        Ok(ctx.to_schedule())
    } else {
        Err(ctx.pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OpKind, ResourceSpec, ScheduledOp};

    fn graph(kinds: &[OpKind], edges: &[(usize, usize)]) -> DataFlowGraph {
        DataFlowGraph::new(kinds, edges, None).unwrap()
    }

    #[test]
    fn test_reference_example() {
        let graph = graph(
            &[OpKind::ADD, OpKind::ADD, OpKind::MULTIPLY, OpKind::ADD],
            &[(0, 2), (1, 2), (2, 3)],
        );
        let pool = ResourcePool::new(&[
            ResourceSpec::new(OpKind::ADD, 1),
            ResourceSpec::new(OpKind::ADD, 1),
            ResourceSpec::new(OpKind::MULTIPLY, 2),
        ])
        .unwrap();

        let outcome = alap_schedule(&graph, &pool, 4, &SchedulingConfig::default()).unwrap();
        assert_eq!(outcome.horizon, 4);
        let s = &outcome.schedule;
        assert_eq!(s.get(0), Some(ScheduledOp::new(0, 1)));
        assert_eq!(s.get(1), Some(ScheduledOp::new(0, 1)));
        assert_eq!(s.get(2), Some(ScheduledOp::new(1, 3)));
        assert_eq!(s.get(3), Some(ScheduledOp::new(3, 4)));
    }

    #[test]
    fn test_off_path_node_moves_late() {
        // 0 -> 1 -> 2 is the long chain; 3 is independent and slides to the end.
        let graph = graph(&[OpKind::ADD; 4], &[(0, 1), (1, 2)]);
        let pool = ResourcePool::new(&[
            ResourceSpec::new(OpKind::ADD, 1),
            ResourceSpec::new(OpKind::ADD, 1),
        ])
        .unwrap();

        let outcome = alap_schedule(&graph, &pool, 3, &SchedulingConfig::default()).unwrap();
        let s = &outcome.schedule;
        assert_eq!(s.get(0), Some(ScheduledOp::new(0, 1)));
        assert_eq!(s.get(1), Some(ScheduledOp::new(1, 2)));
        assert_eq!(s.get(2), Some(ScheduledOp::new(2, 3)));
        assert_eq!(s.get(3), Some(ScheduledOp::new(2, 3)));
        assert_eq!(s.makespan(), 3);
    }

    #[test]
    fn test_completion_before_successor_start() {
        let graph = graph(
            &[OpKind::MULTIPLY, OpKind::ADD, OpKind::ADD],
            &[(0, 2), (1, 2)],
        );
        let pool = ResourcePool::new(&[
            ResourceSpec::new(OpKind::ADD, 1),
            ResourceSpec::new(OpKind::MULTIPLY, 3),
        ])
        .unwrap();

        let outcome = alap_schedule(&graph, &pool, 4, &SchedulingConfig::default()).unwrap();
        let s = &outcome.schedule;
        assert_eq!(s.get(2), Some(ScheduledOp::new(3, 4)));
        assert_eq!(s.get(0), Some(ScheduledOp::new(0, 3)));
        assert_eq!(s.get(1), Some(ScheduledOp::new(2, 3)));
    }

    #[test]
    fn test_horizon_extended_when_too_tight() {
        // Two independent adds on one adder cannot finish by cycle 1.
        let graph = graph(&[OpKind::ADD, OpKind::ADD], &[]);
        let pool = ResourcePool::new(&[ResourceSpec::new(OpKind::ADD, 1)]).unwrap();

        let outcome = alap_schedule(&graph, &pool, 1, &SchedulingConfig::default()).unwrap();
        assert_eq!(outcome.horizon, 2);
        assert_eq!(outcome.schedule.get(0), Some(ScheduledOp::new(1, 2)));
        assert_eq!(outcome.schedule.get(1), Some(ScheduledOp::new(0, 1)));
    }

    #[test]
    fn test_empty_graph() {
        let graph = graph(&[], &[]);
        let pool = ResourcePool::new(&[]).unwrap();
        let outcome = alap_schedule(&graph, &pool, 0, &SchedulingConfig::default()).unwrap();
        assert!(outcome.schedule.is_empty());
        assert_eq!(outcome.horizon, 0);
    }
}
