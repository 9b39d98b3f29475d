//! End-to-end synthesis: validate, ASAP, ALAP, mobility, list scheduling.

use crate::config::SchedulingConfig;
use crate::error::SchedulingError;
use crate::graph::DataFlowGraph;
use crate::log_changes;
use crate::mobility::{compute_mobility, Mobility};
use crate::models::{Cycle, ProblemSpec, Schedule};
use crate::resources::ResourcePool;
use crate::scheduler::{alap_schedule, asap_schedule, list_schedule};
use crate::trace::CycleTrace;

/// Everything the three passes produce for one problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisResult {
    pub asap: Schedule,
    pub alap: Schedule,
    /// Horizon the ALAP pass actually used. Later than the ASAP makespan when
    /// the backward pass could not fit at that makespan.
    pub alap_horizon: Cycle,
    /// Measured against `alap_horizon`.
    pub mobility: Mobility,
    /// Final schedule from the list scheduler.
    pub schedule: Schedule,
    pub trace: Vec<CycleTrace>,
}

impl SynthesisResult {
    pub fn makespan(&self) -> Cycle {
        self.schedule.makespan()
    }

    /// The ALAP pass ran at a horizon later than the ASAP makespan.
    ///
    /// When set, ASAP and ALAP makespans differ and mobility includes the
    /// extra cycles, so a zero-slack node may report nonzero mobility.
    pub fn horizon_extended(&self) -> bool {
        self.alap_horizon > self.asap.makespan()
    }
}

/// Build graph and pool from a parsed problem and run every pass.
///
/// # Errors
/// Any validation failure (`InvalidNodeId`, `CapacityExceeded`,
/// `CircularDependency`, `InvalidLatency`, `ResourceStarvation`) is reported
/// before a single cycle is simulated.
pub fn synthesize(
    problem: &ProblemSpec,
    config: &SchedulingConfig,
) -> Result<SynthesisResult, SchedulingError> {
    let graph = DataFlowGraph::new(&problem.kinds, &problem.edges, config.max_nodes)?;
    let pool = ResourcePool::new(&problem.resources)?;
    synthesize_graph(&graph, &pool, config)
}

/// Run every pass over an already validated graph and pool.
pub fn synthesize_graph(
    graph: &DataFlowGraph,
    pool: &ResourcePool,
    config: &SchedulingConfig,
) -> Result<SynthesisResult, SchedulingError> {
    pool.check_coverage(graph)?;

    let asap = asap_schedule(graph, pool, config)?;
    let alap = alap_schedule(graph, pool, asap.makespan(), config)?;
    if alap.horizon > asap.makespan() {
        log_changes!(
            config.verbosity,
            "ALAP horizon {} exceeds ASAP makespan {}, mobility is relative to it",
            alap.horizon,
            asap.makespan()
        );
    }
    let mobility = compute_mobility(&asap, &alap.schedule);
    log_changes!(
        config.verbosity,
        "Mobility: {:?} (critical: {:?})",
        mobility.values(),
        mobility.critical_nodes()
    );
    let list = list_schedule(graph, pool, &mobility, config)?;

    Ok(SynthesisResult {
        asap,
        alap: alap.schedule,
        alap_horizon: alap.horizon,
        mobility,
        schedule: list.schedule,
        trace: list.trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TieBreak;
    use crate::models::{OpKind, ResourceSpec, ScheduledOp};

    fn problem(
        kinds: &[OpKind],
        edges: &[(usize, usize)],
        resources: &[ResourceSpec],
    ) -> ProblemSpec {
        ProblemSpec {
            kinds: kinds.to_vec(),
            edges: edges.to_vec(),
            resources: resources.to_vec(),
        }
    }

    fn reference() -> ProblemSpec {
        problem(
            &[OpKind::ADD, OpKind::ADD, OpKind::MULTIPLY, OpKind::ADD],
            &[(0, 2), (1, 2), (2, 3)],
            &[
                ResourceSpec::new(OpKind::ADD, 1),
                ResourceSpec::new(OpKind::ADD, 1),
                ResourceSpec::new(OpKind::MULTIPLY, 2),
            ],
        )
    }

    /// Wide fan-in under contention: six adds feed three multiplies, which feed
    /// a final add; two adders, one multiplier, plus a side chain 10 -> 11.
    fn fan_in() -> ProblemSpec {
        let mut kinds = vec![OpKind::ADD; 6];
        kinds.extend([OpKind::MULTIPLY; 3]);
        kinds.push(OpKind::ADD);
        kinds.extend([OpKind::ADD, OpKind::MULTIPLY]);
        problem(
            &kinds,
            &[
                (0, 6),
                (1, 6),
                (2, 7),
                (3, 7),
                (4, 8),
                (5, 8),
                (6, 9),
                (7, 9),
                (8, 9),
                (10, 11),
            ],
            &[
                ResourceSpec::new(OpKind::ADD, 1),
                ResourceSpec::new(OpKind::ADD, 1),
                ResourceSpec::new(OpKind::MULTIPLY, 2),
            ],
        )
    }

    fn samples() -> Vec<ProblemSpec> {
        vec![
            reference(),
            fan_in(),
            problem(
                &[OpKind::ADD; 4],
                &[(0, 1), (1, 2)],
                &[
                    ResourceSpec::new(OpKind::ADD, 1),
                    ResourceSpec::new(OpKind::ADD, 1),
                ],
            ),
            problem(
                &[OpKind::MULTIPLY, OpKind::ADD, OpKind::ADD, OpKind::MULTIPLY],
                &[(0, 1), (0, 2), (1, 3), (2, 3)],
                &[
                    ResourceSpec::new(OpKind::ADD, 1),
                    ResourceSpec::new(OpKind::MULTIPLY, 3),
                ],
            ),
        ]
    }

    #[test]
    fn test_reference_end_to_end() {
        let result = synthesize(&reference(), &SchedulingConfig::default()).unwrap();

        assert_eq!(result.asap.get(0), Some(ScheduledOp::new(0, 1)));
        assert_eq!(result.asap.get(1), Some(ScheduledOp::new(0, 1)));
        assert_eq!(result.asap.get(2), Some(ScheduledOp::new(1, 3)));
        assert_eq!(result.asap.get(3), Some(ScheduledOp::new(3, 4)));
        assert_eq!(result.asap.makespan(), 4);
        assert_eq!(result.alap_horizon, 4);
        assert_eq!(result.mobility.values(), &[0, 0, 0, 0]);
        assert_eq!(result.schedule, result.asap);
        assert_eq!(result.makespan(), 4);
    }

    #[test]
    fn test_cycle_rejected() {
        let spec = problem(
            &[OpKind::ADD, OpKind::ADD],
            &[(0, 1), (1, 0)],
            &[ResourceSpec::new(OpKind::ADD, 1)],
        );
        assert_eq!(
            synthesize(&spec, &SchedulingConfig::default()),
            Err(SchedulingError::CircularDependency { nodes: vec![0, 1] })
        );
    }

    #[test]
    fn test_starvation_rejected() {
        let spec = problem(
            &[OpKind::ADD, OpKind::MULTIPLY],
            &[(0, 1)],
            &[ResourceSpec::new(OpKind::ADD, 1)],
        );
        assert!(matches!(
            synthesize(&spec, &SchedulingConfig::default()),
            Err(SchedulingError::ResourceStarvation { kind, .. }) if kind == OpKind::MULTIPLY
        ));
    }

    #[test]
    fn test_invalid_edge_rejected() {
        let mut spec = reference();
        spec.edges.push((3, 4));
        assert!(matches!(
            synthesize(&spec, &SchedulingConfig::default()),
            Err(SchedulingError::InvalidNodeId { to: 4, .. })
        ));
    }

    #[test]
    fn test_asap_respects_predecessors() {
        for spec in samples() {
            let graph = DataFlowGraph::new(&spec.kinds, &spec.edges, None).unwrap();
            let result = synthesize(&spec, &SchedulingConfig::default()).unwrap();
            for op in graph.operations() {
                let start = result.asap.start(op.id).unwrap();
                for &pred in &op.predecessors {
                    assert!(start >= result.asap.completion(pred).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_asap_starts_as_soon_as_a_unit_is_free() {
        for spec in samples() {
            let graph = DataFlowGraph::new(&spec.kinds, &spec.edges, None).unwrap();
            let pool = ResourcePool::new(&spec.resources).unwrap();
            let result = synthesize(&spec, &SchedulingConfig::default()).unwrap();
            let asap = &result.asap;

            for op in graph.operations() {
                let start = asap.start(op.id).unwrap();
                let released = op
                    .predecessors
                    .iter()
                    .map(|&pred| asap.completion(pred).unwrap())
                    .max()
                    .unwrap_or(0);
                assert!(start >= released);

                // Every cycle the node waited past its release, all units of its
                // kind were occupied.
                for cycle in released..start {
                    let busy = graph
                        .nodes_of_kind(op.kind)
                        .into_iter()
                        .filter(|&id| asap.get(id).unwrap().occupies(cycle))
                        .count();
                    assert_eq!(busy, pool.count_of(op.kind), "node {} at {}", op.id, cycle);
                }
            }
        }
    }

    #[test]
    fn test_reference_asap_starts_at_predecessor_completion() {
        let spec = reference();
        let graph = DataFlowGraph::new(&spec.kinds, &spec.edges, None).unwrap();
        let result = synthesize(&spec, &SchedulingConfig::default()).unwrap();
        for op in graph.operations().iter().filter(|op| !op.is_source()) {
            let start = result.asap.start(op.id).unwrap();
            assert!(op
                .predecessors
                .iter()
                .any(|&pred| result.asap.completion(pred) == Some(start)));
        }
    }

    #[test]
    fn test_alap_completes_before_successors() {
        for spec in samples() {
            let graph = DataFlowGraph::new(&spec.kinds, &spec.edges, None).unwrap();
            let result = synthesize(&spec, &SchedulingConfig::default()).unwrap();
            for op in graph.operations() {
                let completion = result.alap.completion(op.id).unwrap();
                for &succ in &op.successors {
                    assert!(completion <= result.alap.start(succ).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_makespans_agree() {
        for spec in samples() {
            let result = synthesize(&spec, &SchedulingConfig::default()).unwrap();
            assert_eq!(result.asap.makespan(), result.alap.makespan());
            assert_eq!(result.alap_horizon, result.asap.makespan());
            assert!(!result.horizon_extended());
            assert_eq!(result.schedule, result.asap);
            assert!(result.mobility.values().iter().all(|&m| m >= 0));
        }
    }

    #[test]
    fn test_extended_horizon_is_reported() {
        // Multiply 1 holds the only multiplier over [0, 2), so 2 runs [2, 4).
        // Backward from cycle 4, 1 takes the multiplier first, 2 lands at
        // [0, 2) and add 0 no longer fits before cycle 0.
        let spec = problem(
            &[OpKind::ADD, OpKind::MULTIPLY, OpKind::MULTIPLY],
            &[(0, 2)],
            &[
                ResourceSpec::new(OpKind::ADD, 1),
                ResourceSpec::new(OpKind::MULTIPLY, 2),
            ],
        );
        let result = synthesize(&spec, &SchedulingConfig::default()).unwrap();

        assert_eq!(result.asap.makespan(), 4);
        assert_eq!(result.alap_horizon, 5);
        assert_eq!(result.alap.makespan(), 5);
        assert!(result.horizon_extended());

        assert_eq!(result.alap.get(0), Some(ScheduledOp::new(0, 1)));
        assert_eq!(result.alap.get(1), Some(ScheduledOp::new(3, 5)));
        assert_eq!(result.alap.get(2), Some(ScheduledOp::new(1, 3)));
        // Node 1 has no real slack at makespan 4 but shows the extra cycle.
        assert_eq!(result.mobility.values(), &[0, 3, 0]);
        assert_eq!(result.schedule, result.asap);
    }

    #[test]
    fn test_resource_limit_never_exceeded() {
        for tie_break in [TieBreak::NodeOrder, TieBreak::LeastMobility] {
            for spec in samples() {
                let config = SchedulingConfig::default().with_tie_break(tie_break);
                let result = synthesize(&spec, &config).unwrap();
                let graph = DataFlowGraph::new(&spec.kinds, &spec.edges, None).unwrap();
                let pool = ResourcePool::new(&spec.resources).unwrap();

                for schedule in [&result.asap, &result.alap, &result.schedule] {
                    for cycle in 0..schedule.makespan() {
                        for kind in graph.kinds() {
                            let busy = graph
                                .nodes_of_kind(kind)
                                .into_iter()
                                .filter(|&id| schedule.get(id).unwrap().occupies(cycle))
                                .count();
                            assert!(busy <= pool.count_of(kind));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_fan_in_mobility() {
        let result = synthesize(&fan_in(), &SchedulingConfig::default()).unwrap();

        // Adds pair up on two adders in id order, so the side chain 10 -> 11
        // only starts at cycle 3 and ends up defining the makespan.
        assert_eq!(result.asap.start(6), Some(1));
        assert_eq!(result.asap.start(7), Some(3));
        assert_eq!(result.asap.start(8), Some(5));
        assert_eq!(result.asap.start(9), Some(7));
        assert_eq!(result.asap.start(10), Some(3));
        assert_eq!(result.asap.start(11), Some(7));
        assert_eq!(result.asap.makespan(), 9);
        assert_eq!(result.alap_horizon, 9);

        assert_eq!(
            result.mobility.values(),
            &[4, 4, 1, 1, 0, 0, 4, 0, 0, 1, 3, 0]
        );
        assert!(result.mobility.is_critical(11));
        assert!(!result.mobility.is_critical(9));
    }

    #[test]
    fn test_least_mobility_completes_under_contention() {
        let config = SchedulingConfig::default().with_tie_break(TieBreak::LeastMobility);
        let result = synthesize(&fan_in(), &config).unwrap();

        assert!(result.schedule.is_complete());
        // Least-slack adds 4 and 5 go first, pulling multiply 8 forward.
        assert_eq!(result.schedule.start(4), Some(0));
        assert_eq!(result.schedule.start(5), Some(0));
        assert_eq!(result.schedule.start(8), Some(1));
        assert_ne!(result.schedule, result.asap);
    }

    #[test]
    fn test_capacity_limit() {
        let config = SchedulingConfig {
            max_nodes: Some(3),
            ..Default::default()
        };
        assert_eq!(
            synthesize(&reference(), &config),
            Err(SchedulingError::CapacityExceeded {
                node_count: 4,
                max_nodes: 3
            })
        );
    }
}
