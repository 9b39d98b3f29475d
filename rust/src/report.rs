//! Human-readable schedule reports.

use std::fmt::Write;

use crate::graph::DataFlowGraph;
use crate::models::Schedule;
use crate::pipeline::SynthesisResult;

/// One line per node with its kind tag and placement.
pub fn render_schedule(graph: &DataFlowGraph, schedule: &Schedule) -> String {
    let mut out = String::from("Scheduled Operations:\n");
    for op in graph.operations() {
        match schedule.get(op.id) {
            Some(placed) => {
                let _ = writeln!(
                    out,
                    "Node {} (Operation Type: {}) -> Scheduled at Time {}, Ends at Time {}",
                    op.id,
                    op.kind.tag(),
                    placed.start,
                    placed.completion
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "Node {} (Operation Type: {}) -> unscheduled",
                    op.id,
                    op.kind.tag()
                );
            }
        }
    }
    out
}

/// Side-by-side ASAP/ALAP/final start times with mobility.
pub fn render_summary(graph: &DataFlowGraph, result: &SynthesisResult) -> String {
    let start = |schedule: &Schedule, id: usize| {
        schedule
            .start(id)
            .map_or_else(|| "-".to_string(), |s| s.to_string())
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>9} {:>5} {:>5} {:>8} {:>5}",
        "node", "kind", "asap", "alap", "mobility", "final"
    );
    for op in graph.operations() {
        let _ = writeln!(
            out,
            "{:>5} {:>9} {:>5} {:>5} {:>8} {:>5}",
            op.id,
            op.kind.to_string(),
            start(&result.asap, op.id),
            start(&result.alap, op.id),
            result.mobility.get(op.id),
            start(&result.schedule, op.id)
        );
    }
    let _ = writeln!(
        out,
        "makespan: asap {}, alap {} (horizon {}), final {}",
        result.asap.makespan(),
        result.alap.makespan(),
        result.alap_horizon,
        result.makespan()
    );
    out
}
