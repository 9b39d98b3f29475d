//! Per-cycle diagnostic trace of the list scheduler.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Cycle, OpKind};

/// What the list scheduler saw and did in one cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleTrace {
    pub cycle: Cycle,
    /// Ready nodes with a free unit of their kind, before any placement this cycle.
    /// Every kind present in the graph has an entry, possibly empty.
    pub candidates: BTreeMap<OpKind, Vec<usize>>,
    /// Nodes placed this cycle, in placement order.
    pub scheduled: Vec<usize>,
    /// Nodes executing after this cycle's placements.
    pub in_flight: Vec<usize>,
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[usize]) -> fmt::Result {
    if nodes.is_empty() {
        return f.write_str("None");
    }
    let parts: Vec<String> = nodes.iter().map(|id| format!("Node {}", id)).collect();
    f.write_str(&parts.join(" "))
}

impl fmt::Display for CycleTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time Slot {}:", self.cycle)?;
        for (kind, nodes) in &self.candidates {
            write!(f, "  Can be scheduled ({}): ", kind)?;
            write_nodes(f, nodes)?;
            writeln!(f)?;
        }
        f.write_str("  Scheduled: ")?;
        write_nodes(f, &self.scheduled)?;
        writeln!(f)?;
        f.write_str("  In progress: ")?;
        write_nodes(f, &self.in_flight)?;
        writeln!(f)
    }
}

/// Render a whole trace, one block per cycle separated by blank lines.
pub fn render_trace(trace: &[CycleTrace]) -> String {
    trace
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
