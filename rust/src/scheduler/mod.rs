//! Time-stepped scheduling passes over a data-flow graph.
//!
//! All three passes share one cycle structure: release units due at the current
//! cycle, mark nodes that reached their boundary, then greedily place every ready
//! node on the first free unit of its kind. They differ in direction (ASAP and the
//! list scheduler walk forward, ALAP walks backward from a horizon) and in the
//! order in which competing ready nodes are visited.

mod alap;
mod asap;
mod list;
pub mod readiness;
mod state;

pub use alap::{alap_schedule, AlapOutcome};
pub use asap::asap_schedule;
pub use list::{list_schedule, priority_order, ListOutcome};
pub use state::{Direction, ScheduleContext};

use crate::log_changes;
use crate::log_checks;
use crate::models::Cycle;

/// Visit `order` and place every ready node that finds a free unit at `time`.
///
/// Returns the nodes placed, in placement order.
fn place_ready(
    ctx: &mut ScheduleContext<'_>,
    order: &[usize],
    time: Cycle,
    verbosity: u8,
    pass: &str,
) -> Vec<usize> {
    let mut placed = Vec::new();
    for &id in order {
        if !ctx.is_ready(id) {
            continue;
        }
        match ctx.try_place(id, time) {
            Some((op, unit)) => {
                log_changes!(
                    verbosity,
                    "  [{}] node {} on {}: [{}, {})",
                    pass,
                    id,
                    ctx.pool().resource(unit).name(),
                    op.start,
                    op.completion
                );
                placed.push(id);
            }
            None => {
                log_checks!(
                    verbosity,
                    "  [{}] node {} ready, no free {} unit",
                    pass,
                    id,
                    ctx.graph().kind(id)
                );
            }
        }
    }
    placed
}
