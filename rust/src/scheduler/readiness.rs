//! Readiness predicates shared by the forward and backward passes.

use crate::graph::Operation;

/// True iff every predecessor of `op` is marked in `done`.
pub fn all_predecessors_done(op: &Operation, done: &[bool]) -> bool {
    op.predecessors.iter().all(|&pred| done[pred])
}

/// True iff every successor of `op` is marked in `done`.
pub fn all_successors_done(op: &Operation, done: &[bool]) -> bool {
    op.successors.iter().all(|&succ| done[succ])
}
