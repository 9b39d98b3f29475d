//! Resource-constrained operation scheduling for high-level synthesis.
//!
//! Given a data-flow graph of typed operations and a pool of typed execution
//! units with fixed latencies, this crate computes:
//! 1. an ASAP schedule (earliest feasible start per operation),
//! 2. an ALAP schedule against the ASAP makespan (latest feasible start),
//! 3. per-operation mobility (ALAP start minus ASAP start),
//! 4. a final list schedule with a per-cycle diagnostic trace.
//!
//! ```
//! use hls_sched::{synthesize, OpKind, ProblemSpec, ResourceSpec, SchedulingConfig};
//!
//! let problem = ProblemSpec {
//!     kinds: vec![OpKind::ADD, OpKind::ADD, OpKind::MULTIPLY, OpKind::ADD],
//!     edges: vec![(0, 2), (1, 2), (2, 3)],
//!     resources: vec![
//!         ResourceSpec::new(OpKind::ADD, 1),
//!         ResourceSpec::new(OpKind::ADD, 1),
//!         ResourceSpec::new(OpKind::MULTIPLY, 2),
//!     ],
//! };
//! let result = synthesize(&problem, &SchedulingConfig::default()).unwrap();
//! assert_eq!(result.makespan(), 4);
//! ```

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod config;
mod error;
pub mod graph;
pub mod input;
pub mod logging;
pub mod mobility;
mod models;
pub mod pipeline;
pub mod report;
pub mod resources;
pub mod scheduler;
pub mod trace;

#[cfg(feature = "python")]
mod python;

pub use config::{SchedulingConfig, TieBreak};
pub use error::SchedulingError;
pub use graph::{DataFlowGraph, Operation};
pub use input::{parse_dot, parse_problem, ParseError};
pub use mobility::{compute_mobility, Mobility};
pub use models::{Cycle, OpKind, ProblemSpec, ResourceSpec, Schedule, ScheduledOp};
pub use pipeline::{synthesize, synthesize_graph, SynthesisResult};
pub use resources::{Resource, ResourcePool};
pub use scheduler::{alap_schedule, asap_schedule, list_schedule, AlapOutcome, ListOutcome};
pub use trace::{render_trace, CycleTrace};
