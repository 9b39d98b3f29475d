//! Python bindings (enabled with the `python` feature).

use pyo3::prelude::*;

use crate::config::{SchedulingConfig, TieBreak};
use crate::models::{Cycle, OpKind, ProblemSpec, ResourceSpec, Schedule};
use crate::pipeline::synthesize;
use crate::trace::render_trace;

fn to_pairs(schedule: &Schedule) -> Vec<Option<(Cycle, Cycle)>> {
    schedule
        .iter()
        .map(|(_, op)| op.map(|op| (op.start, op.completion)))
        .collect()
}

/// Result of a full synthesis run.
#[pyclass(name = "SynthesisResult")]
#[derive(Clone, Debug)]
pub struct PySynthesisResult {
    /// (start, completion) per node, None if unscheduled.
    #[pyo3(get)]
    pub asap: Vec<Option<(Cycle, Cycle)>>,
    #[pyo3(get)]
    pub alap: Vec<Option<(Cycle, Cycle)>>,
    #[pyo3(get)]
    pub alap_horizon: Cycle,
    /// True when the ALAP horizon exceeds the ASAP makespan.
    #[pyo3(get)]
    pub horizon_extended: bool,
    #[pyo3(get)]
    pub mobility: Vec<Cycle>,
    #[pyo3(get)]
    pub schedule: Vec<Option<(Cycle, Cycle)>>,
    #[pyo3(get)]
    pub makespan: Cycle,
    /// Rendered per-cycle trace of the list scheduler.
    #[pyo3(get)]
    pub trace: String,
}

#[pymethods]
impl PySynthesisResult {
    fn __repr__(&self) -> String {
        format!(
            "SynthesisResult(nodes={}, makespan={}, alap_horizon={})",
            self.schedule.len(),
            self.makespan,
            self.alap_horizon
        )
    }
}

/// Run ASAP, ALAP, mobility and list scheduling over a graph.
///
/// # Arguments
/// * `kinds` - Operation kind tag per node (1 = add, 2 = multiply, ...)
/// * `edges` - (producer, consumer) node index pairs
/// * `resources` - (kind tag, latency) per execution unit
/// * `tie_break` - "node_order" or "least_mobility"
/// * `verbosity` - 0=silent, 1=changes, 2=checks, 3=debug
///
/// # Raises
/// * ValueError for malformed input, cycles, starved kinds or an unknown tie-break
#[pyfunction]
#[pyo3(signature = (kinds, edges, resources, tie_break="node_order", verbosity=0))]
fn run_synthesis(
    kinds: Vec<u32>,
    edges: Vec<(usize, usize)>,
    resources: Vec<(u32, Cycle)>,
    tie_break: &str,
    verbosity: u8,
) -> PyResult<PySynthesisResult> {
    let tie_break = match tie_break.parse::<TieBreak>() {
        Ok(t) => t,
        Err(e) => return Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    };
    let config = SchedulingConfig {
        tie_break,
        verbosity,
        ..Default::default()
    };
    let problem = ProblemSpec {
        kinds: kinds.into_iter().map(OpKind).collect(),
        edges,
        resources: resources
            .into_iter()
            .map(|(kind, latency)| ResourceSpec::new(OpKind(kind), latency))
            .collect(),
    };

    match synthesize(&problem, &config) {
        Ok(result) => Ok(PySynthesisResult {
            asap: to_pairs(&result.asap),
            alap: to_pairs(&result.alap),
            alap_horizon: result.alap_horizon,
            horizon_extended: result.horizon_extended(),
            mobility: result.mobility.values().to_vec(),
            schedule: to_pairs(&result.schedule),
            makespan: result.makespan(),
            trace: render_trace(&result.trace),
        }),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The hls_sched Python module.
#[pymodule]
fn hls_sched(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySynthesisResult>()?;
    m.add_function(wrap_pyfunction!(run_synthesis, m)?)?;
    Ok(())
}
