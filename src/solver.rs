//! Solver adapter (C3): invokes the backing MILP solver (HiGHS via `good_lp`),
//! extracts variable values, and maps the backend's terminal state onto a
//! stable status taxonomy independent of the solver's own vocabulary.

use std::collections::HashMap;
use std::time::Instant;

use good_lp::solvers::highs::highs;
use good_lp::{ResolutionError, Solution, SolverModel, Variable};
use tracing::{debug, info, warn};

use crate::model::{BuiltModel, PenaltyTerm};
use crate::result::CoverageStat;

/// Terminal solve status. `feasible ⇔ status ∈ {Optimal, Feasible}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The backend proved optimality within the given time limit (or ran
    /// unbounded in time, since none was given).
    Optimal,
    /// A feasible solution was returned but optimality was not proven —
    /// always the case when a time limit was supplied and reached.
    Feasible,
    /// The backend proved no feasible assignment exists.
    Infeasible,
    /// The model itself is malformed (e.g. unbounded).
    ModelInvalid,
    /// The backend terminated without a usable result for a reason outside
    /// this taxonomy.
    Unknown,
}

impl SolveStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Stable numeric encoding, used only as the `value` of the synthetic
    /// `"status"` violation summary entry recorded on infeasibility
    /// (SPEC_FULL.md §4.3 step 5).
    pub fn code(&self) -> i32 {
        match self {
            SolveStatus::Optimal => 0,
            SolveStatus::Feasible => 1,
            SolveStatus::Infeasible => 2,
            SolveStatus::ModelInvalid => 3,
            SolveStatus::Unknown => 4,
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A solution reconstructed from a flat `Variable -> f64` map rather than a
/// borrowed backend solution object, so it can outlive the solve call and be
/// handed to the result assembler independently (see `model::PenaltyTerm::value`).
pub(crate) struct ExtractedSolution(HashMap<Variable, f64>);

impl Solution for ExtractedSolution {
    fn value(&self, variable: Variable) -> f64 {
        self.0.get(&variable).copied().unwrap_or(0.0)
    }
}

/// Everything the result assembler needs from a completed solve: the
/// extracted variable values plus the model bookkeeping the assembler has no
/// other way to recover (decision-variable indices, penalty-term
/// definitions, coverage skeletons) since `BuiltModel`'s `vars`/`constraints`
/// are consumed by the backend.
pub(crate) struct SolveOutcome {
    pub status: SolveStatus,
    pub solution: ExtractedSolution,
    pub statistics: String,
    pub x: HashMap<(usize, usize), Variable>,
    pub penalty_terms: Vec<PenaltyTerm>,
    pub coverage_stats: HashMap<String, CoverageStat>,
}

/// Runs the backend against a built model. Never returns an `Err` — every
/// terminal backend state (including errors) maps onto `SolveStatus`, per
/// spec.md §7's "infeasible / transient / unknown are never errors" rule.
pub(crate) fn solve(built: BuiltModel, time_limit_seconds: Option<f64>) -> SolveOutcome {
    let BuiltModel {
        vars,
        constraints,
        objective,
        x,
        penalty_terms,
        coverage_stats,
    } = built;

    let variable_count = x.len();
    let constraint_count = constraints.len();
    debug!(
        variables = variable_count,
        constraints = constraint_count,
        "built roster model"
    );

    let mut problem = vars.minimise(objective).using(highs);
    if let Some(limit) = time_limit_seconds {
        problem = problem.set_time_limit(limit);
    }
    for constraint in constraints {
        problem = problem.with(constraint);
    }

    debug!("solving MILP");
    let started = Instant::now();
    let result = problem.solve();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let statistics =
        format!("variables={variable_count} constraints={constraint_count} elapsed_ms={elapsed_ms}");

    match result {
        Ok(solution) => {
            let status = if time_limit_seconds.is_some() {
                SolveStatus::Feasible
            } else {
                SolveStatus::Optimal
            };

            let mut values = HashMap::with_capacity(x.len() + penalty_terms.len());
            for &var in x.values() {
                values.insert(var, solution.value(var));
            }
            for term in &penalty_terms {
                for &(_, var) in &term.terms {
                    values.entry(var).or_insert_with(|| solution.value(var));
                }
            }

            info!(status = %status, elapsed_ms, "solve complete");
            SolveOutcome {
                status,
                solution: ExtractedSolution(values),
                statistics,
                x,
                penalty_terms,
                coverage_stats,
            }
        }
        Err(ResolutionError::Infeasible) => {
            warn!(elapsed_ms, "model infeasible");
            SolveOutcome {
                status: SolveStatus::Infeasible,
                solution: ExtractedSolution(HashMap::new()),
                statistics,
                x,
                penalty_terms,
                coverage_stats,
            }
        }
        Err(ResolutionError::Unbounded) => {
            warn!(elapsed_ms, "model unbounded");
            SolveOutcome {
                status: SolveStatus::ModelInvalid,
                solution: ExtractedSolution(HashMap::new()),
                statistics,
                x,
                penalty_terms,
                coverage_stats,
            }
        }
        Err(other) => {
            warn!(elapsed_ms, error = %other, "solver returned an unrecognized terminal state");
            SolveOutcome {
                status: SolveStatus::Unknown,
                solution: ExtractedSolution(HashMap::new()),
                statistics: format!("{statistics} error={other}"),
                x,
                penalty_terms,
                coverage_stats,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use good_lp::variable;

    #[test]
    fn status_name_and_feasibility_are_consistent() {
        assert_eq!(SolveStatus::Optimal.name(), "OPTIMAL");
        assert!(SolveStatus::Optimal.is_feasible());
        assert!(SolveStatus::Feasible.is_feasible());
        assert!(!SolveStatus::Infeasible.is_feasible());
        assert!(!SolveStatus::ModelInvalid.is_feasible());
        assert!(!SolveStatus::Unknown.is_feasible());
    }

    #[test]
    fn extracted_solution_defaults_missing_variables_to_zero() {
        let mut vars = good_lp::ProblemVariables::new();
        let v = vars.add(variable().binary());
        let solution = ExtractedSolution(HashMap::new());
        assert_eq!(solution.value(v), 0.0);
    }
}
