//! Public façade: `RosterEngine`, the staffing search (C5), and the
//! single-call `solve` entry point that wires C2–C4 together.

use std::collections::HashMap;

use tracing::info;

use crate::config::RosterConstraintConfig;
use crate::domain::{DemandSlot, GuardProfile};
use crate::error::RosterError;
use crate::model;
use crate::result::{RosterResult, StaffingResult};
use crate::solver;

/// Entry point for rostering: builds a model, solves it, and assembles a
/// `RosterResult`. Holds only its configuration, so cloning it is cheap and
/// each clone solves independently (spec.md §5's thread-safety contract).
#[derive(Debug, Clone)]
pub struct RosterEngine {
    config: RosterConstraintConfig,
}

impl RosterEngine {
    /// Constructs an engine with the given configuration, or the documented
    /// defaults when `None`. Fails only if the configuration itself is
    /// invalid (negative soft weights) — the linked-in HiGHS backend cannot
    /// fail to construct, but the error variant is kept live so a future
    /// out-of-process backend can fail at this exact seam without changing
    /// the public API.
    pub fn new(config: Option<RosterConstraintConfig>) -> Result<Self, RosterError> {
        let config = config.unwrap_or_default();
        config.validate()?;
        Ok(Self { config })
    }

    /// Solves a single instance: one model, one backend invocation, no
    /// retries. Never returns an `Err` — infeasible, time-limited, or
    /// otherwise non-optimal terminal states come back as
    /// `RosterResult { feasible: false, .. }` (spec.md §7).
    pub fn solve(
        &self,
        guards: &[GuardProfile],
        slots: &[DemandSlot],
        time_limit_seconds: Option<f64>,
    ) -> RosterResult {
        info!(
            guards = guards.len(),
            slots = slots.len(),
            time_limit_seconds,
            "solving roster"
        );
        let built = model::build(guards, slots, &self.config);
        let outcome = solver::solve(built, time_limit_seconds);
        crate::assemble::assemble(guards, slots, outcome)
    }

    /// Minimum-staffing search (C5): a prefix-growing scan over a
    /// priority-sorted guard pool, returning the first feasible size.
    ///
    /// Guards are sorted by `(priority asc, guard_id asc)` and every attempt
    /// is an independent solve — the search does not warm-start or reuse
    /// any state across sizes.
    pub fn find_minimum_staffing(
        &self,
        guards: &[GuardProfile],
        slots: &[DemandSlot],
        minimum: Option<usize>,
        maximum: Option<usize>,
        time_limit_seconds: Option<f64>,
    ) -> StaffingResult {
        let mut sorted: Vec<&GuardProfile> = guards.iter().collect();
        sorted.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.guard_id.cmp(&b.guard_id)));

        let lower = minimum.unwrap_or(1).max(1);
        let upper = maximum.unwrap_or(sorted.len());

        let mut attempts = HashMap::new();
        for size in lower..=upper {
            if size > sorted.len() {
                break;
            }
            let pool: Vec<GuardProfile> = sorted[..size].iter().map(|g| (*g).clone()).collect();
            info!(size, "staffing search attempt");
            let result = self.solve(&pool, slots, time_limit_seconds);
            let feasible = result.feasible;
            attempts.insert(size, result.clone());
            if feasible {
                return StaffingResult {
                    minimum_guards: Some(size),
                    roster: Some(result),
                    attempts,
                };
            }
        }

        StaffingResult {
            minimum_guards: None,
            roster: None,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, hour: u32) -> chrono::NaiveDateTime {
        dt_min(day, hour, 0)
    }

    fn dt_min(day: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// S1 — trivial coverage: one guard, one matching slot. Consecutive-day
    /// pressure is zeroed out so a single day's presence doesn't cost 400.
    #[test]
    fn trivial_coverage_is_feasible_with_zero_objective() {
        let mut config = RosterConstraintConfig::default();
        config.soft.consecutive_day_violation = 0;
        let engine = RosterEngine::new(Some(config)).unwrap();
        let guards = vec![GuardProfile::new("G1", "Alice").with_skill("s")];
        let slots = vec![
            DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_skill("s"),
        ];

        let result = engine.solve(&guards, &slots, None);
        assert!(result.feasible);
        assert_eq!(result.assignments.get("G1").unwrap(), &vec!["A".to_string()]);
        assert_eq!(result.objective_value, Some(0.0));
    }

    /// S2 — skill gate: a skill-mismatched guard cannot satisfy a hard
    /// skill requirement, so the only solution is infeasible.
    #[test]
    fn skill_gate_makes_mismatch_infeasible() {
        let engine = RosterEngine::new(None).unwrap();
        let guards = vec![GuardProfile::new("G1", "Alice").with_skill("t")];
        let slots = vec![
            DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_skill("s"),
        ];

        let result = engine.solve(&guards, &slots, None);
        assert!(!result.feasible);
        assert_eq!(result.status, "INFEASIBLE");
    }

    /// S4 — rest window forbids overlap: two non-overlapping slots 30
    /// minutes apart trip the rest-window exclusion (`0 <= gap < 1`), and
    /// with both required from the same lone guard the model is infeasible.
    #[test]
    fn rest_window_forbids_overlap_when_both_slots_required() {
        let mut config = RosterConstraintConfig::default();
        config.hard.rest_window_hours = Some(1.0);
        let engine = RosterEngine::new(Some(config)).unwrap();

        let guards = vec![GuardProfile::new("G1", "Alice")];
        let slots = vec![
            DemandSlot::new("A", dt(1, 8), dt(1, 12)),
            DemandSlot::new("B", dt_min(1, 12, 30), dt_min(1, 16, 30)),
        ];

        let result = engine.solve(&guards, &slots, None);
        assert!(!result.feasible);
    }

    /// S5 — soft coverage: with coverage relaxed and a hard min-break
    /// window tying up the lone guard, exactly one of two slots is covered
    /// and the shortfall is penalized. Consecutive-day pressure is zeroed
    /// out to isolate the shortfall cost.
    #[test]
    fn soft_coverage_covers_one_slot_and_penalizes_the_other() {
        let mut config = RosterConstraintConfig::default();
        config.hard.enforce_coverage = false;
        config.hard.min_break_hours = Some(1.0);
        config.soft.coverage_shortfall = 500;
        config.soft.consecutive_day_violation = 0;
        let engine = RosterEngine::new(Some(config)).unwrap();

        let guards = vec![GuardProfile::new("G1", "Alice")];
        let slots = vec![
            DemandSlot::new("A", dt(1, 8), dt(1, 9)),
            DemandSlot::new("B", dt_min(1, 9, 30), dt_min(1, 10, 30)),
        ];

        let result = engine.solve(&guards, &slots, None);
        assert!(result.feasible);
        assert_eq!(result.objective_value, Some(500.0));
        let covered = result.coverage.values().filter(|c| c.assigned == 1).count();
        assert_eq!(covered, 1);
    }

    /// S6 — staffing search: three guards, a demand needing two, where a
    /// single guard cannot satisfy coverage.
    #[test]
    fn staffing_search_finds_the_minimum_feasible_pool() {
        let engine = RosterEngine::new(None).unwrap();
        let guards = vec![
            GuardProfile::new("G1", "Alice").with_priority(1),
            GuardProfile::new("G2", "Bob").with_priority(2),
            GuardProfile::new("G3", "Cara").with_priority(3),
        ];
        let slots = vec![DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_guards(2)];

        let result = engine.find_minimum_staffing(&guards, &slots, None, None, None);
        assert_eq!(result.minimum_guards, Some(2));
        assert!(!result.attempts[&1].feasible);
        assert!(result.attempts[&2].feasible);
    }
}
