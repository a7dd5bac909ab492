//! Result assembler (C4): turns a completed solve into a `RosterResult` —
//! assignments, role attribution, coverage stats, and violation summaries.

use std::collections::HashMap;

use good_lp::Solution;

use crate::domain::{DemandSlot, GuardProfile};
use crate::result::{RosterResult, ViolationEntry};
use crate::solver::SolveOutcome;

/// Builds a `RosterResult` from a solved model. Role attribution is greedy,
/// order-dependent, and deterministic given stable input order (SPEC_FULL.md
/// §4.3) — it is not itself a constraint the solver reasons about.
pub(crate) fn assemble(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    outcome: SolveOutcome,
) -> RosterResult {
    let SolveOutcome {
        status,
        solution,
        statistics,
        x,
        penalty_terms,
        mut coverage_stats,
    } = outcome;

    let mut assignments: HashMap<String, Vec<String>> = guards
        .iter()
        .map(|g| (g.guard_id.clone(), Vec::new()))
        .collect();
    let mut assignment_roles: HashMap<String, HashMap<String, Option<String>>> = guards
        .iter()
        .map(|g| (g.guard_id.clone(), HashMap::new()))
        .collect();

    if !status.is_feasible() {
        let mut violation_summaries = HashMap::new();
        violation_summaries.insert(
            "status".to_string(),
            ViolationEntry {
                value: status.code() as f64,
                penalty: 0.0,
            },
        );
        return RosterResult {
            feasible: false,
            assignments,
            objective_value: None,
            violation_summaries,
            coverage: coverage_stats,
            status: status.name().to_string(),
            solver_statistics: Some(statistics),
            assignment_roles,
        };
    }

    // (2) Record which guards landed on which slots, in guard-iteration
    // order per slot — this is the scan order the role-attribution pass
    // below relies on for determinism.
    let mut assigned_by_slot: HashMap<usize, Vec<usize>> = HashMap::new();
    for (g_idx, guard) in guards.iter().enumerate() {
        for (s_idx, slot) in slots.iter().enumerate() {
            let Some(&var) = x.get(&(g_idx, s_idx)) else {
                continue;
            };
            if solution.value(var) > 0.5 {
                assignments
                    .get_mut(&guard.guard_id)
                    .expect("assignments pre-populated for every guard_id")
                    .push(slot.slot_id.clone());
                assigned_by_slot.entry(s_idx).or_default().push(g_idx);
            }
        }
    }

    // (3) Role attribution: greedy scan of each slot's declared role order.
    for (s_idx, slot) in slots.iter().enumerate() {
        let Some(assigned_guards) = assigned_by_slot.get(&s_idx) else {
            continue;
        };
        let mut remaining = slot.required_roles.clone();
        for &g_idx in assigned_guards {
            let guard = &guards[g_idx];
            let role_set = guard.role_set();
            let mut chosen = None;
            for (role, count) in remaining.iter_mut() {
                if *count > 0 && role_set.contains(role.as_str()) {
                    *count -= 1;
                    chosen = Some(role.clone());
                    break;
                }
            }
            if let Some(role) = &chosen {
                if let Some(stat) = coverage_stats.get_mut(&slot.slot_id) {
                    if let Some(role_stat) = stat.roles.get_mut(role) {
                        role_stat.assigned += 1;
                    }
                }
            }
            assignment_roles
                .get_mut(&guard.guard_id)
                .expect("assignment_roles pre-populated for every guard_id")
                .insert(slot.slot_id.clone(), chosen);
        }
    }

    // (4) Coverage assigned counts.
    for (s_idx, slot) in slots.iter().enumerate() {
        let assigned_count = assigned_by_slot.get(&s_idx).map_or(0, Vec::len) as u32;
        if let Some(stat) = coverage_stats.get_mut(&slot.slot_id) {
            stat.assigned = assigned_count;
        }
    }

    // (5) Violation summaries: only non-zero entries are recorded.
    let mut violation_summaries = HashMap::new();
    for term in &penalty_terms {
        let value = term.value(&solution);
        if value > 0.0 {
            violation_summaries.insert(
                term.name.clone(),
                ViolationEntry {
                    value,
                    penalty: term.weight as f64 * value,
                },
            );
        }
    }

    // (6) Objective: the sum of recorded penalties, which is by construction
    // identical to `Σ w · expr` over the full penalty set (testable property
    // 10) since every omitted term contributed exactly zero.
    let objective_value = if penalty_terms.is_empty() {
        Some(0.0)
    } else {
        Some(violation_summaries.values().map(|v| v.penalty).sum())
    };

    RosterResult {
        feasible: true,
        assignments,
        objective_value,
        violation_summaries,
        coverage: coverage_stats,
        status: status.name().to_string(),
        solver_statistics: Some(statistics),
        assignment_roles,
    }
}
