//! Model builder (C2): turns guards, slots and configuration into decision
//! variables, hard constraints, and weighted soft-violation terms.

use std::collections::{HashMap, HashSet};

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Solution, Variable};

use crate::config::RosterConstraintConfig;
use crate::domain::{DemandSlot, GuardProfile};
use crate::result::{CoverageStat, RoleCoverageStat};

/// A single named soft-violation term: `weight * Σ coef·var`.
///
/// Stored as explicit `(coefficient, variable)` pairs rather than an opaque
/// `good_lp::Expression` so the assembler can re-evaluate each term's value
/// against the solution independently of the solver's own objective
/// reporting (see `RosterEngine::solve`'s objective/violation bookkeeping).
pub(crate) struct PenaltyTerm {
    pub name: String,
    pub weight: i64,
    pub terms: Vec<(f64, Variable)>,
}

impl PenaltyTerm {
    fn expression(&self) -> Expression {
        self.terms
            .iter()
            .fold(Expression::from(0.0), |acc, &(coef, var)| acc + coef * var)
    }

    pub fn value(&self, solution: &impl Solution) -> f64 {
        self.terms
            .iter()
            .map(|&(coef, var)| coef * solution.value(var))
            .sum()
    }
}

/// Output of the model-building pass: ready to hand to the solver adapter.
pub(crate) struct BuiltModel {
    pub vars: ProblemVariables,
    pub constraints: Vec<Constraint>,
    pub objective: Expression,
    /// (guard_idx, slot_idx) -> decision variable.
    pub x: HashMap<(usize, usize), Variable>,
    pub penalty_terms: Vec<PenaltyTerm>,
    /// slot_id -> coverage outcome, pre-populated with `required`/role
    /// `required` counts; `assigned` fields are filled in by the assembler.
    pub coverage_stats: HashMap<String, CoverageStat>,
}

pub(crate) fn build(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    config: &RosterConstraintConfig,
) -> BuiltModel {
    let mut vars = ProblemVariables::new();
    let mut constraints = Vec::new();
    let mut penalty_terms = Vec::new();

    let guard_role_sets: Vec<_> = guards.iter().map(GuardProfile::role_set).collect();

    let mut x = HashMap::with_capacity(guards.len() * slots.len());
    for g_idx in 0..guards.len() {
        for s_idx in 0..slots.len() {
            x.insert((g_idx, s_idx), vars.add(variable().binary()));
        }
    }

    skill_eligibility(guards, slots, config, &x, &mut constraints, &mut penalty_terms);

    let coverage_stats = coverage_and_roles(
        guards,
        slots,
        config,
        &x,
        &guard_role_sets,
        &mut vars,
        &mut constraints,
        &mut penalty_terms,
    );

    consecutive_days(guards, slots, config, &x, &mut vars, &mut constraints, &mut penalty_terms);

    rest_and_breaks(guards, slots, config, &x, &mut constraints);

    max_hours_per_week(guards, slots, &x, &mut constraints);

    fairness(guards, slots, config, &x, &mut vars, &mut constraints, &mut penalty_terms);

    let objective = penalty_terms
        .iter()
        .fold(Expression::from(0.0), |acc, term| {
            acc + term.weight as f64 * term.expression()
        });

    BuiltModel {
        vars,
        constraints,
        objective,
        x,
        penalty_terms,
        coverage_stats,
    }
}

/// Skill eligibility (SPEC_FULL.md §4.1/§4.7): hard rejection of mismatched
/// `(guard, slot)` pairs when `enforce_skill_requirements` is set, or — when
/// it is not — an optional soft penalty for assigning a mismatched pair
/// anyway, disabled by default (`skill_mismatch_penalty = 0`) to preserve
/// spec.md's documented asymmetry.
fn skill_eligibility(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    config: &RosterConstraintConfig,
    x: &HashMap<(usize, usize), Variable>,
    constraints: &mut Vec<Constraint>,
    penalty_terms: &mut Vec<PenaltyTerm>,
) {
    if config.hard.enforce_skill_requirements {
        for (g_idx, guard) in guards.iter().enumerate() {
            for (s_idx, slot) in slots.iter().enumerate() {
                if let Some(skill) = &slot.required_skill {
                    if !guard.skills.contains(skill) {
                        let var = x[&(g_idx, s_idx)];
                        constraints.push(constraint!(var == 0));
                    }
                }
            }
        }
        return;
    }

    if config.soft.skill_mismatch_penalty <= 0 {
        return;
    }
    for (g_idx, guard) in guards.iter().enumerate() {
        for (s_idx, slot) in slots.iter().enumerate() {
            if let Some(skill) = &slot.required_skill {
                if !guard.skills.contains(skill) {
                    let var = x[&(g_idx, s_idx)];
                    penalty_terms.push(PenaltyTerm {
                        name: format!(
                            "skill_mismatch::guard={}::{}",
                            guard.guard_id, slot.slot_id
                        ),
                        weight: config.soft.skill_mismatch_penalty,
                        terms: vec![(1.0, var)],
                    });
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn coverage_and_roles(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    config: &RosterConstraintConfig,
    x: &HashMap<(usize, usize), Variable>,
    guard_role_sets: &[HashSet<&str>],
    vars: &mut ProblemVariables,
    constraints: &mut Vec<Constraint>,
    penalty_terms: &mut Vec<PenaltyTerm>,
) -> HashMap<String, CoverageStat> {
    let mut coverage_stats = HashMap::with_capacity(slots.len());

    for (s_idx, slot) in slots.iter().enumerate() {
        let required_total = slot.effective_requirement();
        let assigned_sum: Expression = (0..guards.len()).map(|g_idx| x[&(g_idx, s_idx)]).sum();

        let mut role_stats = HashMap::new();
        for (role, count) in &slot.required_roles {
            role_stats.insert(
                role.clone(),
                RoleCoverageStat {
                    required: *count,
                    assigned: 0,
                },
            );
            if config.hard.enforce_role_coverage {
                let eligible: Expression = (0..guards.len())
                    .filter(|&g_idx| guard_role_sets[g_idx].contains(role.as_str()))
                    .map(|g_idx| x[&(g_idx, s_idx)])
                    .sum();
                // If no guard qualifies, `eligible` sums to the empty
                // expression (0) and this constraint is `0 >= count`,
                // reporting infeasibility rather than silently passing.
                constraints.push(constraint!(eligible >= *count as f64));
            }
        }

        if config.hard.enforce_coverage {
            constraints.push(constraint!(assigned_sum >= required_total as f64));
        } else {
            let slack = vars.add(variable().min(0).max(required_total as f64));
            constraints.push(constraint!(assigned_sum + slack >= required_total as f64));
            penalty_terms.push(PenaltyTerm {
                name: format!("coverage_shortfall::{}", slot.slot_id),
                weight: config.soft.coverage_shortfall,
                terms: vec![(1.0, slack)],
            });
        }

        coverage_stats.insert(
            slot.slot_id.clone(),
            CoverageStat {
                required: required_total,
                assigned: 0,
                roles: role_stats,
            },
        );
    }

    coverage_stats
}

/// Presence variables and max-consecutive-days constraints, hard or soft.
fn consecutive_days(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    config: &RosterConstraintConfig,
    x: &HashMap<(usize, usize), Variable>,
    vars: &mut ProblemVariables,
    constraints: &mut Vec<Constraint>,
    penalty_terms: &mut Vec<PenaltyTerm>,
) {
    let soft_enabled = config.soft.consecutive_day_violation > 0;
    if config.hard.max_consecutive_days.is_none() && !soft_enabled {
        return;
    }

    let mut slots_by_day: HashMap<i32, Vec<usize>> = HashMap::new();
    for (s_idx, slot) in slots.iter().enumerate() {
        slots_by_day.entry(slot.day_index()).or_default().push(s_idx);
    }
    let mut sorted_days: Vec<i32> = slots_by_day.keys().copied().collect();
    sorted_days.sort_unstable();
    if sorted_days.is_empty() {
        return;
    }

    for (g_idx, guard) in guards.iter().enumerate() {
        let mut presence = Vec::with_capacity(sorted_days.len());
        for &day in &sorted_days {
            let day_slots = &slots_by_day[&day];
            let sum: Expression = day_slots.iter().map(|&s_idx| x[&(g_idx, s_idx)]).sum();
            let pres = vars.add(variable().binary());
            // pres <=> sum >= 1, linearized for a non-negative integer sum:
            constraints.push(constraint!(pres <= sum.clone()));
            constraints.push(constraint!(sum <= day_slots.len() as f64 * pres));
            presence.push(pres);
        }

        if let Some(max_consec) = config.hard.max_consecutive_days {
            let window = max_consec as usize + 1;
            if presence.len() > max_consec as usize {
                for start in 0..=(presence.len() - window) {
                    let window_sum: Expression =
                        presence[start..start + window].iter().copied().sum();
                    constraints.push(constraint!(window_sum <= max_consec as f64));
                }
            }
        } else if soft_enabled {
            for start in 0..presence.len() {
                let window = &presence[start..];
                let slack = vars.add(variable().min(0).max(window.len() as f64));
                let window_sum: Expression = window.iter().copied().sum();
                constraints.push(constraint!(window_sum <= slack));
                penalty_terms.push(PenaltyTerm {
                    name: format!(
                        "consecutive_day_violation::guard={}::window={}",
                        guard.guard_id, start
                    ),
                    weight: config.soft.consecutive_day_violation,
                    terms: vec![(1.0, slack)],
                });
            }
        }
    }
}

/// Pairwise minimum-break and rest-window constraints. Both are always hard
/// when configured (see `add_pairwise`); the `min_break_violation` /
/// `rest_window_violation` soft weights exist in `SoftConstraintWeights` for
/// forward compatibility but are not consulted here, matching the original
/// engine's behavior exactly.
fn rest_and_breaks(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    config: &RosterConstraintConfig,
    x: &HashMap<(usize, usize), Variable>,
    constraints: &mut Vec<Constraint>,
) {
    let min_break = config.hard.min_break_hours;
    let rest_window = config.hard.rest_window_hours;
    if min_break.is_none() && rest_window.is_none() {
        return;
    }

    for g_idx in 0..guards.len() {
        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                let first = &slots[i];
                let second = &slots[j];
                let gap_fwd = (second.start - first.end).num_seconds() as f64 / 3600.0;
                let gap_rev = (first.start - second.end).num_seconds() as f64 / 3600.0;
                let assign_first = x[&(g_idx, i)];
                let assign_second = x[&(g_idx, j)];

                if let Some(break_hours) = min_break {
                    if -break_hours < gap_fwd && gap_fwd < break_hours {
                        add_pairwise(assign_first, assign_second, constraints);
                    }
                }

                if let Some(window) = rest_window {
                    if (0.0..window).contains(&gap_fwd) || (0.0..window).contains(&gap_rev) {
                        add_pairwise(assign_first, assign_second, constraints);
                    }
                }
            }
        }
    }
}

/// Emits `a + b <= 1` for a single guard/slot-pair proximity violation.
///
/// Both `min_break_hours` and `rest_window_hours` live only in
/// `HardConstraintSpec` (there is no independent "soft threshold" field for
/// either) — the caller only reaches this helper once the respective option
/// is `Some`, so the pair is always hard.
fn add_pairwise(a: Variable, b: Variable, constraints: &mut Vec<Constraint>) {
    constraints.push(constraint!(a + b <= 1));
}

fn fairness(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    config: &RosterConstraintConfig,
    x: &HashMap<(usize, usize), Variable>,
    vars: &mut ProblemVariables,
    constraints: &mut Vec<Constraint>,
    penalty_terms: &mut Vec<PenaltyTerm>,
) {
    if config.soft.fairness_penalty <= 0 || guards.is_empty() {
        return;
    }

    let n = slots.len() as f64;
    let totals: Vec<Expression> = (0..guards.len())
        .map(|g_idx| (0..slots.len()).map(|s_idx| x[&(g_idx, s_idx)]).sum())
        .collect();

    let max_total = vars.add(variable().min(0).max(n));
    let min_total = vars.add(variable().min(0).max(n));
    for total in &totals {
        let total = total.clone();
        constraints.push(constraint!(total.clone() <= max_total));
        constraints.push(constraint!(total >= min_total));
    }
    penalty_terms.push(PenaltyTerm {
        name: "fairness_span".to_string(),
        weight: config.soft.fairness_penalty,
        terms: vec![(1.0, max_total), (-1.0, min_total)],
    });

    if let Some(target_hours) = config.fairness_target_hours {
        if !slots.is_empty() {
            let mut average_hours = slots.iter().map(DemandSlot::duration_hours).sum::<f64>() / n;
            if average_hours <= 0.0 {
                average_hours = 1.0;
            }
            let expected = (target_hours / average_hours).round().max(0.0);

            for (g_idx, guard) in guards.iter().enumerate() {
                let dev = vars.add(variable().min(0).max(n));
                let total = totals[g_idx].clone();
                constraints.push(constraint!(dev >= total.clone() - expected));
                constraints.push(constraint!(dev >= expected - total));
                penalty_terms.push(PenaltyTerm {
                    name: format!("fairness_target_deviation::guard={}", guard.guard_id),
                    weight: config.soft.fairness_penalty,
                    terms: vec![(1.0, dev)],
                });
            }
        }
    }
}

/// Hard `max_hours_per_week` constraint (SPEC_FULL.md §4.6).
fn max_hours_per_week(
    guards: &[GuardProfile],
    slots: &[DemandSlot],
    x: &HashMap<(usize, usize), Variable>,
    constraints: &mut Vec<Constraint>,
) {
    for (g_idx, guard) in guards.iter().enumerate() {
        if let Some(max_hours) = guard.max_hours_per_week {
            let weekly_hours: Expression = (0..slots.len())
                .map(|s_idx| slots[s_idx].duration_hours() * x[&(g_idx, s_idx)])
                .fold(Expression::from(0.0), |acc, term| acc + term);
            constraints.push(constraint!(weekly_hours <= max_hours));
        }
    }
}
