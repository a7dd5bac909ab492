//! End-to-end scenario coverage through the public `RosterEngine` API.

use chrono::NaiveDate;
use rostering_engine::{DemandSlot, GuardProfile, RosterConstraintConfig, RosterEngine};

fn dt(day: u32, hour: u32) -> chrono::NaiveDateTime {
    dt_min(day, hour, 0)
}

fn dt_min(day: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn trivial_coverage() {
    // Isolate coverage from the default consecutive-day soft pressure —
    // otherwise a single guard present on day 1 would still cost 400.
    let mut config = RosterConstraintConfig::default();
    config.soft.consecutive_day_violation = 0;
    let engine = RosterEngine::new(Some(config)).unwrap();
    let guards = vec![GuardProfile::new("G1", "Alice").with_skill("s")];
    let slots = vec![DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_skill("s")];

    let result = engine.solve(&guards, &slots, None);

    assert!(result.feasible);
    assert_eq!(result.assignments["G1"], vec!["A".to_string()]);
    assert_eq!(result.objective_value, Some(0.0));
}

#[test]
fn skill_gate_rejects_mismatched_guard() {
    let engine = RosterEngine::new(None).unwrap();
    let guards = vec![GuardProfile::new("G1", "Alice").with_skill("t")];
    let slots = vec![DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_skill("s")];

    let result = engine.solve(&guards, &slots, None);

    assert!(!result.feasible);
    assert_eq!(result.status, "INFEASIBLE");
    assert_eq!(result.coverage["A"].assigned, 0);
}

#[test]
fn role_composition_assigns_each_guard_to_its_role() {
    let mut config = RosterConstraintConfig::default();
    config.hard.enforce_role_coverage = true;
    let engine = RosterEngine::new(Some(config)).unwrap();

    let guards = vec![
        GuardProfile::new("G1", "Alice").with_role("Leader"),
        GuardProfile::new("G2", "Bob").with_role("Tech"),
    ];
    let slots = vec![DemandSlot::new("A", dt(1, 8), dt(1, 12))
        .with_required_guards(2)
        .with_required_role("Leader", 1)
        .with_required_role("Tech", 1)];

    let result = engine.solve(&guards, &slots, None);

    assert!(result.feasible);
    assert_eq!(
        result.assignment_roles["G1"]["A"],
        Some("Leader".to_string())
    );
    assert_eq!(
        result.assignment_roles["G2"]["A"],
        Some("Tech".to_string())
    );
    assert_eq!(result.coverage["A"].roles["Leader"].assigned, 1);
    assert_eq!(result.coverage["A"].roles["Tech"].assigned, 1);
}

#[test]
fn rest_window_forbids_double_booking_a_single_guard() {
    // Non-overlapping slots with a 30-minute gap: `0 <= gap_fwd < 1` trips
    // the rest-window exclusion. (Overlapping slots have a negative gap in
    // both directions and the rest check never fires for them.)
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

#[test]
fn soft_coverage_covers_what_it_can_and_penalizes_the_rest() {
    // Slots close enough (30 minutes apart) to trip the hard min-break
    // exclusion, so the lone guard can cover only one of the two.
    // Consecutive-day pressure is zeroed out to isolate the shortfall cost.
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
    let shortfalls: Vec<_> = result
        .violation_summaries
        .iter()
        .filter(|(name, _)| name.starts_with("coverage_shortfall::"))
        .collect();
    assert_eq!(shortfalls.len(), 1);
    let (_, entry) = shortfalls[0];
    assert_eq!(entry.value, 1.0);
    assert_eq!(entry.penalty, 500.0);
}

#[test]
fn staffing_search_grows_until_feasible() {
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
    assert!(result.roster.unwrap().feasible);
}

#[test]
fn max_hours_per_week_excludes_overcommitted_assignment() {
    let engine = RosterEngine::new(None).unwrap();
    let guards = vec![GuardProfile::new("G1", "Alice").with_max_hours_per_week(4.0)];
    let slots = vec![
        DemandSlot::new("A", dt(1, 8), dt(1, 12)),
        DemandSlot::new("B", dt(2, 8), dt(2, 12)),
    ];

    let result = engine.solve(&guards, &slots, None);

    assert!(!result.feasible, "8 hours of demand exceeds a 4-hour cap");
}

#[test]
fn skill_mismatch_penalty_is_disabled_by_default() {
    let mut config = RosterConstraintConfig::default();
    config.hard.enforce_skill_requirements = false;
    let engine = RosterEngine::new(Some(config)).unwrap();

    let guards = vec![GuardProfile::new("G1", "Alice")];
    let slots = vec![DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_skill("s")];

    let result = engine.solve(&guards, &slots, None);

    assert!(result.feasible);
    assert!(result
        .violation_summaries
        .keys()
        .all(|name| !name.starts_with("skill_mismatch::")));
}

#[test]
fn skill_mismatch_penalty_applies_once_opted_in() {
    let mut config = RosterConstraintConfig::default();
    config.hard.enforce_skill_requirements = false;
    config.soft.skill_mismatch_penalty = 50;
    let engine = RosterEngine::new(Some(config)).unwrap();

    let guards = vec![GuardProfile::new("G1", "Alice")];
    let slots = vec![DemandSlot::new("A", dt(1, 8), dt(1, 12)).with_required_skill("s")];

    let result = engine.solve(&guards, &slots, None);

    assert!(result.feasible);
    let entry = &result.violation_summaries["skill_mismatch::guard=G1::A"];
    assert_eq!(entry.value, 1.0);
    assert_eq!(entry.penalty, 50.0);
}
