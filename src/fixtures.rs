//! Deterministic fixture generators used by tests and the `bench` binary.
//!
//! Adapted from the teacher's `demo_data` module: a seeded RNG over weighted
//! distributions, sized `Small`/`Large`, producing guards and demand slots
//! instead of employees and shifts. Not exposed as a CLI or wire format —
//! spec.md carries no file format or environment variable in the core.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{DemandSlot, GuardProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSize {
    Small,
    Large,
}

struct FixtureParameters {
    guard_count: usize,
    days: i64,
    skills: Vec<String>,
    roles: Vec<String>,
    slots_per_day: usize,
    skill_count_distribution: Vec<(usize, f64)>,
}

impl FixtureSize {
    fn parameters(self) -> FixtureParameters {
        match self {
            FixtureSize::Small => FixtureParameters {
                guard_count: 8,
                days: 7,
                skills: vec!["firstaid".into(), "cctv".into(), "patrol".into()],
                roles: vec!["lead".into(), "support".into()],
                slots_per_day: 3,
                skill_count_distribution: vec![(1, 3.0), (2, 1.0)],
            },
            FixtureSize::Large => FixtureParameters {
                guard_count: 40,
                days: 28,
                skills: vec![
                    "firstaid".into(),
                    "cctv".into(),
                    "patrol".into(),
                    "k9".into(),
                    "access_control".into(),
                ],
                roles: vec!["lead".into(), "support".into(), "dispatcher".into()],
                slots_per_day: 4,
                skill_count_distribution: vec![(1, 3.0), (2, 2.0), (3, 1.0)],
            },
        }
    }
}

/// Generates a deterministic `(guards, slots)` instance for the given size.
/// Seeded with a fixed RNG seed, so repeated calls with the same `size`
/// produce byte-identical output.
pub fn generate(size: FixtureSize) -> (Vec<GuardProfile>, Vec<DemandSlot>) {
    let params = size.parameters();
    let mut rng = StdRng::seed_from_u64(42);

    let mut guards = Vec::with_capacity(params.guard_count);
    for i in 0..params.guard_count {
        let skill_count = pick_count(&mut rng, &params.skill_count_distribution);
        let skills: Vec<String> = params
            .skills
            .choose_multiple(&mut rng, skill_count.min(params.skills.len()))
            .cloned()
            .collect();
        let role = params.roles.choose(&mut rng).cloned().unwrap_or_default();

        guards.push(
            GuardProfile::new(format!("G{i}"), format!("Guard {i}"))
                .with_skills(skills)
                .with_role(role)
                .with_priority(i as i64),
        );
    }

    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut slots = Vec::new();
    let mut slot_id = 0usize;
    for day in 0..params.days {
        let date = start_date + Duration::days(day);
        for slot_in_day in 0..params.slots_per_day {
            let start_hour = (slot_in_day * (24 / params.slots_per_day)) as u32;
            let start = NaiveDateTime::new(date, time(start_hour, 0));
            let end = start + Duration::hours((24 / params.slots_per_day) as i64);

            let required_skill = if rng.gen_bool(0.6) {
                params.skills.choose(&mut rng).cloned()
            } else {
                None
            };

            let mut slot = DemandSlot::new(format!("S{slot_id}"), start, end)
                .with_required_guards(1 + rng.gen_range(0..2));
            if let Some(skill) = required_skill {
                slot = slot.with_required_skill(skill);
            }
            slots.push(slot);
            slot_id += 1;
        }
    }

    (guards, slots)
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn pick_count(rng: &mut StdRng, distribution: &[(usize, f64)]) -> usize {
    let total_weight: f64 = distribution.iter().map(|(_, w)| w).sum();
    let mut choice = rng.gen::<f64>() * total_weight;
    for (count, weight) in distribution {
        if choice < *weight {
            return *count;
        }
        choice -= weight;
    }
    distribution.last().map(|(c, _)| *c).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_fixture_has_expected_scale() {
        let (guards, slots) = generate(FixtureSize::Small);
        assert_eq!(guards.len(), 8);
        assert_eq!(slots.len(), 7 * 3);
    }

    #[test]
    fn large_fixture_has_expected_scale() {
        let (guards, slots) = generate(FixtureSize::Large);
        assert_eq!(guards.len(), 40);
        assert_eq!(slots.len(), 28 * 4);
    }

    #[test]
    fn generation_is_deterministic() {
        let (guards_a, slots_a) = generate(FixtureSize::Small);
        let (guards_b, slots_b) = generate(FixtureSize::Small);
        assert_eq!(guards_a.len(), guards_b.len());
        for (a, b) in guards_a.iter().zip(guards_b.iter()) {
            assert_eq!(a.guard_id, b.guard_id);
            assert_eq!(a.skills, b.skills);
        }
        for (a, b) in slots_a.iter().zip(slots_b.iter()) {
            assert_eq!(a.slot_id, b.slot_id);
            assert_eq!(a.required_skill, b.required_skill);
        }
    }

    #[test]
    fn every_guard_has_unique_id() {
        let (guards, _) = generate(FixtureSize::Large);
        let ids: std::collections::HashSet<_> = guards.iter().map(|g| &g.guard_id).collect();
        assert_eq!(ids.len(), guards.len());
    }
}
