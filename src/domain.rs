//! Domain model for the rostering engine: guards and demand slots.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A guard available for assignment to demand slots.
///
/// Immutable value type: the engine never mutates a `GuardProfile` it was
/// handed. `guard_id` must be unique within a single `solve` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardProfile {
    pub guard_id: String,
    pub name: String,
    #[serde(default)]
    pub skills: HashSet<String>,
    #[serde(default)]
    pub roles: HashSet<String>,
    #[serde(default, rename = "maxHoursPerWeek")]
    pub max_hours_per_week: Option<f64>,
    #[serde(default)]
    pub priority: i64,
}

impl GuardProfile {
    pub fn new(guard_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guard_id: guard_id.into(),
            name: name.into(),
            skills: HashSet::new(),
            roles: HashSet::new(),
            max_hours_per_week: None,
            priority: 0,
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for skill in skills {
            self.skills.insert(skill.into());
        }
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for role in roles {
            self.roles.insert(role.into());
        }
        self
    }

    pub fn with_max_hours_per_week(mut self, hours: f64) -> Self {
        self.max_hours_per_week = Some(hours);
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Union of declared roles and skills — a role-eligible guard either holds
    /// the role explicitly or has a matching skill name.
    pub fn role_set(&self) -> HashSet<&str> {
        self.roles
            .iter()
            .map(String::as_str)
            .chain(self.skills.iter().map(String::as_str))
            .collect()
    }
}

/// A contiguous block of time that demands staffing.
///
/// Immutable value type. `slot_id` must be unique within a single `solve`
/// call; `end` must be strictly after `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandSlot {
    pub slot_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default = "default_required_guards", rename = "requiredGuards")]
    pub required_guards: u32,
    #[serde(default, rename = "requiredSkill")]
    pub required_skill: Option<String>,
    /// Role name -> required count, in caller-declared order. Order matters:
    /// it is the scan order the greedy role-attribution pass uses, which is
    /// what makes attribution deterministic (see `RosterEngine::solve`).
    #[serde(default, rename = "requiredRoles")]
    pub required_roles: Vec<(String, u32)>,
}

fn default_required_guards() -> u32 {
    1
}

impl DemandSlot {
    pub fn new(slot_id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            slot_id: slot_id.into(),
            start,
            end,
            required_guards: default_required_guards(),
            required_skill: None,
            required_roles: Vec::new(),
        }
    }

    pub fn with_required_guards(mut self, count: u32) -> Self {
        self.required_guards = count;
        self
    }

    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skill = Some(skill.into());
        self
    }

    pub fn with_required_role(mut self, role: impl Into<String>, count: u32) -> Self {
        self.required_roles.push((role.into(), count));
        self
    }

    /// Duration of the slot in hours. `end` is always after `start` by contract.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }

    /// Comparable ordinal for the slot's calendar start day, used to group
    /// slots for consecutive-day reasoning.
    pub fn day_index(&self) -> i32 {
        self.start.date().num_days_from_ce()
    }

    /// `max(required_guards, Σ required_roles.values())` — the effective
    /// headcount this slot needs regardless of role split.
    pub fn effective_requirement(&self) -> u32 {
        let role_total: u32 = self.required_roles.iter().map(|(_, count)| *count).sum();
        self.required_guards.max(role_total)
    }
}
