//! Output types produced by a solve: assignments, coverage, violations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-slot coverage outcome: how many guards were required versus assigned,
/// broken down by role when the slot declares `required_roles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStat {
    pub required: u32,
    pub assigned: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub roles: HashMap<String, RoleCoverageStat>,
}

/// Per-role coverage outcome within a slot's `CoverageStat`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCoverageStat {
    pub required: u32,
    pub assigned: u32,
}

/// A single named soft-constraint violation: how much it was violated by,
/// and the resulting contribution to the objective.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationEntry {
    pub value: f64,
    pub penalty: f64,
}

/// The outcome of a single `RosterEngine::solve` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResult {
    pub feasible: bool,
    /// guard_id -> ordered list of assigned slot_ids (input iteration order,
    /// no duplicates). Present for every guard_id in the input, even when
    /// the guard received no assignments.
    pub assignments: HashMap<String, Vec<String>>,
    pub objective_value: Option<f64>,
    pub violation_summaries: HashMap<String, ViolationEntry>,
    /// slot_id -> coverage outcome. Present for every slot_id in the input.
    pub coverage: HashMap<String, CoverageStat>,
    pub status: String,
    pub solver_statistics: Option<String>,
    /// guard_id -> slot_id -> role label. An entry for `(g, s)` exists iff
    /// `s` is in `assignments[g]`; the role is `None` when the guard
    /// satisfies numeric coverage but matches no declared role line.
    pub assignment_roles: HashMap<String, HashMap<String, Option<String>>>,
}

/// The outcome of `RosterEngine::find_minimum_staffing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingResult {
    pub minimum_guards: Option<usize>,
    pub roster: Option<RosterResult>,
    /// guard-pool size attempted -> the result of solving with that many
    /// guards (the size-ordered prefix of the priority-sorted pool).
    pub attempts: HashMap<usize, RosterResult>,
}
