//! Constraint configuration: which requirements are hard, and how soft
//! violations are weighted.

use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Constraint toggles enforced as hard requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardConstraintSpec {
    #[serde(default = "default_true")]
    pub enforce_coverage: bool,
    #[serde(default = "default_true")]
    pub enforce_skill_requirements: bool,
    #[serde(default)]
    pub enforce_role_coverage: bool,
    #[serde(default)]
    pub max_consecutive_days: Option<u32>,
    #[serde(default)]
    pub min_break_hours: Option<f64>,
    #[serde(default)]
    pub rest_window_hours: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl Default for HardConstraintSpec {
    fn default() -> Self {
        Self {
            enforce_coverage: true,
            enforce_skill_requirements: true,
            enforce_role_coverage: false,
            max_consecutive_days: None,
            min_break_hours: None,
            rest_window_hours: None,
        }
    }
}

impl HardConstraintSpec {
    pub fn with_max_consecutive_days(mut self, days: u32) -> Self {
        self.max_consecutive_days = Some(days);
        self
    }

    pub fn with_min_break_hours(mut self, hours: f64) -> Self {
        self.min_break_hours = Some(hours);
        self
    }

    pub fn with_rest_window_hours(mut self, hours: f64) -> Self {
        self.rest_window_hours = Some(hours);
        self
    }
}

/// Non-negative weights applied when a soft constraint is violated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftConstraintWeights {
    pub coverage_shortfall: i64,
    pub min_break_violation: i64,
    pub rest_window_violation: i64,
    pub consecutive_day_violation: i64,
    pub fairness_penalty: i64,
    /// Weight for the optional skill-mismatch soft term (see
    /// `HardConstraintSpec::enforce_skill_requirements = false`). Zero by
    /// default, preserving the documented asymmetry: no penalty unless a
    /// caller explicitly opts in.
    #[serde(default)]
    pub skill_mismatch_penalty: i64,
}

impl Default for SoftConstraintWeights {
    fn default() -> Self {
        Self {
            coverage_shortfall: 1_000,
            min_break_violation: 250,
            rest_window_violation: 250,
            consecutive_day_violation: 400,
            fairness_penalty: 10,
            skill_mismatch_penalty: 0,
        }
    }
}

impl SoftConstraintWeights {
    fn validate(&self) -> Result<(), RosterError> {
        let fields = [
            ("coverageShortfall", self.coverage_shortfall),
            ("minBreakViolation", self.min_break_violation),
            ("restWindowViolation", self.rest_window_violation),
            ("consecutiveDayViolation", self.consecutive_day_violation),
            ("fairnessPenalty", self.fairness_penalty),
            ("skillMismatchPenalty", self.skill_mismatch_penalty),
        ];
        for (name, value) in fields {
            if value < 0 {
                return Err(RosterError::InvalidConfiguration(format!(
                    "soft weight `{name}` must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Aggregate constraint configuration for a solve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterConstraintConfig {
    #[serde(default)]
    pub hard: HardConstraintSpec,
    #[serde(default)]
    pub soft: SoftConstraintWeights,
    #[serde(default)]
    pub fairness_target_hours: Option<f64>,
}

impl RosterConstraintConfig {
    /// Rejects configurations with negative soft weights before a solve is
    /// attempted, per spec.md §7's contract that negative weights are a
    /// caller bug — this surfaces it eagerly instead of waiting on the
    /// solver to either reject the model or report infeasibility.
    pub fn validate(&self) -> Result<(), RosterError> {
        self.soft.validate()
    }
}
