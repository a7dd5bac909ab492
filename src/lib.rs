//! Rostering engine core: a constraint-programming formulation that assigns
//! guards to demand slots under hard requirements (coverage, skills, role
//! composition, rest) while minimizing a weighted sum of soft violations
//! (shortfall, fairness dispersion, rest-window relaxation).
//!
//! No wire protocol, file format, CLI, or environment variable is part of
//! this crate — it is a pure library; a request/response gateway is a
//! separate collaborator that serializes `RosterResult`/`StaffingResult`.

mod assemble;
pub mod config;
pub mod domain;
pub mod error;
pub mod fixtures;
mod model;
mod solver;

mod engine;
pub mod result;

pub use config::{HardConstraintSpec, RosterConstraintConfig, SoftConstraintWeights};
pub use domain::{DemandSlot, GuardProfile};
pub use engine::RosterEngine;
pub use error::RosterError;
pub use result::{CoverageStat, RoleCoverageStat, RosterResult, StaffingResult, ViolationEntry};
pub use solver::SolveStatus;
