//! Core data types for the career service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named track of steps that players work through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// A single milestone inside a career.
///
/// Which completion rule applies is decided by which optional column is set;
/// see [`CareerStep::criterion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerStep {
    pub id: i64,
    pub career_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub challenge_id: Option<i64>,
    pub image_url: Option<String>,
    pub required_solves: i64,
}

/// Completion rule for a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCriterion {
    /// Solve one specific challenge.
    Challenge(i64),
    /// Reach `required_solves` solves whose category or module label matches.
    Category(String),
    /// Reach `required_solves` solves in total.
    TotalSolves,
}

impl CareerStep {
    /// Which of the three completion modes this step uses.
    ///
    /// A challenge reference wins over a category label if both are set
    /// (legacy rows can carry both); an empty category string counts as unset.
    pub fn criterion(&self) -> StepCriterion {
        if let Some(challenge_id) = self.challenge_id {
            return StepCriterion::Challenge(challenge_id);
        }
        match &self.category {
            Some(category) if !category.is_empty() => {
                StepCriterion::Category(category.clone())
            }
            _ => StepCriterion::TotalSolves,
        }
    }
}

/// Fields accepted when creating a career.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCareer {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Partial update for a career.
///
/// `None` leaves a field untouched; for the nullable fields, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct CareerUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

/// Fields accepted when creating a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStep {
    pub career_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub challenge_id: Option<i64>,
    pub image_url: Option<String>,
    pub required_solves: i64,
}

impl Default for NewStep {
    fn default() -> Self {
        Self {
            career_id: 0,
            name: String::new(),
            description: None,
            category: None,
            challenge_id: None,
            image_url: None,
            required_solves: 1,
        }
    }
}

/// Partial update for a step, same `Some(None)`-clears convention as
/// [`CareerUpdate`].
#[derive(Debug, Clone, Default)]
pub struct StepUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub challenge_id: Option<Option<i64>>,
    pub image_url: Option<Option<String>>,
    pub required_solves: Option<i64>,
}

/// A step joined with one user's completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOverview {
    pub id: i64,
    pub career_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub challenge_id: Option<i64>,
    pub image_url: Option<String>,
    pub required_solves: i64,
    pub completed: bool,
}

/// A career with one user's step completion and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerOverview {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub steps: Vec<StepOverview>,
    pub completed_steps: usize,
    pub total_steps: usize,
}

/// Every career with one user's completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressOverview {
    pub careers: Vec<CareerOverview>,
}

/// Outcome of evaluating one step for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: i64,
    pub completed: bool,
    pub required_solves: i64,
    pub solved: i64,
}

/// Per-career step results from one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerProgress {
    pub career_id: i64,
    pub steps: Vec<StepResult>,
}

/// Result of recomputing one user's progress.
///
/// `user` is `None` when the requested user id does not exist; in that case
/// nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub user: Option<i64>,
    pub careers: Vec<CareerProgress>,
}

impl ProgressSnapshot {
    pub fn empty() -> Self {
        Self {
            user: None,
            careers: Vec::new(),
        }
    }
}

/// Outcome of a bulk recompute across every known user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: Vec<i64>,
    pub snapshots: Vec<ProgressSnapshot>,
    pub duration_ms: u64,
    pub synced_at: DateTime<Utc>,
}

/// Admin roll-up for one career: completed progress rows across all users
/// versus the career's step count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerSummary {
    pub career_id: i64,
    pub career: String,
    pub completed: i64,
    pub total: i64,
}

/// Challenge metadata surfaced to the step editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeBrief {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub value: Option<i64>,
}

/// Challenge metadata plus whether the requesting user has solved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDetail {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub value: Option<i64>,
    pub solved: bool,
}

/// Daemon liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub name: String,
    pub version: String,
    pub uptime_secs: u64,
    pub database_ok: bool,
}

/// Uniform API envelope: `{"success": true, "data": ...}` on success,
/// `{"success": false, "message": ...}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
