//! Progress reconciliation: map a user's solve history onto step completion.
//!
//! The engine recomputes wholesale on every run. Nothing reacts to individual
//! solve events; a page view or an admin sync triggers a full pass for the
//! user, which keeps the logic a single deterministic aggregation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::CareerError;
use crate::modules::ModuleCatalog;
use crate::store::{CareerStore, ProgressUpsert, SolveRow};
use crate::types::{CareerProgress, ProgressSnapshot, StepCriterion, StepResult};

/// Aggregated view of one user's solve history.
#[derive(Debug, Default)]
pub struct SolveSummary {
    /// Solve count per challenge category; empty categories are skipped.
    pub categories: HashMap<String, i64>,
    /// Solve count per resolved module label; unresolvable modules are
    /// dropped.
    pub modules: HashMap<String, i64>,
    /// Every individually solved challenge id.
    pub solved: HashSet<i64>,
    /// Grand total of solves.
    pub total: i64,
}

impl SolveSummary {
    pub fn from_rows(rows: &[SolveRow], catalog: &dyn ModuleCatalog) -> Self {
        let mut categories: HashMap<String, i64> = HashMap::new();
        let mut module_counts: HashMap<i64, i64> = HashMap::new();
        let mut solved = HashSet::new();

        for row in rows {
            solved.insert(row.challenge_id);
            if !row.category.is_empty() {
                *categories.entry(row.category.clone()).or_insert(0) += 1;
            }
            if let Some(module_id) = row.module_id {
                *module_counts.entry(module_id).or_insert(0) += 1;
            }
        }

        let module_ids: Vec<i64> = module_counts.keys().copied().collect();
        let labels = catalog.resolve(&module_ids);

        let mut modules: HashMap<String, i64> = HashMap::new();
        for (module_id, count) in module_counts {
            if let Some(label) = labels.get(&module_id) {
                modules.insert(label.clone(), count);
            }
        }

        Self {
            categories,
            modules,
            solved,
            total: rows.len() as i64,
        }
    }

    /// The solve figure a step is judged against.
    ///
    /// Category mode takes the larger of the category count and the resolved
    /// module count for the same label, so module-grouped challenges satisfy
    /// label-bound steps either way.
    pub fn solved_for(&self, criterion: &StepCriterion) -> i64 {
        match criterion {
            StepCriterion::Challenge(id) => i64::from(self.solved.contains(id)),
            StepCriterion::Category(label) => {
                let by_category = self.categories.get(label).copied().unwrap_or(0);
                let by_module = self.modules.get(label).copied().unwrap_or(0);
                by_category.max(by_module)
            }
            StepCriterion::TotalSolves => self.total,
        }
    }
}

/// Recomputes and persists per-step completion.
#[derive(Clone)]
pub struct ProgressEngine {
    store: Arc<CareerStore>,
    modules: Arc<dyn ModuleCatalog>,
}

impl ProgressEngine {
    pub fn new(store: Arc<CareerStore>, modules: Arc<dyn ModuleCatalog>) -> Self {
        Self { store, modules }
    }

    pub fn store(&self) -> &CareerStore {
        &self.store
    }

    /// Recompute every step of every career for one user and persist the
    /// flags in a single transaction.
    ///
    /// An unknown user yields the empty snapshot and writes nothing. Runs
    /// are idempotent for a fixed solve history.
    pub fn update_user(&self, user_id: i64) -> Result<ProgressSnapshot, CareerError> {
        if !self.store.user_exists(user_id)? {
            debug!("Progress update skipped for unknown user {}", user_id);
            return Ok(ProgressSnapshot::empty());
        }

        let rows = self.store.solve_rows(user_id)?;
        let summary = SolveSummary::from_rows(&rows, self.modules.as_ref());

        let mut upserts = Vec::new();
        let mut careers = Vec::new();

        for career in self.store.list_careers()? {
            let mut steps = Vec::new();
            for step in self.store.steps_for_career(career.id)? {
                let solved = summary.solved_for(&step.criterion());
                let completed = solved >= step.required_solves;

                upserts.push(ProgressUpsert {
                    career_id: career.id,
                    step_id: step.id,
                    completed,
                });
                steps.push(StepResult {
                    step_id: step.id,
                    completed,
                    required_solves: step.required_solves,
                    solved,
                });
            }
            careers.push(CareerProgress {
                career_id: career.id,
                steps,
            });
        }

        self.store.apply_progress(user_id, &upserts)?;

        Ok(ProgressSnapshot {
            user: Some(user_id),
            careers,
        })
    }
}
