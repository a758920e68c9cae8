//! Read-side assembly: career overviews and the admin roll-up.
//!
//! Every overview recomputes the caller's progress before reading, so the
//! flags a page renders are never staler than the solves at request time.

use crate::error::CareerError;
use crate::progress::ProgressEngine;
use crate::store::CareerStore;
use crate::types::{CareerOverview, CareerSummary, ProgressOverview, StepOverview};

/// Every career with `user_id`'s completion flags and per-career totals.
///
/// Unknown users are served the same shape with every flag false; nothing is
/// persisted for them.
pub fn progress_overview(
    engine: &ProgressEngine,
    user_id: i64,
) -> Result<ProgressOverview, CareerError> {
    engine.update_user(user_id)?;

    let store = engine.store();
    let progress = store.progress_map(user_id)?;

    let mut careers = Vec::new();
    for career in store.list_careers()? {
        let steps: Vec<StepOverview> = store
            .steps_for_career(career.id)?
            .into_iter()
            .map(|step| {
                let completed = progress.get(&step.id).copied().unwrap_or(false);
                StepOverview {
                    id: step.id,
                    career_id: step.career_id,
                    name: step.name,
                    description: step.description,
                    category: step.category,
                    challenge_id: step.challenge_id,
                    image_url: step.image_url,
                    required_solves: step.required_solves,
                    completed,
                }
            })
            .collect();

        let completed_steps = steps.iter().filter(|s| s.completed).count();
        let total_steps = steps.len();
        careers.push(CareerOverview {
            id: career.id,
            name: career.name,
            description: career.description,
            icon: career.icon,
            color: career.color,
            steps,
            completed_steps,
            total_steps,
        });
    }

    Ok(ProgressOverview { careers })
}

/// [`progress_overview`] for admin lookups, where the target user must exist.
pub fn user_overview_strict(
    engine: &ProgressEngine,
    user_id: i64,
) -> Result<ProgressOverview, CareerError> {
    if !engine.store().user_exists(user_id)? {
        return Err(CareerError::not_found("User not found"));
    }
    progress_overview(engine, user_id)
}

/// One career's steps with `user_id`'s completion flags.
pub fn steps_with_completion(
    engine: &ProgressEngine,
    career_id: i64,
    user_id: i64,
) -> Result<Vec<StepOverview>, CareerError> {
    engine.update_user(user_id)?;

    let store = engine.store();
    if store.career(career_id)?.is_none() {
        return Err(CareerError::not_found("Career not found"));
    }

    let progress = store.progress_map(user_id)?;
    let steps = store
        .steps_for_career(career_id)?
        .into_iter()
        .map(|step| {
            let completed = progress.get(&step.id).copied().unwrap_or(false);
            StepOverview {
                id: step.id,
                career_id: step.career_id,
                name: step.name,
                description: step.description,
                category: step.category,
                challenge_id: step.challenge_id,
                image_url: step.image_url,
                required_solves: step.required_solves,
                completed,
            }
        })
        .collect();
    Ok(steps)
}

/// Per-career completion counts across the whole player base.
///
/// `completed` counts completed progress rows from every user, so one career
/// can exceed its own `total` once several players finish it.
pub fn admin_summary(store: &CareerStore) -> Result<Vec<CareerSummary>, CareerError> {
    let mut summaries = Vec::new();
    for career in store.list_careers()? {
        let completed = store.career_completed_count(career.id)?;
        let total = store.step_count(career.id)?;
        summaries.push(CareerSummary {
            career_id: career.id,
            career: career.name,
            completed,
            total,
        });
    }
    Ok(summaries)
}
