//! Command implementations.
//!
//! Each command calls the daemon, prints aligned plain text and returns the
//! daemon's error message unchanged on failure. Optional string flags are
//! forwarded verbatim so an explicit empty string clears a field on update,
//! matching the API's patch semantics.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

use crate::cli::{CareerCommands, StepCommands};
use crate::client::CareerdClient;
use crate::display;

pub async fn career(client: &CareerdClient, action: CareerCommands) -> Result<()> {
    match action {
        CareerCommands::List => {
            let overview = client.list_careers().await?;
            if overview.careers.is_empty() {
                println!("No careers defined.");
                return Ok(());
            }
            for career in &overview.careers {
                println!(
                    "{:>4}  {:<24} {:>3}/{:<3}  {}",
                    career.id,
                    career.name,
                    career.completed_steps,
                    career.total_steps,
                    career.description.as_deref().unwrap_or(""),
                );
            }
            Ok(())
        }
        CareerCommands::Create {
            name,
            description,
            icon,
            color,
        } => {
            let payload = career_payload(Some(name), description, icon, color);
            let career = client.create_career(&payload).await?;
            display::success(&format!("Career {} created (id {})", career.name, career.id));
            Ok(())
        }
        CareerCommands::Update {
            career_id,
            name,
            description,
            icon,
            color,
        } => {
            let payload = career_payload(name, description, icon, color);
            let career = client.update_career(career_id, &payload).await?;
            display::success(&format!("Career {} updated", career.name));
            Ok(())
        }
        CareerCommands::Delete { career_id } => {
            client.delete_career(career_id).await?;
            display::success(&format!("Career {} deleted", career_id));
            Ok(())
        }
    }
}

pub async fn step(client: &CareerdClient, action: StepCommands) -> Result<()> {
    match action {
        StepCommands::List { career_id } => {
            let steps = client.list_steps(career_id).await?;
            if steps.is_empty() {
                println!("No steps in career {}.", career_id);
                return Ok(());
            }
            for step in &steps {
                println!(
                    "{} {:>4}  {:<24} {}",
                    display::completion_mark(step.completed),
                    step.id,
                    step.name,
                    criterion_label(step.category.as_deref(), step.challenge_id, step.required_solves),
                );
            }
            Ok(())
        }
        StepCommands::Create {
            career_id,
            name,
            description,
            category,
            challenge_id,
            image_url,
            required_solves,
        } => {
            let mut payload = step_payload(
                Some(name),
                description,
                category,
                challenge_id,
                image_url,
                required_solves,
            );
            payload["career_id"] = json!(career_id);

            let step = client.create_step(&payload).await?;
            display::success(&format!(
                "Step {} created in career {} (id {})",
                step.name, step.career_id, step.id
            ));
            Ok(())
        }
        StepCommands::Update {
            step_id,
            name,
            description,
            category,
            challenge_id,
            image_url,
            required_solves,
        } => {
            let payload = step_payload(
                name,
                description,
                category,
                challenge_id,
                image_url,
                required_solves,
            );
            let step = client.update_step(step_id, &payload).await?;
            display::success(&format!("Step {} updated", step.name));
            Ok(())
        }
        StepCommands::Delete { step_id } => {
            client.delete_step(step_id).await?;
            display::success(&format!("Step {} deleted", step_id));
            Ok(())
        }
    }
}

pub async fn progress(client: &CareerdClient, user_id: i64) -> Result<()> {
    let overview = client.user_progress(user_id).await?;
    if overview.careers.is_empty() {
        println!("No careers defined.");
        return Ok(());
    }

    for career in &overview.careers {
        println!(
            "{} ({}/{})",
            career.name.bold(),
            career.completed_steps,
            career.total_steps
        );
        for step in &career.steps {
            println!("  {} {}", display::completion_mark(step.completed), step.name);
        }
    }
    Ok(())
}

pub async fn sync(client: &CareerdClient) -> Result<()> {
    let report = client.sync().await?;
    display::success(&format!(
        "Synced {} users in {} ms",
        report.synced, report.duration_ms
    ));
    if !report.failed.is_empty() {
        display::warning(&format!("Failed user ids: {:?}", report.failed));
    }
    Ok(())
}

pub async fn summary(client: &CareerdClient) -> Result<()> {
    let rows = client.summary().await?;
    if rows.is_empty() {
        println!("No careers defined.");
        return Ok(());
    }

    println!("{:>4}  {:<24} {:>9}  {:>5}", "ID", "CAREER", "COMPLETED", "STEPS");
    for row in &rows {
        println!(
            "{:>4}  {:<24} {:>9}  {:>5}",
            row.career_id, row.career, row.completed, row.total
        );
    }
    Ok(())
}

pub async fn health(client: &CareerdClient) -> Result<()> {
    let health = client.health().await?;
    let mark = if health.database_ok {
        "[OK]".green().to_string()
    } else {
        "[DEGRADED]".red().to_string()
    };
    println!(
        "{} {} v{} (up {}s)",
        mark, health.name, health.version, health.uptime_secs
    );
    Ok(())
}

/// One-line description of a step's completion rule for listings.
fn criterion_label(category: Option<&str>, challenge_id: Option<i64>, required: i64) -> String {
    if let Some(challenge_id) = challenge_id {
        return format!("challenge {}", challenge_id);
    }
    match category {
        Some(category) if !category.is_empty() => format!("{} x{}", category, required),
        _ => format!("any x{}", required),
    }
}

fn career_payload(
    name: Option<String>,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
) -> Value {
    let mut payload = json!({});
    insert_str(&mut payload, "name", name);
    insert_str(&mut payload, "description", description);
    insert_str(&mut payload, "icon", icon);
    insert_str(&mut payload, "color", color);
    payload
}

fn step_payload(
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    challenge_id: Option<String>,
    image_url: Option<String>,
    required_solves: Option<i64>,
) -> Value {
    let mut payload = json!({});
    insert_str(&mut payload, "name", name);
    insert_str(&mut payload, "description", description);
    insert_str(&mut payload, "category", category);
    insert_str(&mut payload, "challenge_id", challenge_id);
    insert_str(&mut payload, "image_url", image_url);
    if let Some(required_solves) = required_solves {
        payload["required_solves"] = json!(required_solves);
    }
    payload
}

/// Omits absent flags entirely so the API can tell "keep" from "clear".
fn insert_str(payload: &mut Value, key: &str, value: Option<String>) {
    if let Some(value) = value {
        payload[key] = Value::String(value);
    }
}
