//! SQLite-backed storage for careers, steps and cached progress.
//!
//! The store owns the three career tables and migrates them at open. The
//! platform tables (`users`, `challenges`, `solves`) belong to the CTF
//! platform: shells are created `IF NOT EXISTS` so a fresh development
//! database bootstraps, but the service only ever reads them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use crate::error::CareerError;
use crate::types::{
    Career, CareerStep, CareerUpdate, ChallengeBrief, NewCareer, NewStep, StepUpdate,
};

/// Current schema version; bump together with a new `migrate_vN`.
pub const SCHEMA_VERSION: i64 = 2;

/// One solve joined with its challenge metadata.
#[derive(Debug, Clone)]
pub struct SolveRow {
    pub challenge_id: i64,
    pub category: String,
    pub module_id: Option<i64>,
}

/// One step's computed completion, ready to persist.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpsert {
    pub career_id: i64,
    pub step_id: i64,
    pub completed: bool,
}

/// Career store backed by SQLite.
pub struct CareerStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl CareerStore {
    /// Open or create the database at `path` and bring the schema up to date.
    ///
    /// Migration failure is a hard error; callers should treat it as fatal at
    /// startup rather than serving requests against an unknown schema.
    pub fn open(path: &Path) -> Result<Self, CareerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening career database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL keeps readers unblocked while a recompute commits
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        };

        store.init_platform_tables()?;
        store.apply_migrations()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Cheap liveness probe for the health endpoint.
    pub fn ping(&self) -> Result<(), CareerError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// Create read-only shells for the platform tables so joins work on a
    /// fresh database. Existing platform schemas are left untouched.
    fn init_platform_tables(&self) -> Result<(), CareerError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS challenges (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                value INTEGER,
                module_id INTEGER
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS solves (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                challenge_id INTEGER NOT NULL,
                date TEXT,
                UNIQUE(user_id, challenge_id)
            )",
            [],
        )?;

        Ok(())
    }

    /// Apply pending schema migrations, tracked in `schema_meta`.
    fn apply_migrations(&self) -> Result<(), CareerError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        let version = Self::schema_version(&conn)?;
        if version > SCHEMA_VERSION {
            warn!(
                "Database schema v{} is newer than this build supports (v{})",
                version, SCHEMA_VERSION
            );
            return Ok(());
        }

        if version < 1 {
            Self::migrate_v1(&conn)?;
        }
        if version < 2 {
            Self::migrate_v2(&conn)?;
        }

        conn.execute(
            "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;

        if version < SCHEMA_VERSION {
            info!("Database schema migrated from v{} to v{}", version, SCHEMA_VERSION);
        }
        Ok(())
    }

    fn schema_version(conn: &Connection) -> Result<i64, CareerError> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    /// v1: the three career tables and their indexes.
    fn migrate_v1(conn: &Connection) -> Result<(), CareerError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS careers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                icon TEXT,
                color TEXT
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS career_steps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                career_id INTEGER NOT NULL REFERENCES careers(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                category TEXT,
                required_solves INTEGER NOT NULL DEFAULT 1,
                UNIQUE(career_id, name)
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS career_user_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                career_id INTEGER NOT NULL REFERENCES careers(id) ON DELETE CASCADE,
                step_id INTEGER NOT NULL REFERENCES career_steps(id) ON DELETE CASCADE,
                completed INTEGER NOT NULL DEFAULT 0,
                UNIQUE(user_id, step_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_steps_career ON career_steps(career_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_progress_user ON career_user_progress(user_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_progress_career ON career_user_progress(career_id)",
            [],
        )?;

        Ok(())
    }

    /// v2: challenge-bound steps and step images.
    ///
    /// Guarded per column because pre-versioning deployments may already
    /// carry one of them.
    fn migrate_v2(conn: &Connection) -> Result<(), CareerError> {
        let add_column_if_missing = |col: &str, ddl: &str| -> Result<(), CareerError> {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM pragma_table_info('career_steps') WHERE name = ?1",
                params![col],
                |row| row.get(0),
            )?;
            if exists == 0 {
                conn.execute(ddl, [])?;
                info!("Added column {} to career_steps", col);
            }
            Ok(())
        };

        add_column_if_missing(
            "challenge_id",
            "ALTER TABLE career_steps ADD COLUMN challenge_id INTEGER",
        )?;
        add_column_if_missing(
            "image_url",
            "ALTER TABLE career_steps ADD COLUMN image_url TEXT",
        )?;
        Ok(())
    }

    // ========================================================================
    // Careers
    // ========================================================================

    pub fn create_career(&self, new: &NewCareer) -> Result<Career, CareerError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO careers (name, description, icon, color) VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.description, new.icon, new.color],
        )
        .map_err(|e| conflict_or_db(e, "Career already exists"))?;

        let id = conn.last_insert_rowid();
        Self::career_row(&conn, id)?.ok_or_else(|| CareerError::not_found("Career not found"))
    }

    pub fn career(&self, id: i64) -> Result<Option<Career>, CareerError> {
        let conn = self.conn.lock().unwrap();
        Self::career_row(&conn, id)
    }

    pub fn list_careers(&self) -> Result<Vec<Career>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, name, description, icon, color FROM careers ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], Self::map_career)?;

        let mut careers = Vec::new();
        for row in rows {
            careers.push(row?);
        }
        Ok(careers)
    }

    pub fn update_career(&self, id: i64, update: &CareerUpdate) -> Result<Career, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut career = Self::career_row(&conn, id)?
            .ok_or_else(|| CareerError::not_found("Career not found"))?;

        if let Some(name) = &update.name {
            career.name = name.clone();
        }
        if let Some(description) = &update.description {
            career.description = description.clone();
        }
        if let Some(icon) = &update.icon {
            career.icon = icon.clone();
        }
        if let Some(color) = &update.color {
            career.color = color.clone();
        }

        conn.execute(
            "UPDATE careers SET name = ?1, description = ?2, icon = ?3, color = ?4 WHERE id = ?5",
            params![career.name, career.description, career.icon, career.color, id],
        )
        .map_err(|e| conflict_or_db(e, "Career already exists"))?;

        Ok(career)
    }

    /// Delete a career; steps and progress rows go with it via cascade.
    pub fn delete_career(&self, id: i64) -> Result<(), CareerError> {
        let conn = self.conn.lock().unwrap();

        let deleted = conn.execute("DELETE FROM careers WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(CareerError::not_found("Career not found"));
        }
        Ok(())
    }

    fn career_row(conn: &Connection, id: i64) -> Result<Option<Career>, CareerError> {
        let career = conn
            .query_row(
                "SELECT id, name, description, icon, color FROM careers WHERE id = ?1",
                params![id],
                Self::map_career,
            )
            .optional()?;
        Ok(career)
    }

    fn map_career(row: &rusqlite::Row<'_>) -> rusqlite::Result<Career> {
        Ok(Career {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            icon: row.get(3)?,
            color: row.get(4)?,
        })
    }

    // ========================================================================
    // Steps
    // ========================================================================

    pub fn create_step(&self, new: &NewStep) -> Result<CareerStep, CareerError> {
        let conn = self.conn.lock().unwrap();

        Self::career_row(&conn, new.career_id)?
            .ok_or_else(|| CareerError::not_found("Career not found"))?;

        conn.execute(
            "INSERT INTO career_steps
                (career_id, name, description, category, challenge_id, image_url, required_solves)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.career_id,
                new.name,
                new.description,
                new.category,
                new.challenge_id,
                new.image_url,
                new.required_solves
            ],
        )
        .map_err(|e| conflict_or_db(e, "Step already exists for this career"))?;

        let id = conn.last_insert_rowid();
        Self::step_row(&conn, id)?.ok_or_else(|| CareerError::not_found("Step not found"))
    }

    pub fn step(&self, id: i64) -> Result<Option<CareerStep>, CareerError> {
        let conn = self.conn.lock().unwrap();
        Self::step_row(&conn, id)
    }

    pub fn steps_for_career(&self, career_id: i64) -> Result<Vec<CareerStep>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, career_id, name, description, category, challenge_id, image_url,
                    required_solves
             FROM career_steps WHERE career_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![career_id], Self::map_step)?;

        let mut steps = Vec::new();
        for row in rows {
            steps.push(row?);
        }
        Ok(steps)
    }

    pub fn update_step(&self, id: i64, update: &StepUpdate) -> Result<CareerStep, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut step =
            Self::step_row(&conn, id)?.ok_or_else(|| CareerError::not_found("Step not found"))?;

        if let Some(name) = &update.name {
            step.name = name.clone();
        }
        if let Some(description) = &update.description {
            step.description = description.clone();
        }
        if let Some(category) = &update.category {
            step.category = category.clone();
        }
        if let Some(challenge_id) = &update.challenge_id {
            step.challenge_id = *challenge_id;
        }
        if let Some(image_url) = &update.image_url {
            step.image_url = image_url.clone();
        }
        if let Some(required_solves) = update.required_solves {
            step.required_solves = required_solves;
        }

        conn.execute(
            "UPDATE career_steps SET
                name = ?1, description = ?2, category = ?3, challenge_id = ?4,
                image_url = ?5, required_solves = ?6
             WHERE id = ?7",
            params![
                step.name,
                step.description,
                step.category,
                step.challenge_id,
                step.image_url,
                step.required_solves,
                id
            ],
        )
        .map_err(|e| conflict_or_db(e, "Step already exists for this career"))?;

        Ok(step)
    }

    pub fn delete_step(&self, id: i64) -> Result<(), CareerError> {
        let conn = self.conn.lock().unwrap();

        let deleted = conn.execute("DELETE FROM career_steps WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(CareerError::not_found("Step not found"));
        }
        Ok(())
    }

    fn step_row(conn: &Connection, id: i64) -> Result<Option<CareerStep>, CareerError> {
        let step = conn
            .query_row(
                "SELECT id, career_id, name, description, category, challenge_id, image_url,
                        required_solves
                 FROM career_steps WHERE id = ?1",
                params![id],
                Self::map_step,
            )
            .optional()?;
        Ok(step)
    }

    fn map_step(row: &rusqlite::Row<'_>) -> rusqlite::Result<CareerStep> {
        Ok(CareerStep {
            id: row.get(0)?,
            career_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            challenge_id: row.get(5)?,
            image_url: row.get(6)?,
            required_solves: row.get(7)?,
        })
    }

    // ========================================================================
    // Platform reads (users, challenges, solves)
    // ========================================================================

    pub fn user_exists(&self, user_id: i64) -> Result<bool, CareerError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list_user_ids(&self) -> Result<Vec<i64>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare("SELECT id FROM users ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// All of a user's solves joined with challenge category and module id.
    pub fn solve_rows(&self, user_id: i64) -> Result<Vec<SolveRow>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT s.challenge_id, c.category, c.module_id
             FROM solves s
             JOIN challenges c ON c.id = s.challenge_id
             WHERE s.user_id = ?1",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(SolveRow {
                challenge_id: row.get(0)?,
                category: row.get(1)?,
                module_id: row.get(2)?,
            })
        })?;

        let mut solves = Vec::new();
        for row in rows {
            solves.push(row?);
        }
        Ok(solves)
    }

    pub fn challenge(&self, id: i64) -> Result<Option<ChallengeBrief>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let challenge = conn
            .query_row(
                "SELECT id, name, category, value FROM challenges WHERE id = ?1",
                params![id],
                Self::map_challenge,
            )
            .optional()?;
        Ok(challenge)
    }

    pub fn list_challenges(&self) -> Result<Vec<ChallengeBrief>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt =
            conn.prepare("SELECT id, name, category, value FROM challenges ORDER BY id ASC")?;
        let rows = stmt.query_map([], Self::map_challenge)?;

        let mut challenges = Vec::new();
        for row in rows {
            challenges.push(row?);
        }
        Ok(challenges)
    }

    pub fn has_solve(&self, user_id: i64, challenge_id: i64) -> Result<bool, CareerError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM solves WHERE user_id = ?1 AND challenge_id = ?2",
            params![user_id, challenge_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn map_challenge(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChallengeBrief> {
        Ok(ChallengeBrief {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            value: row.get(3)?,
        })
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Upsert one user's computed step completions in a single transaction.
    ///
    /// Existing rows keep their ids; only the `completed` flag changes.
    pub fn apply_progress(
        &self,
        user_id: i64,
        upserts: &[ProgressUpsert],
    ) -> Result<(), CareerError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        for upsert in upserts {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM career_user_progress WHERE user_id = ?1 AND step_id = ?2",
                    params![user_id, upsert.step_id],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                Some(row_id) => {
                    tx.execute(
                        "UPDATE career_user_progress SET completed = ?1 WHERE id = ?2",
                        params![upsert.completed, row_id],
                    )?;
                }
                None => {
                    tx.execute(
                        "INSERT INTO career_user_progress (user_id, career_id, step_id, completed)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![user_id, upsert.career_id, upsert.step_id, upsert.completed],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// step_id -> completed for one user.
    pub fn progress_map(&self, user_id: i64) -> Result<HashMap<i64, bool>, CareerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT step_id, completed FROM career_user_progress WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (step_id, completed) = row?;
            map.insert(step_id, completed);
        }
        Ok(map)
    }

    /// Completed progress rows for a career, across all users.
    pub fn career_completed_count(&self, career_id: i64) -> Result<i64, CareerError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM career_user_progress WHERE career_id = ?1 AND completed = 1",
            params![career_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn step_count(&self, career_id: i64) -> Result<i64, CareerError> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM career_steps WHERE career_id = ?1",
            params![career_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Raw connection handle for test seeding and fault injection.
    #[cfg(test)]
    pub(crate) fn raw_conn(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

/// Map a uniqueness violation to a domain conflict, pass everything else
/// through as a database error.
fn conflict_or_db(e: rusqlite::Error, message: &str) -> CareerError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            CareerError::conflict(message)
        }
        _ => CareerError::Database(e),
    }
}
