//! Seeding helpers for platform tables in tests.
//!
//! The service never writes `users`/`challenges`/`solves`, so tests populate
//! them through the raw connection the way the platform would.

use rusqlite::params;

use crate::store::CareerStore;

pub(crate) fn seed_user(store: &CareerStore, id: i64, name: &str) {
    let conn = store.raw_conn();
    let conn = conn.lock().unwrap();
    conn.execute(
        "INSERT INTO users (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .unwrap();
}

pub(crate) fn seed_challenge(
    store: &CareerStore,
    id: i64,
    name: &str,
    category: &str,
    value: Option<i64>,
    module_id: Option<i64>,
) {
    let conn = store.raw_conn();
    let conn = conn.lock().unwrap();
    conn.execute(
        "INSERT INTO challenges (id, name, category, value, module_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, name, category, value, module_id],
    )
    .unwrap();
}

pub(crate) fn seed_solve(store: &CareerStore, user_id: i64, challenge_id: i64) {
    let conn = store.raw_conn();
    let conn = conn.lock().unwrap();
    conn.execute(
        "INSERT INTO solves (user_id, challenge_id, date) VALUES (?1, ?2, datetime('now'))",
        params![user_id, challenge_id],
    )
    .unwrap();
}
