//! Database migrations
//!
//! Schema creation and migration logic. Every profile field is a named column
//! so the written and read shapes cannot drift apart.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::debug!("applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILE
        -- Single row; heights and weights are metric
        -- ============================================
        CREATE TABLE user_profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK(age > 0),
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            units TEXT NOT NULL CHECK(units IN ('metric', 'imperial')),
            height_cm REAL NOT NULL CHECK(height_cm > 0),
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            activity_level TEXT NOT NULL CHECK(activity_level IN (
                'sedentary', 'lightly active', 'moderately active', 'very active', 'extra active'
            )),
            goal_weight_kg REAL,                 -- null until a goal is chosen
            weekly_weight_change REAL,           -- kg/week, positive = losing
            start_date TEXT NOT NULL,            -- ISO date: "2025-01-09"

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- CALORIE LEDGERS
        -- One accumulated row per day
        -- ============================================
        CREATE TABLE calorie_intake_log (
            date TEXT PRIMARY KEY,
            calories REAL NOT NULL DEFAULT 0 CHECK(calories >= 0)
        );

        CREATE TABLE activity_log (
            date TEXT PRIMARY KEY,
            calories_burned REAL NOT NULL DEFAULT 0 CHECK(calories_burned >= 0)
        );

        -- ============================================
        -- WEIGHT LOG
        -- Last entry for a day wins
        -- ============================================
        CREATE TABLE weight_log (
            date TEXT PRIMARY KEY,
            weight_kg REAL NOT NULL CHECK(weight_kg > 0)
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
