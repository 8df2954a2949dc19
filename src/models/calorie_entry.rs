//! Calorie ledger model
//!
//! Intake and burned calories are two parallel tables with the same shape:
//! one row per date, and repeated logging for a date adds to that row.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Which calorie ledger a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Intake,
    Burned,
}

impl LedgerKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            LedgerKind::Intake => "calories intake",
            LedgerKind::Burned => "calories burned",
        }
    }

    // Table and column names are fixed strings, never user input.
    fn table(&self) -> &'static str {
        match self {
            LedgerKind::Intake => "calorie_intake_log",
            LedgerKind::Burned => "activity_log",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            LedgerKind::Intake => "calories",
            LedgerKind::Burned => "calories_burned",
        }
    }
}

/// One day's accumulated calories in a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEntry {
    pub date: NaiveDate,
    pub calories: f64,
}

impl CalorieEntry {
    /// Add `calories` to the row for `date`, creating it if absent
    pub fn accumulate(
        conn: &Connection,
        kind: LedgerKind,
        date: NaiveDate,
        calories: f64,
    ) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {table} (date, {col}) VALUES (?1, ?2)
             ON CONFLICT(date) DO UPDATE SET {col} = {col} + excluded.{col}",
            table = kind.table(),
            col = kind.column(),
        );
        conn.execute(&sql, params![date, calories])?;
        Ok(())
    }

    /// Get the accumulated value for a date, if any was logged
    pub fn get(conn: &Connection, kind: LedgerKind, date: NaiveDate) -> DbResult<Option<f64>> {
        let sql = format!(
            "SELECT {col} FROM {table} WHERE date = ?1",
            table = kind.table(),
            col = kind.column(),
        );
        let value: Option<f64> = conn
            .query_row(&sql, [date], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Delete every row of a ledger
    pub fn clear(conn: &Connection, kind: LedgerKind) -> DbResult<usize> {
        let rows = conn.execute(&format!("DELETE FROM {}", kind.table()), [])?;
        Ok(rows)
    }
}
