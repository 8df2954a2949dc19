//! Weight log model
//!
//! One weight per day in kilograms; logging again for the same day replaces it.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

impl WeightEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
        })
    }

    /// Record the weight for a date, overwriting any earlier value for that date
    pub fn upsert(conn: &Connection, date: NaiveDate, weight_kg: f64) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO weight_log (date, weight_kg) VALUES (?1, ?2)
            ON CONFLICT(date) DO UPDATE SET weight_kg = excluded.weight_kg
            "#,
            params![date, weight_kg],
        )?;
        Ok(())
    }

    /// All entries, oldest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT date, weight_kg FROM weight_log ORDER BY date")?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn clear(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM weight_log", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_second_entry_for_date_overwrites() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let entries = db
            .with_conn(|conn| {
                WeightEntry::upsert(conn, date, 80.0)?;
                WeightEntry::upsert(conn, date, 79.5)?;
                WeightEntry::list(conn)
            })
            .unwrap();

        assert_eq!(entries, vec![WeightEntry { date, weight_kg: 79.5 }]);
    }
}
