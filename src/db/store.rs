//! SQLite implementation of the storage interface.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::Database;
use crate::models::{CalorieEntry, LedgerKind, UserProfile, WeightEntry};
use crate::storage::Storage;
use crate::Result;

impl Storage for Database {
    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.with_conn(|conn| profile.save(conn))?;
        tracing::info!(name = %profile.name, "saved profile");
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.with_conn(UserProfile::load)?)
    }

    fn save_calorie_intake(&self, date: NaiveDate, calories: f64) -> Result<()> {
        self.with_conn(|conn| CalorieEntry::accumulate(conn, LedgerKind::Intake, date, calories))?;
        Ok(())
    }

    fn get_calorie_intake(&self, date: NaiveDate) -> Result<f64> {
        let value = self.with_conn(|conn| CalorieEntry::get(conn, LedgerKind::Intake, date))?;
        Ok(value.unwrap_or(0.0))
    }

    fn save_calories_burned(&self, date: NaiveDate, calories: f64) -> Result<()> {
        self.with_conn(|conn| CalorieEntry::accumulate(conn, LedgerKind::Burned, date, calories))?;
        Ok(())
    }

    fn get_calories_burned(&self, date: NaiveDate) -> Result<f64> {
        let value = self.with_conn(|conn| CalorieEntry::get(conn, LedgerKind::Burned, date))?;
        Ok(value.unwrap_or(0.0))
    }

    fn save_weight_entry(&self, date: NaiveDate, weight_kg: f64) -> Result<()> {
        self.with_conn(|conn| WeightEntry::upsert(conn, date, weight_kg))?;
        Ok(())
    }

    fn get_weight_entries(&self) -> Result<Vec<(NaiveDate, f64)>> {
        let entries = self.with_conn(WeightEntry::list)?;
        Ok(entries.into_iter().map(|e| (e.date, e.weight_kg)).collect())
    }

    fn get_all_dates(&self) -> Result<BTreeSet<NaiveDate>> {
        let dates = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT date FROM calorie_intake_log
                 UNION SELECT date FROM activity_log
                 UNION SELECT date FROM weight_log",
            )?;
            let dates = stmt
                .query_map([], |row| row.get::<_, NaiveDate>(0))?
                .collect::<rusqlite::Result<BTreeSet<_>>>()?;
            Ok(dates)
        })?;
        Ok(dates)
    }

    fn clear_all_data(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            UserProfile::delete(&tx)?;
            CalorieEntry::clear(&tx, LedgerKind::Intake)?;
            CalorieEntry::clear(&tx, LedgerKind::Burned)?;
            WeightEntry::clear(&tx)?;
            tx.commit()?;
            Ok(())
        })?;
        tracing::info!("cleared all data");
        Ok(())
    }
}
