//! Calorie intake and calories-burned ledgers
//!
//! Thin wrappers over [`Storage`] for the two parallel daily series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::Error;
use crate::models::LedgerKind;
use crate::storage::Storage;
use crate::Result;

/// A date-keyed, accumulating calorie series
#[derive(Clone, Copy)]
pub struct CalorieLog<'a> {
    storage: &'a dyn Storage,
    kind: LedgerKind,
}

impl<'a> CalorieLog<'a> {
    pub fn intake(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            kind: LedgerKind::Intake,
        }
    }

    pub fn burned(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            kind: LedgerKind::Burned,
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    /// Add `calories` to the total for `date`
    pub fn log(&self, date: NaiveDate, calories: f64) -> Result<()> {
        if !calories.is_finite() || calories < 0.0 {
            return Err(Error::InvalidAmount(calories));
        }

        match self.kind {
            LedgerKind::Intake => self.storage.save_calorie_intake(date, calories)?,
            LedgerKind::Burned => self.storage.save_calories_burned(date, calories)?,
        }
        tracing::info!(%date, calories, "logged {}", self.kind.display_name());
        Ok(())
    }

    /// Accumulated calories for `date`, 0 when nothing was logged
    pub fn get_daily(&self, date: NaiveDate) -> Result<f64> {
        let value = match self.kind {
            LedgerKind::Intake => self.storage.get_calorie_intake(date)?,
            LedgerKind::Burned => self.storage.get_calories_burned(date)?,
        };
        tracing::debug!(%date, value, "read {}", self.kind.display_name());
        Ok(value)
    }

    /// Daily totals for each of `dates`, including zero days
    pub fn daily_totals<I>(&self, dates: I) -> Result<BTreeMap<NaiveDate, f64>>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates
            .into_iter()
            .map(|date| Ok((date, self.get_daily(date)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_logging_twice_accumulates() {
        let db = Database::open_in_memory().unwrap();
        let intake = CalorieLog::intake(&db);
        intake.log(day(1), 500.0).unwrap();
        intake.log(day(1), 300.0).unwrap();
        assert_eq!(intake.get_daily(day(1)).unwrap(), 800.0);
    }

    #[test]
    fn test_missing_day_is_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(CalorieLog::burned(&db).get_daily(day(4)).unwrap(), 0.0);
    }

    #[test]
    fn test_intake_and_burned_are_separate() {
        let db = Database::open_in_memory().unwrap();
        CalorieLog::intake(&db).log(day(2), 2000.0).unwrap();
        CalorieLog::burned(&db).log(day(2), 450.0).unwrap();

        assert_eq!(CalorieLog::intake(&db).get_daily(day(2)).unwrap(), 2000.0);
        assert_eq!(CalorieLog::burned(&db).get_daily(day(2)).unwrap(), 450.0);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        let db = Database::open_in_memory().unwrap();
        let burned = CalorieLog::burned(&db);
        assert!(matches!(burned.log(day(1), -5.0), Err(Error::InvalidAmount(_))));
        assert!(burned.log(day(1), f64::NAN).is_err());
        assert_eq!(burned.get_daily(day(1)).unwrap(), 0.0);
    }

    #[test]
    fn test_daily_totals_include_zero_days() {
        let db = Database::open_in_memory().unwrap();
        let intake = CalorieLog::intake(&db);
        intake.log(day(1), 1500.0).unwrap();

        let totals = intake.daily_totals([day(1), day(2)]).unwrap();
        assert_eq!(totals.get(&day(1)), Some(&1500.0));
        assert_eq!(totals.get(&day(2)), Some(&0.0));
    }
}
