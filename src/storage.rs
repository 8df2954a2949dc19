//! Storage interface
//!
//! The narrow persistence boundary the core is written against. Missing data
//! is never an error here: absent ledger days read as 0 and an absent profile
//! reads as `None`.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::UserProfile;
use crate::Result;

pub trait Storage {
    fn save_profile(&self, profile: &UserProfile) -> Result<()>;

    fn load_profile(&self) -> Result<Option<UserProfile>>;

    /// Adds to any intake already logged for `date`
    fn save_calorie_intake(&self, date: NaiveDate, calories: f64) -> Result<()>;

    fn get_calorie_intake(&self, date: NaiveDate) -> Result<f64>;

    /// Adds to any burned calories already logged for `date`
    fn save_calories_burned(&self, date: NaiveDate, calories: f64) -> Result<()>;

    fn get_calories_burned(&self, date: NaiveDate) -> Result<f64>;

    /// Replaces any weight already logged for `date`
    fn save_weight_entry(&self, date: NaiveDate, weight_kg: f64) -> Result<()>;

    /// `(date, weight_kg)` pairs, oldest first
    fn get_weight_entries(&self) -> Result<Vec<(NaiveDate, f64)>>;

    /// Every date present in the intake, burned or weight log
    fn get_all_dates(&self) -> Result<BTreeSet<NaiveDate>>;

    /// Irreversibly remove the profile and all three logs
    fn clear_all_data(&self) -> Result<()>;
}
