//! Entry Tools
//!
//! Logging calories eaten, calories burned and body weight.

use chrono::NaiveDate;
use serde::Serialize;

use super::{require_profile, round2};
use crate::error::Error;
use crate::ledger::CalorieLog;
use crate::metrics::GoalStatus;
use crate::storage::Storage;
use crate::Result;

/// Response for log_intake and log_burned
#[derive(Debug, Serialize)]
pub struct LogCaloriesResponse {
    pub date: String,
    pub kind: &'static str,
    pub logged: f64,
    /// Accumulated total for the date after this entry
    pub daily_total: f64,
}

/// Response for log_weight
#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub date: String,
    pub weight: f64,
    pub weight_unit: &'static str,
    pub days_to_goal: i64,
    pub goal_status: GoalStatus,
    pub estimated_goal_date: Option<String>,
}

fn log_calories(log: CalorieLog<'_>, date: NaiveDate, calories: f64) -> Result<LogCaloriesResponse> {
    log.log(date, calories)?;
    let daily_total = log.get_daily(date)?;

    Ok(LogCaloriesResponse {
        date: date.to_string(),
        kind: log.kind().display_name(),
        logged: calories,
        daily_total: round2(daily_total),
    })
}

/// Add calories eaten on `date`
pub fn log_intake(storage: &dyn Storage, date: NaiveDate, calories: f64) -> Result<LogCaloriesResponse> {
    log_calories(CalorieLog::intake(storage), date, calories)
}

/// Add calories burned on `date`
pub fn log_burned(storage: &dyn Storage, date: NaiveDate, calories: f64) -> Result<LogCaloriesResponse> {
    log_calories(CalorieLog::burned(storage), date, calories)
}

/// Record the weight for `date` in display units, replacing any earlier
/// entry for that date, and project the goal from it
pub fn log_weight(
    storage: &dyn Storage,
    date: NaiveDate,
    weight: f64,
    today: NaiveDate,
) -> Result<LogWeightResponse> {
    if !(weight.is_finite() && weight > 0.0) {
        return Err(Error::InvalidAmount(weight));
    }

    let profile = require_profile(storage)?;
    let u = profile.units;
    let weight_kg = u.weight_to_kg(weight);

    storage.save_weight_entry(date, weight_kg)?;
    tracing::info!(%date, weight_kg, "logged weight");

    Ok(LogWeightResponse {
        date: date.to_string(),
        weight: round2(weight),
        weight_unit: u.weight_unit(),
        days_to_goal: profile.days_to_goal(Some(weight_kg)),
        goal_status: profile.goal_status(Some(weight_kg)),
        estimated_goal_date: profile
            .estimated_goal_date(Some(weight_kg), today)
            .map(|d| d.to_string()),
    })
}
