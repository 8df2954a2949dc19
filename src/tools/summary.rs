//! Summary Tools
//!
//! Daily calorie balance and goal progress.

use chrono::NaiveDate;
use serde::Serialize;

use super::{latest_weight_kg, require_profile, round2};
use crate::ledger::CalorieLog;
use crate::metrics::GoalStatus;
use crate::storage::Storage;
use crate::Result;

/// Response for daily_summary
#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: String,
    /// False when neither intake nor burned calories were logged
    pub has_entries: bool,
    pub intake: f64,
    pub burned: f64,
    pub net_calories: f64,
    pub recommended_calorie_intake: f64,
    /// |net - recommended|
    pub difference: f64,
    /// Net calories above the recommendation
    pub exceeded: bool,
}

/// Response for goal_progress
#[derive(Debug, Serialize)]
pub struct GoalProgressResponse {
    pub current_weight: f64,
    pub goal_weight: Option<f64>,
    pub weight_unit: &'static str,
    pub days_to_goal: i64,
    pub estimated_goal_date: Option<String>,
    pub goal_status: GoalStatus,
}

/// Intake, burned and net calories for `date` against the recommendation
pub fn daily_summary(storage: &dyn Storage, date: NaiveDate) -> Result<DailySummaryResponse> {
    let profile = require_profile(storage)?;

    let intake = CalorieLog::intake(storage).get_daily(date)?;
    let burned = CalorieLog::burned(storage).get_daily(date)?;
    let net = intake - burned;
    let recommended = profile.recommended_calorie_intake(None);

    Ok(DailySummaryResponse {
        date: date.to_string(),
        has_entries: intake != 0.0 || burned != 0.0,
        intake: round2(intake),
        burned: round2(burned),
        net_calories: round2(net),
        recommended_calorie_intake: round2(recommended),
        difference: round2((net - recommended).abs()),
        exceeded: net > recommended,
    })
}

/// Goal projection from the latest logged weight
pub fn goal_progress(storage: &dyn Storage, today: NaiveDate) -> Result<GoalProgressResponse> {
    let profile = require_profile(storage)?;
    let current_kg = latest_weight_kg(storage, &profile)?;
    let u = profile.units;

    Ok(GoalProgressResponse {
        current_weight: round2(u.weight_from_kg(current_kg)),
        goal_weight: profile.goal_weight_kg.map(|kg| round2(u.weight_from_kg(kg))),
        weight_unit: u.weight_unit(),
        days_to_goal: profile.days_to_goal(Some(current_kg)),
        estimated_goal_date: profile
            .estimated_goal_date(Some(current_kg), today)
            .map(|d| d.to_string()),
        goal_status: profile.goal_status(Some(current_kg)),
    })
}
