//! Profile Tools
//!
//! Creating, inspecting and updating the single user profile, and goal setting.

use chrono::NaiveDate;
use serde::Serialize;

use super::{latest_weight_kg, require_profile, round2};
use crate::error::Error;
use crate::metrics::{GoalAdjustment, GoalDirection, GoalStatus};
use crate::models::{ActivityLevel, Gender, ProfileCreate, UserProfile};
use crate::storage::Storage;
use crate::units::UnitSystem;
use crate::Result;

/// Profile data as entered, with height and weight in `units`
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub units: UnitSystem,
    pub height: f64,
    pub weight: f64,
    pub activity_level: ActivityLevel,
}

/// Fields that may change after creation; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
    pub units: Option<UnitSystem>,
}

/// Profile in the user's display units
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub units: String,
    pub height: f64,
    pub height_unit: &'static str,
    pub weight: f64,
    pub weight_unit: &'static str,
    pub activity_level: String,
    pub goal_weight: Option<f64>,
    /// Positive while losing, negative while gaining
    pub weekly_weight_change: Option<f64>,
    pub start_date: String,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(p: &UserProfile) -> Self {
        let u = p.units;
        Self {
            name: p.name.clone(),
            age: p.age,
            gender: p.gender.as_str().to_string(),
            units: u.as_str().to_string(),
            height: round2(u.height_from_cm(p.height_cm)),
            height_unit: u.height_unit(),
            weight: round2(u.weight_from_kg(p.weight_kg)),
            weight_unit: u.weight_unit(),
            activity_level: p.activity_level.as_str().to_string(),
            goal_weight: p.goal_weight_kg.map(|kg| round2(u.weight_from_kg(kg))),
            weekly_weight_change: p.weekly_weight_change.map(|kg| round2(u.weight_from_kg(kg))),
            start_date: p.start_date.to_string(),
        }
    }
}

/// Response for get_overview
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub profile: ProfileResponse,
    pub current_weight: f64,
    pub bmi: f64,
    pub healthy_weight_min: f64,
    pub healthy_weight_max: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub recommended_calorie_intake: f64,
    pub goal_status: GoalStatus,
    pub estimated_goal_date: Option<String>,
}

/// Response for set_goal
#[derive(Debug, Serialize)]
pub struct SetGoalResponse {
    pub direction: GoalDirection,
    pub goal_weight: f64,
    pub current_weight: f64,
    pub weight_unit: &'static str,
    pub requested_weekly_change: f64,
    pub applied_weekly_change: f64,
    pub max_weekly_change: f64,
    pub clamped: bool,
    pub recommended_calorie_intake: f64,
    pub days_to_goal: i64,
    pub estimated_goal_date: Option<String>,
}

/// Response for reset_all_data
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Create the profile. Fails if one already exists.
pub fn create_profile(
    storage: &dyn Storage,
    input: ProfileInput,
    today: NaiveDate,
) -> Result<ProfileResponse> {
    if storage.load_profile()?.is_some() {
        return Err(Error::ProfileExists);
    }

    let data = ProfileCreate {
        name: input.name.trim().to_string(),
        age: input.age,
        gender: input.gender,
        units: input.units,
        height_cm: input.units.height_to_cm(input.height),
        weight_kg: input.units.weight_to_kg(input.weight),
        activity_level: input.activity_level,
    };

    let profile = UserProfile::new(data, today)?;
    storage.save_profile(&profile)?;

    Ok(ProfileResponse::from(&profile))
}

/// Health metrics and goal outlook as of `today`
pub fn get_overview(storage: &dyn Storage, today: NaiveDate) -> Result<OverviewResponse> {
    let profile = require_profile(storage)?;
    let current_kg = latest_weight_kg(storage, &profile)?;
    let u = profile.units;
    let (min_kg, max_kg) = profile.healthy_weight_range();

    Ok(OverviewResponse {
        current_weight: round2(u.weight_from_kg(current_kg)),
        bmi: round2(profile.calculate_bmi(Some(current_kg))),
        healthy_weight_min: round2(u.weight_from_kg(min_kg)),
        healthy_weight_max: round2(u.weight_from_kg(max_kg)),
        bmr: round2(profile.calculate_bmr(None)),
        tdee: round2(profile.calculate_tdee(None)),
        recommended_calorie_intake: round2(profile.recommended_calorie_intake(None)),
        goal_status: profile.goal_status(Some(current_kg)),
        estimated_goal_date: profile
            .estimated_goal_date(Some(current_kg), today)
            .map(|d| d.to_string()),
        profile: ProfileResponse::from(&profile),
    })
}

/// Set the goal weight and weekly rate, both in display units.
///
/// The goal direction and projection start from the latest logged weight;
/// the stored starting weight is left as entered at creation.
pub fn set_goal(
    storage: &dyn Storage,
    goal_weight: f64,
    weekly_change: f64,
    today: NaiveDate,
) -> Result<SetGoalResponse> {
    if !(goal_weight.is_finite() && goal_weight > 0.0) {
        return Err(Error::InvalidProfile("goal weight must be greater than 0".into()));
    }
    if !weekly_change.is_finite() {
        return Err(Error::InvalidAmount(weekly_change));
    }

    let mut profile = require_profile(storage)?;
    let u = profile.units;
    let current_kg = latest_weight_kg(storage, &profile)?;

    let adjustment = profile.set_weight_loss_goal_from(
        u.weight_to_kg(goal_weight),
        u.weight_to_kg(weekly_change),
        current_kg,
        today,
    );
    storage.save_profile(&profile)?;

    Ok(goal_response(&profile, adjustment, current_kg, today))
}

fn goal_response(
    profile: &UserProfile,
    adjustment: GoalAdjustment,
    current_kg: f64,
    today: NaiveDate,
) -> SetGoalResponse {
    let u = profile.units;
    let max_kg = match adjustment.direction {
        GoalDirection::Lose => crate::metrics::MAX_WEEKLY_LOSS_KG,
        GoalDirection::Gain => crate::metrics::MAX_WEEKLY_GAIN_KG,
        GoalDirection::Maintain => 0.0,
    };

    SetGoalResponse {
        direction: adjustment.direction,
        goal_weight: round2(u.weight_from_kg(profile.goal_weight_kg.unwrap_or(current_kg))),
        current_weight: round2(u.weight_from_kg(current_kg)),
        weight_unit: u.weight_unit(),
        requested_weekly_change: round2(u.weight_from_kg(adjustment.requested_kg)),
        applied_weekly_change: round2(u.weight_from_kg(adjustment.applied_kg)),
        max_weekly_change: round2(u.weight_from_kg(max_kg)),
        clamped: adjustment.clamped,
        recommended_calorie_intake: round2(profile.recommended_calorie_intake(None)),
        days_to_goal: profile.days_to_goal(Some(current_kg)),
        estimated_goal_date: profile
            .estimated_goal_date(Some(current_kg), today)
            .map(|d| d.to_string()),
    }
}

/// Change name, age, activity level or display units
pub fn update_profile(storage: &dyn Storage, update: ProfileUpdate) -> Result<ProfileResponse> {
    let mut profile = require_profile(storage)?;

    if let Some(name) = update.name {
        profile.name = name.trim().to_string();
    }
    if let Some(age) = update.age {
        profile.age = age;
    }
    if let Some(level) = update.activity_level {
        profile.activity_level = level;
    }
    if let Some(units) = update.units {
        profile.units = units;
    }

    profile.validate()?;
    storage.save_profile(&profile)?;

    Ok(ProfileResponse::from(&profile))
}

/// Irreversibly delete the profile and every log
pub fn reset_all_data(storage: &dyn Storage) -> Result<ResetResponse> {
    storage.clear_all_data()?;
    Ok(ResetResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::units::lbs_to_kg;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn metric_input() -> ProfileInput {
        ProfileInput {
            name: "Alex Doe".into(),
            age: 30,
            gender: Gender::Male,
            units: UnitSystem::Metric,
            height: 180.0,
            weight: 80.0,
            activity_level: ActivityLevel::Sedentary,
        }
    }

    #[test]
    fn test_create_profile_converts_imperial_inputs() {
        let db = Database::open_in_memory().unwrap();
        let input = ProfileInput {
            units: UnitSystem::Imperial,
            height: 70.0,
            weight: 180.0,
            ..metric_input()
        };

        let response = create_profile(&db, input, today()).unwrap();
        assert_eq!(response.weight, 180.0);
        assert_eq!(response.weight_unit, "lbs");

        let stored = db.load_profile().unwrap().unwrap();
        assert!((stored.weight_kg - lbs_to_kg(180.0)).abs() < 1e-9);
        assert!((stored.height_cm - 177.8).abs() < 1e-9);
        assert_eq!(stored.start_date, today());
        assert_eq!(stored.goal_weight_kg, None);
    }

    #[test]
    fn test_create_profile_refuses_overwrite() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();
        let again = create_profile(&db, metric_input(), today());
        assert!(matches!(again, Err(Error::ProfileExists)));
    }

    #[test]
    fn test_create_profile_rejects_invalid_values() {
        let db = Database::open_in_memory().unwrap();
        let input = ProfileInput {
            height: 0.0,
            ..metric_input()
        };
        assert!(matches!(
            create_profile(&db, input, today()),
            Err(Error::InvalidProfile(_))
        ));
        assert!(db.load_profile().unwrap().is_none());
    }

    #[test]
    fn test_overview_without_goal() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();

        let overview = get_overview(&db, today()).unwrap();
        assert_eq!(overview.bmi, 24.69);
        assert_eq!(overview.healthy_weight_min, 59.94);
        assert_eq!(overview.healthy_weight_max, 80.68);
        // 10*80 + 6.25*180 - 5*30 + 5 = 1780, sedentary
        assert_eq!(overview.bmr, 1780.0);
        assert_eq!(overview.recommended_calorie_intake, 2136.0);
        assert_eq!(overview.goal_status, GoalStatus::NoGoal);
        assert_eq!(overview.estimated_goal_date, None);
    }

    #[test]
    fn test_overview_requires_profile() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(get_overview(&db, today()), Err(Error::ProfileMissing)));
    }

    #[test]
    fn test_set_goal_clamps_and_persists() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();

        let response = set_goal(&db, 70.0, 2.0, today()).unwrap();
        assert_eq!(response.direction, GoalDirection::Lose);
        assert!(response.clamped);
        assert_eq!(response.applied_weekly_change, 1.0);
        assert_eq!(response.days_to_goal, 70);
        assert_eq!(response.estimated_goal_date.as_deref(), Some("2024-11-10"));

        let stored = db.load_profile().unwrap().unwrap();
        assert_eq!(stored.goal_weight_kg, Some(70.0));
        assert_eq!(stored.weekly_weight_change, Some(1.0));
    }

    #[test]
    fn test_set_goal_gain_is_signed_negative() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();

        let response = set_goal(&db, 85.0, 1.0, today()).unwrap();
        assert_eq!(response.direction, GoalDirection::Gain);
        assert_eq!(response.applied_weekly_change, 0.5);

        let stored = db.load_profile().unwrap().unwrap();
        assert_eq!(stored.weekly_weight_change, Some(-0.5));
        assert!(stored.recommended_calorie_intake(None) > stored.calculate_tdee(None));
    }

    #[test]
    fn test_set_goal_starts_from_latest_logged_weight() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();
        db.save_weight_entry(today(), 75.0).unwrap();

        let response = set_goal(&db, 75.0, 0.5, today()).unwrap();
        assert_eq!(response.direction, GoalDirection::Maintain);
        assert_eq!(response.current_weight, 75.0);
        assert_eq!(response.days_to_goal, 0);

        let stored = db.load_profile().unwrap().unwrap();
        assert_eq!(stored.weight_kg, 80.0);
        assert_eq!(stored.weekly_weight_change, Some(0.0));
    }

    #[test]
    fn test_set_goal_after_weight_log_keeps_starting_weight() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();
        crate::tools::entries::log_weight(&db, today(), 75.0, today()).unwrap();

        let response = set_goal(&db, 70.0, 0.5, today()).unwrap();
        assert_eq!(response.direction, GoalDirection::Lose);
        assert_eq!(response.current_weight, 75.0);
        // (75 - 70) / 0.5 weeks
        assert_eq!(response.days_to_goal, 70);

        let stored = db.load_profile().unwrap().unwrap();
        assert_eq!(stored.weight_kg, 80.0);
        assert_eq!(stored.goal_weight_kg, Some(70.0));
        // recommendation still based on the starting weight
        assert_eq!(response.recommended_calorie_intake, 2136.0 - 550.0);
    }

    #[test]
    fn test_set_goal_rejects_non_positive_goal() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();
        assert!(set_goal(&db, 0.0, 0.5, today()).is_err());
        assert!(set_goal(&db, 70.0, f64::NAN, today()).is_err());
    }

    #[test]
    fn test_update_profile_changes_only_given_fields() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();

        let response = update_profile(
            &db,
            ProfileUpdate {
                activity_level: Some(ActivityLevel::VeryActive),
                units: Some(UnitSystem::Imperial),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.name, "Alex Doe");
        assert_eq!(response.activity_level, "very active");
        assert_eq!(response.weight_unit, "lbs");

        let stored = db.load_profile().unwrap().unwrap();
        assert_eq!(stored.weight_kg, 80.0);
        assert_eq!(stored.activity_level, ActivityLevel::VeryActive);
    }

    #[test]
    fn test_update_profile_validates() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();
        let result = update_profile(
            &db,
            ProfileUpdate {
                name: Some("   ".into()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(db.load_profile().unwrap().unwrap().name, "Alex Doe");
    }

    #[test]
    fn test_reset_all_data() {
        let db = Database::open_in_memory().unwrap();
        create_profile(&db, metric_input(), today()).unwrap();
        db.save_calorie_intake(today(), 1200.0).unwrap();

        assert!(reset_all_data(&db).unwrap().success);
        assert!(db.load_profile().unwrap().is_none());
        assert_eq!(db.get_calorie_intake(today()).unwrap(), 0.0);
    }
}
