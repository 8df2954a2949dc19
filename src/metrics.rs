//! Health metrics and goal tracking
//!
//! BMI, BMR (Mifflin-St Jeor), TDEE, recommended intake and goal projection,
//! all derived from a `UserProfile`. Every function here is pure; callers
//! persist the profile after mutating it.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::models::{Gender, UserProfile};

/// Energy in one kilogram of body mass
pub const KCAL_PER_KG: f64 = 7700.0;

/// Fastest weekly loss a goal may request, in kg
pub const MAX_WEEKLY_LOSS_KG: f64 = 1.0;

/// Fastest weekly gain a goal may request, in kg
pub const MAX_WEEKLY_GAIN_KG: f64 = 0.5;

/// Lower BMI bound of the healthy range
pub const HEALTHY_BMI_MIN: f64 = 18.5;

/// Upper BMI bound of the healthy range
pub const HEALTHY_BMI_MAX: f64 = 24.9;

/// Weights closer than this are treated as equal (absorbs lbs/kg round trips)
pub const WEIGHT_EPSILON_KG: f64 = 1e-6;

/// Direction of a weight goal relative to the current weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalDirection {
    Lose,
    Gain,
    Maintain,
}

/// What `set_weight_loss_goal` actually applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalAdjustment {
    pub direction: GoalDirection,
    /// Requested weekly change, kg
    pub requested_kg: f64,
    /// Weekly change after clamping, kg (magnitude)
    pub applied_kg: f64,
    pub clamped: bool,
}

/// Where the user stands relative to their goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalStatus {
    /// No goal weight set
    NoGoal,
    InProgress { days_remaining: i64 },
    /// Maintenance goal (zero rate) with the weight away from the goal
    Maintaining,
    Reached,
}

impl GoalStatus {
    pub fn describe(&self) -> String {
        match self {
            GoalStatus::NoGoal => "No active goal".to_string(),
            GoalStatus::InProgress { days_remaining } => {
                format!("{} days to goal", days_remaining)
            }
            GoalStatus::Maintaining => "Maintaining, off goal weight".to_string(),
            GoalStatus::Reached => "Goal reached".to_string(),
        }
    }
}

impl UserProfile {
    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }

    /// BMI for `weight` (kg), defaulting to the stored weight
    pub fn calculate_bmi(&self, weight: Option<f64>) -> f64 {
        let weight = weight.unwrap_or(self.weight_kg);
        weight / self.height_m().powi(2)
    }

    /// `(min_kg, max_kg)` for a BMI between 18.5 and 24.9
    pub fn healthy_weight_range(&self) -> (f64, f64) {
        let h2 = self.height_m().powi(2);
        (HEALTHY_BMI_MIN * h2, HEALTHY_BMI_MAX * h2)
    }

    /// Basal metabolic rate (Mifflin-St Jeor)
    pub fn calculate_bmr(&self, weight: Option<f64>) -> f64 {
        let weight = weight.unwrap_or(self.weight_kg);
        let base = 10.0 * weight + 6.25 * self.height_cm - 5.0 * self.age as f64;
        match self.gender {
            Gender::Male => base + 5.0,
            Gender::Female => base - 161.0,
        }
    }

    /// Total daily energy expenditure
    pub fn calculate_tdee(&self, weight: Option<f64>) -> f64 {
        self.calculate_bmr(weight) * self.activity_level.multiplier()
    }

    /// Daily deficit (positive) or surplus (negative) implied by the weekly change
    pub fn daily_calorie_adjustment(&self) -> f64 {
        match self.weekly_weight_change {
            Some(rate) if rate != 0.0 => KCAL_PER_KG * rate / 7.0,
            _ => 0.0,
        }
    }

    /// TDEE minus the goal's daily deficit; plain TDEE when maintaining
    pub fn recommended_calorie_intake(&self, weight: Option<f64>) -> f64 {
        self.calculate_tdee(weight) - self.daily_calorie_adjustment()
    }

    /// Set a goal starting today. See [`UserProfile::set_weight_loss_goal_on`].
    pub fn set_weight_loss_goal(&mut self, goal_weight_kg: f64, weekly_change_kg: f64) -> GoalAdjustment {
        self.set_weight_loss_goal_on(goal_weight_kg, weekly_change_kg, Local::now().date_naive())
    }

    /// Set the goal from the stored weight. See [`UserProfile::set_weight_loss_goal_from`].
    pub fn set_weight_loss_goal_on(
        &mut self,
        goal_weight_kg: f64,
        weekly_change_kg: f64,
        today: NaiveDate,
    ) -> GoalAdjustment {
        self.set_weight_loss_goal_from(goal_weight_kg, weekly_change_kg, self.weight_kg, today)
    }

    /// Set the goal weight and weekly rate, clamping the rate to safe limits.
    ///
    /// The direction is decided by `current_kg` against the goal. The requested
    /// rate is read as a magnitude. Losing is capped at 1.0 kg/week and gaining
    /// at 0.5 kg/week; a goal equal to `current_kg` forces maintenance. Only
    /// the goal fields change: the stored rate is signed (positive while
    /// losing), `start_date` restarts at `today` and `weight_kg` is untouched.
    pub fn set_weight_loss_goal_from(
        &mut self,
        goal_weight_kg: f64,
        weekly_change_kg: f64,
        current_kg: f64,
        today: NaiveDate,
    ) -> GoalAdjustment {
        let requested = weekly_change_kg.abs();
        let diff = current_kg - goal_weight_kg;

        let (direction, limit) = if diff.abs() < WEIGHT_EPSILON_KG {
            (GoalDirection::Maintain, 0.0)
        } else if diff > 0.0 {
            (GoalDirection::Lose, MAX_WEEKLY_LOSS_KG)
        } else {
            (GoalDirection::Gain, MAX_WEEKLY_GAIN_KG)
        };

        let applied = requested.min(limit);
        let clamped = direction != GoalDirection::Maintain && requested > limit;
        if clamped {
            tracing::warn!(
                requested = requested,
                limit = limit,
                "weekly weight change exceeds safe limit, clamping"
            );
        }

        self.weekly_weight_change = Some(match direction {
            GoalDirection::Lose => applied,
            GoalDirection::Gain => -applied,
            GoalDirection::Maintain => 0.0,
        });
        self.goal_weight_kg = Some(goal_weight_kg);
        self.start_date = today;

        GoalAdjustment {
            direction,
            requested_kg: requested,
            applied_kg: applied,
            clamped,
        }
    }

    /// Whole days until the goal at the current rate, from `current` kg
    /// (default: stored weight). Zero when there is no rate to project with.
    pub fn days_to_goal(&self, current: Option<f64>) -> i64 {
        let (goal, rate) = match (self.goal_weight_kg, self.weekly_weight_change) {
            (Some(goal), Some(rate)) if rate != 0.0 => (goal, rate),
            _ => return 0,
        };
        let current = current.unwrap_or(self.weight_kg);
        let weeks = (current - goal).abs() / rate.abs();
        (weeks * 7.0).floor() as i64
    }

    /// Goal status for a weight in kg (default: stored weight)
    pub fn goal_status(&self, current: Option<f64>) -> GoalStatus {
        let goal = match self.goal_weight_kg {
            Some(goal) => goal,
            None => return GoalStatus::NoGoal,
        };
        let current = current.unwrap_or(self.weight_kg);

        if (current - goal).abs() < WEIGHT_EPSILON_KG {
            return GoalStatus::Reached;
        }

        match self.weekly_weight_change {
            Some(rate) if rate > 0.0 && current <= goal => GoalStatus::Reached,
            Some(rate) if rate < 0.0 && current >= goal => GoalStatus::Reached,
            Some(rate) if rate != 0.0 => GoalStatus::InProgress {
                days_remaining: self.days_to_goal(Some(current)),
            },
            _ => GoalStatus::Maintaining,
        }
    }

    /// Projected goal date, only while a goal is in progress
    pub fn estimated_goal_date(&self, current: Option<f64>, today: NaiveDate) -> Option<NaiveDate> {
        match self.goal_status(current) {
            GoalStatus::InProgress { days_remaining } => {
                today.checked_add_days(Days::new(days_remaining.max(0) as u64))
            }
            _ => None,
        }
    }
}
