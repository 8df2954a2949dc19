//! Report compilation
//!
//! Turns ledger and profile data into the time series and summary text that
//! the PDF renderer lays out. [`ReportInput::gather`] does all of the reading;
//! [`compile_report`] is pure.

pub mod pdf;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::CalorieLog;
use crate::metrics::{GoalStatus, KCAL_PER_KG};
use crate::models::UserProfile;
use crate::storage::Storage;
use crate::Result;

/// Raw ledger data needed to compile a report
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    /// Union of dates across intake, burned and weight logs
    pub dates: BTreeSet<NaiveDate>,
    pub intake: BTreeMap<NaiveDate, f64>,
    pub burned: BTreeMap<NaiveDate, f64>,
    /// `(date, kg)`, oldest first
    pub weights: Vec<(NaiveDate, f64)>,
}

impl ReportInput {
    /// Read everything a report needs from storage
    pub fn gather(storage: &dyn Storage) -> Result<Self> {
        let dates = storage.get_all_dates()?;
        let intake = CalorieLog::intake(storage).daily_totals(dates.iter().copied())?;
        let burned = CalorieLog::burned(storage).daily_totals(dates.iter().copied())?;
        let weights = storage.get_weight_entries()?;

        tracing::debug!(days = dates.len(), weights = weights.len(), "gathered report input");

        Ok(Self {
            dates,
            intake,
            burned,
            weights,
        })
    }
}

/// One day of the calorie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieRow {
    pub date: NaiveDate,
    pub days_since_start: i64,
    /// Intake minus burned
    pub net_calories: f64,
    /// Daily deficit the goal calls for; the same value on every row
    pub expected_daily_delta: f64,
}

/// One point of the weight chart, in display units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub days_since_start: i64,
    pub weight: f64,
}

/// Cumulative progress, weights in display units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementSummary {
    pub starting_weight: f64,
    pub latest_weight: f64,
    /// Starting minus latest; positive means weight was lost
    pub total_change: f64,
    pub days_to_goal: i64,
    pub goal_status: GoalStatus,
    pub weight_unit: &'static str,
}

/// Everything the renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub profile: UserProfile,
    pub calorie_series: Vec<CalorieRow>,
    pub weight_series: Vec<WeightPoint>,
    pub summary: AchievementSummary,
}

/// Expected daily calorie delta for the report: non-zero only with a goal and a rate
pub fn expected_daily_delta(profile: &UserProfile) -> f64 {
    match (profile.goal_weight_kg, profile.weekly_weight_change) {
        (Some(_), Some(rate)) if rate != 0.0 => KCAL_PER_KG * rate / 7.0,
        _ => 0.0,
    }
}

/// Build the report series and summary from gathered data
pub fn compile_report(profile: &UserProfile, input: &ReportInput) -> Report {
    let start = profile.start_date;
    let expected = expected_daily_delta(profile);
    let units = profile.units;

    let calorie_series = input
        .dates
        .iter()
        .map(|&date| {
            let intake = input.intake.get(&date).copied().unwrap_or(0.0);
            let burned = input.burned.get(&date).copied().unwrap_or(0.0);
            CalorieRow {
                date,
                days_since_start: (date - start).num_days(),
                net_calories: intake - burned,
                expected_daily_delta: expected,
            }
        })
        .collect();

    let weight_series = input
        .weights
        .iter()
        .map(|&(date, kg)| WeightPoint {
            date,
            days_since_start: (date - start).num_days(),
            weight: units.weight_from_kg(kg),
        })
        .collect();

    let starting_kg = input.weights.first().map_or(profile.weight_kg, |&(_, kg)| kg);
    let latest_kg = input.weights.last().map_or(profile.weight_kg, |&(_, kg)| kg);

    let starting_weight = units.weight_from_kg(starting_kg);
    let latest_weight = units.weight_from_kg(latest_kg);

    let summary = AchievementSummary {
        starting_weight,
        latest_weight,
        total_change: starting_weight - latest_weight,
        days_to_goal: profile.days_to_goal(Some(latest_kg)),
        goal_status: profile.goal_status(Some(latest_kg)),
        weight_unit: units.weight_unit(),
    };

    Report {
        profile: profile.clone(),
        calorie_series,
        weight_series,
        summary,
    }
}

impl Report {
    /// Title page lines describing the user
    pub fn profile_lines(&self) -> Vec<String> {
        let p = &self.profile;
        let u = p.units;
        let goal = match p.goal_weight_kg {
            Some(kg) => format!("{:.1} {}", u.weight_from_kg(kg), u.weight_unit()),
            None => "not set".to_string(),
        };
        let rate = match p.weekly_weight_change {
            Some(rate) if rate > 0.0 => {
                format!("lose {:.2} {}/week", u.weight_from_kg(rate), u.weight_unit())
            }
            Some(rate) if rate < 0.0 => {
                format!("gain {:.2} {}/week", u.weight_from_kg(-rate), u.weight_unit())
            }
            _ => "maintain".to_string(),
        };

        vec![
            format!("User: {}", p.name),
            format!("Age: {}", p.age),
            format!("Gender: {}", p.gender),
            format!("Height: {:.1} {}", u.height_from_cm(p.height_cm), u.height_unit()),
            format!("Starting Weight: {:.1} {}", u.weight_from_kg(p.weight_kg), u.weight_unit()),
            format!("Goal Weight: {}", goal),
            format!("Weekly Change: {}", rate),
            format!("Activity Level: {}", p.activity_level),
            format!("Start Date: {}", p.start_date),
        ]
    }

    /// Achievement summary as display text
    pub fn summary_lines(&self) -> Vec<String> {
        let s = &self.summary;
        let change = if s.total_change >= 0.0 {
            format!("Total Weight Lost: {:.1} {}", s.total_change, s.weight_unit)
        } else {
            format!("Total Weight Gained: {:.1} {}", -s.total_change, s.weight_unit)
        };

        let mut lines = vec![
            format!("Starting Weight: {:.1} {}", s.starting_weight, s.weight_unit),
            format!("Latest Weight: {:.1} {}", s.latest_weight, s.weight_unit),
            change,
        ];
        lines.push(match s.goal_status {
            GoalStatus::Reached => "Goal reached!".to_string(),
            GoalStatus::InProgress { days_remaining } => {
                format!("Projected Days to Goal: {}", days_remaining)
            }
            GoalStatus::NoGoal => "No active goal".to_string(),
            GoalStatus::Maintaining => "Maintaining, off goal weight".to_string(),
        });
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::profile::tests::sample_profile;
    use crate::units::UnitSystem;

    fn d(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, n).unwrap()
    }

    /// intake={d1:2000, d2:1800}, burned={d1:300}, weight=[(d1,80),(d3,78)], start=d1
    fn scenario() -> (UserProfile, ReportInput) {
        let mut profile = sample_profile();
        profile.start_date = d(1);

        let input = ReportInput {
            dates: [d(1), d(2), d(3)].into_iter().collect(),
            intake: [(d(1), 2000.0), (d(2), 1800.0)].into_iter().collect(),
            burned: [(d(1), 300.0)].into_iter().collect(),
            weights: vec![(d(1), 80.0), (d(3), 78.0)],
        };
        (profile, input)
    }

    #[test]
    fn test_calorie_series_nets_and_defaults() {
        let (profile, input) = scenario();
        let report = compile_report(&profile, &input);

        let rows = &report.calorie_series;
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].date, rows[0].days_since_start, rows[0].net_calories), (d(1), 0, 1700.0));
        assert_eq!((rows[1].date, rows[1].days_since_start, rows[1].net_calories), (d(2), 1, 1800.0));
        assert_eq!((rows[2].date, rows[2].net_calories), (d(3), 0.0));
    }

    #[test]
    fn test_weight_series_offsets() {
        let (profile, input) = scenario();
        let report = compile_report(&profile, &input);

        let points: Vec<_> = report
            .weight_series
            .iter()
            .map(|p| (p.date, p.days_since_start, p.weight))
            .collect();
        assert_eq!(points, vec![(d(1), 0, 80.0), (d(3), 2, 78.0)]);
    }

    #[test]
    fn test_days_before_start_are_negative() {
        let (mut profile, input) = scenario();
        profile.start_date = d(2);
        let report = compile_report(&profile, &input);
        assert_eq!(report.calorie_series[0].days_since_start, -1);
    }

    #[test]
    fn test_expected_delta_constant_only_with_goal() {
        let (mut profile, input) = scenario();
        let report = compile_report(&profile, &input);
        assert!(report.calorie_series.iter().all(|r| r.expected_daily_delta == 0.0));

        profile.goal_weight_kg = Some(70.0);
        profile.weekly_weight_change = Some(0.7);
        let report = compile_report(&profile, &input);
        assert!(report
            .calorie_series
            .iter()
            .all(|r| (r.expected_daily_delta - 770.0).abs() < 1e-9));
    }

    #[test]
    fn test_summary_uses_first_and_last_weights() {
        let (mut profile, input) = scenario();
        profile.goal_weight_kg = Some(70.0);
        profile.weekly_weight_change = Some(0.5);
        let report = compile_report(&profile, &input);

        let s = &report.summary;
        assert_eq!(s.starting_weight, 80.0);
        assert_eq!(s.latest_weight, 78.0);
        assert_eq!(s.total_change, 2.0);
        // (78 - 70) / 0.5 * 7
        assert_eq!(s.days_to_goal, 112);
        assert_eq!(s.goal_status, GoalStatus::InProgress { days_remaining: 112 });
    }

    #[test]
    fn test_summary_falls_back_to_profile_weight() {
        let profile = sample_profile();
        let report = compile_report(&profile, &ReportInput::default());

        assert!(report.calorie_series.is_empty());
        assert!(report.weight_series.is_empty());
        assert_eq!(report.summary.starting_weight, 80.0);
        assert_eq!(report.summary.latest_weight, 80.0);
        assert_eq!(report.summary.total_change, 0.0);
        assert_eq!(report.summary.goal_status, GoalStatus::NoGoal);
    }

    #[test]
    fn test_weights_converted_to_display_units() {
        let (mut profile, input) = scenario();
        profile.units = UnitSystem::Imperial;
        let report = compile_report(&profile, &input);

        assert!((report.weight_series[0].weight - 176.369_86).abs() < 1e-3);
        assert_eq!(report.summary.weight_unit, "lbs");
        assert!(report.summary_lines()[0].ends_with("lbs"));
    }

    #[test]
    fn test_gather_reads_all_three_logs() {
        let db = Database::open_in_memory().unwrap();
        db.save_calorie_intake(d(1), 2000.0).unwrap();
        db.save_calorie_intake(d(2), 1800.0).unwrap();
        db.save_calories_burned(d(1), 300.0).unwrap();
        db.save_weight_entry(d(1), 80.0).unwrap();
        db.save_weight_entry(d(3), 78.0).unwrap();

        let input = ReportInput::gather(&db).unwrap();
        let (profile, expected) = scenario();
        assert_eq!(input.dates, expected.dates);
        assert_eq!(input.weights, expected.weights);
        assert_eq!(
            compile_report(&profile, &input).calorie_series,
            compile_report(&profile, &expected).calorie_series
        );
    }

    #[test]
    fn test_profile_lines_show_goal() {
        let (mut profile, input) = scenario();
        profile.goal_weight_kg = Some(72.0);
        profile.weekly_weight_change = Some(-0.25);
        let lines = compile_report(&profile, &input).profile_lines();

        assert!(lines.contains(&"Goal Weight: 72.0 kg".to_string()));
        assert!(lines.contains(&"Weekly Change: gain 0.25 kg/week".to_string()));
    }
}
