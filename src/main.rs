//! DietMaster
//!
//! Command-line diet and activity tracker.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dietmaster::db::Database;
use dietmaster::metrics::{GoalDirection, GoalStatus};
use dietmaster::models::{ActivityLevel, Gender};
use dietmaster::storage::Storage;
use dietmaster::tools::{entries, profile, reports, summary};
use dietmaster::units::UnitSystem;
use dietmaster::{build_info, config, Error, Result};

#[derive(Parser)]
#[command(name = "dietmaster")]
#[command(about = "Personal diet and activity tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (overrides DIETMASTER_DATABASE_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your profile
    Init {
        #[arg(long)]
        name: String,

        #[arg(long)]
        age: u32,

        /// male or female
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,

        /// metric (cm, kg) or imperial (in, lbs)
        #[arg(long, default_value = "metric", value_parser = parse_units)]
        units: UnitSystem,

        /// Height in cm (metric) or inches (imperial)
        #[arg(long)]
        height: f64,

        /// Weight in kg (metric) or lbs (imperial)
        #[arg(long)]
        weight: f64,

        /// sedentary, lightly active, moderately active, very active, extra active
        #[arg(long, default_value = "sedentary", value_parser = parse_activity)]
        activity: ActivityLevel,
    },

    /// Set goal weight and weekly rate of change
    Goal {
        /// Goal weight in your units
        goal_weight: f64,

        /// Desired weekly change in your units (clamped to a safe maximum)
        #[arg(long)]
        weekly: f64,
    },

    /// Update personal information
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long, value_parser = parse_activity)]
        activity: Option<ActivityLevel>,

        #[arg(long, value_parser = parse_units)]
        units: Option<UnitSystem>,
    },

    /// Log calories eaten
    Intake {
        #[arg(allow_negative_numbers = true)]
        calories: f64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log calories burned
    Burned {
        #[arg(allow_negative_numbers = true)]
        calories: f64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log body weight in your units
    Weight {
        #[arg(allow_negative_numbers = true)]
        weight: f64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the calorie summary for a day
    Summary {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Check days to reach your goal
    Progress,

    /// Show BMI, healthy weight range and recommended intake
    Overview,

    /// Generate the PDF progress report
    Report {
        /// Output file (overrides DIETMASTER_REPORT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete the profile and all logged data
    Reset {
        /// Confirm the reset; it cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Show version and build information
    Version,
}

fn parse_gender(s: &str) -> std::result::Result<Gender, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_units(s: &str) -> std::result::Result<UnitSystem, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_activity(s: &str) -> std::result::Result<ActivityLevel, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn main() -> ExitCode {
    // Logging goes to stderr so stdout carries only command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dietmaster=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        build_info::print_banner();
        return Ok(());
    }
    if let Commands::Reset { yes: false } = cli.command {
        eprintln!("Reset deletes all data and cannot be undone. Re-run with --yes to confirm.");
        return Ok(());
    }

    let db_path = cli.db.unwrap_or_else(config::database_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::open(&db_path)?;
    tracing::debug!(path = %db_path.display(), "database opened");

    let result = dispatch(&database, cli.command, cli.json);
    database.close();
    result
}

fn dispatch(storage: &dyn Storage, command: Commands, json: bool) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Commands::Init {
            name,
            age,
            gender,
            units,
            height,
            weight,
            activity,
        } => {
            let input = profile::ProfileInput {
                name,
                age,
                gender,
                units,
                height,
                weight,
                activity_level: activity,
            };
            let response = profile::create_profile(storage, input, today)?;
            emit(json, &response, |r| {
                println!("Welcome, {}! Your profile has been created.", r.name);
                println!("Set a goal with `dietmaster goal <weight> --weekly <rate>`.");
            })
        }
        Commands::Goal { goal_weight, weekly } => {
            let response = profile::set_goal(storage, goal_weight, weekly, today)?;
            emit(json, &response, |r| {
                let unit = r.weight_unit;
                match r.direction {
                    GoalDirection::Lose => println!("You need to lose weight to reach your goal."),
                    GoalDirection::Gain => println!("You need to gain weight to reach your goal."),
                    GoalDirection::Maintain => println!("You are already at your goal weight!"),
                }
                if r.clamped {
                    println!(
                        "Weekly change should not exceed {:.1} {}. Setting to the maximum allowed.",
                        r.max_weekly_change, unit
                    );
                }
                println!(
                    "Goal: {:.1} {} at {:.2} {}/week",
                    r.goal_weight, unit, r.applied_weekly_change, unit
                );
                println!(
                    "Recommended daily caloric intake: {:.2} calories",
                    r.recommended_calorie_intake
                );
                print_projection(r.days_to_goal, r.estimated_goal_date.as_deref());
            })
        }
        Commands::Update {
            name,
            age,
            activity,
            units,
        } => {
            let update = profile::ProfileUpdate {
                name,
                age,
                activity_level: activity,
                units,
            };
            profile::update_profile(storage, update)?;
            let overview = profile::get_overview(storage, today)?;
            emit(json, &overview, |o| {
                println!("Profile updated.");
                println!(
                    "Your new recommended daily caloric intake is: {:.2} calories.",
                    o.recommended_calorie_intake
                );
            })
        }
        Commands::Intake { calories, date } => {
            let response = entries::log_intake(storage, date.unwrap_or(today), calories)?;
            emit(json, &response, print_logged)
        }
        Commands::Burned { calories, date } => {
            let response = entries::log_burned(storage, date.unwrap_or(today), calories)?;
            emit(json, &response, print_logged)
        }
        Commands::Weight { weight, date } => {
            let response = entries::log_weight(storage, date.unwrap_or(today), weight, today)?;
            emit(json, &response, |r| {
                println!("Logged weight {:.1} {} on {}.", r.weight, r.weight_unit, r.date);
                print_status(r.goal_status, r.estimated_goal_date.as_deref());
            })
        }
        Commands::Summary { date } => {
            let response = summary::daily_summary(storage, date.unwrap_or(today))?;
            emit(json, &response, |s| {
                if !s.has_entries {
                    println!("You did not enter any calories for {}.", s.date);
                    return;
                }
                println!("Summary for {}:", s.date);
                println!("Calories intake: {:.2}", s.intake);
                println!("Calories burned: {:.2}", s.burned);
                println!("Net calories for the day: {:.2}", s.net_calories);
                println!("Recommended daily caloric intake: {:.2}", s.recommended_calorie_intake);
                if s.exceeded {
                    println!("You have exceeded your recommended caloric intake by {:.2}.", s.difference);
                } else {
                    println!("You are within your recommended caloric intake by {:.2}.", s.difference);
                }
            })
        }
        Commands::Progress => {
            let response = summary::goal_progress(storage, today)?;
            emit(json, &response, |p| {
                println!("Current weight: {:.1} {}", p.current_weight, p.weight_unit);
                print_status(p.goal_status, p.estimated_goal_date.as_deref());
            })
        }
        Commands::Overview => {
            let response = profile::get_overview(storage, today)?;
            emit(json, &response, |o| {
                let unit = o.profile.weight_unit;
                println!("Hello {}!", o.profile.name);
                println!("Your current BMI is: {:.2}", o.bmi);
                println!(
                    "Based on your height, a healthy weight range is {:.1} {} to {:.1} {}.",
                    o.healthy_weight_min, unit, o.healthy_weight_max, unit
                );
                println!(
                    "Your recommended daily caloric intake is: {:.2} calories.",
                    o.recommended_calorie_intake
                );
                print_status(o.goal_status, o.estimated_goal_date.as_deref());
            })
        }
        Commands::Report { output } => {
            let path = output.unwrap_or_else(config::report_path);
            let response = reports::generate_report(storage, &path)?;
            emit(json, &response, |r| {
                println!("PDF report generated: {}", r.output_path);
                for line in &r.summary {
                    println!("  {}", line);
                }
            })
        }
        Commands::Reset { .. } => {
            let response = profile::reset_all_data(storage)?;
            emit(json, &response, |_| println!("All data has been reset."))
        }
        Commands::Version => {
            build_info::print_banner();
            Ok(())
        }
    }
}

/// Print `value` as pretty JSON, or as text via `text`
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_logged(r: &entries::LogCaloriesResponse) {
    println!(
        "Logged {:.2} {} on {} (daily total {:.2}).",
        r.logged, r.kind, r.date, r.daily_total
    );
}

fn print_projection(days: i64, date: Option<&str>) {
    if let Some(date) = date {
        println!("Estimated days to reach your goal: {} days (by {}).", days, date);
    }
}

fn print_status(status: GoalStatus, date: Option<&str>) {
    match status {
        GoalStatus::InProgress { days_remaining } => print_projection(days_remaining, date),
        GoalStatus::Reached => println!("You have reached your goal!"),
        GoalStatus::NoGoal => println!("No active goal. Set one with `dietmaster goal`."),
        GoalStatus::Maintaining => println!(
            "You are maintaining but off your goal weight. Set a weekly rate with `dietmaster goal` to get a projection."
        ),
    }
}
