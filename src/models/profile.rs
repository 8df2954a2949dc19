//! User profile model
//!
//! The single user's attributes and goal settings. Derived health metrics live
//! in `crate::metrics`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::error::Error;
use crate::units::UnitSystem;

/// Gender, selecting the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(Error::InvalidGender(s.to_string())),
        }
    }
}

/// Activity level used to scale BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "sedentary")]
    Sedentary,
    #[serde(rename = "lightly active")]
    LightlyActive,
    #[serde(rename = "moderately active")]
    ModeratelyActive,
    #[serde(rename = "very active")]
    VeryActive,
    #[serde(rename = "extra active")]
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Stored and displayed form, e.g. "lightly active"
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly active",
            ActivityLevel::ModeratelyActive => "moderately active",
            ActivityLevel::VeryActive => "very active",
            ActivityLevel::ExtraActive => "extra active",
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    /// Accepts "lightly active", "lightly_active" and "lightly-active"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| Error::InvalidActivityLevel(s.to_string()))
    }
}

macro_rules! sql_text_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: Error| FromSqlError::Other(e.to_string().into()))
            }
        }
    };
}

sql_text_enum!(Gender);
sql_text_enum!(ActivityLevel);

/// The user's profile. Heights and weights are always metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub units: UnitSystem,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal_weight_kg: Option<f64>,
    /// kg per week; positive while losing, negative while gaining, 0 for maintenance
    pub weekly_weight_change: Option<f64>,
    pub start_date: NaiveDate,
}

/// Data for creating a profile, in metric units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub units: UnitSystem,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

impl UserProfile {
    /// Build a new profile with no goal, starting on `start_date`
    pub fn new(data: ProfileCreate, start_date: NaiveDate) -> crate::Result<Self> {
        let profile = Self {
            name: data.name,
            age: data.age,
            gender: data.gender,
            units: data.units,
            height_cm: data.height_cm,
            weight_kg: data.weight_kg,
            activity_level: data.activity_level,
            goal_weight_kg: None,
            weekly_weight_change: None,
            start_date,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidProfile("name must not be empty".into()));
        }
        if self.age == 0 {
            return Err(Error::InvalidProfile("age must be greater than 0".into()));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(Error::InvalidProfile("height must be greater than 0".into()));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(Error::InvalidProfile("weight must be greater than 0".into()));
        }
        Ok(())
    }

    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            age: row.get("age")?,
            gender: row.get("gender")?,
            units: row.get("units")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            activity_level: row.get("activity_level")?,
            goal_weight_kg: row.get("goal_weight_kg")?,
            weekly_weight_change: row.get("weekly_weight_change")?,
            start_date: row.get("start_date")?,
        })
    }

    /// Get the profile (single row table)
    pub fn load(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace the profile (upsert)
    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO user_profile (
                id, name, age, gender, units, height_cm, weight_kg,
                activity_level, goal_weight_kg, weekly_weight_change, start_date
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                units = excluded.units,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                goal_weight_kg = excluded.goal_weight_kg,
                weekly_weight_change = excluded.weekly_weight_change,
                start_date = excluded.start_date,
                updated_at = datetime('now')
            "#,
            params![
                self.name,
                self.age,
                self.gender,
                self.units,
                self.height_cm,
                self.weight_kg,
                self.activity_level,
                self.goal_weight_kg,
                self.weekly_weight_change,
                self.start_date,
            ],
        )?;
        Ok(())
    }

    /// Remove the profile
    pub fn delete(conn: &Connection) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM user_profile", [])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::Database;

    pub(crate) fn sample_profile() -> UserProfile {
        UserProfile::new(
            ProfileCreate {
                name: "Alex Doe".into(),
                age: 30,
                gender: Gender::Male,
                units: UnitSystem::Metric,
                height_cm: 180.0,
                weight_kg: 80.0,
                activity_level: ActivityLevel::Sedentary,
            },
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_activity_level() {
        assert_eq!(
            "Lightly Active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::LightlyActive
        );
        assert_eq!(
            "extra_active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::ExtraActive
        );
        assert!(matches!(
            "couch potato".parse::<ActivityLevel>(),
            Err(Error::InvalidActivityLevel(_))
        ));
    }

    #[test]
    fn test_activity_level_json_matches_stored_form() {
        for level in ActivityLevel::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
            assert_eq!(serde_json::from_str::<ActivityLevel>(&json).unwrap(), level);
        }
        assert_eq!(
            serde_json::to_string(&ActivityLevel::LightlyActive).unwrap(),
            "\"lightly active\""
        );
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert!(matches!("other".parse::<Gender>(), Err(Error::InvalidGender(_))));
    }

    #[test]
    fn test_new_rejects_bad_values() {
        let mut data = ProfileCreate {
            name: "Sam".into(),
            age: 0,
            gender: Gender::Female,
            units: UnitSystem::Metric,
            height_cm: 165.0,
            weight_kg: 60.0,
            activity_level: ActivityLevel::VeryActive,
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(UserProfile::new(data.clone(), today).is_err());

        data.age = 40;
        data.height_cm = -1.0;
        assert!(UserProfile::new(data, today).is_err());
    }

    #[test]
    fn test_round_trip_with_goal_fields() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample_profile();
        profile.units = UnitSystem::Imperial;
        profile.goal_weight_kg = Some(72.5);
        profile.weekly_weight_change = Some(-0.25);
        profile.start_date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        db.with_conn(|conn| profile.save(conn)).unwrap();
        let loaded = db.with_conn(UserProfile::load).unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_round_trip_without_goal() {
        let db = Database::open_in_memory().unwrap();
        let profile = sample_profile();

        db.with_conn(|conn| profile.save(conn)).unwrap();
        let loaded = db.with_conn(UserProfile::load).unwrap().unwrap();
        assert_eq!(loaded.goal_weight_kg, None);
        assert_eq!(loaded.weekly_weight_change, None);
    }

    #[test]
    fn test_save_replaces_single_row() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample_profile();
        db.with_conn(|conn| profile.save(conn)).unwrap();
        profile.name = "Renamed".into();
        db.with_conn(|conn| profile.save(conn)).unwrap();

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM user_profile", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
        let loaded = db.with_conn(UserProfile::load).unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
    }

    #[test]
    fn test_unknown_activity_level_in_storage_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            // Bypass the CHECK constraint the way an old or hand-edited file would
            conn.execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 INSERT INTO user_profile (id, name, age, gender, units, height_cm, weight_kg,
                     activity_level, start_date)
                 VALUES (1, 'X', 30, 'male', 'metric', 180, 80, 'couch potato', '2024-01-01');",
            )?;
            Ok(())
        })
        .unwrap();

        assert!(db.with_conn(UserProfile::load).is_err());
    }
}
